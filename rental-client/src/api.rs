//! Typed admin API
//!
//! Thin wrappers over [`AuthClient`]; one method per remote endpoint.
//! Mutations answer with whatever acknowledgement the server sends, as
//! pages reload their lists afterwards.

use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use shared::models::{
    AnalyticsFilter, AnalyticsOverview, Booking, BookingQuery, CancelBookingRequest, Category,
    CategoryInput, DashboardStats, Member, MemberInput, Notification, PaymentVerification,
    Product, ProductCreate, ProductUpdate, SupportTicket, TicketUpdate,
};
use shared::response::{count_of, decode_list};
use shared::util::report_file_name;
use std::path::{Path, PathBuf};

use crate::ClientResult;
use crate::http::AuthClient;

/// Booking report export endpoint
pub const REPORT_PATH: &str = "admin/reports/bookings.csv";

/// Image attached to a new product
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Read an image from disk, guessing the type from the extension
    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let content_type = mime_guess::from_path(path)
            .first()
            .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
            .map(|mime| mime.essence_str().to_string());

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    fn into_part(self) -> ClientResult<Part> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        Ok(match self.content_type {
            Some(mime) => part.mime_str(&mime)?,
            None => part,
        })
    }
}

/// Admin API facade
#[derive(Debug, Clone)]
pub struct AdminApi {
    http: AuthClient,
}

impl AdminApi {
    pub fn new(http: AuthClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &AuthClient {
        &self.http
    }

    // ========== Products ==========

    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let body: Value = self.http.get("products").await?;
        Ok(decode_list(body, "products")?)
    }

    /// Multipart create: text fields plus `images` file parts
    pub async fn create_product(&self, product: &ProductCreate, images: Vec<ImageUpload>) -> ClientResult<Value> {
        let mut form = Form::new();
        for (name, value) in product.form_fields() {
            form = form.text(name, value);
        }
        for image in images {
            form = form.part("images", image.into_part()?);
        }
        self.http.post_multipart("admin/products", form).await
    }

    pub async fn update_product(&self, id: &str, update: &ProductUpdate) -> ClientResult<Value> {
        self.http.put(&format!("admin/products/{id}"), update).await
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<Value> {
        self.http.delete(&format!("admin/products/{id}")).await
    }

    // ========== Members ==========

    pub async fn list_members(&self) -> ClientResult<Vec<Member>> {
        let body: Value = self.http.get("admin/members").await?;
        Ok(decode_list(body, "members")?)
    }

    pub async fn create_member(&self, member: &MemberInput) -> ClientResult<Value> {
        self.http.post("admin/members", member).await
    }

    pub async fn update_member(&self, id: &str, member: &MemberInput) -> ClientResult<Value> {
        self.http.put(&format!("admin/members/{id}"), member).await
    }

    pub async fn delete_member(&self, id: &str) -> ClientResult<Value> {
        self.http.delete(&format!("admin/members/{id}")).await
    }

    // ========== Bookings ==========

    pub async fn list_bookings(&self, query: &BookingQuery) -> ClientResult<Vec<Booking>> {
        let body: Value = self.http.get_query("admin/bookings", query).await?;
        Ok(decode_list(body, "bookings")?)
    }

    pub async fn cancel_booking(&self, id: &str, reason: &str) -> ClientResult<Value> {
        let body = CancelBookingRequest {
            reason: reason.to_string(),
        };
        self.http.post(&format!("admin/bookings/{id}/cancel"), &body).await
    }

    pub async fn verify_payment(&self, id: &str, payment: &PaymentVerification) -> ClientResult<Value> {
        self.http
            .post(&format!("admin/bookings/{id}/verify-payment"), payment)
            .await
    }

    // ========== Categories ==========

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        let body: Value = self.http.get("categories").await?;
        Ok(decode_list(body, "categories")?)
    }

    pub async fn create_category(&self, category: &CategoryInput) -> ClientResult<Value> {
        self.http.post("admin/categories", category).await
    }

    pub async fn update_category(&self, id: &str, category: &CategoryInput) -> ClientResult<Value> {
        self.http.put(&format!("admin/categories/{id}"), category).await
    }

    pub async fn delete_category(&self, id: &str) -> ClientResult<Value> {
        self.http.delete(&format!("admin/categories/{id}")).await
    }

    // ========== Support ==========

    pub async fn list_tickets(&self) -> ClientResult<Vec<SupportTicket>> {
        let body: Value = self.http.get("admin/support").await?;
        Ok(decode_list(body, "tickets")?)
    }

    pub async fn update_ticket(&self, id: &str, update: &TicketUpdate) -> ClientResult<Value> {
        self.http.put(&format!("admin/support/{id}"), update).await
    }

    // ========== Notifications ==========

    pub async fn list_notifications(&self) -> ClientResult<Vec<Notification>> {
        let body: Value = self.http.get("admin/notifications").await?;
        Ok(decode_list(body, "notifications")?)
    }

    pub async fn mark_notification_read(&self, id: &str) -> ClientResult<Value> {
        self.http.patch(&format!("admin/notifications/{id}/read")).await
    }

    pub async fn mark_all_notifications_read(&self) -> ClientResult<Value> {
        self.http.patch("admin/notifications/read-all").await
    }

    // ========== Dashboard ==========

    /// Entity counts; the three lists load concurrently
    pub async fn fetch_stats(&self) -> ClientResult<DashboardStats> {
        let query = BookingQuery::default();
        let (products, bookings, members) = tokio::try_join!(
            self.http.get::<Value>("products"),
            self.http.get_query::<Value, _>("admin/bookings", &query),
            self.http.get::<Value>("admin/members"),
        )?;

        Ok(DashboardStats {
            products: count_of(&products, "products"),
            bookings: count_of(&bookings, "bookings"),
            members: count_of(&members, "members"),
        })
    }

    pub async fn analytics_overview(&self, filter: &AnalyticsFilter) -> ClientResult<AnalyticsOverview> {
        self.http
            .get_query("admin/analytics/overview", &filter.to_query())
            .await
    }

    /// Raw CSV of the bookings matching `filter`
    pub async fn booking_report_csv(&self, filter: &AnalyticsFilter) -> ClientResult<Vec<u8>> {
        self.http.get_bytes(REPORT_PATH, &filter.to_query()).await
    }

    /// Download the report into `dir` as `booking-report-<date>.csv`
    pub async fn save_booking_report(
        &self,
        filter: &AnalyticsFilter,
        dir: &Path,
        date: NaiveDate,
    ) -> ClientResult<PathBuf> {
        let csv = self.booking_report_csv(filter).await?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(report_file_name(date));
        tokio::fs::write(&path, csv).await?;
        tracing::info!(path = %path.display(), "Booking report saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_image_upload_guesses_image_types_only() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("tent.JPG");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&photo, b"\xff\xd8\xff").unwrap();
        std::fs::write(&notes, b"hello").unwrap();

        let upload = ImageUpload::from_path(&photo).await.unwrap();
        assert_eq!(upload.file_name, "tent.JPG");
        assert_eq!(upload.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(upload.bytes.len(), 3);

        let other = ImageUpload::from_path(&notes).await.unwrap();
        assert_eq!(other.content_type, None);
    }
}
