//! Booking Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Booking lifecycle status
///
/// `Pending -> Confirmed` through payment verification, any non-cancelled
/// status `-> Cancelled` through the cancel action. Nothing leaves `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Cancel is offered for every status except `Cancelled`
    pub fn can_cancel(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Payment can only be verified while the booking is pending
    pub fn can_verify_payment(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown booking status: {s}"))
    }
}

/// Payment method accepted at the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Esewa,
    Khalti,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Esewa => "esewa",
            Self::Khalti => "khalti",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "esewa" => Ok(Self::Esewa),
            "khalti" => Ok(Self::Khalti),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Payment recorded on a booking once verified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub method: String,
    #[serde(default)]
    pub amount: Decimal,
}

/// Product data frozen into the booking at creation time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_per_hour: Option<Decimal>,
}

/// Booking entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_phone: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_snapshot: Option<ProductSnapshot>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub start_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub price_per_hour: Option<Decimal>,
    #[serde(default)]
    pub total_rent: Option<Decimal>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    pub status: BookingStatus,
    #[serde(default)]
    pub payment: Option<PaymentRecord>,
    /// Cancellation reason entered by the admin
    #[serde(default)]
    pub admin_notes: Option<String>,
}

impl Booking {
    /// Product name from the snapshot, falling back to the product id
    pub fn product_label(&self) -> &str {
        self.product_snapshot
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .or(self.product_id.as_deref())
            .unwrap_or("-")
    }

    /// Unit price, booking value first then the snapshot
    pub fn unit_price(&self) -> Option<Decimal> {
        self.price_per_hour
            .or_else(|| self.product_snapshot.as_ref().and_then(|s| s.price_per_hour))
    }

    /// Bookings made with a membership show as "Member (<id>)", others as "General"
    pub fn party_label(&self) -> String {
        match self.member_id.as_deref() {
            Some(id) if !id.is_empty() => format!("Member ({id})"),
            _ => "General".to_string(),
        }
    }
}

/// `POST /admin/bookings/{id}/cancel`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    pub reason: String,
}

/// `POST /admin/bookings/{id}/verify-payment`
///
/// The amount travels as a decimal string (`"500"`), as the counter form sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub method: PaymentMethod,
    pub amount: Decimal,
}

/// Optional query parameters of the booking list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_booking_from_api() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b1",
            "userName": "Sita",
            "userPhone": "9800000000",
            "productId": "p1",
            "productSnapshot": { "name": "Tent", "pricePerHour": 120 },
            "quantity": 2,
            "startDateTime": "2025-01-01T04:00:00.000Z",
            "endDateTime": "2025-01-01T08:00:00.000Z",
            "totalRent": 960,
            "status": "pending"
        }))
        .unwrap();

        assert_eq!(booking.id, "b1");
        assert_eq!(booking.product_label(), "Tent");
        assert_eq!(booking.unit_price(), Some(Decimal::from(120)));
        assert_eq!(booking.party_label(), "General");
        assert!(booking.status.can_cancel());
        assert!(booking.status.can_verify_payment());
    }

    #[test]
    fn test_status_transitions_offered() {
        assert!(!BookingStatus::Cancelled.can_cancel());
        assert!(BookingStatus::Confirmed.can_cancel());
        assert!(!BookingStatus::Confirmed.can_verify_payment());
        assert_eq!("Completed".parse::<BookingStatus>(), Ok(BookingStatus::Completed));
    }

    #[test]
    fn test_payment_verification_wire_format() {
        let body = PaymentVerification {
            method: PaymentMethod::Cash,
            amount: Decimal::from(500),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "method": "cash", "amount": "500" })
        );
    }
}
