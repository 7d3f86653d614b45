//! Bookings page
//!
//! Cancelling patches the cached row right away. The next reload checks the
//! server copy against the patch; a mismatch is logged and kept as an
//! integrity warning, and the server copy wins.

use rust_decimal::Decimal;
use shared::message::PushEvent;
use shared::models::{Booking, BookingQuery, BookingStatus, PaymentMethod, PaymentVerification};
use std::collections::HashMap;
use std::str::FromStr;

use super::{ListState, Searchable};
use crate::api::AdminApi;
use crate::{ClientError, ClientResult};

impl Searchable for Booking {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.user_name.as_deref(),
            self.user_phone.as_deref(),
            self.user_email.as_deref(),
            self.member_id.as_deref(),
            self.product_id.as_deref(),
        ]
    }
}

/// Row actions available for a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingActions {
    pub view: bool,
    pub cancel: bool,
    pub verify_payment: bool,
}

impl BookingActions {
    pub fn for_booking(booking: &Booking) -> Self {
        Self {
            view: true,
            cancel: booking.status.can_cancel(),
            verify_payment: booking.status.can_verify_payment(),
        }
    }
}

/// Server state that disagreed with an optimistic cancel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityWarning {
    pub booking_id: String,
    pub expected_reason: String,
    pub actual_status: BookingStatus,
    pub actual_notes: Option<String>,
}

pub struct BookingsPage {
    api: AdminApi,
    pub state: ListState<Booking>,
    pub query: BookingQuery,
    /// Optimistic cancels awaiting confirmation: booking id -> reason
    pending_cancels: HashMap<String, String>,
    warnings: Vec<IntegrityWarning>,
}

impl BookingsPage {
    pub fn new(api: AdminApi) -> Self {
        Self {
            api,
            state: ListState::default(),
            query: BookingQuery::default(),
            pending_cancels: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&Booking> {
        self.state.items().iter().find(|b| b.id == id)
    }

    pub fn warnings(&self) -> &[IntegrityWarning] {
        &self.warnings
    }

    /// Fetch the list and reconcile pending cancels against it
    pub async fn load(&mut self) -> ClientResult<()> {
        let result = self.api.list_bookings(&self.query).await;
        self.state.apply(result)?;
        self.reconcile();
        Ok(())
    }

    fn reconcile(&mut self) {
        let pending = std::mem::take(&mut self.pending_cancels);
        for (id, reason) in pending {
            let Some(booking) = self.state.items().iter().find(|b| b.id == id) else {
                tracing::debug!(booking_id = %id, "Cancelled booking no longer listed");
                continue;
            };
            let confirmed = booking.status == BookingStatus::Cancelled
                && booking.admin_notes.as_deref() == Some(reason.as_str());
            if !confirmed {
                tracing::warn!(
                    booking_id = %id,
                    status = %booking.status,
                    "Server state differs from optimistic cancel"
                );
                self.warnings.push(IntegrityWarning {
                    booking_id: id,
                    expected_reason: reason,
                    actual_status: booking.status,
                    actual_notes: booking.admin_notes.clone(),
                });
            }
        }
    }

    /// Cancel with a mandatory reason, patch the row, then reload
    pub async fn cancel(&mut self, id: &str, reason: &str) -> ClientResult<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return self
                .state
                .record(Err(ClientError::Validation("Cancellation reason is required".into())));
        }
        if let Some(status) = self.find(id).map(|b| b.status)
            && !status.can_cancel()
        {
            return self
                .state
                .record(Err(ClientError::Validation("Booking is already cancelled".into())));
        }

        let result = self.api.cancel_booking(id, reason).await;
        self.state.record(result)?;

        if let Some(items) = self.state.items.as_mut()
            && let Some(booking) = items.iter_mut().find(|b| b.id == id)
        {
            booking.status = BookingStatus::Cancelled;
            booking.admin_notes = Some(reason.to_string());
        }
        self.pending_cancels.insert(id.to_string(), reason.to_string());
        tracing::info!(booking_id = %id, "Booking cancelled");

        self.reload_after_change().await;
        Ok(())
    }

    /// Record a counter payment for a pending booking, then reload
    pub async fn verify_payment(&mut self, id: &str, method: &str, amount: &str) -> ClientResult<()> {
        let amount = amount.trim();
        if amount.is_empty() {
            return self
                .state
                .record(Err(ClientError::Validation("Payment amount is required".into())));
        }
        let payment = match (PaymentMethod::from_str(method), Decimal::from_str(amount)) {
            (Ok(method), Ok(amount)) => PaymentVerification { method, amount },
            (Err(e), _) => return self.state.record(Err(ClientError::Validation(e))),
            (_, Err(_)) => {
                return self
                    .state
                    .record(Err(ClientError::Validation(format!("Invalid amount: {amount}"))));
            }
        };
        if let Some(status) = self.find(id).map(|b| b.status)
            && !status.can_verify_payment()
        {
            let message = format!("Only pending bookings can be verified (status: {status})");
            return self.state.record(Err(ClientError::Validation(message)));
        }

        let result = self.api.verify_payment(id, &payment).await;
        self.state.record(result)?;
        tracing::info!(booking_id = %id, method = %payment.method, "Payment verified");

        self.reload_after_change().await;
        Ok(())
    }

    /// Reload when a booking signal arrives; returns whether it did
    pub async fn handle_signal(&mut self, event: &PushEvent) -> ClientResult<bool> {
        if !event.touches_bookings() {
            return Ok(false);
        }
        self.load().await?;
        Ok(true)
    }

    async fn reload_after_change(&mut self) {
        if let Err(e) = self.load().await {
            tracing::warn!("Reload after booking change failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn booking(status: &str) -> Booking {
        serde_json::from_value(json!({
            "_id": "b1",
            "userName": "Asha Gurung",
            "userPhone": "9800000000",
            "productId": "KAYAK-01",
            "status": status
        }))
        .unwrap()
    }

    #[test]
    fn test_actions_per_status() {
        let pending = BookingActions::for_booking(&booking("pending"));
        assert!(pending.cancel && pending.verify_payment);

        let confirmed = BookingActions::for_booking(&booking("confirmed"));
        assert!(confirmed.cancel && !confirmed.verify_payment);

        let cancelled = BookingActions::for_booking(&booking("cancelled"));
        assert!(cancelled.view && !cancelled.cancel && !cancelled.verify_payment);
    }

    #[test]
    fn test_search_fields() {
        let b = booking("pending");
        assert!(b.matches("kayak"));
        assert!(b.matches("9800"));
        assert!(!b.matches("khalti"));
    }
}
