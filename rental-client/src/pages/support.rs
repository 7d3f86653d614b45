//! Support tickets page

use shared::message::PushEvent;
use shared::models::{SupportTicket, TicketUpdate};

use super::{ListState, Searchable};
use crate::api::AdminApi;
use crate::ClientResult;

impl Searchable for SupportTicket {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            Some(self.phone.as_str()),
            self.email.as_deref(),
            Some(self.message.as_str()),
        ]
    }
}

pub struct SupportPage {
    api: AdminApi,
    pub state: ListState<SupportTicket>,
}

impl SupportPage {
    pub fn new(api: AdminApi) -> Self {
        Self {
            api,
            state: ListState::default(),
        }
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        let result = self.api.list_tickets().await;
        self.state.apply(result)
    }

    /// Reply form prefilled with the ticket's status and message
    pub fn reply_form(&self, id: &str) -> Option<TicketUpdate> {
        self.state
            .items()
            .iter()
            .find(|t| t.id == id)
            .map(TicketUpdate::from)
    }

    pub async fn update(&mut self, id: &str, update: &TicketUpdate) -> ClientResult<()> {
        let result = self.api.update_ticket(id, update).await;
        self.state.record(result)?;
        tracing::info!(ticket_id = %id, status = %update.status, "Support ticket updated");
        self.load().await
    }

    /// Reload when a support signal arrives; returns whether it did
    pub async fn handle_signal(&mut self, event: &PushEvent) -> ClientResult<bool> {
        if !event.touches_support() {
            return Ok(false);
        }
        self.load().await?;
        Ok(true)
    }
}
