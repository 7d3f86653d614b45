//! Members page

use shared::models::{Member, MemberInput};

use super::{ListState, Searchable};
use crate::api::AdminApi;
use crate::{ClientError, ClientResult};

impl Searchable for Member {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.member_id.as_deref(),
            self.name.as_deref(),
            self.phone.as_deref(),
            self.email.as_deref(),
        ]
    }
}

pub struct MembersPage {
    api: AdminApi,
    pub state: ListState<Member>,
}

impl MembersPage {
    pub fn new(api: AdminApi) -> Self {
        Self {
            api,
            state: ListState::default(),
        }
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        let result = self.api.list_members().await;
        self.state.apply(result)
    }

    /// Blank form for a new member (active, no discount)
    pub fn new_form() -> MemberInput {
        MemberInput::default()
    }

    /// Form prefilled from an existing member
    pub fn edit_form(&self, id: &str) -> Option<MemberInput> {
        self.state
            .items()
            .iter()
            .find(|m| m.id == id)
            .map(MemberInput::from)
    }

    /// Create when `id` is `None`, update otherwise; reloads on success
    pub async fn save(&mut self, id: Option<&str>, form: &MemberInput) -> ClientResult<()> {
        if form.member_id.trim().is_empty() || form.name.trim().is_empty() {
            return self
                .state
                .record(Err(ClientError::Validation("Member ID and name are required".into())));
        }

        let result = match id {
            Some(id) => self.api.update_member(id, form).await,
            None => self.api.create_member(form).await,
        };
        self.state.record(result)?;
        self.load().await
    }

    pub async fn delete(&mut self, id: &str) -> ClientResult<()> {
        let result = self.api.delete_member(id).await;
        self.state.record(result)?;
        self.load().await
    }
}
