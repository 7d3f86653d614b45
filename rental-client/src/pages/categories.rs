//! Categories page

use shared::models::{Category, CategoryInput};

use super::{ListState, Searchable};
use crate::api::AdminApi;
use crate::{ClientError, ClientResult};

impl Searchable for Category {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str())]
    }
}

pub struct CategoriesPage {
    api: AdminApi,
    pub state: ListState<Category>,
}

fn category_input(name: &str) -> ClientResult<CategoryInput> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::Validation("Category name cannot be empty".into()));
    }
    Ok(CategoryInput {
        name: name.to_string(),
    })
}

impl CategoriesPage {
    pub fn new(api: AdminApi) -> Self {
        Self {
            api,
            state: ListState::default(),
        }
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        let result = self.api.list_categories().await;
        self.state.apply(result)
    }

    pub async fn create(&mut self, name: &str) -> ClientResult<()> {
        let input = category_input(name)?;
        let result = self.api.create_category(&input).await;
        self.state.record(result)?;
        self.load().await
    }

    pub async fn rename(&mut self, id: &str, name: &str) -> ClientResult<()> {
        let input = category_input(name)?;
        let result = self.api.update_category(id, &input).await;
        self.state.record(result)?;
        self.load().await
    }

    pub async fn delete(&mut self, id: &str) -> ClientResult<()> {
        let result = self.api.delete_category(id).await;
        self.state.record(result)?;
        self.load().await
    }
}
