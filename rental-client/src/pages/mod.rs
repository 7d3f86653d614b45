//! Page controllers
//!
//! Each page loads its own list through the admin API, keeps the last
//! error as an inline banner and filters the loaded list client-side with a
//! case-insensitive substring match over a fixed set of fields.

pub mod bookings;
pub mod categories;
pub mod dashboard;
pub mod members;
pub mod products;
pub mod support;

pub use bookings::{BookingActions, BookingsPage, IntegrityWarning};
pub use categories::CategoriesPage;
pub use dashboard::DashboardPage;
pub use members::MembersPage;
pub use products::{AddProductPage, ProductForm, ProductsPage};
pub use support::SupportPage;

use crate::ClientResult;

/// Fields the page search box matches against
pub trait Searchable {
    fn search_fields(&self) -> Vec<Option<&str>>;

    /// Case-insensitive substring match; a blank query matches everything
    fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.search_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Loaded list, search box and error banner of one page
#[derive(Debug, Clone)]
pub struct ListState<T> {
    /// `None` until the first successful load
    pub items: Option<Vec<T>>,
    pub search: String,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: None,
            search: String::new(),
            error: None,
        }
    }
}

impl<T> ListState<T> {
    pub fn is_loaded(&self) -> bool {
        self.items.is_some()
    }

    pub fn items(&self) -> &[T] {
        self.items.as_deref().unwrap_or(&[])
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Store a load result; an error becomes the banner and is passed on
    pub fn apply(&mut self, result: ClientResult<Vec<T>>) -> ClientResult<()> {
        match result {
            Ok(items) => {
                self.items = Some(items);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.banner());
                Err(e)
            }
        }
    }

    /// Pass a mutation result through, keeping any error as the banner
    pub fn record<R>(&mut self, result: ClientResult<R>) -> ClientResult<R> {
        if let Err(e) = &result {
            self.error = Some(e.banner());
        }
        result
    }
}

impl<T: Searchable> ListState<T> {
    /// Items matching the current search
    pub fn filtered(&self) -> Vec<&T> {
        self.items()
            .iter()
            .filter(|item| item.matches(&self.search))
            .collect()
    }
}
