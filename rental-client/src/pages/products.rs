//! Products and add-product pages

use rust_decimal::Decimal;
use shared::models::{Product, ProductCreate, ProductUpdate, parse_features};
use std::str::FromStr;

use super::{ListState, Searchable};
use crate::api::{AdminApi, ImageUpload};
use crate::router::Route;
use crate::{ClientError, ClientResult};

impl Searchable for Product {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str()), self.product_id.as_deref()]
    }
}

pub struct ProductsPage {
    api: AdminApi,
    pub state: ListState<Product>,
}

impl ProductsPage {
    pub fn new(api: AdminApi) -> Self {
        Self {
            api,
            state: ListState::default(),
        }
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        let result = self.api.list_products().await;
        self.state.apply(result)
    }

    pub async fn update(&mut self, id: &str, update: &ProductUpdate) -> ClientResult<()> {
        let result = self.api.update_product(id, update).await;
        self.state.record(result)?;
        self.load().await
    }

    pub async fn delete(&mut self, id: &str) -> ClientResult<()> {
        let result = self.api.delete_product(id).await;
        self.state.record(result)?;
        self.load().await
    }
}

/// Raw add-product form, as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub total_units: String,
    pub maintenance_units: String,
    pub base_price: String,
    pub member_price: String,
    pub refundable_deposit: String,
    /// Comma separated
    pub features: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            total_units: "1".into(),
            maintenance_units: "0".into(),
            base_price: String::new(),
            member_price: String::new(),
            refundable_deposit: "0".into(),
            features: String::new(),
        }
    }
}

fn parse_field<T: FromStr>(label: &str, raw: &str) -> ClientResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| ClientError::Validation(format!("{label} must be a number, got {raw:?}")))
}

impl ProductForm {
    /// Validate and convert into the create payload
    pub fn to_create(&self) -> ClientResult<ProductCreate> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation("Product name is required".into()));
        }

        let member_price = match self.member_price.trim() {
            "" => None,
            raw => Some(parse_field::<Decimal>("Member price", raw)?),
        };
        let description = match self.description.trim() {
            "" => None,
            d => Some(d.to_string()),
        };

        Ok(ProductCreate {
            name: name.to_string(),
            description,
            total_units: parse_field("Total units", &self.total_units)?,
            reserved_units: 0,
            maintenance_units: parse_field("Maintenance units", &self.maintenance_units)?,
            base_price: parse_field("Base price", &self.base_price)?,
            member_price,
            refundable_deposit: parse_field("Refundable deposit", &self.refundable_deposit)?,
            features: parse_features(&self.features),
            is_active: true,
        })
    }
}

pub struct AddProductPage {
    api: AdminApi,
    pub form: ProductForm,
    pub images: Vec<ImageUpload>,
    pub error: Option<String>,
}

impl AddProductPage {
    pub fn new(api: AdminApi) -> Self {
        Self {
            api,
            form: ProductForm::default(),
            images: Vec::new(),
            error: None,
        }
    }

    /// Create the product; on success the console moves to the product list
    pub async fn submit(&mut self) -> ClientResult<Route> {
        let result = match self.form.to_create() {
            Ok(product) => self
                .api
                .create_product(&product, std::mem::take(&mut self.images))
                .await,
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                tracing::info!(name = %self.form.name, "Product created");
                self.form = ProductForm::default();
                self.error = None;
                Ok(Route::Products)
            }
            Err(e) => {
                self.error = Some(e.banner());
                Err(e)
            }
        }
    }
}
