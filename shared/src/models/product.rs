//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity (rentable item)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Human-facing product code
    #[serde(default)]
    pub product_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_units: u32,
    #[serde(default)]
    pub reserved_units: u32,
    #[serde(default)]
    pub maintenance_units: u32,
    #[serde(default)]
    pub base_price: Decimal,
    #[serde(default)]
    pub member_price: Option<Decimal>,
    #[serde(default)]
    pub refundable_deposit: Decimal,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Units that can still be rented out
    pub fn available_units(&self) -> u32 {
        self.total_units
            .saturating_sub(self.reserved_units)
            .saturating_sub(self.maintenance_units)
    }
}

/// Create product payload
///
/// Sent as multipart form data so that image files can ride along.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub total_units: u32,
    #[serde(default)]
    pub reserved_units: u32,
    #[serde(default)]
    pub maintenance_units: u32,
    pub base_price: Decimal,
    #[serde(default)]
    pub member_price: Option<Decimal>,
    #[serde(default)]
    pub refundable_deposit: Decimal,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ProductCreate {
    /// Text parts of the multipart body, in form order
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("totalUnits", self.total_units.to_string()),
            ("reservedUnits", self.reserved_units.to_string()),
            ("basePrice", self.base_price.to_string()),
            (
                "memberPrice",
                self.member_price.unwrap_or_default().to_string(),
            ),
            ("maintenanceUnits", self.maintenance_units.to_string()),
            ("refundableDeposit", self.refundable_deposit.to_string()),
            ("isActive", self.is_active.to_string()),
        ];
        if let Some(description) = &self.description {
            fields.push(("description", description.clone()));
        }
        for feature in &self.features {
            fields.push(("features", feature.clone()));
        }
        fields
    }
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refundable_deposit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Split a comma separated feature list, dropping blanks
pub fn parse_features(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_available_units() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Canopy",
            "totalUnits": 10,
            "reservedUnits": 3,
            "maintenanceUnits": 8
        }))
        .unwrap();
        assert_eq!(product.available_units(), 0);
        assert!(product.is_active);
    }

    #[test]
    fn test_parse_features() {
        assert_eq!(
            parse_features(" waterproof, ,4 person ,"),
            vec!["waterproof".to_string(), "4 person".to_string()]
        );
    }

    #[test]
    fn test_form_fields_default_member_price() {
        let create = ProductCreate {
            name: "Stove".into(),
            total_units: 4,
            base_price: Decimal::from(50),
            is_active: true,
            ..Default::default()
        };
        let fields = create.form_fields();
        assert!(fields.contains(&("memberPrice", "0".to_string())));
        assert!(fields.contains(&("isActive", "true".to_string())));
    }
}
