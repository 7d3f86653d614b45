//! Member Model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Membership status (会员状态)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Active,
    Suspended,
    Expired,
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Suspended => write!(f, "suspended"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown member status: {other}")),
        }
    }
}

/// Member entity (会员)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discount_percent: Decimal,
}

/// Create / update member payload
///
/// `valid_until` is a plain date (`YYYY-MM-DD`), the way the edit form holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    pub member_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub status: MemberStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
    pub discount_percent: Decimal,
}

impl Default for MemberInput {
    /// Empty create form: active, no discount
    fn default() -> Self {
        Self {
            member_id: String::new(),
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            status: MemberStatus::Active,
            valid_until: None,
            discount_percent: Decimal::ZERO,
        }
    }
}

impl From<&Member> for MemberInput {
    /// Edit form prefilled from an existing record
    fn from(m: &Member) -> Self {
        Self {
            member_id: m.member_id.clone().unwrap_or_default(),
            name: m.name.clone().unwrap_or_default(),
            phone: m.phone.clone().unwrap_or_default(),
            email: m.email.clone().unwrap_or_default(),
            status: m.status,
            valid_until: m.valid_until.map(|t| t.date_naive()),
            discount_percent: m.discount_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edit_form_truncates_valid_until() {
        let member: Member = serde_json::from_value(json!({
            "_id": "m1",
            "memberId": "MEM-001",
            "name": "Hari",
            "status": "suspended",
            "validUntil": "2026-12-31T00:00:00.000Z",
            "discountPercent": 15
        }))
        .unwrap();

        let form = MemberInput::from(&member);
        assert_eq!(form.member_id, "MEM-001");
        assert_eq!(form.status, MemberStatus::Suspended);
        assert_eq!(form.valid_until, NaiveDate::from_ymd_opt(2026, 12, 31));
        assert_eq!(
            serde_json::to_value(&form).unwrap()["validUntil"],
            json!("2026-12-31")
        );
    }

    #[test]
    fn test_default_form() {
        let form = MemberInput::default();
        assert_eq!(form.status, MemberStatus::Active);
        assert_eq!(form.discount_percent, Decimal::ZERO);
    }
}
