use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::RepresentativeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentificationType {
    V,
    E,
    J,
    P,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    pub id_type: IdentificationType,
    pub number: String,
}

/// Representative (parent/guardian) — §3. Owns zero or more students; never
/// auto-deleted while it has children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Representative {
    pub id: RepresentativeId,
    pub first_name: String,
    pub last_name: String,
    pub identification: Identification,
    pub email: String,
    pub phones: Vec<String>,
    pub address: Option<String>,
    pub rif: Option<String>,
    pub available_credit_ves: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Representative {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
