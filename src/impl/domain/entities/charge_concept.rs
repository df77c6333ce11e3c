use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

use super::ids::{ChargeConceptId, GradeLevelId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeFrequency {
    Monthly,
    Fortnightly,
    Annual,
    OneShot,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeConcept {
    pub id: ChargeConceptId,
    pub name: String,
    pub default_amount: Decimal,
    pub default_amount_currency: Currency,
    pub default_frequency: ChargeFrequency,
    pub category: String,
    /// Fraction in [0, 1], e.g. 0.16 for 16% IVA.
    pub iva_percentage: Decimal,
    pub applicable_grade_level: Option<GradeLevelId>,
    pub is_active: bool,
}
