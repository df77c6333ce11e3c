use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{GradeLevelId, RepresentativeId, StudentId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeLevel {
    pub id: GradeLevelId,
    pub name: String,
    pub order_index: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub identity: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub grade_level_id: GradeLevelId,
    pub representative_id: RepresentativeId,
    pub is_active: bool,
    pub has_scholarship: bool,
    pub scholarship_percentage: Decimal,
    pub scholarship_fixed_amount_ves: Decimal,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
