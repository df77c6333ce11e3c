use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

use super::ids::{DepartmentId, EmployeeId, PositionId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub department_id: DepartmentId,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayFrequency {
    Monthly,
    Fortnightly,
    Hourly,
}

/// Organisational tree leaf carrying salary shape — §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub identification: String,
    pub department_id: Option<DepartmentId>,
    pub position_id: Option<PositionId>,
    pub is_active: bool,

    pub pay_frequency: PayFrequency,
    pub base_salary_amount: Decimal,
    pub base_salary_currency: Currency,
    pub hourly_rate: Option<Decimal>,
    pub accumulated_hours: Decimal,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
