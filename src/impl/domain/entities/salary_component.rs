use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

use super::ids::{EmployeeId, EmployeeSalaryComponentId, SalaryComponentDefinitionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentType {
    Earning,
    Deduction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationType {
    FixedAmount,
    PercentageOfBase,
}

/// Named reusable building block — §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryComponentDefinition {
    pub id: SalaryComponentDefinitionId,
    pub name: String,
    pub component_type: ComponentType,
    pub calculation_type: CalculationType,
    pub default_value: Decimal,
    pub default_currency: Currency,
    pub is_taxable: bool,
    pub is_active: bool,
}

/// Assigns a definition to an employee with optional overrides — §3. Unique
/// per (employee, definition).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSalaryComponent {
    pub id: EmployeeSalaryComponentId,
    pub employee_id: EmployeeId,
    pub definition_id: SalaryComponentDefinitionId,
    pub override_value: Option<Decimal>,
    pub override_currency: Option<Currency>,
    pub is_active: bool,
}
