use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

use super::ids::ExpenseId;

/// Operational expenditure outside payroll — §4.9 supplement. The
/// "salaries" category is deliberately not represented here: personnel cost
/// is derived from `EmployeePayableItem`/`EmployeeBalanceAdjustment` so
/// reports can include or exclude it without double-counting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub expense_date: NaiveDate,
    pub description: String,
    pub category: String,
    pub supplier: Option<String>,
    pub amount_original: Decimal,
    pub currency_original: Currency,
    pub amount_ves: Decimal,
    pub notes: Option<String>,
}
