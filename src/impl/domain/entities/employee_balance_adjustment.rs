use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

use super::ids::{EmployeeBalanceAdjustmentId, EmployeeId, EmployeePayableItemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceAdjustmentType {
    Earning,
    Deduction,
}

/// A manual earning or deduction, with currency conversion — §3/§4.8.
/// Deductions must target a specific payable item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeBalanceAdjustment {
    pub id: EmployeeBalanceAdjustmentId,
    pub employee_id: EmployeeId,
    pub adjustment_type: BalanceAdjustmentType,
    pub description: String,
    pub date: NaiveDate,
    pub amount_original: Decimal,
    pub currency_original: Currency,
    pub amount_ves: Decimal,
    pub target_payable_item_id: Option<EmployeePayableItemId>,
}
