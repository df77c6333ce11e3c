use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

use super::ids::{EmployeeId, EmployeePayableItemId, PayrollRunId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayableItemStatus {
    Pending,
    PartiallyPaid,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayableItemSourceType {
    PayrollRun,
    BalanceAdjustment,
}

/// School's obligation to an employee — §3, structurally symmetric to
/// `AppliedCharge` on the student side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeePayableItem {
    pub id: EmployeePayableItemId,
    pub employee_id: EmployeeId,
    pub source_type: PayableItemSourceType,
    pub source_id: PayrollRunId,
    pub description: String,
    pub issue_date: NaiveDate,
    pub amount_original: Decimal,
    pub currency_original: Currency,
    pub amount_ves_at_creation: Decimal,
    pub amount_paid_ves: Decimal,
    pub status: PayableItemStatus,
}

impl EmployeePayableItem {
    pub fn balance_ves(&self) -> Decimal {
        (self.amount_ves_at_creation - self.amount_paid_ves).max(Decimal::ZERO)
    }
}
