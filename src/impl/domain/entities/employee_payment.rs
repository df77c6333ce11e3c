use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

use super::ids::{EmployeeId, EmployeePayableItemId, EmployeePaymentAllocationId, EmployeePaymentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeePaymentMethod {
    Cash,
    Transfer,
    Check,
    Other,
}

/// Symmetric to `Payment` — §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeePayment {
    pub id: EmployeePaymentId,
    pub employee_id: EmployeeId,
    pub payment_date: NaiveDate,
    pub amount_paid: Decimal,
    pub currency_paid: Currency,
    pub exchange_rate_applied: Option<Decimal>,
    pub amount_paid_ves_equivalent: Decimal,
    pub method: EmployeePaymentMethod,
}

/// Symmetric to `PaymentAllocation` — §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeePaymentAllocation {
    pub id: EmployeePaymentAllocationId,
    pub employee_payment_id: EmployeePaymentId,
    pub employee_payable_item_id: EmployeePayableItemId,
    pub amount_allocated_ves: Decimal,
}
