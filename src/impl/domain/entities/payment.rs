use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

use super::ids::{AppliedChargeId, PaymentAllocationId, PaymentId, RepresentativeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Card,
    MobilePayment,
    Zelle,
    Other,
}

/// Representative-level receipt — §3. Created once; allocation rows are
/// attached at creation time; never edited in amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub representative_id: RepresentativeId,
    pub payment_date: NaiveDate,
    pub amount_paid: Decimal,
    pub currency_paid: Currency,
    pub exchange_rate_applied: Option<Decimal>,
    pub amount_paid_ves_equivalent: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// `(payment, applied_charge, amount_allocated_ves)` — §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAllocation {
    pub id: PaymentAllocationId,
    pub payment_id: PaymentId,
    pub applied_charge_id: AppliedChargeId,
    pub amount_allocated_ves: Decimal,
}
