use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

use super::ids::{AppliedChargeId, ChargeConceptId, InvoiceId, StudentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeStatus {
    Pending,
    PartiallyPaid,
    Paid,
    Overdue,
    Cancelled,
}

impl ChargeStatus {
    /// Statuses that still accept allocations / recurring dedup counts
    /// against — "open" per §4.5/§4.6/§8.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            ChargeStatus::Pending | ChargeStatus::PartiallyPaid | ChargeStatus::Overdue
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ChargeStatus::Paid | ChargeStatus::Cancelled)
    }
}

/// The central ledger row — §3/§4.3. `status` as persisted never records
/// `Overdue`; that label is derived at read time (§4.3) by comparing
/// `due_date` against today when the stored status is still `Pending` or
/// `PartiallyPaid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedCharge {
    pub id: AppliedChargeId,
    pub student_id: StudentId,
    pub charge_concept_id: Option<ChargeConceptId>,
    pub invoice_id: Option<InvoiceId>,

    pub description: String,

    // Snapshot at issuance.
    pub original_concept_amount: Decimal,
    pub original_concept_currency: Currency,
    pub is_indexed: bool,
    pub exchange_rate_applied_at_emission: Option<Decimal>,

    // Obligation.
    pub amount_due_original_currency: Decimal,
    pub amount_due_ves_at_emission: Decimal,

    // Fulfilment.
    pub amount_paid_original_currency_equivalent: Decimal,
    pub amount_paid_ves: Decimal,

    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: ChargeStatus,
}

impl AppliedCharge {
    /// Derived display status per §4.3: `overdue` is assigned by any read
    /// path comparing `due_date` to today; stored status is left alone.
    pub fn display_status(&self, today: NaiveDate) -> ChargeStatus {
        match self.status {
            ChargeStatus::Pending | ChargeStatus::PartiallyPaid if self.due_date < today => {
                ChargeStatus::Overdue
            }
            other => other,
        }
    }

    /// Outstanding balance in the charge's original currency.
    pub fn balance_original(&self) -> Decimal {
        (self.amount_due_original_currency - self.amount_paid_original_currency_equivalent)
            .max(Decimal::ZERO)
    }

    /// VES balance at emission rate, ignoring today's-rate reindexation —
    /// used for the VES-denominated non-indexed path of §4.3's today-value.
    pub fn balance_ves_at_emission(&self) -> Decimal {
        (self.amount_due_ves_at_emission - self.amount_paid_ves).max(Decimal::ZERO)
    }
}
