use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{AppliedChargeId, ChargeConceptId, CreditNoteId, InvoiceId, RepresentativeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmissionType {
    FiscalPrinter,
    Digital,
    FormaLibre,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    PendingEmission,
    Emitted,
    Annulled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub applied_charge_id: AppliedChargeId,
    pub charge_concept_id: Option<ChargeConceptId>,
    pub description: String,
    pub quantity: i32,
    pub unit_price_ves: Decimal,
    pub iva_percentage: Decimal,
    pub item_subtotal: Decimal,
    pub item_iva: Decimal,
    pub item_total: Decimal,
}

/// Snapshots a set of applied charges into an immutable invoice — §3/§4.7.
/// After emission, every field but `status`, the fiscal numbers, and `notes`
/// is frozen (§8 invariant 4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub representative_id: RepresentativeId,
    pub issue_date: NaiveDate,

    // School identity snapshot.
    pub school_name_snapshot: String,
    pub school_rif_snapshot: String,
    pub school_address_snapshot: String,

    // Representative identity snapshot (bill-to, with optional overrides).
    pub representative_name_snapshot: String,
    pub representative_identification_snapshot: String,
    pub representative_address_snapshot: String,

    pub items: Vec<InvoiceItem>,
    pub subtotal_ves: Decimal,
    pub total_iva_ves: Decimal,
    pub total_amount_ves: Decimal,

    pub emission_type: EmissionType,
    pub status: InvoiceStatus,

    pub manual_control_number: Option<String>,
    pub fiscal_invoice_number: Option<String>,
    pub fiscal_control_number: Option<String>,
    pub fiscal_emission_url: Option<String>,

    pub credit_note_id: Option<CreditNoteId>,
    pub notes: Option<String>,
}
