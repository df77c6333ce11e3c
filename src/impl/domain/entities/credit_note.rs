use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::invoice::InvoiceItem;

use super::ids::{CreditNoteId, InvoiceId};

pub type CreditNoteItem = InvoiceItem;

/// One-to-one with an invoice; creating one annuls the original invoice and
/// grows representative credit — §3/§4.7.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditNote {
    pub id: CreditNoteId,
    pub credit_note_number: String,
    pub invoice_id: InvoiceId,
    pub issue_date: NaiveDate,
    pub reason: String,
    pub items: Vec<CreditNoteItem>,
    pub total_credited_ves: Decimal,
}
