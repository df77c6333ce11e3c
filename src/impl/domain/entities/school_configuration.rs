use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Single-row configuration — §3. Invoice/credit-note correlative increments
/// must happen in the same transaction that draws them (§5, §9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolConfiguration {
    pub school_name: String,
    pub school_rif: String,
    pub school_address: String,
    pub invoice_number_prefix: String,
    pub next_internal_invoice_reference: i64,
    pub credit_note_number_prefix: String,
    pub next_credit_note_reference: i64,
    pub default_iva_percentage: Decimal,
    pub payment_due_day: Option<u32>,
}

impl SchoolConfiguration {
    pub fn format_invoice_number(&self, counter: i64) -> String {
        format!("{}{}", self.invoice_number_prefix, counter)
    }

    pub fn format_credit_note_number(&self, counter: i64) -> String {
        format!("{}{}", self.credit_note_number_prefix, counter)
    }
}
