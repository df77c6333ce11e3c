use chrono::{NaiveDate, DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payroll_run::ComponentBreakdownLine;

use super::ids::{EmployeeId, EmployeePaymentId, PayslipId};

/// Immutable snapshot of a single employee payment's breakdown — §3.
/// One-to-one with an `EmployeePayment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payslip {
    pub id: PayslipId,
    pub employee_payment_id: EmployeePaymentId,
    pub employee_id: EmployeeId,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub is_advance: bool,
    pub base_salary_ves: Decimal,
    pub total_earnings_ves: Decimal,
    pub total_deductions_ves: Decimal,
    pub net_amount_ves: Decimal,
    pub component_breakdown: Vec<ComponentBreakdownLine>,
    pub issued_at: DateTime<Utc>,
}
