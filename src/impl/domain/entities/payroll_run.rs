use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::organization::PayFrequency;

use super::ids::{EmployeeId, PayrollRunEmployeeDetailId, PayrollRunId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayrollRunStatus {
    Draft,
    Confirmed,
    PaidOut,
    Cancelled,
}

/// A periodic payroll draft — §3/§4.8.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRun {
    pub id: PayrollRunId,
    pub name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub pay_frequency_covered: PayFrequency,
    pub exchange_rate_usd_ves: Option<Decimal>,
    pub status: PayrollRunStatus,
    pub confirmed_by: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// One line item in a serialised component breakdown — earning or deduction,
/// already converted to VES.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentBreakdownLine {
    pub name: String,
    pub component_type: super::salary_component::ComponentType,
    pub amount_ves: Decimal,
}

/// Per-employee result of a confirmed run — §3. Unique per (run, employee).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunEmployeeDetail {
    pub id: PayrollRunEmployeeDetailId,
    pub payroll_run_id: PayrollRunId,
    pub employee_id: EmployeeId,
    pub base_salary_ves: Decimal,
    pub total_earnings_ves: Decimal,
    pub total_deductions_ves: Decimal,
    pub net_amount_to_pay_ves: Decimal,
    pub component_breakdown: Vec<ComponentBreakdownLine>,
    pub hours_processed: Option<Decimal>,
    pub processing_note: Option<String>,
}
