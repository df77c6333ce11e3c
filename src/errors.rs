use chrono::NaiveDate;
use fractic_server_error::define_client_error;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Mirrors the seven kinds from §7. The section comments below group every
/// constructor by the kind it belongs to; this exists so a future caller
/// (e.g. an HTTP boundary mapping to status codes) can branch on kind
/// without parsing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    BusinessRuleViolation,
    RateMissing,
    Forbidden,
    Internal,
}

// Not-found (§7 `not_found`).
// ---
define_client_error!(RepresentativeNotFound, "Representative '{id}' not found.", { id: &Uuid });
define_client_error!(StudentNotFound, "Student '{id}' not found.", { id: &Uuid });
define_client_error!(GradeLevelNotFound, "Grade level '{id}' not found.", { id: &Uuid });
define_client_error!(ChargeConceptNotFound, "Charge concept '{id}' not found.", { id: &Uuid });
define_client_error!(AppliedChargeNotFound, "Applied charge '{id}' not found.", { id: &Uuid });
define_client_error!(PaymentNotFound, "Payment '{id}' not found.", { id: &Uuid });
define_client_error!(InvoiceNotFound, "Invoice '{id}' not found.", { id: &Uuid });
define_client_error!(CreditNoteNotFound, "Credit note '{id}' not found.", { id: &Uuid });
define_client_error!(EmployeeNotFound, "Employee '{id}' not found.", { id: &Uuid });
define_client_error!(DepartmentNotFound, "Department '{id}' not found.", { id: &Uuid });
define_client_error!(PositionNotFound, "Position '{id}' not found.", { id: &Uuid });
define_client_error!(
    SalaryComponentDefinitionNotFound,
    "Salary component definition '{id}' not found.",
    { id: &Uuid }
);
define_client_error!(
    EmployeeSalaryComponentNotFound,
    "Employee salary component assignment '{id}' not found.",
    { id: &Uuid }
);
define_client_error!(PayrollRunNotFound, "Payroll run '{id}' not found.", { id: &Uuid });
define_client_error!(
    EmployeePayableItemNotFound,
    "Employee payable item '{id}' not found.",
    { id: &Uuid }
);
define_client_error!(EmployeePaymentNotFound, "Employee payment '{id}' not found.", { id: &Uuid });
define_client_error!(PayslipNotFound, "Payslip '{id}' not found.", { id: &Uuid });
define_client_error!(ExpenseNotFound, "Expense '{id}' not found.", { id: &Uuid });
define_client_error!(
    SchoolConfigurationMissing,
    "School configuration has not been initialised."
);

// Validation (§7 `validation`).
// ---
define_client_error!(
    DueDateBeforeIssueDate,
    "Due date ({due_date}) must not be before issue date ({issue_date}).",
    { issue_date: &NaiveDate, due_date: &NaiveDate }
);
define_client_error!(UnsupportedCurrency, "Unsupported currency code: '{code}'.", { code: &str });
define_client_error!(
    PercentageOutOfRange,
    "Percentage must be within [0, 100], got {value}.",
    { value: &Decimal }
);
define_client_error!(NonPositiveRate, "Exchange rate must be greater than zero, got {value}.", { value: &Decimal });
define_client_error!(EmptyChargeSelection, "At least one applied charge must be selected.");
define_client_error!(MissingBillToAddress, "An invoice requires a bill-to address.");
define_client_error!(
    PeriodStartNotBeforeEnd,
    "Payroll period start ({start}) must be before period end ({end}).",
    { start: &NaiveDate, end: &NaiveDate }
);
define_client_error!(MissingManualControlNumber, "Forma libre emission requires a manual control number.");
define_client_error!(
    HoursRequiredForHourlyEmployee,
    "Employee '{id}' is paid hourly; hours processed must be supplied to confirm the run.",
    { id: &Uuid }
);
define_client_error!(InvalidMonth, "Month must be between 1 and 12, got {month}.", { month: &u32 });

// Conflict (§7 `conflict`).
// ---
define_client_error!(
    DuplicateExchangeRate,
    "An exchange rate for {from}->{to} on {date} already exists.",
    { from: &str, to: &str, date: &NaiveDate }
);
define_client_error!(
    DuplicateManualControlNumber,
    "Manual control number '{value}' is already in use.",
    { value: &str }
);
define_client_error!(
    DuplicateFiscalInvoiceNumber,
    "Fiscal invoice number '{value}' is already in use.",
    { value: &str }
);
define_client_error!(
    DuplicateFiscalControlNumber,
    "Fiscal control number '{value}' is already in use.",
    { value: &str }
);
define_client_error!(InvoiceAlreadyAnnulled, "Invoice '{id}' has already been annulled.", { id: &Uuid });
define_client_error!(
    InvoiceAlreadyHasCreditNote,
    "Invoice '{id}' is already linked to a credit note.",
    { id: &Uuid }
);
define_client_error!(
    DuplicateRepresentativeIdentification,
    "A representative with identification '{value}' already exists.",
    { value: &str }
);
define_client_error!(
    DuplicateRepresentativeEmail,
    "A representative with email '{value}' already exists.",
    { value: &str }
);
define_client_error!(DuplicateChargeConceptName, "A charge concept named '{value}' already exists.", { value: &str });
define_client_error!(DuplicateGradeLevelName, "A grade level named '{value}' already exists.", { value: &str });
define_client_error!(
    DuplicateEmployeeSalaryComponent,
    "Employee '{employee_id}' is already assigned definition '{definition_id}'.",
    { employee_id: &Uuid, definition_id: &Uuid }
);
define_client_error!(
    DuplicatePayrollRunEmployeeDetail,
    "Employee '{employee_id}' already has a detail row for run '{run_id}'.",
    { employee_id: &Uuid, run_id: &Uuid }
);

// Business rule violation (§7 `business_rule_violation`).
// ---
define_client_error!(StudentInactive, "Student '{id}' is not active.", { id: &Uuid });
define_client_error!(ChargeConceptInactive, "Charge concept '{id}' is not active.", { id: &Uuid });
define_client_error!(
    GradeLevelHasActiveStudents,
    "Grade level '{id}' cannot be deactivated while it has active students.",
    { id: &Uuid }
);
define_client_error!(
    ChargeConceptHasOpenCharges,
    "Charge concept '{id}' cannot be deactivated while it has open applied charges.",
    { id: &Uuid }
);
define_client_error!(
    AppliedChargeNotEditable,
    "Applied charge '{id}' is in a terminal state and cannot be edited beyond its description.",
    { id: &Uuid }
);
define_client_error!(
    AppliedChargeNotOpenForAllocation,
    "Applied charge '{id}' is paid or cancelled and cannot receive further allocations.",
    { id: &Uuid }
);
define_client_error!(
    AppliedChargeNotOwnedByRepresentative,
    "Applied charge '{id}' does not belong to a student of representative '{representative_id}'.",
    { id: &Uuid, representative_id: &Uuid }
);
define_client_error!(
    AllocationExceedsChargeBalance,
    "Allocation of {amount} VES to charge '{id}' exceeds its outstanding balance.",
    { id: &Uuid, amount: &Decimal }
);
define_client_error!(
    AllocationExceedsPaymentAmount,
    "Sum of allocations ({allocated}) exceeds the payment's VES equivalent ({available}).",
    { allocated: &Decimal, available: &Decimal }
);
define_client_error!(
    AppliedChargeAlreadyInvoiced,
    "Applied charge '{id}' is already linked to an invoice.",
    { id: &Uuid }
);
define_client_error!(
    AppliedChargeHasNoConcept,
    "Applied charge '{id}' has no charge concept and cannot be invoiced (IVA undetermined).",
    { id: &Uuid }
);
define_client_error!(
    PayrollRunNotDraft,
    "Payroll run '{id}' is not a draft and cannot be confirmed in place.",
    { id: &Uuid }
);
define_client_error!(
    PayrollRunTransitionForbidden,
    "Payroll run '{id}' cannot transition from {from} to {to}.",
    { id: &Uuid, from: &str, to: &str }
);
define_client_error!(
    PayrollRunNotDeletableDraft,
    "Payroll run '{id}' can only be deleted while it is a draft.",
    { id: &Uuid }
);
define_client_error!(
    BalanceAdjustmentDeductionRequiresTarget,
    "A deduction-type balance adjustment for employee '{id}' must target an existing payable item.",
    { id: &Uuid }
);
define_client_error!(
    EmployeePayableItemNotOpenForAllocation,
    "Employee payable item '{id}' is already paid and cannot receive further allocations.",
    { id: &Uuid }
);
define_client_error!(
    EmployeePayableItemNotOwnedByEmployee,
    "Employee payable item '{id}' does not belong to employee '{employee_id}'.",
    { id: &Uuid, employee_id: &Uuid }
);
define_client_error!(
    EmployeePaymentWouldOverdrawItem,
    "Payout allocation would leave payable item '{id}' with a negative outstanding balance.",
    { id: &Uuid }
);

// Rate missing (§7 `rate_missing`).
// ---
define_client_error!(
    RateMissing,
    "No exchange rate from {from} to {to} is available on or before {date}.",
    { from: &str, to: &str, date: &NaiveDate }
);

// Forbidden (§7 `forbidden`).
// ---
define_client_error!(SuperuserRequired, "This operation requires a superuser.");
define_client_error!(CannotRemoveLastSuperuser, "Cannot remove the last remaining superuser.");
define_client_error!(CannotSelfDeactivate, "A user cannot deactivate their own account.");
