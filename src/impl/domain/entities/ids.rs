use uuid::Uuid;

pub type RepresentativeId = Uuid;
pub type StudentId = Uuid;
pub type GradeLevelId = Uuid;
pub type ChargeConceptId = Uuid;
pub type ExchangeRateId = Uuid;
pub type AppliedChargeId = Uuid;
pub type PaymentId = Uuid;
pub type InvoiceId = Uuid;
pub type CreditNoteId = Uuid;
pub type DepartmentId = Uuid;
pub type PositionId = Uuid;
pub type EmployeeId = Uuid;
pub type SalaryComponentDefinitionId = Uuid;
pub type EmployeeSalaryComponentId = Uuid;
pub type PayrollRunId = Uuid;
pub type PayrollRunEmployeeDetailId = Uuid;
pub type EmployeePayableItemId = Uuid;
pub type EmployeePaymentId = Uuid;
pub type EmployeePaymentAllocationId = Uuid;
pub type EmployeeBalanceAdjustmentId = Uuid;
pub type PayslipId = Uuid;
pub type PaymentAllocationId = Uuid;
pub type ExpenseId = Uuid;
