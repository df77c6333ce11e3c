use std::sync::Arc;

use crate::domain::entities::school_configuration::SchoolConfiguration;
use crate::domain::repositories::payroll_repositories::{
    DepartmentRepository, EmployeeBalanceAdjustmentRepository, EmployeePayableItemRepository,
    EmployeePaymentRepository, EmployeeRepository, EmployeeSalaryComponentRepository,
    PayrollRunEmployeeDetailRepository, PayrollRunRepository, PayslipRepository,
    PositionRepository, SalaryComponentDefinitionRepository,
};
use crate::domain::repositories::school_repositories::{
    AppliedChargeRepository, ChargeConceptRepository, CreditNoteRepository,
    ExchangeRateRepository, ExpenseRepository, GradeLevelRepository, InvoiceRepository,
    PaymentRepository, RepresentativeRepository, StudentRepository,
};

use super::in_memory::InMemoryStore;

/// Composition root handed to every usecase function. Bundling the
/// repository traits behind one struct of `Arc<dyn Trait>` fields keeps
/// usecase signatures to a single parameter instead of a wall of generic
/// bounds, while each field still goes through its trait — swapping the
/// backing store means rebuilding one `Repositories` value, not touching
/// usecase code.
///
/// `store` additionally exposes the two operations §5 requires real
/// serialisation for (the invoice/credit-note correlative draw and the
/// per-representative credit-reapplication lock) — those are intentionally
/// not modelled as repository-trait methods, so usecases that need them
/// reach for the concrete store directly.
#[derive(Clone)]
pub struct Repositories {
    pub representatives: Arc<dyn RepresentativeRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub grade_levels: Arc<dyn GradeLevelRepository>,
    pub charge_concepts: Arc<dyn ChargeConceptRepository>,
    pub exchange_rates: Arc<dyn ExchangeRateRepository>,
    pub applied_charges: Arc<dyn AppliedChargeRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub credit_notes: Arc<dyn CreditNoteRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,

    pub departments: Arc<dyn DepartmentRepository>,
    pub positions: Arc<dyn PositionRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub salary_component_definitions: Arc<dyn SalaryComponentDefinitionRepository>,
    pub employee_salary_components: Arc<dyn EmployeeSalaryComponentRepository>,
    pub payroll_runs: Arc<dyn PayrollRunRepository>,
    pub payroll_run_employee_details: Arc<dyn PayrollRunEmployeeDetailRepository>,
    pub employee_payable_items: Arc<dyn EmployeePayableItemRepository>,
    pub employee_payments: Arc<dyn EmployeePaymentRepository>,
    pub employee_balance_adjustments: Arc<dyn EmployeeBalanceAdjustmentRepository>,
    pub payslips: Arc<dyn PayslipRepository>,

    pub store: Arc<InMemoryStore>,
}

impl Repositories {
    pub fn in_memory(school_configuration: SchoolConfiguration) -> Self {
        let store = Arc::new(InMemoryStore::new(school_configuration));
        Self {
            representatives: store.clone(),
            students: store.clone(),
            grade_levels: store.clone(),
            charge_concepts: store.clone(),
            exchange_rates: store.clone(),
            applied_charges: store.clone(),
            payments: store.clone(),
            invoices: store.clone(),
            credit_notes: store.clone(),
            expenses: store.clone(),

            departments: store.clone(),
            positions: store.clone(),
            employees: store.clone(),
            salary_component_definitions: store.clone(),
            employee_salary_components: store.clone(),
            payroll_runs: store.clone(),
            payroll_run_employee_details: store.clone(),
            employee_payable_items: store.clone(),
            employee_payments: store.clone(),
            employee_balance_adjustments: store.clone(),
            payslips: store.clone(),

            store,
        }
    }
}
