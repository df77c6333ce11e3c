use std::collections::HashMap;
use std::sync::Arc;

use fractic_server_error::CriticalError;
use fractic_server_error::ServerError;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::domain::entities::applied_charge::AppliedCharge;
use crate::domain::entities::charge_concept::ChargeConcept;
use crate::domain::entities::credit_note::CreditNote;
use crate::domain::entities::employee_balance_adjustment::EmployeeBalanceAdjustment;
use crate::domain::entities::employee_payable_item::EmployeePayableItem;
use crate::domain::entities::employee_payment::{EmployeePayment, EmployeePaymentAllocation};
use crate::domain::entities::exchange_rate::ExchangeRate;
use crate::domain::entities::expense::Expense;
use crate::domain::entities::ids::RepresentativeId;
use crate::domain::entities::invoice::Invoice;
use crate::domain::entities::organization::{Department, Employee, Position};
use crate::domain::entities::payment::{Payment, PaymentAllocation};
use crate::domain::entities::payroll_run::{PayrollRun, PayrollRunEmployeeDetail};
use crate::domain::entities::payslip::Payslip;
use crate::domain::entities::representative::Representative;
use crate::domain::entities::salary_component::{EmployeeSalaryComponent, SalaryComponentDefinition};
use crate::domain::entities::school_configuration::SchoolConfiguration;
use crate::domain::entities::student::{GradeLevel, Student};

/// In-memory stand-in for the persistence layer, per DESIGN NOTES option (b)
/// — "a repository layer that returns fully hydrated aggregates for the use
/// cases." Each table is its own `RwLock<HashMap<_, _>>`, so unrelated
/// aggregates never contend; the two serialisation points required by §5 are
/// modelled explicitly rather than left to accident:
///
/// - `school_configuration` is a single `Mutex`, and its correlative draws
///   happen only inside [`Self::draw_invoice_number`] /
///   [`Self::draw_credit_note_number`], which hold the guard for the whole
///   read-increment-write.
/// - [`Self::with_representative_lock`] hands out a per-representative
///   mutex from `representative_locks`, so a credit reapplication run cannot
///   interleave with a concurrent payment or billing batch touching the same
///   representative.
pub struct InMemoryStore {
    pub(crate) representatives: RwLock<HashMap<Uuid, Representative>>,
    pub(crate) students: RwLock<HashMap<Uuid, Student>>,
    pub(crate) grade_levels: RwLock<HashMap<Uuid, GradeLevel>>,
    pub(crate) charge_concepts: RwLock<HashMap<Uuid, ChargeConcept>>,
    pub(crate) exchange_rates: RwLock<HashMap<Uuid, ExchangeRate>>,
    pub(crate) applied_charges: RwLock<HashMap<Uuid, AppliedCharge>>,
    pub(crate) payments: RwLock<HashMap<Uuid, Payment>>,
    pub(crate) payment_allocations: RwLock<HashMap<Uuid, PaymentAllocation>>,
    pub(crate) invoices: RwLock<HashMap<Uuid, Invoice>>,
    pub(crate) credit_notes: RwLock<HashMap<Uuid, CreditNote>>,
    pub(crate) school_configuration: Mutex<SchoolConfiguration>,

    pub(crate) departments: RwLock<HashMap<Uuid, Department>>,
    pub(crate) positions: RwLock<HashMap<Uuid, Position>>,
    pub(crate) employees: RwLock<HashMap<Uuid, Employee>>,
    pub(crate) salary_component_definitions: RwLock<HashMap<Uuid, SalaryComponentDefinition>>,
    pub(crate) employee_salary_components: RwLock<HashMap<Uuid, EmployeeSalaryComponent>>,
    pub(crate) payroll_runs: RwLock<HashMap<Uuid, PayrollRun>>,
    pub(crate) payroll_run_employee_details: RwLock<HashMap<Uuid, PayrollRunEmployeeDetail>>,
    pub(crate) employee_payable_items: RwLock<HashMap<Uuid, EmployeePayableItem>>,
    pub(crate) employee_payments: RwLock<HashMap<Uuid, EmployeePayment>>,
    pub(crate) employee_payment_allocations: RwLock<HashMap<Uuid, EmployeePaymentAllocation>>,
    pub(crate) employee_balance_adjustments: RwLock<HashMap<Uuid, EmployeeBalanceAdjustment>>,
    pub(crate) payslips: RwLock<HashMap<Uuid, Payslip>>,
    pub(crate) expenses: RwLock<HashMap<Uuid, Expense>>,

    representative_locks: Mutex<HashMap<RepresentativeId, Arc<Mutex<()>>>>,
}

impl InMemoryStore {
    pub fn new(school_configuration: SchoolConfiguration) -> Self {
        Self {
            representatives: RwLock::new(HashMap::new()),
            students: RwLock::new(HashMap::new()),
            grade_levels: RwLock::new(HashMap::new()),
            charge_concepts: RwLock::new(HashMap::new()),
            exchange_rates: RwLock::new(HashMap::new()),
            applied_charges: RwLock::new(HashMap::new()),
            payments: RwLock::new(HashMap::new()),
            payment_allocations: RwLock::new(HashMap::new()),
            invoices: RwLock::new(HashMap::new()),
            credit_notes: RwLock::new(HashMap::new()),
            school_configuration: Mutex::new(school_configuration),

            departments: RwLock::new(HashMap::new()),
            positions: RwLock::new(HashMap::new()),
            employees: RwLock::new(HashMap::new()),
            salary_component_definitions: RwLock::new(HashMap::new()),
            employee_salary_components: RwLock::new(HashMap::new()),
            payroll_runs: RwLock::new(HashMap::new()),
            payroll_run_employee_details: RwLock::new(HashMap::new()),
            employee_payable_items: RwLock::new(HashMap::new()),
            employee_payments: RwLock::new(HashMap::new()),
            employee_payment_allocations: RwLock::new(HashMap::new()),
            employee_balance_adjustments: RwLock::new(HashMap::new()),
            payslips: RwLock::new(HashMap::new()),
            expenses: RwLock::new(HashMap::new()),

            representative_locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_school_configuration(&self) -> SchoolConfiguration {
        self.school_configuration.lock().await.clone()
    }

    /// §5 serialisation point 1: draws `invoice_number` and increments the
    /// counter atomically under the configuration's own lock.
    pub async fn draw_invoice_number(&self) -> Result<String, ServerError> {
        let mut config = self.school_configuration.lock().await;
        let counter = config.next_internal_invoice_reference;
        let number = config.format_invoice_number(counter);
        config.next_internal_invoice_reference = counter + 1;
        Ok(number)
    }

    /// §5 serialisation point 1, credit-note side.
    pub async fn draw_credit_note_number(&self) -> Result<String, ServerError> {
        let mut config = self.school_configuration.lock().await;
        let counter = config.next_credit_note_reference;
        let number = config.format_credit_note_number(counter);
        config.next_credit_note_reference = counter + 1;
        Ok(number)
    }

    pub async fn add_representative_credit(
        &self,
        representative_id: RepresentativeId,
        delta_ves: rust_decimal::Decimal,
    ) -> Result<(), ServerError> {
        let mut reps = self.representatives.write().await;
        let rep = reps
            .get_mut(&representative_id)
            .ok_or_else(|| CriticalError::with_debug("representative vanished mid-transaction", &representative_id))?;
        rep.available_credit_ves = crate::money::round2(rep.available_credit_ves + delta_ves);
        Ok(())
    }

    /// §5 serialisation point 2: a per-representative advisory lock so
    /// credit reapplication cannot interleave with a concurrent payment or
    /// recurring-charge batch touching the same representative.
    pub async fn with_representative_lock<F, Fut, R>(
        &self,
        representative_id: RepresentativeId,
        f: F,
    ) -> R
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = R>,
    {
        let lock = {
            let mut table = self.representative_locks.lock().await;
            table
                .entry(representative_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = lock.lock().await;
        f().await
    }
}
