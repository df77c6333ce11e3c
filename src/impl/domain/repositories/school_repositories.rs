use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::domain::entities::applied_charge::AppliedCharge;
use crate::domain::entities::charge_concept::ChargeConcept;
use crate::domain::entities::credit_note::CreditNote;
use crate::domain::entities::exchange_rate::ExchangeRate;
use crate::domain::entities::expense::Expense;
use crate::domain::entities::ids::{
    AppliedChargeId, ChargeConceptId, CreditNoteId, ExchangeRateId, ExpenseId, GradeLevelId,
    InvoiceId, PaymentId, RepresentativeId, StudentId,
};
use crate::domain::entities::invoice::Invoice;
use crate::domain::entities::payment::{Payment, PaymentAllocation};
use crate::domain::entities::representative::Representative;
use crate::domain::entities::student::{GradeLevel, Student};
use crate::money::Currency;
use chrono::NaiveDate;

#[async_trait]
pub trait RepresentativeRepository: Send + Sync {
    async fn get(&self, id: RepresentativeId) -> Result<Representative, ServerError>;
    async fn list(&self) -> Result<Vec<Representative>, ServerError>;
    async fn save(&self, representative: Representative) -> Result<(), ServerError>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn get(&self, id: StudentId) -> Result<Student, ServerError>;
    async fn list(&self) -> Result<Vec<Student>, ServerError>;
    async fn save(&self, student: Student) -> Result<(), ServerError>;
}

#[async_trait]
pub trait GradeLevelRepository: Send + Sync {
    async fn get(&self, id: GradeLevelId) -> Result<GradeLevel, ServerError>;
    async fn list(&self) -> Result<Vec<GradeLevel>, ServerError>;
    async fn save(&self, grade_level: GradeLevel) -> Result<(), ServerError>;
}

#[async_trait]
pub trait ChargeConceptRepository: Send + Sync {
    async fn get(&self, id: ChargeConceptId) -> Result<ChargeConcept, ServerError>;
    async fn list(&self) -> Result<Vec<ChargeConcept>, ServerError>;
    async fn save(&self, concept: ChargeConcept) -> Result<(), ServerError>;
}

#[async_trait]
pub trait ExchangeRateRepository: Send + Sync {
    async fn get(&self, id: ExchangeRateId) -> Result<ExchangeRate, ServerError>;
    async fn list(&self) -> Result<Vec<ExchangeRate>, ServerError>;
    async fn save(&self, rate: ExchangeRate) -> Result<(), ServerError>;

    /// Exact match on `(from, to, rate_date)`, for the uniqueness check in
    /// `put_rate` (§4.1).
    async fn find_exact(
        &self,
        from: Currency,
        to: Currency,
        rate_date: NaiveDate,
    ) -> Result<Option<ExchangeRate>, ServerError>;

    /// Greatest `rate_date <= on_date`, tie-broken by creation time
    /// descending — §4.1 `latest_rate`.
    async fn find_latest_on_or_before(
        &self,
        from: Currency,
        to: Currency,
        on_date: NaiveDate,
    ) -> Result<Option<ExchangeRate>, ServerError>;
}

#[async_trait]
pub trait AppliedChargeRepository: Send + Sync {
    async fn get(&self, id: AppliedChargeId) -> Result<AppliedCharge, ServerError>;
    async fn list(&self) -> Result<Vec<AppliedCharge>, ServerError>;
    async fn save(&self, charge: AppliedCharge) -> Result<(), ServerError>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn get(&self, id: PaymentId) -> Result<Payment, ServerError>;
    async fn list(&self) -> Result<Vec<Payment>, ServerError>;
    async fn save(&self, payment: Payment) -> Result<(), ServerError>;

    async fn list_allocations(&self) -> Result<Vec<PaymentAllocation>, ServerError>;
    async fn save_allocation(&self, allocation: PaymentAllocation) -> Result<(), ServerError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn get(&self, id: InvoiceId) -> Result<Invoice, ServerError>;
    async fn list(&self) -> Result<Vec<Invoice>, ServerError>;
    async fn save(&self, invoice: Invoice) -> Result<(), ServerError>;
}

#[async_trait]
pub trait CreditNoteRepository: Send + Sync {
    async fn get(&self, id: CreditNoteId) -> Result<CreditNote, ServerError>;
    async fn list(&self) -> Result<Vec<CreditNote>, ServerError>;
    async fn save(&self, credit_note: CreditNote) -> Result<(), ServerError>;
}

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn get(&self, id: ExpenseId) -> Result<Expense, ServerError>;
    async fn list(&self) -> Result<Vec<Expense>, ServerError>;
    async fn save(&self, expense: Expense) -> Result<(), ServerError>;
}

// `SchoolConfiguration` is not behind a generic repository trait: drawing its
// correlative is one of the two operations §5 calls out as needing real
// serialisation, so it is exposed as a locked, transactional operation on
// the concrete `InMemoryStore` (see `data::repositories::in_memory::store`)
// rather than a plain get/save pair a careless caller could race.
