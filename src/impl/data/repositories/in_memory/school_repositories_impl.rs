use async_trait::async_trait;
use chrono::NaiveDate;
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
use crate::domain::repositories::school_repositories::{
    AppliedChargeRepository, ChargeConceptRepository, CreditNoteRepository,
    ExchangeRateRepository, ExpenseRepository, GradeLevelRepository, InvoiceRepository,
    PaymentRepository, RepresentativeRepository, StudentRepository,
};
use crate::errors::{
    AppliedChargeNotFound, ChargeConceptNotFound, CreditNoteNotFound, ExchangeRateNotFound,
    ExpenseNotFound, GradeLevelNotFound, InvoiceNotFound, PaymentNotFound, RepresentativeNotFound,
    StudentNotFound,
};
use crate::money::Currency;

use super::store::InMemoryStore;

#[async_trait]
impl RepresentativeRepository for InMemoryStore {
    async fn get(&self, id: RepresentativeId) -> Result<Representative, ServerError> {
        self.representatives
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RepresentativeNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<Representative>, ServerError> {
        Ok(self.representatives.read().await.values().cloned().collect())
    }

    async fn save(&self, representative: Representative) -> Result<(), ServerError> {
        self.representatives.write().await.insert(representative.id, representative);
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for InMemoryStore {
    async fn get(&self, id: StudentId) -> Result<Student, ServerError> {
        self.students.read().await.get(&id).cloned().ok_or_else(|| StudentNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<Student>, ServerError> {
        Ok(self.students.read().await.values().cloned().collect())
    }

    async fn save(&self, student: Student) -> Result<(), ServerError> {
        self.students.write().await.insert(student.id, student);
        Ok(())
    }
}

#[async_trait]
impl GradeLevelRepository for InMemoryStore {
    async fn get(&self, id: GradeLevelId) -> Result<GradeLevel, ServerError> {
        self.grade_levels.read().await.get(&id).cloned().ok_or_else(|| GradeLevelNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<GradeLevel>, ServerError> {
        Ok(self.grade_levels.read().await.values().cloned().collect())
    }

    async fn save(&self, grade_level: GradeLevel) -> Result<(), ServerError> {
        self.grade_levels.write().await.insert(grade_level.id, grade_level);
        Ok(())
    }
}

#[async_trait]
impl ChargeConceptRepository for InMemoryStore {
    async fn get(&self, id: ChargeConceptId) -> Result<ChargeConcept, ServerError> {
        self.charge_concepts.read().await.get(&id).cloned().ok_or_else(|| ChargeConceptNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<ChargeConcept>, ServerError> {
        Ok(self.charge_concepts.read().await.values().cloned().collect())
    }

    async fn save(&self, concept: ChargeConcept) -> Result<(), ServerError> {
        self.charge_concepts.write().await.insert(concept.id, concept);
        Ok(())
    }
}

#[async_trait]
impl ExchangeRateRepository for InMemoryStore {
    async fn get(&self, id: ExchangeRateId) -> Result<ExchangeRate, ServerError> {
        self.exchange_rates.read().await.get(&id).cloned().ok_or_else(|| ExchangeRateNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<ExchangeRate>, ServerError> {
        Ok(self.exchange_rates.read().await.values().cloned().collect())
    }

    async fn save(&self, rate: ExchangeRate) -> Result<(), ServerError> {
        self.exchange_rates.write().await.insert(rate.id, rate);
        Ok(())
    }

    async fn find_exact(
        &self,
        from: Currency,
        to: Currency,
        rate_date: NaiveDate,
    ) -> Result<Option<ExchangeRate>, ServerError> {
        Ok(self
            .exchange_rates
            .read()
            .await
            .values()
            .find(|r| r.from_currency == from && r.to_currency == to && r.rate_date == rate_date)
            .cloned())
    }

    async fn find_latest_on_or_before(
        &self,
        from: Currency,
        to: Currency,
        on_date: NaiveDate,
    ) -> Result<Option<ExchangeRate>, ServerError> {
        Ok(self
            .exchange_rates
            .read()
            .await
            .values()
            .filter(|r| r.from_currency == from && r.to_currency == to && r.rate_date <= on_date)
            .max_by_key(|r| (r.rate_date, r.created_at))
            .cloned())
    }
}

#[async_trait]
impl AppliedChargeRepository for InMemoryStore {
    async fn get(&self, id: AppliedChargeId) -> Result<AppliedCharge, ServerError> {
        self.applied_charges.read().await.get(&id).cloned().ok_or_else(|| AppliedChargeNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<AppliedCharge>, ServerError> {
        Ok(self.applied_charges.read().await.values().cloned().collect())
    }

    async fn save(&self, charge: AppliedCharge) -> Result<(), ServerError> {
        self.applied_charges.write().await.insert(charge.id, charge);
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn get(&self, id: PaymentId) -> Result<Payment, ServerError> {
        self.payments.read().await.get(&id).cloned().ok_or_else(|| PaymentNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<Payment>, ServerError> {
        Ok(self.payments.read().await.values().cloned().collect())
    }

    async fn save(&self, payment: Payment) -> Result<(), ServerError> {
        self.payments.write().await.insert(payment.id, payment);
        Ok(())
    }

    async fn list_allocations(&self) -> Result<Vec<PaymentAllocation>, ServerError> {
        Ok(self.payment_allocations.read().await.values().cloned().collect())
    }

    async fn save_allocation(&self, allocation: PaymentAllocation) -> Result<(), ServerError> {
        self.payment_allocations.write().await.insert(allocation.id, allocation);
        Ok(())
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryStore {
    async fn get(&self, id: InvoiceId) -> Result<Invoice, ServerError> {
        self.invoices.read().await.get(&id).cloned().ok_or_else(|| InvoiceNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<Invoice>, ServerError> {
        Ok(self.invoices.read().await.values().cloned().collect())
    }

    async fn save(&self, invoice: Invoice) -> Result<(), ServerError> {
        self.invoices.write().await.insert(invoice.id, invoice);
        Ok(())
    }
}

#[async_trait]
impl CreditNoteRepository for InMemoryStore {
    async fn get(&self, id: CreditNoteId) -> Result<CreditNote, ServerError> {
        self.credit_notes.read().await.get(&id).cloned().ok_or_else(|| CreditNoteNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<CreditNote>, ServerError> {
        Ok(self.credit_notes.read().await.values().cloned().collect())
    }

    async fn save(&self, credit_note: CreditNote) -> Result<(), ServerError> {
        self.credit_notes.write().await.insert(credit_note.id, credit_note);
        Ok(())
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryStore {
    async fn get(&self, id: ExpenseId) -> Result<Expense, ServerError> {
        self.expenses.read().await.get(&id).cloned().ok_or_else(|| ExpenseNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<Expense>, ServerError> {
        Ok(self.expenses.read().await.values().cloned().collect())
    }

    async fn save(&self, expense: Expense) -> Result<(), ServerError> {
        self.expenses.write().await.insert(expense.id, expense);
        Ok(())
    }
}
