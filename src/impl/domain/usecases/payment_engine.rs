use chrono::NaiveDate;
use fractic_server_error::ServerError;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::data::repositories::registry::Repositories;
use crate::domain::entities::applied_charge::ChargeStatus;
use crate::domain::entities::ids::{AppliedChargeId, RepresentativeId};
use crate::domain::entities::payment::{Payment, PaymentAllocation, PaymentMethod};
use crate::errors::{
    AllocationExceedsChargeBalance, AllocationExceedsPaymentAmount,
    AppliedChargeNotOpenForAllocation, AppliedChargeNotOwnedByRepresentative,
};
use crate::money::{eq_tolerant, ge_tolerant, le_tolerant, round2, Currency};

use super::currency_service::convert_to_ves;
use super::obligation_ledger::today_value_ves;

pub struct AllocationRequest {
    pub applied_charge_id: AppliedChargeId,
    /// In the payment's own currency.
    pub amount_to_allocate: Decimal,
}

pub struct RecordPaymentResult {
    pub payment: Payment,
    pub allocations: Vec<PaymentAllocation>,
}

/// §4.4 `record_payment`.
#[tracing::instrument(skip(repos, allocations))]
pub async fn record_payment(
    repos: &Repositories,
    representative_id: RepresentativeId,
    payment_date: NaiveDate,
    amount: Decimal,
    currency: Currency,
    allocations: Vec<AllocationRequest>,
    method: PaymentMethod,
    reference: Option<String>,
    notes: Option<String>,
) -> Result<RecordPaymentResult, ServerError> {
    let (amount_ves_equivalent, exchange_rate_applied) =
        convert_to_ves(repos, amount, currency, payment_date).await?;

    let mut charges = Vec::with_capacity(allocations.len());
    let mut allocation_ves = Vec::with_capacity(allocations.len());
    let mut total_allocated_ves = Decimal::ZERO;

    for request in &allocations {
        let charge = repos.applied_charges.get(request.applied_charge_id).await?;
        let student = repos.students.get(charge.student_id).await?;
        if student.representative_id != representative_id {
            return Err(AppliedChargeNotOwnedByRepresentative::new(&charge.id, &representative_id));
        }
        if charge.status.is_terminal() {
            return Err(AppliedChargeNotOpenForAllocation::new(&charge.id));
        }

        let ves_amount = match currency {
            Currency::Ves => round2(request.amount_to_allocate),
            _ => round2(request.amount_to_allocate * exchange_rate_applied.expect("non-VES payment always carries a rate")),
        };

        let balance = today_value_ves(repos, &charge, payment_date).await?;
        if !le_tolerant(ves_amount, balance) {
            return Err(AllocationExceedsChargeBalance::new(&charge.id, &ves_amount));
        }

        total_allocated_ves += ves_amount;
        allocation_ves.push(ves_amount);
        charges.push(charge);
    }

    if !le_tolerant(total_allocated_ves, amount_ves_equivalent) {
        return Err(AllocationExceedsPaymentAmount::new(&total_allocated_ves, &amount_ves_equivalent));
    }

    let payment = Payment {
        id: Uuid::new_v4(),
        representative_id,
        payment_date,
        amount_paid: amount,
        currency_paid: currency,
        exchange_rate_applied,
        amount_paid_ves_equivalent: amount_ves_equivalent,
        method,
        reference,
        notes,
    };

    let mut saved_allocations = Vec::with_capacity(charges.len());
    for ((mut charge, ves_amount), request) in
        charges.into_iter().zip(allocation_ves.into_iter()).zip(allocations.iter())
    {
        apply_allocation_to_charge(
            repos,
            &mut charge,
            currency,
            request.amount_to_allocate,
            ves_amount,
            payment_date,
        )
        .await?;
        repos.applied_charges.save(charge.clone()).await?;

        let allocation = PaymentAllocation {
            id: Uuid::new_v4(),
            payment_id: payment.id,
            applied_charge_id: charge.id,
            amount_allocated_ves: ves_amount,
        };
        repos.payments.save_allocation(allocation.clone()).await?;
        saved_allocations.push(allocation);
    }
    repos.payments.save(payment.clone()).await?;

    tracing::info!(payment_id = %payment.id, "payment recorded");
    Ok(RecordPaymentResult { payment, allocations: saved_allocations })
}

/// Credits a charge's paid amounts with a new allocation and recomputes
/// status — the shared tail of §4.4 step 4, also reused by C6 (which always
/// allocates in VES, so `paid_in_currency` is `Ves` and
/// `paid_in_original_currency_amount` equals `ves_amount` there).
pub(crate) async fn apply_allocation_to_charge(
    repos: &Repositories,
    charge: &mut crate::domain::entities::applied_charge::AppliedCharge,
    paid_in_currency: Currency,
    paid_in_original_currency_amount: Decimal,
    ves_amount: Decimal,
    on_date: NaiveDate,
) -> Result<(), ServerError> {
    charge.amount_paid_ves = round2(charge.amount_paid_ves + ves_amount);

    if charge.is_indexed {
        if paid_in_currency == charge.original_concept_currency {
            // Same currency as the charge: credit the original-currency
            // amount directly, no reconversion needed.
            charge.amount_paid_original_currency_equivalent =
                round2(charge.amount_paid_original_currency_equivalent + paid_in_original_currency_amount);
        } else {
            let rate = repos
                .exchange_rates
                .find_latest_on_or_before(charge.original_concept_currency, Currency::Ves, on_date)
                .await?
                .ok_or_else(|| crate::errors::RateMissing::new(charge.original_concept_currency.code(), Currency::Ves.code(), &on_date))?;
            charge.amount_paid_original_currency_equivalent =
                round2(charge.amount_paid_original_currency_equivalent + ves_amount / rate.rate);
        }
    } else {
        charge.amount_paid_original_currency_equivalent = charge.amount_paid_ves;
    }

    let fully_paid = ge_tolerant(charge.amount_paid_original_currency_equivalent, charge.amount_due_original_currency)
        || eq_tolerant(charge.amount_paid_original_currency_equivalent, charge.amount_due_original_currency);
    charge.status = if fully_paid {
        ChargeStatus::Paid
    } else if charge.amount_paid_ves > Decimal::ZERO {
        ChargeStatus::PartiallyPaid
    } else {
        charge.status
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::charge_concept::{ChargeConcept, ChargeFrequency};
    use crate::domain::entities::representative::{Identification, IdentificationType, Representative};
    use crate::domain::entities::school_configuration::SchoolConfiguration;
    use crate::domain::entities::student::{GradeLevel, Student};
    use crate::domain::usecases::obligation_ledger::issue_charge;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn fresh_repos() -> Repositories {
        Repositories::in_memory(SchoolConfiguration {
            school_name: "Colegio Test".into(),
            school_rif: "J-00000000-0".into(),
            school_address: "Caracas".into(),
            invoice_number_prefix: "INV-".into(),
            next_internal_invoice_reference: 1,
            credit_note_number_prefix: "CN-".into(),
            next_credit_note_reference: 1,
            default_iva_percentage: dec!(0.16),
            payment_due_day: Some(5),
        })
    }

    async fn seed_family(repos: &Repositories) -> (RepresentativeId, AppliedChargeId) {
        let rep = Representative {
            id: Uuid::new_v4(),
            first_name: "Maria".into(),
            last_name: "Gomez".into(),
            identification: Identification { id_type: IdentificationType::V, number: "12345678".into() },
            email: "maria@example.com".into(),
            phones: vec![],
            address: Some("Av. Libertador".into()),
            rif: None,
            available_credit_ves: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repos.representatives.save(rep.clone()).await.unwrap();

        let grade = GradeLevel { id: Uuid::new_v4(), name: "1ro".into(), order_index: 1, is_active: true };
        repos.grade_levels.save(grade.clone()).await.unwrap();
        let student = Student {
            id: Uuid::new_v4(),
            first_name: "Ana".into(),
            last_name: "Gomez".into(),
            identity: None,
            birth_date: None,
            grade_level_id: grade.id,
            representative_id: rep.id,
            is_active: true,
            has_scholarship: false,
            scholarship_percentage: Decimal::ZERO,
            scholarship_fixed_amount_ves: Decimal::ZERO,
        };
        repos.students.save(student.clone()).await.unwrap();

        let concept = ChargeConcept {
            id: Uuid::new_v4(),
            name: "Mensualidad".into(),
            default_amount: dec!(1000.00),
            default_amount_currency: Currency::Ves,
            default_frequency: ChargeFrequency::Monthly,
            category: "tuition".into(),
            iva_percentage: dec!(0.16),
            applicable_grade_level: None,
            is_active: true,
        };
        repos.charge_concepts.save(concept.clone()).await.unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let charge = issue_charge(
            repos,
            student.id,
            concept.id,
            "June tuition".into(),
            today,
            today,
            ChargeStatus::Pending,
        )
        .await
        .unwrap();

        (rep.id, charge.id)
    }

    #[tokio::test]
    async fn full_payment_marks_charge_paid() {
        let repos = fresh_repos();
        let (rep_id, charge_id) = seed_family(&repos).await;

        let result = record_payment(
            &repos,
            rep_id,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            dec!(1000.00),
            Currency::Ves,
            vec![AllocationRequest { applied_charge_id: charge_id, amount_to_allocate: dec!(1000.00) }],
            PaymentMethod::Cash,
            None,
            None,
        )
        .await
        .unwrap();

        let updated = repos.applied_charges.get(charge_id).await.unwrap();
        assert_eq!(updated.status, ChargeStatus::Paid);
        assert_eq!(result.allocations.len(), 1);
    }

    #[tokio::test]
    async fn partial_payment_leaves_charge_partially_paid() {
        let repos = fresh_repos();
        let (rep_id, charge_id) = seed_family(&repos).await;

        record_payment(
            &repos,
            rep_id,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            dec!(400.00),
            Currency::Ves,
            vec![AllocationRequest { applied_charge_id: charge_id, amount_to_allocate: dec!(400.00) }],
            PaymentMethod::Transfer,
            None,
            None,
        )
        .await
        .unwrap();

        let updated = repos.applied_charges.get(charge_id).await.unwrap();
        assert_eq!(updated.status, ChargeStatus::PartiallyPaid);
        assert_eq!(updated.amount_paid_ves, dec!(400.00));
    }

    #[tokio::test]
    async fn over_allocation_against_balance_is_rejected() {
        let repos = fresh_repos();
        let (rep_id, charge_id) = seed_family(&repos).await;

        let err = record_payment(
            &repos,
            rep_id,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            dec!(5000.00),
            Currency::Ves,
            vec![AllocationRequest { applied_charge_id: charge_id, amount_to_allocate: dec!(5000.00) }],
            PaymentMethod::Cash,
            None,
            None,
        )
        .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn allocation_sum_exceeding_payment_amount_is_rejected() {
        let repos = fresh_repos();
        let (rep_id, charge_id) = seed_family(&repos).await;

        let err = record_payment(
            &repos,
            rep_id,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            dec!(100.00),
            Currency::Ves,
            vec![AllocationRequest { applied_charge_id: charge_id, amount_to_allocate: dec!(1000.00) }],
            PaymentMethod::Cash,
            None,
            None,
        )
        .await;
        assert!(err.is_err());
    }
}
