use fractic_server_error::ServerError;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::data::repositories::registry::Repositories;
use crate::domain::entities::ids::RepresentativeId;
use crate::domain::entities::payment::{Payment, PaymentAllocation};
use crate::money::{round2, Currency, TOLERANCE};

use super::payment_engine::apply_allocation_to_charge;

pub struct CreditApplicationResult {
    pub allocations_made: Vec<PaymentAllocation>,
    pub remaining_credit_ves: Decimal,
}

/// §4.6 `apply_representative_credit`. Runs under the representative's
/// advisory lock (§5 serialisation point 2) so it cannot interleave with a
/// concurrent payment or recurring-charge batch touching the same
/// representative.
#[tracing::instrument(skip(repos))]
pub async fn apply_representative_credit(
    repos: &Repositories,
    representative_id: RepresentativeId,
    today: chrono::NaiveDate,
) -> Result<CreditApplicationResult, ServerError> {
    let store = repos.store.clone();
    let repos = repos.clone();
    store
        .with_representative_lock(representative_id, move || async move {
            apply_representative_credit_locked(&repos, representative_id, today).await
        })
        .await
}

async fn unallocated_remainder(repos: &Repositories, payment: &Payment) -> Result<Decimal, ServerError> {
    let allocated: Decimal = repos
        .payments
        .list_allocations()
        .await?
        .into_iter()
        .filter(|a| a.payment_id == payment.id)
        .map(|a| a.amount_allocated_ves)
        .sum();
    Ok(round2(payment.amount_paid_ves_equivalent - allocated))
}

async fn apply_representative_credit_locked(
    repos: &Repositories,
    representative_id: RepresentativeId,
    today: chrono::NaiveDate,
) -> Result<CreditApplicationResult, ServerError> {
    let all_payments = repos.payments.list().await?;
    let mut source_payments = Vec::new();
    let mut total_credit = Decimal::ZERO;
    for payment in all_payments.into_iter().filter(|p| p.representative_id == representative_id) {
        let remainder = unallocated_remainder(repos, &payment).await?;
        if remainder > Decimal::ZERO {
            total_credit += remainder;
            source_payments.push((payment, remainder));
        }
    }
    // Oldest payment date first; ties broken by id for a stable, deterministic
    // order in the absence of a stored creation timestamp on `Payment`.
    source_payments.sort_by(|a, b| (a.0.payment_date, a.0.id).cmp(&(b.0.payment_date, b.0.id)));

    if total_credit <= TOLERANCE {
        return Ok(CreditApplicationResult { allocations_made: vec![], remaining_credit_ves: total_credit.max(Decimal::ZERO) });
    }

    let students = repos.students.list().await?;
    let student_ids: Vec<_> = students.iter().filter(|s| s.representative_id == representative_id).map(|s| s.id).collect();

    let mut open_charges: Vec<_> = repos
        .applied_charges
        .list()
        .await?
        .into_iter()
        .filter(|c| student_ids.contains(&c.student_id) && c.display_status(today).is_open())
        .collect();
    open_charges.sort_by(|a, b| (a.due_date, a.issue_date).cmp(&(b.due_date, b.issue_date)));

    let mut allocations_made = Vec::new();
    let mut source_idx = 0usize;

    for mut charge in open_charges {
        if total_credit <= TOLERANCE {
            break;
        }
        let mut remaining_need = super::obligation_ledger::today_value_ves(repos, &charge, today).await?;
        while remaining_need > TOLERANCE && source_idx < source_payments.len() {
            let (payment, remainder) = &mut source_payments[source_idx];
            if *remainder <= TOLERANCE {
                source_idx += 1;
                continue;
            }
            let slice = remaining_need.min(*remainder);

            apply_allocation_to_charge(repos, &mut charge, Currency::Ves, slice, slice, today).await?;
            repos.applied_charges.save(charge.clone()).await?;

            let allocation = PaymentAllocation {
                id: Uuid::new_v4(),
                payment_id: payment.id,
                applied_charge_id: charge.id,
                amount_allocated_ves: slice,
            };
            repos.payments.save_allocation(allocation.clone()).await?;
            allocations_made.push(allocation);

            *remainder = round2(*remainder - slice);
            remaining_need = round2(remaining_need - slice);
            total_credit = round2(total_credit - slice);

            if *remainder <= TOLERANCE {
                source_idx += 1;
            }
        }
    }

    tracing::info!(representative_id = %representative_id, applied = allocations_made.len(), "credit reapplied");
    Ok(CreditApplicationResult { allocations_made, remaining_credit_ves: total_credit.max(Decimal::ZERO) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::applied_charge::ChargeStatus;
    use crate::domain::entities::charge_concept::{ChargeConcept, ChargeFrequency};
    use crate::domain::entities::payment::PaymentMethod;
    use crate::domain::entities::representative::{Identification, IdentificationType, Representative};
    use crate::domain::entities::school_configuration::SchoolConfiguration;
    use crate::domain::entities::student::{GradeLevel, Student};
    use crate::domain::usecases::obligation_ledger::issue_charge;
    use crate::domain::usecases::payment_engine::{record_payment, AllocationRequest};
    use chrono::{NaiveDate, Utc};
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

    #[tokio::test]
    async fn surplus_payment_reapplies_fifo_to_oldest_open_charge() {
        let repos = fresh_repos();
        let rep = Representative {
            id: Uuid::new_v4(),
            first_name: "Luis".into(),
            last_name: "Diaz".into(),
            identification: Identification { id_type: IdentificationType::V, number: "1111".into() },
            email: "luis@example.com".into(),
            phones: vec![],
            address: Some("Calle 1".into()),
            rif: None,
            available_credit_ves: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repos.representatives.save(rep.clone()).await.unwrap();
        let grade = GradeLevel { id: Uuid::new_v4(), name: "2do".into(), order_index: 2, is_active: true };
        repos.grade_levels.save(grade.clone()).await.unwrap();
        let student = Student {
            id: Uuid::new_v4(),
            first_name: "Pedro".into(),
            last_name: "Diaz".into(),
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
            default_amount: dec!(500.00),
            default_amount_currency: Currency::Ves,
            default_frequency: ChargeFrequency::Monthly,
            category: "tuition".into(),
            iva_percentage: dec!(0.16),
            applicable_grade_level: None,
            is_active: true,
        };
        repos.charge_concepts.save(concept.clone()).await.unwrap();

        let due_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let charge = issue_charge(&repos, student.id, concept.id, "June".into(), due_date, due_date, ChargeStatus::Pending)
            .await
            .unwrap();

        // Overpay by 200: 300 covers nothing requested, but the payment has
        // no allocations at all, so its full 700 VES sits as credit.
        record_payment(
            &repos,
            rep.id,
            due_date,
            dec!(700.00),
            Currency::Ves,
            vec![],
            PaymentMethod::Cash,
            None,
            None,
        )
        .await
        .unwrap();

        let result = apply_representative_credit(&repos, rep.id, due_date).await.unwrap();
        assert_eq!(result.allocations_made.len(), 1);
        assert_eq!(result.remaining_credit_ves, dec!(200.00));

        let updated_charge = repos.applied_charges.get(charge.id).await.unwrap();
        assert_eq!(updated_charge.status, ChargeStatus::Paid);
    }

    #[tokio::test]
    async fn no_surplus_returns_nothing_to_apply() {
        let repos = fresh_repos();
        let rep_id = Uuid::new_v4();
        let result = apply_representative_credit(&repos, rep_id, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .await
            .unwrap();
        assert!(result.allocations_made.is_empty());
        assert_eq!(result.remaining_credit_ves, Decimal::ZERO);
    }
}
