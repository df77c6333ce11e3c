use chrono::NaiveDate;
use fractic_server_error::ServerError;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::data::repositories::registry::Repositories;
use crate::domain::entities::applied_charge::{AppliedCharge, ChargeStatus};
use crate::domain::entities::ids::{AppliedChargeId, ChargeConceptId, StudentId};
use crate::domain::logic::scholarship::apply_scholarship;
use crate::errors::{
    AppliedChargeNotEditable, ChargeConceptInactive, DueDateBeforeIssueDate, StudentInactive,
};
use crate::money::round2;

use super::currency_service::convert_to_ves;

/// §4.3 `issue_charge`.
#[tracing::instrument(skip(repos))]
pub async fn issue_charge(
    repos: &Repositories,
    student_id: StudentId,
    concept_id: ChargeConceptId,
    description: String,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    status: ChargeStatus,
) -> Result<AppliedCharge, ServerError> {
    let student = repos.students.get(student_id).await?;
    if !student.is_active {
        return Err(StudentInactive::new(&student_id));
    }
    let concept = repos.charge_concepts.get(concept_id).await?;
    if !concept.is_active {
        return Err(ChargeConceptInactive::new(&concept_id));
    }
    if due_date < issue_date {
        return Err(DueDateBeforeIssueDate::new(&issue_date, &due_date));
    }

    let orig_amount = concept.default_amount;
    let orig_curr = concept.default_amount_currency;
    let indexed = orig_curr != crate::money::Currency::Ves;

    let (pre_scholarship_ves, rate_at_emission) =
        convert_to_ves(repos, orig_amount, orig_curr, issue_date).await?;
    let due_ves = apply_scholarship(&student, pre_scholarship_ves);

    let due_original = if indexed {
        // rate_at_emission is Some whenever indexed is true, since
        // convert_to_ves only returns None for the VES passthrough case.
        let rate = rate_at_emission.expect("indexed conversion always yields a rate");
        round2(due_ves / rate)
    } else {
        due_ves
    };

    let charge = AppliedCharge {
        id: Uuid::new_v4(),
        student_id,
        charge_concept_id: Some(concept_id),
        invoice_id: None,
        description,
        original_concept_amount: orig_amount,
        original_concept_currency: orig_curr,
        is_indexed: indexed,
        exchange_rate_applied_at_emission: rate_at_emission,
        amount_due_original_currency: due_original,
        amount_due_ves_at_emission: due_ves,
        amount_paid_original_currency_equivalent: Decimal::ZERO,
        amount_paid_ves: Decimal::ZERO,
        issue_date,
        due_date,
        status,
    };
    repos.applied_charges.save(charge.clone()).await?;
    tracing::info!(charge_id = %charge.id, "applied charge issued");
    Ok(charge)
}

/// §4.3 update contract: terminal charges may only have their description
/// edited, or transition to `cancelled`.
pub async fn update_description_or_cancel(
    repos: &Repositories,
    charge_id: AppliedChargeId,
    new_description: Option<String>,
    cancel: bool,
) -> Result<AppliedCharge, ServerError> {
    let mut charge = repos.applied_charges.get(charge_id).await?;
    if charge.status.is_terminal() {
        if cancel {
            return Err(AppliedChargeNotEditable::new(&charge_id));
        }
        if let Some(desc) = new_description {
            charge.description = desc;
        }
    } else {
        if let Some(desc) = new_description {
            charge.description = desc;
        }
        if cancel {
            charge.status = ChargeStatus::Cancelled;
        }
    }
    repos.applied_charges.save(charge.clone()).await?;
    Ok(charge)
}

/// §4.3 "today-value": outstanding debt expressed in VES as of `today`.
pub async fn today_value_ves(
    repos: &Repositories,
    charge: &AppliedCharge,
    today: NaiveDate,
) -> Result<Decimal, ServerError> {
    if !charge.is_indexed {
        return Ok(charge.balance_ves_at_emission());
    }
    let pending_original =
        (charge.amount_due_original_currency - charge.amount_paid_original_currency_equivalent).max(Decimal::ZERO);
    let rate = repos
        .exchange_rates
        .find_latest_on_or_before(charge.original_concept_currency, crate::money::Currency::Ves, today)
        .await?;
    Ok(match rate {
        Some(r) => round2(pending_original * r.rate),
        // No current rate available: fall back to the balance at emission
        // rather than failing a pure read.
        None => charge.balance_ves_at_emission(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::charge_concept::{ChargeConcept, ChargeFrequency};
    use crate::domain::entities::school_configuration::SchoolConfiguration;
    use crate::domain::entities::student::{GradeLevel, Student};
    use crate::money::Currency;
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

    async fn seed_student(repos: &Repositories, has_scholarship: bool, pct: Decimal) -> StudentId {
        let grade = GradeLevel { id: Uuid::new_v4(), name: "1ro".into(), order_index: 1, is_active: true };
        repos.grade_levels.save(grade.clone()).await.unwrap();
        let student = Student {
            id: Uuid::new_v4(),
            first_name: "Ana".into(),
            last_name: "Perez".into(),
            identity: None,
            birth_date: None,
            grade_level_id: grade.id,
            representative_id: Uuid::new_v4(),
            is_active: true,
            has_scholarship,
            scholarship_percentage: pct,
            scholarship_fixed_amount_ves: Decimal::ZERO,
        };
        repos.students.save(student.clone()).await.unwrap();
        student.id
    }

    async fn seed_concept(repos: &Repositories, amount: Decimal, currency: Currency) -> ChargeConceptId {
        let concept = ChargeConcept {
            id: Uuid::new_v4(),
            name: "Mensualidad".into(),
            default_amount: amount,
            default_amount_currency: currency,
            default_frequency: ChargeFrequency::Monthly,
            category: "tuition".into(),
            iva_percentage: dec!(0.16),
            applicable_grade_level: None,
            is_active: true,
        };
        repos.charge_concepts.save(concept.clone()).await.unwrap();
        concept.id
    }

    #[tokio::test]
    async fn issuing_an_indexed_charge_round_trips_within_rounding() {
        let repos = fresh_repos();
        let student_id = seed_student(&repos, false, Decimal::ZERO).await;
        let concept_id = seed_concept(&repos, dec!(100.00), Currency::Usd).await;
        let issue_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        super::super::currency_service::put_rate(&repos, Currency::Usd, issue_date, dec!(60.00), chrono::Utc::now())
            .await
            .unwrap();

        let charge = issue_charge(
            &repos,
            student_id,
            concept_id,
            "June tuition".into(),
            issue_date,
            issue_date,
            ChargeStatus::Pending,
        )
        .await
        .unwrap();

        assert_eq!(charge.amount_due_ves_at_emission, dec!(6000.00));
        assert_eq!(charge.amount_due_original_currency, dec!(100.00));
        assert!(charge.is_indexed);
    }

    #[tokio::test]
    async fn issuing_applies_scholarship_percentage() {
        let repos = fresh_repos();
        let student_id = seed_student(&repos, true, dec!(10)).await;
        let concept_id = seed_concept(&repos, dec!(4000.00), Currency::Ves).await;
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let charge = issue_charge(&repos, student_id, concept_id, "tuition".into(), today, today, ChargeStatus::Pending)
            .await
            .unwrap();

        assert_eq!(charge.amount_due_ves_at_emission, dec!(3600.00));
    }

    #[tokio::test]
    async fn due_date_before_issue_date_is_rejected() {
        let repos = fresh_repos();
        let student_id = seed_student(&repos, false, Decimal::ZERO).await;
        let concept_id = seed_concept(&repos, dec!(100.00), Currency::Ves).await;
        let issue_date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let due_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let err = issue_charge(&repos, student_id, concept_id, "x".into(), issue_date, due_date, ChargeStatus::Pending)
            .await;
        assert!(err.is_err());
    }
}
