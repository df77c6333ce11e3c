use fractic_server_error::ServerError;

use crate::data::repositories::registry::Repositories;
use crate::domain::entities::ids::{ChargeConceptId, GradeLevelId};
use crate::errors::{ChargeConceptHasOpenCharges, GradeLevelHasActiveStudents};

/// §3: a grade level may not be deactivated while it has active students.
#[tracing::instrument(skip(repos))]
pub async fn deactivate_grade_level(repos: &Repositories, grade_level_id: GradeLevelId) -> Result<(), ServerError> {
    let mut grade_level = repos.grade_levels.get(grade_level_id).await?;
    if !grade_level.is_active {
        return Ok(());
    }
    let has_active_students = repos
        .students
        .list()
        .await?
        .into_iter()
        .any(|s| s.grade_level_id == grade_level_id && s.is_active);
    if has_active_students {
        return Err(GradeLevelHasActiveStudents::new(&grade_level_id));
    }
    grade_level.is_active = false;
    repos.grade_levels.save(grade_level).await?;
    tracing::info!(grade_level_id = %grade_level_id, "grade level deactivated");
    Ok(())
}

/// §3: a charge concept may not be deactivated while it has open
/// (non-paid, non-cancelled) applied charges.
#[tracing::instrument(skip(repos))]
pub async fn deactivate_charge_concept(repos: &Repositories, charge_concept_id: ChargeConceptId) -> Result<(), ServerError> {
    let mut concept = repos.charge_concepts.get(charge_concept_id).await?;
    if !concept.is_active {
        return Ok(());
    }
    let has_open_charges = repos
        .applied_charges
        .list()
        .await?
        .into_iter()
        .any(|c| c.charge_concept_id == Some(charge_concept_id) && c.status.is_open());
    if has_open_charges {
        return Err(ChargeConceptHasOpenCharges::new(&charge_concept_id));
    }
    concept.is_active = false;
    repos.charge_concepts.save(concept).await?;
    tracing::info!(charge_concept_id = %charge_concept_id, "charge concept deactivated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::domain::entities::applied_charge::ChargeStatus;
    use crate::domain::entities::charge_concept::{ChargeConcept, ChargeFrequency};
    use crate::domain::entities::representative::{Identification, IdentificationType, Representative};
    use crate::domain::entities::school_configuration::SchoolConfiguration;
    use crate::domain::entities::student::{GradeLevel, Student};
    use crate::domain::usecases::obligation_ledger::issue_charge;
    use crate::money::Currency;

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
    async fn grade_level_with_active_students_cannot_be_deactivated() {
        let repos = fresh_repos();
        let grade = GradeLevel { id: Uuid::new_v4(), name: "3ro".into(), order_index: 3, is_active: true };
        repos.grade_levels.save(grade.clone()).await.unwrap();
        let rep = Representative {
            id: Uuid::new_v4(),
            first_name: "Carla".into(),
            last_name: "Rojas".into(),
            identification: Identification { id_type: IdentificationType::V, number: "9999".into() },
            email: "carla@example.com".into(),
            phones: vec![],
            address: Some("Av. Bolivar".into()),
            rif: Some("J-11111111-1".into()),
            available_credit_ves: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repos.representatives.save(rep.clone()).await.unwrap();
        let student = Student {
            id: Uuid::new_v4(),
            first_name: "Tomas".into(),
            last_name: "Rojas".into(),
            identity: None,
            birth_date: None,
            grade_level_id: grade.id,
            representative_id: rep.id,
            is_active: true,
            has_scholarship: false,
            scholarship_percentage: Decimal::ZERO,
            scholarship_fixed_amount_ves: Decimal::ZERO,
        };
        repos.students.save(student).await.unwrap();

        let err = deactivate_grade_level(&repos, grade.id).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn grade_level_without_active_students_can_be_deactivated() {
        let repos = fresh_repos();
        let grade = GradeLevel { id: Uuid::new_v4(), name: "4to".into(), order_index: 4, is_active: true };
        repos.grade_levels.save(grade.clone()).await.unwrap();

        deactivate_grade_level(&repos, grade.id).await.unwrap();
        let updated = repos.grade_levels.get(grade.id).await.unwrap();
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn charge_concept_with_open_charges_cannot_be_deactivated() {
        let repos = fresh_repos();
        let grade = GradeLevel { id: Uuid::new_v4(), name: "5to".into(), order_index: 5, is_active: true };
        repos.grade_levels.save(grade.clone()).await.unwrap();
        let rep = Representative {
            id: Uuid::new_v4(),
            first_name: "Luis".into(),
            last_name: "Perez".into(),
            identification: Identification { id_type: IdentificationType::V, number: "8888".into() },
            email: "luis@example.com".into(),
            phones: vec![],
            address: Some("Av. Urdaneta".into()),
            rif: None,
            available_credit_ves: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repos.representatives.save(rep.clone()).await.unwrap();
        let student = Student {
            id: Uuid::new_v4(),
            first_name: "Ana".into(),
            last_name: "Perez".into(),
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
            name: "Transporte".into(),
            default_amount: dec!(200.00),
            default_amount_currency: Currency::Ves,
            default_frequency: ChargeFrequency::Monthly,
            category: "transport".into(),
            iva_percentage: dec!(0.16),
            applicable_grade_level: None,
            is_active: true,
        };
        repos.charge_concepts.save(concept.clone()).await.unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        issue_charge(&repos, student.id, concept.id, "June transport".into(), today, today, ChargeStatus::Pending)
            .await
            .unwrap();

        let err = deactivate_charge_concept(&repos, concept.id).await;
        assert!(err.is_err());
    }
}
