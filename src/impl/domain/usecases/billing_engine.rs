use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use fractic_server_error::ServerError;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::data::repositories::registry::Repositories;
use crate::domain::entities::applied_charge::{AppliedCharge, ChargeStatus};
use crate::domain::entities::charge_concept::ChargeFrequency;
use crate::domain::entities::ids::{ChargeConceptId, RepresentativeId, StudentId};
use crate::domain::logic::scholarship::apply_scholarship;
use crate::errors::InvalidMonth;
use crate::money::{clamp_non_negative, round2, Currency};

use super::credit_reapplication::{apply_representative_credit, CreditApplicationResult};
use super::currency_service::convert_to_ves;

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .pred_opt()
        .unwrap()
        .day()
}

pub struct RecurringGenerationSummary {
    pub period: (i32, u32),
    pub students_processed: usize,
    pub charges_created: Vec<AppliedCharge>,
    pub warnings: Vec<String>,
    pub credit_results: Vec<(RepresentativeId, CreditApplicationResult)>,
}

/// §4.5 `generate_recurring_charges`.
#[tracing::instrument(skip(repos))]
pub async fn generate_recurring_charges(
    repos: &Repositories,
    year: i32,
    month: u32,
    issue_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    concept_ids: Option<Vec<ChargeConceptId>>,
    payment_due_day: Option<u32>,
    today: NaiveDate,
) -> Result<RecurringGenerationSummary, ServerError> {
    if !(1..=12).contains(&month) {
        return Err(InvalidMonth::new(&month));
    }
    let month_start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let month_end = NaiveDate::from_ymd_opt(year, month, last_day_of_month(year, month)).expect("valid month");
    let issue_date = issue_date.unwrap_or(month_start);
    let due_date = due_date.unwrap_or_else(|| {
        let day = payment_due_day.unwrap_or(1).min(last_day_of_month(year, month));
        NaiveDate::from_ymd_opt(year, month, day).expect("clamped day is valid")
    });

    let students: Vec<_> = repos.students.list().await?.into_iter().filter(|s| s.is_active).collect();
    let mut concepts: Vec<_> = repos
        .charge_concepts
        .list()
        .await?
        .into_iter()
        .filter(|c| c.is_active && c.default_frequency == ChargeFrequency::Monthly)
        .collect();
    if let Some(ids) = &concept_ids {
        let allow: HashSet<_> = ids.iter().collect();
        concepts.retain(|c| allow.contains(&c.id));
    }

    let existing_charges = repos.applied_charges.list().await?;
    let mut warnings = Vec::new();
    let mut charges_created = Vec::new();
    let mut touched_representatives: Vec<RepresentativeId> = Vec::new();

    for student in &students {
        if !touched_representatives.contains(&student.representative_id) {
            touched_representatives.push(student.representative_id);
        }
        for concept in &concepts {
            if let Some(grade) = concept.applicable_grade_level {
                if grade != student.grade_level_id {
                    continue;
                }
            }
            let already_exists = existing_charges.iter().any(|c| {
                c.student_id == student.id
                    && c.charge_concept_id == Some(concept.id)
                    && c.issue_date >= month_start
                    && c.issue_date <= month_end
                    && c.status != ChargeStatus::Cancelled
            });
            if already_exists {
                warnings.push(format!(
                    "student {} already has a charge for concept {} in {}-{:02}; skipped",
                    student.id, concept.id, year, month
                ));
                continue;
            }

            match super::obligation_ledger::issue_charge(
                repos,
                student.id,
                concept.id,
                concept.name.clone(),
                issue_date,
                due_date,
                ChargeStatus::Pending,
            )
            .await
            {
                Ok(charge) => charges_created.push(charge),
                Err(e) => warnings.push(format!(
                    "student {} concept {}: {}",
                    student.id, concept.id, e
                )),
            }
        }
    }

    let mut credit_results = Vec::new();
    for representative_id in touched_representatives {
        let result = apply_representative_credit(repos, representative_id, today).await?;
        credit_results.push((representative_id, result));
    }

    tracing::info!(created = charges_created.len(), warnings = warnings.len(), "recurring billing batch completed");
    Ok(RecurringGenerationSummary {
        period: (year, month),
        students_processed: students.len(),
        charges_created,
        warnings,
        credit_results,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingTarget {
    AllActive,
    All,
}

pub struct GlobalChargeSummary {
    pub charges_created: Vec<AppliedCharge>,
    pub skipped: Vec<(StudentId, String)>,
}

/// §4.5 `apply_global_charge`.
#[tracing::instrument(skip(repos))]
pub async fn apply_global_charge(
    repos: &Repositories,
    concept_id: ChargeConceptId,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    target: BillingTarget,
    override_amount: Option<Decimal>,
    override_currency: Option<Currency>,
    description: Option<String>,
) -> Result<GlobalChargeSummary, ServerError> {
    let concept = repos.charge_concepts.get(concept_id).await?;
    let amount = override_amount.unwrap_or(concept.default_amount);
    let currency = override_currency.unwrap_or(concept.default_amount_currency);
    let indexed = currency != Currency::Ves;

    let rate_at_issue = if indexed {
        let rate = repos
            .exchange_rates
            .find_latest_on_or_before(currency, Currency::Ves, issue_date)
            .await?
            .ok_or_else(|| crate::errors::RateMissing::new(currency.code(), Currency::Ves.code(), &issue_date))?;
        Some(rate.rate)
    } else {
        None
    };

    let students: Vec<_> = repos
        .students
        .list()
        .await?
        .into_iter()
        .filter(|s| match target {
            BillingTarget::AllActive => s.is_active,
            BillingTarget::All => true,
        })
        .collect();

    let mut charges_created = Vec::new();
    let mut skipped = Vec::new();

    for student in students {
        // §4.5: percentage discount applied in original currency first, then
        // converted to VES, then fixed-VES discount subtracted, then clamped
        // — the one intentional deviation from §4.3's convert-then-discount
        // ordering, kept as its own path per §9.
        let mut amount_in_original = amount;
        if student.has_scholarship && student.scholarship_percentage > Decimal::ZERO {
            amount_in_original = round2(amount_in_original * (Decimal::ONE - student.scholarship_percentage / Decimal::from(100)));
        }
        let mut amount_ves = match rate_at_issue {
            Some(rate) => round2(amount_in_original * rate),
            None => amount_in_original,
        };
        if student.has_scholarship && student.scholarship_fixed_amount_ves > Decimal::ZERO {
            amount_ves -= student.scholarship_fixed_amount_ves;
        }
        let amount_ves = clamp_non_negative(amount_ves);

        if amount_ves <= Decimal::ZERO {
            skipped.push((student.id, "net amount is zero after scholarship".to_string()));
            continue;
        }

        let amount_original = match rate_at_issue {
            Some(rate) => round2(amount_ves / rate),
            None => amount_ves,
        };

        let charge = AppliedCharge {
            id: Uuid::new_v4(),
            student_id: student.id,
            charge_concept_id: Some(concept.id),
            invoice_id: None,
            description: description.clone().unwrap_or_else(|| concept.name.clone()),
            original_concept_amount: amount,
            original_concept_currency: currency,
            is_indexed: indexed,
            exchange_rate_applied_at_emission: rate_at_issue,
            amount_due_original_currency: amount_original,
            amount_due_ves_at_emission: amount_ves,
            amount_paid_original_currency_equivalent: Decimal::ZERO,
            amount_paid_ves: Decimal::ZERO,
            issue_date,
            due_date,
            status: ChargeStatus::Pending,
        };
        repos.applied_charges.save(charge.clone()).await?;
        charges_created.push(charge);
    }

    tracing::info!(created = charges_created.len(), skipped = skipped.len(), "global charge applied");
    Ok(GlobalChargeSummary { charges_created, skipped })
}
