use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use fractic_server_error::ServerError;
use rust_decimal::Decimal;

use crate::data::repositories::registry::Repositories;
use crate::domain::entities::applied_charge::AppliedCharge;
use crate::domain::entities::ids::{RepresentativeId, StudentId};
use crate::domain::logic::delinquency::{classify_student, DelinquencyClass};
use crate::money::round2;

/// §4.9: a student's delinquency classification as of `today`.
#[tracing::instrument(skip(repos))]
pub async fn delinquency_report(
    repos: &Repositories,
    today: NaiveDate,
) -> Result<Vec<(StudentId, DelinquencyClass)>, ServerError> {
    let students = repos.students.list().await?;
    let charges = repos.applied_charges.list().await?;
    let mut report = Vec::with_capacity(students.len());
    for student in students {
        let open: Vec<&AppliedCharge> = charges
            .iter()
            .filter(|c| c.student_id == student.id && c.display_status(today).is_open())
            .collect();
        report.push((student.id, classify_student(&open, today)));
    }
    Ok(report)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrendPoint {
    pub year: i32,
    pub month: u32,
    pub billed_ves: Decimal,
    pub collected_ves: Decimal,
}

/// Zero-based month index so `div_euclid`/`rem_euclid` round-trip cleanly:
/// `month` here is `1..=12`, but the key stores `month - 1` so `year*12 + 11`
/// (December) never spills into the next year's key.
fn month_key(year: i32, month: u32) -> i32 {
    year * 12 + (month as i32 - 1)
}

/// §4.9 "monthly billing vs payment trend" over the `months` ending with
/// `today`'s month, empty months filled with zero.
#[tracing::instrument(skip(repos))]
pub async fn monthly_billing_vs_payment_trend(
    repos: &Repositories,
    months: u32,
    today: NaiveDate,
) -> Result<Vec<MonthlyTrendPoint>, ServerError> {
    let mut buckets: BTreeMap<i32, (Decimal, Decimal)> = BTreeMap::new();
    let end_key = month_key(today.year(), today.month());
    for offset in 0..months {
        buckets.insert(end_key - offset as i32, (Decimal::ZERO, Decimal::ZERO));
    }

    for charge in repos.applied_charges.list().await? {
        let key = month_key(charge.issue_date.year(), charge.issue_date.month());
        if let Some(entry) = buckets.get_mut(&key) {
            entry.0 += charge.amount_due_ves_at_emission;
        }
    }
    for payment in repos.payments.list().await? {
        let key = month_key(payment.payment_date.year(), payment.payment_date.month());
        if let Some(entry) = buckets.get_mut(&key) {
            entry.1 += payment.amount_paid_ves_equivalent;
        }
    }

    Ok(buckets
        .into_iter()
        .map(|(key, (billed, collected))| {
            let year = key.div_euclid(12);
            let month = key.rem_euclid(12) as u32 + 1;
            MonthlyTrendPoint { year, month, billed_ves: round2(billed), collected_ves: round2(collected) }
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct RepresentativeStatement {
    pub representative_id: RepresentativeId,
    pub total_charged_ves: Decimal,
    pub total_paid_ves: Decimal,
    pub today_balance_ves: Decimal,
    pub detailed_charges: Vec<AppliedCharge>,
    pub detailed_payments: Vec<crate::domain::entities::payment::Payment>,
}

/// §4.9 "representative account statement".
#[tracing::instrument(skip(repos))]
pub async fn representative_statement(
    repos: &Repositories,
    representative_id: RepresentativeId,
    today: NaiveDate,
) -> Result<RepresentativeStatement, ServerError> {
    let students: Vec<_> = repos
        .students
        .list()
        .await?
        .into_iter()
        .filter(|s| s.representative_id == representative_id)
        .collect();
    let student_ids: Vec<_> = students.iter().map(|s| s.id).collect();

    let mut detailed_charges: Vec<_> = repos
        .applied_charges
        .list()
        .await?
        .into_iter()
        .filter(|c| student_ids.contains(&c.student_id))
        .collect();
    detailed_charges.sort_by_key(|c| c.issue_date);

    let mut detailed_payments: Vec<_> = repos
        .payments
        .list()
        .await?
        .into_iter()
        .filter(|p| p.representative_id == representative_id)
        .collect();
    detailed_payments.sort_by_key(|p| p.payment_date);

    let total_charged_ves = round2(detailed_charges.iter().map(|c| c.amount_due_ves_at_emission).sum());
    let total_paid_ves = round2(detailed_payments.iter().map(|p| p.amount_paid_ves_equivalent).sum());

    let mut today_balance_ves = Decimal::ZERO;
    for charge in &detailed_charges {
        today_balance_ves += super::obligation_ledger::today_value_ves(repos, charge, today).await?;
    }

    Ok(RepresentativeStatement {
        representative_id,
        total_charged_ves,
        total_paid_ves,
        today_balance_ves: round2(today_balance_ves),
        detailed_charges,
        detailed_payments,
    })
}

#[derive(Debug, Clone, Default)]
pub struct DashboardSummary {
    pub active_students: usize,
    pub active_employees: usize,
    pub today_collected_ves: Decimal,
    pub open_debt_ves: Decimal,
}

/// §4.9 supplement: dashboard summary cards.
#[tracing::instrument(skip(repos))]
pub async fn dashboard_summary(repos: &Repositories, today: NaiveDate) -> Result<DashboardSummary, ServerError> {
    let active_students = repos.students.list().await?.into_iter().filter(|s| s.is_active).count();
    let active_employees = repos.employees.list().await?.into_iter().filter(|e| e.is_active).count();
    let today_collected_ves = round2(
        repos
            .payments
            .list()
            .await?
            .into_iter()
            .filter(|p| p.payment_date == today)
            .map(|p| p.amount_paid_ves_equivalent)
            .sum(),
    );

    let charges = repos.applied_charges.list().await?;
    let mut open_debt_ves = Decimal::ZERO;
    for charge in charges.iter().filter(|c| c.display_status(today).is_open()) {
        open_debt_ves += super::obligation_ledger::today_value_ves(repos, charge, today).await?;
    }

    Ok(DashboardSummary {
        active_students,
        active_employees,
        today_collected_ves,
        open_debt_ves: round2(open_debt_ves),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseGranularity {
    Day,
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseTrendPoint {
    pub bucket: String,
    pub amount_ves: Decimal,
}

fn expense_bucket_key(date: NaiveDate, granularity: ExpenseGranularity) -> String {
    match granularity {
        ExpenseGranularity::Day => date.format("%Y-%m-%d").to_string(),
        ExpenseGranularity::Month => date.format("%Y-%m").to_string(),
        ExpenseGranularity::Year => date.format("%Y").to_string(),
    }
}

/// §4.9/supplement "expense trend" over `[start, end]`, optionally including
/// personnel cost (materialised from payroll payable items, not the
/// `Expense` ledger, since salaries never go through it).
#[tracing::instrument(skip(repos))]
pub async fn expense_trend(
    repos: &Repositories,
    start: NaiveDate,
    end: NaiveDate,
    granularity: ExpenseGranularity,
    include_salaries: bool,
) -> Result<Vec<ExpenseTrendPoint>, ServerError> {
    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in repos.expenses.list().await? {
        if expense.expense_date < start || expense.expense_date > end {
            continue;
        }
        *buckets.entry(expense_bucket_key(expense.expense_date, granularity)).or_insert(Decimal::ZERO) +=
            expense.amount_ves;
    }
    if include_salaries {
        for item in repos.employee_payable_items.list().await? {
            if item.issue_date < start || item.issue_date > end {
                continue;
            }
            *buckets.entry(expense_bucket_key(item.issue_date, granularity)).or_insert(Decimal::ZERO) +=
                item.amount_ves_at_creation;
        }
    }
    Ok(buckets
        .into_iter()
        .map(|(bucket, amount_ves)| ExpenseTrendPoint { bucket, amount_ves: round2(amount_ves) })
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseCategoryTotal {
    pub category: String,
    pub total_ves: Decimal,
}

/// §4.9 "expense summary by category".
#[tracing::instrument(skip(repos))]
pub async fn expense_summary_by_category(
    repos: &Repositories,
    start: NaiveDate,
    end: NaiveDate,
    include_salaries: bool,
) -> Result<Vec<ExpenseCategoryTotal>, ServerError> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in repos.expenses.list().await? {
        if expense.expense_date < start || expense.expense_date > end {
            continue;
        }
        *totals.entry(expense.category.clone()).or_insert(Decimal::ZERO) += expense.amount_ves;
    }
    if include_salaries {
        let salary_total: Decimal = repos
            .employee_payable_items
            .list()
            .await?
            .into_iter()
            .filter(|i| i.issue_date >= start && i.issue_date <= end)
            .map(|i| i.amount_ves_at_creation)
            .sum();
        if salary_total > Decimal::ZERO {
            totals.insert("salaries".to_string(), salary_total);
        }
    }
    Ok(totals
        .into_iter()
        .map(|(category, total_ves)| ExpenseCategoryTotal { category, total_ves: round2(total_ves) })
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSupplierTotal {
    pub supplier: String,
    pub total_ves: Decimal,
}

/// §4.9 "expense summary by supplier". Salaries have no supplier and are
/// never represented here.
#[tracing::instrument(skip(repos))]
pub async fn expense_summary_by_supplier(
    repos: &Repositories,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ExpenseSupplierTotal>, ServerError> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in repos.expenses.list().await? {
        if expense.expense_date < start || expense.expense_date > end {
            continue;
        }
        let supplier = expense.supplier.clone().unwrap_or_else(|| "(no supplier)".to_string());
        *totals.entry(supplier).or_insert(Decimal::ZERO) += expense.amount_ves;
    }
    Ok(totals
        .into_iter()
        .map(|(supplier, total_ves)| ExpenseSupplierTotal { supplier, total_ves: round2(total_ves) })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::expense::Expense;
    use crate::domain::entities::school_configuration::SchoolConfiguration;
    use crate::money::Currency;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

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
    async fn monthly_trend_fills_empty_months_with_zero() {
        let repos = fresh_repos();
        let trend = monthly_billing_vs_payment_trend(&repos, 3, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
            .await
            .unwrap();
        assert_eq!(trend.len(), 3);
        assert!(trend.iter().all(|p| p.billed_ves == Decimal::ZERO && p.collected_ves == Decimal::ZERO));
        assert_eq!(trend.last().unwrap().month, 6);
    }

    #[tokio::test]
    async fn expense_summary_by_category_groups_totals() {
        let repos = fresh_repos();
        repos
            .expenses
            .save(Expense {
                id: Uuid::new_v4(),
                expense_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
                description: "Cleaning supplies".into(),
                category: "maintenance".into(),
                supplier: Some("Limpieza C.A.".into()),
                amount_original: dec!(300.00),
                currency_original: Currency::Ves,
                amount_ves: dec!(300.00),
                notes: None,
            })
            .await
            .unwrap();
        repos
            .expenses
            .save(Expense {
                id: Uuid::new_v4(),
                expense_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
                description: "More supplies".into(),
                category: "maintenance".into(),
                supplier: Some("Limpieza C.A.".into()),
                amount_original: dec!(200.00),
                currency_original: Currency::Ves,
                amount_ves: dec!(200.00),
                notes: None,
            })
            .await
            .unwrap();

        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let summary = expense_summary_by_category(&repos, start, end, false).await.unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].category, "maintenance");
        assert_eq!(summary[0].total_ves, dec!(500.00));

        let by_supplier = expense_summary_by_supplier(&repos, start, end).await.unwrap();
        assert_eq!(by_supplier.len(), 1);
        assert_eq!(by_supplier[0].total_ves, dec!(500.00));
    }
}
