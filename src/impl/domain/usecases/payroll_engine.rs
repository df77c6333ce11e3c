use chrono::{DateTime, NaiveDate, Utc};
use fractic_server_error::ServerError;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::data::repositories::registry::Repositories;
use crate::domain::entities::employee_balance_adjustment::{BalanceAdjustmentType, EmployeeBalanceAdjustment};
use crate::domain::entities::employee_payable_item::{EmployeePayableItem, PayableItemSourceType, PayableItemStatus};
use crate::domain::entities::employee_payment::{EmployeePayment, EmployeePaymentAllocation, EmployeePaymentMethod};
use crate::domain::entities::ids::{EmployeeBalanceAdjustmentId, EmployeeId, EmployeePayableItemId, PayrollRunId};
use crate::domain::entities::organization::PayFrequency;
use crate::domain::entities::payroll_run::{ComponentBreakdownLine, PayrollRun, PayrollRunEmployeeDetail, PayrollRunStatus};
use crate::domain::entities::payslip::Payslip;
use crate::domain::entities::salary_component::{CalculationType, ComponentType};
use crate::errors::{
    BalanceAdjustmentDeductionRequiresTarget, EmployeePayableItemNotOpenForAllocation,
    EmployeePayableItemNotOwnedByEmployee, EmployeePaymentWouldOverdrawItem, HoursRequiredForHourlyEmployee,
    PayrollRunNotDeletableDraft, PayrollRunNotDraft, PayrollRunTransitionForbidden, PeriodStartNotBeforeEnd,
};
use crate::money::{eq_tolerant, ge_tolerant, le_tolerant, round2, Currency};

use super::currency_service::convert_to_ves;

/// §4.8 `create_draft`.
#[tracing::instrument(skip(repos))]
pub async fn create_draft(
    repos: &Repositories,
    name: String,
    period_start: NaiveDate,
    period_end: NaiveDate,
    pay_frequency_covered: PayFrequency,
    rate: Option<Decimal>,
) -> Result<PayrollRun, ServerError> {
    if period_start >= period_end {
        return Err(PeriodStartNotBeforeEnd::new(&period_start, &period_end));
    }
    let run = PayrollRun {
        id: Uuid::new_v4(),
        name,
        period_start,
        period_end,
        pay_frequency_covered,
        exchange_rate_usd_ves: rate,
        status: PayrollRunStatus::Draft,
        confirmed_by: None,
        confirmed_at: None,
        notes: None,
    };
    repos.payroll_runs.save(run.clone()).await?;
    Ok(run)
}

fn status_name(status: PayrollRunStatus) -> &'static str {
    match status {
        PayrollRunStatus::Draft => "draft",
        PayrollRunStatus::Confirmed => "confirmed",
        PayrollRunStatus::PaidOut => "paid_out",
        PayrollRunStatus::Cancelled => "cancelled",
    }
}

/// §4.8 `confirm_run`.
#[tracing::instrument(skip(repos, hours_map))]
pub async fn confirm_run(
    repos: &Repositories,
    run_id: PayrollRunId,
    confirming_user: String,
    hours_map: std::collections::HashMap<EmployeeId, Decimal>,
    now: DateTime<Utc>,
) -> Result<PayrollRun, ServerError> {
    let mut run = repos.payroll_runs.get(run_id).await?;
    if run.status != PayrollRunStatus::Draft {
        return Err(PayrollRunNotDraft::new(&run_id));
    }

    let rate = match run.exchange_rate_usd_ves {
        Some(r) => Some(r),
        None => repos
            .exchange_rates
            .find_latest_on_or_before(Currency::Usd, Currency::Ves, run.period_end)
            .await?
            .map(|r| r.rate),
    };

    repos.payroll_run_employee_details.delete_by_run(run_id).await?;

    let employees: Vec<_> = repos
        .employees
        .list()
        .await?
        .into_iter()
        .filter(|e| e.is_active && e.pay_frequency == run.pay_frequency_covered)
        .collect();

    let assignments = repos.employee_salary_components.list().await?;
    let definitions = repos.salary_component_definitions.list().await?;

    for mut employee in employees {
        let convert = |amount: Decimal, currency: Currency| -> Result<Decimal, String> {
            match currency {
                Currency::Ves => Ok(amount),
                _ => rate.map(|r| round2(amount * r)).ok_or_else(|| {
                    format!(
                        "no {}->VES rate available on or before {}",
                        currency.code(),
                        run.period_end
                    )
                }),
            }
        };

        let base_salary_ves = match employee.pay_frequency {
            PayFrequency::Hourly => {
                let Some(hours) = hours_map.get(&employee.id) else {
                    let note = HoursRequiredForHourlyEmployee::new(&employee.id).to_string();
                    persist_skipped_detail(repos, &run, employee.id, note).await?;
                    continue;
                };
                let hourly_rate = employee.hourly_rate.unwrap_or(Decimal::ZERO);
                match convert(hourly_rate * hours, employee.base_salary_currency) {
                    Ok(v) => v,
                    Err(note) => {
                        persist_skipped_detail(repos, &run, employee.id, note).await?;
                        continue;
                    }
                }
            }
            PayFrequency::Monthly if run.pay_frequency_covered == PayFrequency::Fortnightly => {
                match convert(employee.base_salary_amount / Decimal::from(2), employee.base_salary_currency) {
                    Ok(v) => v,
                    Err(note) => {
                        persist_skipped_detail(repos, &run, employee.id, note).await?;
                        continue;
                    }
                }
            }
            _ => match convert(employee.base_salary_amount, employee.base_salary_currency) {
                Ok(v) => v,
                Err(note) => {
                    persist_skipped_detail(repos, &run, employee.id, note).await?;
                    continue;
                }
            },
        };

        let mut breakdown = Vec::new();
        let mut total_earnings = base_salary_ves;
        let mut total_deductions = Decimal::ZERO;
        let mut skipped_for_rate = false;

        for assignment in assignments
            .iter()
            .filter(|a| a.employee_id == employee.id && a.is_active)
        {
            let Some(definition) = definitions.iter().find(|d| d.id == assignment.definition_id && d.is_active) else {
                continue;
            };
            let value = assignment.override_value.unwrap_or(definition.default_value);
            let currency = assignment.override_currency.unwrap_or(definition.default_currency);
            let amount_ves = match definition.calculation_type {
                CalculationType::FixedAmount => match convert(value, currency) {
                    Ok(v) => v,
                    Err(note) => {
                        persist_skipped_detail(repos, &run, employee.id, note).await?;
                        skipped_for_rate = true;
                        break;
                    }
                },
                CalculationType::PercentageOfBase => round2(base_salary_ves * value),
            };
            match definition.component_type {
                ComponentType::Earning => total_earnings += amount_ves,
                ComponentType::Deduction => total_deductions += amount_ves,
            }
            breakdown.push(ComponentBreakdownLine {
                name: definition.name.clone(),
                component_type: definition.component_type,
                amount_ves,
            });
        }
        if skipped_for_rate {
            continue;
        }

        let net = round2(total_earnings - total_deductions);
        let hours_processed = hours_map.get(&employee.id).copied();

        let detail = PayrollRunEmployeeDetail {
            id: Uuid::new_v4(),
            payroll_run_id: run.id,
            employee_id: employee.id,
            base_salary_ves: round2(base_salary_ves),
            total_earnings_ves: round2(total_earnings),
            total_deductions_ves: round2(total_deductions),
            net_amount_to_pay_ves: net,
            component_breakdown: breakdown,
            hours_processed,
            processing_note: None,
        };
        repos.payroll_run_employee_details.save(detail).await?;

        if let Some(hours) = hours_processed {
            employee.accumulated_hours = (employee.accumulated_hours - hours).max(Decimal::ZERO);
            repos.employees.save(employee).await?;
        }
    }

    run.exchange_rate_usd_ves = rate.or(run.exchange_rate_usd_ves);
    run.status = PayrollRunStatus::Confirmed;
    run.confirmed_by = Some(confirming_user);
    run.confirmed_at = Some(now);
    repos.payroll_runs.save(run.clone()).await?;

    materialise_payable_items(repos, &run).await?;

    tracing::info!(run_id = %run_id, "payroll run confirmed");
    Ok(run)
}

async fn persist_skipped_detail(
    repos: &Repositories,
    run: &PayrollRun,
    employee_id: EmployeeId,
    note: String,
) -> Result<(), ServerError> {
    let detail = PayrollRunEmployeeDetail {
        id: Uuid::new_v4(),
        payroll_run_id: run.id,
        employee_id,
        base_salary_ves: Decimal::ZERO,
        total_earnings_ves: Decimal::ZERO,
        total_deductions_ves: Decimal::ZERO,
        net_amount_to_pay_ves: Decimal::ZERO,
        component_breakdown: vec![],
        hours_processed: None,
        processing_note: Some(note),
    };
    tracing::warn!(employee_id = %employee_id, run_id = %run.id, "employee skipped in payroll run");
    repos.payroll_run_employee_details.save(detail).await
}

/// §4.8 step: each confirmed detail becomes an `EmployeePayableItem`.
async fn materialise_payable_items(repos: &Repositories, run: &PayrollRun) -> Result<(), ServerError> {
    let details = repos
        .payroll_run_employee_details
        .list()
        .await?
        .into_iter()
        .filter(|d| d.payroll_run_id == run.id && d.processing_note.is_none());
    for detail in details {
        let item = EmployeePayableItem {
            id: Uuid::new_v4(),
            employee_id: detail.employee_id,
            source_type: PayableItemSourceType::PayrollRun,
            source_id: run.id,
            description: format!("Payroll run '{}'", run.name),
            issue_date: run.period_end,
            amount_original: detail.net_amount_to_pay_ves,
            currency_original: Currency::Ves,
            amount_ves_at_creation: detail.net_amount_to_pay_ves,
            amount_paid_ves: Decimal::ZERO,
            status: PayableItemStatus::Pending,
        };
        repos.employee_payable_items.save(item).await?;
    }
    Ok(())
}

/// §4.8 `update_status`.
#[tracing::instrument(skip(repos))]
pub async fn update_status(
    repos: &Repositories,
    run_id: PayrollRunId,
    new_status: PayrollRunStatus,
    notes: Option<String>,
) -> Result<PayrollRun, ServerError> {
    let mut run = repos.payroll_runs.get(run_id).await?;
    let allowed = match run.status {
        PayrollRunStatus::Cancelled => false,
        PayrollRunStatus::PaidOut => new_status == PayrollRunStatus::Cancelled,
        PayrollRunStatus::Confirmed => new_status != PayrollRunStatus::Draft,
        PayrollRunStatus::Draft => true,
    };
    if !allowed {
        return Err(PayrollRunTransitionForbidden::new(
            &run_id,
            status_name(run.status),
            status_name(new_status),
        ));
    }
    run.status = new_status;
    if notes.is_some() {
        run.notes = notes;
    }
    repos.payroll_runs.save(run.clone()).await?;
    Ok(run)
}

/// §4.8 `delete_draft`.
#[tracing::instrument(skip(repos))]
pub async fn delete_draft(repos: &Repositories, run_id: PayrollRunId) -> Result<(), ServerError> {
    let run = repos.payroll_runs.get(run_id).await?;
    if run.status != PayrollRunStatus::Draft {
        return Err(PayrollRunNotDeletableDraft::new(&run_id));
    }
    repos.payroll_run_employee_details.delete_by_run(run_id).await?;
    repos.payroll_runs.delete(run_id).await?;
    Ok(())
}

/// §4.8: a manual earning creates a payable item; a deduction reduces one.
#[tracing::instrument(skip(repos))]
pub async fn create_balance_adjustment(
    repos: &Repositories,
    employee_id: EmployeeId,
    adjustment_type: BalanceAdjustmentType,
    description: String,
    date: NaiveDate,
    amount_original: Decimal,
    currency_original: Currency,
    target_payable_item_id: Option<EmployeePayableItemId>,
) -> Result<EmployeeBalanceAdjustment, ServerError> {
    if adjustment_type == BalanceAdjustmentType::Deduction && target_payable_item_id.is_none() {
        return Err(BalanceAdjustmentDeductionRequiresTarget::new(&employee_id));
    }
    let (amount_ves, _) = convert_to_ves(repos, amount_original, currency_original, date).await?;

    let adjustment = EmployeeBalanceAdjustment {
        id: Uuid::new_v4(),
        employee_id,
        adjustment_type,
        description: description.clone(),
        date,
        amount_original,
        currency_original,
        amount_ves,
        target_payable_item_id,
    };

    match adjustment_type {
        BalanceAdjustmentType::Earning => {
            let item = EmployeePayableItem {
                id: Uuid::new_v4(),
                employee_id,
                source_type: PayableItemSourceType::BalanceAdjustment,
                source_id: adjustment.id,
                description,
                issue_date: date,
                amount_original,
                currency_original,
                amount_ves_at_creation: amount_ves,
                amount_paid_ves: Decimal::ZERO,
                status: PayableItemStatus::Pending,
            };
            repos.employee_payable_items.save(item).await?;
        }
        BalanceAdjustmentType::Deduction => {
            let item_id = target_payable_item_id.expect("checked above");
            let mut item = repos.employee_payable_items.get(item_id).await?;
            if item.employee_id != employee_id {
                return Err(EmployeePayableItemNotOwnedByEmployee::new(&item_id, &employee_id));
            }
            item.amount_ves_at_creation = (item.amount_ves_at_creation - amount_ves).max(Decimal::ZERO);
            repos.employee_payable_items.save(item).await?;
        }
    }

    repos.employee_balance_adjustments.save(adjustment.clone()).await?;
    Ok(adjustment)
}

pub struct EmployeeAllocationRequest {
    pub employee_payable_item_id: EmployeePayableItemId,
    pub amount_to_allocate: Decimal,
}

pub struct RecordEmployeePaymentResult {
    pub payment: EmployeePayment,
    pub allocations: Vec<EmployeePaymentAllocation>,
    pub payslip: Payslip,
}

/// §4.8 `record_employee_payment`.
#[tracing::instrument(skip(repos, allocations))]
pub async fn record_employee_payment(
    repos: &Repositories,
    employee_id: EmployeeId,
    date: NaiveDate,
    amount: Decimal,
    currency: Currency,
    allocations: Vec<EmployeeAllocationRequest>,
    method: EmployeePaymentMethod,
    now: DateTime<Utc>,
) -> Result<RecordEmployeePaymentResult, ServerError> {
    let (amount_ves_equivalent, exchange_rate_applied) = convert_to_ves(repos, amount, currency, date).await?;

    let mut items = Vec::with_capacity(allocations.len());
    let mut total_allocated_ves = Decimal::ZERO;
    for request in &allocations {
        let item = repos.employee_payable_items.get(request.employee_payable_item_id).await?;
        if item.employee_id != employee_id {
            return Err(EmployeePayableItemNotOwnedByEmployee::new(&item.id, &employee_id));
        }
        if item.status == PayableItemStatus::Paid {
            return Err(EmployeePayableItemNotOpenForAllocation::new(&item.id));
        }
        let ves_amount = match currency {
            Currency::Ves => round2(request.amount_to_allocate),
            _ => round2(request.amount_to_allocate * exchange_rate_applied.expect("non-VES payment always carries a rate")),
        };
        if !le_tolerant(ves_amount, item.balance_ves()) {
            return Err(EmployeePaymentWouldOverdrawItem::new(&item.id));
        }
        total_allocated_ves += ves_amount;
        items.push((item, ves_amount));
    }
    if !le_tolerant(total_allocated_ves, amount_ves_equivalent) {
        return Err(crate::errors::AllocationExceedsPaymentAmount::new(&total_allocated_ves, &amount_ves_equivalent));
    }

    let payment = EmployeePayment {
        id: Uuid::new_v4(),
        employee_id,
        payment_date: date,
        amount_paid: amount,
        currency_paid: currency,
        exchange_rate_applied,
        amount_paid_ves_equivalent: amount_ves_equivalent,
        method,
    };

    let mut saved_allocations = Vec::with_capacity(items.len());
    for (mut item, ves_amount) in items {
        item.amount_paid_ves = round2(item.amount_paid_ves + ves_amount);
        let fully_paid = ge_tolerant(item.amount_paid_ves, item.amount_ves_at_creation)
            || eq_tolerant(item.amount_paid_ves, item.amount_ves_at_creation);
        item.status = if fully_paid {
            PayableItemStatus::Paid
        } else if item.amount_paid_ves > Decimal::ZERO {
            PayableItemStatus::PartiallyPaid
        } else {
            item.status
        };
        repos.employee_payable_items.save(item.clone()).await?;

        let allocation = EmployeePaymentAllocation {
            id: Uuid::new_v4(),
            employee_payment_id: payment.id,
            employee_payable_item_id: item.id,
            amount_allocated_ves: ves_amount,
        };
        repos.employee_payments.save_allocation(allocation.clone()).await?;
        saved_allocations.push(allocation);
    }
    repos.employee_payments.save(payment.clone()).await?;

    let detail = repos
        .payroll_run_employee_details
        .list()
        .await?
        .into_iter()
        .filter(|d| d.employee_id == employee_id)
        .max_by_key(|d| d.payroll_run_id);
    let run = match &detail {
        Some(d) => Some(repos.payroll_runs.get(d.payroll_run_id).await?),
        None => None,
    };

    let payslip = Payslip {
        id: Uuid::new_v4(),
        employee_payment_id: payment.id,
        employee_id,
        period_start: run.as_ref().map(|r| r.period_start),
        period_end: run.as_ref().map(|r| r.period_end),
        is_advance: detail.is_none(),
        base_salary_ves: detail.as_ref().map(|d| d.base_salary_ves).unwrap_or(Decimal::ZERO),
        total_earnings_ves: detail.as_ref().map(|d| d.total_earnings_ves).unwrap_or(amount_ves_equivalent),
        total_deductions_ves: detail.as_ref().map(|d| d.total_deductions_ves).unwrap_or(Decimal::ZERO),
        net_amount_ves: detail.as_ref().map(|d| d.net_amount_to_pay_ves).unwrap_or(amount_ves_equivalent),
        component_breakdown: detail.map(|d| d.component_breakdown).unwrap_or_default(),
        issued_at: now,
    };
    repos.payslips.save(payslip.clone()).await?;

    tracing::info!(payment_id = %payment.id, employee_id = %employee_id, "employee payment recorded");
    Ok(RecordEmployeePaymentResult { payment, allocations: saved_allocations, payslip })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::organization::Employee;
    use crate::domain::entities::school_configuration::SchoolConfiguration;
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

    async fn seed_employee(repos: &Repositories) -> EmployeeId {
        let employee = Employee {
            id: Uuid::new_v4(),
            first_name: "Jose".into(),
            last_name: "Marin".into(),
            identification: "V-5555".into(),
            department_id: None,
            position_id: None,
            is_active: true,
            pay_frequency: PayFrequency::Monthly,
            base_salary_amount: dec!(2000.00),
            base_salary_currency: Currency::Ves,
            hourly_rate: None,
            accumulated_hours: Decimal::ZERO,
        };
        repos.employees.save(employee.clone()).await.unwrap();
        employee.id
    }

    #[tokio::test]
    async fn confirming_a_draft_materialises_a_payable_item_per_employee() {
        let repos = fresh_repos();
        seed_employee(&repos).await;
        let run = create_draft(
            &repos,
            "June 2025".into(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            PayFrequency::Monthly,
            None,
        )
        .await
        .unwrap();

        let confirmed = confirm_run(&repos, run.id, "admin".into(), Default::default(), Utc::now()).await.unwrap();
        assert_eq!(confirmed.status, PayrollRunStatus::Confirmed);

        let items = repos.employee_payable_items.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount_ves_at_creation, dec!(2000.00));
    }

    #[tokio::test]
    async fn confirming_twice_does_not_duplicate_details() {
        let repos = fresh_repos();
        seed_employee(&repos).await;
        let run = create_draft(
            &repos,
            "June 2025".into(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            PayFrequency::Monthly,
            None,
        )
        .await
        .unwrap();
        confirm_run(&repos, run.id, "admin".into(), Default::default(), Utc::now()).await.unwrap();

        let err = update_status(&repos, run.id, PayrollRunStatus::Draft, None).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn deleting_a_confirmed_run_is_rejected() {
        let repos = fresh_repos();
        seed_employee(&repos).await;
        let run = create_draft(
            &repos,
            "June 2025".into(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            PayFrequency::Monthly,
            None,
        )
        .await
        .unwrap();
        confirm_run(&repos, run.id, "admin".into(), Default::default(), Utc::now()).await.unwrap();
        let err = delete_draft(&repos, run.id).await;
        assert!(err.is_err());
    }
}
