use rust_decimal::Decimal;

use crate::domain::entities::organization::PayFrequency;
use crate::domain::entities::payroll_run::ComponentBreakdownLine;
use crate::domain::entities::salary_component::ComponentType;
use crate::money::round2;

/// Result of computing one employee's pay for a run — §4.8 step 4. VES-only;
/// currency conversion has already happened by the time these values are
/// assembled (the caller resolves each USD figure via the currency service
/// before calling in).
pub struct EmployeePayResult {
    pub base_salary_ves: Decimal,
    pub total_earnings_ves: Decimal,
    pub total_deductions_ves: Decimal,
    pub net_amount_to_pay_ves: Decimal,
    pub component_breakdown: Vec<ComponentBreakdownLine>,
}

/// Base salary for the period, given an already-VES-converted base figure
/// and the run's frequency coverage — §4.8 step 4 "Base salary in VES".
/// Hourly pay and the monthly-covered-by-fortnightly halving are resolved by
/// the caller before this (they depend on the hours map / employee
/// frequency, not on pure arithmetic alone); this helper documents the
/// monthly/fortnightly halving rule in one place.
pub fn halve_if_fortnightly_covering_monthly(
    base_salary_ves_full_period: Decimal,
    employee_frequency: PayFrequency,
    run_frequency_covered: PayFrequency,
) -> Decimal {
    if employee_frequency == PayFrequency::Monthly && run_frequency_covered == PayFrequency::Fortnightly {
        round2(base_salary_ves_full_period / Decimal::from(2))
    } else {
        round2(base_salary_ves_full_period)
    }
}

/// Combines a base salary and a list of already-VES-converted component
/// lines into the per-employee pay result — §4.8 step 4/8.
pub fn combine_pay_result(
    base_salary_ves: Decimal,
    lines: Vec<ComponentBreakdownLine>,
) -> EmployeePayResult {
    let total_earnings_from_components: Decimal = lines
        .iter()
        .filter(|l| l.component_type == ComponentType::Earning)
        .map(|l| l.amount_ves)
        .sum();
    let total_deductions: Decimal = lines
        .iter()
        .filter(|l| l.component_type == ComponentType::Deduction)
        .map(|l| l.amount_ves)
        .sum();
    let total_earnings = round2(base_salary_ves + total_earnings_from_components);
    let total_deductions = round2(total_deductions);
    // §8 invariant 8: net = earnings - deductions exactly, after 2dp rounding
    // of the constituents. Intentionally un-floored at zero — §9.
    let net = total_earnings - total_deductions;

    EmployeePayResult {
        base_salary_ves,
        total_earnings_ves: total_earnings,
        total_deductions_ves: total_deductions,
        net_amount_to_pay_ves: net,
        component_breakdown: lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn monthly_employee_on_fortnightly_run_is_halved() {
        let half = halve_if_fortnightly_covering_monthly(dec!(1000.00), PayFrequency::Monthly, PayFrequency::Fortnightly);
        assert_eq!(half, dec!(500.00));
    }

    #[test]
    fn fortnightly_employee_on_fortnightly_run_is_not_halved() {
        let full = halve_if_fortnightly_covering_monthly(dec!(500.00), PayFrequency::Fortnightly, PayFrequency::Fortnightly);
        assert_eq!(full, dec!(500.00));
    }

    #[test]
    fn net_pay_conserves_earnings_minus_deductions() {
        let lines = vec![
            ComponentBreakdownLine { name: "Bonus".into(), component_type: ComponentType::Earning, amount_ves: dec!(200.00) },
            ComponentBreakdownLine { name: "Tax".into(), component_type: ComponentType::Deduction, amount_ves: dec!(50.00) },
        ];
        let result = combine_pay_result(dec!(1000.00), lines);
        assert_eq!(result.total_earnings_ves, dec!(1200.00));
        assert_eq!(result.total_deductions_ves, dec!(50.00));
        assert_eq!(result.net_amount_to_pay_ves, dec!(1150.00));
    }

    #[test]
    fn deductions_may_drive_net_negative() {
        let lines = vec![ComponentBreakdownLine {
            name: "Loan repayment".into(),
            component_type: ComponentType::Deduction,
            amount_ves: dec!(5000.00),
        }];
        let result = combine_pay_result(dec!(1000.00), lines);
        assert_eq!(result.net_amount_to_pay_ves, dec!(-4000.00));
    }
}
