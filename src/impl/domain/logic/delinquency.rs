use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::entities::applied_charge::AppliedCharge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelinquencyClass {
    Green,
    Orange,
    Red,
}

fn first_day_of_month_offset(today: NaiveDate, months_back: u32) -> NaiveDate {
    let mut year = today.year();
    let mut month = today.month() as i32 - months_back as i32;
    while month <= 0 {
        month += 12;
        year -= 1;
    }
    NaiveDate::from_ymd_opt(year, month as u32, 1).expect("valid calendar month")
}

/// Classifies a student's delinquency on `today` — §4.9/§9 (the current- or
/// previous-partial-month corner case is formalised as `orange`, per the
/// Open Question in §9).
pub fn classify_student(open_charges: &[&AppliedCharge], today: NaiveDate) -> DelinquencyClass {
    let oldest_overdue = open_charges
        .iter()
        .filter(|c| c.display_status(today) == crate::domain::entities::applied_charge::ChargeStatus::Overdue)
        .map(|c| c.due_date)
        .min();

    let Some(oldest) = oldest_overdue else {
        return DelinquencyClass::Green;
    };

    let prev_prev_month_start = first_day_of_month_offset(today, 2);
    let prev_month_start = first_day_of_month_offset(today, 1);

    if oldest < prev_prev_month_start {
        DelinquencyClass::Red
    } else if oldest < prev_month_start {
        DelinquencyClass::Orange
    } else {
        DelinquencyClass::Orange
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::applied_charge::ChargeStatus;
    use crate::money::Currency;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn charge(due_date: NaiveDate, status: ChargeStatus) -> AppliedCharge {
        AppliedCharge {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            charge_concept_id: None,
            invoice_id: None,
            description: "tuition".into(),
            original_concept_amount: dec!(100),
            original_concept_currency: Currency::Ves,
            is_indexed: false,
            exchange_rate_applied_at_emission: None,
            amount_due_original_currency: dec!(100),
            amount_due_ves_at_emission: dec!(100),
            amount_paid_original_currency_equivalent: Decimal::ZERO,
            amount_paid_ves: Decimal::ZERO,
            issue_date: due_date,
            due_date,
            status,
        }
    }

    #[test]
    fn no_open_charges_is_green() {
        assert_eq!(classify_student(&[], NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()), DelinquencyClass::Green);
    }

    #[test]
    fn overdue_within_current_month_window_is_orange() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let c = charge(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), ChargeStatus::Pending);
        assert_eq!(classify_student(&[&c], today), DelinquencyClass::Orange);
    }

    #[test]
    fn overdue_two_months_back_is_red() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let c = charge(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(), ChargeStatus::Pending);
        assert_eq!(classify_student(&[&c], today), DelinquencyClass::Red);
    }
}
