use rust_decimal::Decimal;

use crate::domain::entities::student::Student;
use crate::money::{clamp_non_negative, round2};

/// Applies a student's scholarship discount to a VES amount — §4.2 (C2).
/// Only one discount path applies; percentage takes precedence when both a
/// percentage and a fixed amount are set.
pub fn apply_scholarship(student: &Student, amount_ves: Decimal) -> Decimal {
    let discounted = if student.has_scholarship && student.scholarship_percentage > Decimal::ZERO
    {
        amount_ves - round2(amount_ves * student.scholarship_percentage / Decimal::from(100))
    } else if student.has_scholarship && student.scholarship_fixed_amount_ves > Decimal::ZERO {
        amount_ves - student.scholarship_fixed_amount_ves
    } else {
        amount_ves
    };
    clamp_non_negative(discounted)
}
