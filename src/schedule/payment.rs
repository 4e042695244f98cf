use rust_decimal::{Decimal, MathematicalOps};

use crate::decimal::{CurrencyPrecision, Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::types::validate_amounts;

/// level payment rounded to two decimal places
pub fn compute_level_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Result<Money> {
    compute_level_payment_with(principal, annual_rate, term_months, &CurrencyPrecision::default())
}

/// level payment rounded to the given precision
///
/// The principal is first rounded to the minor unit. Interest-free loans split
/// it evenly. Otherwise the annuity formula is used with the monthly rate
/// `r = annual / 12`, in its discounted form:
///
/// `payment = P * r / (1 - (1 + r)^-n)`
///
/// The discount factor shrinks towards zero for high rates or long terms, so
/// the payment tends to `P * r` instead of overflowing.
pub fn compute_level_payment_with(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    precision: &CurrencyPrecision,
) -> Result<Money> {
    let principal = precision.round_money(principal);
    validate_amounts(principal, annual_rate, term_months)?;

    if annual_rate.is_zero() {
        let share = principal.as_decimal() / Decimal::from(term_months);
        return Ok(precision.round_money(Money::from_decimal(share)));
    }

    let r = annual_rate.monthly_rate().as_decimal();
    let overflow = || {
        ScheduleError::anomaly(format!(
            "level payment overflows for rate {annual_rate} over {term_months} months"
        ))
    };

    let discount = (Decimal::ONE / (Decimal::ONE + r))
        .checked_powu(u64::from(term_months))
        .ok_or_else(overflow)?;

    let numerator = principal.as_decimal().checked_mul(r).ok_or_else(overflow)?;

    let denominator = Decimal::ONE - discount;
    if denominator.is_zero() {
        return Err(ScheduleError::anomaly(format!(
            "rate {annual_rate} is below fixed-point resolution"
        )));
    }

    let payment = numerator.checked_div(denominator).ok_or_else(overflow)?;
    Ok(precision.round_money(Money::from_decimal(payment)))
}
