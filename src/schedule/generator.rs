use crate::calendar::add_months;
use crate::decimal::{CurrencyPrecision, Money};
use crate::errors::{Result, ScheduleError};
use crate::schedule::payment::compute_level_payment_with;
use crate::types::{InstallmentRow, LoanTerms};

/// generate the installment schedule with two-digit rounding
pub fn generate_schedule(terms: &LoanTerms) -> Result<Vec<InstallmentRow>> {
    generate_schedule_with(terms, &CurrencyPrecision::default())
}

/// generate the installment schedule, one row per month
///
/// Interest for each period is charged on the balance still outstanding. Every
/// split is rounded to the minor unit before it touches the running balance,
/// and the final row takes whatever balance is left so the principal column
/// sums to the rounded loan amount exactly.
pub fn generate_schedule_with(terms: &LoanTerms, precision: &CurrencyPrecision) -> Result<Vec<InstallmentRow>> {
    terms.validate(precision)?;
    // a term running past the calendar fails here, before any rows are built
    add_months(terms.start_date, terms.term_months)?;

    let principal = terms.financed_principal(precision);
    let payment = compute_level_payment_with(principal, terms.annual_rate, terms.term_months, precision)?;
    let monthly_rate = terms.annual_rate.monthly_rate();

    let mut rows = Vec::with_capacity(terms.term_months as usize);
    let mut remaining = principal;

    for i in 1..=terms.term_months {
        let due_date = add_months(terms.start_date, i)?;

        let (interest, mut principal_part) = if monthly_rate.is_zero() {
            (precision.round_money(Money::ZERO), payment)
        } else {
            let accrued = remaining.checked_mul_rate(monthly_rate).ok_or_else(|| {
                ScheduleError::anomaly(format!("interest overflows on installment {i}"))
            })?;
            let interest = precision.round_money(accrued);
            (interest, precision.round_money(payment - interest))
        };

        if principal_part.is_negative() {
            return Err(ScheduleError::anomaly(format!(
                "installment {i} does not cover its interest: payment {payment}, interest {interest}"
            )));
        }

        if i == terms.term_months {
            principal_part = remaining;
        }

        // never take more than is owed; the balance stays at zero rather than going negative
        principal_part = principal_part.min(remaining);
        remaining -= principal_part;

        rows.push(InstallmentRow {
            installment_number: i,
            due_date,
            principal_amount: principal_part,
            interest_amount: interest,
            total_amount: principal_part + interest,
            remaining_amount: remaining,
        });
    }

    Ok(rows)
}
