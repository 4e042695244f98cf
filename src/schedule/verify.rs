use crate::calendar::add_months;
use crate::decimal::{CurrencyPrecision, Money};
use crate::errors::{Result, ScheduleError};
use crate::schedule::payment::compute_level_payment_with;
use crate::types::{InstallmentRow, LoanTerms};

/// check a schedule against the terms it was generated from
///
/// Any failure here is a defect in the generator (or a tampered row set), so it
/// surfaces as an arithmetic anomaly naming the offending installment.
pub fn verify_schedule(terms: &LoanTerms, rows: &[InstallmentRow], precision: &CurrencyPrecision) -> Result<()> {
    terms.validate(precision)?;

    if rows.len() != terms.term_months as usize {
        return Err(ScheduleError::anomaly(format!(
            "expected {} installments, found {}",
            terms.term_months,
            rows.len()
        )));
    }

    let principal = terms.financed_principal(precision);
    let payment = compute_level_payment_with(principal, terms.annual_rate, terms.term_months, precision)?;
    let last_number = terms.term_months;
    let mut previous_remaining = principal;
    let mut principal_paid = Money::ZERO;

    for (index, row) in rows.iter().enumerate() {
        let n = row.installment_number;
        let fail = |what: &str| Err(ScheduleError::anomaly(format!("installment {n}: {what}")));

        if n as usize != index + 1 {
            return fail("numbering is not contiguous from 1");
        }

        if row.due_date != add_months(terms.start_date, n)? {
            return fail("due date is not a whole number of months after the start date");
        }

        let amounts = [
            row.principal_amount,
            row.interest_amount,
            row.total_amount,
            row.remaining_amount,
        ];
        if amounts.iter().any(|a| a.is_negative()) {
            return fail("negative amount");
        }
        if amounts.iter().any(|a| !precision.fits(*a)) {
            return fail("amount carries sub-minor-unit digits");
        }

        if row.total_amount != row.principal_amount + row.interest_amount {
            return fail("total is not principal plus interest");
        }

        if row.remaining_amount != previous_remaining - row.principal_amount {
            return fail("remaining balance does not follow from the previous row");
        }

        if n != last_number && row.total_amount != payment && !row.remaining_amount.is_zero() {
            return fail("total differs from the level payment");
        }

        principal_paid += row.principal_amount;
        previous_remaining = row.remaining_amount;
    }

    if !previous_remaining.is_zero() {
        return Err(ScheduleError::anomaly(format!(
            "final balance is {previous_remaining}, expected zero"
        )));
    }

    if principal_paid != principal {
        return Err(ScheduleError::anomaly(format!(
            "principal paid {principal_paid} does not match loan principal {principal}"
        )));
    }

    Ok(())
}
