/// loan schedule - generate, store and query a beneficiary loan
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use waqf_amortization::{
    InMemoryScheduleStore, LoanTerms, Money, Rate, SafeTimeProvider, ScheduleConfig,
    ScheduleService, TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== loan schedule ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let mut service = ScheduleService::new(InMemoryScheduleStore::new(), ScheduleConfig::sar());
    let loan_id = Uuid::new_v4();

    let terms = LoanTerms::builder()
        .principal(Money::from_major(100_000))
        .annual_rate(Rate::from_percent(dec!(6)))
        .term_months(24)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .build()?;

    let schedule = service.recalculate(loan_id, terms, &time)?;

    println!("level payment:  {}", schedule.level_payment);
    println!("total interest: {}", schedule.total_interest);
    println!("total paid:     {}", schedule.total_paid);
    println!();
    println!("{:>3}  {:<10}  {:>10}  {:>9}  {:>10}  {:>11}", "#", "due", "principal", "interest", "total", "remaining");
    for row in &schedule.installments {
        println!(
            "{:>3}  {:<10}  {:>10}  {:>9}  {:>10}  {:>11}",
            row.installment_number,
            row.due_date,
            row.principal_amount,
            row.interest_amount,
            row.total_amount,
            row.remaining_amount
        );
    }

    // interest-free (qard hasan) revision replaces the stored schedule
    let revised = LoanTerms::builder()
        .principal(Money::from_major(12_000))
        .term_months(12)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .build()?;
    service.recalculate(loan_id, revised, &time)?;
    println!("\nrevision {:?}, {} rows stored", service.revision(loan_id)?, service.load(loan_id)?.len());

    controller.advance(Duration::days(75));
    if let Some(next) = service.next_installment(loan_id, &time)? {
        println!("next due on {}: {}", next.due_date, next.total_amount);
    }
    println!("{} installments already due", service.elapsed_installments(loan_id, &time)?.len());

    for event in service.take_events() {
        println!("{:?}", event);
    }

    Ok(())
}
