use hourglass_rs::SafeTimeProvider;
use tracing::{error, info, warn};

use crate::config::ScheduleConfig;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::schedule::{self, AmortizationSchedule};
use crate::store::ScheduleStore;
use crate::types::{InstallmentRow, LoanId, LoanTerms};

/// generates, verifies and stores loan schedules
pub struct ScheduleService<S: ScheduleStore> {
    store: S,
    config: ScheduleConfig,
    events: EventStore,
}

impl<S: ScheduleStore> ScheduleService<S> {
    pub fn new(store: S, config: ScheduleConfig) -> Self {
        Self {
            store,
            config,
            events: EventStore::new(),
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// compute a fresh schedule for the loan and replace whatever was stored
    ///
    /// Invalid terms fail before the store is touched. A store failure is
    /// returned as-is; the previously stored schedule stays in place.
    pub fn recalculate(
        &mut self,
        loan_id: LoanId,
        terms: LoanTerms,
        time: &SafeTimeProvider,
    ) -> Result<AmortizationSchedule> {
        let now = time.now();

        let schedule = match AmortizationSchedule::generate(terms, &self.config.precision) {
            Ok(schedule) => schedule,
            Err(e) => {
                warn!(%loan_id, error = %e, "schedule rejected");
                self.events.emit(Event::ScheduleRejected {
                    loan_id,
                    reason: e.to_string(),
                    timestamp: now,
                });
                return Err(e);
            }
        };

        self.events.emit(Event::ScheduleGenerated {
            loan_id,
            installments: schedule.terms.term_months,
            level_payment: schedule.level_payment,
            total_interest: schedule.total_interest,
            maturity_date: schedule.maturity_date(),
            timestamp: now,
        });

        match self.store.replace_schedule(loan_id, &schedule.installments, now) {
            Ok(stored) => {
                info!(
                    %loan_id,
                    revision = stored.revision,
                    installments = stored.rows.len(),
                    level_payment = %schedule.level_payment,
                    currency = %self.config.currency_code,
                    "schedule replaced"
                );
                self.events.emit(Event::ScheduleReplaced {
                    loan_id,
                    revision: stored.revision,
                    timestamp: now,
                });
                Ok(schedule)
            }
            Err(e) => {
                error!(%loan_id, error = %e, "schedule replace failed");
                self.events.emit(Event::ScheduleReplaceFailed {
                    loan_id,
                    reason: e.to_string(),
                    timestamp: now,
                });
                Err(e)
            }
        }
    }

    /// stored rows for the loan, empty if none
    pub fn load(&self, loan_id: LoanId) -> Result<Vec<InstallmentRow>> {
        self.store.read_schedule(loan_id)
    }

    /// revision of the stored schedule, None if none
    pub fn revision(&self, loan_id: LoanId) -> Result<Option<u64>> {
        Ok(self.store.read_stored(loan_id)?.map(|s| s.revision))
    }

    /// first stored installment due today or later
    pub fn next_installment(&self, loan_id: LoanId, time: &SafeTimeProvider) -> Result<Option<InstallmentRow>> {
        let today = time.now().date_naive();
        let rows = self.load(loan_id)?;
        Ok(schedule::next_due(&rows, today).cloned())
    }

    /// stored installments whose due date has already passed
    pub fn elapsed_installments(&self, loan_id: LoanId, time: &SafeTimeProvider) -> Result<Vec<InstallmentRow>> {
        let today = time.now().date_naive();
        let rows = self.load(loan_id)?;
        Ok(schedule::elapsed(&rows, today).to_vec())
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::errors::ScheduleError;
    use crate::store::{InMemoryScheduleStore, StoredSchedule};
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    struct UnavailableStore;

    impl ScheduleStore for UnavailableStore {
        fn replace_schedule(
            &self,
            loan_id: LoanId,
            _rows: &[InstallmentRow],
            _replaced_at: DateTime<Utc>,
        ) -> Result<StoredSchedule> {
            Err(ScheduleError::persistence(loan_id, "database unavailable"))
        }

        fn read_stored(&self, loan_id: LoanId) -> Result<Option<StoredSchedule>> {
            Err(ScheduleError::persistence(loan_id, "database unavailable"))
        }
    }

    fn clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        ))
    }

    fn terms(principal: i64, rate_percent: rust_decimal::Decimal, months: u32) -> LoanTerms {
        LoanTerms::new(
            Money::from_major(principal),
            Rate::from_percent(rate_percent),
            months,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn test_recalculate_persists_and_emits() {
        let time = clock();
        let mut service = ScheduleService::new(InMemoryScheduleStore::new(), ScheduleConfig::sar());
        let loan_id = Uuid::new_v4();

        let schedule = service.recalculate(loan_id, terms(100_000, dec!(6), 24), &time).unwrap();

        assert_eq!(service.load(loan_id).unwrap(), schedule.installments);
        assert_eq!(service.revision(loan_id).unwrap(), Some(1));

        let events = service.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            Event::ScheduleGenerated { installments: 24, .. }
        ));
        assert!(matches!(events[1], Event::ScheduleReplaced { revision: 1, .. }));
        assert!(events.iter().all(|e| e.loan_id() == loan_id));
        assert!(service.events().is_empty());
    }

    #[test]
    fn test_recalculate_replaces_previous_schedule() {
        let time = clock();
        let mut service = ScheduleService::new(InMemoryScheduleStore::new(), ScheduleConfig::sar());
        let loan_id = Uuid::new_v4();

        service.recalculate(loan_id, terms(12_000, dec!(0), 12), &time).unwrap();
        let revised = service.recalculate(loan_id, terms(12_000, dec!(0), 6), &time).unwrap();

        let stored = service.load(loan_id).unwrap();
        assert_eq!(stored.len(), 6);
        assert_eq!(stored, revised.installments);
        assert_eq!(service.revision(loan_id).unwrap(), Some(2));
    }

    #[test]
    fn test_invalid_terms_never_reach_the_store() {
        let time = clock();
        let mut service = ScheduleService::new(InMemoryScheduleStore::new(), ScheduleConfig::sar());
        let loan_id = Uuid::new_v4();

        let err = service.recalculate(loan_id, terms(-5, dec!(5), 12), &time).unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(service.store().is_empty());
        assert!(matches!(service.events(), [Event::ScheduleRejected { .. }]));
    }

    #[test]
    fn test_store_failure_propagates() {
        let time = clock();
        let mut service = ScheduleService::new(UnavailableStore, ScheduleConfig::sar());
        let loan_id = Uuid::new_v4();

        let err = service.recalculate(loan_id, terms(10_000, dec!(5), 12), &time).unwrap_err();

        assert!(matches!(err, ScheduleError::PersistenceFailure { .. }));
        assert!(matches!(
            service.events(),
            [Event::ScheduleGenerated { .. }, Event::ScheduleReplaceFailed { .. }]
        ));
        assert!(service.load(loan_id).is_err());
    }

    #[test]
    fn test_clock_driven_queries() {
        let time = clock();
        let control = time.test_control().unwrap();
        let mut service = ScheduleService::new(InMemoryScheduleStore::new(), ScheduleConfig::sar());
        let loan_id = Uuid::new_v4();

        service.recalculate(loan_id, terms(12_000, dec!(0), 12), &time).unwrap();

        let next = service.next_installment(loan_id, &time).unwrap().unwrap();
        assert_eq!(next.installment_number, 1);
        assert!(service.elapsed_installments(loan_id, &time).unwrap().is_empty());

        // 2024-04-10: three installments have fallen due
        control.advance(Duration::days(100));
        let elapsed = service.elapsed_installments(loan_id, &time).unwrap();
        assert_eq!(elapsed.len(), 3);
        assert_eq!(elapsed[2].remaining_amount, Money::from_decimal(dec!(9000.00)));
        assert_eq!(service.next_installment(loan_id, &time).unwrap().unwrap().installment_number, 4);
    }

    #[test]
    fn test_three_digit_currency() {
        let time = clock();
        let config = ScheduleConfig::with_minor_digits("KWD", 3).unwrap();
        let mut service = ScheduleService::new(InMemoryScheduleStore::new(), config);

        let schedule = service
            .recalculate(Uuid::new_v4(), terms(1_000, dec!(10), 1), &time)
            .unwrap();

        assert_eq!(schedule.installments[0].interest_amount, Money::from_decimal(dec!(8.333)));
        assert_eq!(schedule.installments[0].total_amount, Money::from_decimal(dec!(1008.333)));
    }
}
