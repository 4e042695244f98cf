pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod schedule;
pub mod service;
pub mod store;
pub mod types;

// re-export key types
pub use config::ScheduleConfig;
pub use decimal::{round2, CurrencyPrecision, Money, Rate, RoundingMode};
pub use errors::{Result, ScheduleError};
pub use events::{Event, EventStore};
pub use schedule::{
    compute_level_payment, compute_level_payment_with, generate_schedule, generate_schedule_with,
    verify_schedule, AmortizationSchedule,
};
pub use service::ScheduleService;
pub use store::{InMemoryScheduleStore, JsonFileScheduleStore, ScheduleStore, StoredSchedule};
pub use types::{InstallmentRow, LoanId, LoanTerms, LoanTermsBuilder};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
