use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::LoanId;

/// events emitted while schedules are computed and stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ScheduleGenerated {
        loan_id: LoanId,
        installments: u32,
        level_payment: Money,
        total_interest: Money,
        maturity_date: Option<NaiveDate>,
        timestamp: DateTime<Utc>,
    },
    ScheduleReplaced {
        loan_id: LoanId,
        revision: u64,
        timestamp: DateTime<Utc>,
    },
    ScheduleReplaceFailed {
        loan_id: LoanId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    ScheduleRejected {
        loan_id: LoanId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn loan_id(&self) -> LoanId {
        match self {
            Event::ScheduleGenerated { loan_id, .. }
            | Event::ScheduleReplaced { loan_id, .. }
            | Event::ScheduleReplaceFailed { loan_id, .. }
            | Event::ScheduleRejected { loan_id, .. } => *loan_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
