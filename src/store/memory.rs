use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::{Result, ScheduleError};
use crate::store::{ScheduleStore, StoredSchedule};
use crate::types::{InstallmentRow, LoanId};

/// process-local store; each replace swaps a single `Arc` under the write lock
#[derive(Debug, Default)]
pub struct InMemoryScheduleStore {
    schedules: RwLock<HashMap<LoanId, Arc<StoredSchedule>>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// number of loans with a stored schedule, still counted after a writer panicked
    pub fn len(&self) -> usize {
        self.schedules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn replace_schedule(
        &self,
        loan_id: LoanId,
        rows: &[InstallmentRow],
        replaced_at: DateTime<Utc>,
    ) -> Result<StoredSchedule> {
        let mut schedules = self
            .schedules
            .write()
            .map_err(|_| ScheduleError::persistence(loan_id, "schedule store lock poisoned"))?;

        let revision = schedules.get(&loan_id).map_or(1, |s| s.revision + 1);
        let stored = Arc::new(StoredSchedule {
            loan_id,
            revision,
            replaced_at,
            rows: rows.to_vec(),
        });
        schedules.insert(loan_id, Arc::clone(&stored));

        debug!(%loan_id, revision, installments = rows.len(), "schedule swapped in memory");
        Ok(StoredSchedule::clone(&stored))
    }

    fn read_stored(&self, loan_id: LoanId) -> Result<Option<StoredSchedule>> {
        let current = {
            let schedules = self
                .schedules
                .read()
                .map_err(|_| ScheduleError::persistence(loan_id, "schedule store lock poisoned"))?;
            schedules.get(&loan_id).cloned()
        };
        Ok(current.map(|s| StoredSchedule::clone(&s)))
    }
}
