//! Persistence boundary for generated schedules.
//!
//! A store keeps exactly one schedule per loan. `replace_schedule` swaps the
//! whole row set in one step: readers see either the previous schedule or the
//! new one, never a mix, and when two replaces race the later one wins in full.

pub mod file;
pub mod memory;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::types::{InstallmentRow, LoanId};

pub use file::JsonFileScheduleStore;
pub use memory::InMemoryScheduleStore;

/// a schedule as persisted for one loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSchedule {
    pub loan_id: LoanId,
    /// starts at 1 and increases by one on every replace
    pub revision: u64,
    pub replaced_at: DateTime<Utc>,
    pub rows: Vec<InstallmentRow>,
}

/// trait for schedule persistence
pub trait ScheduleStore: Send + Sync {
    /// replace any stored schedule for the loan with `rows`, all or nothing
    fn replace_schedule(
        &self,
        loan_id: LoanId,
        rows: &[InstallmentRow],
        replaced_at: DateTime<Utc>,
    ) -> Result<StoredSchedule>;

    /// stored schedule with its revision, None when nothing was stored yet
    fn read_stored(&self, loan_id: LoanId) -> Result<Option<StoredSchedule>>;

    /// stored rows ordered by installment number, empty when nothing was stored yet
    fn read_schedule(&self, loan_id: LoanId) -> Result<Vec<InstallmentRow>> {
        Ok(self
            .read_stored(loan_id)?
            .map(|stored| stored.rows)
            .unwrap_or_default())
    }
}

impl<T: ScheduleStore + ?Sized> ScheduleStore for Arc<T> {
    fn replace_schedule(
        &self,
        loan_id: LoanId,
        rows: &[InstallmentRow],
        replaced_at: DateTime<Utc>,
    ) -> Result<StoredSchedule> {
        (**self).replace_schedule(loan_id, rows, replaced_at)
    }

    fn read_stored(&self, loan_id: LoanId) -> Result<Option<StoredSchedule>> {
        (**self).read_stored(loan_id)
    }
}
