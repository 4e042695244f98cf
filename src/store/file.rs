use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{Result, ScheduleError};
use crate::store::{ScheduleStore, StoredSchedule};
use crate::types::{InstallmentRow, LoanId};

/// one json document per loan, replaced by write-then-rename
///
/// The new document is written and synced to a uniquely named temp file in the
/// same directory, then renamed over `<loan_id>.json`. Rename within a
/// directory is atomic, so a reader opens either the old file or the new one.
#[derive(Debug)]
pub struct JsonFileScheduleStore {
    dir: PathBuf,
    // serializes revision bumps within this process
    write_lock: Mutex<()>,
}

impl JsonFileScheduleStore {
    /// open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| ScheduleError::InvalidConfiguration {
            message: format!("cannot create schedule directory {}: {e}", dir.display()),
        })?;

        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, loan_id: LoanId) -> PathBuf {
        self.dir.join(format!("{loan_id}.json"))
    }

    fn write_atomically(&self, loan_id: LoanId, stored: &StoredSchedule) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(stored)
            .map_err(|e| ScheduleError::persistence(loan_id, format!("encode failed: {e}")))?;

        let tmp = self.dir.join(format!(".{loan_id}.{}.tmp", Uuid::new_v4()));
        let written = File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(&bytes)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&tmp, self.path_for(loan_id)));

        if let Err(e) = written {
            // the target file is untouched on failure
            let _ = fs::remove_file(&tmp);
            return Err(ScheduleError::persistence(loan_id, format!("write failed: {e}")));
        }

        Ok(())
    }
}

impl ScheduleStore for JsonFileScheduleStore {
    fn replace_schedule(
        &self,
        loan_id: LoanId,
        rows: &[InstallmentRow],
        replaced_at: DateTime<Utc>,
    ) -> Result<StoredSchedule> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ScheduleError::persistence(loan_id, "schedule store lock poisoned"))?;

        let revision = self.read_stored(loan_id)?.map_or(1, |s| s.revision + 1);
        let stored = StoredSchedule {
            loan_id,
            revision,
            replaced_at,
            rows: rows.to_vec(),
        };

        self.write_atomically(loan_id, &stored)?;
        debug!(%loan_id, revision, path = %self.path_for(loan_id).display(), "schedule written");
        Ok(stored)
    }

    fn read_stored(&self, loan_id: LoanId) -> Result<Option<StoredSchedule>> {
        let path = self.path_for(loan_id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ScheduleError::persistence(loan_id, format!("read failed: {e}"))),
        };

        let stored: StoredSchedule = serde_json::from_slice(&bytes)
            .map_err(|e| ScheduleError::persistence(loan_id, format!("decode failed: {e}")))?;

        if stored.loan_id != loan_id {
            warn!(%loan_id, found = %stored.loan_id, path = %path.display(), "schedule file holds another loan");
            return Err(ScheduleError::persistence(
                loan_id,
                format!("{} holds the schedule of loan {}", path.display(), stored.loan_id),
            ));
        }

        Ok(Some(stored))
    }
}
