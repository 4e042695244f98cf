use thiserror::Error;

use crate::types::LoanId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid argument: {message}")]
    InvalidArgument {
        message: String,
    },

    #[error("arithmetic anomaly: {message}")]
    ArithmeticAnomaly {
        message: String,
    },

    #[error("persistence failure for loan {loan_id}: {message}")]
    PersistenceFailure {
        loan_id: LoanId,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },
}

impl ScheduleError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        ScheduleError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn anomaly(message: impl Into<String>) -> Self {
        ScheduleError::ArithmeticAnomaly {
            message: message.into(),
        }
    }

    pub(crate) fn persistence(loan_id: LoanId, message: impl Into<String>) -> Self {
        ScheduleError::PersistenceFailure {
            loan_id,
            message: message.into(),
        }
    }

    /// true for failures caused by the caller's input rather than a defect or the store
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ScheduleError::InvalidArgument { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
