use serde::{Deserialize, Serialize};

use crate::decimal::{CurrencyPrecision, RoundingMode, MAX_MINOR_DIGITS};
use crate::errors::{Result, ScheduleError};

/// schedule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// ISO 4217 code, informational only
    pub currency_code: String,
    pub precision: CurrencyPrecision,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::sar()
    }
}

impl ScheduleConfig {
    /// saudi riyal, two-digit halalas, half-up
    pub fn sar() -> Self {
        Self {
            currency_code: "SAR".to_string(),
            precision: CurrencyPrecision::new(2, RoundingMode::HalfUp),
        }
    }

    /// currency with a non-standard minor unit, e.g. KWD with three
    pub fn with_minor_digits(currency_code: &str, minor_digits: u32) -> Result<Self> {
        let config = Self {
            currency_code: currency_code.to_string(),
            precision: CurrencyPrecision::new(minor_digits, RoundingMode::HalfUp),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn rounding(mut self, rounding: RoundingMode) -> Self {
        self.precision.rounding = rounding;
        self
    }

    /// load from a json document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ScheduleConfig =
            serde_json::from_str(json).map_err(|e| ScheduleError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency_code.trim().is_empty() {
            return Err(ScheduleError::InvalidConfiguration {
                message: "currency code required".to_string(),
            });
        }

        if self.precision.minor_digits > MAX_MINOR_DIGITS {
            return Err(ScheduleError::InvalidConfiguration {
                message: format!(
                    "{} minor digits exceeds the supported maximum of {MAX_MINOR_DIGITS}",
                    self.precision.minor_digits
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sar() {
        let config = ScheduleConfig::default();
        assert_eq!(config.currency_code, "SAR");
        assert_eq!(config.precision.minor_digits, 2);
        assert_eq!(config.precision.rounding, RoundingMode::HalfUp);
    }

    #[test]
    fn test_from_json() {
        let config = ScheduleConfig::from_json(
            r#"{ "currency_code": "KWD", "precision": { "minor_digits": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.precision.minor_digits, 3);
        // rounding falls back to half-up when omitted
        assert_eq!(config.precision.rounding, RoundingMode::HalfUp);

        let bankers = ScheduleConfig::from_json(
            r#"{ "currency_code": "USD", "precision": { "minor_digits": 2, "rounding": "Bankers" } }"#,
        )
        .unwrap();
        assert_eq!(bankers.precision.rounding, RoundingMode::Bankers);
    }

    #[test]
    fn test_rejects_bad_config() {
        let malformed = ScheduleConfig::from_json("{ not json");
        assert!(matches!(malformed, Err(ScheduleError::InvalidConfiguration { .. })));

        let too_precise = ScheduleConfig::with_minor_digits("XXX", 9);
        assert!(matches!(too_precise, Err(ScheduleError::InvalidConfiguration { .. })));

        let unnamed = ScheduleConfig::from_json(r#"{ "currency_code": " ", "precision": { "minor_digits": 2 } }"#);
        assert!(unnamed.is_err());
    }

    #[test]
    fn test_rounding_override() {
        let config = ScheduleConfig::sar().rounding(RoundingMode::Bankers);
        assert_eq!(config.precision.rounding, RoundingMode::Bankers);
    }
}
