//! Calculator settings, loadable from TOML

use std::path::Path;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Statutory SST rate in percent
pub const STATUTORY_SST_RATE: i64 = 6;

/// Number of recent filing periods listed by default
pub const DEFAULT_HISTORY_MONTHS: usize = 6;

/// Tunable parameters for the calculators
///
/// ```toml
/// sst_rate = "6"
/// history_months = 12
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxSettings {
    /// SST rate in percent applied to taxable invoice totals
    pub sst_rate: BigDecimal,
    /// How many filing periods back to list
    pub history_months: usize,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            sst_rate: BigDecimal::from(STATUTORY_SST_RATE),
            history_months: DEFAULT_HISTORY_MONTHS,
        }
    }
}

impl TaxSettings {
    /// Parse and validate settings from a TOML document
    pub fn from_toml_str(content: &str) -> TaxResult<Self> {
        let settings: Self =
            toml::from_str(content).map_err(|e| TaxError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> TaxResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TaxError::Settings(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> TaxResult<()> {
        if self.sst_rate < BigDecimal::from(0) || self.sst_rate > BigDecimal::from(100) {
            return Err(TaxError::Settings(format!(
                "SST rate must be between 0 and 100, got {}",
                self.sst_rate
            )));
        }

        if self.history_months == 0 {
            return Err(TaxError::Settings(
                "history_months must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TaxSettings::default();

        assert_eq!(settings.sst_rate, BigDecimal::from(6));
        assert_eq!(settings.history_months, 6);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_toml_fills_missing_fields() {
        let settings = TaxSettings::from_toml_str("history_months = 12").unwrap();

        assert_eq!(settings.sst_rate, BigDecimal::from(6));
        assert_eq!(settings.history_months, 12);

        let settings = TaxSettings::from_toml_str("").unwrap();
        assert_eq!(settings, TaxSettings::default());
    }

    #[test]
    fn test_from_toml_rate() {
        let settings = TaxSettings::from_toml_str(r#"sst_rate = "8""#).unwrap();

        assert_eq!(settings.sst_rate, BigDecimal::from(8));
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            TaxSettings::from_toml_str(r#"sst_rate = "120""#),
            Err(TaxError::Settings(_))
        ));
        assert!(matches!(
            TaxSettings::from_toml_str("history_months = 0"),
            Err(TaxError::Settings(_))
        ));
        assert!(matches!(
            TaxSettings::from_toml_str("history_months = \"many\""),
            Err(TaxError::Settings(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TaxSettings::load("/nonexistent/cukai.toml").unwrap_err();

        assert!(matches!(err, TaxError::Settings(msg) if msg.contains("failed to read")));
    }
}
