//! Configuration handling for the wizard

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::LoanDefaults;

/// Environment variable overriding where snapshots are written
pub const DATA_DIR_ENV: &str = "LOAN_WIZARD_DATA_DIR";

/// Upload limit when none is configured (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// User configuration; every field falls back to a built-in default
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WizardConfig {
    /// Interest rate (% p.a.) for a new application
    pub default_interest_rate: Option<f64>,
    /// Loan amount (rupees) for a new application
    pub default_loan_amount: Option<f64>,
    /// Tenure (months) for a new application
    pub default_tenure: Option<u32>,
    /// Tenure slider lower bound
    pub tenure_min: Option<u32>,
    /// Tenure slider upper bound
    pub tenure_max: Option<u32>,
    /// Tenure slider increment
    pub tenure_step: Option<u32>,
    /// Largest accepted document
    pub max_upload_bytes: Option<u64>,
    pub verify_delay_ms: Option<u64>,
    pub upload_delay_ms: Option<u64>,
    pub submit_delay_ms: Option<u64>,
    pub download_delay_ms: Option<u64>,
    /// Where snapshots and summaries are written
    pub data_dir: Option<PathBuf>,
}

impl WizardConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "loanwizard", "loan-wizard")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: WizardConfig = serde_json::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Snapshot directory: env override, then config, then platform data dir
    pub fn data_dir(&self) -> PathBuf {
        Self::resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from), self)
    }

    fn resolve_data_dir(env_override: Option<PathBuf>, config: &Self) -> PathBuf {
        env_override
            .or_else(|| config.data_dir.clone())
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".loan-wizard"))
    }

    /// Loan parameters for a fresh application
    pub fn loan_defaults(&self) -> LoanDefaults {
        let builtin = LoanDefaults::default();
        let tenure_min = self.tenure_min.filter(|m| *m > 0).unwrap_or(builtin.tenure_min);
        let tenure_max = self
            .tenure_max
            .filter(|m| *m >= tenure_min)
            .unwrap_or(builtin.tenure_max.max(tenure_min));
        LoanDefaults {
            loan_amount: self
                .default_loan_amount
                .filter(|a| *a > 0.0)
                .unwrap_or(builtin.loan_amount),
            interest_rate: self
                .default_interest_rate
                .filter(|r| *r >= 0.0)
                .unwrap_or(builtin.interest_rate),
            tenure: self
                .default_tenure
                .filter(|t| *t > 0)
                .unwrap_or(builtin.tenure),
            tenure_min,
            tenure_max,
            tenure_step: self.tenure_step.filter(|s| *s > 0).unwrap_or(builtin.tenure_step),
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn verify_delay(&self) -> Duration {
        Duration::from_millis(self.verify_delay_ms.unwrap_or(2000))
    }

    pub fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms.unwrap_or(1500))
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms.unwrap_or(2000))
    }

    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms.unwrap_or(1500))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = WizardConfig::default();
        assert_eq!(config.loan_defaults(), LoanDefaults::default());
        assert_eq!(config.max_upload_bytes(), 5 * 1024 * 1024);
        assert_eq!(config.verify_delay(), Duration::from_millis(2000));
        assert_eq!(config.upload_delay(), Duration::from_millis(1500));
        assert_eq!(config.submit_delay(), Duration::from_millis(2000));
        assert_eq!(config.download_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_partial_serialization() {
        let config = WizardConfig {
            default_interest_rate: Some(9.25),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: WizardConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.default_interest_rate, Some(9.25));
        assert!(parsed.default_tenure.is_none());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Unknown keys are ignored
        let json = r#"{"default_tenure": 60, "theme": "dark"}"#;
        let parsed: WizardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.default_tenure, Some(60));
    }

    #[test]
    fn test_invalid_overrides_fall_back() {
        let config = WizardConfig {
            default_tenure: Some(0),
            default_interest_rate: Some(-1.0),
            default_loan_amount: Some(0.0),
            tenure_min: Some(24),
            tenure_max: Some(12),
            tenure_step: Some(0),
            ..Default::default()
        };
        let defaults = config.loan_defaults();
        assert_eq!(defaults.tenure, 84);
        assert_eq!(defaults.interest_rate, 8.5);
        assert_eq!(defaults.loan_amount, 1_000_000.0);
        assert_eq!(defaults.tenure_min, 24);
        assert_eq!(defaults.tenure_max, 84);
        assert_eq!(defaults.tenure_step, 6);
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = WizardConfig {
            upload_delay_ms: Some(10),
            data_dir: Some(PathBuf::from("/var/lib/loans")),
            ..Default::default()
        };

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        let loaded = WizardConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = WizardConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, WizardConfig::default());
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(WizardConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_data_dir_precedence() {
        let config = WizardConfig {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };
        assert_eq!(
            WizardConfig::resolve_data_dir(Some(PathBuf::from("/from/env")), &config),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            WizardConfig::resolve_data_dir(None, &config),
            PathBuf::from("/from/config")
        );
        // Falls through to the platform directory
        let fallback = WizardConfig::resolve_data_dir(None, &WizardConfig::default());
        assert!(!fallback.as_os_str().is_empty());
    }
}
