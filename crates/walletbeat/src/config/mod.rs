use crate::features::RatingSettings;
use chrono::NaiveDate;
use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different deployments of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub rating: RatingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("WALLETBEAT_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("WALLETBEAT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let as_of = match env::var("WALLETBEAT_AS_OF") {
            Ok(value) if !value.trim().is_empty() => Some(
                NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                    .map_err(|source| ConfigError::InvalidAsOfDate { value, source })?,
            ),
            _ => None,
        };

        let audit_freshness_days = env::var("WALLETBEAT_AUDIT_FRESHNESS_DAYS")
            .unwrap_or_else(|_| RatingSettings::DEFAULT_AUDIT_FRESHNESS_DAYS.to_string())
            .parse::<u32>()
            .ok()
            .filter(|days| *days > 0)
            .ok_or(ConfigError::InvalidAuditFreshness)?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            rating: RatingConfig {
                as_of,
                audit_freshness_days,
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults for rating runs. Command-line flags take precedence.
#[derive(Debug, Clone)]
pub struct RatingConfig {
    pub as_of: Option<NaiveDate>,
    pub audit_freshness_days: u32,
}

impl RatingConfig {
    /// Settings for a run, dated `as_of` when configured, else `today`.
    pub fn settings(&self, today: NaiveDate) -> RatingSettings {
        RatingSettings {
            as_of: self.as_of.unwrap_or(today),
            audit_freshness_days: self.audit_freshness_days,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidAsOfDate {
        value: String,
        source: chrono::ParseError,
    },
    InvalidAuditFreshness,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAsOfDate { value, .. } => {
                write!(f, "WALLETBEAT_AS_OF must be a YYYY-MM-DD date, got '{value}'")
            }
            ConfigError::InvalidAuditFreshness => write!(
                f,
                "WALLETBEAT_AUDIT_FRESHNESS_DAYS must be a positive number of days"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidAsOfDate { source, .. } => Some(source),
            ConfigError::InvalidAuditFreshness => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("WALLETBEAT_ENV");
        env::remove_var("WALLETBEAT_LOG_LEVEL");
        env::remove_var("WALLETBEAT_AS_OF");
        env::remove_var("WALLETBEAT_AUDIT_FRESHNESS_DAYS");
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.rating.as_of, None);
        assert_eq!(config.rating.audit_freshness_days, 365);
    }

    #[test]
    fn pinned_date_overrides_today() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("WALLETBEAT_ENV", "ci");
        env::set_var("WALLETBEAT_AS_OF", "2024-06-30");
        env::set_var("WALLETBEAT_AUDIT_FRESHNESS_DAYS", "180");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        let settings = config.rating.settings(date(2025, 1, 1));
        assert_eq!(settings.as_of, date(2024, 6, 30));
        assert_eq!(settings.audit_freshness_days, 180);
    }

    #[test]
    fn environment_aliases_map_to_deployments() {
        assert_eq!(AppEnvironment::from_str("PROD"), AppEnvironment::Production);
        assert_eq!(
            AppEnvironment::from_str(" production "),
            AppEnvironment::Production
        );
        assert_eq!(AppEnvironment::from_str("ci"), AppEnvironment::Test);
        assert_eq!(AppEnvironment::from_str("staging"), AppEnvironment::Development);
    }

    #[test]
    fn rejects_malformed_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("WALLETBEAT_AS_OF", "30/06/2024");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidAsOfDate { .. })
        ));

        reset_env();
        env::set_var("WALLETBEAT_AUDIT_FRESHNESS_DAYS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidAuditFreshness)
        ));
        reset_env();
    }
}
