use crate::schedule::CreditPolicy;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tool.
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
    pub paths: PathConfig,
    pub schedule: ScheduleConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("ROSTER_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let paths = PathConfig {
            roster: env_path("ROSTER_CONFIG_PATH", "files/config.json"),
            state: env_path("ROSTER_STATE_PATH", "roster-state.json"),
            template: env_path("ROSTER_TEMPLATE_PATH", "files/duty_report.tpl"),
            export_dir: env_path("ROSTER_EXPORT_DIR", "exports"),
        };

        let auto_rotation = match env::var("ROSTER_AUTO_ROTATION") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidAutoRotation(raw))?,
            Err(_) => true,
        };

        let credit_policy = match env::var("ROSTER_CREDIT_POLICY") {
            Ok(raw) => raw
                .parse::<CreditPolicy>()
                .map_err(|_| ConfigError::InvalidCreditPolicy(raw))?,
            Err(_) => CreditPolicy::default(),
        };

        let log_level = env::var("ROSTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            paths,
            schedule: ScheduleConfig {
                auto_rotation,
                credit_policy,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the roster, the persisted snapshot and export assets live.
#[derive(Debug, Clone)]
pub struct PathConfig {
    pub roster: PathBuf,
    pub state: PathBuf,
    pub template: PathBuf,
    pub export_dir: PathBuf,
}

/// Session behavior toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub auto_rotation: bool,
    pub credit_policy: CreditPolicy,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            auto_rotation: true,
            credit_policy: CreditPolicy::default(),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn env_path(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidAutoRotation(String),
    InvalidCreditPolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAutoRotation(value) => {
                write!(f, "ROSTER_AUTO_ROTATION must be a boolean, got '{value}'")
            }
            ConfigError::InvalidCreditPolicy(value) => write!(
                f,
                "ROSTER_CREDIT_POLICY must be 'standby' or 'on_call', got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

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
        for key in [
            "ROSTER_ENV",
            "ROSTER_CONFIG_PATH",
            "ROSTER_STATE_PATH",
            "ROSTER_TEMPLATE_PATH",
            "ROSTER_EXPORT_DIR",
            "ROSTER_AUTO_ROTATION",
            "ROSTER_CREDIT_POLICY",
            "ROSTER_LOG_LEVEL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.paths.roster, PathBuf::from("files/config.json"));
        assert_eq!(config.paths.state, PathBuf::from("roster-state.json"));
        assert!(config.schedule.auto_rotation);
        assert_eq!(config.schedule.credit_policy, CreditPolicy::Standby);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_schedule_toggles() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ROSTER_AUTO_ROTATION", "off");
        env::set_var("ROSTER_CREDIT_POLICY", "on_call");
        env::set_var("ROSTER_ENV", "ci");
        let config = AppConfig::load().expect("config loads");
        assert!(!config.schedule.auto_rotation);
        assert_eq!(config.schedule.credit_policy, CreditPolicy::OnCall);
        assert_eq!(config.environment, AppEnvironment::Test);
        reset_env();
    }

    #[test]
    fn rejects_invalid_toggles() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ROSTER_AUTO_ROTATION", "sometimes");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidAutoRotation(_))
        ));
        reset_env();
        env::set_var("ROSTER_CREDIT_POLICY", "hourly");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidCreditPolicy(_))
        ));
        reset_env();
    }
}
