use std::path::PathBuf;
use std::time::Duration;
use termtutor_core::{FileProgressStore, GeneratorConfig};
use tracing::Level;

const DEFAULT_API_URL: &str = "https://api.fireworks.ai/inference/v1/chat/completions";
const DEFAULT_MODEL: &str = "accounts/fireworks/models/qwen3-coder-30b-a3b-instruct";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
    /// `None` when neither `TUTOR_PROGRESS_FILE` nor a home directory is available.
    pub progress_file: Option<PathBuf>,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_key = std::env::var("TUTOR_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("TUTOR_API_KEY".to_string()))?;

        let api_url =
            std::env::var("TUTOR_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("TUTOR_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = match std::env::var("TUTOR_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "TUTOR_TIMEOUT_SECS".to_string(),
                        format!("'{raw}' is not a positive number of seconds"),
                    )
                })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let progress_file = std::env::var("TUTOR_PROGRESS_FILE")
            .map(PathBuf::from)
            .ok()
            .or_else(FileProgressStore::default_path);

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_key,
            api_url,
            model,
            timeout: Duration::from_secs(timeout_secs),
            progress_file,
            log_level,
        })
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            endpoint: self.api_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("TUTOR_API_KEY");
            env::remove_var("TUTOR_API_URL");
            env::remove_var("TUTOR_MODEL");
            env::remove_var("TUTOR_TIMEOUT_SECS");
            env::remove_var("TUTOR_PROGRESS_FILE");
            env::remove_var("RUST_LOG");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal() {
        clear_env_vars();
        unsafe {
            env::set_var("TUTOR_API_KEY", "test-key");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.log_level, Level::WARN);
        assert_eq!(config.progress_file, FileProgressStore::default_path());
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("TUTOR_API_KEY", "custom-key");
            env::set_var("TUTOR_API_URL", "http://localhost:8080/v1/chat/completions");
            env::set_var("TUTOR_MODEL", "local-model");
            env::set_var("TUTOR_TIMEOUT_SECS", "5");
            env::set_var("TUTOR_PROGRESS_FILE", "/tmp/custom-progress.json");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.api_url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.model, "local-model");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.progress_file,
            Some(PathBuf::from("/tmp/custom-progress.json"))
        );
        assert_eq!(config.log_level, Level::DEBUG);

        let generator = config.generator_config();
        assert_eq!(generator.endpoint, config.api_url);
        assert_eq!(generator.api_key, "custom-key");
        assert_eq!(generator.timeout, Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_config_missing_api_key() {
        clear_env_vars();

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(var) => assert_eq!(var, "TUTOR_API_KEY"),
            _ => panic!("Expected MissingVar for TUTOR_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_config_blank_api_key_is_missing() {
        clear_env_vars();
        unsafe {
            env::set_var("TUTOR_API_KEY", "   ");
        }

        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingVar(_))
        ));
    }

    #[test]
    #[serial]
    fn test_config_invalid_timeout() {
        for bad in ["0", "soon", "-3"] {
            clear_env_vars();
            unsafe {
                env::set_var("TUTOR_API_KEY", "test-key");
                env::set_var("TUTOR_TIMEOUT_SECS", bad);
            }

            let err = Config::from_env().unwrap_err();
            match err {
                ConfigError::InvalidValue(var, _) => assert_eq!(var, "TUTOR_TIMEOUT_SECS"),
                _ => panic!("Expected InvalidValue for TUTOR_TIMEOUT_SECS"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("TUTOR_API_KEY", "test-key");
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }
}
