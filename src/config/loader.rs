//! Configuration loader with TOML parsing and environment variable overrides

use regex::Regex;
use secrecy::Secret;
use std::fs;
use std::path::Path;

use super::schema::GoConfig;
use super::secret::SecretValue;
use crate::domain::errors::GoFormError;
use crate::domain::result::Result;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`GoConfig`]
/// 4. Applies environment variable overrides (`GOFORM_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use goform::config::load_config;
///
/// let config = load_config("goform.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GoConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GoFormError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GoFormError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: GoConfig = toml::from_str(&contents)
        .map_err(|e| GoFormError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| GoFormError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. Missing variables are collected and
/// reported together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(GoFormError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `GOFORM_*` prefix
///
/// Variables follow the pattern `GOFORM_<SECTION>_<KEY>`, for example
/// `GOFORM_API_BASE_URL` or `GOFORM_APPLICATION_LOG_LEVEL`.
fn apply_env_overrides(config: &mut GoConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("GOFORM_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("GOFORM_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // API overrides
    if let Ok(val) = std::env::var("GOFORM_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("GOFORM_API_AUTH_TOKEN") {
        config.api.auth_token = Some(Secret::new(SecretValue::from(val)));
    }
    if let Ok(val) = std::env::var("GOFORM_API_TIMEOUT_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.api.timeout_seconds = seconds;
        }
    }
    if let Ok(val) = std::env::var("GOFORM_API_MAX_RETRIES") {
        if let Ok(retries) = val.parse() {
            config.api.retry.max_retries = retries;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("GOFORM_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("GOFORM_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
