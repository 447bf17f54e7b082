//! Configuration management for goform.
//!
//! TOML-based configuration loading, parsing, and validation:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `GOFORM_*` environment variable overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! dry_run = false
//!
//! [api]
//! base_url = "https://goadmin.ifrc.org/api/v2"
//! auth_token = "${GO_API_TOKEN}"
//! timeout_seconds = 30
//!
//! [api.retry]
//! max_retries = 3
//! initial_delay_ms = 250
//!
//! [logging]
//! local_enabled = true
//! local_path = "logs"
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use goform::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("goform.toml")?;
//! println!("GO API: {}", config.api.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{ApiConfig, ApplicationConfig, GoConfig, LoggingConfig, RetryConfig};
pub use secret::{SecretString, SecretValue};
