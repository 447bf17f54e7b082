//! Init command implementation
//!
//! This module implements the `init` command for generating a starter
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "goform.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing goform configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set GOFORM_API_TOKEN in your environment or a .env file");
                println!("  3. Validate configuration: goform validate-config");
                println!("  4. Fetch a session: goform fetch --output session.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate starter configuration
    fn generate_config() -> String {
        r#"# goform Configuration File
# IFRC GO PER form session tool

[application]
log_level = "info"
dry_run = false

[api]
base_url = "https://goadmin.ifrc.org/api/v2"
auth_token = "${GOFORM_API_TOKEN}"
timeout_seconds = 30

[api.retry]
max_retries = 3
initial_delay_ms = 250
backoff_multiplier = 2.0
max_delay_ms = 5000

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"  # daily | hourly
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generated_config_parses() {
        let content = InitArgs::generate_config();
        let without_secret = content.replace("${GOFORM_API_TOKEN}", "test-token");
        let parsed: Result<toml::Value, _> = toml::from_str(&without_secret);
        assert!(parsed.is_ok());
    }

    #[tokio::test]
    async fn test_init_refuses_existing_file_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goform.toml");
        std::fs::write(&path, "[application]\n").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        let code = args.execute().await.unwrap();
        assert_eq!(code, 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[application]\n");
    }

    #[tokio::test]
    async fn test_init_overwrites_with_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goform.toml");
        std::fs::write(&path, "old").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: true,
        };
        let code = args.execute().await.unwrap();
        assert_eq!(code, 0);
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("[api.retry]"));
    }
}
