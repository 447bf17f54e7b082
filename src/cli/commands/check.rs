//! Check command implementation
//!
//! Validates a local session file offline, printing the error tree the
//! same way a rejected submission would, without talking to the server.

use clap::Args;
use std::fs;

use crate::adapters::api::SessionBundle;
use crate::domain::ids::OverviewId;
use crate::domain::{Assessment, GoFormError, Overview};
use crate::form::FormSession;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path of the session file to validate
    #[arg(short, long, default_value = "session.json")]
    pub session: String,
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(session = %self.session, "Checking session file");

        let bundle = match read_bundle(&self.session) {
            Err(e) => {
                println!("❌ Failed to read session file: {e}");
                return Ok(2);
            }
            Ok(b) => b,
        };

        let question_count = bundle.reference.question_count();
        let overview = bundle.overview.unwrap_or_else(Overview::new);
        let assessment = bundle
            .assessment
            .unwrap_or_else(|| Assessment::new(OverviewId::new(0)));
        let mut session = FormSession::from_saved(assessment, overview);

        println!("🔍 Checking session: {}", self.session);
        println!(
            "   Answered: {} of {} questions",
            session.assessment().answered_count(),
            question_count
        );
        println!();

        match session.validate(Some(&bundle.reference)) {
            Ok(_) => {
                println!("✅ Session is valid and ready to submit");
                Ok(0)
            }
            Err(errors) => {
                println!(
                    "❌ Validation failed with {} message(s):",
                    errors.message_count()
                );
                println!("{}", serde_json::to_string_pretty(&errors).map_err(GoFormError::from)?);
                Ok(1) // Validation error exit code
            }
        }
    }
}

fn read_bundle(path: &str) -> Result<SessionBundle, GoFormError> {
    let raw = fs::read_to_string(path)?;
    let bundle = serde_json::from_str(&raw)
        .map_err(|e| GoFormError::Validation(format!("Malformed session file: {e}")))?;
    Ok(bundle)
}
