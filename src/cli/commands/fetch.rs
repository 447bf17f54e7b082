//! Fetch command implementation
//!
//! Downloads the PER questionnaire structure, plus an optional saved draft,
//! into a local session file that `check` and `submit` operate on.

use clap::Args;
use std::fs;

use crate::adapters::api::GoApiClient;
use crate::config::load_config;
use crate::domain::ids::{AssessmentId, OverviewId};
use crate::domain::GoFormError;

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Overview id to resume (omit to start a fresh form)
    #[arg(long)]
    pub overview: Option<u32>,

    /// Assessment id to resume (omit to start a fresh form)
    #[arg(long)]
    pub assessment: Option<u32>,

    /// Path of the session file to write
    #[arg(short, long, default_value = "session.json")]
    pub output: String,
}

impl FetchArgs {
    /// Execute the fetch command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Err(e) => {
                println!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
            Ok(c) => c,
        };

        let client = match GoApiClient::new(&config.api) {
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
            Ok(c) => c,
        };

        println!("🌐 Fetching session data from {}", client.base_url());

        let overview_id = self.overview.map(OverviewId::new);
        let assessment_id = self.assessment.map(AssessmentId::new);

        let bundle = match client.fetch_session_bundle(overview_id, assessment_id).await {
            Err(e @ GoFormError::Api(_)) => {
                println!("❌ Fetch failed: {e}");
                return Ok(3); // API error exit code
            }
            Err(e) => return Err(e.into()),
            Ok(b) => b,
        };

        let json = serde_json::to_string_pretty(&bundle).map_err(GoFormError::from)?;
        fs::write(&self.output, json)?;

        println!("✅ Session written to {}", self.output);
        println!(
            "   Areas: {}, Questions: {}",
            bundle.reference.areas().len(),
            bundle.reference.question_count()
        );
        if let Some(ref assessment) = bundle.assessment {
            println!(
                "   Resumed draft: {} of {} questions answered",
                assessment.answered_count(),
                bundle.reference.question_count()
            );
        } else {
            println!("   Fresh form (no saved draft loaded)");
        }
        println!();
        println!("Next: edit the session file, then run `goform check --session {}`", self.output);

        Ok(0)
    }
}
