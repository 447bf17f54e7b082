//! Submit command implementation
//!
//! Validates a session file and sends it to the GO server: the overview is
//! patched first, then the assessment tree replaces the saved one. A 400
//! rejection is projected back onto the tree and printed with business
//! keys, the same shape `check` prints for local failures.

use clap::Args;
use std::fs;

use crate::adapters::api::{GoApi, GoApiClient, SessionBundle};
use crate::config::load_config;
use crate::domain::ids::{AssessmentId, OverviewId, WorkPlanId};
use crate::domain::{ApiError, GoFormError, WorkPlan};
use crate::form::{project_payload, FormSession};

/// Arguments for the submit command
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Path of the session file to submit
    #[arg(short, long, default_value = "session.json")]
    pub session: String,

    /// Server id of the assessment record to replace
    #[arg(long)]
    pub assessment: u32,

    /// Server id of the overview record (defaults to the one the
    /// assessment tree names)
    #[arg(long)]
    pub overview: Option<u32>,

    /// Finalize the submission instead of saving a draft
    #[arg(long = "final")]
    pub finalize: bool,

    /// Optional work plan JSON to send after a successful submission
    #[arg(long)]
    pub work_plan: Option<String>,

    /// Server id of the work plan record (required with --work-plan)
    #[arg(long, requires = "work_plan")]
    pub work_plan_id: Option<u32>,

    /// Validate and print what would be sent without sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl SubmitArgs {
    /// Execute the submit command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Err(e) => {
                println!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
            Ok(c) => c,
        };

        let bundle: SessionBundle = match fs::read_to_string(&self.session)
            .map_err(GoFormError::from)
            .and_then(|raw| {
                serde_json::from_str(&raw)
                    .map_err(|e| GoFormError::Validation(format!("Malformed session file: {e}")))
            }) {
            Err(e) => {
                println!("❌ Failed to read session file: {e}");
                return Ok(2);
            }
            Ok(b) => b,
        };

        let Some(assessment) = bundle.assessment else {
            println!("❌ Session file has no assessment tree; nothing to submit");
            return Ok(2);
        };
        let Some(overview) = bundle.overview else {
            println!("❌ Session file has no overview record; nothing to submit");
            return Ok(2);
        };

        let overview_id = self
            .overview
            .map(OverviewId::new)
            .unwrap_or(assessment.overview);
        let assessment_id = AssessmentId::new(self.assessment);

        let mut session = FormSession::from_saved(assessment, overview);
        if self.finalize {
            session.with_overview(|o| o.is_draft = false)?;
        }

        let (cleaned_overview, cleaned_assessment) =
            match session.begin_submit(Some(&bundle.reference)) {
                Err(errors) => {
                    println!(
                        "❌ Validation failed with {} message(s):",
                        errors.message_count()
                    );
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&errors).map_err(GoFormError::from)?
                    );
                    return Ok(1);
                }
                Ok(snapshot) => snapshot,
            };

        let label = if cleaned_overview.is_draft {
            "draft"
        } else {
            "final submission"
        };

        if self.dry_run || config.application.dry_run {
            println!("🔎 Dry run: {label} validated, nothing sent");
            println!(
                "   Would PATCH overview {overview_id} and PUT assessment {assessment_id} \
                 ({} answered questions)",
                cleaned_assessment.answered_count()
            );
            return Ok(0);
        }

        let client = match GoApiClient::new(&config.api) {
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
            Ok(c) => c,
        };

        println!("🌐 Submitting {label} to {}", client.base_url());

        let stored_overview = match client.update_overview(overview_id, &cleaned_overview).await {
            Err(e) => return handle_api_failure(e, &cleaned_assessment, &mut session),
            Ok(o) => o,
        };
        let stored_assessment = match client
            .update_assessment(assessment_id, &cleaned_assessment)
            .await
        {
            Err(e) => return handle_api_failure(e, &cleaned_assessment, &mut session),
            Ok(a) => a,
        };

        session.complete_submit();

        // Rewrite the session file with the stored records so the next edit
        // starts from what the server holds.
        let updated = SessionBundle::new(
            bundle.reference,
            Some(stored_overview),
            Some(stored_assessment),
        );
        let json = serde_json::to_string_pretty(&updated).map_err(GoFormError::from)?;
        fs::write(&self.session, json)?;

        println!("✅ Submission accepted ({label})");

        if let Some(ref work_plan_path) = self.work_plan {
            return self.send_work_plan(&client, work_plan_path).await;
        }

        Ok(0)
    }

    async fn send_work_plan(&self, client: &GoApiClient, path: &str) -> anyhow::Result<i32> {
        let work_plan: WorkPlan = match fs::read_to_string(path)
            .map_err(GoFormError::from)
            .and_then(|raw| {
                serde_json::from_str(&raw)
                    .map_err(|e| GoFormError::Validation(format!("Malformed work plan: {e}")))
            }) {
            Err(e) => {
                println!("❌ Failed to read work plan file: {e}");
                return Ok(2);
            }
            Ok(w) => w,
        };

        // Validated by clap's `requires`.
        let id = match self.work_plan_id {
            Some(id) => WorkPlanId::new(id),
            None => {
                println!("❌ --work-plan-id is required with --work-plan");
                return Ok(2);
            }
        };

        match client.update_work_plan(id, &work_plan).await {
            Ok(_) => {
                println!("✅ Work plan {id} updated");
                Ok(0)
            }
            Err(e) => {
                println!("❌ Work plan update failed: {e}");
                Ok(3)
            }
        }
    }
}

/// Print a failed submission and pick the exit code.
///
/// Rejections are projected onto the submitted snapshot so positions still
/// line up; everything else is a transport-level failure.
fn handle_api_failure(
    err: GoFormError,
    submitted: &crate::domain::Assessment,
    session: &mut FormSession,
) -> anyhow::Result<i32> {
    match err {
        GoFormError::Api(ApiError::Rejected(payload)) => {
            let errors = project_payload(&payload, submitted);
            println!(
                "❌ Server rejected the submission with {} message(s):",
                errors.message_count()
            );
            println!(
                "{}",
                serde_json::to_string_pretty(&errors).map_err(GoFormError::from)?
            );
            session.fail_submit(errors);
            Ok(1)
        }
        e => {
            println!("❌ Submission failed: {e}");
            Ok(3) // API error exit code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: SubmitArgs,
    }

    #[test]
    fn test_submit_args_parse() {
        let w = Wrapper::parse_from(["test", "--assessment", "42", "--final"]);
        assert_eq!(w.args.assessment, 42);
        assert!(w.args.finalize);
        assert!(!w.args.dry_run);
        assert_eq!(w.args.session, "session.json");
    }

    #[test]
    fn test_work_plan_id_requires_work_plan() {
        let result = Wrapper::try_parse_from(["test", "--assessment", "1", "--work-plan-id", "7"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_submit_missing_config_returns_config_error() {
        let w = Wrapper::parse_from(["test", "--assessment", "1"]);
        let code = w.args.execute("/nonexistent/goform.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
