//! GO API client
//!
//! HTTP access to the GO server: reference-data loads, draft reads, and
//! assessment/overview/work-plan writes. All HTTP failures are converted to
//! [`ApiError`] at this boundary; a 400 with a structured body becomes
//! [`ApiError::Rejected`] carrying the positional field errors for
//! projection back onto the response tree.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{ApiConfig, RetryConfig, SecretString};
use crate::domain::ids::{AssessmentId, OverviewId, WorkPlanId};
use crate::domain::{ApiError, Assessment, GoFormError, Overview, ReferenceData, Result, WorkPlan};
use crate::form::project::ApiErrorPayload;

use super::models::{ListResponse, SessionBundle};

/// Operations the rest of the application needs from the GO server
///
/// Commands depend on this trait rather than the concrete client so tests
/// can substitute an in-memory fake.
#[async_trait]
pub trait GoApi: Send + Sync {
    /// Fetch the full questionnaire structure (areas, components, questions
    /// and global option lists)
    async fn reference_data(&self) -> Result<ReferenceData>;

    /// Fetch a saved overview
    async fn overview(&self, id: OverviewId) -> Result<Overview>;

    /// Fetch a saved assessment response tree
    async fn assessment(&self, id: AssessmentId) -> Result<Assessment>;

    /// Replace an assessment on the server, returning the stored version
    async fn update_assessment(&self, id: AssessmentId, assessment: &Assessment)
        -> Result<Assessment>;

    /// Patch an overview on the server, returning the stored version
    async fn update_overview(&self, id: OverviewId, overview: &Overview) -> Result<Overview>;

    /// Replace a work plan on the server, returning the stored version
    async fn update_work_plan(&self, id: WorkPlanId, work_plan: &WorkPlan) -> Result<WorkPlan>;
}

/// HTTP implementation of [`GoApi`] backed by reqwest
pub struct GoApiClient {
    base_url: String,
    client: Client,
    auth_token: Option<SecretString>,
    retry: RetryConfig,
}

impl GoApiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                GoFormError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url,
            client,
            auth_token: config.auth_token.clone(),
            retry: config.retry.clone(),
        })
    }

    /// Base URL of the GO server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether requests will carry an auth token
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    fn auth_header_value(&self) -> Option<String> {
        self.auth_token
            .as_ref()
            .map(|token| format!("Token {}", token.expose_secret().as_ref()))
    }

    /// Retry a request with exponential backoff
    ///
    /// Only transient failures are retried; rejections and other
    /// deterministic 4xx responses surface immediately.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.retry.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    let retryable = matches!(&e, GoFormError::Api(api) if api.is_retryable());
                    attempt += 1;
                    if !retryable || attempt >= max_retries {
                        return Err(e);
                    }

                    let delay_ms = self.retry.initial_delay_ms
                        * (self.retry.backoff_multiplier.powf((attempt - 1) as f64) as u64);
                    let delay_ms = delay_ms.min(self.retry.max_delay_ms);

                    tracing::warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying request after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    /// Send one request and decode a successful response as `T`
    async fn request_json<T, B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let mut request = self.client.request(method, url);
        if let Some(auth) = self.auth_header_value() {
            request = request.header("Authorization", auth);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(e.to_string())
            } else {
                ApiError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(e.to_string()).into());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(classify_failure(status, url, body).into())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.retry_request(|| async { self.request_json::<T, ()>(Method::GET, url, None).await })
            .await
    }

    /// GET a list endpoint, following `next` links until exhausted
    async fn get_paginated<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut url = format!("{}{path}", self.base_url);
        let mut results = Vec::new();

        loop {
            let page: ListResponse<T> = self.get_json(&url).await?;
            results.extend(page.results);

            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(results)
    }

    /// Fetch everything an editing session needs in one call
    ///
    /// Reference data always loads; the overview and assessment load only
    /// when their ids are given.
    pub async fn fetch_session_bundle(
        &self,
        overview_id: Option<OverviewId>,
        assessment_id: Option<AssessmentId>,
    ) -> Result<SessionBundle> {
        let reference = self.reference_data().await?;

        let overview = match overview_id {
            Some(id) => Some(self.overview(id).await?),
            None => None,
        };
        let assessment = match assessment_id {
            Some(id) => Some(self.assessment(id).await?),
            None => None,
        };

        Ok(SessionBundle::new(reference, overview, assessment))
    }
}

/// Map a non-success HTTP status to a domain error
fn classify_failure(status: StatusCode, url: &str, body: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ApiError::AuthenticationFailed(format!("status {status} from {url}"))
        }
        StatusCode::NOT_FOUND => ApiError::NotFound(url.to_string()),
        StatusCode::BAD_REQUEST => match serde_json::from_str::<ApiErrorPayload>(&body) {
            Ok(payload) => ApiError::Rejected(payload),
            Err(_) => ApiError::ClientError {
                status: status.as_u16(),
                message: body,
            },
        },
        s if s.is_client_error() => ApiError::ClientError {
            status: s.as_u16(),
            message: body,
        },
        s => ApiError::ServerError {
            status: s.as_u16(),
            message: body,
        },
    }
}

#[async_trait]
impl GoApi for GoApiClient {
    async fn reference_data(&self) -> Result<ReferenceData> {
        tracing::info!(base_url = %self.base_url, "Fetching PER reference data");

        let options_url = format!("{}/per-options/", self.base_url);
        let (areas, components, questions, options) = tokio::try_join!(
            self.get_paginated("/per-formarea/"),
            self.get_paginated("/per-formcomponent/"),
            self.get_paginated("/per-formquestion/"),
            self.get_json(&options_url),
        )?;

        let reference = ReferenceData::new(areas, components, questions, options);
        tracing::info!(
            areas = reference.areas().len(),
            questions = reference.question_count(),
            "Reference data loaded"
        );

        Ok(reference)
    }

    async fn overview(&self, id: OverviewId) -> Result<Overview> {
        let url = format!("{}/per-overview/{id}/", self.base_url);
        self.get_json(&url).await
    }

    async fn assessment(&self, id: AssessmentId) -> Result<Assessment> {
        let url = format!("{}/per-assessment/{id}/", self.base_url);
        self.get_json(&url).await
    }

    async fn update_assessment(
        &self,
        id: AssessmentId,
        assessment: &Assessment,
    ) -> Result<Assessment> {
        let url = format!("{}/per-assessment/{id}/", self.base_url);
        tracing::debug!(url = %url, is_draft = assessment.is_draft, "Updating assessment");
        self.retry_request(|| async {
            self.request_json(Method::PUT, &url, Some(assessment)).await
        })
        .await
    }

    async fn update_overview(&self, id: OverviewId, overview: &Overview) -> Result<Overview> {
        let url = format!("{}/per-overview/{id}/", self.base_url);
        tracing::debug!(url = %url, is_draft = overview.is_draft, "Updating overview");
        self.retry_request(|| async {
            self.request_json(Method::PATCH, &url, Some(overview)).await
        })
        .await
    }

    async fn update_work_plan(&self, id: WorkPlanId, work_plan: &WorkPlan) -> Result<WorkPlan> {
        let url = format!("{}/per-work-plan/{id}/", self.base_url);
        self.retry_request(|| async {
            self.request_json(Method::PUT, &url, Some(work_plan)).await
        })
        .await
    }
}
