use axum::{extract::Path, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::{DateTime, Utc};
use search_digest_cli::{run_search, MaxResults, SearchReport};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::state::{AppState, Job, JobStatus};

#[derive(Deserialize)]
pub struct SearchPayload {
    pub query: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Serialize)]
pub struct JobCreated {
    pub job_id: Uuid,
}

#[derive(Serialize)]
pub struct JobPollResponse {
    pub status: String,
    pub query: String,
    pub submitted_at: DateTime<Utc>,
    pub report: Option<SearchReport>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

impl From<&Job> for JobPollResponse {
    fn from(job: &Job) -> Self {
        let (status, report, error) = match &job.status {
            JobStatus::Pending => ("pending", None, None),
            JobStatus::Done { report } => ("done", Some(report.clone()), None),
            JobStatus::Failed { error } => ("failed", None, Some(error.clone())),
        };
        JobPollResponse {
            status: status.to_string(),
            query: job.query.clone(),
            submitted_at: job.submitted_at,
            warnings: report.as_ref().map(SearchReport::warnings).unwrap_or_default(),
            report,
            error,
        }
    }
}

/// POST /api/search
pub async fn start_search(
    Extension(state): Extension<AppState>,
    Json(payload): Json<SearchPayload>,
) -> impl IntoResponse {
    let query = payload.query.trim().to_string();
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "query must not be empty" })),
        );
    }
    let max_results = match MaxResults::new(payload.max_results.unwrap_or(MaxResults::DEFAULT)) {
        Ok(max) => max,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })));
        }
    };

    let job_id = Uuid::new_v4();
    state.jobs.insert(job_id, Job::pending(&query));
    tracing::info!(%job_id, query, max_results = max_results.get(), "search job queued");

    let state_clone = state.clone();
    tokio::spawn(async move {
        let status = match run_search(&state_clone.config, &query, max_results).await {
            Ok(report) => JobStatus::Done { report },
            Err(e) => {
                tracing::warn!(%job_id, error = %e, "search job failed");
                JobStatus::Failed {
                    error: format!("Failed to retrieve results count: {e}"),
                }
            }
        };
        state_clone.finish(job_id, status);
    });

    (StatusCode::ACCEPTED, Json(json!(JobCreated { job_id })))
}

/// GET /api/jobs/{id}
pub async fn poll_job(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.jobs.get(&id) {
        Some(job) => (
            StatusCode::OK,
            Json(json!(JobPollResponse::from(job.value()))),
        ),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Job not found" }))),
    }
}
