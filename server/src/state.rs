use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use search_digest_cli::{config::ScraperConfig, SearchReport};
use serde::Serialize;
use uuid::Uuid;

// Lifecycle of one search job
#[derive(Clone, Serialize, Debug)]
pub enum JobStatus {
    Pending,
    Done { report: SearchReport },
    Failed { error: String },
}

#[derive(Clone, Debug)]
pub struct Job {
    pub query: String,
    pub submitted_at: DateTime<Utc>,
    pub status: JobStatus,
}

impl Job {
    pub fn pending(query: &str) -> Self {
        Self {
            query: query.to_string(),
            submitted_at: Utc::now(),
            status: JobStatus::Pending,
        }
    }
}

// Jobs are kept in memory only: job_id -> Job
#[derive(Clone, Debug)]
pub struct AppState {
    pub jobs: Arc<DashMap<Uuid, Job>>,
    pub config: Arc<ScraperConfig>,
}

impl AppState {
    pub fn new(config: ScraperConfig) -> Self {
        AppState {
            jobs: Arc::new(DashMap::new()),
            config: Arc::new(config),
        }
    }

    pub fn finish(&self, id: Uuid, status: JobStatus) {
        if let Some(mut job) = self.jobs.get_mut(&id) {
            job.status = status;
        }
    }
}
