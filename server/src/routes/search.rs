use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::search_handler::{poll_job, start_search};

pub fn search_routes() -> Router {
    Router::new()
        .route("/search", post(start_search))
        .route("/jobs/{id}", get(poll_job))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use search_digest_cli::{config::ScraperConfig, SearchReport};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::routes::app;
    use crate::state::{AppState, Job, JobStatus};

    fn test_state() -> AppState {
        AppState::new(ScraperConfig {
            search_url: "http://127.0.0.1:9/search".to_string(),
            ..ScraperConfig::default()
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_search(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/search")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_job(id: Uuid) -> Request<Body> {
        Request::builder()
            .uri(format!("/api/jobs/{id}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn out_of_range_max_results_is_rejected() {
        let state = test_state();
        let (status, body) = send(app(state.clone()), post_search(r#"{"query":"cats","max_results":30}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("between 5 and 25"));
        assert!(state.jobs.is_empty());
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let (status, _) = send(app(test_state()), post_search(r#"{"query":"   "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn accepted_search_registers_a_job() {
        let state = test_state();
        let (status, body) = send(app(state.clone()), post_search(r#"{"query":"cats"}"#)).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        let id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();
        assert_eq!(state.jobs.get(&id).unwrap().query, "cats");
    }

    #[tokio::test]
    async fn unreachable_provider_marks_the_job_failed() {
        let state = test_state();
        let (status, body) = send(app(state.clone()), post_search(r#"{"query":"cats"}"#)).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();

        let mut last = Value::Null;
        for _ in 0..100 {
            let (_, body) = send(app(state.clone()), get_job(id)).await;
            if body["status"] != "pending" {
                last = body;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        assert_eq!(last["status"], "failed");
        assert!(last["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to retrieve results count"));
        assert!(last["report"].is_null());
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let (status, body) = send(app(test_state()), get_job(Uuid::new_v4())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Job not found");
    }

    #[tokio::test]
    async fn polling_reports_status_and_warnings() {
        let state = test_state();
        let pending = Uuid::new_v4();
        let done = Uuid::new_v4();
        state.jobs.insert(pending, Job::pending("cats"));
        state.jobs.insert(done, Job::pending("dogs"));
        state.finish(
            done,
            JobStatus::Done {
                report: SearchReport {
                    query: "dogs".into(),
                    max_results: 10,
                    results_count: 12,
                    top_website: Some("https://dogs.example".into()),
                    top_words: vec![],
                    summary: String::new(),
                    pages_analyzed: 0,
                    failures: vec![],
                    generated_at: chrono::Utc::now(),
                },
            },
        );

        let (status, body) = send(app(state.clone()), get_job(pending)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending");
        assert!(body["report"].is_null());

        let (_, body) = send(app(state), get_job(done)).await;
        assert_eq!(body["status"], "done");
        assert_eq!(body["report"]["results_count"], 12);
        assert_eq!(body["warnings"][0], "Failed to generate summary for 'dogs'.");
    }
}
