pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::assistant::handlers as assistant;
use crate::careers::handlers as careers;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/export", get(jobs::handle_export))
        .route("/api/v1/jobs/import", post(jobs::handle_import))
        .route(
            "/api/v1/jobs/import/validate",
            post(jobs::handle_validate_columns),
        )
        .route(
            "/api/v1/jobs/normalize-dates",
            post(jobs::handle_normalize_dates),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Assistant API
        .route(
            "/api/v1/jobs/:id/interview-plan",
            post(assistant::handle_interview_plan),
        )
        .route("/api/v1/assistant/chat", post(assistant::handle_chat))
        .route(
            "/api/v1/assistant/skills",
            post(assistant::handle_extract_skills),
        )
        // Career match
        .route("/api/v1/careers/match", post(careers::handle_match))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::careers::sources::HttpCareerSource;
    use crate::config::Config;
    use crate::db::test_pool;
    use crate::llm_client::testing::ScriptedCompletion;

    const BOUNDARY: &str = "jobtrack-test-boundary";
    const FULL_HEADER: &str =
        "Company,Position,Resume Used,Date Applied,Status,Interview Details,Comments,Link";

    async fn app_with(llm: ScriptedCompletion) -> (Router, sqlx::SqlitePool) {
        let pool = test_pool().await;
        let config = Config::for_tests();
        let careers = HttpCareerSource::new(
            config.fortune_api_url.clone(),
            config.fortune_list_url.clone(),
        )
        .unwrap();
        let state = AppState {
            db: pool.clone(),
            llm: Arc::new(llm),
            careers: Arc::new(careers),
            config,
        };
        (build_router(state), pool)
    }

    async fn app() -> Router {
        app_with(ScriptedCompletion::failing()).await.0
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload_request(uri: &str, filename: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_job_crud_lifecycle() {
        let app = app().await;

        let created = send(
            &app,
            json_request(
                "POST",
                "/api/v1/jobs",
                json!({"company": "Acme", "position": "Engineer", "status": "Applied"}),
            ),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["resume_used"], Value::Null);

        let updated = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/v1/jobs/{id}"),
                json!({"company": "Acme", "position": "Engineer", "status": "Interviewing"}),
            ),
        )
        .await;
        assert_eq!(updated.status(), StatusCode::OK);
        assert_eq!(body_json(updated).await["status"], "Interviewing");

        let listed = send(&app, Request::get("/api/v1/jobs").body(Body::empty()).unwrap()).await;
        assert_eq!(body_json(listed).await.as_array().unwrap().len(), 1);

        let deleted = send(
            &app,
            Request::delete(format!("/api/v1/jobs/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let missing = send(
            &app,
            Request::get(format!("/api/v1/jobs/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_company() {
        let app = app().await;
        let response = send(
            &app,
            json_request("POST", "/api/v1/jobs", json!({"company": "  ", "position": "Engineer"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_import_then_filtered_export() {
        let app = app().await;
        let csv = format!(
            "{FULL_HEADER}\n\
             Acme,Engineer,v1.pdf,2024-01-02,Applied,,,https://acme.test\n\
             Globex,Analyst,v1.pdf,2024-01-03,Rejected,,,\n\
             Initech,Engineer II,v2.pdf,2024-01-04,Interviewing,onsite,,\n"
        );

        let response = send(&app, upload_request("/api/v1/jobs/import", "jobs.csv", &csv)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["rows_imported"], 3);

        let export = send(
            &app,
            Request::get("/api/v1/jobs/export?q=engineer")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(export.status(), StatusCode::OK);
        assert!(export.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv"));
        let text = body_text(export).await;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Company,Position,Resume Used"));
        assert!(lines[1].starts_with("Acme,Engineer,"));
        assert!(lines[2].starts_with("Initech,Engineer II,"));
    }

    #[tokio::test]
    async fn test_import_rejects_unsupported_extension() {
        let app = app().await;
        let response = send(
            &app,
            upload_request("/api/v1/jobs/import", "jobs.txt", FULL_HEADER),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "UNSUPPORTED_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_import_missing_columns_stores_nothing() {
        let (app, pool) = app_with(ScriptedCompletion::failing()).await;
        let response = send(
            &app,
            upload_request("/api/v1/jobs/import", "jobs.csv", "Company,Position\nAcme,Engineer\n"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "MISSING_COLUMNS");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("resume_used"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_import_without_file_part() {
        let app = app().await;
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/jobs/import")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validate_columns_dry_run() {
        let app = app().await;
        let response = send(
            &app,
            upload_request(
                "/api/v1/jobs/import/validate",
                "jobs.csv",
                &format!("{FULL_HEADER},Salary\n"),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["aligned"], false);
        assert_eq!(body["missing"], json!([]));
        assert_eq!(body["extra"], json!(["Salary"]));
    }

    #[tokio::test]
    async fn test_normalize_dates_endpoint() {
        let app = app().await;
        send(
            &app,
            json_request(
                "POST",
                "/api/v1/jobs",
                json!({"company": "Acme", "position": "Engineer", "date_applied": "45292"}),
            ),
        )
        .await;

        let response = send(
            &app,
            Request::post("/api/v1/jobs/normalize-dates")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(body_json(response).await["converted"], 1);

        let job = send(&app, Request::get("/api/v1/jobs/1").body(Body::empty()).unwrap()).await;
        assert_eq!(body_json(job).await["date_applied"], "2024-01-01");
    }

    #[tokio::test]
    async fn test_interview_plan_falls_back_when_llm_fails() {
        let app = app().await;
        send(
            &app,
            json_request("POST", "/api/v1/jobs", json!({"company": "Acme", "position": "Engineer"})),
        )
        .await;

        let response = send(
            &app,
            Request::post("/api/v1/jobs/1/interview-plan")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["fallback"], true);
        assert!(!body["plan"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_interview_plan_unknown_job() {
        let app = app().await;
        let response = send(
            &app,
            Request::post("/api/v1/jobs/99/interview-plan")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_reply_and_validation() {
        let (app, _) = app_with(ScriptedCompletion::replying(&["Lead with impact."])).await;

        let empty = send(
            &app,
            json_request("POST", "/api/v1/assistant/chat", json!({"message": "   "})),
        )
        .await;
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            json_request(
                "POST",
                "/api/v1/assistant/chat",
                json!({"message": "How can I improve my resume?", "history": []}),
            ),
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["reply"], "Lead with impact.");
        assert_eq!(body["fallback"], false);
    }

    #[tokio::test]
    async fn test_skills_endpoint_returns_empty_on_failure() {
        let app = app().await;
        let response = send(
            &app,
            json_request("POST", "/api/v1/assistant/skills", json!({"text": "Rust, SQL"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["skills"], json!([]));
    }

    #[tokio::test]
    async fn test_career_match_uses_fixture_when_sources_unreachable() {
        let (app, _) = app_with(ScriptedCompletion::replying(&[
            r#"["React", "SQL", "Node.js", "Go"]"#,
            "not json",
        ]))
        .await;

        let response = send(
            &app,
            json_request(
                "POST",
                "/api/v1/careers/match",
                json!({"resume_text": "Full stack developer", "zip_code": "10001"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["companies_checked"], 1);
        assert_eq!(
            body["matches"]["Test Corp"][0]["title"],
            "Full Stack Developer"
        );
    }
}
