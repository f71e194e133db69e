#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Answers `jobs.query` for a fixed set of statements and counts every call.
#[derive(Clone, Default)]
pub struct MockWarehouse {
    hits: Arc<AtomicUsize>,
}

impl MockWarehouse {
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/bigquery/v2/projects/:project/queries", post(query))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn envelope(code: u16, message: &str) -> Response {
    let status = StatusCode::from_u16(code).unwrap();
    (status, Json(json!({"error": {"code": code, "message": message}}))).into_response()
}

fn completed(project: &str, fields: Value, rows: Value) -> Response {
    let total = rows.as_array().map(Vec::len).unwrap_or_default();
    Json(json!({
        "kind": "bigquery#queryResponse",
        "jobReference": {"projectId": project, "jobId": "job_1", "location": "US"},
        "schema": {"fields": fields},
        "totalRows": total.to_string(),
        "rows": rows,
        "jobComplete": true,
    }))
    .into_response()
}

async fn query(State(mock): State<MockWarehouse>, Path(project): Path<String>, Json(request): Json<Value>) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    match (project.as_str(), request["query"].as_str().unwrap_or_default()) {
        ("denied", _) => envelope(403, "Access Denied: Project denied"),
        ("unavailable", _) => envelope(503, "Service unavailable"),
        (_, "SELECT 1") => completed(
            &project,
            json!([{"name": "f0_", "type": "INTEGER", "mode": "NULLABLE"}]),
            json!([{"f": [{"v": "1"}]}]),
        ),
        (_, "SELECT id, name FROM ds.t") => completed(
            &project,
            json!([
                {"name": "id", "type": "INTEGER", "mode": "NULLABLE"},
                {"name": "name", "type": "STRING", "mode": "NULLABLE"}
            ]),
            json!([
                {"f": [{"v": "1"}, {"v": "a"}]},
                {"f": [{"v": "2"}, {"v": null}]},
                {"f": [{"v": "3"}, {"v": "c"}]}
            ]),
        ),
        (_, "SELECT bad") => completed(
            &project,
            json!([{"name": "n", "type": "INTEGER", "mode": "NULLABLE"}]),
            json!([{"f": [{"v": "one"}]}]),
        ),
        (_, sql) => envelope(400, &format!("Syntax error: {sql}")),
    }
}
