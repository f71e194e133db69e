//! In-process stand-in for the BigQuery REST API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Clone)]
pub enum Scripted {
    Rows {
        schema: Value,
        pages: Vec<Vec<Value>>,
        pending: usize,
    },
    Fail {
        code: u16,
        message: String,
    },
}

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct Inner {
    queries: HashMap<String, Scripted>,
    running: HashMap<String, (Scripted, usize)>,
    tables: HashMap<String, Vec<Value>>,
    failing_tables: HashMap<String, String>,
    loads: HashMap<String, (i64, usize)>,
    requests: Vec<Recorded>,
    load_job_polls: usize,
}

#[derive(Clone, Default)]
pub struct MockWarehouse {
    inner: Arc<Mutex<Inner>>,
}

impl MockWarehouse {
    /// Serves the mock on an ephemeral port and returns its base URL.
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/bigquery/v2/projects/:project/queries", post(query))
            .route("/bigquery/v2/projects/:project/queries/:job_id", get(get_query_results))
            .route("/bigquery/v2/projects/:project/jobs/:job_id", get(get_job))
            .route("/upload/bigquery/v2/projects/:project/jobs", post(upload))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    pub fn script(&self, sql: &str, scripted: Scripted) {
        self.inner.lock().unwrap().queries.insert(sql.to_string(), scripted);
    }

    pub fn seed_table(&self, dataset: &str, table: &str, rows: Vec<Value>) {
        self.inner
            .lock()
            .unwrap()
            .tables
            .insert(format!("{dataset}.{table}"), rows);
    }

    pub fn fail_loads_into(&self, dataset: &str, table: &str, message: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_tables
            .insert(format!("{dataset}.{table}"), message.to_string());
    }

    /// Number of `jobs.get` polls a load job answers with RUNNING before reporting DONE.
    pub fn set_load_job_polls(&self, polls: usize) {
        self.inner.lock().unwrap().load_job_polls = polls;
    }

    pub fn table(&self, dataset: &str, table: &str) -> Vec<Value> {
        self.inner
            .lock()
            .unwrap()
            .tables
            .get(&format!("{dataset}.{table}"))
            .cloned()
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }

    fn record(&self, method: &'static str, path: String, headers: &HeaderMap) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.inner.lock().unwrap().requests.push(Recorded {
            method,
            path,
            authorization,
        });
    }
}

pub fn field(name: &str, data_type: &str) -> Value {
    json!({"name": name, "type": data_type, "mode": "NULLABLE"})
}

pub fn schema(fields: Vec<Value>) -> Value {
    json!({ "fields": fields })
}

pub fn tuple(cells: &[Option<&str>]) -> Value {
    let f: Vec<Value> = cells.iter().map(|c| json!({ "v": c })).collect();
    json!({ "f": f })
}

fn error_response(code: u16, message: &str) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    let body = json!({"error": {"code": code, "message": message, "errors": [{"reason": "invalidQuery", "message": message}]}});
    (status, Json(body)).into_response()
}

fn page_response(project: &str, job_id: &str, schema: &Value, pages: &[Vec<Value>], index: usize) -> Value {
    let total: usize = pages.iter().map(Vec::len).sum();
    let mut body = json!({
        "kind": "bigquery#queryResponse",
        "jobReference": {"projectId": project, "jobId": job_id, "location": "US"},
        "schema": schema,
        "totalRows": total.to_string(),
        "jobComplete": true,
        "rows": pages.get(index).cloned().unwrap_or_default(),
    });
    if index + 1 < pages.len() {
        body["pageToken"] = json!((index + 1).to_string());
    }
    body
}

async fn query(
    State(mock): State<MockWarehouse>,
    Path(project): Path<String>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    mock.record("POST", format!("/projects/{project}/queries"), &headers);
    assert_eq!(request["useLegacySql"], json!(false));
    let sql = request["query"].as_str().unwrap_or_default().to_string();
    let scripted = mock.inner.lock().unwrap().queries.get(&sql).cloned();
    let job_id = format!("job_{}", mock.requests().len());
    match scripted {
        None => error_response(400, &format!("Unrecognized name in query: {sql}")),
        Some(Scripted::Fail { code, message }) => error_response(code, &message),
        Some(Scripted::Rows { schema, pages, pending }) => {
            if pending > 0 {
                mock.inner
                    .lock()
                    .unwrap()
                    .running
                    .insert(job_id.clone(), (Scripted::Rows { schema, pages, pending: 0 }, pending - 1));
                let body = json!({
                    "kind": "bigquery#queryResponse",
                    "jobReference": {"projectId": project, "jobId": job_id, "location": "US"},
                    "jobComplete": false,
                });
                return Json(body).into_response();
            }
            mock.inner.lock().unwrap().running.insert(
                job_id.clone(),
                (
                    Scripted::Rows {
                        schema: schema.clone(),
                        pages: pages.clone(),
                        pending: 0,
                    },
                    0,
                ),
            );
            Json(page_response(&project, &job_id, &schema, &pages, 0)).into_response()
        }
    }
}

async fn get_query_results(
    State(mock): State<MockWarehouse>,
    Path((project, job_id)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    mock.record("GET", format!("/projects/{project}/queries/{job_id}"), &headers);
    assert_eq!(params.get("formatOptions.useInt64Timestamp").map(String::as_str), Some("true"));
    let mut inner = mock.inner.lock().unwrap();
    let Some((scripted, remaining)) = inner.running.get_mut(&job_id) else {
        return error_response(404, &format!("Not found: Job {project}:{job_id}"));
    };
    let Scripted::Rows { schema, pages, .. } = scripted.clone() else {
        return error_response(500, "unexpected job");
    };
    if *remaining > 0 {
        *remaining -= 1;
        let body = json!({
            "kind": "bigquery#getQueryResultsResponse",
            "jobReference": {"projectId": project, "jobId": job_id, "location": "US"},
            "jobComplete": false,
        });
        return Json(body).into_response();
    }
    let index = params
        .get("pageToken")
        .and_then(|t| t.parse::<usize>().ok())
        .unwrap_or_default();
    Json(page_response(&project, &job_id, &schema, &pages, index)).into_response()
}

async fn upload(
    State(mock): State<MockWarehouse>,
    Path(project): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    mock.record("POST", format!("/upload/projects/{project}/jobs"), &headers);
    assert_eq!(params.get("uploadType").map(String::as_str), Some("multipart"));
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let boundary = content_type
        .strip_prefix("multipart/related; boundary=")
        .expect("multipart/related content type")
        .to_string();
    let body = String::from_utf8(body.to_vec()).unwrap();
    let parts: Vec<&str> = body
        .split(&format!("--{boundary}"))
        .map(|p| p.trim_start_matches("\r\n"))
        .filter(|p| !p.is_empty() && !p.starts_with("--"))
        .map(|p| p.split_once("\r\n\r\n").map(|(_, content)| content).unwrap_or_default())
        .map(|p| p.strip_suffix("\r\n").unwrap_or(p))
        .collect();
    assert_eq!(parts.len(), 2, "metadata and media parts");
    let metadata: Value = serde_json::from_str(parts[0]).unwrap();
    let load = &metadata["configuration"]["load"];
    assert_eq!(load["writeDisposition"], json!("WRITE_APPEND"));
    assert_eq!(load["sourceFormat"], json!("NEWLINE_DELIMITED_JSON"));
    let job_id = metadata["jobReference"]["jobId"].as_str().unwrap().to_string();
    let key = format!(
        "{}.{}",
        load["destinationTable"]["datasetId"].as_str().unwrap(),
        load["destinationTable"]["tableId"].as_str().unwrap()
    );

    let mut inner = mock.inner.lock().unwrap();
    if let Some(message) = inner.failing_tables.get(&key).cloned() {
        let body = json!({
            "jobReference": {"projectId": project, "jobId": job_id, "location": "US"},
            "status": {"state": "DONE", "errorResult": {"reason": "invalid", "message": message}},
        });
        return Json(body).into_response();
    }
    let rows: Vec<Value> = parts[1]
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let count = rows.len() as i64;
    inner.tables.entry(key).or_default().extend(rows);
    let polls = inner.load_job_polls;
    inner.loads.insert(job_id.clone(), (count, polls));
    let state = if polls == 0 { "DONE" } else { "RUNNING" };
    let body = json!({
        "jobReference": {"projectId": project, "jobId": job_id, "location": "US"},
        "status": {"state": state},
        "statistics": {"load": {"outputRows": count.to_string()}},
    });
    Json(body).into_response()
}

async fn get_job(
    State(mock): State<MockWarehouse>,
    Path((project, job_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    mock.record("GET", format!("/projects/{project}/jobs/{job_id}"), &headers);
    let mut inner = mock.inner.lock().unwrap();
    let Some((count, remaining)) = inner.loads.get_mut(&job_id) else {
        return error_response(404, &format!("Not found: Job {project}:{job_id}"));
    };
    let state = if *remaining > 0 {
        *remaining -= 1;
        "RUNNING"
    } else {
        "DONE"
    };
    let body = json!({
        "jobReference": {"projectId": project, "jobId": job_id, "location": "US"},
        "status": {"state": state},
        "statistics": {"load": {"outputRows": count.to_string()}},
    });
    Json(body).into_response()
}
