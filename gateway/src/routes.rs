use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use warehouse_connector::Table;

use crate::error::{GatewayError, MISSING_FIELDS};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct QueryPayload {
    #[serde(default)]
    pub bigqueryprojectid: Option<String>,
    #[serde(default)]
    pub sql_query: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/query", post(query))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn hello(State(state): State<AppState>) -> String {
    format!("Hello {}!", state.config.greeting.name)
}

/// Runs the submitted SQL in the submitted project and answers with the rows as a JSON array.
async fn query(
    State(state): State<AppState>,
    payload: Result<Json<QueryPayload>, JsonRejection>,
) -> Result<Json<Table>, GatewayError> {
    let Json(payload) =
        payload.map_err(|e| GatewayError::InvalidRequestBody(format!("An error occurred: {}", e.body_text())))?;
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(project_id), Some(sql)) = (non_empty(payload.bigqueryprojectid), non_empty(payload.sql_query)) else {
        return Err(GatewayError::InvalidRequestBody(MISSING_FIELDS.to_string()));
    };

    tracing::debug!(project_id = %project_id, "executing query");
    let connector = state.connector(&project_id).await?;
    let table = connector.query_to_table(&sql).await?;
    tracing::debug!(project_id = %project_id, rows = table.len(), "query finished");
    Ok(Json(table))
}
