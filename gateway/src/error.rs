use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use warehouse_connector::http::error::Error as HttpError;
use warehouse_connector::{Error, JobError};

pub const MISSING_FIELDS: &str = "Missing 'bigqueryprojectid' or 'sql_query' in request";

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequestBody(String),

    #[error(transparent)]
    Warehouse(#[from] Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::Warehouse(e) => match e {
                Error::CredentialNotFound(_) | Error::CredentialAccess { .. } | Error::Credentials(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                Error::InvalidDataShape(_) => StatusCode::BAD_REQUEST,
                Error::QueryExecution(job) | Error::Upload { source: job, .. } => job_status(job),
            },
        }
    }

    fn message(&self) -> String {
        match self {
            GatewayError::InvalidRequestBody(message) => message.clone(),
            GatewayError::Warehouse(Error::CredentialNotFound(path)) => {
                format!("Credentials file not found at path: {}", path.display())
            }
            GatewayError::Warehouse(e) => format!("An error occurred: {e}"),
        }
    }
}

fn job_status(e: &JobError) -> StatusCode {
    match e {
        JobError::Failed { .. } => StatusCode::BAD_REQUEST,
        JobError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        JobError::Decode(_) => StatusCode::BAD_GATEWAY,
        JobError::Http(HttpError::TokenSource(_)) => StatusCode::FORBIDDEN,
        JobError::Http(e) => match e.status() {
            Some(401 | 403) => StatusCode::FORBIDDEN,
            Some(code) if (400..500).contains(&code) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{self}");
        } else {
            tracing::debug!(status = status.as_u16(), "{self}");
        }
        (status, self.message()).into_response()
    }
}
