use std::path::PathBuf;

use crate::http::error::Error as HttpError;
use crate::http::types::ErrorProto;
use crate::table::ShapeError;
use crate::value;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("credential file not found at: {}", .0.display())]
    CredentialNotFound(PathBuf),

    #[error("cannot access credential file at {}: {source}", .path.display())]
    CredentialAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load credentials: {0}")]
    Credentials(#[from] google_cloud_auth::error::Error),

    #[error("query execution failed: {0}")]
    QueryExecution(#[source] JobError),

    #[error("invalid data shape: {0}")]
    InvalidDataShape(#[from] ShapeError),

    #[error("upload to {dataset_id}.{table_id} failed: {source}")]
    Upload {
        dataset_id: String,
        table_id: String,
        #[source]
        source: JobError,
    },
}

/// Failure of one warehouse job, whichever request it surfaced on.
#[derive(thiserror::Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("job {job_id} failed: {error}")]
    Failed { job_id: String, error: ErrorProto },

    #[error(transparent)]
    Decode(#[from] value::Error),

    #[error("failed to encode rows: {0}")]
    Encode(#[from] serde_json::Error),
}

impl JobError {
    /// HTTP status reported by the warehouse, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            JobError::Http(e) => e.status(),
            _ => None,
        }
    }
}
