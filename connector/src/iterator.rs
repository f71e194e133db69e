use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::{Error, JobError};
use crate::http::bigquery_job_client::BigqueryJobClient;
use crate::http::job::get_query_results::GetQueryResultsRequest;
use crate::http::table::TableFieldSchema;
use crate::http::tabledata::Tuple;
use crate::table::Row;
use crate::value;

/// Lazy, single-pass cursor over the rows of a completed query.
///
/// Rows of the current page are buffered; the next page is requested only when the buffer runs dry.
pub struct RowIterator {
    pub(crate) client: BigqueryJobClient,
    pub(crate) project_id: String,
    pub(crate) job_id: String,
    pub(crate) request: GetQueryResultsRequest,
    pub(crate) schema: Vec<TableFieldSchema>,
    pub(crate) columns: Arc<[String]>,
    pub(crate) chunk: VecDeque<Tuple>,
    pub total_size: i64,
}

impl RowIterator {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub async fn next(&mut self) -> Result<Option<Row>, Error> {
        loop {
            if let Some(v) = self.chunk.pop_front() {
                let values = value::decode_row(&self.schema, v).map_err(|e| Error::QueryExecution(e.into()))?;
                return Ok(Some(Row::new(self.columns.clone(), values)));
            }
            if self.request.page_token.is_none() {
                return Ok(None);
            }
            let response = self
                .client
                .get_query_results(self.project_id.as_str(), self.job_id.as_str(), &self.request)
                .await
                .map_err(|e| Error::QueryExecution(JobError::Http(e)))?;
            self.request.page_token = response.page_token.filter(|t| !t.is_empty());
            match response.rows {
                Some(rows) => self.chunk = VecDeque::from(rows),
                None => {
                    self.request.page_token = None;
                    return Ok(None);
                }
            }
        }
    }
}
