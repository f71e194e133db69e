use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use google_cloud_auth::credentials::CredentialsFile;
use google_cloud_auth::project::Config;
use google_cloud_auth::token::DefaultTokenSourceProvider;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use token_source::TokenSourceProvider;
use uuid::Uuid;

use crate::error::{Error, JobError};
use crate::http::bigquery_client::{BigqueryClient, SCOPES};
use crate::http::bigquery_job_client::BigqueryJobClient;
use crate::http::job::get::GetJobRequest;
use crate::http::job::get_query_results::GetQueryResultsRequest;
use crate::http::job::query::QueryRequest;
use crate::http::job::{
    CreateDisposition, Job, JobConfiguration, JobConfigurationLoad, JobReference, WriteDisposition,
};
use crate::http::table::{SourceFormat, TableReference};
use crate::http::types::DataFormatOptions;
use crate::iterator::RowIterator;
use crate::table::Table;

#[derive(Debug)]
pub struct ConnectorConfig {
    pub http: ClientWithMiddleware,
    pub bigquery_endpoint: String,
    /// `None` sends requests without an Authorization header (local emulators).
    pub token_source_provider: Option<Box<dyn TokenSourceProvider>>,
    pub location: Option<String>,
    /// How long a single `jobs.query`/`getQueryResults` call waits server-side for completion.
    pub query_timeout: Duration,
    pub max_results: Option<i64>,
    /// Delay between `jobs.get` polls while a load job runs.
    pub poll_interval: Duration,
    pub debug: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            http: ClientBuilder::new(reqwest::Client::default()).build(),
            bigquery_endpoint: "https://bigquery.googleapis.com".to_string(),
            token_source_provider: None,
            location: None,
            query_timeout: Duration::from_secs(10),
            max_results: None,
            poll_interval: Duration::from_secs(1),
            debug: false,
        }
    }
}

impl ConnectorConfig {
    /// Uses application default credentials.
    pub async fn with_auth(mut self) -> Result<Self, Error> {
        let tsp = DefaultTokenSourceProvider::new(Self::auth_config()).await?;
        self.token_source_provider = Some(Box::new(tsp));
        Ok(self)
    }

    /// Uses the service account key at `path`. The file must exist.
    pub async fn with_credentials_file(mut self, path: &Path) -> Result<Self, Error> {
        match tokio::fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => return Err(Error::CredentialNotFound(path.to_path_buf())),
            Err(source) => {
                return Err(Error::CredentialAccess {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
        let credentials = CredentialsFile::new_from_file(path.to_string_lossy().into_owned()).await?;
        let tsp = DefaultTokenSourceProvider::new_with_credentials(Self::auth_config(), Box::new(credentials)).await?;
        self.token_source_provider = Some(Box::new(tsp));
        Ok(self)
    }

    /// Sends requests without an Authorization header.
    pub fn anonymous(mut self) -> Self {
        self.token_source_provider = None;
        self
    }

    pub fn with_token_source_provider(mut self, tsp: Box<dyn TokenSourceProvider>) -> Self {
        self.token_source_provider = Some(tsp);
        self
    }

    fn auth_config() -> Config<'static> {
        Config::default().with_scopes(&SCOPES)
    }
}

/// One authenticated session to the warehouse, scoped to a single project.
pub struct Connector {
    job_client: BigqueryJobClient,
    project_id: String,
    location: Option<String>,
    query_timeout: Duration,
    max_results: Option<i64>,
    poll_interval: Duration,
}

impl Connector {
    /// Creates a connector for `project_id`.
    ///
    /// When `credentials_path` is given the key file is checked and loaded eagerly;
    /// otherwise the token source provider already in `config` is used.
    pub async fn connect(
        project_id: impl Into<String>,
        credentials_path: Option<&Path>,
        config: ConnectorConfig,
    ) -> Result<Self, Error> {
        let config = match credentials_path {
            Some(path) => config.with_credentials_file(path).await?,
            None => config,
        };
        Ok(Self::new(project_id, config))
    }

    pub fn new(project_id: impl Into<String>, config: ConnectorConfig) -> Self {
        let ts = config.token_source_provider.map(|tsp| tsp.token_source());
        let client = Arc::new(BigqueryClient::new(
            ts,
            config.bigquery_endpoint.as_str(),
            config.http,
            config.debug,
        ));
        Self {
            job_client: BigqueryJobClient::new(client),
            project_id: project_id.into(),
            location: config.location,
            query_timeout: config.query_timeout,
            max_results: config.max_results,
            poll_interval: config.poll_interval,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Runs `sql`, waits for the job to finish and returns a lazy cursor over the result rows.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn query(&self, sql: &str) -> Result<RowIterator, Error> {
        self.run_query(sql).await.map_err(|e| {
            tracing::error!(project_id = %self.project_id, "query execution failed: {e}");
            Error::QueryExecution(e)
        })
    }

    /// Runs `sql` and materializes every result row.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn query_to_table(&self, sql: &str) -> Result<Table, Error> {
        let mut iter = self.query(sql).await?;
        let capacity = usize::try_from(iter.total_size).unwrap_or_default();
        let mut table = Table::new(iter.columns().to_vec(), Vec::with_capacity(capacity));
        while let Some(row) = iter.next().await? {
            table.push(row.into_values());
        }
        Ok(table)
    }

    /// Appends `data` to `dataset_id.table_id` and returns the number of rows written.
    ///
    /// The shape of `data` is checked before anything is sent. Existing rows are never replaced.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn append_load(&self, dataset_id: &str, table_id: &str, data: &Table) -> Result<i64, Error> {
        data.validate()?;
        if data.is_empty() {
            tracing::debug!("nothing to load into {}.{}", dataset_id, table_id);
            return Ok(0);
        }
        match self.run_load(dataset_id, table_id, data).await {
            Ok(rows) => {
                tracing::info!("Loaded {} rows into {}.{}", rows, dataset_id, table_id);
                Ok(rows)
            }
            Err(source) => {
                tracing::error!("An error occurred during data upload to {}.{}: {}", dataset_id, table_id, source);
                Err(Error::Upload {
                    dataset_id: dataset_id.to_string(),
                    table_id: table_id.to_string(),
                    source,
                })
            }
        }
    }

    async fn run_query(&self, sql: &str) -> Result<RowIterator, JobError> {
        let timeout_ms = i64::try_from(self.query_timeout.as_millis()).ok();
        let request = QueryRequest {
            query: sql.to_string(),
            max_results: self.max_results,
            timeout_ms,
            use_legacy_sql: false,
            location: self.location.clone(),
            format_options: Some(DataFormatOptions {
                use_int64_timestamp: true,
            }),
            request_id: None,
        };
        tracing::debug!(project_id = %self.project_id, "submitting query");
        let response = self.job_client.query(self.project_id.as_str(), &request).await?;

        let job = response.job_reference;
        let mut results_request = GetQueryResultsRequest {
            max_results: self.max_results,
            timeout_ms,
            location: job.location.clone().or_else(|| self.location.clone()),
            use_int64_timestamp: Some(true),
            ..Default::default()
        };

        let (mut complete, mut schema, mut rows, mut page_token, mut total_rows) = (
            response.job_complete,
            response.schema,
            response.rows,
            response.page_token,
            response.total_rows,
        );
        while !complete {
            tracing::debug!(job_id = %job.job_id, "waiting for query job");
            let page = self
                .job_client
                .get_query_results(job.project_id.as_str(), job.job_id.as_str(), &results_request)
                .await?;
            (complete, schema, rows, page_token, total_rows) =
                (page.job_complete, page.schema, page.rows, page.page_token, page.total_rows);
        }

        let schema = schema.map(|s| s.fields).unwrap_or_default();
        let columns: Arc<[String]> = schema.iter().map(|f| f.name.clone()).collect();
        results_request.page_token = page_token.filter(|t| !t.is_empty());
        Ok(RowIterator {
            client: self.job_client.clone(),
            project_id: job.project_id,
            job_id: job.job_id,
            request: results_request,
            schema,
            columns,
            chunk: VecDeque::from(rows.unwrap_or_default()),
            total_size: total_rows.unwrap_or_default(),
        })
    }

    async fn run_load(&self, dataset_id: &str, table_id: &str, data: &Table) -> Result<i64, JobError> {
        let payload = data.to_ndjson()?;
        let reference = JobReference {
            project_id: self.project_id.clone(),
            job_id: new_job_id("load"),
            location: self.location.clone(),
        };
        let metadata = Job {
            job_reference: reference.clone(),
            configuration: JobConfiguration {
                load: Some(JobConfigurationLoad {
                    destination_table: TableReference {
                        project_id: self.project_id.clone(),
                        dataset_id: dataset_id.to_string(),
                        table_id: table_id.to_string(),
                    },
                    source_format: Some(SourceFormat::NewlineDelimitedJson),
                    create_disposition: Some(CreateDisposition::CreateIfNeeded),
                    write_disposition: Some(WriteDisposition::WriteAppend),
                    autodetect: Some(true),
                    schema: None,
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        tracing::debug!(job_id = %reference.job_id, bytes = payload.len(), "submitting load job");
        let mut job = self.job_client.upload(&metadata, &payload).await?;
        let request = GetJobRequest {
            location: job.job_reference.location.clone().or(reference.location),
        };
        while !job.status.is_done() {
            tokio::time::sleep(self.poll_interval).await;
            job = self
                .job_client
                .get(reference.project_id.as_str(), reference.job_id.as_str(), &request)
                .await?;
        }

        if let Some(error) = job.status.error_result {
            return Err(JobError::Failed {
                job_id: reference.job_id,
                error,
            });
        }
        Ok(job
            .statistics
            .and_then(|s| s.load)
            .and_then(|l| l.output_rows)
            .unwrap_or_default())
    }
}

fn new_job_id(kind: &str) -> String {
    format!("warehouse_connector_{}_{}", kind, Uuid::new_v4())
}
