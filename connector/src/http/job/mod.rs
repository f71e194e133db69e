use crate::http::table::{SourceFormat, TableReference, TableSchema};
use crate::http::types::ErrorProto;

pub mod get;
pub mod get_query_results;
pub mod query;
pub mod upload;

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateDisposition {
    /// If the table does not exist, BigQuery creates the table.
    #[default]
    CreateIfNeeded,
    /// The table must already exist. If it does not, a 'notFound' error is returned in the job result.
    CreateNever,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WriteDisposition {
    /// If the table already exists, BigQuery overwrites the table data.
    WriteTruncate,
    /// If the table already exists, BigQuery appends the data to the table.
    WriteAppend,
    /// If the table already exists and contains data, a 'duplicate' error is returned in the job result.
    #[default]
    WriteEmpty,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    /// Required. The ID of the project containing this job.
    pub project_id: String,
    /// Required. The ID of the job.
    pub job_id: String,
    /// Optional. The geographic location of the job. The default value is US.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobConfigurationLoad {
    /// Required. The destination table to load the data into.
    pub destination_table: TableReference,
    /// Optional. The format of the data files. The default value is NEWLINE_DELIMITED_JSON here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_format: Option<SourceFormat>,
    /// Optional. Specifies whether the job is allowed to create new tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_disposition: Option<CreateDisposition>,
    /// Optional. Specifies the action that occurs if the destination table already exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_disposition: Option<WriteDisposition>,
    /// Optional. Indicates if BigQuery should automatically infer the options and schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autodetect: Option<bool>,
    /// Optional. The schema for the destination table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobConfiguration {
    /// Output only. The type of the job.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub job_type: String,
    /// Configures a load job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<JobConfigurationLoad>,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    /// Output only. Final error result of the job.
    /// If present, indicates that the job has completed and was unsuccessful.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_result: Option<ErrorProto>,
    /// Output only. The first errors encountered during the running of the job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorProto>>,
    /// Output only. Running state of the job.
    /// Valid states include 'PENDING', 'RUNNING', and 'DONE'.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
}

impl JobStatus {
    pub fn is_done(&self) -> bool {
        self.state == "DONE"
    }
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobStatisticsLoad {
    /// Output only. Number of rows imported in a load job.
    #[serde(default, deserialize_with = "crate::http::from_str_option")]
    pub output_rows: Option<i64>,
    /// Output only. Number of bytes of source data in a load job.
    #[serde(default, deserialize_with = "crate::http::from_str_option")]
    pub input_file_bytes: Option<i64>,
    /// Output only. Number of bad records encountered.
    #[serde(default, deserialize_with = "crate::http::from_str_option")]
    pub bad_records: Option<i64>,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobStatistics {
    /// Output only. Statistics for a load job.
    pub load: Option<JobStatisticsLoad>,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Output only. The resource type.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Output only. Opaque ID field of the job.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Required. Describes the job configuration.
    #[serde(default)]
    pub configuration: JobConfiguration,
    /// Optional. Reference describing the unique-per-user name of the job.
    #[serde(default)]
    pub job_reference: JobReference,
    /// Output only. Statistics for the job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<JobStatistics>,
    /// Output only. The status of this job.
    #[serde(default)]
    pub status: JobStatus,
}
