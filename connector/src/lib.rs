//! # warehouse-connector
//!
//! A thin BigQuery connector: run a SQL statement and read the rows lazily or as a
//! materialized [`Table`], or append an in-memory [`Table`] to a warehouse table.
//!
//! Every call is one blocking round trip with the warehouse, gated on job completion.
//! Nothing is retried and no state is shared between connectors.
//!
//! ## Quick Start
//!
//! ```
//! use std::path::Path;
//! use warehouse_connector::{Connector, ConnectorConfig, Error, Table};
//!
//! async fn run() -> Result<(), Error> {
//!     let connector = Connector::connect(
//!         "my-project",
//!         Some(Path::new(".keys/service-account.json")),
//!         ConnectorConfig::default(),
//!     )
//!     .await?;
//!
//!     // lazily
//!     let mut rows = connector.query("SELECT 1 AS x").await?;
//!     while let Some(row) = rows.next().await? {
//!         println!("{:?}", row.get("x"));
//!     }
//!
//!     // materialized, serializes as `[{"x":1}]`
//!     let table = connector.query_to_table("SELECT 1 AS x").await?;
//!     println!("{}", serde_json::to_string(&table).unwrap());
//!
//!     // append-only load
//!     let data = Table::from_records(vec![serde_json::json!({"id": 1, "name": "a"})])?;
//!     let loaded = connector.append_load("my_dataset", "my_table", &data).await?;
//!     println!("loaded {loaded} rows");
//!     Ok(())
//! }
//! ```
//!
//! Without a credential path the connector uses the token source provider in
//! [`ConnectorConfig`]: call [`ConnectorConfig::with_auth`] for application default
//! credentials, or leave it unset to talk to an emulator without authentication.

pub mod connector;
pub mod error;
pub mod http;
pub mod iterator;
pub mod table;
pub mod value;

pub use connector::{Connector, ConnectorConfig};
pub use error::{Error, JobError};
pub use iterator::RowIterator;
pub use table::{Row, ShapeError, Table};
