pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod polygon_client;
pub mod store;

// Re-exports for convenience
pub use config::{FailureMode, RunConfig, StoreKind};
pub use error::IngestError;
pub use models::{AggregatedDataset, OptionContract, PageResponse};
pub use polygon_client::{PageSource, PolygonClient};
pub use store::{BatchWriter, KeyValueSink, StoreSink, TimeSeriesSink, WriteSummary};
