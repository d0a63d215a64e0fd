use crate::config::{self, FailureMode, RunConfig};
use crate::error::IngestError;
use crate::models::{AggregatedDataset, OptionContract};
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

// -----------------------------------------------
// TIME-SERIES RECORD SHAPE
// -----------------------------------------------
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct MeasureValue {
    pub name: String,
    pub value: String,
    #[serde(rename = "Type")]
    pub value_type: String,
}

/// One multi-measure record for the time-series store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeSeriesRecord {
    pub dimensions: Vec<Dimension>,
    pub measure_name: String,
    pub measure_values: Vec<MeasureValue>,
    pub time: String,
    pub time_unit: String,
}

impl TimeSeriesRecord {
    /// The store expects numeric measures as plain strings with a type
    /// tag. `Display` for f64 renders 100.0 as "100", which is what the
    /// store's DOUBLE parser wants.
    pub fn from_contract(contract: &OptionContract, time_secs: i64) -> Self {
        Self {
            dimensions: vec![
                dimension("OptionID", &contract.ticker),
                dimension("Underlying", &contract.underlying_ticker),
                dimension("ContractType", &contract.contract_type),
            ],
            measure_name: "OptionMetrics".to_string(),
            measure_values: vec![
                measure("price", contract.strike_price, "DOUBLE"),
                measure("volume", contract.volume, "BIGINT"),
                measure("implied_volatility", contract.implied_volatility, "DOUBLE"),
            ],
            time: time_secs.to_string(),
            time_unit: "SECONDS".to_string(),
        }
    }
}

fn dimension(name: &str, value: &str) -> Dimension {
    Dimension {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn measure(name: &str, value: impl std::fmt::Display, value_type: &str) -> MeasureValue {
    MeasureValue {
        name: name.to_string(),
        value: format!("{}", value),
        value_type: value_type.to_string(),
    }
}

// -----------------------------------------------
// KEY-VALUE ITEM SHAPE
// -----------------------------------------------
/// One item for the key-value store, keyed by the contract ticker.
#[derive(Debug, Clone, Serialize)]
pub struct KeyValueItem {
    pub contract_ticker: String,
    pub strike_price: f64,
    pub expiration_date: String,
    pub option_type: String,
}

impl KeyValueItem {
    pub fn from_contract(contract: &OptionContract) -> Self {
        Self {
            contract_ticker: contract.ticker.clone(),
            strike_price: contract.strike_price,
            expiration_date: contract.expiration_date.clone(),
            option_type: contract.contract_type.clone(),
        }
    }
}

// -----------------------------------------------
// SINK ABSTRACTION
// -----------------------------------------------
/// A destination store. Each sink owns its projection from the shared
/// contract record to its wire shape; the batch writer only decides how
/// the dataset is sliced.
pub trait StoreSink {
    fn name(&self) -> &'static str;

    async fn write_batch(
        &mut self,
        contracts: &[OptionContract],
        time_secs: i64,
    ) -> Result<(), IngestError>;
}

pub struct TimeSeriesSink {
    client: Client,
    endpoint: String,
    database: String,
    table: String,
}

impl TimeSeriesSink {
    pub fn new(cfg: &RunConfig) -> Result<Self, IngestError> {
        Ok(Self {
            client: build_store_client()?,
            endpoint: cfg.store_endpoint.clone(),
            database: cfg.database.clone(),
            table: cfg.table.clone(),
        })
    }
}

impl StoreSink for TimeSeriesSink {
    fn name(&self) -> &'static str {
        "time-series"
    }

    async fn write_batch(
        &mut self,
        contracts: &[OptionContract],
        time_secs: i64,
    ) -> Result<(), IngestError> {
        let records: Vec<TimeSeriesRecord> = contracts
            .iter()
            .map(|c| TimeSeriesRecord::from_contract(c, time_secs))
            .collect();

        let body = serde_json::json!({
            "DatabaseName": self.database,
            "TableName": self.table,
            "Records": records,
        });

        submit(&self.client, &self.endpoint, &body).await
    }
}

pub struct KeyValueSink {
    client: Client,
    endpoint: String,
    table: String,
}

impl KeyValueSink {
    pub fn new(cfg: &RunConfig) -> Result<Self, IngestError> {
        Ok(Self {
            client: build_store_client()?,
            endpoint: cfg.store_endpoint.clone(),
            table: cfg.table.clone(),
        })
    }
}

impl StoreSink for KeyValueSink {
    fn name(&self) -> &'static str {
        "key-value"
    }

    async fn write_batch(
        &mut self,
        contracts: &[OptionContract],
        _time_secs: i64,
    ) -> Result<(), IngestError> {
        let items: Vec<KeyValueItem> = contracts.iter().map(KeyValueItem::from_contract).collect();

        let body = serde_json::json!({
            "TableName": self.table,
            "Items": items,
        });

        submit(&self.client, &self.endpoint, &body).await
    }
}

async fn submit(
    client: &Client,
    endpoint: &str,
    body: &serde_json::Value,
) -> Result<(), IngestError> {
    let res = client
        .post(endpoint)
        .json(body)
        .send()
        .await
        .map_err(|e| IngestError::StoreWrite(e.to_string()))?;

    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        let preview: String = text.chars().take(200).collect();
        return Err(IngestError::StoreWrite(format!(
            "status {}: {}",
            status, preview
        )));
    }

    Ok(())
}

fn build_store_client() -> Result<Client, IngestError> {
    Ok(Client::builder().timeout(config::HTTP_TIMEOUT).build()?)
}

// -----------------------------------------------
// BATCH WRITER
// -----------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Write calls issued (successful or not).
    pub batches: usize,
    /// Records acknowledged by the store.
    pub written: usize,
    /// Records discarded with a failed batch.
    pub failed: usize,
}

pub struct BatchWriter<S> {
    sink: S,
    ceiling: usize,
    mode: FailureMode,
}

impl<S: StoreSink> BatchWriter<S> {
    pub fn new(sink: S, mode: FailureMode) -> Self {
        Self {
            sink,
            ceiling: config::BATCH_CEILING,
            mode,
        }
    }

    /// Write the whole dataset in batches of at most the store ceiling.
    ///
    /// One capture timestamp is assigned up front and shared by every
    /// record of the call. A failed batch is discarded, never retried:
    /// BestEffort logs it and moves on, FailFast propagates it.
    pub async fn write_all(&mut self, dataset: &AggregatedDataset) -> Result<WriteSummary, IngestError> {
        let mut summary = WriteSummary::default();
        if dataset.is_empty() {
            return Ok(summary);
        }

        let time_secs = Utc::now().timestamp();

        for chunk in dataset.results.chunks(self.ceiling) {
            summary.batches += 1;
            match self.sink.write_batch(chunk, time_secs).await {
                Ok(()) => {
                    summary.written += chunk.len();
                    info!(sink = self.sink.name(), records = chunk.len(), "batch written");
                }
                Err(e) => {
                    if self.mode == FailureMode::FailFast {
                        return Err(e);
                    }
                    summary.failed += chunk.len();
                    warn!(
                        sink = self.sink.name(),
                        records = chunk.len(),
                        error = %e,
                        "batch write failed, discarding batch"
                    );
                }
            }
        }

        Ok(summary)
    }
}
