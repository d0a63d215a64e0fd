use crate::error::IngestError;
use std::time::Duration;

// -----------------------------------------------
// POLYGON API ENDPOINTS
// -----------------------------------------------
pub const POLYGON_BASE_URL: &str = "https://api.polygon.io";

pub fn contracts_url(api_key: &str, symbol: &str, expiration_date: &str) -> String {
    format!(
        "{}/v3/reference/options/contracts?underlying_ticker={}&expiration_date={}&apiKey={}",
        POLYGON_BASE_URL,
        urlencoding::encode(symbol),
        urlencoding::encode(expiration_date),
        api_key
    )
}

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
// The remote API is an external dependency that can hang; always run
// with an explicit request timeout.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// -----------------------------------------------
// STORE LIMITS
// -----------------------------------------------
/// Maximum records the time-series store accepts per write call.
pub const BATCH_CEILING: usize = 100;

// -----------------------------------------------
// ENVIRONMENT VARIABLES
// -----------------------------------------------
pub const ENV_API_KEY: &str = "POLYGON_API_KEY";
pub const ENV_SYMBOL: &str = "OPTIONS_SYMBOL";
pub const ENV_EXPIRATION: &str = "OPTIONS_EXPIRATION";
pub const ENV_STORE_KIND: &str = "STORE_KIND";
pub const ENV_STORE_ENDPOINT: &str = "STORE_ENDPOINT";
pub const ENV_STORE_DATABASE: &str = "STORE_DATABASE";
pub const ENV_STORE_TABLE: &str = "STORE_TABLE";
pub const ENV_FAILURE_MODE: &str = "FAILURE_MODE";

// -----------------------------------------------
// DEFAULTS
// -----------------------------------------------
pub const DEFAULT_SYMBOL: &str = "AAPL";
pub const DEFAULT_EXPIRATION: &str = "2025-03-15";
pub const DEFAULT_STORE_DATABASE: &str = "OptionsDB";
pub const DEFAULT_STORE_TABLE: &str = "OptionsPrice";
pub const DEFAULT_KV_TABLE: &str = "options_data";

/// What to do when a page fetch or batch write fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Log the failure, drop the affected page/batch, keep going.
    BestEffort,
    /// Propagate the first failure to the caller.
    FailFast,
}

/// Which store the run writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    KeyValue,
    TimeSeries,
}

/// Runtime configuration for one ingest pass.
///
/// Everything comes from the environment; the symbol and expiration
/// date can also be passed as the first two positional arguments.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub api_key: String,
    pub symbol: String,
    pub expiration_date: String,
    pub store_kind: StoreKind,
    pub store_endpoint: String,
    pub database: String,
    pub table: String,
    pub failure_mode: FailureMode,
}

impl RunConfig {
    pub fn from_env() -> Result<Self, IngestError> {
        let api_key = std::env::var(ENV_API_KEY)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| IngestError::MissingCredential(ENV_API_KEY))?;

        let mut args = std::env::args().skip(1);
        let symbol = args
            .next()
            .or_else(|| std::env::var(ENV_SYMBOL).ok())
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());
        let expiration_date = args
            .next()
            .or_else(|| std::env::var(ENV_EXPIRATION).ok())
            .unwrap_or_else(|| DEFAULT_EXPIRATION.to_string());

        let store_kind = match std::env::var(ENV_STORE_KIND).as_deref() {
            Ok("key-value") | Ok("kv") => StoreKind::KeyValue,
            _ => StoreKind::TimeSeries,
        };

        let table = std::env::var(ENV_STORE_TABLE).unwrap_or_else(|_| {
            match store_kind {
                StoreKind::KeyValue => DEFAULT_KV_TABLE.to_string(),
                StoreKind::TimeSeries => DEFAULT_STORE_TABLE.to_string(),
            }
        });

        Ok(Self {
            api_key,
            symbol,
            expiration_date,
            store_kind,
            store_endpoint: std::env::var(ENV_STORE_ENDPOINT)
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            database: std::env::var(ENV_STORE_DATABASE)
                .unwrap_or_else(|_| DEFAULT_STORE_DATABASE.to_string()),
            table,
            failure_mode: match std::env::var(ENV_FAILURE_MODE).as_deref() {
                Ok("fail-fast") => FailureMode::FailFast,
                _ => FailureMode::BestEffort,
            },
        })
    }
}
