use crate::config::{self, FailureMode};
use crate::error::IngestError;
use crate::models::{AggregatedDataset, PageResponse};
use reqwest::Client;
use tracing::warn;

// -----------------------------------------------
// PAGE SOURCE SEAM
// -----------------------------------------------
/// Anything that can resolve one page URL into a decoded page.
/// The pagination loop runs against this, not against reqwest directly.
pub trait PageSource {
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, IngestError>;
}

// -----------------------------------------------
// CLIENT WRAPPER
// -----------------------------------------------
pub struct PolygonClient {
    client: Client,
}

impl PolygonClient {
    pub fn new() -> Result<Self, IngestError> {
        Ok(Self {
            client: build_client()?,
        })
    }

    /// Fetch every page for one (symbol, expiration) pair and
    /// concatenate the results in page order.
    pub async fn fetch_all(
        &self,
        api_key: &str,
        symbol: &str,
        expiration_date: &str,
        mode: FailureMode,
    ) -> Result<AggregatedDataset, IngestError> {
        let first_url = config::contracts_url(api_key, symbol, expiration_date);
        fetch_all_pages(self, first_url, mode).await
    }
}

impl PageSource for PolygonClient {
    async fn fetch_page(&self, url: &str) -> Result<PageResponse, IngestError> {
        let res = self.client.get(url).send().await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            return Err(IngestError::Fetch(format!("status {}: {}", status, preview)));
        }

        let text = res.text().await?;
        let page: PageResponse = serde_json::from_str(&text)?;
        Ok(page)
    }
}

// -----------------------------------------------
// PAGINATION LOOP
// -----------------------------------------------
/// Follow `next_url` until the server stops supplying one. Continuation
/// URLs are used verbatim; the server fully encodes their query string.
///
/// BestEffort: a failed page is logged and treated as empty, which also
/// truncates pagination (there is no continuation URL to follow). A
/// first-page failure therefore yields an empty dataset, not an error.
pub async fn fetch_all_pages<S: PageSource>(
    source: &S,
    first_url: String,
    mode: FailureMode,
) -> Result<AggregatedDataset, IngestError> {
    let mut dataset = AggregatedDataset::default();
    let mut next = Some(first_url);

    while let Some(url) = next {
        let page = match source.fetch_page(&url).await {
            Ok(page) => page,
            Err(e) => {
                if mode == FailureMode::FailFast {
                    return Err(e);
                }
                warn!(error = %e, "page fetch failed, truncating pagination");
                PageResponse::empty()
            }
        };

        next = page.next_url.clone().filter(|u| !u.is_empty());
        dataset.extend_from_page(page);
    }

    Ok(dataset)
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> Result<Client, IngestError> {
    Ok(Client::builder()
        .timeout(config::HTTP_TIMEOUT)
        .gzip(true)
        .build()?)
}
