use serde::{Deserialize, Serialize};

/// One options contract as returned by the reference-data endpoint.
///
/// The payload is partial: the API omits fields freely depending on the
/// contract, so every field defaults (strings to empty, numerics to 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    #[serde(default)]
    pub ticker: String,

    #[serde(default)]
    pub underlying_ticker: String,

    /// "call" or "put"
    #[serde(default)]
    pub contract_type: String,

    #[serde(default)]
    pub strike_price: f64,

    #[serde(default)]
    pub expiration_date: String,

    #[serde(default)]
    pub volume: i64,

    #[serde(default)]
    pub implied_volatility: f64,
}

/// One page of the paginated contracts listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub results: Vec<OptionContract>,

    /// Server-supplied continuation URL. Absent, null or empty means
    /// this was the last page.
    #[serde(default)]
    pub next_url: Option<String>,
}

impl PageResponse {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            next_url: None,
        }
    }
}

/// All pages concatenated in arrival order. No deduplication.
#[derive(Debug, Clone, Default)]
pub struct AggregatedDataset {
    pub results: Vec<OptionContract>,
}

impl AggregatedDataset {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn extend_from_page(&mut self, page: PageResponse) {
        self.results.extend(page.results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_contract_defaults() {
        // Only the ticker present; everything else must default.
        let json = r#"{"ticker": "O:AAPL250315C00150000"}"#;
        let contract: OptionContract = serde_json::from_str(json).unwrap();

        assert_eq!(contract.ticker, "O:AAPL250315C00150000");
        assert_eq!(contract.underlying_ticker, "");
        assert_eq!(contract.contract_type, "");
        assert_eq!(contract.strike_price, 0.0);
        assert_eq!(contract.volume, 0);
        assert_eq!(contract.implied_volatility, 0.0);
    }

    #[test]
    fn test_page_without_next_url() {
        let json = r#"{"results": [{"ticker": "O:TEST1"}]}"#;
        let page: PageResponse = serde_json::from_str(json).unwrap();

        assert_eq!(page.results.len(), 1);
        assert!(page.next_url.is_none());
    }

    #[test]
    fn test_page_with_null_next_url() {
        let json = r#"{"results": [], "next_url": null}"#;
        let page: PageResponse = serde_json::from_str(json).unwrap();

        assert!(page.results.is_empty());
        assert!(page.next_url.is_none());
    }

    #[test]
    fn test_full_contract() {
        let json = r#"{
            "ticker": "O:AAPL250315C00150000",
            "underlying_ticker": "AAPL",
            "contract_type": "call",
            "strike_price": 150.0,
            "expiration_date": "2025-03-15",
            "volume": 1200,
            "implied_volatility": 0.31
        }"#;
        let contract: OptionContract = serde_json::from_str(json).unwrap();

        assert_eq!(contract.underlying_ticker, "AAPL");
        assert_eq!(contract.contract_type, "call");
        assert_eq!(contract.strike_price, 150.0);
        assert_eq!(contract.volume, 1200);
    }

    #[test]
    fn test_dataset_preserves_page_order() {
        let mut dataset = AggregatedDataset::default();
        dataset.extend_from_page(PageResponse {
            results: vec![contract("O:A"), contract("O:B")],
            next_url: Some("https://example/page2".to_string()),
        });
        dataset.extend_from_page(PageResponse {
            results: vec![contract("O:C")],
            next_url: None,
        });

        let tickers: Vec<&str> = dataset.results.iter().map(|c| c.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["O:A", "O:B", "O:C"]);
    }

    fn contract(ticker: &str) -> OptionContract {
        serde_json::from_str(&format!(r#"{{"ticker": "{}"}}"#, ticker)).unwrap()
    }
}
