use std::fmt;

#[derive(Debug)]
pub enum IngestError {
    /// The API key environment variable is unset. Always fatal.
    MissingCredential(&'static str),
    /// Non-success HTTP status or transport failure while fetching a page.
    Fetch(String),
    /// The response body could not be decoded.
    Parse(String),
    /// The store rejected a batch write.
    StoreWrite(String),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IngestError::MissingCredential(var) => {
                write!(f, "Missing credential: set the {} environment variable", var)
            }
            IngestError::Fetch(msg) => write!(f, "Fetch error: {}", msg),
            IngestError::Parse(msg) => write!(f, "Parse error: {}", msg),
            IngestError::StoreWrite(msg) => write!(f, "Store write error: {}", msg),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        IngestError::Fetch(err.to_string())
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::Parse(err.to_string())
    }
}
