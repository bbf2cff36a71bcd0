use thiserror::Error;

/// Errors raised while scraping vlr.gg and building the dataset
#[derive(Error, Debug)]
pub enum ScrapeError {
    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    // Page structure errors
    #[error("no {what} found on {url}")]
    MissingElement { what: &'static str, url: String },

    #[error("{what} has no `{attr}` attribute")]
    MissingAttribute {
        attr: &'static str,
        what: &'static str,
    },

    #[error("expected at least {expected} {what}, found {found}")]
    TooFewElements {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("team link is not of the form /team/{{id}}/{{name}}/: {0}")]
    InvalidTeamPath(String),

    #[error("invalid date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid selector {0}")]
    Selector(String),

    #[error("score is not a number: {0:?}")]
    InvalidScore(String),

    // Partition and dataset errors
    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    #[error("dataset is empty: {0}")]
    EmptyDataset(String),

    #[error("match {url} failed: {source}")]
    MatchFailed {
        url: String,
        #[source]
        source: Box<ScrapeError>,
    },

    // IO and serialization errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
