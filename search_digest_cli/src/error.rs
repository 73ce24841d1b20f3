use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: StatusCode },

    /// The results-count element is missing: either the provider changed its
    /// layout or the query had no results.
    #[error("element #{0} not found on the results page")]
    ProviderLayout(String),

    #[error("could not read a results count from {0:?}")]
    ResultCount(String),

    #[error("invalid CSS selector {0:?}")]
    Selector(String),

    #[error("result #{rank} has no href")]
    MissingHref { rank: usize },

    #[error("max results must be between {min} and {max}, got {value}")]
    MaxResultsOutOfRange { value: usize, min: usize, max: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("page analysis task failed: {0}")]
    Task(String),
}

impl ScrapeError {
    pub(crate) fn network(url: &str, source: reqwest::Error) -> Self {
        ScrapeError::Network {
            url: url.to_string(),
            source,
        }
    }

    /// True for failures that happen before any result page is fetched.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            ScrapeError::ProviderLayout(_)
                | ScrapeError::ResultCount(_)
                | ScrapeError::Network { .. }
                | ScrapeError::HttpStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
