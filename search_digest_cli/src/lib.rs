pub mod aggregator;
pub mod analyzer;
pub mod client;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod search;
pub mod stemmer;
pub mod utils;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregator::{AggregatedResult, FanoutAggregator};
use crate::client::WebClient;
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::search::{top_website, SearchResultFetcher};

pub use crate::aggregator::{merge_frequency_maps, top_words};

/// Normalized word -> occurrences. Absent keys mean zero.
pub type WordFrequencyMap = HashMap<String, u64>;

/// How many result pages to analyse for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct MaxResults(usize);

impl MaxResults {
    pub const MIN: usize = 5;
    pub const MAX: usize = 25;
    pub const DEFAULT: usize = 10;

    pub fn new(value: usize) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScrapeError::MaxResultsOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for MaxResults {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<usize> for MaxResults {
    type Error = ScrapeError;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MaxResults> for usize {
    fn from(value: MaxResults) -> Self {
        value.0
    }
}

/// One anchor from the results page. `rank` starts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLink {
    pub rank: usize,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// A result page that was left out of the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    pub rank: usize,
    pub url: Option<String>,
    pub error: String,
}

impl PageFailure {
    pub fn label(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("result #{}", self.rank))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub query: String,
    pub max_results: usize,
    pub results_count: u64,
    pub top_website: Option<String>,
    pub top_words: Vec<WordCount>,
    pub summary: String,
    pub pages_analyzed: usize,
    pub failures: Vec<PageFailure>,
    pub generated_at: DateTime<Utc>,
}

impl SearchReport {
    pub fn new(
        query: &str,
        max_results: MaxResults,
        results_count: u64,
        top_website: Option<String>,
        aggregated: AggregatedResult,
    ) -> Self {
        Self {
            query: query.to_string(),
            max_results: max_results.get(),
            results_count,
            top_website,
            top_words: aggregated.top_words,
            summary: aggregated.summary,
            pages_analyzed: aggregated.pages_analyzed,
            failures: aggregated.failures,
            generated_at: Utc::now(),
        }
    }

    /// User-facing notices: one per skipped page, plus one when no summary
    /// could be built.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .failures
            .iter()
            .map(|f| format!("Error accessing {}: {}", f.label(), f.error))
            .collect();
        if self.summary.is_empty() {
            warnings.push(format!("Failed to generate summary for '{}'.", self.query));
        }
        warnings
    }
}

pub fn query_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_string).collect()
}

/// Full pipeline: provider query, page fan-out, aggregation.
///
/// Errors are returned only for the provider stage; page failures end up in
/// [`SearchReport::failures`].
pub async fn run_search(
    config: &ScraperConfig,
    query: &str,
    max_results: MaxResults,
) -> Result<SearchReport> {
    let client = WebClient::new(config)?;
    let fetcher = SearchResultFetcher::new(&client, config)?;

    let results = fetcher.fetch_results(query).await?;
    tracing::info!(
        query,
        results_count = results.result_count,
        links = results.links.len(),
        "search results retrieved"
    );

    let top = top_website(&results.links);
    let aggregated = FanoutAggregator::new(&client)
        .run(query, max_results, Some(&results.links))
        .await;

    Ok(SearchReport::new(
        query,
        max_results,
        results.result_count,
        top,
        aggregated,
    ))
}
