use std::{env, time::Duration};

use crate::error::{Result, ScrapeError};

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_RESULT_STATS_ID: &str = "result-stats";
pub const DEFAULT_RESULT_LINK_SELECTOR: &str = ".tF2Cxc a";
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings shared by the search fetch and the per-page fan-out.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub search_url: String,
    pub user_agent: String,
    pub page_timeout: Duration,
    /// `None` leaves the provider request on the client's default.
    pub search_timeout: Option<Duration>,
    pub result_stats_id: String,
    pub result_link_selector: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            search_timeout: None,
            result_stats_id: DEFAULT_RESULT_STATS_ID.to_string(),
            result_link_selector: DEFAULT_RESULT_LINK_SELECTOR.to_string(),
        }
    }
}

impl ScraperConfig {
    /// Reads overrides from the environment, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            search_url: env::var("SEARCH_URL").unwrap_or(defaults.search_url),
            user_agent: env::var("SCRAPER_USER_AGENT").unwrap_or(defaults.user_agent),
            page_timeout: secs_env("PAGE_TIMEOUT_SECS")?.unwrap_or(defaults.page_timeout),
            search_timeout: secs_env("SEARCH_TIMEOUT_SECS")?,
            result_stats_id: env::var("RESULT_STATS_ID").unwrap_or(defaults.result_stats_id),
            result_link_selector: env::var("RESULT_LINK_SELECTOR")
                .unwrap_or(defaults.result_link_selector),
        })
    }
}

fn secs_env(key: &str) -> Result<Option<Duration>> {
    match env::var(key) {
        Ok(raw) => parse_secs(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ScrapeError::Config(format!("{key} must be a whole number of seconds, got {raw:?}")))
}
