use std::time::Duration;

use scraper::{Html, Selector};
use url::Url;

use crate::client::WebClient;
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::ResultLink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub result_count: u64,
    pub links: Vec<ResultLink>,
}

/// Reads the results count and result anchors out of a provider page.
#[derive(Debug, Clone)]
pub struct ResultsPageParser {
    stats_id: String,
    stats_selector: Selector,
    link_selector: Selector,
    base_url: Url,
}

impl ResultsPageParser {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let stats = format!("#{}", config.result_stats_id);
        Ok(Self {
            stats_id: config.result_stats_id.clone(),
            stats_selector: parse_selector(&stats)?,
            link_selector: parse_selector(&config.result_link_selector)?,
            base_url: parse_search_url(&config.search_url)?,
        })
    }

    pub fn parse(&self, html: &str) -> Result<SearchResults> {
        let doc = Html::parse_document(html);

        let stats = doc
            .select(&self.stats_selector)
            .next()
            .ok_or_else(|| ScrapeError::ProviderLayout(self.stats_id.clone()))?;
        let result_count = parse_result_count(&stats.text().collect::<String>())?;

        let links = doc
            .select(&self.link_selector)
            .enumerate()
            .map(|(i, el)| ResultLink {
                rank: i + 1,
                url: el
                    .value()
                    .attr("href")
                    .and_then(|href| resolve_href(&self.base_url, href)),
            })
            .collect();

        Ok(SearchResults {
            result_count,
            links,
        })
    }
}

/// Queries the search provider once and parses its results page.
pub struct SearchResultFetcher<'a> {
    client: &'a WebClient,
    parser: ResultsPageParser,
    search_url: Url,
    timeout: Option<Duration>,
}

impl<'a> SearchResultFetcher<'a> {
    pub fn new(client: &'a WebClient, config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            client,
            parser: ResultsPageParser::new(config)?,
            search_url: parse_search_url(&config.search_url)?,
            timeout: config.search_timeout,
        })
    }

    pub async fn fetch_results(&self, query: &str) -> Result<SearchResults> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("q", query);

        let html = self.client.get_text(url.as_str(), self.timeout).await?;
        let results = self.parser.parse(&html);
        if let Err(e) = &results {
            tracing::warn!(query, error = %e, "could not read search results");
        }
        results
    }
}

/// URL of the first result, when it has one.
pub fn top_website(links: &[ResultLink]) -> Option<String> {
    links.first().and_then(|link| link.url.clone())
}

/// The count is the second whitespace token with its thousands separators
/// removed, e.g. `About 1,230,000 results`.
pub fn parse_result_count(text: &str) -> Result<u64> {
    text.split_whitespace()
        .nth(1)
        .and_then(|token| token.replace(',', "").parse().ok())
        .ok_or_else(|| ScrapeError::ResultCount(text.trim().to_string()))
}

/// Resolves relative hrefs against the results page and unwraps provider
/// redirect links (`/url?q=<target>`).
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let url = base.join(href).ok()?;
    if url.host_str() == base.host_str() && url.path() == "/url" {
        let target = url
            .query_pairs()
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.into_owned())?;
        return Url::parse(&target).ok().map(String::from);
    }
    Some(url.into())
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| ScrapeError::Selector(selector.to_string()))
}

fn parse_search_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| ScrapeError::Config(format!("invalid search url {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ResultsPageParser {
        ResultsPageParser::new(&ScraperConfig::default()).unwrap()
    }

    const RESULTS_PAGE: &str = r#"<html><body>
        <div id="result-stats">About 1,230,000 results<nobr> (0.41 seconds)</nobr></div>
        <div class="tF2Cxc"><a href="https://example.org/a">A</a></div>
        <div class="tF2Cxc"><a>no href</a></div>
        <div class="tF2Cxc"><a href="/url?q=https://example.net/b&amp;sa=U">B</a></div>
        <div class="other"><a href="https://ignored.example">C</a></div>
    </body></html>"#;

    #[test]
    fn parses_count_and_links_in_order() {
        let results = parser().parse(RESULTS_PAGE).unwrap();

        assert_eq!(results.result_count, 1_230_000);
        assert_eq!(
            results.links,
            vec![
                ResultLink {
                    rank: 1,
                    url: Some("https://example.org/a".into())
                },
                ResultLink { rank: 2, url: None },
                ResultLink {
                    rank: 3,
                    url: Some("https://example.net/b".into())
                },
            ]
        );
        assert_eq!(top_website(&results.links).as_deref(), Some("https://example.org/a"));
    }

    #[test]
    fn missing_stats_element_is_a_layout_error() {
        let err = parser()
            .parse("<html><body><p>nothing</p></body></html>")
            .unwrap_err();
        assert!(matches!(err, ScrapeError::ProviderLayout(ref id) if id == "result-stats"));
        assert!(err.is_provider_failure());
    }

    #[test]
    fn unreadable_count_is_an_error() {
        assert_eq!(parse_result_count("About 7 results").unwrap(), 7);
        assert!(matches!(parse_result_count("1 result"), Err(ScrapeError::ResultCount(_))));
        assert!(parse_result_count("").is_err());
    }

    #[test]
    fn top_website_of_nothing() {
        assert_eq!(top_website(&[]), None);
        assert_eq!(top_website(&[ResultLink { rank: 1, url: None }]), None);
    }

    #[test]
    fn resolves_relative_links() {
        let base = Url::parse("https://www.google.com/search").unwrap();
        assert_eq!(
            resolve_href(&base, "/maps/place").as_deref(),
            Some("https://www.google.com/maps/place")
        );
        assert_eq!(resolve_href(&base, "/url?sa=U"), None);
    }

    #[test]
    fn bad_selector_is_reported() {
        let config = ScraperConfig {
            result_link_selector: "a[".into(),
            ..ScraperConfig::default()
        };
        assert!(matches!(
            ResultsPageParser::new(&config),
            Err(ScrapeError::Selector(_))
        ));
    }
}
