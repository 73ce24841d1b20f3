use futures::stream::{self, StreamExt};

use crate::analyzer::{PageAnalysis, PageAnalyzer, PageText};
use crate::client::PageFetcher;
use crate::error::{Result, ScrapeError};
use crate::{query_terms, MaxResults, PageFailure, ResultLink, WordCount, WordFrequencyMap};

pub const TOP_WORDS: usize = 10;
pub const SUMMARY_SENTENCES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedResult {
    pub top_words: Vec<WordCount>,
    pub summary: String,
    pub pages_analyzed: usize,
    pub failures: Vec<PageFailure>,
}

/// Sums counts per key. Order of the arguments never changes the result.
pub fn merge_frequency_maps(mut a: WordFrequencyMap, b: &WordFrequencyMap) -> WordFrequencyMap {
    for (word, count) in b {
        if *count > 0 {
            *a.entry(word.clone()).or_insert(0) += count;
        }
    }
    a
}

/// Highest counts first; equal counts are ordered alphabetically.
pub fn top_words(words: &WordFrequencyMap, limit: usize) -> Vec<WordCount> {
    let mut ranked: Vec<(&String, &u64)> = words.iter().collect();
    ranked.sort_by(|(wa, ca), (wb, cb)| cb.cmp(ca).then_with(|| wa.cmp(wb)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(word, count)| WordCount {
            word: word.clone(),
            count: *count,
        })
        .collect()
}

/// Fetches and analyses result pages concurrently, then merges them.
pub struct FanoutAggregator<'a, F: PageFetcher> {
    fetcher: &'a F,
    analyzer: PageAnalyzer,
}

impl<'a, F: PageFetcher> FanoutAggregator<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self::with_analyzer(fetcher, PageAnalyzer::default())
    }

    pub fn with_analyzer(fetcher: &'a F, analyzer: PageAnalyzer) -> Self {
        Self { fetcher, analyzer }
    }

    pub async fn run(
        &self,
        query: &str,
        max_results: MaxResults,
        links: Option<&[ResultLink]>,
    ) -> AggregatedResult {
        let selected: Vec<ResultLink> = links
            .unwrap_or_default()
            .iter()
            .take(max_results.get())
            .cloned()
            .collect();
        if selected.is_empty() {
            tracing::info!(query, "no result links to analyse");
            return AggregatedResult::default();
        }

        let terms = query_terms(query);
        let in_flight = selected.len();
        tracing::info!(query, pages = in_flight, "analysing result pages");

        // Each task owns its link and terms so the batch future stays Send.
        let tasks: Vec<_> = selected
            .into_iter()
            .map(move |link| self.analyze_link(link, terms.clone()))
            .collect();

        // Completion order, not submission order.
        let outcomes: Vec<(ResultLink, Result<PageAnalysis>)> = stream::iter(tasks)
            .buffer_unordered(in_flight)
            .collect()
            .await;

        let mut words = WordFrequencyMap::new();
        let mut sentences = Vec::new();
        let mut result = AggregatedResult::default();

        for (link, outcome) in outcomes {
            match outcome {
                Ok(analysis) => {
                    words = merge_frequency_maps(words, &analysis.words);
                    sentences.extend(analysis.sentences);
                    result.pages_analyzed += 1;
                }
                Err(e) => {
                    tracing::warn!(rank = link.rank, url = ?link.url, error = %e, "skipping result page");
                    result.failures.push(PageFailure {
                        rank: link.rank,
                        url: link.url,
                        error: e.to_string(),
                    });
                }
            }
        }

        result.top_words = top_words(&words, TOP_WORDS);
        result.summary = sentences
            .into_iter()
            .take(SUMMARY_SENTENCES)
            .collect::<Vec<_>>()
            .join(" ");

        tracing::info!(
            query,
            analysed = result.pages_analyzed,
            failed = result.failures.len(),
            distinct_words = words.len(),
            "aggregation finished"
        );
        result
    }

    async fn analyze_link(
        &self,
        link: ResultLink,
        terms: Vec<String>,
    ) -> (ResultLink, Result<PageAnalysis>) {
        let outcome = self.fetch_and_analyze(&link, terms).await;
        (link, outcome)
    }

    async fn fetch_and_analyze(&self, link: &ResultLink, terms: Vec<String>) -> Result<PageAnalysis> {
        let url = link
            .url
            .as_deref()
            .ok_or(ScrapeError::MissingHref { rank: link.rank })?;
        let html = self.fetcher.fetch_page(url).await?;

        let analyzer = self.analyzer;
        tokio::task::spawn_blocking(move || analyzer.analyze(&PageText::from_html(&html), &terms))
            .await
            .map_err(|e| ScrapeError::Task(e.to_string()))
    }
}
