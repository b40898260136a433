//! Fans one search query out to every configured source.
//!
//! A source that errors or misses its deadline is logged and contributes no
//! listings; it never fails the whole search.

use std::time::Duration;

use futures::stream::{self, StreamExt};

use fomos_core::RawProduct;

use crate::error::ScraperError;
use crate::extractor::SourceExtractor;

#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Maximum number of sources queried at once.
    pub max_concurrent_sources: usize,
    /// Deadline for a single source's fetch and parse.
    pub source_timeout: Duration,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            max_concurrent_sources: 3,
            source_timeout: Duration::from_secs(45),
        }
    }
}

/// Listings from every source that answered, plus the names of those that did not.
#[derive(Debug, Default)]
pub struct AggregateReport {
    pub products: Vec<RawProduct>,
    pub failed_sources: Vec<String>,
}

/// Runs `query` against every extractor and concatenates the results.
///
/// Output is grouped by source in `extractors` order, and each source's
/// listings keep their page order.
pub async fn aggregate(
    query: &str,
    extractors: &[Box<dyn SourceExtractor>],
    options: &AggregateOptions,
) -> Vec<RawProduct> {
    aggregate_with_report(query, extractors, options)
        .await
        .products
}

/// Like [`aggregate`], but also reports which sources failed.
pub async fn aggregate_with_report(
    query: &str,
    extractors: &[Box<dyn SourceExtractor>],
    options: &AggregateOptions,
) -> AggregateReport {
    // Built eagerly: a borrowing closure inside the stream makes this future non-`Send`.
    let pending: Vec<_> = extractors
        .iter()
        .map(|extractor| run_source(extractor.as_ref(), query, options.source_timeout))
        .collect();
    let outcomes: Vec<(&str, Result<Vec<RawProduct>, ScraperError>)> = stream::iter(pending)
        .buffered(options.max_concurrent_sources.max(1))
        .collect()
        .await;

    let mut report = AggregateReport::default();
    for (source, outcome) in outcomes {
        match outcome {
            Ok(products) => {
                tracing::debug!(source, count = products.len(), "source returned listings");
                report.products.extend(products);
            }
            Err(e) => {
                tracing::warn!(source, error = %e, "source failed, skipping");
                report.failed_sources.push(source.to_owned());
            }
        }
    }

    tracing::info!(
        query,
        total = report.products.len(),
        failed = report.failed_sources.len(),
        "aggregation complete"
    );
    report
}

async fn run_source<'a>(
    extractor: &'a dyn SourceExtractor,
    query: &str,
    timeout: Duration,
) -> (&'a str, Result<Vec<RawProduct>, ScraperError>) {
    (extractor.name(), extract_within(extractor, query, timeout).await)
}

async fn extract_within(
    extractor: &dyn SourceExtractor,
    query: &str,
    timeout: Duration,
) -> Result<Vec<RawProduct>, ScraperError> {
    tokio::time::timeout(timeout, extractor.extract(query))
        .await
        .map_err(|_| ScraperError::Timeout {
            source_name: extractor.name().to_owned(),
            timeout,
        })?
}
