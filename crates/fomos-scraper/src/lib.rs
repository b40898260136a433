//! Network-facing half of the fomos pipeline.
//!
//! Site extractors turn storefront search pages into [`fomos_core::RawProduct`]s,
//! [`aggregate`] fans a query out to every configured source, and
//! [`enrich_all`] attaches image fingerprints and normalized titles so the
//! listings can be grouped across sites.

pub mod aggregate;
pub mod client;
pub mod enrich;
pub mod error;
pub mod extractor;
pub mod fingerprint;
pub mod sites;

mod rate_limit;

pub use aggregate::{aggregate, aggregate_with_report, AggregateOptions, AggregateReport};
pub use client::PageClient;
pub use enrich::{enrich_all, EnrichOptions};
pub use error::ScraperError;
pub use extractor::{build_extractors, SourceExtractor};
pub use fingerprint::{
    Fingerprint, Fingerprinter, ImageFingerprinter, RandomTokens, TokenSource, FALLBACK_PREFIX,
};
