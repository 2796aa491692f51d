use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use procura_core::domain::dashboard::DashboardStats;
use procura_core::domain::market::Market;
use procura_core::domain::product::Product;
use procura_core::errors::{ApplicationError, DomainError};

pub mod memory;

pub use memory::InMemoryVendorFeed;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("could not read vendor feed `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse vendor feed: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("vendor feed is invalid: {0}")]
    Invalid(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<FeedError> for ApplicationError {
    fn from(value: FeedError) -> Self {
        match value {
            FeedError::Domain(error) => Self::Domain(error),
            other => Self::Feed(other.to_string()),
        }
    }
}

/// Read-only source of products, vendors and dashboard figures.
#[async_trait]
pub trait VendorFeed: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>, FeedError>;

    /// The unfiltered market for a buyer query. Unmatched queries yield an empty market.
    async fn market_for(&self, query: &str) -> Result<Market, FeedError>;

    async fn dashboard(&self) -> Result<DashboardStats, FeedError>;
}
