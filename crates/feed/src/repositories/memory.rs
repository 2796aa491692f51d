use std::path::Path;

use tokio::sync::RwLock;
use tracing::debug;

use procura_core::domain::dashboard::DashboardStats;
use procura_core::domain::market::Market;
use procura_core::domain::product::Product;

use super::{FeedError, VendorFeed};
use crate::document::{FeedDocument, FeedIndex};
use crate::fixtures;

/// Feed held entirely in memory, built from a feed document or the demo dataset.
#[derive(Default)]
pub struct InMemoryVendorFeed {
    index: RwLock<FeedIndex>,
}

impl InMemoryVendorFeed {
    pub fn from_document(document: FeedDocument) -> Result<Self, FeedError> {
        Ok(Self { index: RwLock::new(document.into_index()?) })
    }

    pub async fn open(path: &Path) -> Result<Self, FeedError> {
        let feed = Self::from_document(FeedDocument::load(path).await?)?;
        debug!(
            event_name = "feed.file.loaded",
            path = %path.display(),
            "vendor feed loaded from file"
        );
        Ok(feed)
    }

    pub fn demo() -> Result<Self, FeedError> {
        Self::from_document(fixtures::demo_document())
    }

    /// Swaps in a new document. The previous contents stay in place on error.
    pub async fn replace(&self, document: FeedDocument) -> Result<(), FeedError> {
        let next = document.into_index()?;
        let mut index = self.index.write().await;
        *index = next;
        Ok(())
    }
}

#[async_trait::async_trait]
impl VendorFeed for InMemoryVendorFeed {
    async fn products(&self) -> Result<Vec<Product>, FeedError> {
        let index = self.index.read().await;
        Ok(index.products.clone())
    }

    async fn market_for(&self, query: &str) -> Result<Market, FeedError> {
        let index = self.index.read().await;
        let market = index.market_for(query)?;
        debug!(
            event_name = "feed.market.resolved",
            query,
            vendors = market.len(),
            "resolved market for query"
        );
        Ok(market)
    }

    async fn dashboard(&self) -> Result<DashboardStats, FeedError> {
        let index = self.index.read().await;
        Ok(index.dashboard.clone())
    }
}
