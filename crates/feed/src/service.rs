use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use procura_core::advisory::RecommendationResult;
use procura_core::catalog::Catalog;
use procura_core::config::AppConfig;
use procura_core::domain::dashboard::DashboardStats;
use procura_core::domain::product::Product;
use procura_core::domain::vendor::{Vendor, VendorId};
use procura_core::errors::ApplicationError;
use procura_core::geo::{CountryResolver, GeoAggregator, GeoView};
use procura_core::pipeline::compare::{compare, Comparison};
use procura_core::pipeline::filter::FilterCriteria;
use procura_core::pipeline::{DecisionPipeline, StandardPipeline};

use crate::geography::{DisabledGeography, FallbackGeography, GeographySource};
use crate::repositories::{InMemoryVendorFeed, VendorFeed};

pub const DEFAULT_BASIS_QUANTITY: u32 = 500;

/// Buyer cost assumptions for the savings analysis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostInputs {
    pub quantity: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeographyMode {
    /// Fetch polygons from the configured mirrors.
    Remote,
    /// Serve geographic views without polygons.
    Disabled,
}

/// Entry point for the buyer-facing operations. Every operation resolves the
/// market for the query first; filters never reach the advisory or geo views.
pub struct ProcurementService {
    feed: Arc<dyn VendorFeed>,
    geography: Arc<dyn GeographySource>,
    pipeline: StandardPipeline,
    default_quantity: u32,
}

impl ProcurementService {
    pub fn new(
        feed: Arc<dyn VendorFeed>,
        geography: Arc<dyn GeographySource>,
        pipeline: StandardPipeline,
        default_quantity: u32,
    ) -> Self {
        Self { feed, geography, pipeline, default_quantity }
    }

    pub async fn from_config(
        config: &AppConfig,
        mode: GeographyMode,
    ) -> Result<Self, ApplicationError> {
        let feed: Arc<dyn VendorFeed> = match &config.feed.path {
            Some(path) => Arc::new(InMemoryVendorFeed::open(path).await?),
            None => Arc::new(InMemoryVendorFeed::demo()?),
        };

        let resolver = match &config.geography.alias_table_path {
            Some(path) => CountryResolver::load(path).map_err(|error| {
                ApplicationError::Configuration(format!("geography.alias_table_path: {error}"))
            })?,
            None => CountryResolver::builtin(),
        };
        let aggregator =
            GeoAggregator::new(resolver).with_top_countries(config.analysis.top_countries);

        let geography: Arc<dyn GeographySource> = match mode {
            GeographyMode::Remote => Arc::new(
                FallbackGeography::http(
                    &config.geography.primary_url,
                    &config.geography.fallback_url,
                    Duration::from_secs(config.geography.timeout_secs),
                )
                .map_err(|error| ApplicationError::Integration(error.to_string()))?,
            ),
            GeographyMode::Disabled => Arc::new(DisabledGeography),
        };

        let feed_label = config
            .feed
            .path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "demo".to_string());
        info!(
            event_name = "service.procurement.ready",
            feed = %feed_label,
            geography = ?mode,
            "procurement service ready"
        );

        Ok(Self::new(
            feed,
            geography,
            StandardPipeline::with_geo_aggregator(aggregator),
            config.analysis.default_quantity,
        ))
    }

    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApplicationError> {
        let catalog = Catalog::new(self.feed.products().await?);
        Ok(catalog.search(query).into_iter().cloned().collect())
    }

    /// Filtered and ranked candidates for the query.
    pub async fn get_vendors(
        &self,
        query: &str,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Vendor>, ApplicationError> {
        let market = self.feed.market_for(query).await?;
        Ok(self.pipeline.shortlist(&market, criteria).to_owned_vendors())
    }

    /// Savings recommendation over the unfiltered market. A missing or zero
    /// quantity falls back to the configured basis quantity.
    pub async fn get_ai_analysis(
        &self,
        query: &str,
        inputs: CostInputs,
    ) -> Result<Option<RecommendationResult>, ApplicationError> {
        let market = self.feed.market_for(query).await?;
        Ok(self.pipeline.advise(&market, self.basis_quantity(inputs.quantity)))
    }

    pub async fn get_dashboard(&self) -> Result<DashboardStats, ApplicationError> {
        Ok(self.feed.dashboard().await?)
    }

    /// Choropleth view of the unfiltered market. An unreachable geography source
    /// only removes the polygons; top countries are still computed.
    pub async fn geo_view(&self, query: &str) -> Result<GeoView, ApplicationError> {
        let market = self.feed.market_for(query).await?;
        let polygons = match self.geography.fetch_polygons().await {
            Ok(polygons) => polygons,
            Err(error) => {
                warn!(
                    event_name = "geo.fetch.unavailable",
                    error = %error,
                    "country polygons unavailable; serving top countries only"
                );
                Vec::new()
            }
        };

        Ok(self.pipeline.map(&market, &polygons))
    }

    pub async fn compare(
        &self,
        query: &str,
        vendor_ids: &[VendorId],
        quantity: Option<u32>,
    ) -> Result<Comparison, ApplicationError> {
        let market = self.feed.market_for(query).await?;
        Ok(compare(&market, vendor_ids, self.basis_quantity(quantity))?)
    }

    fn basis_quantity(&self, requested: Option<u32>) -> u32 {
        requested.filter(|quantity| *quantity > 0).unwrap_or(self.default_quantity)
    }
}
