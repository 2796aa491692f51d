use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use procura_core::domain::dashboard::DashboardStats;
use procura_core::domain::market::Market;
use procura_core::domain::product::Product;
use procura_core::domain::vendor::{InternalHistory, RiskAssessment, Source, Vendor, VendorId};
use procura_core::pipeline::scoring::{completeness_score, CompletenessSignals};

use crate::repositories::FeedError;

/// On-disk vendor feed: `{ products, vendors, dashboard, queries }`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedDocument {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub vendors: Vec<VendorRecord>,
    #[serde(default)]
    pub dashboard: DashboardStats,
    /// Keyed by stored query text. Keys are normalized when the feed is indexed.
    #[serde(default)]
    pub queries: BTreeMap<String, QueryRecord>,
}

/// Vendor as it appears in a feed file. Unlike [`Vendor`], the suitability
/// score may be missing and is then derived from data completeness.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRecord {
    pub id: VendorId,
    pub name: String,
    pub source: Source,
    #[serde(default)]
    pub is_current_partner: bool,
    #[serde(default)]
    pub is_preferred: bool,
    #[serde(default)]
    pub is_best_value: bool,
    #[serde(default)]
    pub is_fastest: bool,
    pub unit_price: Decimal,
    #[serde(default)]
    pub total_est_cost: Decimal,
    #[serde(default)]
    pub available_qty: u64,
    #[serde(default, alias = "total_spend")]
    pub total_spend: Option<Decimal>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub lead_time: String,
    #[serde(default)]
    pub shelf_life: String,
    #[serde(default)]
    pub packaging: String,
    #[serde(default)]
    pub storage: String,
    #[serde(default)]
    pub locking: String,
    #[serde(default, alias = "suitability_score")]
    pub suitability_score: Option<u8>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub internal_history: Option<InternalHistory>,
    #[serde(default)]
    pub risk_assessment: Option<RiskAssessment>,
    #[serde(default)]
    pub website: Option<String>,
}

impl VendorRecord {
    pub fn completeness_signals(&self) -> CompletenessSignals {
        CompletenessSignals {
            has_price: self.unit_price > Decimal::ZERO,
            has_certifications: !self.certifications.is_empty(),
            has_shelf_life_or_storage: !self.shelf_life.trim().is_empty()
                || !self.storage.trim().is_empty(),
            has_packaging: !self.packaging.trim().is_empty(),
            has_locking: !self.locking.trim().is_empty(),
        }
    }

    pub fn into_vendor(self) -> Vendor {
        let suitability_score = self
            .suitability_score
            .unwrap_or_else(|| completeness_score(&self.completeness_signals()));

        Vendor {
            id: self.id,
            name: self.name,
            source: self.source,
            is_current_partner: self.is_current_partner,
            is_preferred: self.is_preferred,
            is_best_value: self.is_best_value,
            is_fastest: self.is_fastest,
            unit_price: self.unit_price,
            total_est_cost: self.total_est_cost,
            available_qty: self.available_qty,
            total_spend: self.total_spend,
            region: self.region,
            country: self.country,
            lat: self.lat,
            lng: self.lng,
            lead_time: self.lead_time,
            shelf_life: self.shelf_life,
            packaging: self.packaging,
            storage: self.storage,
            locking: self.locking,
            suitability_score,
            certifications: self.certifications,
            internal_history: self.internal_history,
            risk_assessment: self.risk_assessment,
            website: self.website,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRecord {
    #[serde(alias = "query_id")]
    pub query_id: String,
    #[serde(alias = "query_text")]
    pub query_text: String,
    #[serde(alias = "last_updated")]
    pub last_updated: DateTime<Utc>,
    #[serde(default, alias = "vendor_ids")]
    pub vendor_ids: Vec<VendorId>,
}

impl FeedDocument {
    pub fn from_json_str(raw: &str) -> Result<Self, FeedError> {
        serde_json::from_str(raw).map_err(FeedError::Parse)
    }

    pub async fn load(path: &Path) -> Result<Self, FeedError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FeedError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw)
    }

    /// Validates the document and splits it into the indexed pieces a feed serves.
    pub fn into_index(self) -> Result<FeedIndex, FeedError> {
        let vendors = self.vendors.into_iter().map(VendorRecord::into_vendor).collect();
        let market = Market::new(vendors)?;

        let mut queries = BTreeMap::new();
        for (key, record) in self.queries {
            if let Some(missing) = record.vendor_ids.iter().find(|id| market.find(**id).is_none()) {
                return Err(FeedError::Invalid(format!(
                    "stored query `{key}` references unknown vendor {missing}"
                )));
            }
            let normalized = normalize_query(&key);
            if normalized.is_empty() {
                return Err(FeedError::Invalid("stored query keys must not be blank".to_string()));
            }
            if queries.insert(normalized.clone(), record).is_some() {
                return Err(FeedError::Invalid(format!(
                    "stored query `{normalized}` appears more than once"
                )));
            }
        }

        Ok(FeedIndex { products: self.products, market, dashboard: self.dashboard, queries })
    }
}

/// Validated feed contents. `market` holds every vendor in the feed.
#[derive(Clone, Debug, Default)]
pub struct FeedIndex {
    pub products: Vec<Product>,
    pub market: Market,
    pub dashboard: DashboardStats,
    pub queries: BTreeMap<String, QueryRecord>,
}

impl FeedIndex {
    /// Which stored query, if any, a buyer query resolves to.
    pub fn resolve_query(&self, query: &str) -> QueryResolution<'_> {
        let needle = normalize_query(query);
        if needle.is_empty() {
            return QueryResolution::NoMatch;
        }
        if self.queries.is_empty() {
            return QueryResolution::WholeFeed;
        }

        if let Some(record) = self.queries.get(&needle) {
            return QueryResolution::Stored(record);
        }

        self.queries
            .iter()
            .find(|(stored, _)| stored.contains(&needle) || needle.contains(stored.as_str()))
            .map(|(_, record)| QueryResolution::Stored(record))
            .unwrap_or(QueryResolution::NoMatch)
    }

    pub fn market_for(&self, query: &str) -> Result<Market, FeedError> {
        match self.resolve_query(query) {
            QueryResolution::WholeFeed => Ok(self.market.clone()),
            QueryResolution::NoMatch => Ok(Market::empty()),
            QueryResolution::Stored(record) => {
                let wanted = record.vendor_ids.iter().copied().collect::<HashSet<_>>();
                let vendors = self
                    .market
                    .iter()
                    .filter(|vendor| wanted.contains(&vendor.id))
                    .cloned()
                    .collect();
                Ok(Market::new(vendors)?)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryResolution<'a> {
    /// The feed stores no queries; every vendor is a candidate.
    WholeFeed,
    Stored(&'a QueryRecord),
    NoMatch,
}

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}
