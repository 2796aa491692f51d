pub mod compare;
pub mod filter;
pub mod rank;
pub mod scoring;

use serde::{Serialize, Serializer};

use crate::advisory::{RecommendationEngine, RecommendationResult, SavingsRecommendationEngine};
use crate::domain::market::Market;
use crate::domain::vendor::Vendor;
use crate::geo::{CountryPolygon, GeoAggregator, GeoView};

use self::{
    filter::{CriteriaFilterEngine, FilterCriteria, FilterEngine},
    rank::{RankEngine, SuitabilityRankEngine},
};

/// A filtered, possibly reordered view over vendors borrowed from a market.
///
/// There is no conversion back into a [`Market`]; market-wide engines cannot be
/// handed a shortlist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shortlist<'a> {
    vendors: Vec<&'a Vendor>,
}

impl<'a> Shortlist<'a> {
    pub fn from_refs(vendors: Vec<&'a Vendor>) -> Self {
        Self { vendors }
    }

    pub fn from_slice(vendors: &'a [Vendor]) -> Self {
        Self { vendors: vendors.iter().collect() }
    }

    pub fn into_refs(self) -> Vec<&'a Vendor> {
        self.vendors
    }

    pub fn vendors(&self) -> &[&'a Vendor] {
        &self.vendors
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Vendor> + '_ {
        self.vendors.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    pub fn to_owned_vendors(&self) -> Vec<Vendor> {
        self.vendors.iter().map(|vendor| (*vendor).clone()).collect()
    }
}

impl<'a> IntoIterator for Shortlist<'a> {
    type Item = &'a Vendor;
    type IntoIter = std::vec::IntoIter<&'a Vendor>;

    fn into_iter(self) -> Self::IntoIter {
        self.vendors.into_iter()
    }
}

impl Serialize for Shortlist<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.vendors.serialize(serializer)
    }
}

pub trait DecisionPipeline: Send + Sync {
    /// Filter then rank. The result borrows from `market`.
    fn shortlist<'a>(&self, market: &'a Market, criteria: &FilterCriteria) -> Shortlist<'a>;

    fn advise(&self, market: &Market, quantity: u32) -> Option<RecommendationResult>;

    fn map(&self, market: &Market, polygons: &[CountryPolygon]) -> GeoView;
}

pub struct PipelineRuntime<F, R, A> {
    filter_engine: F,
    rank_engine: R,
    recommendation_engine: A,
    geo_aggregator: GeoAggregator,
}

impl<F, R, A> PipelineRuntime<F, R, A> {
    pub fn new(
        filter_engine: F,
        rank_engine: R,
        recommendation_engine: A,
        geo_aggregator: GeoAggregator,
    ) -> Self {
        Self { filter_engine, rank_engine, recommendation_engine, geo_aggregator }
    }

    pub fn geo_aggregator(&self) -> &GeoAggregator {
        &self.geo_aggregator
    }
}

pub type StandardPipeline =
    PipelineRuntime<CriteriaFilterEngine, SuitabilityRankEngine, SavingsRecommendationEngine>;

impl StandardPipeline {
    pub fn with_geo_aggregator(geo_aggregator: GeoAggregator) -> Self {
        Self::new(
            CriteriaFilterEngine,
            SuitabilityRankEngine,
            SavingsRecommendationEngine,
            geo_aggregator,
        )
    }
}

impl Default for StandardPipeline {
    fn default() -> Self {
        Self::with_geo_aggregator(GeoAggregator::default())
    }
}

impl<F, R, A> DecisionPipeline for PipelineRuntime<F, R, A>
where
    F: FilterEngine,
    R: RankEngine,
    A: RecommendationEngine,
{
    fn shortlist<'a>(&self, market: &'a Market, criteria: &FilterCriteria) -> Shortlist<'a> {
        let filtered = self.filter_engine.filter(market.vendors(), criteria);
        let matched = filtered.len();
        let ranked = self.rank_engine.rank(filtered);

        tracing::debug!(
            event_name = "pipeline.shortlist.computed",
            market_size = market.len(),
            matched,
            "vendor shortlist computed"
        );

        ranked
    }

    fn advise(&self, market: &Market, quantity: u32) -> Option<RecommendationResult> {
        self.recommendation_engine.recommend(market, quantity)
    }

    fn map(&self, market: &Market, polygons: &[CountryPolygon]) -> GeoView {
        self.geo_aggregator.aggregate(market, polygons)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        filter::{FilterCriteria, FilterEngine},
        rank::SuitabilityRankEngine,
        DecisionPipeline, PipelineRuntime, Shortlist, StandardPipeline,
    };
    use crate::{
        advisory::SavingsRecommendationEngine,
        domain::{
            fixtures::{in_country, partner, priced},
            market::Market,
            vendor::Vendor,
        },
        geo::{CountryPolygon, GeoAggregator},
    };

    fn market() -> Market {
        let mut best = priced(2, "BioChem Solutions Ltd", Decimal::new(850, 2));
        best.is_best_value = true;
        best.suitability_score = 95;

        let mut mid = priced(3, "Generic API Makers Inc.", Decimal::new(950, 2));
        mid.suitability_score = 89;

        let mut incumbent = partner(1, "Canada Health Imports", Decimal::new(1_280, 2), 210_000);
        incumbent.suitability_score = 86;
        incumbent.country = Some("Canada".to_string());
        incumbent.total_spend = Some(Decimal::new(210_000, 0));

        let mut regional = in_country(4, "India", 90_000);
        regional.unit_price = Decimal::new(1_100, 2);

        Market::new(vec![incumbent, best, mid, regional]).expect("valid market")
    }

    #[test]
    fn standard_pipeline_filters_then_ranks() {
        let market = market();
        let criteria = FilterCriteria {
            price_range: Some((Decimal::ZERO, Decimal::TEN)),
            ..FilterCriteria::default()
        };

        let shortlist = StandardPipeline::default().shortlist(&market, &criteria);
        let ids = shortlist.iter().map(|vendor| vendor.id.0).collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn advice_ignores_filters_and_sees_whole_market() {
        let market = market();
        let pipeline = StandardPipeline::default();
        let criteria = FilterCriteria {
            price_range: Some((Decimal::ZERO, Decimal::TEN)),
            ..FilterCriteria::default()
        };

        let shortlist = pipeline.shortlist(&market, &criteria);
        assert!(shortlist.iter().all(|vendor| !vendor.is_current_partner));

        let advice = pipeline.advise(&market, 500).expect("incumbent is in the market");
        assert_eq!(advice.savings_amount, Decimal::new(2_150, 0));
        assert_eq!(advice.savings_percent, 34);
    }

    #[test]
    fn map_uses_configured_aggregator() {
        let market = market();
        let pipeline = StandardPipeline::with_geo_aggregator(
            GeoAggregator::default().with_top_countries(1),
        );

        let view = pipeline.map(&market, &[CountryPolygon::named("Canada")]);
        assert_eq!(view.shapes.len(), 1);
        assert_eq!(view.top_countries.len(), 1);
        assert_eq!(view.top_countries[0].code, "CANADA");
    }

    #[test]
    fn runtime_accepts_custom_engines() {
        struct FirstOnly;

        impl FilterEngine for FirstOnly {
            fn filter<'a>(&self, vendors: &'a [Vendor], _criteria: &FilterCriteria) -> Shortlist<'a> {
                Shortlist::from_refs(vendors.iter().take(1).collect())
            }
        }

        let runtime = PipelineRuntime::new(
            FirstOnly,
            SuitabilityRankEngine,
            SavingsRecommendationEngine,
            GeoAggregator::default(),
        );

        let market = market();
        let shortlist = runtime.shortlist(&market, &FilterCriteria::default());
        assert_eq!(shortlist.len(), 1);
        assert_eq!(shortlist.to_owned_vendors()[0].name, "Canada Health Imports");
    }

    #[test]
    fn shortlist_serializes_as_vendor_array() {
        let market = market();
        let shortlist = Shortlist::from_slice(market.vendors());

        let json = serde_json::to_value(&shortlist).expect("serialize shortlist");
        assert_eq!(json.as_array().map(Vec::len), Some(4));
    }
}
