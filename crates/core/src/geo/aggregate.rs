use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::market::Market;
use crate::domain::vendor::Vendor;

use super::color::{SpendColor, SpendColorScale};
use super::resolver::CountryResolver;

pub const DEFAULT_TOP_COUNTRIES: usize = 8;

/// Property keys probed for a polygon's display name, in order.
const NAME_PROPERTIES: &[&str] = &["NAME", "NAME_LONG", "name", "NAME_EN"];

/// One country shape from the geography source. Geometry is carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryPolygon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub geometry: Value,
}

impl CountryPolygon {
    pub fn named(name: &str) -> Self {
        let mut properties = Map::new();
        properties.insert("name".to_string(), Value::String(name.to_string()));
        Self { id: None, properties, geometry: Value::Null }
    }

    pub fn display_name(&self) -> Option<&str> {
        NAME_PROPERTIES
            .iter()
            .filter_map(|key| self.properties.get(*key).and_then(Value::as_str))
            .find(|name| !name.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryAggregate {
    pub country_code: String,
    pub total_spend: Decimal,
    pub vendor_count: usize,
    pub vendors: Vec<Vendor>,
    pub color: Option<SpendColor>,
}

/// A polygon that resolved to a country with spend, ready for rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryShape {
    pub polygon: CountryPolygon,
    #[serde(flatten)]
    pub aggregate: CountryAggregate,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCountry {
    pub code: String,
    pub total_spend: Decimal,
    pub vendor_count: usize,
    pub color: Option<SpendColor>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoView {
    pub shapes: Vec<CountryShape>,
    pub top_countries: Vec<TopCountry>,
    pub max_spend: Decimal,
}

#[derive(Clone, Debug)]
pub struct GeoAggregator {
    resolver: CountryResolver,
    scale: SpendColorScale,
    top_countries: usize,
}

impl Default for GeoAggregator {
    fn default() -> Self {
        Self::new(CountryResolver::builtin())
    }
}

impl GeoAggregator {
    pub fn new(resolver: CountryResolver) -> Self {
        Self { resolver, scale: SpendColorScale::default(), top_countries: DEFAULT_TOP_COUNTRIES }
    }

    pub fn with_top_countries(mut self, top_countries: usize) -> Self {
        self.top_countries = top_countries;
        self
    }

    pub fn with_scale(mut self, scale: SpendColorScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn resolver(&self) -> &CountryResolver {
        &self.resolver
    }

    /// Groups vendors by lowercased country label in first-seen order.
    /// Vendors without a country are left out. Colors are assigned against the
    /// largest group spend.
    pub fn group(&self, market: &Market) -> Vec<CountryAggregate> {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<CountryAggregate> = Vec::new();

        for vendor in market {
            let Some(country) = vendor.country.as_deref() else {
                continue;
            };
            let key = country.to_lowercase();
            let index = *positions.entry(key.clone()).or_insert_with(|| {
                groups.push(CountryAggregate {
                    country_code: key,
                    total_spend: Decimal::ZERO,
                    vendor_count: 0,
                    vendors: Vec::new(),
                    color: None,
                });
                groups.len() - 1
            });

            let group = &mut groups[index];
            group.total_spend = group.total_spend.saturating_add(vendor.spend_contribution());
            group.vendor_count += 1;
            group.vendors.push(vendor.clone());
        }

        let max_spend = max_spend(&groups);
        for group in &mut groups {
            group.color = self.scale.color_for(group.total_spend, max_spend);
        }

        groups
    }

    /// Builds the choropleth view. Polygons that do not resolve to a country with
    /// non-zero spend are dropped; an empty polygon list still yields top countries.
    pub fn aggregate(&self, market: &Market, polygons: &[CountryPolygon]) -> GeoView {
        let groups = self.group(market);
        let max_spend = max_spend(&groups);
        let by_code: HashMap<&str, &CountryAggregate> =
            groups.iter().map(|group| (group.country_code.as_str(), group)).collect();

        let shapes = polygons
            .iter()
            .filter_map(|polygon| {
                let code = self.resolver.resolve(polygon.display_name()?)?;
                let group = by_code.get(code)?;
                if group.total_spend.is_zero() {
                    return None;
                }
                Some(CountryShape {
                    polygon: polygon.clone(),
                    aggregate: CountryAggregate {
                        country_code: code.to_string(),
                        ..(*group).clone()
                    },
                })
            })
            .collect::<Vec<_>>();

        let top_countries = self.top_countries(&groups);

        tracing::debug!(
            event_name = "geo.aggregate.computed",
            countries = groups.len(),
            polygons = polygons.len(),
            shapes = shapes.len(),
            max_spend = %max_spend,
            "geographic spend aggregated"
        );

        GeoView { shapes, top_countries, max_spend }
    }

    /// Countries ranked by spend, largest first. Zero-spend countries are left
    /// out rather than listed with no color, so every entry matches a colorable
    /// shape.
    fn top_countries(&self, groups: &[CountryAggregate]) -> Vec<TopCountry> {
        let mut ranked =
            groups.iter().filter(|group| !group.total_spend.is_zero()).collect::<Vec<_>>();
        ranked.sort_by(|left, right| right.total_spend.cmp(&left.total_spend));

        ranked
            .into_iter()
            .take(self.top_countries)
            .map(|group| TopCountry {
                code: group.country_code.to_uppercase(),
                total_spend: group.total_spend,
                vendor_count: group.vendor_count,
                color: group.color,
            })
            .collect()
    }
}

/// Largest group spend, floored at 1 so the color ramp never divides by zero.
fn max_spend(groups: &[CountryAggregate]) -> Decimal {
    groups.iter().map(|group| group.total_spend).max().unwrap_or_default().max(Decimal::ONE)
}
