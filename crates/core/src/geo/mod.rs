pub mod aggregate;
pub mod color;
pub mod resolver;

pub use aggregate::{
    CountryAggregate, CountryPolygon, CountryShape, GeoAggregator, GeoView, TopCountry,
    DEFAULT_TOP_COUNTRIES,
};
pub use color::{color_for_spend, Rgb, SpendColor, SpendColorScale};
pub use resolver::{AliasTableError, CountryAlias, CountryResolver};
