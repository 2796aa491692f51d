pub mod advisory;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod geo;
pub mod pipeline;

pub use advisory::{RecommendationEngine, RecommendationResult, SavingsRecommendationEngine};
pub use catalog::Catalog;
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::dashboard::{DashboardStats, NetworkStatus, RiskAlert};
pub use domain::market::Market;
pub use domain::product::{Product, ProductId};
pub use domain::vendor::{InternalHistory, RiskAssessment, RiskLevel, Source, Vendor, VendorId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use geo::{CountryPolygon, CountryResolver, GeoAggregator, GeoView, SpendColorScale};
pub use pipeline::{
    compare::{compare, CompareError, Comparison, ComparisonRow},
    filter::FilterCriteria,
    DecisionPipeline, PipelineRuntime, Shortlist, StandardPipeline,
};
