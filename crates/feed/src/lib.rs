pub mod document;
pub mod fixtures;
pub mod geography;
pub mod repositories;
pub mod service;

pub use document::{FeedDocument, FeedIndex, QueryRecord, QueryResolution, VendorRecord};
pub use geography::{
    DisabledGeography, FallbackGeography, GeographyError, GeographySource, HttpGeographySource,
};
pub use repositories::{FeedError, InMemoryVendorFeed, VendorFeed};
pub use service::{CostInputs, GeographyMode, ProcurementService};
