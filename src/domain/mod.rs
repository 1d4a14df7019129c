//! Core domain types: regions, pricing snapshots, static catalogs and
//! the per-region TTL cache.

pub mod cache;
pub mod catalog;
pub mod pricing;
pub mod region;

pub use cache::RegionCache;
pub use pricing::{InstancePricing, OperatingSystem, PriceType, SpotQuote};
pub use region::{RegionInfo, all_regions, is_valid_region, region_name};
