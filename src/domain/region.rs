//! Supported AWS regions.
//!
//! The gateway serves a fixed set of ten regions. Region IDs double as
//! path parameters and persistence keys; the display names are the
//! `location` values the AWS Pricing API filters on.

use serde::Serialize;
use utoipa::ToSchema;

/// Region ID → Pricing API location name.
const AWS_REGIONS: [(&str, &str); 10] = [
    ("us-east-1", "US East (N. Virginia)"),
    ("us-east-2", "US East (Ohio)"),
    ("us-west-1", "US West (N. California)"),
    ("us-west-2", "US West (Oregon)"),
    ("eu-west-1", "EU (Ireland)"),
    ("eu-central-1", "EU (Frankfurt)"),
    ("ap-southeast-1", "Asia Pacific (Singapore)"),
    ("ap-southeast-2", "Asia Pacific (Sydney)"),
    ("ap-northeast-1", "Asia Pacific (Tokyo)"),
    ("sa-east-1", "South America (São Paulo)"),
];

/// A supported region as returned by `GET /api/regions`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegionInfo {
    /// Region ID, e.g. `us-east-1`.
    pub id: &'static str,
    /// Human-readable region name, e.g. `US East (N. Virginia)`.
    pub name: &'static str,
}

/// Returns all supported regions in declaration order.
#[must_use]
pub fn all_regions() -> Vec<RegionInfo> {
    AWS_REGIONS
        .iter()
        .map(|&(id, name)| RegionInfo { id, name })
        .collect()
}

/// Returns the display name for a region ID, if supported.
#[must_use]
pub fn region_name(region_id: &str) -> Option<&'static str> {
    AWS_REGIONS
        .iter()
        .find(|&&(id, _)| id == region_id)
        .map(|&(_, name)| name)
}

/// Returns `true` if the region ID is one of the supported regions.
#[must_use]
pub fn is_valid_region(region_id: &str) -> bool {
    region_name(region_id).is_some()
}

/// Returns the IDs of all supported regions.
#[must_use]
pub fn all_region_ids() -> Vec<&'static str> {
    AWS_REGIONS.iter().map(|&(id, _)| id).collect()
}
