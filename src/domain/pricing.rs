//! Pricing snapshot types shared by the cache, the provider and the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Operating system dimension of a price. Serialized exactly as the
/// upstream APIs and the persistence layer spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum OperatingSystem {
    /// Linux/UNIX pricing.
    Linux,
    /// Windows pricing.
    Windows,
}

impl OperatingSystem {
    /// Both supported operating systems, in merge order.
    pub const ALL: [Self; 2] = [Self::Linux, Self::Windows];

    /// The `operatingSystem` value used by the Pricing API.
    #[must_use]
    pub const fn pricing_api_name(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
        }
    }

    /// The `ProductDescriptions` value used by `DescribeSpotPriceHistory`.
    #[must_use]
    pub const fn spot_product_description(self) -> &'static str {
        match self {
            Self::Linux => "Linux/UNIX",
            Self::Windows => "Windows",
        }
    }
}

impl std::fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.pricing_api_name())
    }
}

impl std::str::FromStr for OperatingSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Linux" => Ok(Self::Linux),
            "Windows" => Ok(Self::Windows),
            other => Err(format!("unsupported operating system: {other}")),
        }
    }
}

/// Kind of price a history point or alert refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PriceType {
    /// Pay-per-hour rate with no commitment.
    OnDemand,
    /// Discounted committed-term rate (1yr, No Upfront).
    Reserved,
    /// Market-driven interruptible rate.
    Spot,
}

impl PriceType {
    /// Stable string form used as a persistence key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnDemand => "onDemand",
            Self::Reserved => "reserved",
            Self::Spot => "spot",
        }
    }
}

impl std::fmt::Display for PriceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PriceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onDemand" => Ok(Self::OnDemand),
            "reserved" => Ok(Self::Reserved),
            "spot" => Ok(Self::Spot),
            other => Err(format!("unsupported price type: {other}")),
        }
    }
}

/// The most recent spot quote for one instance type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotQuote {
    /// Hourly spot price in USD.
    pub price: f64,
    /// When the quote was published.
    pub timestamp: DateTime<Utc>,
}

/// One instance type's merged pricing snapshot for a region/OS pair.
///
/// Ephemeral: rebuilt wholesale on every cache refresh, never persisted
/// as-is. Field names match the wire format consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InstancePricing {
    /// EC2 instance type, e.g. `t3.micro`.
    #[serde(rename = "instanceType")]
    pub instance_type: String,
    /// Number of virtual CPUs.
    #[serde(rename = "vCPU")]
    pub vcpu: u32,
    /// Memory in GiB.
    #[serde(rename = "memoryGiB")]
    pub memory_gib: f64,
    /// Network performance class, e.g. `Up to 5 Gigabit`.
    #[serde(rename = "networkPerformance")]
    pub network_performance: String,
    /// Operating system this price row applies to.
    pub os: OperatingSystem,
    /// On-demand hourly price in USD, when published.
    #[serde(rename = "onDemand")]
    pub on_demand: Option<f64>,
    /// Reserved hourly price (1yr, No Upfront) in USD, when published.
    pub reserved: Option<f64>,
    /// Current spot hourly price in USD, when a quote exists.
    pub spot: Option<f64>,
    /// Timestamp of the spot quote, when a quote exists.
    #[serde(rename = "spotLastUpdated")]
    pub spot_last_updated: Option<DateTime<Utc>>,
}

impl InstancePricing {
    /// Merges a spot quote into this row.
    pub fn with_spot(mut self, quote: Option<SpotQuote>) -> Self {
        self.spot = quote.map(|q| q.price);
        self.spot_last_updated = quote.map(|q| q.timestamp);
        self
    }

    /// Returns the price of the given kind, when present.
    #[must_use]
    pub fn price_of(&self, price_type: PriceType) -> Option<f64> {
        match price_type {
            PriceType::OnDemand => self.on_demand,
            PriceType::Reserved => self.reserved,
            PriceType::Spot => self.spot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_type_round_trips_through_persistence_key() {
        for pt in [PriceType::OnDemand, PriceType::Reserved, PriceType::Spot] {
            assert_eq!(pt.as_str().parse::<PriceType>(), Ok(pt));
        }
    }

    #[test]
    fn price_type_serializes_camel_case() {
        let json = serde_json::to_string(&PriceType::OnDemand).unwrap_or_default();
        assert_eq!(json, "\"onDemand\"");
    }

    #[test]
    fn spot_merge_fills_both_fields() {
        let row = InstancePricing {
            instance_type: "t3.micro".to_string(),
            vcpu: 2,
            memory_gib: 1.0,
            network_performance: "Up to 5 Gigabit".to_string(),
            os: OperatingSystem::Linux,
            on_demand: Some(0.0104),
            reserved: Some(0.0065),
            spot: None,
            spot_last_updated: None,
        };
        let quote = SpotQuote {
            price: 0.0031,
            timestamp: Utc::now(),
        };
        let merged = row.with_spot(Some(quote));
        assert_eq!(merged.spot, Some(0.0031));
        assert!(merged.spot_last_updated.is_some());
        assert_eq!(merged.price_of(PriceType::Spot), Some(0.0031));
    }

    #[test]
    fn instance_pricing_uses_dashboard_field_names() {
        let row = InstancePricing {
            instance_type: "m5.large".to_string(),
            vcpu: 2,
            memory_gib: 8.0,
            network_performance: "Up to 10 Gigabit".to_string(),
            os: OperatingSystem::Windows,
            on_demand: Some(0.188),
            reserved: None,
            spot: None,
            spot_last_updated: None,
        };
        let value = serde_json::to_value(&row).unwrap_or_default();
        assert_eq!(value.get("instanceType").and_then(|v| v.as_str()), Some("m5.large"));
        assert_eq!(value.get("vCPU").and_then(|v| v.as_u64()), Some(2));
        assert_eq!(value.get("memoryGiB").and_then(|v| v.as_f64()), Some(8.0));
        assert!(value.get("spotLastUpdated").is_some_and(|v| v.is_null()));
        assert_eq!(value.get("os").and_then(|v| v.as_str()), Some("Windows"));
    }
}
