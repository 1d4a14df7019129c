//! Static catalogs: instance hardware specs, reserved-term discount
//! table, and the instance types the poller tracks.
//!
//! These tables are product data, not live pricing. The savings
//! calculator and the spec/terms endpoints read them directly.

use serde::Serialize;
use utoipa::ToSchema;

/// Instance types the spot price poller records history for.
pub const COMMON_INSTANCE_TYPES: [&str; 15] = [
    "t2.micro",
    "t2.small",
    "t2.medium",
    "t3.micro",
    "t3.small",
    "t3.medium",
    "m5.large",
    "m5.xlarge",
    "m5.2xlarge",
    "c5.large",
    "c5.xlarge",
    "c5.2xlarge",
    "r5.large",
    "r5.xlarge",
    "r5.2xlarge",
];

/// Hardware details for one instance type.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstanceSpecs {
    /// Processor family or model.
    #[serde(rename = "processorInfo")]
    pub processor_info: &'static str,
    /// Peak network bandwidth.
    #[serde(rename = "maxBandwidth")]
    pub max_bandwidth: &'static str,
    /// Storage class, e.g. `EBS-Only`.
    pub ebs: &'static str,
    /// Network performance class.
    #[serde(rename = "networkPerformance")]
    pub network_performance: &'static str,
    /// Peak EBS bandwidth.
    #[serde(rename = "maxEbsBandwidth")]
    pub max_ebs_bandwidth: &'static str,
    /// Sustained or burst clock speed.
    #[serde(rename = "clockSpeed")]
    pub clock_speed: &'static str,
    /// Whether the type is burstable (T family).
    #[serde(rename = "burstablePerformance")]
    pub burstable_performance: bool,
    /// Whether EBS bandwidth is dedicated.
    #[serde(rename = "dedicatedEbsBandwidth")]
    pub dedicated_ebs_bandwidth: bool,
}

/// Returns the spec sheet for an instance type, if catalogued.
#[must_use]
pub fn instance_specs(instance_type: &str) -> Option<InstanceSpecs> {
    let specs = match instance_type {
        "t2.micro" => InstanceSpecs {
            processor_info: "Intel Xeon Family",
            max_bandwidth: "Low to Moderate",
            ebs: "EBS-Only",
            network_performance: "Low to Moderate",
            max_ebs_bandwidth: "Moderate",
            clock_speed: "Up to 3.3 GHz",
            burstable_performance: true,
            dedicated_ebs_bandwidth: false,
        },
        "t3.micro" => InstanceSpecs {
            processor_info: "Intel Xeon Platinum 8259CL",
            max_bandwidth: "5 Gbps",
            ebs: "EBS-Only",
            network_performance: "Up to 5 Gigabit",
            max_ebs_bandwidth: "2,085 Mbps",
            clock_speed: "2.5 GHz",
            burstable_performance: true,
            dedicated_ebs_bandwidth: false,
        },
        "m5.large" => InstanceSpecs {
            processor_info: "Intel Xeon Platinum 8175M",
            max_bandwidth: "10 Gbps",
            ebs: "EBS-Only",
            network_performance: "Up to 10 Gigabit",
            max_ebs_bandwidth: "4,750 Mbps",
            clock_speed: "3.1 GHz",
            burstable_performance: false,
            dedicated_ebs_bandwidth: true,
        },
        "c5.large" => InstanceSpecs {
            processor_info: "Intel Xeon Platinum 8124M",
            max_bandwidth: "10 Gbps",
            ebs: "EBS-Only",
            network_performance: "Up to 10 Gigabit",
            max_ebs_bandwidth: "4,750 Mbps",
            clock_speed: "3.4 GHz",
            burstable_performance: false,
            dedicated_ebs_bandwidth: true,
        },
        "r5.large" => InstanceSpecs {
            processor_info: "Intel Xeon Platinum 8175M",
            max_bandwidth: "10 Gbps",
            ebs: "EBS-Only",
            network_performance: "Up to 10 Gigabit",
            max_ebs_bandwidth: "4,750 Mbps",
            clock_speed: "3.1 GHz",
            burstable_performance: false,
            dedicated_ebs_bandwidth: true,
        },
        _ => return None,
    };
    Some(specs)
}

/// One reserved term/payment combination.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservedTermInfo {
    /// Term length, e.g. `1 year`.
    pub term: &'static str,
    /// Payment option, e.g. `No Upfront`.
    pub payment: &'static str,
    /// Typical discount vs on-demand, as a fraction.
    pub discount: f64,
}

/// Payment options available within one term length.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservedTermOptions {
    /// No money down, hourly rate only.
    pub no_upfront: ReservedTermInfo,
    /// Partial upfront payment plus a reduced hourly rate.
    pub partial_upfront: ReservedTermInfo,
    /// Full upfront payment, zero hourly rate.
    pub all_upfront: ReservedTermInfo,
}

/// The full reserved-instance discount table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservedTerms {
    /// One-year commitments.
    #[serde(rename = "1yr")]
    pub one_year: ReservedTermOptions,
    /// Three-year commitments.
    #[serde(rename = "3yr")]
    pub three_year: ReservedTermOptions,
}

/// Returns the static reserved-instance discount table.
#[must_use]
pub fn reserved_terms() -> ReservedTerms {
    ReservedTerms {
        one_year: ReservedTermOptions {
            no_upfront: ReservedTermInfo {
                term: "1 year",
                payment: "No Upfront",
                discount: 0.25,
            },
            partial_upfront: ReservedTermInfo {
                term: "1 year",
                payment: "Partial Upfront",
                discount: 0.35,
            },
            all_upfront: ReservedTermInfo {
                term: "1 year",
                payment: "All Upfront",
                discount: 0.40,
            },
        },
        three_year: ReservedTermOptions {
            no_upfront: ReservedTermInfo {
                term: "3 year",
                payment: "No Upfront",
                discount: 0.45,
            },
            partial_upfront: ReservedTermInfo {
                term: "3 year",
                payment: "Partial Upfront",
                discount: 0.55,
            },
            all_upfront: ReservedTermInfo {
                term: "3 year",
                payment: "All Upfront",
                discount: 0.60,
            },
        },
    }
}
