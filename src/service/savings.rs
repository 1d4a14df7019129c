//! Savings calculator over a static mock price table.
//!
//! The table is demonstration data, deliberately not wired to the live
//! region cache. Upfront reserved payments are amortized over 12 months
//! regardless of term length, a known simplification.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mock on-demand hourly rate in USD.
const MOCK_ON_DEMAND_HOURLY: f64 = 0.10;

/// Mock spot hourly rate in USD.
const MOCK_SPOT_HOURLY: f64 = 0.03;

/// Reserved term length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RiTerm {
    /// One-year commitment.
    #[serde(rename = "1yr")]
    OneYear,
    /// Three-year commitment.
    #[serde(rename = "3yr")]
    ThreeYear,
}

impl RiTerm {
    /// Stable string form used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneYear => "1yr",
            Self::ThreeYear => "3yr",
        }
    }
}

impl std::str::FromStr for RiTerm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1yr" => Ok(Self::OneYear),
            "3yr" => Ok(Self::ThreeYear),
            other => Err(format!("unsupported reserved term: {other}")),
        }
    }
}

/// Reserved payment option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiPayment {
    /// Hourly rate only, nothing down.
    NoUpfront,
    /// Reduced hourly rate plus a partial upfront payment.
    PartialUpfront,
    /// Zero hourly rate, everything upfront.
    AllUpfront,
}

impl RiPayment {
    /// Stable string form used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoUpfront => "no_upfront",
            Self::PartialUpfront => "partial_upfront",
            Self::AllUpfront => "all_upfront",
        }
    }
}

impl std::str::FromStr for RiPayment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_upfront" => Ok(Self::NoUpfront),
            "partial_upfront" => Ok(Self::PartialUpfront),
            "all_upfront" => Ok(Self::AllUpfront),
            other => Err(format!("unsupported payment option: {other}")),
        }
    }
}

/// Mock reserved pricing: (hourly rate, upfront payment) per term and
/// payment option.
const fn reserved_rate(term: RiTerm, payment: RiPayment) -> (f64, f64) {
    match (term, payment) {
        (RiTerm::OneYear, RiPayment::NoUpfront) => (0.07, 0.0),
        (RiTerm::OneYear, RiPayment::PartialUpfront) => (0.04, 100.0),
        (RiTerm::OneYear, RiPayment::AllUpfront) => (0.0, 700.0),
        (RiTerm::ThreeYear, RiPayment::NoUpfront) => (0.05, 0.0),
        (RiTerm::ThreeYear, RiPayment::PartialUpfront) => (0.03, 200.0),
        (RiTerm::ThreeYear, RiPayment::AllUpfront) => (0.0, 1500.0),
    }
}

/// Cost comparison across the three pricing models for a given number
/// of monthly hours.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SavingsBreakdown {
    /// On-demand hourly rate.
    #[serde(rename = "onDemandHourly")]
    pub on_demand_hourly: f64,
    /// On-demand cost over the given hours.
    #[serde(rename = "onDemandMonthly")]
    pub on_demand_monthly: f64,
    /// Reserved hourly rate for the selected term/payment.
    #[serde(rename = "reservedHourly")]
    pub reserved_hourly: f64,
    /// Reserved cost over the given hours, upfront amortized.
    #[serde(rename = "reservedMonthly")]
    pub reserved_monthly: f64,
    /// Spot hourly rate.
    #[serde(rename = "spotHourly")]
    pub spot_hourly: f64,
    /// Spot cost over the given hours.
    #[serde(rename = "spotMonthly")]
    pub spot_monthly: f64,
    /// On-demand monthly cost minus reserved monthly cost.
    #[serde(rename = "reservedSavings")]
    pub reserved_savings: f64,
    /// Reserved savings as a percentage of on-demand cost.
    #[serde(rename = "reservedSavingsPercentage")]
    pub reserved_savings_percentage: f64,
    /// On-demand monthly cost minus spot monthly cost.
    #[serde(rename = "spotSavings")]
    pub spot_savings: f64,
    /// Spot savings as a percentage of on-demand cost.
    #[serde(rename = "spotSavingsPercentage")]
    pub spot_savings_percentage: f64,
}

/// Computes the savings breakdown for `hours` of monthly usage under
/// the selected reserved term and payment option.
///
/// `hours` must be positive; callers validate this at the API boundary.
#[must_use]
pub fn calculate_savings(hours: f64, term: RiTerm, payment: RiPayment) -> SavingsBreakdown {
    let on_demand_hourly = MOCK_ON_DEMAND_HOURLY;
    let on_demand_monthly = on_demand_hourly * hours;

    let spot_hourly = MOCK_SPOT_HOURLY;
    let spot_monthly = spot_hourly * hours;

    let (reserved_hourly, upfront) = reserved_rate(term, payment);
    // Upfront amortized over 12 months regardless of term length.
    let reserved_monthly = reserved_hourly * hours + upfront / 12.0;

    let reserved_savings = on_demand_monthly - reserved_monthly;
    let spot_savings = on_demand_monthly - spot_monthly;

    SavingsBreakdown {
        on_demand_hourly,
        on_demand_monthly,
        reserved_hourly,
        reserved_monthly,
        spot_hourly,
        spot_monthly,
        reserved_savings,
        reserved_savings_percentage: reserved_savings / on_demand_monthly * 100.0,
        spot_savings,
        spot_savings_percentage: spot_savings / on_demand_monthly * 100.0,
    }
}
