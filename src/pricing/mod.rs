//! Pricing gateway: the [`PricingProvider`] seam and its AWS-backed
//! implementation.
//!
//! The trait exists so the cache, the history seeder and the poller can
//! be exercised against programmable fixtures; production wires in
//! [`aws::AwsPricingProvider`].

pub mod aws;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{InstancePricing, OperatingSystem, SpotQuote};
use crate::error::ApiError;

/// Upstream source of list prices and spot quotes.
#[async_trait]
pub trait PricingProvider: Send + Sync + std::fmt::Debug {
    /// Fetches On-Demand and Reserved (1yr, No Upfront) list prices for
    /// every instance type published in `region` for `os`. Spot fields
    /// of the returned rows are unset.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Upstream`] when the batch request fails;
    /// individually malformed records are skipped, not surfaced.
    async fn fetch_list_prices(
        &self,
        region: &str,
        os: OperatingSystem,
    ) -> Result<Vec<InstancePricing>, ApiError>;

    /// Fetches the most recent spot quote per instance type for
    /// `region`/`os`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Upstream`] when the request fails.
    async fn fetch_spot_prices(
        &self,
        region: &str,
        os: OperatingSystem,
    ) -> Result<HashMap<String, SpotQuote>, ApiError>;
}
