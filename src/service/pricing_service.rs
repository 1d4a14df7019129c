//! Pricing service: serves per-region snapshots through the TTL cache.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{InstancePricing, OperatingSystem, RegionCache, is_valid_region};
use crate::error::ApiError;
use crate::pricing::PricingProvider;

/// Request-facing pricing reads. Owns the [`RegionCache`] and fills it
/// through the injected [`PricingProvider`] on miss or expiry.
#[derive(Debug)]
pub struct PricingService {
    provider: Arc<dyn PricingProvider>,
    cache: RegionCache,
}

impl PricingService {
    /// Creates a service whose cache entries stay fresh for `cache_ttl`.
    #[must_use]
    pub fn new(provider: Arc<dyn PricingProvider>, cache_ttl: Duration) -> Self {
        Self {
            provider,
            cache: RegionCache::new(cache_ttl),
        }
    }

    /// Returns a reference to the underlying provider.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn PricingProvider> {
        &self.provider
    }

    /// Returns the merged pricing snapshot for `region`, from cache when
    /// fresh, otherwise refetched through the provider.
    ///
    /// Concurrent misses for the same region share one upstream fetch:
    /// the fill runs under a per-region lock and waiters re-check the
    /// cache once they acquire it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRegion`] for unsupported regions and
    /// [`ApiError::Upstream`] when the refetch fails.
    pub async fn instances(&self, region: &str) -> Result<Vec<InstancePricing>, ApiError> {
        if !is_valid_region(region) {
            return Err(ApiError::InvalidRegion);
        }

        if let Some(data) = self.cache.get_fresh(region).await {
            return Ok(data);
        }

        let fill_lock = self.cache.fill_lock(region).await;
        let _guard = fill_lock.lock().await;

        // A concurrent fill may have completed while we waited.
        if let Some(data) = self.cache.get_fresh(region).await {
            return Ok(data);
        }

        let data = self.fetch_region(region).await?;
        self.cache.store(region, data.clone()).await;
        tracing::info!(region, instances = data.len(), "refreshed pricing cache");
        Ok(data)
    }

    /// Returns the current snapshot row for one instance type, or `None`
    /// when the upstream does not publish it.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::instances`] failures.
    pub async fn current_pricing(
        &self,
        region: &str,
        instance_type: &str,
        os: OperatingSystem,
    ) -> Result<Option<InstancePricing>, ApiError> {
        let instances = self.instances(region).await?;
        Ok(instances
            .into_iter()
            .find(|row| row.instance_type == instance_type && row.os == os))
    }

    /// Fetches and merges list and spot prices for every supported OS.
    async fn fetch_region(&self, region: &str) -> Result<Vec<InstancePricing>, ApiError> {
        let mut merged = Vec::new();
        for os in OperatingSystem::ALL {
            let list = self.provider.fetch_list_prices(region, os).await?;
            let spot = self.provider.fetch_spot_prices(region, os).await?;
            merged.extend(
                list.into_iter()
                    .map(|row| {
                        let quote = spot.get(&row.instance_type).copied();
                        row.with_spot(quote)
                    }),
            );
        }
        Ok(merged)
    }
}
