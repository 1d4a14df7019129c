//! Price history queries with one-shot synthetic seeding.
//!
//! A series that has never been recorded is seeded once from the
//! current snapshot: one jittered daily point per present price kind,
//! reserved only every seventh day (reserved rates rarely move). The
//! seed is a display fallback, not historical truth.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::PricingService;
use crate::domain::{InstancePricing, OperatingSystem, PriceType, is_valid_region};
use crate::error::ApiError;
use crate::persistence::HistoryStore;
use crate::persistence::models::PriceHistoryPoint;

/// Maximum number of days a history query may span.
pub const MAX_HISTORY_DAYS: u32 = 90;

/// Relative jitter applied to synthetic seed prices.
const SEED_JITTER: f64 = 0.05;

/// Serves price history, seeding empty series on first read.
#[derive(Debug)]
pub struct HistoryService {
    store: Arc<dyn HistoryStore>,
    pricing: Arc<PricingService>,
    default_days: u32,
}

impl HistoryService {
    /// Creates a service over the given store and pricing source.
    /// `default_days` is the window used when a query names none.
    #[must_use]
    pub fn new(
        store: Arc<dyn HistoryStore>,
        pricing: Arc<PricingService>,
        default_days: u32,
    ) -> Self {
        Self {
            store,
            pricing,
            default_days,
        }
    }

    /// The history window used when a query names none.
    #[must_use]
    pub fn default_days(&self) -> u32 {
        self.default_days
    }

    /// Returns up to `days` days of history for the series, ascending by
    /// timestamp. An empty series is seeded synthetically first; an
    /// instance type the upstream does not publish yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRegion`] for unsupported regions, and
    /// propagates store and upstream failures.
    pub async fn price_history(
        &self,
        region: &str,
        instance_type: &str,
        os: OperatingSystem,
        days: u32,
    ) -> Result<Vec<PriceHistoryPoint>, ApiError> {
        if !is_valid_region(region) {
            return Err(ApiError::InvalidRegion);
        }
        let days = days.clamp(1, MAX_HISTORY_DAYS);
        let now = Utc::now();
        let since = now - Duration::days(i64::from(days));

        let existing = self.store.query(instance_type, region, os, since).await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        let Some(current) = self
            .pricing
            .current_pricing(region, instance_type, os)
            .await?
        else {
            return Ok(Vec::new());
        };

        let mut points = seed_points(&current, region, days, now);
        self.store.record_many(&points).await?;
        tracing::info!(
            region,
            instance_type,
            points = points.len(),
            "seeded synthetic price history"
        );

        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }
}

/// Generates `days` synthetic daily points per present price kind,
/// jittered ±5% around the current value. Reserved points are emitted
/// only every seventh day.
fn seed_points(
    current: &InstancePricing,
    region: &str,
    days: u32,
    now: DateTime<Utc>,
) -> Vec<PriceHistoryPoint> {
    let mut rng = rand::rng();
    let mut points = Vec::new();

    for i in 0..days {
        let timestamp = now - Duration::days(i64::from(i));

        for (price_type, price) in [
            (PriceType::OnDemand, current.on_demand),
            (PriceType::Spot, current.spot),
        ] {
            if let Some(price) = price {
                points.push(PriceHistoryPoint {
                    instance_type: current.instance_type.clone(),
                    region: region.to_string(),
                    os: current.os,
                    price_type,
                    price: jittered(price, &mut rng),
                    timestamp,
                });
            }
        }

        if i % 7 == 0
            && let Some(price) = current.reserved
        {
            points.push(PriceHistoryPoint {
                instance_type: current.instance_type.clone(),
                region: region.to_string(),
                os: current.os,
                price_type: PriceType::Reserved,
                price: jittered(price, &mut rng),
                timestamp,
            });
        }
    }

    points
}

fn jittered(price: f64, rng: &mut impl Rng) -> f64 {
    price * (1.0 + rng.random_range(-SEED_JITTER..=SEED_JITTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::memory::MemoryHistoryStore;
    use crate::pricing::{PricingProvider, testutil::MockPricingProvider};

    fn make_service(
        provider: &Arc<MockPricingProvider>,
    ) -> (HistoryService, Arc<MemoryHistoryStore>) {
        let store = Arc::new(MemoryHistoryStore::new());
        let provider_dyn: Arc<dyn PricingProvider> = Arc::clone(provider);
        let pricing = Arc::new(PricingService::new(
            provider_dyn,
            std::time::Duration::from_secs(600),
        ));
        let history_store: Arc<dyn HistoryStore> = Arc::clone(&store) as Arc<dyn HistoryStore>;
        (HistoryService::new(history_store, pricing, 30), store)
    }

    #[tokio::test]
    async fn empty_series_is_seeded_with_expected_point_counts() {
        let provider = Arc::new(MockPricingProvider::new());
        provider.add_instance("t3.micro", Some(0.10), Some(0.065)).await;
        provider.set_spot("t3.micro", 0.03).await;
        let (service, _store) = make_service(&provider);

        let Ok(points) = service
            .price_history("us-east-1", "t3.micro", OperatingSystem::Linux, 7)
            .await
        else {
            unreachable!("seeding over memory store cannot fail");
        };

        let on_demand = points
            .iter()
            .filter(|p| p.price_type == PriceType::OnDemand)
            .count();
        let spot = points.iter().filter(|p| p.price_type == PriceType::Spot).count();
        let reserved = points
            .iter()
            .filter(|p| p.price_type == PriceType::Reserved)
            .count();

        assert_eq!(on_demand, 7);
        assert_eq!(spot, 7);
        assert_eq!(reserved, 1);

        for point in points.iter().filter(|p| p.price_type == PriceType::OnDemand) {
            assert!(point.price >= 0.10 * 0.95 && point.price <= 0.10 * 1.05);
        }
    }

    #[tokio::test]
    async fn seeded_points_come_back_ascending() {
        let provider = Arc::new(MockPricingProvider::new());
        provider.add_instance("t3.micro", Some(0.10), None).await;
        let (service, _store) = make_service(&provider);

        let Ok(points) = service
            .price_history("us-east-1", "t3.micro", OperatingSystem::Linux, 14)
            .await
        else {
            unreachable!("seeding over memory store cannot fail");
        };
        assert!(points.windows(2).all(|w| match w {
            [a, b] => a.timestamp <= b.timestamp,
            _ => true,
        }));
    }

    #[tokio::test]
    async fn seeding_happens_only_once() {
        let provider = Arc::new(MockPricingProvider::new());
        provider.add_instance("t3.micro", Some(0.10), None).await;
        provider.set_spot("t3.micro", 0.03).await;
        let (service, store) = make_service(&provider);

        let _ = service
            .price_history("us-east-1", "t3.micro", OperatingSystem::Linux, 7)
            .await;
        let after_first = store.len().await;

        let _ = service
            .price_history("us-east-1", "t3.micro", OperatingSystem::Linux, 7)
            .await;
        assert_eq!(store.len().await, after_first);
    }

    #[tokio::test]
    async fn missing_spot_price_seeds_no_spot_points() {
        let provider = Arc::new(MockPricingProvider::new());
        provider.add_instance("t3.micro", Some(0.10), None).await;
        let (service, _store) = make_service(&provider);

        let Ok(points) = service
            .price_history("us-east-1", "t3.micro", OperatingSystem::Linux, 7)
            .await
        else {
            unreachable!("seeding over memory store cannot fail");
        };
        assert!(points.iter().all(|p| p.price_type == PriceType::OnDemand));
    }

    #[tokio::test]
    async fn unknown_instance_type_yields_empty_history() {
        let provider = Arc::new(MockPricingProvider::new());
        let (service, _store) = make_service(&provider);

        let Ok(points) = service
            .price_history("us-east-1", "z99.mega", OperatingSystem::Linux, 7)
            .await
        else {
            unreachable!("seeding over memory store cannot fail");
        };
        assert!(points.is_empty());
    }

    #[tokio::test]
    async fn invalid_region_is_rejected() {
        let provider = Arc::new(MockPricingProvider::new());
        let (service, _store) = make_service(&provider);

        let result = service
            .price_history("mars-north-1", "t3.micro", OperatingSystem::Linux, 7)
            .await;
        assert!(matches!(result, Err(ApiError::InvalidRegion)));
    }
}
