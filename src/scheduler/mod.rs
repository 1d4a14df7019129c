//! Background spot price poller.
//!
//! On a fixed cadence the poller sweeps every supported region and OS,
//! records a spot history point for each tracked instance type, and
//! evaluates price alerts against the fresh quotes. A per-alert quiet
//! period suppresses repeat notifications; the alert is marked notified
//! only after delivery succeeds, so failed sends retry on the next
//! sweep.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::OperatingSystem;
use crate::domain::catalog::COMMON_INSTANCE_TYPES;
use crate::domain::region::all_region_ids;
use crate::notifier::AlertNotifier;
use crate::persistence::models::{PriceAlert, PriceHistoryPoint};
use crate::persistence::{AlertStore, HistoryStore};
use crate::pricing::PricingProvider;

/// Periodic spot price sweep and alert evaluation.
#[derive(Debug)]
pub struct SpotPricePoller {
    provider: Arc<dyn PricingProvider>,
    history: Arc<dyn HistoryStore>,
    alerts: Arc<dyn AlertStore>,
    notifier: Option<Arc<dyn AlertNotifier>>,
    poll_interval: Duration,
    quiet_period: TimeDelta,
}

impl SpotPricePoller {
    /// Creates a poller. When `notifier` is `None`, alert matches are
    /// logged but nothing is delivered or marked.
    #[must_use]
    pub fn new(
        provider: Arc<dyn PricingProvider>,
        history: Arc<dyn HistoryStore>,
        alerts: Arc<dyn AlertStore>,
        notifier: Option<Arc<dyn AlertNotifier>>,
        poll_interval: Duration,
        quiet_period: Duration,
    ) -> Self {
        Self {
            provider,
            history,
            alerts,
            notifier,
            poll_interval,
            quiet_period: TimeDelta::from_std(quiet_period).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Runs the poll loop forever. The first sweep starts immediately.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick(Utc::now()).await;
        }
    }

    /// Performs one sweep at the given instant. Upstream and storage
    /// failures are logged and skip the affected region, never the whole
    /// sweep.
    pub async fn tick(&self, now: DateTime<Utc>) {
        tracing::debug!("starting spot price sweep");
        for region in all_region_ids() {
            for os in OperatingSystem::ALL {
                let quotes = match self.provider.fetch_spot_prices(region, os).await {
                    Ok(quotes) => quotes,
                    Err(error) => {
                        tracing::warn!(region, %os, %error, "spot price fetch failed");
                        continue;
                    }
                };

                let mut points = Vec::new();
                for instance_type in COMMON_INSTANCE_TYPES {
                    let Some(quote) = quotes.get(instance_type) else {
                        continue;
                    };
                    points.push(PriceHistoryPoint {
                        instance_type: instance_type.to_string(),
                        region: region.to_string(),
                        os,
                        price_type: crate::domain::PriceType::Spot,
                        price: quote.price,
                        timestamp: now,
                    });
                }

                if let Err(error) = self.history.record_many(&points).await {
                    tracing::warn!(region, %os, %error, "failed to record spot points");
                }

                for point in &points {
                    self.evaluate_alerts(point, now).await;
                }
            }
        }
        tracing::debug!("spot price sweep finished");
    }

    async fn evaluate_alerts(&self, point: &PriceHistoryPoint, now: DateTime<Utc>) {
        let triggered = match self
            .alerts
            .find_triggered(
                &point.instance_type,
                &point.region,
                point.os,
                point.price_type,
                point.price,
            )
            .await
        {
            Ok(triggered) => triggered,
            Err(error) => {
                tracing::warn!(
                    instance_type = %point.instance_type,
                    region = %point.region,
                    %error,
                    "alert lookup failed"
                );
                return;
            }
        };

        for alert in triggered {
            if !self.past_quiet_period(&alert, now) {
                tracing::debug!(alert_id = %alert.id, "alert within quiet period, skipping");
                continue;
            }
            let Some(notifier) = &self.notifier else {
                tracing::info!(
                    alert_id = %alert.id,
                    price = point.price,
                    "alert triggered but no notifier is configured"
                );
                continue;
            };
            match notifier.notify(&alert, point.price).await {
                Ok(()) => {
                    if let Err(error) = self.alerts.mark_notified(alert.id, now).await {
                        tracing::warn!(alert_id = %alert.id, %error, "failed to mark alert notified");
                    }
                }
                Err(error) => {
                    tracing::warn!(alert_id = %alert.id, %error, "alert notification failed");
                }
            }
        }
    }

    fn past_quiet_period(&self, alert: &PriceAlert, now: DateTime<Utc>) -> bool {
        alert
            .last_notified
            .is_none_or(|last| now - last >= self.quiet_period)
    }
}
