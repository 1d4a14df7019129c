//! In-process store implementations.
//!
//! Used when no `DATABASE_URL` is configured and by the test suites.
//! Writes are appends or single-record updates keyed by ID, matching
//! the Postgres implementations' semantics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{AlertUpdate, NewPriceAlert, PriceAlert, PriceHistoryPoint};
use super::{AlertStore, HistoryStore};
use crate::domain::{OperatingSystem, PriceType};
use crate::error::ApiError;

/// Vec-backed [`HistoryStore`].
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    points: RwLock<Vec<PriceHistoryPoint>>,
}

impl MemoryHistoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored points, across all series.
    pub async fn len(&self) -> usize {
        self.points.read().await.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub async fn is_empty(&self) -> bool {
        self.points.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn record_many(&self, points: &[PriceHistoryPoint]) -> Result<(), ApiError> {
        self.points.write().await.extend_from_slice(points);
        Ok(())
    }

    async fn query(
        &self,
        instance_type: &str,
        region: &str,
        os: OperatingSystem,
        since: DateTime<Utc>,
    ) -> Result<Vec<PriceHistoryPoint>, ApiError> {
        let points = self.points.read().await;
        let mut matched: Vec<PriceHistoryPoint> = points
            .iter()
            .filter(|p| {
                p.instance_type == instance_type
                    && p.region == region
                    && p.os == os
                    && p.timestamp >= since
            })
            .cloned()
            .collect();
        matched.sort_by_key(|p| p.timestamp);
        Ok(matched)
    }
}

/// Vec-backed [`AlertStore`].
#[derive(Debug, Default)]
pub struct MemoryAlertStore {
    alerts: RwLock<Vec<PriceAlert>>,
}

impl MemoryAlertStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the alert with the given ID, if present.
    pub async fn get(&self, id: Uuid) -> Option<PriceAlert> {
        self.alerts.read().await.iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn create(&self, alert: NewPriceAlert) -> Result<PriceAlert, ApiError> {
        let created = PriceAlert {
            id: Uuid::new_v4(),
            instance_type: alert.instance_type,
            region: alert.region,
            os: alert.os,
            price_type: alert.price_type,
            threshold: alert.threshold,
            email: alert.email,
            active: true,
            last_notified: None,
            notification_count: 0,
            created_at: Utc::now(),
        };
        self.alerts.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<PriceAlert>, ApiError> {
        Ok(self
            .alerts
            .read()
            .await
            .iter()
            .filter(|a| a.email == email)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, update: AlertUpdate) -> Result<PriceAlert, ApiError> {
        let mut alerts = self.alerts.write().await;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ApiError::AlertNotFound(id))?;
        if let Some(threshold) = update.threshold {
            alert.threshold = threshold;
        }
        if let Some(active) = update.active {
            alert.active = active;
        }
        Ok(alert.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let mut alerts = self.alerts.write().await;
        let before = alerts.len();
        alerts.retain(|a| a.id != id);
        if alerts.len() == before {
            return Err(ApiError::AlertNotFound(id));
        }
        Ok(())
    }

    async fn find_triggered(
        &self,
        instance_type: &str,
        region: &str,
        os: OperatingSystem,
        price_type: PriceType,
        current_price: f64,
    ) -> Result<Vec<PriceAlert>, ApiError> {
        Ok(self
            .alerts
            .read()
            .await
            .iter()
            .filter(|a| {
                a.active
                    && a.instance_type == instance_type
                    && a.region == region
                    && a.os == os
                    && a.price_type == price_type
                    && a.threshold >= current_price
            })
            .cloned()
            .collect())
    }

    async fn mark_notified(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        let mut alerts = self.alerts.write().await;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ApiError::AlertNotFound(id))?;
        alert.last_notified = Some(at);
        alert.notification_count += 1;
        Ok(())
    }
}
