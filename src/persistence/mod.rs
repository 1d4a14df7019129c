//! Persistence layer: price history and alert stores.
//!
//! Both stores are trait objects so request handlers, the seeder and
//! the poller stay storage-agnostic. [`postgres`] holds the
//! `sqlx::PgPool` implementations used when `DATABASE_URL` is set;
//! [`memory`] holds the in-process implementations used otherwise and
//! throughout the test suites.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{OperatingSystem, PriceType};
use crate::error::ApiError;
use models::{AlertUpdate, NewPriceAlert, PriceAlert, PriceHistoryPoint};

/// Append-only time series of price observations.
#[async_trait]
pub trait HistoryStore: Send + Sync + std::fmt::Debug {
    /// Appends a batch of price points.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn record_many(&self, points: &[PriceHistoryPoint]) -> Result<(), ApiError>;

    /// Returns all points for the series since `since`, ascending by
    /// timestamp. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn query(
        &self,
        instance_type: &str,
        region: &str,
        os: OperatingSystem,
        since: DateTime<Utc>,
    ) -> Result<Vec<PriceHistoryPoint>, ApiError>;
}

/// CRUD plus trigger queries over alert definitions.
#[async_trait]
pub trait AlertStore: Send + Sync + std::fmt::Debug {
    /// Creates an alert; `active` starts true, counters at zero.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn create(&self, alert: NewPriceAlert) -> Result<PriceAlert, ApiError>;

    /// Returns all alerts registered for `email`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn find_by_email(&self, email: &str) -> Result<Vec<PriceAlert>, ApiError>;

    /// Applies a partial update and returns the updated alert.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AlertNotFound`] for an unknown ID or
    /// [`ApiError::Persistence`] on storage failure.
    async fn update(&self, id: Uuid, update: AlertUpdate) -> Result<PriceAlert, ApiError>;

    /// Deletes an alert.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AlertNotFound`] for an unknown ID or
    /// [`ApiError::Persistence`] on storage failure.
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;

    /// Returns active alerts for the series whose threshold is at or
    /// above `current_price` (price has dropped into alert range).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on storage failure.
    async fn find_triggered(
        &self,
        instance_type: &str,
        region: &str,
        os: OperatingSystem,
        price_type: PriceType,
        current_price: f64,
    ) -> Result<Vec<PriceAlert>, ApiError>;

    /// Records a delivered notification: sets `lastNotified` and
    /// increments `notificationCount`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AlertNotFound`] for an unknown ID or
    /// [`ApiError::Persistence`] on storage failure.
    async fn mark_notified(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError>;
}
