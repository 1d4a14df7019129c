//! Persisted records: price history points and alert definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{OperatingSystem, PriceType};

/// One recorded price observation. Append-only, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceHistoryPoint {
    /// EC2 instance type.
    #[serde(rename = "instanceType")]
    pub instance_type: String,
    /// Region the price applies to.
    pub region: String,
    /// Operating system dimension.
    pub os: OperatingSystem,
    /// Which kind of price was observed.
    #[serde(rename = "priceType")]
    pub price_type: PriceType,
    /// Hourly price in USD.
    pub price: f64,
    /// Observation time.
    pub timestamp: DateTime<Utc>,
}

/// A stored price-drop alert.
///
/// `threshold` is an upper bound: the alert triggers while the current
/// price is at or below it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceAlert {
    /// Alert ID.
    pub id: Uuid,
    /// Watched instance type.
    #[serde(rename = "instanceType")]
    pub instance_type: String,
    /// Watched region.
    pub region: String,
    /// Watched operating system.
    pub os: OperatingSystem,
    /// Watched price kind.
    #[serde(rename = "priceType")]
    pub price_type: PriceType,
    /// Trigger threshold in USD per hour.
    pub threshold: f64,
    /// Destination address for notifications.
    pub email: String,
    /// Whether the alert is evaluated at all.
    pub active: bool,
    /// When the last notification was sent, if any.
    #[serde(rename = "lastNotified")]
    pub last_notified: Option<DateTime<Utc>>,
    /// How many notifications this alert has produced.
    #[serde(rename = "notificationCount")]
    pub notification_count: i64,
    /// When the alert was created.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating an alert.
#[derive(Debug, Clone)]
pub struct NewPriceAlert {
    /// Watched instance type.
    pub instance_type: String,
    /// Watched region.
    pub region: String,
    /// Watched operating system.
    pub os: OperatingSystem,
    /// Watched price kind.
    pub price_type: PriceType,
    /// Trigger threshold in USD per hour.
    pub threshold: f64,
    /// Destination address for notifications.
    pub email: String,
}

/// Partial update applied to an existing alert.
#[derive(Debug, Clone, Default)]
pub struct AlertUpdate {
    /// New threshold, when changing it.
    pub threshold: Option<f64>,
    /// New active flag, when changing it.
    pub active: Option<bool>,
}
