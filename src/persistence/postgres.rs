//! PostgreSQL implementations of the history and alert stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{AlertUpdate, NewPriceAlert, PriceAlert, PriceHistoryPoint};
use super::{AlertStore, HistoryStore};
use crate::domain::{OperatingSystem, PriceType};
use crate::error::ApiError;

/// Row shape shared by every alert query.
type AlertRow = (
    Uuid,
    String,
    String,
    String,
    String,
    f64,
    String,
    bool,
    Option<DateTime<Utc>>,
    i64,
    DateTime<Utc>,
);

const ALERT_COLUMNS: &str = "id, instance_type, region, os, price_type, threshold, email, \
     active, last_notified, notification_count, created_at";

fn row_to_alert(row: AlertRow) -> Result<PriceAlert, ApiError> {
    let (
        id,
        instance_type,
        region,
        os,
        price_type,
        threshold,
        email,
        active,
        last_notified,
        notification_count,
        created_at,
    ) = row;
    Ok(PriceAlert {
        id,
        instance_type,
        region,
        os: os.parse::<OperatingSystem>().map_err(ApiError::Persistence)?,
        price_type: price_type
            .parse::<PriceType>()
            .map_err(ApiError::Persistence)?,
        threshold,
        email,
        active,
        last_notified,
        notification_count,
        created_at,
    })
}

/// `sqlx`-backed [`HistoryStore`] over the `price_history` table.
#[derive(Debug, Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    /// Creates a store on the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn record_many(&self, points: &[PriceHistoryPoint]) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;
        for point in points {
            sqlx::query(
                "INSERT INTO price_history \
                 (instance_type, region, os, price_type, price, recorded_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&point.instance_type)
            .bind(&point.region)
            .bind(point.os.pricing_api_name())
            .bind(point.price_type.as_str())
            .bind(point.price)
            .bind(point.timestamp)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn query(
        &self,
        instance_type: &str,
        region: &str,
        os: OperatingSystem,
        since: DateTime<Utc>,
    ) -> Result<Vec<PriceHistoryPoint>, ApiError> {
        let rows = sqlx::query_as::<_, (String, String, String, String, f64, DateTime<Utc>)>(
            "SELECT instance_type, region, os, price_type, price, recorded_at \
             FROM price_history \
             WHERE instance_type = $1 AND region = $2 AND os = $3 AND recorded_at >= $4 \
             ORDER BY recorded_at ASC",
        )
        .bind(instance_type)
        .bind(region)
        .bind(os.pricing_api_name())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(instance_type, region, os, price_type, price, timestamp)| {
                Ok(PriceHistoryPoint {
                    instance_type,
                    region,
                    os: os.parse::<OperatingSystem>().map_err(ApiError::Persistence)?,
                    price_type: price_type
                        .parse::<PriceType>()
                        .map_err(ApiError::Persistence)?,
                    price,
                    timestamp,
                })
            })
            .collect()
    }
}

/// `sqlx`-backed [`AlertStore`] over the `price_alerts` table.
#[derive(Debug, Clone)]
pub struct PgAlertStore {
    pool: PgPool,
}

impl PgAlertStore {
    /// Creates a store on the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn create(&self, alert: NewPriceAlert) -> Result<PriceAlert, ApiError> {
        let row = sqlx::query_as::<_, AlertRow>(&format!(
            "INSERT INTO price_alerts \
             (id, instance_type, region, os, price_type, threshold, email, active, \
              notification_count, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, 0, NOW()) \
             RETURNING {ALERT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&alert.instance_type)
        .bind(&alert.region)
        .bind(alert.os.pricing_api_name())
        .bind(alert.price_type.as_str())
        .bind(alert.threshold)
        .bind(&alert.email)
        .fetch_one(&self.pool)
        .await?;

        row_to_alert(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<PriceAlert>, ApiError> {
        let rows = sqlx::query_as::<_, AlertRow>(&format!(
            "SELECT {ALERT_COLUMNS} FROM price_alerts WHERE email = $1 ORDER BY created_at ASC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_alert).collect()
    }

    async fn update(&self, id: Uuid, update: AlertUpdate) -> Result<PriceAlert, ApiError> {
        let row = sqlx::query_as::<_, AlertRow>(&format!(
            "UPDATE price_alerts \
             SET threshold = COALESCE($2, threshold), active = COALESCE($3, active) \
             WHERE id = $1 \
             RETURNING {ALERT_COLUMNS}"
        ))
        .bind(id)
        .bind(update.threshold)
        .bind(update.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::AlertNotFound(id))?;

        row_to_alert(row)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM price_alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
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
        let rows = sqlx::query_as::<_, AlertRow>(&format!(
            "SELECT {ALERT_COLUMNS} FROM price_alerts \
             WHERE instance_type = $1 AND region = $2 AND os = $3 AND price_type = $4 \
               AND active AND threshold >= $5"
        ))
        .bind(instance_type)
        .bind(region)
        .bind(os.pricing_api_name())
        .bind(price_type.as_str())
        .bind(current_price)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_alert).collect()
    }

    async fn mark_notified(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        let result = sqlx::query(
            "UPDATE price_alerts \
             SET last_notified = $2, notification_count = notification_count + 1 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::AlertNotFound(id));
        }
        Ok(())
    }
}
