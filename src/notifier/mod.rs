//! Alert delivery: the [`AlertNotifier`] seam and its SMTP-backed
//! implementation.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::ApiError;
use crate::persistence::models::PriceAlert;

/// Delivers a price-drop notification for a triggered alert.
#[async_trait]
pub trait AlertNotifier: Send + Sync + std::fmt::Debug {
    /// Notifies the alert's recipient that `current_price` crossed the
    /// configured threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Notification`] when delivery fails.
    async fn notify(&self, alert: &PriceAlert, current_price: f64) -> Result<(), ApiError>;
}

/// SMTP-backed [`AlertNotifier`] built on `lettre`.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    /// Builds a relay transport from SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Notification`] when the relay host is not a
    /// valid SMTP endpoint.
    pub fn new(config: &SmtpConfig) -> Result<Self, ApiError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| ApiError::Notification(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    fn render_body(alert: &PriceAlert, current_price: f64) -> String {
        // +1: the store counter is bumped after a successful send.
        let ordinal = alert.notification_count + 1;
        format!(
            "<h2>AWS Price Alert</h2>\
             <p>The <strong>{price_type}</strong> price for \
             <strong>{instance_type}</strong> ({os}) in \
             <strong>{region}</strong> has dropped to \
             <strong>${current_price:.4}/hr</strong>, at or below your \
             threshold of ${threshold:.4}/hr.</p>\
             <p>This is notification #{ordinal} for this alert.</p>",
            price_type = alert.price_type,
            instance_type = alert.instance_type,
            os = alert.os,
            region = alert.region,
            threshold = alert.threshold,
        )
    }
}

#[async_trait]
impl AlertNotifier for SmtpNotifier {
    async fn notify(&self, alert: &PriceAlert, current_price: f64) -> Result<(), ApiError> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e: lettre::address::AddressError| {
                        ApiError::Notification(e.to_string())
                    })?,
            )
            .to(alert
                .email
                .parse()
                .map_err(|e: lettre::address::AddressError| {
                    ApiError::Notification(e.to_string())
                })?)
            .subject(format!(
                "AWS Price Alert: {} price is now ${:.4}",
                alert.instance_type, current_price
            ))
            .header(ContentType::TEXT_HTML)
            .body(Self::render_body(alert, current_price))
            .map_err(|e| ApiError::Notification(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| ApiError::Notification(e.to_string()))?;

        tracing::info!(
            alert_id = %alert.id,
            email = %alert.email,
            current_price,
            "sent price alert notification"
        );
        Ok(())
    }
}
