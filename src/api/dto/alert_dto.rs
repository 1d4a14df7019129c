//! Alert request/response DTOs and input validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::is_valid_region;
use crate::error::ApiError;
use crate::persistence::models::{AlertUpdate, NewPriceAlert};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern is valid");
    re
});

/// Request body for `POST /price-alerts`. Every field is optional at
/// the deserialization layer so missing input maps to a 400 with the
/// wire-format message instead of a rejection.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAlertRequest {
    /// Instance type to watch.
    #[serde(rename = "instanceType", default)]
    pub instance_type: Option<String>,
    /// Region to watch.
    #[serde(default)]
    pub region: Option<String>,
    /// Operating system dimension, `Linux` or `Windows`.
    #[serde(default)]
    pub os: Option<String>,
    /// Price kind to watch: `onDemand`, `reserved` or `spot`.
    #[serde(rename = "priceType", default)]
    pub price_type: Option<String>,
    /// Trigger threshold in USD per hour.
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Destination address for notifications.
    #[serde(default)]
    pub email: Option<String>,
}

impl CreateAlertRequest {
    /// Validates the request into store input.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with `Missing required fields`
    /// when any field is absent, `Invalid email format` for a malformed
    /// address, and [`ApiError::InvalidRegion`] for an unsupported
    /// region.
    pub fn validate(self) -> Result<NewPriceAlert, ApiError> {
        let (Some(instance_type), Some(region), Some(os), Some(price_type), Some(threshold), Some(email)) = (
            self.instance_type,
            self.region,
            self.os,
            self.price_type,
            self.threshold,
            self.email,
        ) else {
            return Err(ApiError::Validation("Missing required fields".to_string()));
        };

        if !EMAIL_RE.is_match(&email) {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
        if !is_valid_region(&region) {
            return Err(ApiError::InvalidRegion);
        }
        let os = os
            .parse()
            .map_err(|_| ApiError::Validation("Invalid operating system".to_string()))?;
        let price_type = price_type
            .parse()
            .map_err(|_| ApiError::Validation("Invalid price type".to_string()))?;

        Ok(NewPriceAlert {
            instance_type,
            region,
            os,
            price_type,
            threshold,
            email,
        })
    }
}

/// Request body for `PUT /price-alerts/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAlertRequest {
    /// New threshold, when changing it.
    #[serde(default)]
    pub threshold: Option<f64>,
    /// New active flag, when changing it.
    #[serde(default)]
    pub active: Option<bool>,
}

impl From<UpdateAlertRequest> for AlertUpdate {
    fn from(req: UpdateAlertRequest) -> Self {
        Self {
            threshold: req.threshold,
            active: req.active,
        }
    }
}

/// Query parameters for `GET /price-alerts`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AlertsQuery {
    /// Address whose alerts to list.
    pub email: Option<String>,
}

/// Response body for `DELETE /price-alerts/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    /// Always `true` on success.
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateAlertRequest {
        CreateAlertRequest {
            instance_type: Some("t3.micro".to_string()),
            region: Some("us-east-1".to_string()),
            os: Some("Linux".to_string()),
            price_type: Some("spot".to_string()),
            threshold: Some(0.005),
            email: Some("ops@example.com".to_string()),
        }
    }

    #[test]
    fn complete_request_validates() {
        let Ok(alert) = full_request().validate() else {
            unreachable!("complete request must validate");
        };
        assert_eq!(alert.instance_type, "t3.micro");
        assert_eq!(alert.threshold, 0.005);
    }

    #[test]
    fn any_missing_field_is_rejected() {
        let mut req = full_request();
        req.threshold = None;
        let result = req.validate();
        assert!(
            matches!(result, Err(ApiError::Validation(msg)) if msg == "Missing required fields")
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["not-an-email", "a b@example.com", "user@nodot", "@example.com"] {
            let mut req = full_request();
            req.email = Some(bad.to_string());
            let result = req.validate();
            assert!(
                matches!(result, Err(ApiError::Validation(msg)) if msg == "Invalid email format"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_region_is_rejected() {
        let mut req = full_request();
        req.region = Some("mars-north-1".to_string());
        assert!(matches!(req.validate(), Err(ApiError::InvalidRegion)));
    }

    #[test]
    fn unknown_price_type_is_rejected() {
        let mut req = full_request();
        req.price_type = Some("futures".to_string());
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }
}
