//! Savings calculator request/response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::service::savings::{RiPayment, RiTerm, SavingsBreakdown};

/// Request body for `POST /calculate-savings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SavingsRequest {
    /// Instance type the comparison is for (echoed back).
    #[serde(rename = "instanceType", default)]
    pub instance_type: Option<String>,
    /// Region the comparison is for (echoed back).
    #[serde(default)]
    pub region: Option<String>,
    /// Operating system (echoed back).
    #[serde(default)]
    pub os: Option<String>,
    /// Monthly usage in hours. Must be positive.
    #[serde(default)]
    pub hours: Option<f64>,
    /// Reserved term, `1yr` (default) or `3yr`.
    #[serde(rename = "riTerm", default)]
    pub ri_term: Option<String>,
    /// Payment option, `no_upfront` (default), `partial_upfront` or
    /// `all_upfront`.
    #[serde(rename = "riPayment", default)]
    pub ri_payment: Option<String>,
}

/// Validated savings inputs.
#[derive(Debug)]
pub struct SavingsInput {
    /// Echoed instance type.
    pub instance_type: String,
    /// Echoed region.
    pub region: String,
    /// Echoed operating system.
    pub os: String,
    /// Monthly usage in hours.
    pub hours: f64,
    /// Parsed reserved term.
    pub term: RiTerm,
    /// Parsed payment option.
    pub payment: RiPayment,
}

impl SavingsRequest {
    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with `Missing required
    /// parameters` when a required field is absent or `hours` is not
    /// positive, and a descriptive message for an unknown term or
    /// payment option.
    pub fn validate(self) -> Result<SavingsInput, ApiError> {
        let (Some(instance_type), Some(region), Some(os), Some(hours)) =
            (self.instance_type, self.region, self.os, self.hours)
        else {
            return Err(ApiError::Validation(
                "Missing required parameters".to_string(),
            ));
        };
        // Zero hours would also divide the percentages by zero.
        if hours <= 0.0 {
            return Err(ApiError::Validation(
                "Missing required parameters".to_string(),
            ));
        }

        let term = self
            .ri_term
            .as_deref()
            .unwrap_or("1yr")
            .parse()
            .map_err(|_| ApiError::Validation("Invalid reserved term".to_string()))?;
        let payment = self
            .ri_payment
            .as_deref()
            .unwrap_or("no_upfront")
            .parse()
            .map_err(|_| ApiError::Validation("Invalid payment option".to_string()))?;

        Ok(SavingsInput {
            instance_type,
            region,
            os,
            hours,
            term,
            payment,
        })
    }
}

/// Response body for `POST /calculate-savings`: the echoed inputs plus
/// the cost breakdown.
#[derive(Debug, Serialize, ToSchema)]
pub struct SavingsResponse {
    /// Echoed instance type.
    #[serde(rename = "instanceType")]
    pub instance_type: String,
    /// Echoed region.
    pub region: String,
    /// Echoed operating system.
    pub os: String,
    /// Echoed monthly hours.
    pub hours: f64,
    /// Applied reserved term.
    #[serde(rename = "riTerm")]
    pub ri_term: RiTerm,
    /// Applied payment option.
    #[serde(rename = "riPayment")]
    pub ri_payment: RiPayment,
    /// Cost comparison.
    #[serde(flatten)]
    pub breakdown: SavingsBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> SavingsRequest {
        SavingsRequest {
            instance_type: Some("t2.micro".to_string()),
            region: Some("us-east-1".to_string()),
            os: Some("Linux".to_string()),
            hours: Some(730.0),
            ri_term: None,
            ri_payment: None,
        }
    }

    #[test]
    fn defaults_apply_when_term_and_payment_are_absent() {
        let Ok(input) = full_request().validate() else {
            unreachable!("complete request must validate");
        };
        assert_eq!(input.term, RiTerm::OneYear);
        assert_eq!(input.payment, RiPayment::NoUpfront);
    }

    #[test]
    fn missing_hours_is_rejected() {
        let mut req = full_request();
        req.hours = None;
        let result = req.validate();
        assert!(
            matches!(result, Err(ApiError::Validation(msg)) if msg == "Missing required parameters")
        );
    }

    #[test]
    fn zero_hours_is_rejected_like_missing_input() {
        let mut req = full_request();
        req.hours = Some(0.0);
        let result = req.validate();
        assert!(
            matches!(result, Err(ApiError::Validation(msg)) if msg == "Missing required parameters")
        );
    }

    #[test]
    fn unknown_term_is_rejected() {
        let mut req = full_request();
        req.ri_term = Some("5yr".to_string());
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }
}
