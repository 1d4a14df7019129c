//! Savings calculator handler.

use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{SavingsRequest, SavingsResponse};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};
use crate::service::savings;

/// `POST /calculate-savings` — Compare pricing models for a usage
/// profile.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] on missing parameters or an unknown
/// term/payment option.
#[utoipa::path(
    post,
    path = "/api/calculate-savings",
    tag = "Savings",
    summary = "Calculate savings across pricing models",
    description = "Compares on-demand, reserved and spot costs for the given monthly hours over a demonstration price table. Upfront reserved payments are amortized over 12 months.",
    request_body = SavingsRequest,
    responses(
        (status = 200, description = "Cost breakdown", body = SavingsResponse),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse),
    )
)]
pub async fn calculate_savings(
    Json(req): Json<SavingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = req.validate()?;
    let breakdown = savings::calculate_savings(input.hours, input.term, input.payment);

    Ok(Json(SavingsResponse {
        instance_type: input.instance_type,
        region: input.region,
        os: input.os,
        hours: input.hours,
        ri_term: input.term,
        ri_payment: input.payment,
        breakdown,
    }))
}

/// Savings calculator routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/calculate-savings", post(calculate_savings))
}
