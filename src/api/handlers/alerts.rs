//! Price alert CRUD handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{post, put};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{AlertsQuery, CreateAlertRequest, DeleteResponse, UpdateAlertRequest};
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse};
use crate::persistence::models::PriceAlert;

/// `POST /price-alerts` — Create a price-drop alert.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] on missing fields or a malformed
/// email and [`ApiError::InvalidRegion`] for an unsupported region.
#[utoipa::path(
    post,
    path = "/api/price-alerts",
    tag = "Alerts",
    summary = "Create a price alert",
    description = "Registers an alert that notifies the given address when the watched price drops to or below the threshold. New alerts start active.",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert created", body = PriceAlert),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
    )
)]
pub async fn create_alert(
    State(state): State<AppState>,
    Json(req): Json<CreateAlertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_alert = req.validate()?;
    let alert = state.alerts.create(new_alert).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

/// `GET /price-alerts?email=` — List alerts for an address.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when `email` is missing.
#[utoipa::path(
    get,
    path = "/api/price-alerts",
    tag = "Alerts",
    summary = "List alerts for an email address",
    params(AlertsQuery),
    responses(
        (status = 200, description = "Alerts registered for the address", body = Vec<PriceAlert>),
        (status = 400, description = "Email missing", body = ErrorResponse),
    )
)]
pub async fn get_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(email) = query.email else {
        return Err(ApiError::Validation("Email is required".to_string()));
    };
    let alerts = state.alerts.find_by_email(&email).await?;
    Ok(Json(alerts))
}

/// `PUT /price-alerts/{id}` — Update an alert's threshold or active
/// flag.
///
/// # Errors
///
/// Returns [`ApiError::AlertNotFound`] for an unknown ID.
#[utoipa::path(
    put,
    path = "/api/price-alerts/{id}",
    tag = "Alerts",
    summary = "Update a price alert",
    params(
        ("id" = Uuid, Path, description = "Alert ID"),
    ),
    request_body = UpdateAlertRequest,
    responses(
        (status = 200, description = "Updated alert", body = PriceAlert),
        (status = 404, description = "Alert not found", body = ErrorResponse),
    )
)]
pub async fn update_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAlertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let alert = state.alerts.update(id, req.into()).await?;
    Ok(Json(alert))
}

/// `DELETE /price-alerts/{id}` — Delete an alert.
///
/// # Errors
///
/// Returns [`ApiError::AlertNotFound`] for an unknown ID.
#[utoipa::path(
    delete,
    path = "/api/price-alerts/{id}",
    tag = "Alerts",
    summary = "Delete a price alert",
    params(
        ("id" = Uuid, Path, description = "Alert ID"),
    ),
    responses(
        (status = 200, description = "Alert deleted", body = DeleteResponse),
        (status = 404, description = "Alert not found", body = ErrorResponse),
    )
)]
pub async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.alerts.delete(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// Alert management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/price-alerts", post(create_alert).get(get_alerts))
        .route("/price-alerts/{id}", put(update_alert).delete(delete_alert))
}
