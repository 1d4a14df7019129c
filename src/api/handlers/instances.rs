//! Instance pricing handlers: regions, pricing snapshots, price
//! history, static catalogs and data export.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ExportQuery, HistoryQuery};
use crate::app_state::AppState;
use crate::domain::catalog::{instance_specs, reserved_terms, InstanceSpecs, ReservedTerms};
use crate::domain::{all_regions, OperatingSystem, RegionInfo};
use crate::error::{ApiError, ErrorResponse};
use crate::persistence::models::PriceHistoryPoint;

/// `GET /regions` — List supported AWS regions.
#[utoipa::path(
    get,
    path = "/api/regions",
    tag = "Instances",
    summary = "List supported regions",
    description = "Returns the fixed set of AWS regions the gateway serves pricing for.",
    responses(
        (status = 200, description = "Supported regions", body = Vec<RegionInfo>),
    )
)]
pub async fn get_regions() -> impl IntoResponse {
    Json(all_regions())
}

/// `GET /instances/{region}` — Current pricing snapshot for a region.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRegion`] for an unsupported region and
/// [`ApiError::Upstream`] when the refresh fails.
#[utoipa::path(
    get,
    path = "/api/instances/{region}",
    tag = "Instances",
    summary = "Get instance pricing for a region",
    description = "Returns the merged On-Demand/Reserved/Spot snapshot for every instance type in the region, served from the TTL cache.",
    params(
        ("region" = String, Path, description = "AWS region ID, e.g. us-east-1"),
    ),
    responses(
        (status = 200, description = "Pricing snapshot", body = Vec<crate::domain::InstancePricing>),
        (status = 400, description = "Invalid region", body = ErrorResponse),
        (status = 500, description = "Upstream fetch failed", body = ErrorResponse),
    )
)]
pub async fn get_instances(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let instances = state.pricing.instances(&region).await?;
    Ok(Json(instances))
}

/// `GET /price-history/{region}/{instanceType}` — Price history series.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRegion`] for an unsupported region and
/// [`ApiError::Validation`] for an unknown operating system.
#[utoipa::path(
    get,
    path = "/api/price-history/{region}/{instanceType}",
    tag = "Instances",
    summary = "Get price history",
    description = "Returns recorded price points for the series, ascending by timestamp. A series with no recorded data is seeded from the current snapshot.",
    params(
        ("region" = String, Path, description = "AWS region ID"),
        ("instanceType" = String, Path, description = "EC2 instance type"),
        HistoryQuery,
    ),
    responses(
        (status = 200, description = "Price history points", body = Vec<PriceHistoryPoint>),
        (status = 400, description = "Invalid region or OS", body = ErrorResponse),
    )
)]
pub async fn get_price_history(
    State(state): State<AppState>,
    Path((region, instance_type)): Path<(String, String)>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let os = match query.os.as_deref() {
        None => OperatingSystem::Linux,
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::Validation("Invalid operating system".to_string()))?,
    };
    let days = query.days.unwrap_or_else(|| state.history.default_days());

    let points = state
        .history
        .price_history(&region, &instance_type, os, days)
        .await?;
    Ok(Json(points))
}

/// `GET /instance-specs/{instanceType}` — Static hardware spec sheet.
#[utoipa::path(
    get,
    path = "/api/instance-specs/{instanceType}",
    tag = "Instances",
    summary = "Get instance specifications",
    description = "Returns the static hardware spec sheet for an instance type, or an empty object for an uncatalogued type.",
    params(
        ("instanceType" = String, Path, description = "EC2 instance type"),
    ),
    responses(
        (status = 200, description = "Spec sheet, or {} when uncatalogued", body = InstanceSpecs),
    )
)]
pub async fn get_instance_specs(Path(instance_type): Path<String>) -> Response {
    match instance_specs(&instance_type) {
        Some(specs) => Json(specs).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    }
}

/// `GET /reserved-terms` — Reserved instance discount table.
#[utoipa::path(
    get,
    path = "/api/reserved-terms",
    tag = "Instances",
    summary = "Get reserved instance terms",
    description = "Returns the static reserved-instance discount table for 1-year and 3-year commitments.",
    responses(
        (status = 200, description = "Discount table", body = ReservedTerms),
    )
)]
pub async fn get_reserved_terms() -> impl IntoResponse {
    Json(reserved_terms())
}

/// `GET /export/{region}` — Export the pricing snapshot as CSV or JSON.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRegion`] for an unsupported region and
/// [`ApiError::Upstream`] when the refresh fails.
#[utoipa::path(
    get,
    path = "/api/export/{region}",
    tag = "Instances",
    summary = "Export instance pricing data",
    description = "Exports the region's pricing snapshot. `format=csv` downloads a CSV attachment; anything else returns JSON.",
    params(
        ("region" = String, Path, description = "AWS region ID"),
        ExportQuery,
    ),
    responses(
        (status = 200, description = "Exported data"),
        (status = 400, description = "Invalid region", body = ErrorResponse),
    )
)]
pub async fn export_data(
    State(state): State<AppState>,
    Path(region): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let data = state.pricing.instances(&region).await?;

    if query.format.as_deref() == Some("csv") {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &data {
            writer
                .serialize(row)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let headers = [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=aws-pricing-{region}.csv"),
            ),
        ];
        return Ok((headers, bytes).into_response());
    }

    Ok(Json(data).into_response())
}

/// Instance pricing and catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/regions", get(get_regions))
        .route("/instances/{region}", get(get_instances))
        .route(
            "/price-history/{region}/{instanceType}",
            get(get_price_history),
        )
        .route("/instance-specs/{instanceType}", get(get_instance_specs))
        .route("/reserved-terms", get(get_reserved_terms))
        .route("/export/{region}", get(export_data))
}
