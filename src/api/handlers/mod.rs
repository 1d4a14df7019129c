//! REST endpoint handlers organized by resource.

pub mod alerts;
pub mod instances;
pub mod savings;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(instances::routes())
        .merge(savings::routes())
        .merge(alerts::routes())
}
