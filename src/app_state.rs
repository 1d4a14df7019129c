//! Shared application state handed to every request handler.

use std::sync::Arc;

use crate::persistence::AlertStore;
use crate::service::{HistoryService, PricingService};

/// State injected into the axum router.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Cached pricing reads.
    pub pricing: Arc<PricingService>,
    /// Price history queries and seeding.
    pub history: Arc<HistoryService>,
    /// Alert definitions.
    pub alerts: Arc<dyn AlertStore>,
}

impl AppState {
    /// Bundles the services the handlers depend on.
    #[must_use]
    pub fn new(
        pricing: Arc<PricingService>,
        history: Arc<HistoryService>,
        alerts: Arc<dyn AlertStore>,
    ) -> Self {
        Self {
            pricing,
            history,
            alerts,
        }
    }
}
