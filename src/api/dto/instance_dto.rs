//! Query parameters for instance and history endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for `GET /price-history/{region}/{instanceType}`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Days of history to return (default 30, clamped to 1..=90).
    pub days: Option<u32>,
    /// Operating system dimension, `Linux` (default) or `Windows`.
    pub os: Option<String>,
}

/// Query parameters for `GET /export/{region}`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportQuery {
    /// Output format, `csv` or `json` (default).
    pub format: Option<String>,
}
