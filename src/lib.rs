//! # pricewatch-gateway
//!
//! REST API gateway and alerting service for AWS EC2 pricing data.
//!
//! The service fronts the AWS Pricing and EC2 APIs with a per-region TTL
//! cache, persists derived spot price history, computes reserved/spot
//! savings from a static discount table, and manages price-drop email
//! alerts evaluated by a background poller.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── PricingService + RegionCache (service/, domain/)
//!     ├── PricingProvider → AWS Pricing / EC2 (pricing/)
//!     │
//!     ├── HistoryStore / AlertStore (persistence/)
//!     │
//!     └── SpotPricePoller → AlertNotifier (scheduler/, notifier/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod notifier;
pub mod persistence;
pub mod pricing;
pub mod scheduler;
pub mod service;
