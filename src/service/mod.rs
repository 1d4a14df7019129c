//! Service layer: cache orchestration, history seeding and the savings
//! calculator.

pub mod history;
pub mod pricing_service;
pub mod savings;

pub use history::HistoryService;
pub use pricing_service::PricingService;
