//! Data Transfer Objects for REST request/response serialization.
//!
//! JSON field names use the camelCase wire format the dashboard
//! consumes.

pub mod alert_dto;
pub mod instance_dto;
pub mod savings_dto;

pub use alert_dto::*;
pub use instance_dto::*;
pub use savings_dto::*;
