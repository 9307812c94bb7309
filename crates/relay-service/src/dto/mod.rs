//! Data transfer objects for API responses
//!
//! Response DTOs serialize to the exact JSON shape clients consume.

pub mod responses;

pub use responses::{
    ActivityRecord, HealthChecks, HealthResponse, PresenceSnapshot, ReadinessResponse,
};
