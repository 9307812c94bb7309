//! # relay-service
//!
//! Application layer: presence normalization, the cached owner record,
//! and the read operations exposed to the HTTP layer.

pub mod cache;
pub mod dto;
pub mod normalizer;
pub mod services;

pub use cache::{RecordState, SelfPresenceCache};
pub use dto::{ActivityRecord, HealthChecks, HealthResponse, PresenceSnapshot, ReadinessResponse};
pub use normalizer::{ActivityRule, Normalizer, SpotifyRule};
pub use services::{
    spawn_refresh, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    StatusService,
};
