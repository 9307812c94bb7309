//! Service layer
//!
//! Services borrow a [`ServiceContext`] and orchestrate the platform,
//! the normalizer, and the cached owner record.

pub mod context;
pub mod error;
pub mod status;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use status::{spawn_refresh, StatusService};
