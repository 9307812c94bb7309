//! Platform REST client
//!
//! Only the member lookup the relay falls back to when the gateway cache
//! has no entry.

mod client;
mod error;

pub use client::{DiscordHttp, DEFAULT_API_URL};
pub use error::{ApiErrorBody, RestError};
