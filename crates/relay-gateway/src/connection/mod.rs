//! Gateway connection
//!
//! A [`Session`] outlives individual sockets; the connection module drives
//! one socket at a time.

mod connection;
mod session;

pub(crate) use connection::Connection;
pub use session::Session;
