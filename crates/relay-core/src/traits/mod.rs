//! Ports the domain needs from the outside world

mod platform;

pub use platform::{PlatformResult, PresencePlatform};
