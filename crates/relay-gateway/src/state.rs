//! Gateway state
//!
//! What the gateway client writes and the platform adapter reads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::store::GuildCache;

/// Shared gateway state
#[derive(Debug, Default)]
pub struct GatewayState {
    cache: Arc<GuildCache>,
    /// Session identified and initial guild sync finished
    ready: AtomicBool,
}

impl GatewayState {
    /// Create a new gateway state with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new gateway state wrapped in Arc
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Get the guild cache
    pub fn cache(&self) -> &GuildCache {
        &self.cache
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_flag() {
        let state = GatewayState::new_shared();
        assert!(!state.is_ready());
        state.set_ready(true);
        assert!(state.is_ready());
        state.set_ready(false);
        assert!(!state.is_ready());
        assert_eq!(state.cache().guild_count(), 0);
    }
}
