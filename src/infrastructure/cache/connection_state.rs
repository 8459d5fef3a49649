//! Shared connectivity flag for a cache backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Live `connected` flag shared between a cache adapter and its monitor.
///
/// Clones share the same flag.
#[derive(Debug, Clone)]
pub struct ConnectionState {
    connected: Arc<AtomicBool>,
}

impl ConnectionState {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: Arc::new(AtomicBool::new(connected)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Sets the flag. Returns true if this call changed it from disconnected.
    pub fn mark_connected(&self) -> bool {
        !self.connected.swap(true, Ordering::AcqRel)
    }

    /// Clears the flag. Returns true if this call changed it from connected.
    pub fn mark_disconnected(&self) -> bool {
        self.connected.swap(false, Ordering::AcqRel)
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new(false)
    }
}
