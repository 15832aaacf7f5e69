//! Shared "exit requested" flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Raised once the application should wind down.
///
/// Clones share the same flag, so a window-close handler or signal handler
/// on another thread can stop every running UI loop.
#[derive(Debug, Clone, Default)]
pub struct ExitFlag(Arc<AtomicBool>);

impl ExitFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Lower the flag again, e.g. after a nested loop consumed it.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
