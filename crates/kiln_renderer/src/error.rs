//! Trace errors and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can stop a trace.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render cancelled")]
    Cancelled,

    #[error("invalid render config: {0}")]
    InvalidConfig(String),
}

/// Shared flag checked between buckets. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every trace holding this token to stop at its next bucket boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
