//! Error types for Horizon A11y core.

/// Errors raised by the core thread plumbing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The UI executor was dropped, so nothing will drain posted messages.
    #[error("the UI executor has been dropped")]
    ExecutorClosed,

    /// A UI-only operation was attempted from another thread.
    #[error("operation requires the UI thread (called from {thread})")]
    WrongThread {
        /// Name of the offending thread.
        thread: String,
    },
}

impl CoreError {
    /// Create a wrong-thread error for the current thread.
    pub fn wrong_thread() -> Self {
        let current = std::thread::current();
        Self::WrongThread {
            thread: current.name().unwrap_or("<unnamed>").to_string(),
        }
    }
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
