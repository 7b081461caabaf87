//! Core systems for Horizon A11y.
//!
//! This crate provides the thread plumbing the accessibility bridge is built on:
//!
//! - **Thread Affinity**: Records the UI thread and verifies UI-only entry points
//! - **UI Executor**: A single-threaded message queue drained by the UI thread,
//!   the only hand-off point between worker threads and UI-owned state
//! - **Logging**: `tracing` targets and span helpers shared by the workspace
//!
//! # Executor Example
//!
//! ```
//! use horizon_a11y_core::UiExecutor;
//!
//! let executor = UiExecutor::<u32>::new();
//! let sender = executor.sender();
//!
//! std::thread::spawn(move || {
//!     sender.post(7).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! let mut seen = Vec::new();
//! executor.drain_all(|message| seen.push(message));
//! assert_eq!(seen, vec![7]);
//! ```

mod error;
pub mod executor;
pub mod logging;
pub mod thread_check;

pub use error::{CoreError, Result};
pub use executor::{UiExecutor, UiSender};
pub use logging::QuerySpan;
pub use thread_check::ThreadAffinity;
