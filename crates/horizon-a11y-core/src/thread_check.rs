//! UI-thread affinity checks.
//!
//! Every piece of accessibility state lives on one UI thread. Types that own
//! such state record a [`ThreadAffinity`] when they are created and verify it
//! on their UI-only entry points:
//!
//! ```
//! use horizon_a11y_core::thread_check::ThreadAffinity;
//!
//! struct SurfaceState {
//!     affinity: ThreadAffinity,
//!     revision: std::cell::Cell<u64>,
//! }
//!
//! impl SurfaceState {
//!     fn bump(&self) {
//!         self.affinity.debug_assert_same_thread();
//!         self.revision.set(self.revision.get() + 1);
//!     }
//! }
//!
//! let state = SurfaceState {
//!     affinity: ThreadAffinity::current(),
//!     revision: std::cell::Cell::new(0),
//! };
//! state.bump();
//! ```
//!
//! Two levels of checking are provided:
//!
//! - `debug_assert_*` variants compile to nothing in release builds and are
//!   meant for hot query paths.
//! - `assert_*` variants always run.
//!
//! The [`assert_ui_thread!`](crate::assert_ui_thread) and
//! [`debug_assert_ui_thread!`](crate::debug_assert_ui_thread) macros wrap the
//! same checks and report the call site.

use std::thread::ThreadId;

use crate::error::{CoreError, Result};

/// Records the thread a value was created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// The thread this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Return an error instead of panicking when called off-thread.
    pub fn check(&self) -> Result<()> {
        if self.is_same_thread() {
            Ok(())
        } else {
            Err(CoreError::wrong_thread())
        }
    }

    /// Assert that we are on the bound thread. Always active.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread.
    #[inline]
    pub fn assert_same_thread(&self) {
        self.assert_same_thread_at("accessibility state accessed off the UI thread", "", 0);
    }

    /// Debug-only variant of [`assert_same_thread`](Self::assert_same_thread).
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_same_thread();
    }

    #[doc(hidden)]
    pub fn assert_same_thread_at(&self, msg: &str, file: &str, line: u32) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(msg, file, line);
        }
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, msg: &str, file: &str, line: u32) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let location = if file.is_empty() {
            String::from("<unknown>")
        } else {
            format!("{file}:{line}")
        };

        panic!(
            "\n\
            UI THREAD AFFINITY VIOLATION\n\
            \n\
            {msg}\n\
            \n\
            Location: {location}\n\
            Bound to thread: {:?}\n\
            Current thread: \"{current_name}\" (ID: {:?})\n\
            \n\
            Accessibility trees and adapters belong to the UI thread. From a\n\
            worker thread, use an UpdateNotifier to request an update; the\n\
            UI thread applies it when it drains its executor.",
            self.thread_id,
            current.id(),
        )
    }
}

/// Panics if the current thread does not match the given [`ThreadAffinity`].
///
/// Always active, in both debug and release builds.
#[macro_export]
macro_rules! assert_ui_thread {
    ($affinity:expr) => {
        $crate::assert_ui_thread!($affinity, "operation must be performed on the UI thread")
    };
    ($affinity:expr, $msg:expr) => {
        $affinity.assert_same_thread_at($msg, file!(), line!())
    };
}

/// Debug-only form of [`assert_ui_thread!`].
#[macro_export]
macro_rules! debug_assert_ui_thread {
    ($affinity:expr) => {
        #[cfg(debug_assertions)]
        $crate::assert_ui_thread!($affinity)
    };
    ($affinity:expr, $msg:expr) => {
        #[cfg(debug_assertions)]
        $crate::assert_ui_thread!($affinity, $msg)
    };
}
