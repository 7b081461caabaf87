//! Shared test doubles.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use horizon_a11y::accesskit::{Affine, Vec2};
use horizon_a11y::{HostSurface, PlatformEvent};

/// Route bridge logs to the test output; `RUST_LOG` controls the filter.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("horizon_a11y=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A host surface that records everything the bridge tells it.
pub struct RecordingHost {
    pub transform: Cell<Affine>,
    pub origin: Cell<Vec2>,
    pub invalidations: Cell<usize>,
    pub events: RefCell<Vec<PlatformEvent>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            transform: Cell::new(Affine::IDENTITY),
            origin: Cell::new(Vec2::new(0.0, 0.0)),
            invalidations: Cell::new(0),
            events: RefCell::new(Vec::new()),
        }
    }

    /// Take the events raised so far.
    pub fn take_events(&self) -> Vec<PlatformEvent> {
        self.events.take()
    }
}

impl HostSurface for RecordingHost {
    fn surface_transform(&self) -> Affine {
        self.transform.get()
    }

    fn screen_origin(&self) -> Vec2 {
        self.origin.get()
    }

    fn invalidate_accessibility(&self) {
        self.invalidations.set(self.invalidations.get() + 1);
    }

    fn send_event(&self, event: &PlatformEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
