//! The host surface seam.

use accesskit::{Affine, Vec2};

use crate::events::PlatformEvent;

/// The UI surface the bridge serves, as seen from the bridge.
///
/// Implemented by the platform glue that owns the native view. All methods
/// are called on the UI thread and take `&self`; implementations that record
/// state use interior mutability.
pub trait HostSurface {
    /// Transform from tree coordinates to surface coordinates.
    fn surface_transform(&self) -> Affine {
        Affine::IDENTITY
    }

    /// Offset of the surface's origin on screen.
    fn screen_origin(&self) -> Vec2 {
        Vec2::new(0.0, 0.0)
    }

    /// Tell the host framework the tree changed and it should re-query.
    fn invalidate_accessibility(&self);

    /// Raise one accessibility event.
    fn send_event(&self, event: &PlatformEvent);
}
