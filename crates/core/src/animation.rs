//! The `Animation` trait every decorative scene implements.
//!
//! The trait is object-safe so hosts can hold a `Box<dyn Animation>` and
//! switch scenes at runtime.

use serde_json::Value;

use crate::extent::Extent;
use crate::surface::Surface;

/// A frame-driven decorative scene.
///
/// A host calls [`advance`](Animation::advance) and then
/// [`render`](Animation::render) exactly once per display frame. `advance`
/// updates every element before `render` draws any of them, so a render never
/// observes a half-updated scene.
pub trait Animation {
    /// Advances the scene by one tick. `delta_ms` is the wall time since the
    /// previous tick; scenes are free to ignore it.
    fn advance(&mut self, delta_ms: f64);

    /// Draws the current state. Does not mutate the scene.
    fn render(&self, surface: &mut dyn Surface);

    /// Updates the extent the scene animates within.
    ///
    /// Elements are not rebuilt or repositioned here.
    fn resize(&mut self, extent: Extent);

    fn extent(&self) -> Extent;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Parameter names, types, ranges and defaults.
    fn param_schema(&self) -> Value;
}

impl<T: Animation + ?Sized> Animation for Box<T> {
    fn advance(&mut self, delta_ms: f64) {
        (**self).advance(delta_ms)
    }

    fn render(&self, surface: &mut dyn Surface) {
        (**self).render(surface)
    }

    fn resize(&mut self, extent: Extent) {
        (**self).resize(extent)
    }

    fn extent(&self) -> Extent {
        (**self).extent()
    }

    fn params(&self) -> Value {
        (**self).params()
    }

    fn param_schema(&self) -> Value {
        (**self).param_schema()
    }
}
