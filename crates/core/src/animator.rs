//! Start/stop lifecycle binding one animation to one surface.
//!
//! An [`Animator`] has two states. It is `Running` while it owns a surface
//! and `Stopped` after [`stop`](Animator::stop), or from the start when no
//! surface was available. There is no pause: a stopped animator never ticks
//! again, no matter how many frame callbacks the host still delivers.

use tracing::{debug, info};

use crate::animation::Animation;
use crate::debounce::ResizeDebouncer;
use crate::extent::Extent;
use crate::surface::Surface;

/// Assumed frame time for the very first tick, when there is no previous timestamp.
const FIRST_FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Running,
    Stopped,
}

pub struct Animator<A, S> {
    animation: A,
    surface: Option<S>,
    debouncer: ResizeDebouncer,
    last_frame_ms: Option<f64>,
    frames: u64,
}

impl<A: Animation, S: Surface> Animator<A, S> {
    /// Binds `animation` to `surface` and enters `Running`.
    ///
    /// A `None` surface (no canvas, no 2D context) is not an error: the
    /// animator starts out `Stopped` and every later call is a no-op.
    pub fn start(animation: A, surface: Option<S>) -> Self {
        match surface {
            Some(_) => info!(
                width = animation.extent().width(),
                height = animation.extent().height(),
                "animator started"
            ),
            None => debug!("no rendering surface available, animator stays inert"),
        }
        Self {
            animation,
            surface,
            debouncer: ResizeDebouncer::default(),
            last_frame_ms: None,
            frames: 0,
        }
    }

    /// Replaces the resize debouncer (e.g. a different quiet period).
    pub fn with_debouncer(mut self, debouncer: ResizeDebouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn state(&self) -> AnimatorState {
        if self.surface.is_some() {
            AnimatorState::Running
        } else {
            AnimatorState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == AnimatorState::Running
    }

    /// Runs one tick: apply a settled resize, advance, then render.
    ///
    /// Returns `true` if the host should schedule another frame.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        if let Some(extent) = self.debouncer.poll(now_ms) {
            debug!(
                width = extent.width(),
                height = extent.height(),
                "applying debounced resize"
            );
            surface.resize(extent);
            self.animation.resize(extent);
        }

        let delta_ms = match self.last_frame_ms {
            Some(prev) => (now_ms - prev).max(0.0),
            None => FIRST_FRAME_MS,
        };
        self.last_frame_ms = Some(now_ms);

        self.animation.advance(delta_ms);
        self.animation.render(surface);
        self.frames += 1;
        true
    }

    /// Queues a viewport resize. Ignored once stopped.
    pub fn request_resize(&mut self, extent: Extent, now_ms: f64) {
        if self.is_running() {
            self.debouncer.request(extent, now_ms);
        }
    }

    /// Enters `Stopped` and hands the surface back to the host.
    ///
    /// Safe to call any number of times; only the first call returns the
    /// surface.
    pub fn stop(&mut self) -> Option<S> {
        let surface = self.surface.take();
        if surface.is_some() {
            self.debouncer.cancel();
            info!(frames = self.frames, "animator stopped");
        }
        surface
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Number of ticks run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use crate::Srgb;
    use glam::DVec2;
    use serde_json::{json, Value};

    struct Counter {
        extent: Extent,
        ticks: usize,
        last_delta: f64,
    }

    impl Animation for Counter {
        fn advance(&mut self, delta_ms: f64) {
            self.ticks += 1;
            self.last_delta = delta_ms;
        }

        fn render(&self, surface: &mut dyn Surface) {
            surface.fill_circle(DVec2::ZERO, self.ticks as f64, Srgb::WHITE);
        }

        fn resize(&mut self, extent: Extent) {
            self.extent = extent;
        }

        fn extent(&self) -> Extent {
            self.extent
        }

        fn params(&self) -> Value {
            json!({})
        }

        fn param_schema(&self) -> Value {
            json!({})
        }
    }

    fn extent(w: f64, h: f64) -> Extent {
        Extent::new(w, h).unwrap()
    }

    fn running() -> Animator<Counter, RecordingSurface> {
        let e = extent(100.0, 100.0);
        let counter = Counter {
            extent: e,
            ticks: 0,
            last_delta: 0.0,
        };
        Animator::start(counter, Some(RecordingSurface::new(e)))
    }

    #[test]
    fn start_with_surface_is_running() {
        assert_eq!(running().state(), AnimatorState::Running);
    }

    #[test]
    fn start_without_surface_is_inert() {
        let counter = Counter {
            extent: extent(10.0, 10.0),
            ticks: 0,
            last_delta: 0.0,
        };
        let mut a: Animator<Counter, RecordingSurface> = Animator::start(counter, None);
        assert_eq!(a.state(), AnimatorState::Stopped);
        assert!(!a.frame(0.0));
        assert_eq!(a.animation().ticks, 0);
        assert!(a.stop().is_none());
    }

    #[test]
    fn each_frame_advances_once_then_renders() {
        let mut a = running();
        assert!(a.frame(0.0));
        assert!(a.frame(16.0));
        assert_eq!(a.animation().ticks, 2);
        assert_eq!(a.frames(), 2);
        let circles: Vec<_> = a.surface().unwrap().circles().cloned().collect();
        assert_eq!(circles.len(), 2);
        // render observed the already-advanced state
        assert!(matches!(circles[0], crate::DrawCommand::FillCircle { radius, .. } if radius == 1.0));
    }

    #[test]
    fn delta_uses_previous_timestamp() {
        let mut a = running();
        a.frame(1_000.0);
        assert!((a.animation().last_delta - FIRST_FRAME_MS).abs() < 1e-9);
        a.frame(1_033.0);
        assert!((a.animation().last_delta - 33.0).abs() < 1e-9);
    }

    #[test]
    fn stop_prevents_further_ticks() {
        let mut a = running();
        a.frame(0.0);
        let surface = a.stop();
        assert!(surface.is_some());
        assert!(!a.frame(16.0));
        assert!(!a.frame(32.0));
        assert_eq!(a.animation().ticks, 1);
        assert_eq!(a.state(), AnimatorState::Stopped);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut a = running();
        assert!(a.stop().is_some());
        assert!(a.stop().is_none());
        assert!(a.stop().is_none());
    }

    #[test]
    fn resize_applies_to_surface_and_animation_after_quiet_period() {
        let mut a = running();
        a.request_resize(extent(300.0, 200.0), 0.0);
        a.frame(50.0);
        assert_eq!(a.animation().extent().width(), 100.0);
        a.frame(120.0);
        assert_eq!(a.animation().extent().width(), 300.0);
        assert_eq!(a.surface().unwrap().extent().height(), 200.0);
    }

    #[test]
    fn resize_after_stop_is_ignored() {
        let mut a = running();
        a.stop();
        a.request_resize(extent(300.0, 200.0), 0.0);
        a.frame(500.0);
        assert_eq!(a.animation().extent().width(), 100.0);
    }

    #[test]
    fn boxed_dyn_animation_can_be_driven() {
        let e = extent(50.0, 50.0);
        let boxed: Box<dyn Animation> = Box::new(Counter {
            extent: e,
            ticks: 0,
            last_delta: 0.0,
        });
        let mut a = Animator::start(boxed, Some(RecordingSurface::new(e)));
        assert!(a.frame(0.0));
        assert_eq!(a.surface().unwrap().circles().count(), 1);
    }
}
