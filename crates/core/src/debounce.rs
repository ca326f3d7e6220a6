//! Coalesces bursts of viewport resize events.
//!
//! Dragging a window edge fires dozens of resize events per second. The
//! debouncer keeps only the latest requested extent and releases it once no
//! new request has arrived for `quiet_ms`. Timestamps are plain milliseconds
//! supplied by the host (`performance.now()` in the browser, a counter in
//! tests), so the logic stays deterministic.

use crate::extent::Extent;

/// Default quiet period before a pending resize is applied.
pub const DEFAULT_QUIET_MS: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet_ms: f64,
    pending: Option<(Extent, f64)>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_MS)
    }
}

impl ResizeDebouncer {
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms: quiet_ms.max(0.0),
            pending: None,
        }
    }

    /// Records a resize request at `now_ms`, replacing any pending one and
    /// restarting the quiet period.
    pub fn request(&mut self, extent: Extent, now_ms: f64) {
        self.pending = Some((extent, now_ms));
    }

    /// Returns the pending extent once the quiet period has elapsed.
    ///
    /// A released extent is consumed: the next poll returns `None` until a
    /// new request arrives.
    pub fn poll(&mut self, now_ms: f64) -> Option<Extent> {
        match self.pending {
            Some((extent, at)) if now_ms - at >= self.quiet_ms => {
                self.pending = None;
                Some(extent)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Discards any pending request.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
