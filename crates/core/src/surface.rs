//! The 2D drawing contract scenes render into.
//!
//! The trait mirrors the subset of `CanvasRenderingContext2D` the scenes
//! need: a global alpha, rectangle fill, circle fill and line stroke, plus a
//! queryable size the host updates on resize. The browser host implements it
//! over a real canvas, `folio-scenes` over a CPU pixel buffer, and
//! [`RecordingSurface`] simply records the calls.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::extent::Extent;

/// A 2D drawing target.
///
/// Every draw call uses the alpha most recently passed to
/// [`set_global_alpha`](Surface::set_global_alpha).
pub trait Surface {
    /// Current pixel size.
    fn extent(&self) -> Extent;

    /// Reallocates the drawing buffer at a new size.
    fn resize(&mut self, extent: Extent);

    /// Sets the alpha applied to subsequent draws, clamped to [0, 1].
    fn set_global_alpha(&mut self, alpha: f64);

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Srgb);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Srgb);

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Srgb);

    /// Fills the whole surface with `color` at `alpha`.
    ///
    /// With `alpha < 1` this fades the previous frame instead of clearing it,
    /// which is how the trail effect is produced.
    fn fade(&mut self, color: Srgb, alpha: f64) {
        let size = self.extent().size();
        self.set_global_alpha(alpha);
        self.fill_rect(DVec2::ZERO, size, color);
    }
}

/// One recorded draw call, with the global alpha in effect at the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Srgb,
        alpha: f64,
    },
    FillCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: Srgb,
        alpha: f64,
    },
    StrokeLine {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Srgb,
        alpha: f64,
    },
}

/// A surface that keeps a list of draw calls instead of pixels.
///
/// Used by the CLI `frame` command and throughout the tests to assert on
/// exactly what a scene drew.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    extent: Extent,
    alpha: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            alpha: 1.0,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops recorded commands, keeping size and alpha.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeLine { .. }))
    }
}

impl Surface for RecordingSurface {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn resize(&mut self, extent: Extent) {
        self.extent = extent;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Srgb) {
        self.commands.push(DrawCommand::FillRect {
            x: origin.x,
            y: origin.y,
            width: size.x,
            height: size.y,
            color,
            alpha: self.alpha,
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Srgb) {
        self.commands.push(DrawCommand::FillCircle {
            x: center.x,
            y: center.y,
            radius,
            color,
            alpha: self.alpha,
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Srgb) {
        self.commands.push(DrawCommand::StrokeLine {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
            width,
            color,
            alpha: self.alpha,
        });
    }
}
