//! [`Surface`] over a browser 2D canvas context.

use folio_core::{DVec2, Extent, Srgb, Surface};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    extent: Extent,
}

impl CanvasSurface {
    /// Acquires the canvas' 2D context and sizes the canvas to `extent`.
    ///
    /// Returns `None` when the browser cannot provide a 2D context.
    pub fn new(canvas: HtmlCanvasElement, extent: Extent) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let mut surface = Self {
            canvas,
            ctx,
            extent,
        };
        surface.resize(extent);
        Some(surface)
    }
}

/// Canvas backing stores are whole pixels.
fn canvas_side(v: f64) -> u32 {
    v.round().clamp(1.0, u32::MAX as f64) as u32
}

impl Surface for CanvasSurface {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn resize(&mut self, extent: Extent) {
        self.extent = extent;
        self.canvas.set_width(canvas_side(extent.width()));
        self.canvas.set_height(canvas_side(extent.height()));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Srgb) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(origin.x, origin.y, size.x, size.y);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Srgb) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        self.ctx.begin_path();
        // arc only fails for a negative radius
        if self
            .ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Srgb) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_line_width(width);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.stroke();
    }
}
