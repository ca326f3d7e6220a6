#![deny(unsafe_code)]
//! Drift: points tracing slow Lissajous paths over a fading canvas.
//!
//! There is no per-point state. Each point's position, radius, alpha and
//! colour are closed-form functions of the shared clock and the point's
//! index, so two fields at the same clock always draw the same frame and no
//! PRNG is involved.

use folio_core::error::FolioError;
use folio_core::params::{param_f64, param_usize};
use folio_core::{Animation, DVec2, Extent, Srgb, Surface};
use serde_json::{json, Value};

const DEFAULT_COUNT: usize = 50;
const DEFAULT_TIME_STEP: f64 = 0.01;
const DEFAULT_FADE_ALPHA: f64 = 0.1;
const DEFAULT_MAX_ALPHA: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftParams {
    pub count: usize,
    /// Clock increment per tick, independent of frame time.
    pub time_step: f64,
    pub fade_alpha: f64,
    pub max_alpha: f64,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            time_step: DEFAULT_TIME_STEP,
            fade_alpha: DEFAULT_FADE_ALPHA,
            max_alpha: DEFAULT_MAX_ALPHA,
        }
    }
}

impl DriftParams {
    pub fn from_json(params: &Value) -> Self {
        Self {
            count: param_usize(params, "count", DEFAULT_COUNT),
            time_step: param_f64(params, "time_step", DEFAULT_TIME_STEP),
            fade_alpha: param_f64(params, "fade_alpha", DEFAULT_FADE_ALPHA).clamp(0.0, 1.0),
            max_alpha: param_f64(params, "max_alpha", DEFAULT_MAX_ALPHA).clamp(0.0, 1.0),
        }
    }
}

/// Where and how point `index` is drawn at a given clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftPoint {
    pub position: DVec2,
    pub radius: f64,
    pub alpha: f64,
    pub color: Srgb,
}

/// Colour of point `index`; constant over time.
pub fn point_color(index: usize) -> Srgb {
    let i = index as f64;
    let channel = |v: f64| v.clamp(0.0, 255.0) / 255.0;
    Srgb {
        r: channel(100.0 + i.sin() * 155.0),
        g: channel(150.0 + i.cos() * 105.0),
        b: 1.0,
    }
}

#[derive(Debug, Clone)]
pub struct Drift {
    extent: Extent,
    time: f64,
    params: DriftParams,
}

impl Drift {
    pub fn new(extent: Extent, params: DriftParams) -> Self {
        Self {
            extent,
            time: 0.0,
            params,
        }
    }

    pub fn from_json(width: usize, height: usize, json_params: &Value) -> Result<Self, FolioError> {
        let extent = Extent::from_pixels(width, height)?;
        Ok(Self::new(extent, DriftParams::from_json(json_params)))
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn point(&self, index: usize) -> DriftPoint {
        let t = self.time;
        let i = index as f64;
        let size = self.extent.size();
        DriftPoint {
            position: DVec2::new(
                ((t + i).sin() * 0.5 + 0.5) * size.x,
                ((t * 0.7 + i).cos() * 0.5 + 0.5) * size.y,
            ),
            radius: (t * 2.0 + i).sin() * 2.0 + 3.0,
            alpha: ((t + i).sin() * 0.5 + 0.5) * self.params.max_alpha,
            color: point_color(index),
        }
    }

    pub fn points(&self) -> impl Iterator<Item = DriftPoint> + '_ {
        (0..self.params.count).map(|i| self.point(i))
    }
}

impl Animation for Drift {
    fn advance(&mut self, _delta_ms: f64) {
        self.time += self.params.time_step;
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.fade(Srgb::BLACK, self.params.fade_alpha);
        for p in self.points() {
            surface.set_global_alpha(p.alpha);
            surface.fill_circle(p.position, p.radius, p.color);
        }
    }

    fn resize(&mut self, extent: Extent) {
        self.extent = extent;
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn params(&self) -> Value {
        json!({
            "count": self.params.count,
            "time_step": self.params.time_step,
            "fade_alpha": self.params.fade_alpha,
            "max_alpha": self.params.max_alpha,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "count": { "type": "integer", "default": DEFAULT_COUNT, "min": 0, "max": 500, "description": "Number of points" },
            "time_step": { "type": "number", "default": DEFAULT_TIME_STEP, "min": 0.0, "max": 0.2, "description": "Clock increment per tick" },
            "fade_alpha": { "type": "number", "default": DEFAULT_FADE_ALPHA, "min": 0.0, "max": 1.0, "description": "Alpha of the black fill over the previous frame" },
            "max_alpha": { "type": "number", "default": DEFAULT_MAX_ALPHA, "min": 0.0, "max": 1.0, "description": "Peak point opacity" }
        })
    }
}
