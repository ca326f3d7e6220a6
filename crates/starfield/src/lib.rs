#![deny(unsafe_code)]
//! Starfield: twinkling stars plus coloured motes riding slow waves.
//!
//! Two populations share one clock measured in seconds of real time:
//!
//! - **Stars** drift in straight lines, wrap at the edges, and twinkle with a
//!   brightness that depends on the clock and their horizontal position.
//! - **Motes** are larger blue-to-violet dots whose motion adds a sinusoidal
//!   sway to their own velocity. They wrap with a margin so they slide fully
//!   off-screen before reappearing on the other side.
//!
//! Unlike the constellation, every frame starts from a full clear, so there
//! are no trails.

use folio_core::error::FolioError;
use folio_core::params::{param_color, param_f64, param_usize};
use folio_core::{Animation, DVec2, Extent, Srgb, Surface, Xorshift64};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DEFAULT_STAR_COUNT: usize = 80;
const DEFAULT_MOTE_COUNT: usize = 25;
const DEFAULT_STAR_SPEED: f64 = 0.1;
const DEFAULT_MOTE_SPEED: f64 = 0.75;
const DEFAULT_HUE_MIN: f64 = 200.0;
const DEFAULT_HUE_MAX: f64 = 260.0;
/// Distance past an edge a mote travels before wrapping.
const DEFAULT_MOTE_MARGIN: f64 = 20.0;
const DEFAULT_BACKGROUND: Srgb = Srgb {
    r: 15.0 / 255.0,
    g: 15.0 / 255.0,
    b: 35.0 / 255.0,
};
const MOTE_SATURATION: f64 = 0.7;
const MOTE_LIGHTNESS: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarfieldParams {
    pub star_count: usize,
    pub mote_count: usize,
    pub star_speed: f64,
    pub mote_speed: f64,
    pub hue_min: f64,
    pub hue_max: f64,
    pub mote_margin: f64,
    pub star_color: Srgb,
    pub background: Srgb,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            star_count: DEFAULT_STAR_COUNT,
            mote_count: DEFAULT_MOTE_COUNT,
            star_speed: DEFAULT_STAR_SPEED,
            mote_speed: DEFAULT_MOTE_SPEED,
            hue_min: DEFAULT_HUE_MIN,
            hue_max: DEFAULT_HUE_MAX,
            mote_margin: DEFAULT_MOTE_MARGIN,
            star_color: Srgb::WHITE,
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl StarfieldParams {
    pub fn from_json(params: &Value) -> Result<Self, FolioError> {
        let hue_min = param_f64(params, "hue_min", DEFAULT_HUE_MIN);
        let hue_max = param_f64(params, "hue_max", DEFAULT_HUE_MAX);
        Ok(Self {
            star_count: param_usize(params, "star_count", DEFAULT_STAR_COUNT),
            mote_count: param_usize(params, "mote_count", DEFAULT_MOTE_COUNT),
            star_speed: param_f64(params, "star_speed", DEFAULT_STAR_SPEED).abs(),
            mote_speed: param_f64(params, "mote_speed", DEFAULT_MOTE_SPEED).abs(),
            hue_min: hue_min.min(hue_max),
            hue_max: hue_min.max(hue_max),
            mote_margin: param_f64(params, "mote_margin", DEFAULT_MOTE_MARGIN).max(0.0),
            star_color: param_color(params, "star_color", Srgb::WHITE)?,
            background: param_color(params, "background", DEFAULT_BACKGROUND)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub position: DVec2,
    pub velocity: DVec2,
    pub size: f64,
    pub base_opacity: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mote {
    pub position: DVec2,
    pub velocity: DVec2,
    pub size: f64,
    pub opacity: f64,
    /// Hue in degrees.
    pub hue: f64,
}

/// Star brightness multiplier in [0.4, 1.0].
fn twinkle(time: f64, x: f64) -> f64 {
    0.7 + 0.3 * (time * 3.0 + x * 0.01).sin()
}

/// Mote brightness multiplier in [0.6, 1.0].
fn mote_pulse(time: f64, x: f64) -> f64 {
    0.8 + 0.2 * (time * 2.0 + x * 0.02).sin()
}

/// Sends a coordinate that left `[lo, hi]` to the opposite bound.
fn wrap(value: f64, lo: f64, hi: f64) -> f64 {
    if value < lo {
        hi
    } else if value > hi {
        lo
    } else {
        value
    }
}

#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
    motes: Vec<Mote>,
    extent: Extent,
    /// Seconds since start.
    time: f64,
    params: StarfieldParams,
}

impl Starfield {
    pub fn new(extent: Extent, params: StarfieldParams, seed: u64) -> Self {
        let mut rng = Xorshift64::new(seed);
        let (w, h) = (extent.width(), extent.height());

        let stars = (0..params.star_count)
            .map(|_| {
                let position = rng.next_point(w, h);
                let velocity = DVec2::new(
                    rng.next_symmetric(params.star_speed),
                    rng.next_symmetric(params.star_speed),
                );
                let size = rng.next_range(0.5, 2.0);
                let base_opacity = rng.next_range(0.2, 1.0);
                Star {
                    position,
                    velocity,
                    size,
                    base_opacity,
                    opacity: base_opacity * twinkle(0.0, position.x),
                }
            })
            .collect();

        let motes = (0..params.mote_count)
            .map(|_| Mote {
                position: rng.next_point(w, h),
                velocity: DVec2::new(
                    rng.next_symmetric(params.mote_speed),
                    rng.next_symmetric(params.mote_speed),
                ),
                size: rng.next_range(1.0, 4.0),
                opacity: rng.next_range(0.2, 0.8),
                hue: rng.next_range(params.hue_min, params.hue_max),
            })
            .collect();

        Self {
            stars,
            motes,
            extent,
            time: 0.0,
            params,
        }
    }

    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, FolioError> {
        let extent = Extent::from_pixels(width, height)?;
        Ok(Self::new(extent, StarfieldParams::from_json(json_params)?, seed))
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    /// Clock in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn mote_color(&self, mote: &Mote) -> Srgb {
        Srgb::from_hsl(mote.hue, MOTE_SATURATION, MOTE_LIGHTNESS)
    }
}

impl Animation for Starfield {
    fn advance(&mut self, delta_ms: f64) {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.time += delta_ms / 1000.0;
        }
        let t = self.time;
        let (w, h) = (self.extent.width(), self.extent.height());

        for star in &mut self.stars {
            star.position += star.velocity;
            star.position.x = wrap(star.position.x, 0.0, w);
            star.position.y = wrap(star.position.y, 0.0, h);
            star.opacity = star.base_opacity * twinkle(t, star.position.x);
        }

        let margin = self.params.mote_margin;
        for mote in &mut self.motes {
            mote.position.x += mote.velocity.x + (t * 0.5 + mote.position.y * 0.01).sin() * 0.5;
            mote.position.y += mote.velocity.y + (t * 0.3 + mote.position.x * 0.01).cos() * 0.3;
            mote.position.x = wrap(mote.position.x, -margin, w + margin);
            mote.position.y = wrap(mote.position.y, -margin, h + margin);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.fade(self.params.background, 1.0);

        for star in &self.stars {
            surface.set_global_alpha(star.opacity);
            surface.fill_circle(star.position, star.size, self.params.star_color);
        }

        for mote in &self.motes {
            surface.set_global_alpha(mote.opacity * mote_pulse(self.time, mote.position.x));
            surface.fill_circle(mote.position, mote.size, self.mote_color(mote));
        }
    }

    fn resize(&mut self, extent: Extent) {
        self.extent = extent;
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "star_count": p.star_count,
            "mote_count": p.mote_count,
            "star_speed": p.star_speed,
            "mote_speed": p.mote_speed,
            "hue_min": p.hue_min,
            "hue_max": p.hue_max,
            "mote_margin": p.mote_margin,
            "star_color": p.star_color,
            "background": p.background,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "star_count": { "type": "integer", "default": DEFAULT_STAR_COUNT, "min": 0, "max": 1000, "description": "Number of stars" },
            "mote_count": { "type": "integer", "default": DEFAULT_MOTE_COUNT, "min": 0, "max": 500, "description": "Number of coloured motes" },
            "star_speed": { "type": "number", "default": DEFAULT_STAR_SPEED, "min": 0.0, "max": 5.0, "description": "Star velocity components are sampled from [-star_speed, star_speed)" },
            "mote_speed": { "type": "number", "default": DEFAULT_MOTE_SPEED, "min": 0.0, "max": 5.0, "description": "Mote velocity components are sampled from [-mote_speed, mote_speed)" },
            "hue_min": { "type": "number", "default": DEFAULT_HUE_MIN, "min": 0.0, "max": 360.0, "description": "Lowest mote hue in degrees" },
            "hue_max": { "type": "number", "default": DEFAULT_HUE_MAX, "min": 0.0, "max": 360.0, "description": "Highest mote hue in degrees" },
            "mote_margin": { "type": "number", "default": DEFAULT_MOTE_MARGIN, "min": 0.0, "max": 200.0, "description": "How far past an edge motes travel before wrapping" },
            "star_color": { "type": "color", "default": Srgb::WHITE, "description": "Star color" },
            "background": { "type": "color", "default": DEFAULT_BACKGROUND, "description": "Fill drawn at the start of every frame" }
        })
    }
}
