#![deny(unsafe_code)]
//! Constellation: a drifting, twinkling particle field with proximity links.
//!
//! A fixed set of particles drifts slowly across the surface. Particles that
//! touch an edge bounce back softly (velocity reversed and damped, position
//! clamped), each particle's opacity pulses on a shared clock with a per-index
//! phase, and every pair closer than `link_distance` is joined by a faint
//! line whose opacity falls off with distance. Each frame is drawn over a
//! translucent fill of the previous one, which leaves short trails.
//!
//! The per-tick update is a pure function of the current state: given the
//! same particles, clock and params, `advance` always produces the same
//! result.

pub mod links;

use std::str::FromStr;

use folio_core::error::FolioError;
use folio_core::params::{param_color, param_f64, param_string, param_usize};
use folio_core::{Animation, DVec2, Extent, Srgb, Surface, Xorshift64};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub use links::{Link, LinkStrategy};

const DEFAULT_COUNT: usize = 30;
/// Velocity components are sampled from `[-MAX_SPEED, MAX_SPEED)` px/tick.
const DEFAULT_MAX_SPEED: f64 = 0.15;
const DEFAULT_SIZE_MIN: f64 = 1.0;
const DEFAULT_SIZE_MAX: f64 = 2.5;
const DEFAULT_OPACITY_MIN: f64 = 0.2;
const DEFAULT_OPACITY_MAX: f64 = 0.5;
/// Fraction of speed kept after touching an edge.
const DEFAULT_DAMPING: f64 = 0.8;
/// Damping stays strictly inside (0, 1): a bounce always reverses and slows.
const DAMPING_MIN: f64 = 0.01;
const DAMPING_MAX: f64 = 0.99;
const DEFAULT_CLOCK_STEP: f64 = 0.005;
const DEFAULT_PHASE_SPACING: f64 = 0.3;
const DEFAULT_LINK_DISTANCE: f64 = 80.0;
const DEFAULT_LINK_OPACITY: f64 = 0.05;
const DEFAULT_LINK_WIDTH: f64 = 0.3;
const DEFAULT_TRAIL_ALPHA: f64 = 0.02;
const DEFAULT_COLOR: Srgb = Srgb {
    r: 6.0 / 255.0,
    g: 182.0 / 255.0,
    b: 212.0 / 255.0,
};
/// Frame length `TimeMode::Elapsed` normalises against (60 Hz).
const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

/// How a tick's `delta_ms` scales motion and the pulse clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    /// Every tick moves particles by exactly one velocity step and the clock
    /// by one `clock_step`, whatever the frame rate. Twinkle and drift run
    /// faster on high-refresh displays.
    #[default]
    PerFrame,
    /// Steps are scaled by `delta_ms / 16.667`, so speed is independent of
    /// the refresh rate.
    Elapsed,
}

impl TimeMode {
    /// Multiplier applied to velocity and clock step for one tick.
    pub fn factor(self, delta_ms: f64) -> f64 {
        match self {
            TimeMode::PerFrame => 1.0,
            TimeMode::Elapsed if delta_ms.is_finite() => delta_ms.max(0.0) / REFERENCE_FRAME_MS,
            TimeMode::Elapsed => 0.0,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            TimeMode::PerFrame => "per_frame",
            TimeMode::Elapsed => "elapsed",
        }
    }
}

impl FromStr for TimeMode {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_frame" => Ok(TimeMode::PerFrame),
            "elapsed" => Ok(TimeMode::Elapsed),
            other => Err(FolioError::ParamTypeMismatch {
                name: "time_mode".into(),
                expected: "\"per_frame\" or \"elapsed\"".into(),
                got: format!("{other:?}"),
            }),
        }
    }
}

impl LinkStrategy {
    fn as_str(self) -> &'static str {
        match self {
            LinkStrategy::Pairwise => "pairwise",
            LinkStrategy::Grid => "grid",
        }
    }
}

impl FromStr for LinkStrategy {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pairwise" => Ok(LinkStrategy::Pairwise),
            "grid" => Ok(LinkStrategy::Grid),
            other => Err(FolioError::ParamTypeMismatch {
                name: "link_strategy".into(),
                expected: "\"pairwise\" or \"grid\"".into(),
                got: format!("{other:?}"),
            }),
        }
    }
}

/// Tunable constants of the field.
///
/// [`Default`] reproduces the portfolio hero background: 30 cyan particles,
/// 80 px links, a 2% trail fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstellationParams {
    pub count: usize,
    pub max_speed: f64,
    pub size_min: f64,
    pub size_max: f64,
    pub opacity_min: f64,
    pub opacity_max: f64,
    pub damping: f64,
    pub clock_step: f64,
    pub phase_spacing: f64,
    pub link_distance: f64,
    pub link_opacity: f64,
    pub link_width: f64,
    pub trail_alpha: f64,
    pub color: Srgb,
    pub time_mode: TimeMode,
    pub link_strategy: LinkStrategy,
}

impl Default for ConstellationParams {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            max_speed: DEFAULT_MAX_SPEED,
            size_min: DEFAULT_SIZE_MIN,
            size_max: DEFAULT_SIZE_MAX,
            opacity_min: DEFAULT_OPACITY_MIN,
            opacity_max: DEFAULT_OPACITY_MAX,
            damping: DEFAULT_DAMPING,
            clock_step: DEFAULT_CLOCK_STEP,
            phase_spacing: DEFAULT_PHASE_SPACING,
            link_distance: DEFAULT_LINK_DISTANCE,
            link_opacity: DEFAULT_LINK_OPACITY,
            link_width: DEFAULT_LINK_WIDTH,
            trail_alpha: DEFAULT_TRAIL_ALPHA,
            color: DEFAULT_COLOR,
            time_mode: TimeMode::PerFrame,
            link_strategy: LinkStrategy::Pairwise,
        }
    }
}

impl ConstellationParams {
    /// Reads params from JSON, falling back to defaults for missing keys.
    ///
    /// Ranges are normalised so that `min <= max`, opacities are clamped to
    /// [0, 1], damping to [0.01, 0.99], and speeds and sizes are made
    /// non-negative.
    pub fn from_json(params: &Value) -> Result<Self, FolioError> {
        let time_mode = param_string(params, "time_mode", TimeMode::PerFrame.as_str()).parse()?;
        let link_strategy =
            param_string(params, "link_strategy", LinkStrategy::Pairwise.as_str()).parse()?;
        let raw = Self {
            count: param_usize(params, "count", DEFAULT_COUNT),
            max_speed: param_f64(params, "max_speed", DEFAULT_MAX_SPEED),
            size_min: param_f64(params, "size_min", DEFAULT_SIZE_MIN),
            size_max: param_f64(params, "size_max", DEFAULT_SIZE_MAX),
            opacity_min: param_f64(params, "opacity_min", DEFAULT_OPACITY_MIN),
            opacity_max: param_f64(params, "opacity_max", DEFAULT_OPACITY_MAX),
            damping: param_f64(params, "damping", DEFAULT_DAMPING),
            clock_step: param_f64(params, "clock_step", DEFAULT_CLOCK_STEP),
            phase_spacing: param_f64(params, "phase_spacing", DEFAULT_PHASE_SPACING),
            link_distance: param_f64(params, "link_distance", DEFAULT_LINK_DISTANCE),
            link_opacity: param_f64(params, "link_opacity", DEFAULT_LINK_OPACITY),
            link_width: param_f64(params, "link_width", DEFAULT_LINK_WIDTH),
            trail_alpha: param_f64(params, "trail_alpha", DEFAULT_TRAIL_ALPHA),
            color: param_color(params, "color", DEFAULT_COLOR)?,
            time_mode,
            link_strategy,
        };
        Ok(raw.normalized())
    }

    fn normalized(self) -> Self {
        let ordered = |a: f64, b: f64| if a <= b { (a, b) } else { (b, a) };
        let (size_min, size_max) = ordered(self.size_min.max(0.0), self.size_max.max(0.0));
        let (opacity_min, opacity_max) = ordered(
            self.opacity_min.clamp(0.0, 1.0),
            self.opacity_max.clamp(0.0, 1.0),
        );
        Self {
            max_speed: self.max_speed.abs(),
            size_min,
            size_max,
            opacity_min,
            opacity_max,
            damping: if self.damping.is_finite() {
                self.damping.clamp(DAMPING_MIN, DAMPING_MAX)
            } else {
                DEFAULT_DAMPING
            },
            link_distance: self.link_distance.max(0.0),
            link_opacity: self.link_opacity.clamp(0.0, 1.0),
            link_width: self.link_width.max(0.0),
            trail_alpha: self.trail_alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// One point of the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub size: f64,
    /// Peak opacity, fixed at creation.
    pub base_opacity: f64,
    /// Opacity for the current tick, always within `[0.6, 1.0] * base_opacity`.
    pub opacity: f64,
}

impl Particle {
    pub fn new(position: DVec2, velocity: DVec2, size: f64, base_opacity: f64) -> Self {
        let base_opacity = base_opacity.clamp(0.0, 1.0);
        Self {
            position,
            velocity,
            size,
            base_opacity,
            opacity: base_opacity,
        }
    }
}

/// Pulse multiplier in [0.6, 1.0] for particle `index` at `clock`.
pub fn pulse(clock: f64, index: usize, phase_spacing: f64) -> f64 {
    0.8 + 0.2 * (clock + index as f64 * phase_spacing).sin()
}

/// Reflects and damps a velocity component when its coordinate touches or
/// crosses `[0, limit]`, then clamps the coordinate. Returns whether it bounced.
fn bounce_axis(position: &mut f64, velocity: &mut f64, limit: f64, damping: f64) -> bool {
    if *position <= 0.0 || *position >= limit {
        *velocity *= -damping;
        *position = position.clamp(0.0, limit);
        true
    } else {
        false
    }
}

/// The particle field.
///
/// Particle count is fixed at construction. Resizing changes only the
/// extent; particles left outside are pulled back by the next tick's clamp.
#[derive(Debug, Clone)]
pub struct Constellation {
    particles: Vec<Particle>,
    extent: Extent,
    clock: f64,
    params: ConstellationParams,
}

impl Constellation {
    /// Scatters `params.count` particles uniformly over `extent`.
    pub fn new(extent: Extent, params: ConstellationParams, seed: u64) -> Self {
        let mut rng = Xorshift64::new(seed);
        let particles = (0..params.count)
            .map(|_| {
                let position = rng.next_point(extent.width(), extent.height());
                let velocity = DVec2::new(
                    rng.next_symmetric(params.max_speed),
                    rng.next_symmetric(params.max_speed),
                );
                let size = rng.next_range(params.size_min, params.size_max);
                let base_opacity = rng.next_range(params.opacity_min, params.opacity_max);
                Particle::new(position, velocity, size, base_opacity)
            })
            .collect();
        Self::from_particles(extent, params, particles)
    }

    /// Builds a field from explicit particles. `params.count` is ignored.
    pub fn from_particles(
        extent: Extent,
        params: ConstellationParams,
        particles: Vec<Particle>,
    ) -> Self {
        let mut field = Self {
            params: ConstellationParams {
                count: particles.len(),
                ..params
            },
            particles,
            extent,
            clock: 0.0,
        };
        field.update_opacities();
        field
    }

    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, FolioError> {
        let extent = Extent::from_pixels(width, height)?;
        Ok(Self::new(
            extent,
            ConstellationParams::from_json(json_params)?,
            seed,
        ))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn settings(&self) -> &ConstellationParams {
        &self.params
    }

    /// Links for the current positions, ordered by `(a, b)`.
    pub fn links(&self) -> Vec<Link> {
        let points: Vec<DVec2> = self.particles.iter().map(|p| p.position).collect();
        links::find_links(
            self.params.link_strategy,
            &points,
            self.params.link_distance,
            self.params.link_opacity,
        )
    }

    fn update_opacities(&mut self) {
        let clock = self.clock;
        let spacing = self.params.phase_spacing;
        for (i, p) in self.particles.iter_mut().enumerate() {
            p.opacity = p.base_opacity * pulse(clock, i, spacing);
        }
    }
}

impl Animation for Constellation {
    fn advance(&mut self, delta_ms: f64) {
        let factor = self.params.time_mode.factor(delta_ms);
        let size = self.extent.size();
        let damping = self.params.damping;

        for p in &mut self.particles {
            p.position += p.velocity * factor;
            bounce_axis(&mut p.position.x, &mut p.velocity.x, size.x, damping);
            bounce_axis(&mut p.position.y, &mut p.velocity.y, size.y, damping);
        }

        self.clock += self.params.clock_step * factor;
        self.update_opacities();
    }

    fn render(&self, surface: &mut dyn Surface) {
        let color = self.params.color;
        surface.fade(Srgb::BLACK, self.params.trail_alpha);

        for p in &self.particles {
            surface.set_global_alpha(p.opacity);
            surface.fill_circle(p.position, p.size, color);
        }

        for link in self.links() {
            surface.set_global_alpha(link.opacity);
            surface.stroke_line(
                self.particles[link.a].position,
                self.particles[link.b].position,
                self.params.link_width,
                color,
            );
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
            "count": p.count,
            "max_speed": p.max_speed,
            "size_min": p.size_min,
            "size_max": p.size_max,
            "opacity_min": p.opacity_min,
            "opacity_max": p.opacity_max,
            "damping": p.damping,
            "clock_step": p.clock_step,
            "phase_spacing": p.phase_spacing,
            "link_distance": p.link_distance,
            "link_opacity": p.link_opacity,
            "link_width": p.link_width,
            "trail_alpha": p.trail_alpha,
            "color": p.color,
            "time_mode": p.time_mode,
            "link_strategy": p.link_strategy,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "count": {
                "type": "integer",
                "default": DEFAULT_COUNT,
                "min": 0,
                "max": 500,
                "description": "Number of particles, fixed for the lifetime of the field"
            },
            "max_speed": {
                "type": "number",
                "default": DEFAULT_MAX_SPEED,
                "min": 0.0,
                "max": 5.0,
                "description": "Velocity components are sampled from [-max_speed, max_speed) px per tick"
            },
            "size_min": { "type": "number", "default": DEFAULT_SIZE_MIN, "min": 0.0, "max": 20.0, "description": "Smallest particle radius" },
            "size_max": { "type": "number", "default": DEFAULT_SIZE_MAX, "min": 0.0, "max": 20.0, "description": "Largest particle radius" },
            "opacity_min": { "type": "number", "default": DEFAULT_OPACITY_MIN, "min": 0.0, "max": 1.0, "description": "Lowest peak opacity" },
            "opacity_max": { "type": "number", "default": DEFAULT_OPACITY_MAX, "min": 0.0, "max": 1.0, "description": "Highest peak opacity" },
            "damping": {
                "type": "number",
                "default": DEFAULT_DAMPING,
                "min": DAMPING_MIN,
                "max": DAMPING_MAX,
                "description": "Fraction of speed kept after touching an edge"
            },
            "clock_step": {
                "type": "number",
                "default": DEFAULT_CLOCK_STEP,
                "min": 0.0,
                "max": 0.1,
                "description": "Pulse clock increment per tick"
            },
            "phase_spacing": {
                "type": "number",
                "default": DEFAULT_PHASE_SPACING,
                "min": 0.0,
                "max": 6.3,
                "description": "Pulse phase offset between consecutive particles"
            },
            "link_distance": {
                "type": "number",
                "default": DEFAULT_LINK_DISTANCE,
                "min": 0.0,
                "max": 400.0,
                "description": "Pairs closer than this are joined by a line"
            },
            "link_opacity": {
                "type": "number",
                "default": DEFAULT_LINK_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Line opacity at zero distance"
            },
            "link_width": { "type": "number", "default": DEFAULT_LINK_WIDTH, "min": 0.0, "max": 5.0, "description": "Line width in px" },
            "trail_alpha": {
                "type": "number",
                "default": DEFAULT_TRAIL_ALPHA,
                "min": 0.0,
                "max": 1.0,
                "description": "Alpha of the black fill drawn over the previous frame; 1 clears it"
            },
            "color": { "type": "color", "default": DEFAULT_COLOR, "description": "Particle and line color" },
            "time_mode": {
                "type": "enum",
                "values": ["per_frame", "elapsed"],
                "default": "per_frame",
                "description": "per_frame: fixed step per tick; elapsed: scaled by frame time"
            },
            "link_strategy": {
                "type": "enum",
                "values": ["pairwise", "grid"],
                "default": "pairwise",
                "description": "Neighbour search used for links"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{DrawCommand, RecordingSurface};

    fn extent(w: f64, h: f64) -> Extent {
        Extent::new(w, h).unwrap()
    }

    fn still(x: f64, y: f64) -> Particle {
        Particle::new(DVec2::new(x, y), DVec2::ZERO, 1.5, 0.4)
    }

    fn field(w: f64, h: f64, seed: u64) -> Constellation {
        Constellation::new(extent(w, h), ConstellationParams::default(), seed)
    }

    // ---- Construction ----

    #[test]
    fn new_creates_requested_count_inside_extent() {
        let f = field(640.0, 480.0, 42);
        assert_eq!(f.particles().len(), DEFAULT_COUNT);
        for p in f.particles() {
            assert!(f.extent().contains(p.position));
            assert!(p.velocity.x.abs() <= DEFAULT_MAX_SPEED);
            assert!(p.velocity.y.abs() <= DEFAULT_MAX_SPEED);
            assert!((DEFAULT_SIZE_MIN..DEFAULT_SIZE_MAX).contains(&p.size));
            assert!((DEFAULT_OPACITY_MIN..DEFAULT_OPACITY_MAX).contains(&p.base_opacity));
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = field(300.0, 200.0, 7);
        let b = field(300.0, 200.0, 7);
        assert_eq!(a.particles(), b.particles());
        let c = field(300.0, 200.0, 8);
        assert_ne!(a.particles(), c.particles());
    }

    #[test]
    fn zero_count_is_an_empty_field() {
        let params = ConstellationParams {
            count: 0,
            ..Default::default()
        };
        let mut f = Constellation::new(extent(10.0, 10.0), params, 1);
        f.advance(16.0);
        let mut s = RecordingSurface::new(f.extent());
        f.render(&mut s);
        assert_eq!(s.commands().len(), 1, "only the trail fill");
    }

    #[test]
    fn from_json_uses_defaults_for_empty_object() {
        let f = Constellation::from_json(100, 100, 1, &json!({})).unwrap();
        assert_eq!(*f.settings(), ConstellationParams::default());
    }

    #[test]
    fn from_json_reads_overrides() {
        let f = Constellation::from_json(
            100,
            100,
            1,
            &json!({
                "count": 12,
                "link_distance": 120.0,
                "color": "#ff00aa",
                "time_mode": "elapsed",
                "link_strategy": "grid"
            }),
        )
        .unwrap();
        assert_eq!(f.particles().len(), 12);
        assert_eq!(f.settings().link_distance, 120.0);
        assert_eq!(f.settings().color.to_rgb8(), [255, 0, 170]);
        assert_eq!(f.settings().time_mode, TimeMode::Elapsed);
        assert_eq!(f.settings().link_strategy, LinkStrategy::Grid);
    }

    #[test]
    fn from_json_rejects_unknown_enum_value() {
        let err = Constellation::from_json(100, 100, 1, &json!({"link_strategy": "octree"}))
            .unwrap_err();
        assert!(err.to_string().contains("octree"));
    }

    #[test]
    fn from_json_rejects_zero_dimensions() {
        assert!(matches!(
            Constellation::from_json(0, 100, 1, &json!({})),
            Err(FolioError::InvalidDimensions)
        ));
    }

    #[test]
    fn from_json_normalises_ranges() {
        let p = ConstellationParams::from_json(&json!({
            "size_min": 4.0,
            "size_max": 2.0,
            "opacity_max": 3.0,
            "damping": 1.7,
            "max_speed": -0.5
        }))
        .unwrap();
        assert_eq!((p.size_min, p.size_max), (2.0, 4.0));
        assert_eq!(p.opacity_max, 1.0);
        assert_eq!(p.damping, DAMPING_MAX);
        assert_eq!(p.max_speed, 0.5);
    }

    #[test]
    fn configured_damping_still_slows_every_bounce() {
        for damping in [0.0, 1.0, 1.7, -3.0] {
            let params = ConstellationParams::from_json(&json!({ "damping": damping })).unwrap();
            assert!(params.damping > 0.0 && params.damping < 1.0);
            let p = Particle::new(DVec2::new(199.9, 50.0), DVec2::new(0.5, 0.0), 1.0, 0.3);
            let mut f = Constellation::from_particles(extent(200.0, 100.0), params, vec![p]);
            f.advance(16.0);
            let v = f.particles()[0].velocity.x;
            assert!(v < 0.0, "damping {damping} gave vx={v}");
            assert!(v.abs() < 0.5);
        }
    }

    // ---- Update ----

    #[test]
    fn bounce_scenario_reflects_and_clamps() {
        let p = Particle::new(DVec2::new(199.9, 50.0), DVec2::new(0.5, 0.0), 1.0, 0.3);
        let mut f = Constellation::from_particles(
            extent(200.0, 200.0),
            ConstellationParams::default(),
            vec![p],
        );
        f.advance(16.0);
        let after = f.particles()[0];
        assert!(after.velocity.x < 0.0);
        assert!((after.velocity.x + 0.4).abs() < 1e-12);
        assert!(after.position.x <= 200.0);
        assert_eq!(after.position.y, 50.0);
    }

    #[test]
    fn bounce_off_left_edge() {
        let p = Particle::new(DVec2::new(0.1, 50.0), DVec2::new(-0.5, 0.0), 1.0, 0.3);
        let mut f = Constellation::from_particles(
            extent(200.0, 200.0),
            ConstellationParams::default(),
            vec![p],
        );
        f.advance(16.0);
        let after = f.particles()[0];
        assert_eq!(after.position.x, 0.0);
        assert!((after.velocity.x - 0.4).abs() < 1e-12);
        f.advance(16.0);
        assert!(f.particles()[0].position.x > 0.0);
    }

    #[test]
    fn interior_particle_moves_by_velocity() {
        let p = Particle::new(DVec2::new(50.0, 50.0), DVec2::new(0.1, -0.2), 1.0, 0.3);
        let mut f = Constellation::from_particles(
            extent(200.0, 200.0),
            ConstellationParams::default(),
            vec![p],
        );
        f.advance(16.0);
        let pos = f.particles()[0].position;
        assert!((pos.x - 50.1).abs() < 1e-12);
        assert!((pos.y - 49.8).abs() < 1e-12);
    }

    #[test]
    fn per_frame_mode_ignores_delta() {
        let mut a = field(300.0, 300.0, 3);
        let mut b = a.clone();
        a.advance(8.0);
        b.advance(33.0);
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.clock(), DEFAULT_CLOCK_STEP);
    }

    #[test]
    fn elapsed_mode_scales_by_frame_time() {
        let params = ConstellationParams {
            time_mode: TimeMode::Elapsed,
            ..Default::default()
        };
        let p = Particle::new(DVec2::new(50.0, 50.0), DVec2::new(0.1, 0.0), 1.0, 0.3);
        let mut f = Constellation::from_particles(extent(200.0, 200.0), params, vec![p]);
        f.advance(2.0 * REFERENCE_FRAME_MS);
        assert!((f.particles()[0].position.x - 50.2).abs() < 1e-9);
        assert!((f.clock() - 2.0 * DEFAULT_CLOCK_STEP).abs() < 1e-12);
    }

    #[test]
    fn elapsed_mode_treats_bad_delta_as_zero() {
        assert_eq!(TimeMode::Elapsed.factor(f64::NAN), 0.0);
        assert_eq!(TimeMode::Elapsed.factor(-5.0), 0.0);
    }

    #[test]
    fn clock_advances_fixed_step_and_never_resets() {
        let mut f = field(100.0, 100.0, 1);
        for _ in 0..1000 {
            f.advance(16.0);
        }
        assert!((f.clock() - 1000.0 * DEFAULT_CLOCK_STEP).abs() < 1e-9);
        f.resize(extent(50.0, 50.0));
        assert!((f.clock() - 1000.0 * DEFAULT_CLOCK_STEP).abs() < 1e-9);
    }

    #[test]
    fn opacity_is_deterministic_in_clock_and_index() {
        let mut f = field(100.0, 100.0, 5);
        f.advance(16.0);
        for (i, p) in f.particles().iter().enumerate() {
            let expected = p.base_opacity * (0.8 + 0.2 * (f.clock() + i as f64 * 0.3).sin());
            assert!((p.opacity - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn particle_count_is_constant() {
        let mut f = field(100.0, 100.0, 9);
        for _ in 0..100 {
            f.advance(16.0);
        }
        f.resize(extent(20.0, 20.0));
        f.advance(16.0);
        assert_eq!(f.particles().len(), DEFAULT_COUNT);
    }

    // ---- Resize ----

    #[test]
    fn resize_does_not_touch_particles() {
        let mut f = field(400.0, 400.0, 11);
        let before = f.particles().to_vec();
        f.resize(extent(100.0, 100.0));
        assert_eq!(f.particles(), &before[..]);
        assert_eq!(f.extent(), extent(100.0, 100.0));
    }

    #[test]
    fn repeated_resize_is_idempotent() {
        let mut once = field(400.0, 400.0, 12);
        let mut twice = once.clone();
        once.resize(extent(150.0, 120.0));
        twice.resize(extent(150.0, 120.0));
        twice.resize(extent(150.0, 120.0));
        assert_eq!(once.particles(), twice.particles());
        once.advance(16.0);
        twice.advance(16.0);
        assert_eq!(once.particles(), twice.particles());
    }

    #[test]
    fn shrink_pulls_particles_back_on_next_tick() {
        let mut f = field(400.0, 400.0, 13);
        f.resize(extent(50.0, 50.0));
        f.advance(16.0);
        for p in f.particles() {
            assert!(f.extent().contains(p.position), "{:?}", p.position);
        }
    }

    // ---- Render ----

    #[test]
    fn three_particle_scenario_draws_one_link() {
        let mut f = Constellation::from_particles(
            extent(200.0, 200.0),
            ConstellationParams::default(),
            vec![still(0.0, 0.0), still(5.0, 5.0), still(100.0, 100.0)],
        );
        let mut s = RecordingSurface::new(f.extent());
        for _ in 0..3 {
            f.advance(16.0);
            s.clear();
            f.render(&mut s);
            let lines: Vec<_> = s.lines().cloned().collect();
            assert_eq!(lines.len(), 1);
            match lines[0] {
                DrawCommand::StrokeLine {
                    x1, y1, x2, y2, width, ..
                } => {
                    assert_eq!((x1, y1, x2, y2), (0.0, 0.0, 5.0, 5.0));
                    assert_eq!(width, DEFAULT_LINK_WIDTH);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn render_order_is_fade_then_circles_then_lines() {
        let f = Constellation::from_particles(
            extent(200.0, 200.0),
            ConstellationParams::default(),
            vec![still(10.0, 10.0), still(20.0, 10.0)],
        );
        let mut s = RecordingSurface::new(f.extent());
        f.render(&mut s);
        let cmds = s.commands();
        assert_eq!(cmds.len(), 4);
        assert!(
            matches!(cmds[0], DrawCommand::FillRect { alpha, width, height, .. }
            if alpha == DEFAULT_TRAIL_ALPHA && width == 200.0 && height == 200.0)
        );
        assert!(matches!(cmds[1], DrawCommand::FillCircle { .. }));
        assert!(matches!(cmds[2], DrawCommand::FillCircle { .. }));
        assert!(matches!(cmds[3], DrawCommand::StrokeLine { .. }));
    }

    #[test]
    fn circles_use_current_opacity_and_size() {
        let f = field(200.0, 200.0, 21);
        let mut s = RecordingSurface::new(f.extent());
        f.render(&mut s);
        let circles: Vec<_> = s.circles().cloned().collect();
        assert_eq!(circles.len(), f.particles().len());
        for (cmd, p) in circles.iter().zip(f.particles()) {
            match cmd {
                DrawCommand::FillCircle {
                    x, y, radius, alpha, ..
                } => {
                    assert_eq!((*x, *y), (p.position.x, p.position.y));
                    assert_eq!(*radius, p.size);
                    assert!((alpha - p.opacity).abs() < 1e-15);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn link_alpha_falls_off_with_distance() {
        let f = Constellation::from_particles(
            extent(200.0, 200.0),
            ConstellationParams::default(),
            vec![still(10.0, 10.0), still(50.0, 10.0)],
        );
        let mut s = RecordingSurface::new(f.extent());
        f.render(&mut s);
        match s.lines().next() {
            Some(DrawCommand::StrokeLine { alpha, .. }) => {
                assert!((alpha - 0.025).abs() < 1e-12);
            }
            other => panic!("expected a line, got {other:?}"),
        };
    }

    #[test]
    fn grid_strategy_renders_the_same_frame() {
        let pairwise = field(300.0, 200.0, 77);
        let grid = Constellation::from_particles(
            pairwise.extent(),
            ConstellationParams {
                link_strategy: LinkStrategy::Grid,
                ..Default::default()
            },
            pairwise.particles().to_vec(),
        );
        let mut a = RecordingSurface::new(pairwise.extent());
        let mut b = RecordingSurface::new(grid.extent());
        pairwise.render(&mut a);
        grid.render(&mut b);
        assert_eq!(a.commands(), b.commands());
    }

    #[test]
    fn params_and_schema_cover_the_same_keys() {
        let f = field(100.0, 100.0, 1);
        let params = f.params();
        let schema = f.param_schema();
        let keys: Vec<_> = params.as_object().unwrap().keys().collect();
        for key in keys {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
        assert_eq!(params["color"], "#06b6d4");
        assert_eq!(params["time_mode"], "per_frame");
    }

    #[test]
    fn object_safety() {
        let boxed: Box<dyn Animation> = Box::new(field(64.0, 64.0, 1));
        assert_eq!(boxed.extent().width(), 64.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn positions_stay_inside_extent(
                seed: u64,
                w in 1.0_f64..800.0,
                h in 1.0_f64..800.0,
                speed in 0.0_f64..20.0,
                ticks in 1_usize..200,
            ) {
                let params = ConstellationParams { max_speed: speed, ..Default::default() };
                let mut f = Constellation::new(extent(w, h), params, seed);
                for _ in 0..ticks {
                    f.advance(16.0);
                    for p in f.particles() {
                        prop_assert!(p.position.x >= 0.0 && p.position.x <= w);
                        prop_assert!(p.position.y >= 0.0 && p.position.y <= h);
                    }
                }
            }

            #[test]
            fn opacity_never_exceeds_base(seed: u64, ticks in 1_usize..2_000) {
                let mut f = field(200.0, 200.0, seed);
                for _ in 0..ticks {
                    f.advance(16.0);
                }
                for p in f.particles() {
                    prop_assert!(p.opacity >= 0.0);
                    prop_assert!(p.opacity <= p.base_opacity);
                    prop_assert!(p.opacity >= 0.6 * p.base_opacity - 1e-12);
                }
            }

            #[test]
            fn bounce_flips_sign_and_damps(
                x in 0.0_f64..200.0,
                vx in prop_oneof![-5.0_f64..-0.01, 0.01_f64..5.0],
            ) {
                let p = Particle::new(DVec2::new(x, 100.0), DVec2::new(vx, 0.0), 1.0, 0.3);
                let mut f = Constellation::from_particles(
                    extent(200.0, 200.0),
                    ConstellationParams::default(),
                    vec![p],
                );
                f.advance(16.0);
                let after = f.particles()[0];
                let crossed = x + vx <= 0.0 || x + vx >= 200.0;
                if crossed {
                    prop_assert!(after.velocity.x.signum() == -vx.signum());
                    prop_assert!(after.velocity.x.abs() < vx.abs());
                } else {
                    prop_assert_eq!(after.velocity.x, vx);
                }
            }

            #[test]
            fn links_agree_between_strategies_after_motion(seed: u64, ticks in 0_usize..50) {
                let mut f = Constellation::new(
                    extent(400.0, 300.0),
                    ConstellationParams { count: 80, max_speed: 2.0, ..Default::default() },
                    seed,
                );
                for _ in 0..ticks {
                    f.advance(16.0);
                }
                let points: Vec<DVec2> = f.particles().iter().map(|p| p.position).collect();
                prop_assert_eq!(
                    links::grid_links(&points, 80.0, 0.05),
                    links::pairwise_links(&points, 80.0, 0.05)
                );
            }
        }
    }
}
