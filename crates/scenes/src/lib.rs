#![deny(unsafe_code)]
//! Scene registry: maps scene names to implementations and drives them
//! offline.
//!
//! This crate sits between `folio-core` (which defines the `Animation` and
//! `Surface` traits) and the individual scene crates. Both the CLI and the
//! browser host depend on it to avoid duplicating dispatch logic.

pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

use folio_constellation::Constellation;
use folio_core::error::FolioError;
use folio_core::{Animation, Animator, Extent, SceneSeed, Surface};
use folio_drift::Drift;
use folio_starfield::Starfield;
use serde_json::Value;

pub use raster::PixelSurface;

const SCENE_NAMES: &[&str] = &["constellation", "starfield", "drift"];

/// Simulated frame time used when scenes are driven without a display.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Every available scene.
///
/// Wraps each implementation and delegates `Animation` methods. Use
/// [`SceneKind::from_name`] for string-based construction (CLI, browser).
#[derive(Debug, Clone)]
pub enum SceneKind {
    /// Particle field with proximity links (hero background).
    Constellation(Constellation),
    /// Twinkling stars and coloured motes.
    Starfield(Starfield),
    /// Lissajous drift (project pages).
    Drift(Drift),
}

impl SceneKind {
    /// Builds a scene by name.
    ///
    /// Returns `FolioError::UnknownScene` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FolioError> {
        match name {
            "constellation" => Ok(SceneKind::Constellation(Constellation::from_json(
                width, height, seed, params,
            )?)),
            "starfield" => Ok(SceneKind::Starfield(Starfield::from_json(
                width, height, seed, params,
            )?)),
            "drift" => Ok(SceneKind::Drift(Drift::from_json(width, height, params)?)),
            _ => Err(FolioError::UnknownScene(name.to_string())),
        }
    }

    /// Builds the scene a seed describes. Ticks are not run.
    pub fn from_seed(seed: &SceneSeed) -> Result<Self, FolioError> {
        seed.validate()?;
        Self::from_name(&seed.scene, seed.width, seed.height, seed.seed, &seed.params)
    }

    pub fn list_scenes() -> &'static [&'static str] {
        SCENE_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Constellation(_) => "constellation",
            SceneKind::Starfield(_) => "starfield",
            SceneKind::Drift(_) => "drift",
        }
    }
}

impl Animation for SceneKind {
    fn advance(&mut self, delta_ms: f64) {
        match self {
            SceneKind::Constellation(s) => s.advance(delta_ms),
            SceneKind::Starfield(s) => s.advance(delta_ms),
            SceneKind::Drift(s) => s.advance(delta_ms),
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        match self {
            SceneKind::Constellation(s) => s.render(surface),
            SceneKind::Starfield(s) => s.render(surface),
            SceneKind::Drift(s) => s.render(surface),
        }
    }

    fn resize(&mut self, extent: Extent) {
        match self {
            SceneKind::Constellation(s) => s.resize(extent),
            SceneKind::Starfield(s) => s.resize(extent),
            SceneKind::Drift(s) => s.resize(extent),
        }
    }

    fn extent(&self) -> Extent {
        match self {
            SceneKind::Constellation(s) => s.extent(),
            SceneKind::Starfield(s) => s.extent(),
            SceneKind::Drift(s) => s.extent(),
        }
    }

    fn params(&self) -> Value {
        match self {
            SceneKind::Constellation(s) => s.params(),
            SceneKind::Starfield(s) => s.params(),
            SceneKind::Drift(s) => s.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            SceneKind::Constellation(s) => s.param_schema(),
            SceneKind::Starfield(s) => s.param_schema(),
            SceneKind::Drift(s) => s.param_schema(),
        }
    }
}

/// Runs `ticks` frames of `animation` on `surface` at a steady [`FRAME_MS`].
///
/// Frames accumulate on the surface exactly as they would on screen, so
/// trail effects are preserved. Call [`Animator::stop`] to take the surface
/// back.
pub fn play<A: Animation, S: Surface>(animation: A, surface: S, ticks: usize) -> Animator<A, S> {
    let mut animator = Animator::start(animation, Some(surface));
    for tick in 0..ticks {
        animator.frame(tick as f64 * FRAME_MS);
    }
    animator
}
