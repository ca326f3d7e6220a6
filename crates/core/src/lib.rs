#![deny(unsafe_code)]
//! Core types and traits for folio's decorative canvas scenes.
//!
//! Provides the `Animation` trait, the `Surface` drawing contract and a
//! recording implementation, the `Animator` start/stop lifecycle with
//! debounced resizing, `Extent`, `Srgb`, the `Xorshift64` PRNG, `SceneSeed`,
//! and parameter helpers.

pub mod animation;
pub mod animator;
pub mod color;
pub mod debounce;
pub mod error;
pub mod extent;
pub mod params;
pub mod prng;
pub mod seed;
pub mod surface;

pub use animation::Animation;
pub use animator::{Animator, AnimatorState};
pub use color::Srgb;
pub use debounce::ResizeDebouncer;
pub use error::FolioError;
pub use extent::Extent;
pub use prng::Xorshift64;
pub use seed::SceneSeed;
pub use surface::{DrawCommand, RecordingSurface, Surface};

pub use glam::DVec2;
