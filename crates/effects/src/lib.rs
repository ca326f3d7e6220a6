#![deny(unsafe_code)]
//! Small time- and pointer-driven page effects.
//!
//! Both effects are plain state machines with no clock or DOM of their own:
//! the host feeds elapsed milliseconds or pointer coordinates and reads back
//! the text or CSS transform to apply.

pub mod tilt;
pub mod typewriter;

pub use tilt::Tilt;
pub use typewriter::{Phase, Typewriter, TypewriterTiming};
