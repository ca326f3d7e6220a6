//! Error types for folio core.

use thiserror::Error;

/// Errors produced by scene construction and configuration.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Width or height was zero, negative, or not finite.
    #[error("invalid dimensions: width and height must be finite and greater than zero")]
    InvalidDimensions,

    /// A scene name did not match any registered scene.
    #[error("unknown scene: {0}")]
    UnknownScene(String),

    /// A required parameter was missing from the params object.
    #[error("parameter not found: {0}")]
    ParamNotFound(String),

    /// A parameter existed but had the wrong JSON type or an unusable value.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Reading or writing an artifact (snapshot, seed file) failed.
    #[error("i/o error: {0}")]
    Io(String),
}
