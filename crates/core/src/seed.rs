//! Reproducible description of a rendered frame.
//!
//! A [`SceneSeed`] names the scene, the surface size, the parameter
//! overrides, the PRNG seed and how many ticks to run. Rendering the same
//! seed twice yields identical draw calls.

use crate::error::FolioError;
use crate::extent::Extent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneSeed {
    pub scene: String,
    pub width: usize,
    pub height: usize,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub ticks: usize,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl SceneSeed {
    /// Creates a seed with empty params and zero ticks.
    pub fn new(scene: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            scene: scene.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
            ticks: 0,
        }
    }

    pub fn with_ticks(mut self, ticks: usize) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    /// The surface size, or `FolioError::InvalidDimensions` for a zero side.
    pub fn extent(&self) -> Result<Extent, FolioError> {
        Extent::from_pixels(self.width, self.height)
    }

    /// Checks the dimensions and that `params` is a JSON object.
    pub fn validate(&self) -> Result<(), FolioError> {
        self.extent()?;
        if !self.params.is_object() {
            return Err(FolioError::ParamTypeMismatch {
                name: "params".into(),
                expected: "object".into(),
                got: crate::params::json_type_name(&self.params).into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_has_empty_params_and_no_ticks() {
        let s = SceneSeed::new("constellation", 1280, 720, 42);
        assert_eq!(s.scene, "constellation");
        assert_eq!(s.ticks, 0);
        assert_eq!(s.params, json!({}));
    }

    #[test]
    fn json_round_trip_with_params() {
        let s = SceneSeed::new("starfield", 640, 480, 7)
            .with_params(json!({"star_count": 120}))
            .with_ticks(300);
        let text = serde_json::to_string_pretty(&s).unwrap();
        let back: SceneSeed = serde_json::from_str(&text).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn missing_params_and_ticks_default() {
        let s: SceneSeed =
            serde_json::from_str(r#"{"scene":"drift","width":10,"height":10,"seed":1}"#).unwrap();
        assert_eq!(s.params, json!({}));
        assert_eq!(s.ticks, 0);
    }

    #[test]
    fn validate_rejects_zero_dimension() {
        assert!(SceneSeed::new("drift", 0, 10, 1).validate().is_err());
        assert!(SceneSeed::new("drift", 10, 0, 1).validate().is_err());
    }

    #[test]
    fn validate_rejects_non_object_params() {
        let s = SceneSeed::new("drift", 10, 10, 1).with_params(json!([1, 2]));
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn extent_matches_dimensions() {
        let e = SceneSeed::new("drift", 320, 200, 1).extent().unwrap();
        assert_eq!((e.width(), e.height()), (320.0, 200.0));
    }
}
