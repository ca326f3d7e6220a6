//! 3D hover tilt for cards.

use serde::{Deserialize, Serialize};

/// Pointer offset from the card centre is divided by this to get degrees.
const DEGREES_DIVISOR: f64 = 10.0;
const PERSPECTIVE_PX: f64 = 1000.0;

/// Card rotation in degrees. The default is flat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    /// Rotation for a pointer at `(x, y)` relative to the card's top-left
    /// corner. The card leans away from the pointer's side on both axes.
    pub fn from_pointer(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            rotate_x: (y - height / 2.0) / DEGREES_DIVISOR,
            rotate_y: (width / 2.0 - x) / DEGREES_DIVISOR,
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, width: f64, height: f64) {
        *self = Self::from_pointer(x, y, width, height);
    }

    pub fn pointer_leave(&mut self) {
        *self = Self::default();
    }

    /// CSS `transform` value.
    pub fn to_css(&self) -> String {
        format!(
            "perspective({PERSPECTIVE_PX}px) rotateX({}deg) rotateY({}deg)",
            self.rotate_x, self.rotate_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_is_flat() {
        let t = Tilt::from_pointer(150.0, 100.0, 300.0, 200.0);
        assert_eq!(t, Tilt::default());
    }

    #[test]
    fn corners_tilt_by_tenth_of_offset() {
        let t = Tilt::from_pointer(0.0, 0.0, 300.0, 200.0);
        assert_eq!(t.rotate_x, -10.0);
        assert_eq!(t.rotate_y, 15.0);
        let t = Tilt::from_pointer(300.0, 200.0, 300.0, 200.0);
        assert_eq!(t.rotate_x, 10.0);
        assert_eq!(t.rotate_y, -15.0);
    }

    #[test]
    fn leave_resets() {
        let mut t = Tilt::default();
        t.pointer_move(10.0, 190.0, 300.0, 200.0);
        assert_ne!(t, Tilt::default());
        t.pointer_leave();
        assert_eq!(t, Tilt::default());
    }

    #[test]
    fn css_transform_format() {
        let t = Tilt::from_pointer(125.0, 125.0, 300.0, 200.0);
        assert_eq!(
            t.to_css(),
            "perspective(1000px) rotateX(2.5deg) rotateY(2.5deg)"
        );
        assert_eq!(
            Tilt::default().to_css(),
            "perspective(1000px) rotateX(0deg) rotateY(0deg)"
        );
    }
}
