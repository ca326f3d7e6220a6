//! CPU rasteriser implementing [`Surface`] over an RGB buffer.
//!
//! Shapes are blended source-over with the current global alpha. Circle and
//! line edges get one pixel of coverage falloff, so sub-pixel particles and
//! hairline links still show up as faint dots and strokes instead of
//! vanishing. This module is always available (no feature gate); the `png`
//! snapshot path and tests both read pixels through it.

use folio_core::error::FolioError;
use folio_core::{DVec2, Extent, Srgb, Surface};

/// A width x height RGB framebuffer, initially black.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    extent: Extent,
    width: usize,
    height: usize,
    alpha: f64,
    pixels: Vec<Srgb>,
}

impl PixelSurface {
    pub fn new(width: usize, height: usize) -> Result<Self, FolioError> {
        let extent = Extent::from_pixels(width, height)?;
        Ok(Self::from_extent(extent))
    }

    /// Allocates a buffer covering `extent`, rounding fractional sizes up.
    pub fn from_extent(extent: Extent) -> Self {
        let width = (extent.width().ceil() as usize).max(1);
        let height = (extent.height().ceil() as usize).max(1);
        Self {
            extent,
            width,
            height,
            alpha: 1.0,
            pixels: vec![Srgb::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Srgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Row-major RGBA8 bytes with opaque alpha, `width * height * 4` long.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| {
                let [r, g, b] = c.to_rgb8();
                [r, g, b, 255u8]
            })
            .collect()
    }

    fn blend(&mut self, x: usize, y: usize, color: Srgb, coverage: f64) {
        let a = (self.alpha * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[y * self.width + x];
        dst.r = color.r * a + dst.r * (1.0 - a);
        dst.g = color.g * a + dst.g * (1.0 - a);
        dst.b = color.b * a + dst.b * (1.0 - a);
    }

    /// Pixel index range whose centres fall in `[lo, hi)`, clipped to `len`.
    fn span(lo: f64, hi: f64, len: usize) -> std::ops::Range<usize> {
        let start = (lo - 0.5).ceil().max(0.0);
        let end = (hi - 0.5).ceil().max(0.0).min(len as f64);
        (start as usize)..(end as usize).max(start as usize)
    }

    /// Calls `shade` with every pixel centre in the box `[min, max]` and
    /// blends by the returned coverage.
    fn shade_box(
        &mut self,
        min: DVec2,
        max: DVec2,
        color: Srgb,
        shade: impl Fn(DVec2) -> f64,
    ) {
        let xs = Self::span(min.x, max.x + 1.0, self.width);
        let ys = Self::span(min.y, max.y + 1.0, self.height);
        for y in ys {
            for x in xs.clone() {
                let centre = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = shade(centre);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage.min(1.0));
                }
            }
        }
    }
}

fn finite(p: DVec2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for PixelSurface {
    fn extent(&self) -> Extent {
        self.extent
    }

    /// Reallocates and clears, as resizing a canvas does.
    fn resize(&mut self, extent: Extent) {
        let alpha = self.alpha;
        *self = Self::from_extent(extent);
        self.alpha = alpha;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Srgb) {
        if !finite(origin) || !finite(size) {
            return;
        }
        let lo = origin.min(origin + size);
        let hi = origin.max(origin + size);
        let xs = Self::span(lo.x, hi.x, self.width);
        let ys = Self::span(lo.y, hi.y, self.height);
        for y in ys {
            for x in xs.clone() {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Srgb) {
        if !finite(center) || !radius.is_finite() || radius <= 0.0 {
            return;
        }
        let reach = DVec2::splat(radius + 0.5);
        self.shade_box(center - reach, center + reach, color, |p| {
            radius + 0.5 - p.distance(center)
        });
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Srgb) {
        if !finite(from) || !finite(to) || !width.is_finite() || width <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let reach = DVec2::splat(half + 0.5);
        self.shade_box(
            from.min(to) - reach,
            from.max(to) + reach,
            color,
            |p| half + 0.5 - segment_distance(p, from, to),
        );
    }
}
