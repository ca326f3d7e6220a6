//! PNG output of a [`PixelSurface`].
//!
//! Feature-gated behind `png` (default on) so the browser build can use the
//! registry without pulling in the `image` crate.

use folio_core::error::FolioError;
use std::path::Path;

use crate::raster::PixelSurface;

/// Writes the surface as an RGBA PNG.
///
/// Returns `FolioError::InvalidDimensions` if a side overflows `u32`, or
/// `FolioError::Io` on write failure.
pub fn write_png(surface: &PixelSurface, path: &Path) -> Result<(), FolioError> {
    let w = u32::try_from(surface.width()).map_err(|_| FolioError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| FolioError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface.to_rgba8())
        .ok_or_else(|| FolioError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| FolioError::Io(format!("{}: {e}", path.display())))
}
