use image::RgbaImage;
use image::imageops;

use crate::error::{EditorError, EditorResult};

/// Merges the vector layer over the base image.
///
/// Both rasters must have the same dimensions. The base is copied first
/// and the layer is alpha-blended on top of it; nothing else is applied.
pub fn merge(base: &RgbaImage, layer: &RgbaImage) -> EditorResult<RgbaImage> {
    if base.dimensions() != layer.dimensions() {
        let (bw, bh) = base.dimensions();
        let (lw, lh) = layer.dimensions();
        return Err(EditorError::ExportFailure(format!(
            "base image is {bw}x{bh} but vector layer is {lw}x{lh}"
        )));
    }

    let mut output = base.clone();
    imageops::overlay(&mut output, layer, 0, 0);
    log::debug!("Merged {}x{} export raster", output.width(), output.height());
    Ok(output)
}
