use std::path::{Path, PathBuf};

use eframe::egui;
use image::RgbaImage;

use crate::error::EditorResult;

/// A decoded base image ready to annotate
pub struct LoadedImage {
    pub name: String,
    pub path: Option<PathBuf>,
    pub image: RgbaImage,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("size", &self.image.dimensions())
            .finish()
    }
}

/// Opens and decodes an image file from disk
pub fn load_image_file(path: &Path) -> EditorResult<LoadedImage> {
    log::info!("Loading image from path: {}", path.display());
    let image = image::open(path)?.to_rgba8();
    log::debug!("Successfully decoded image: {}x{}", image.width(), image.height());
    Ok(LoadedImage {
        name: path.display().to_string(),
        path: Some(path.to_path_buf()),
        image,
    })
}

pub fn decode_image(bytes: &[u8]) -> EditorResult<RgbaImage> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    log::debug!("Successfully decoded image: {}x{}", image.width(), image.height());
    Ok(image)
}

/// `<dir>/<stem>.annotated.png` next to the source image
pub fn export_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    source.with_file_name(format!("{stem}.annotated.png"))
}

/// Writes an export raster. Encoding is left entirely to the `image` crate.
pub fn save_png(image: &RgbaImage, path: &Path) -> EditorResult<()> {
    image.save_with_format(path, image::ImageFormat::Png)?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// Picks up images dropped onto the window
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if new files were dropped this frame
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Decodes the first dropped image, if any
    pub fn take_dropped_image(&mut self) -> Option<LoadedImage> {
        for file in std::mem::take(&mut self.dropped_files) {
            let file_name = if let Some(path) = &file.path {
                path.display().to_string()
            } else if !file.name.is_empty() {
                file.name.clone()
            } else {
                "unknown".to_owned()
            };

            if !is_image_file(&file) {
                log::warn!("Dropped file is not a supported type: {}", file_name);
                continue;
            }

            let loaded = if let Some(bytes) = &file.bytes {
                log::info!("Processing image from memory: {} ({} bytes)", file_name, bytes.len());
                decode_image(bytes).map(|image| LoadedImage {
                    name: file_name.clone(),
                    path: file.path.clone(),
                    image,
                })
            } else if let Some(path) = &file.path {
                load_image_file(path)
            } else {
                log::warn!("Dropped file has no accessible data: {}", file_name);
                continue;
            };

            match loaded {
                Ok(image) => return Some(image),
                Err(err) => log::error!("Failed to decode image {}: {}", file_name, err),
            }
        }
        None
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        file.mime.starts_with("image/")
    } else if let Some(ext) = file.path.as_ref().and_then(|p| p.extension()) {
        let ext = ext.to_string_lossy().to_lowercase();
        matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_path_sits_next_to_source() {
        let path = export_path(Path::new("/tmp/shots/screen.jpg"));
        assert_eq!(path, PathBuf::from("/tmp/shots/screen.annotated.png"));
    }

    #[test]
    fn garbage_bytes_do_not_decode() {
        assert!(decode_image(b"not an image").is_err());
    }
}
