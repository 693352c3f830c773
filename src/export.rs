use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use image::RgbImage;
use tracing::info;

use crate::utility::flip_rows;

pub const EXPORT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Cuts the canvas (everything right of the sidebar) out of an RGBA screen
/// capture and drops alpha. `bottom_up` captures have their rows flipped.
///
/// Returns `None` when the buffer does not match the size or there is no
/// canvas left after the sidebar.
pub fn canvas_image(rgba: &[u8], width: u32, height: u32, sidebar: u32, bottom_up: bool) -> Option<RgbImage> {
    let (w, h) = (width as usize, height as usize);
    if rgba.len() != w * h * 4 || sidebar >= width {
        return None;
    }
    let out_w = (width - sidebar) as usize;
    let mut rgb = Vec::with_capacity(out_w * h * 3);
    for row in rgba.chunks_exact(w * 4) {
        for px in row[sidebar as usize * 4..].chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
    }
    if bottom_up {
        flip_rows(&mut rgb, out_w, h, 3);
    }
    RgbImage::from_raw(out_w as u32, height, rgb)
}

/// Adds `.png` when the path has no extension we can encode.
pub fn export_path(path: &Path) -> PathBuf {
    let known = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| EXPORT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if known {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".png");
        PathBuf::from(name)
    }
}

/// Writes the image; the encoder follows the file extension.
pub fn save_canvas(image: &RgbImage, path: &Path) -> anyhow::Result<PathBuf> {
    if image.width() == 0 || image.height() == 0 {
        bail!("nothing to export");
    }
    let path = export_path(path);
    image
        .save(&path)
        .with_context(|| format!("exporting image to {}", path.display()))?;
    info!(path = %path.display(), width = image.width(), height = image.height(), "image exported");
    Ok(path)
}
