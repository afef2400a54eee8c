use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

// --- Load and sort slide image paths ---
pub fn load_sorted_image_paths(dir_path: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let entries = fs::read_dir(dir_path)
        .with_context(|| format!("failed to read directory {}", dir_path.display()))?;

    for entry in entries {
        let path = entry.context("failed to read directory entry")?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if paths.is_empty() {
        bail!("no image files found in directory {}", dir_path.display());
    }
    Ok(paths)
}

/// Loads every path in order, logging and dropping the ones that fail so the
/// remaining slides stay contiguous.
pub fn load_all<T>(paths: &[PathBuf], mut load: impl FnMut(&Path) -> Result<T>) -> Vec<T> {
    paths
        .iter()
        .filter_map(|path| match load(path) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to load slide, skipping"
                );
                None
            }
        })
        .collect()
}

#[cfg(feature = "window")]
pub use self::textures::load_texture_with_exif_rotation;

#[cfg(feature = "window")]
mod textures {
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    use anyhow::{anyhow, Context, Result};
    use exif::{In, Reader, Tag, Value};
    use raylib::prelude::*;

    // 1 = normal, 3 = 180 deg, 6 = 90 deg clockwise, 8 = 90 deg counter-clockwise.
    // Flipped orientations are left as they are.
    fn exif_orientation(image_path: &Path, file_bytes: &[u8]) -> u16 {
        match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
            Ok(exif) => match exif.get_field(Tag::Orientation, In::PRIMARY).map(|f| &f.value) {
                Some(Value::Short(values)) if !values.is_empty() => values[0],
                _ => 1,
            },
            Err(e) => {
                tracing::warn!(
                    path = %image_path.display(),
                    error = %e,
                    "could not read EXIF data"
                );
                1
            }
        }
    }

    // --- Load image, apply EXIF rotation, create texture ---
    pub fn load_texture_with_exif_rotation(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        image_path: &Path,
    ) -> Result<Texture2D> {
        let file_bytes = fs::read(image_path)
            .with_context(|| format!("failed to read file {}", image_path.display()))?;

        let extension = image_path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        let orientation = if extension == "jpg" || extension == "jpeg" {
            exif_orientation(image_path, &file_bytes)
        } else {
            1
        };

        let mut image = Image::load_image_from_mem(&format!(".{extension}"), &file_bytes)
            .map_err(|e| anyhow!("failed to decode image {}: {e}", image_path.display()))?;

        match orientation {
            3 => {
                image.rotate_cw();
                image.rotate_cw();
            }
            6 => image.rotate_cw(),
            8 => image.rotate_ccw(),
            _ => {}
        }
        if orientation != 1 {
            tracing::debug!(path = %image_path.display(), orientation, "applied EXIF rotation");
        }

        let texture = rl
            .load_texture_from_image(thread, &image)
            .map_err(|e| anyhow!("failed to create texture for {}: {e}", image_path.display()))?;

        Ok(texture)
    }
}
