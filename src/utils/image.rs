//! Image loading and output-path helpers.

use crate::core::errors::{VizError, VizResult};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Loads an image from a file path and converts it to [`RgbImage`].
///
/// Handles any format supported by the `image` crate.
///
/// # Errors
///
/// Returns [`VizError::ImageLoad`] if the file cannot be opened or
/// decoded.
pub fn load_image(path: &Path) -> VizResult<RgbImage> {
    let img = image::open(path).map_err(|e| VizError::image_load(path, e))?;
    Ok(img.to_rgb8())
}

/// Saves an overlay image to disk.
///
/// # Errors
///
/// Returns [`VizError::ImageSave`] if the image cannot be encoded or
/// written.
pub fn save_image(img: &RgbImage, path: &Path) -> VizResult<()> {
    img.save(path).map_err(|e| VizError::image_save(path, e))
}

/// Builds the output path for a page's overlay image:
/// `<output_dir>/<basename>_overlay.<ext>`, where the extension follows
/// the source image.
pub fn overlay_path(output_dir: &Path, image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = image_path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "jpg".to_string());
    output_dir.join(format!("{stem}_overlay.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_path_keeps_source_extension() {
        let path = overlay_path(Path::new("output"), Path::new("images/page_001.jpg"));
        assert_eq!(path, PathBuf::from("output/page_001_overlay.jpg"));

        let path = overlay_path(Path::new("out"), Path::new("scans/p2.png"));
        assert_eq!(path, PathBuf::from("out/p2_overlay.png"));
    }

    #[test]
    fn test_load_image_missing_file_errors() {
        let err = load_image(Path::new("definitely/not/here.jpg")).unwrap_err();
        assert!(matches!(err, VizError::ImageLoad { .. }));
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let img = RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        save_image(&img, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (4, 4));
        assert_eq!(*loaded.get_pixel(1, 1), image::Rgb([10, 20, 30]));
    }
}
