/// Image acquisition
///
/// Shows the native file picker restricted to photo formats, then decodes
/// the chosen file on the blocking pool.
use image::{DynamicImage, ImageDecoder, ImageReader};
use rfd::AsyncFileDialog;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::ImageLoadError;
use crate::state::SelectedImage;

/// Extensions the picker offers (all decodable by `image`)
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"];

/// Present the picker. Resolves to `None` when the user cancels.
pub async fn pick_image() -> Option<PathBuf> {
    let file = AsyncFileDialog::new()
        .set_title("Select Image")
        .add_filter("Photos", PHOTO_EXTENSIONS)
        .pick_file()
        .await?;

    Some(file.path().to_path_buf())
}

/// Decode the picked file into a `SelectedImage`
pub async fn load_image(path: PathBuf) -> Result<SelectedImage, ImageLoadError> {
    // Spawn blocking because decoding is CPU-intensive
    task::spawn_blocking(move || {
        let bitmap = decode_upright(&path)?;
        log::info!(
            "📷 Loaded {} ({}x{})",
            path.display(),
            bitmap.width(),
            bitmap.height()
        );
        Ok(SelectedImage::new(path, bitmap))
    })
    .await
    .map_err(|e| ImageLoadError::Task(e.to_string()))?
}

/// Decode `path` and apply its EXIF orientation
pub fn decode_upright(path: &Path) -> Result<DynamicImage, ImageLoadError> {
    let open_error = |message: String| ImageLoadError::Open {
        path: path.to_path_buf(),
        message,
    };
    let decode_error = |e: image::ImageError| ImageLoadError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut decoder = ImageReader::open(path)
        .map_err(|e| open_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| open_error(e.to_string()))?
        .into_decoder()
        .map_err(decode_error)?;

    let orientation = decoder.orientation().map_err(decode_error)?;
    let mut bitmap = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
    bitmap.apply_orientation(orientation);

    Ok(bitmap)
}

/// Whether `path` has one of the extensions the picker offers
pub fn is_photo(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| PHOTO_EXTENSIONS.contains(&ext.as_str()))
}
