/// Shared data structures for the application state
///
/// These structs flow from the background loaders to the UI layer.
use iced::widget::image::Handle;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A decoded photo picked by the user
#[derive(Debug, Clone)]
pub struct SelectedImage {
    /// Where the photo was picked from
    path: PathBuf,
    /// Decoded pixels, shared with the classifier thread
    bitmap: Arc<DynamicImage>,
    /// GPU-ready handle for the image widget
    handle: Handle,
}

impl SelectedImage {
    pub fn new(path: PathBuf, bitmap: DynamicImage) -> Self {
        let rgba = bitmap.to_rgba8();
        let handle = Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw());

        Self {
            path,
            bitmap: Arc::new(bitmap),
            handle,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bitmap(&self) -> &Arc<DynamicImage> {
        &self.bitmap
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}
