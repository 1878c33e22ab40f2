/// The display surface: one image, one label, one status line.
///
/// The surface only changes through `show_image`, `publish` and the status
/// setters, all called from the UI thread.
use super::data::SelectedImage;
use crate::classify::Classification;

/// Label shown before anything has been classified
pub const PLACEHOLDER_LABEL: &str = "Label";

#[derive(Debug, Clone)]
pub struct DisplaySurface {
    image: Option<SelectedImage>,
    label: String,
    /// Last error or progress note, shown below the label
    status: Option<String>,
}

impl Default for DisplaySurface {
    fn default() -> Self {
        Self {
            image: None,
            label: PLACEHOLDER_LABEL.to_string(),
            status: None,
        }
    }
}

impl DisplaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shown image. The label is left alone until a result
    /// for the new image is published.
    pub fn show_image(&mut self, image: SelectedImage) {
        self.image = Some(image);
    }

    /// Show a classification result as `<label> <confidence>%`
    pub fn publish(&mut self, result: &Classification) {
        self.label = result.to_string();
        self.status = None;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::path::PathBuf;

    fn selected(name: &str) -> SelectedImage {
        SelectedImage::new(PathBuf::from(name), DynamicImage::ImageRgb8(RgbImage::new(2, 2)))
    }

    #[test]
    fn test_starts_with_placeholder() {
        let display = DisplaySurface::new();
        assert!(display.image().is_none());
        assert_eq!(display.label(), PLACEHOLDER_LABEL);
        assert!(display.status().is_none());
    }

    #[test]
    fn test_new_image_replaces_old_and_keeps_label() {
        let mut display = DisplaySurface::new();
        display.show_image(selected("a.jpg"));
        display.publish(&Classification::new("healthy", 0.9));

        display.show_image(selected("b.jpg"));

        assert_eq!(display.image().unwrap().path(), PathBuf::from("b.jpg"));
        assert_eq!(display.label(), "healthy 90.00%");
    }

    #[test]
    fn test_publish_clears_status() {
        let mut display = DisplaySurface::new();
        display.set_status("Classifying...");
        display.publish(&Classification::new("early_blight", 0.8734));

        assert_eq!(display.label(), "early_blight 87.34%");
        assert!(display.status().is_none());
    }
}
