/// State management module
///
/// This module holds everything the window shows:
/// - The selected image and its display handle (data.rs)
/// - The display surface: image, label and status line (display.rs)

pub mod data;
pub mod display;

pub use data::SelectedImage;
pub use display::DisplaySurface;
