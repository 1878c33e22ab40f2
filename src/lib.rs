//! Crop ML: pick a photo, classify it, show the top label.
//!
//! - `app` - iced application (state, messages, view)
//! - `picker` - native photo picker and background decode
//! - `pipeline` - background model load and classification
//! - `classify` - classifier trait, ONNX backend, pre/post-processing
//! - `pixel_buffer` - fixed-format ARGB buffer fed to the model
//! - `state` - what the window displays
//! - `config` / `error` - configuration and error types

pub mod app;
pub mod classify;
pub mod config;
pub mod error;
pub mod picker;
pub mod pipeline;
pub mod pixel_buffer;
pub mod state;

pub use app::{CropMl, Message};
