use iced::widget::{self, button, column, container, text, Column};
use iced::{Alignment, ContentFit, Element, Length, Task, Theme};
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;

use crate::classify::{Classification, ModelHandle};
use crate::config::Config;
use crate::error::{ClassifyError, ConfigError, ImageLoadError};
use crate::state::{DisplaySurface, SelectedImage};
use crate::{picker, pipeline};

/// Main application state
pub struct CropMl {
    /// What the window shows
    display: DisplaySurface,
    /// The classifier, loaded in the background
    model: ModelState,
    /// Id of the newest classification request; older results are dropped
    request: u64,
}

/// Where the background model load stands
#[derive(Debug, Clone)]
enum ModelState {
    Loading,
    Ready(ModelHandle),
    /// Load failed; the reason stays visible on every later request
    Failed(ClassifyError),
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Select Image"
    SelectImage,
    /// Picker closed; `None` when cancelled
    ImagePicked(Option<PathBuf>),
    /// Background decode finished
    ImageLoaded(Result<SelectedImage, ImageLoadError>),
    /// Background model load finished
    ModelLoaded(Result<ModelHandle, ClassifyError>),
    /// Background classification finished
    Classified {
        request: u64,
        result: Result<Classification, ClassifyError>,
    },
}

impl CropMl {
    /// Create the application, reading the config from its default location
    pub fn new() -> (Self, Task<Message>) {
        Self::with_config(config_or_default(Config::load()))
    }

    /// Create the application and start loading the model named by `config`
    pub fn with_config(config: Config) -> (Self, Task<Message>) {
        let app = CropMl {
            display: DisplaySurface::new(),
            model: ModelState::Loading,
            request: 0,
        };

        (
            app,
            Task::perform(pipeline::load_model(config), Message::ModelLoaded),
        )
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectImage => Task::perform(picker::pick_image(), Message::ImagePicked),
            Message::ImagePicked(None) => {
                log::info!("Picker cancelled");
                Task::none()
            }
            Message::ImagePicked(Some(path)) => {
                if !picker::is_photo(&path) {
                    log::warn!("⚠️  Not a supported photo: {}", path.display());
                    self.display
                        .set_status(format!("Not a supported photo: {}", path.display()));
                    return Task::none();
                }

                self.display.set_status(format!("Loading {}...", path.display()));
                Task::perform(picker::load_image(path), Message::ImageLoaded)
            }
            Message::ImageLoaded(Ok(image)) => {
                let bitmap = image.bitmap().clone();
                self.display.show_image(image);
                self.classify(bitmap)
            }
            Message::ImageLoaded(Err(e)) => {
                log::warn!("⚠️  {}", e);
                self.display.set_status(e.to_string());
                Task::none()
            }
            Message::ModelLoaded(Ok(model)) => {
                log::info!("Model '{}' ready", model.name());
                self.model = ModelState::Ready(model);
                self.display.clear_status();

                // A photo picked while the model was loading still gets a label
                match self.display.image().map(|image| image.bitmap().clone()) {
                    Some(bitmap) => self.classify(bitmap),
                    None => Task::none(),
                }
            }
            Message::ModelLoaded(Err(e)) => {
                log::warn!("⚠️  {}", e);
                self.display.set_status(model_unavailable(&e));
                self.model = ModelState::Failed(e);
                Task::none()
            }
            Message::Classified { request, result } => {
                if request != self.request {
                    log::debug!("Dropping stale result for request {}", request);
                    return Task::none();
                }

                match result {
                    Ok(top) => self.display.publish(&top),
                    Err(e) => {
                        log::warn!("⚠️  Classification failed: {}", e);
                        self.display.set_status(e.to_string());
                    }
                }
                Task::none()
            }
        }
    }

    /// Start a classification request for `bitmap`
    fn classify(&mut self, bitmap: Arc<DynamicImage>) -> Task<Message> {
        self.request += 1;
        let request = self.request;

        let model = match &self.model {
            ModelState::Ready(model) => model.clone(),
            ModelState::Loading => {
                // Picked up again once ModelLoaded arrives
                log::info!("Model still loading, request {} deferred", request);
                self.display.set_status("Loading model...");
                return Task::none();
            }
            ModelState::Failed(e) => {
                log::warn!("⚠️  Classification skipped: {}", model_unavailable(e));
                self.display.set_status(model_unavailable(e));
                return Task::none();
            }
        };

        self.display.set_status("Classifying...");
        Task::perform(pipeline::classify_image(model, bitmap), move |result| {
            Message::Classified { request, result }
        })
    }

    /// Build the user interface
    pub fn view(&self) -> Element<Message> {
        let picture: Element<Message> = match self.display.image() {
            Some(image) => widget::image(image.handle().clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text("No image selected").size(16))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        let content: Column<Message> = column![
            picture,
            button("Select Image")
                .on_press(Message::SelectImage)
                .padding(10),
            text(self.display.label()).size(17),
            text(self.display.status().unwrap_or_default()).size(14),
        ]
        .spacing(20)
        .padding(20)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn display(&self) -> &DisplaySurface {
        &self.display
    }
}

/// Status text for a failed model load, keeping the original reason
fn model_unavailable(reason: &ClassifyError) -> String {
    format!("{}: {}", ClassifyError::ModelUnavailable, reason)
}

/// A config that fails to load is logged and replaced by defaults
fn config_or_default(loaded: Result<Config, ConfigError>) -> Config {
    loaded.unwrap_or_else(|e| {
        log::warn!("⚠️  {}; falling back to defaults", e);
        Config::default()
    })
}
