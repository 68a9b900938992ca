//! View state of the try-on screen: two upload slots, one swap action, and
//! either a result or an error. Rendering is left to the embedding UI.

pub mod uploader;

use crate::{
    bridge::SwapBridge,
    error::Result,
    models::{GenerationResult, ImageFile},
};

pub use uploader::{extension_for_mime, mime_type_for_path, SelectedFile, Uploader};

pub const MISSING_UPLOADS: &str = "Please upload both a person and a clothing image.";
pub const DEFAULT_CAPTION: &str = "Here is the swapped image.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Failed(String),
    Ready { image_url: String, caption: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Person,
    Clothing,
}

#[derive(Debug, Clone)]
pub struct Composer {
    person_uploader: Uploader,
    clothing_uploader: Uploader,
    person: Option<ImageFile>,
    clothing: Option<ImageFile>,
    result_image: Option<String>,
    result_text: Option<String>,
    is_loading: bool,
    error: Option<String>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            person_uploader: Uploader::new("Person"),
            clothing_uploader: Uploader::new("Clothing"),
            person: None,
            clothing: None,
            result_image: None,
            result_text: None,
            is_loading: false,
            error: None,
        }
    }

    /// Routes a picked file through the slot's uploader. Returns false when the
    /// file was not an image.
    pub fn upload(&mut self, slot: Slot, file: SelectedFile) -> bool {
        match slot {
            Slot::Person => {
                let mut uploaded = None;
                let accepted = self
                    .person_uploader
                    .handle_file(file, |image| uploaded = Some(image));
                if let Some(image) = uploaded {
                    self.set_person_image(image);
                }
                accepted
            }
            Slot::Clothing => {
                let mut uploaded = None;
                let accepted = self
                    .clothing_uploader
                    .handle_file(file, |image| uploaded = Some(image));
                if let Some(image) = uploaded {
                    self.set_clothing_image(image);
                }
                accepted
            }
        }
    }

    // Either slot changing drops the previous result, matching the web client.
    pub fn set_person_image(&mut self, image: ImageFile) {
        self.person = Some(image);
        self.clear_outcome();
    }

    pub fn set_clothing_image(&mut self, image: ImageFile) {
        self.clothing = Some(image);
        self.clear_outcome();
    }

    fn clear_outcome(&mut self) {
        self.result_image = None;
        self.result_text = None;
        self.error = None;
    }

    pub fn preview(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Person => self.person_uploader.preview(),
            Slot::Clothing => self.clothing_uploader.preview(),
        }
    }

    pub fn can_swap(&self) -> bool {
        self.person.is_some() && self.clothing.is_some() && !self.is_loading
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result_image(&self) -> Option<&str> {
        self.result_image.as_deref()
    }

    pub fn result_text(&self) -> Option<&str> {
        self.result_text.as_deref()
    }

    /// Enters the loading state and returns the images to send, or `None` when
    /// a swap cannot start (missing upload or a call already in flight).
    pub fn begin_swap(&mut self) -> Option<(ImageFile, ImageFile)> {
        if self.is_loading {
            return None;
        }
        let (person, clothing) = match (&self.person, &self.clothing) {
            (Some(person), Some(clothing)) => (person.clone(), clothing.clone()),
            _ => {
                self.error = Some(MISSING_UPLOADS.to_string());
                return None;
            }
        };

        self.is_loading = true;
        self.clear_outcome();
        Some((person, clothing))
    }

    pub fn finish_swap(&mut self, outcome: Result<GenerationResult>) {
        match outcome {
            Ok(GenerationResult::Generated { image_url, text }) => {
                self.result_image = Some(image_url);
                self.result_text = Some(text.unwrap_or_else(|| DEFAULT_CAPTION.to_string()));
            }
            Ok(GenerationResult::NoImage { message, .. }) => {
                self.error = Some(message);
            }
            Err(e) => {
                log::error!("Swap failed: {}", e);
                self.error = Some(format!("Failed to swap clothes: {}", e.user_message()));
            }
        }
        self.is_loading = false;
    }

    pub async fn swap(&mut self, bridge: &SwapBridge) {
        let Some((person, clothing)) = self.begin_swap() else {
            return;
        };
        let outcome = bridge.swap_images(&person, &clothing).await;
        self.finish_swap(outcome);
    }

    pub fn view(&self) -> ViewState {
        if self.is_loading {
            return ViewState::Loading;
        }
        if let Some(error) = &self.error {
            return ViewState::Failed(error.clone());
        }
        match &self.result_image {
            Some(image_url) => ViewState::Ready {
                image_url: image_url.clone(),
                caption: self
                    .result_text
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CAPTION.to_string()),
            },
            None => ViewState::Idle,
        }
    }
}
