use serde::{Deserialize, Serialize};

use super::image::{ImageFile, InlineImage};

/// Instruction sent alongside the two images on every call.
pub const SWAP_PROMPT: &str = "Using the first image as the base, replace the clothing on the \
person with the clothing item from the second image. Maintain the person's pose, \
body shape, and the background. The result should be a realistic photo.";

/// Message used when the model answers without an image and without any text.
pub const NO_IMAGE_FALLBACK: &str = "The AI model did not return a valid image.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub person: InlineImage,
    pub clothing: InlineImage,
    pub prompt: &'static str,
}

impl GenerationRequest {
    pub fn from_images(person: &ImageFile, clothing: &ImageFile) -> Self {
        Self {
            person: InlineImage::from(person),
            clothing: InlineImage::from(clothing),
            prompt: SWAP_PROMPT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    /// The model produced an image; `text` carries any caption it returned.
    Generated {
        image_url: String,
        text: Option<String>,
    },
    /// The call succeeded but no usable image came back.
    NoImage {
        message: String,
        candidate_count: usize,
    },
}

impl GenerationResult {
    pub fn no_image(text: Option<String>, candidate_count: usize) -> Self {
        GenerationResult::NoImage {
            message: text.unwrap_or_else(|| NO_IMAGE_FALLBACK.to_string()),
            candidate_count,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Generated { .. })
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            GenerationResult::Generated { image_url, .. } => Some(image_url),
            GenerationResult::NoImage { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            GenerationResult::Generated { text, .. } => text.as_deref(),
            GenerationResult::NoImage { message, .. } => Some(message),
        }
    }
}

/// Body of `POST /swap-clothes`. Both fields are optional on the wire so a
/// missing image surfaces as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    #[serde(default)]
    pub person_image: Option<ImageFile>,
    #[serde(default)]
    pub clothing_image: Option<ImageFile>,
}

impl SwapRequest {
    pub fn new(person_image: ImageFile, clothing_image: ImageFile) -> Self {
        Self {
            person_image: Some(person_image),
            clothing_image: Some(clothing_image),
        }
    }
}

/// Response of `POST /swap-clothes`, covering both success and failure bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SwapResponse {
    pub fn success(image_url: impl Into<String>, text: Option<String>) -> Self {
        Self {
            success: Some(true),
            image_url: Some(image_url.into()),
            text,
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: Some(false),
            error: Some(error.into()),
            details,
            ..Default::default()
        }
    }

    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }
}

impl From<&GenerationResult> for SwapResponse {
    fn from(result: &GenerationResult) -> Self {
        match result {
            GenerationResult::Generated { image_url, text } => {
                SwapResponse::success(image_url.clone(), text.clone())
            }
            GenerationResult::NoImage { message, .. } => SwapResponse::failure(message.clone(), None),
        }
    }
}

/// Request envelope of the callable function protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallableRequest<T> {
    pub data: T,
}

/// Payload a callable returns: `imageUrl` is null when no image was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallableResult {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl From<&GenerationResult> for CallableResult {
    fn from(result: &GenerationResult) -> Self {
        CallableResult {
            image_url: result.image_url().map(String::from),
            text: result.text().map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableError {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallableResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CallableResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CallableError>,
}
