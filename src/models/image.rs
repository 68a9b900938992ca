use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SwapError};

/// Minimum base64 length below which a payload is treated as empty or malformed.
pub const PLAUSIBLE_BASE64_LEN: usize = 100;

/// An image as held by the client: data URL (or bare base64), MIME type and file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFile {
    pub base64: String,
    pub mime_type: String,
    #[serde(default)]
    pub name: String,
}

impl ImageFile {
    pub fn new(
        base64: impl Into<String>,
        mime_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            base64: base64.into(),
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }

    /// Encodes raw file bytes into a data URL backed `ImageFile`.
    pub fn from_bytes(bytes: &[u8], mime_type: &str, name: impl Into<String>) -> Self {
        Self::new(to_data_url(mime_type, &STANDARD.encode(bytes)), mime_type, name)
    }

    pub fn payload(&self) -> &str {
        strip_base64_prefix(&self.base64)
    }

    pub fn is_plausible(&self) -> bool {
        is_plausible_base64(self.payload())
    }
}

/// Image bytes as sent to the model: bare base64 plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl From<&ImageFile> for InlineImage {
    fn from(file: &ImageFile) -> Self {
        InlineImage {
            mime_type: file.mime_type.clone(),
            data: file.payload().to_string(),
        }
    }
}

/// Drops a `data:<mime>;base64,` prefix. Input without a usable prefix is returned as is.
pub fn strip_base64_prefix(base64: &str) -> &str {
    match base64.split(',').nth(1) {
        Some(payload) if !payload.is_empty() => payload,
        _ => base64,
    }
}

pub fn is_plausible_base64(payload: &str) -> bool {
    payload.len() > PLAUSIBLE_BASE64_LEN
}

pub fn to_data_url(mime_type: &str, payload: &str) -> String {
    format!("data:{};base64,{}", mime_type, payload)
}

/// Splits a base64 data URL into its MIME type and decoded bytes.
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>)> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| SwapError::Response("not a data URL".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| SwapError::Response("data URL has no payload".into()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| SwapError::Response("data URL is not base64 encoded".into()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| SwapError::Response(format!("invalid base64 payload: {}", e)))?;

    Ok((mime_type.to_string(), bytes))
}
