use std::path::Path;

use crate::models::ImageFile;

/// A file picked by the user, before it is turned into an [`ImageFile`].
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_type_for_path(path).unwrap_or("application/octet-stream");
        Ok(Self::new(name, mime_type, bytes))
    }
}

/// One upload slot: accepts image files and keeps the last one as a preview.
#[derive(Debug, Clone)]
pub struct Uploader {
    title: String,
    preview: Option<String>,
}

impl Uploader {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            preview: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Encodes `file` and hands it to `on_upload`. Non-image files are ignored
    /// and leave the current preview untouched.
    pub fn handle_file<F>(&mut self, file: SelectedFile, on_upload: F) -> bool
    where
        F: FnOnce(ImageFile),
    {
        if !file.mime_type.starts_with("image/") {
            log::warn!(
                "{}: ignoring '{}' with non-image type {}",
                self.title,
                file.name,
                file.mime_type
            );
            return false;
        }

        let image = ImageFile::from_bytes(&file.bytes, &file.mime_type, file.name);
        self.preview = Some(image.base64.clone());
        on_upload(image);
        true
    }
}

pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// File extension to use when saving an image of the given MIME type.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_images() {
        let mut uploader = Uploader::new("Person");
        let mut received = None;

        let accepted = uploader.handle_file(
            SelectedFile::new("me.png", "image/png", vec![1, 2, 3]),
            |image| received = Some(image),
        );

        assert!(accepted);
        let image = received.unwrap();
        assert_eq!(image.name, "me.png");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.base64, "data:image/png;base64,AQID");
        assert_eq!(uploader.preview(), Some("data:image/png;base64,AQID"));
    }

    #[test]
    fn test_ignores_non_images() {
        let mut uploader = Uploader::new("Clothing");
        let mut called = false;

        let accepted = uploader.handle_file(
            SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec()),
            |_| called = true,
        );

        assert!(!accepted);
        assert!(!called);
        assert!(uploader.preview().is_none());
    }

    #[test]
    fn test_mime_guessing() {
        assert_eq!(mime_type_for_path(Path::new("a/b/photo.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type_for_path(Path::new("shirt.webp")), Some("image/webp"));
        assert_eq!(mime_type_for_path(Path::new("README")), None);
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/unknown"), "png");
    }
}
