//! Image uploads.

use serde::Serialize;

/// A file to upload as a post image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent in the multipart part.
    pub file_name: String,
    /// MIME type sent in the multipart part.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Build an upload, inferring the content type from the file extension.
    ///
    /// # Examples
    /// ```
    /// use content_client::domain::ImageUpload;
    ///
    /// let upload = ImageUpload::new("carte.PNG", vec![0x89, 0x50]);
    /// assert_eq!(upload.content_type, "image/png");
    /// ```
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = file_name.into();
        Self {
            content_type: content_type_for(&name).to_owned(),
            file_name: name,
            bytes,
        }
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Location of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    /// URL to store in [`crate::domain::Post::image`].
    pub url: String,
}
