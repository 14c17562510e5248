//! Clinic branding.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Clinic details shown on charts and the public view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicInfo {
    /// Display name
    pub name: String,
    /// Logo as a base64 data URL; empty when none has been uploaded
    pub logo: String,
}

impl ClinicInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            logo: String::new(),
        }
    }

    pub fn has_logo(&self) -> bool {
        !self.logo.is_empty()
    }

    /// Replace the logo with an uploaded image. No size or type checks.
    pub fn with_logo(mut self, image: &[u8], mime_type: &str) -> Self {
        self.logo = logo_data_url(image, mime_type);
        self
    }
}

/// Encode image bytes as a `data:` URL.
pub fn logo_data_url(image: &[u8], mime_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(image)
    )
}

/// Guess an image MIME type from a file extension.
pub fn mime_type_for_path(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
