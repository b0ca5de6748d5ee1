//! Image attachments for symptom photos

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// Media types the hosted backend accepts
pub const SUPPORTED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

const FALLBACK_MEDIA_TYPE: &str = "image/jpeg";

/// A base64-encoded image ready to attach to a model request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub media_type: String,
    /// Base64 payload without the `data:` prefix
    pub data: String,
}

impl ImageAttachment {
    /// Parse a `data:<mime>;base64,<payload>` URL
    ///
    /// Returns `None` when the URL is not of that shape. An unsupported mime
    /// type is replaced by `image/jpeg`.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (mime, data) = rest.split_once(";base64,")?;
        if mime.is_empty() || mime.contains(';') || data.is_empty() {
            return None;
        }

        Some(Self {
            media_type: supported_or_fallback(mime),
            data: data.to_string(),
        })
    }

    /// Encode raw image bytes, sniffing the format from the content
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let media_type = image::guess_format(bytes)
            .map(|format| supported_or_fallback(format.to_mime_type()))
            .unwrap_or_else(|_| FALLBACK_MEDIA_TYPE.to_string());

        Self {
            media_type,
            data: general_purpose::STANDARD.encode(bytes),
        }
    }
}

fn supported_or_fallback(mime: &str) -> String {
    if SUPPORTED_MEDIA_TYPES.contains(&mime) {
        mime.to_string()
    } else {
        FALLBACK_MEDIA_TYPE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_parse_png_data_url() {
        let attachment = ImageAttachment::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(attachment.media_type, "image/png");
        assert_eq!(attachment.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_unsupported_mime_falls_back_to_jpeg() {
        let attachment = ImageAttachment::from_data_url("data:image/heic;base64,AAAA").unwrap();
        assert_eq!(attachment.media_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_malformed_data_urls() {
        assert!(ImageAttachment::from_data_url("https://example.com/cat.png").is_none());
        assert!(ImageAttachment::from_data_url("data:image/png,plain").is_none());
        assert!(ImageAttachment::from_data_url("data:;base64,AAAA").is_none());
        assert!(ImageAttachment::from_data_url("data:image/png;base64,").is_none());
    }

    #[test]
    fn test_from_bytes_sniffs_png() {
        let attachment = ImageAttachment::from_bytes(PNG_MAGIC);
        assert_eq!(attachment.media_type, "image/png");
        let decoded = general_purpose::STANDARD.decode(&attachment.data).unwrap();
        assert_eq!(decoded, PNG_MAGIC);
    }

    #[test]
    fn test_from_bytes_unknown_content() {
        let attachment = ImageAttachment::from_bytes(b"definitely not an image");
        assert_eq!(attachment.media_type, "image/jpeg");
    }

    #[test]
    fn test_data_url_keeps_supported_type() {
        let url = "data:image/webp;base64,UklGRg==";
        let attachment = ImageAttachment::from_data_url(url).unwrap();
        assert_eq!(attachment.media_type, "image/webp");
        assert_eq!(attachment.data, "UklGRg==");
    }
}
