use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// The picture shown above the story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneImage {
    /// Base64 image bytes as returned by the image model.
    Encoded { mime: String, data: String },
    /// Drawn locally when image generation fails.
    Placeholder { seed: u64 },
}

impl SceneImage {
    pub fn encoded(mime: impl Into<String>, data: impl Into<String>) -> Self {
        SceneImage::Encoded {
            mime: mime.into(),
            data: data.into(),
        }
    }

    pub fn placeholder() -> Self {
        SceneImage::Placeholder {
            seed: rand::random(),
        }
    }

    pub fn decode_bytes(&self) -> Result<Option<Vec<u8>>, base64::DecodeError> {
        match self {
            SceneImage::Encoded { data, .. } => STANDARD.decode(data.trim()).map(Some),
            SceneImage::Placeholder { .. } => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_image_decodes_to_bytes() {
        let image = SceneImage::encoded("image/png", STANDARD.encode([1u8, 2, 3]));
        assert_eq!(image.decode_bytes().unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn placeholder_has_no_bytes() {
        let image = SceneImage::Placeholder { seed: 7 };
        assert_eq!(image.decode_bytes().unwrap(), None);
    }

    #[test]
    fn corrupt_payload_is_a_decode_error() {
        let image = SceneImage::encoded("image/png", "%%%");
        assert!(image.decode_bytes().is_err());
    }
}
