use crate::error::{GenerationError, Result};
use serde::{Deserialize, Serialize};

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Success body from the backend. Only one of `image` / `image_url` is
/// expected; other fields the backend adds are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GenerationResponse {
    pub fn into_result(self) -> Result<GenerationResult> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());

        match (non_empty(self.image_url), non_empty(self.image)) {
            (Some(url), _) => Ok(GenerationResult::Remote { url }),
            (None, Some(base64)) => Ok(GenerationResult::Inline { base64 }),
            (None, None) => Err(GenerationError::MalformedResponse(
                "No image data received from server".into(),
            )),
        }
    }
}

/// Error body from the backend, e.g. `{"error": "Model is loading"}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// First non-empty of `error` and `message`.
    pub fn into_message(self) -> Option<String> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        non_empty(self.error).or_else(|| non_empty(self.message))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    /// Base64-encoded PNG bytes.
    Inline { base64: String },
    Remote { url: String },
}

impl GenerationResult {
    /// URI the image region should load.
    pub fn display_uri(&self) -> String {
        match self {
            GenerationResult::Inline { base64 } => format!("{}{}", PNG_DATA_URI_PREFIX, base64),
            GenerationResult::Remote { url } => url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<GenerationResult> {
        serde_json::from_str::<GenerationResponse>(body)
            .unwrap()
            .into_result()
    }

    #[test]
    fn test_inline_image_becomes_data_uri() {
        let result = parse(r#"{"success": true, "image": "iVBORw0K", "message": "ok"}"#).unwrap();
        assert_eq!(result.display_uri(), "data:image/png;base64,iVBORw0K");
    }

    #[test]
    fn test_image_url_is_used_unchanged() {
        let result = parse(r#"{"image_url": "http://x/y.png"}"#).unwrap();
        assert_eq!(result.display_uri(), "http://x/y.png");
    }

    #[test]
    fn test_image_url_wins_when_both_present() {
        let result = parse(r#"{"image": "AAAA", "image_url": "http://x/y.png"}"#).unwrap();
        assert_eq!(
            result,
            GenerationResult::Remote {
                url: "http://x/y.png".into()
            }
        );
    }

    #[test]
    fn test_error_body_prefers_error_over_message() {
        let body = |s: &str| serde_json::from_str::<ErrorBody>(s).unwrap().into_message();

        assert_eq!(
            body(r#"{"error": "Model is loading", "message": "try later"}"#).as_deref(),
            Some("Model is loading")
        );
        assert_eq!(
            body(r#"{"error": "", "message": "Token missing"}"#).as_deref(),
            Some("Token missing")
        );
        assert_eq!(body(r#"{"success": false}"#), None);
    }

    #[test]
    fn test_missing_image_is_malformed() {
        for body in [r#"{}"#, r#"{"success": true}"#, r#"{"image": "", "image_url": null}"#] {
            match parse(body) {
                Err(GenerationError::MalformedResponse(msg)) => {
                    assert_eq!(msg, "No image data received from server")
                }
                other => panic!("expected malformed response for {}, got {:?}", body, other),
            }
        }
    }
}
