//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for invalidating one entry (POST /cache/:category/invalidate)
///
/// # Fields
/// - `content`: the raw input the entry was cached under (URL, CSV text, comment)
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Raw input content
    pub content: String,
}

impl InvalidateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.content.trim().is_empty() {
            return Some("Content cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_request_deserialize() {
        let json = r#"{"content": "https://ex.com/app"}"#;
        let req: InvalidateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.content, "https://ex.com/app");
    }

    #[test]
    fn test_validate_blank_content() {
        let req = InvalidateRequest {
            content: "   ".to_string(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = InvalidateRequest {
            content: "some comment".to_string(),
        };
        assert!(req.validate().is_none());
    }
}
