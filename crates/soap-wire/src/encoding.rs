//! Encoding utilities for byte-buffer wire text.
//!
//! Byte buffers travel as base64 text on the wire. This helper centralizes
//! the repetitive error handling.

use anyhow::{anyhow, Result};

/// Decode base64 string to bytes with context-aware error message.
///
/// # Arguments
/// * `b64` - Base64 encoded string
/// * `context` - Description for error messages (e.g., "byte-buffer return")
pub fn base64_decode(b64: &str, context: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| anyhow!("Failed to decode {} from base64: {}", context, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_standard_base64() {
        assert_eq!(base64_decode("AQID", "test").unwrap(), vec![1, 2, 3]);
        assert_eq!(base64_decode("", "test").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn invalid_input_names_the_context() {
        let err = base64_decode("not base64!", "screenshot data").unwrap_err();
        assert!(err.to_string().contains("screenshot data"));
    }
}
