//! LogoSource - reference to an organisation logo image.

use serde::{Deserialize, Serialize};

/// A logo image reference: either an embedded `data:` URL or a network URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoSource(String);

impl LogoSource {
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    /// The raw image reference.
    pub fn src(&self) -> &str {
        &self.0
    }

    /// True when the image data is carried inline as a `data:` URL.
    pub fn is_embedded(&self) -> bool {
        self.0.trim_start().starts_with("data:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_embedded_logos() {
        assert!(LogoSource::new("data:image/png;base64,AAAA").is_embedded());
        assert!(!LogoSource::new("https://example.com/logo.png").is_embedded());
    }
}
