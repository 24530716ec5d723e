//! PDF Renderer Port - Rasterizes styled HTML into a paginated PDF.

use async_trait::async_trait;
use thiserror::Error;

/// Port for HTML to PDF conversion.
///
/// # Contract
///
/// Implementations must:
/// - Return the bytes of a complete PDF document
/// - Report a missing external converter as `ServiceUnavailable`
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Convert an HTML document to PDF bytes.
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;

    /// Check whether the renderer can run (e.g. the converter is installed).
    async fn is_available(&self) -> bool;
}

/// Errors that can occur during PDF rendering.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// External converter (e.g., Pandoc) is not available.
    #[error("PDF renderer unavailable: {0}")]
    ServiceUnavailable(String),

    /// Conversion failed.
    #[error("PDF conversion failed: {0}")]
    ConversionFailed(String),

    /// Timeout during conversion.
    #[error("PDF conversion timed out after {0} seconds")]
    Timeout(u64),
}

impl RenderError {
    /// Create a service unavailable error.
    pub fn service_unavailable(reason: impl Into<String>) -> Self {
        Self::ServiceUnavailable(reason.into())
    }

    /// Create a conversion error.
    pub fn conversion_failed(reason: impl Into<String>) -> Self {
        Self::ConversionFailed(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_errors_display_correctly() {
        assert_eq!(
            RenderError::Timeout(30).to_string(),
            "PDF conversion timed out after 30 seconds"
        );
        assert!(RenderError::service_unavailable("pandoc missing")
            .to_string()
            .contains("pandoc missing"));
    }
}
