//! Export configuration

use serde::Deserialize;

use super::error::ValidationError;

/// PDF rendering settings
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Path to pandoc executable. If None, PATH is searched.
    pub pandoc_path: Option<String>,

    /// Timeout for PDF conversion in seconds
    #[serde(default = "default_pdf_timeout")]
    pub pdf_timeout_secs: u64,
}

impl ExportConfig {
    /// Validate export configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pdf_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("export.pdf_timeout_secs"));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pandoc_path: None,
            pdf_timeout_secs: default_pdf_timeout(),
        }
    }
}

fn default_pdf_timeout() -> u64 {
    30
}
