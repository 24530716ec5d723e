//! Pandoc-based PDF renderer adapter.
//!
//! Converts the styled notes HTML to a paginated PDF by piping it through
//! Pandoc. Pandoc (and its PDF engine) must be installed on the system;
//! when it is missing, rendering returns `ServiceUnavailable` instead of
//! attempting the conversion.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::ports::{PdfRenderer, RenderError};

const DEFAULT_PDF_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PDF_ENGINE: &str = "wkhtmltopdf";

/// PDF renderer that shells out to Pandoc.
///
/// # Example
///
/// ```rust,ignore
/// let renderer = PandocPdfRenderer::new()
///     .with_pandoc_path("/usr/local/bin/pandoc")
///     .with_pdf_timeout(60);
///
/// let pdf = renderer.render(&notes.to_pdf_html()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PandocPdfRenderer {
    /// Path to pandoc executable. If None, will search PATH.
    pandoc_path: Option<String>,

    /// Timeout for PDF conversion in seconds.
    pdf_timeout_secs: u64,

    /// Engine pandoc uses to produce the PDF from HTML.
    pdf_engine: String,
}

impl Default for PandocPdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PandocPdfRenderer {
    /// Create a renderer with default settings.
    pub fn new() -> Self {
        Self {
            pandoc_path: None,
            pdf_timeout_secs: DEFAULT_PDF_TIMEOUT_SECS,
            pdf_engine: DEFAULT_PDF_ENGINE.to_string(),
        }
    }

    /// Set a custom pandoc path.
    pub fn with_pandoc_path(mut self, path: impl Into<String>) -> Self {
        self.pandoc_path = Some(path.into());
        self
    }

    /// Set the timeout for PDF conversion.
    pub fn with_pdf_timeout(mut self, timeout_secs: u64) -> Self {
        self.pdf_timeout_secs = timeout_secs;
        self
    }

    /// Set the PDF engine passed to pandoc.
    pub fn with_pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.pdf_engine = engine.into();
        self
    }

    fn pandoc_command(&self) -> &str {
        self.pandoc_path.as_deref().unwrap_or("pandoc")
    }

    fn pandoc_args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            "html".to_string(),
            "-t".to_string(),
            "pdf".to_string(),
            format!("--pdf-engine={}", self.pdf_engine),
            "-V".to_string(),
            "geometry:margin=20mm".to_string(),
            "-o".to_string(),
            "-".to_string(),
        ]
    }
}

#[async_trait]
impl PdfRenderer for PandocPdfRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        if !self.is_available().await {
            return Err(RenderError::service_unavailable(
                "Pandoc is not installed. PDF export requires Pandoc. \
                 Install from https://pandoc.org/installing.html",
            ));
        }

        let mut child = Command::new(self.pandoc_command())
            .args(self.pandoc_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RenderError::conversion_failed(format!("Failed to start Pandoc: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(html.as_bytes()).await.map_err(|e| {
                RenderError::conversion_failed(format!("Failed to write to Pandoc: {}", e))
            })?;
        }

        let output = tokio::time::timeout(
            Duration::from_secs(self.pdf_timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| RenderError::Timeout(self.pdf_timeout_secs))?
        .map_err(|e| RenderError::conversion_failed(format!("Pandoc execution failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(engine = %self.pdf_engine, "pandoc exited with failure");
            return Err(RenderError::conversion_failed(format!(
                "Pandoc returned error: {}",
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            return Err(RenderError::conversion_failed("Pandoc produced no output"));
        }

        Ok(output.stdout)
    }

    async fn is_available(&self) -> bool {
        Command::new(self.pandoc_command())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}
