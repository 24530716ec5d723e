//! Document rendering adapters.
//!
//! - `PandocPdfRenderer` - HTML to PDF via an installed Pandoc

mod pandoc_pdf_renderer;

pub use pandoc_pdf_renderer::PandocPdfRenderer;
