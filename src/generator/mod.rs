//! Generator module - turns a rendered document into a PDF.
//!
//! The PDF renderer is an external collaborator behind the `PdfRenderer`
//! trait. `TypstRenderEngine` drives the Typst CLI.

pub mod common;
pub mod engine;
pub mod traits;

pub use engine::TypstRenderEngine;
pub use traits::PdfRenderer;

use thiserror::Error;

use crate::templating::LayoutType;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}

/// Fully rendered document text, ready for PDF conversion.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub title: String,
    pub layout: LayoutType,
    pub body: String,
    /// Issue date printed at the end of the document.
    pub issued_on: String,
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub issued_on: String,
}

/// Render `source` to PDF and name the result.
pub fn generate(
    renderer: &dyn PdfRenderer,
    source: &DocumentSource,
    filename: String,
) -> Result<GeneratedDocument, GeneratorError> {
    let pdf = renderer.render_pdf(source)?;
    Ok(GeneratedDocument {
        filename,
        pdf,
        issued_on: source.issued_on.clone(),
    })
}
