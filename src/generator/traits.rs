//! Seam between the HTTP layer and the PDF backend.

use super::{DocumentSource, GeneratorError};

/// Converts rendered document text into PDF bytes.
///
/// Implementations may block; callers on the async runtime run them through
/// `actix_web::web::block`.
pub trait PdfRenderer {
    fn render_pdf(&self, document: &DocumentSource) -> Result<Vec<u8>, GeneratorError>;
}
