//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source to temporary files,
//! invoking the compiler, and reading back the output PDF.

use std::fs;
use std::process::Command;
use tempfile::tempdir;
use tempfile::TempDir;

use super::common::escape_typst_string;
use super::traits::PdfRenderer;
use super::{DocumentSource, GeneratorError};
use crate::templating::LayoutType;

const SOURCE_FILE: &str = "documento.typ";
const OUTPUT_FILE: &str = "documento.pdf";

/// Renders documents to PDF through the `typst` command-line compiler.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: String,
}

impl Default for TypstRenderEngine {
    fn default() -> Self {
        Self::new("typst")
    }
}

impl TypstRenderEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl PdfRenderer for TypstRenderEngine {
    fn render_pdf(&self, document: &DocumentSource) -> Result<Vec<u8>, GeneratorError> {
        let temp_dir = tempdir().map_err(GeneratorError::TempDir)?;
        let typ_path = temp_dir.path().join(SOURCE_FILE);

        fs::write(&typ_path, build_typst_source(document)).map_err(GeneratorError::WriteTypst)?;

        compile_typst_to_pdf(&self.binary, &temp_dir)
    }
}

/// Build the complete Typst source for a document.
///
/// The body is embedded as a single string literal, so nothing the user
/// typed is ever interpreted as Typst markup.
pub fn build_typst_source(document: &DocumentSource) -> String {
    let title = escape_typst_string(&document.title);
    format!(
        r#"#set document(title: "{title}")
#set page(paper: "a4", margin: {margin})
#set text(size: 12pt, lang: "pt")
#set par(justify: true, leading: 0.8em)

{heading}

#let corpo = "{body}"
#for linha in corpo.split("\n") {{
  linha
  linebreak()
}}

#v(2em)
#align(right, "{issued_on}")
"#,
        margin = page_margin(document.layout),
        heading = heading(document.layout, &title),
        body = escape_typst_string(&document.body),
        issued_on = escape_typst_string(&document.issued_on),
    )
}

fn page_margin(layout: LayoutType) -> &'static str {
    match layout {
        LayoutType::Official => "(top: 3cm, bottom: 2.5cm, x: 2.5cm)",
        LayoutType::Letter => "(x: 2.5cm, y: 2cm)",
        LayoutType::Declaration | LayoutType::Standard => "(x: 2.5cm, y: 2.5cm)",
    }
}

fn heading(layout: LayoutType, escaped_title: &str) -> String {
    match layout {
        LayoutType::Declaration => format!(
            "#align(center, text(weight: \"bold\", size: 14pt, upper(\"{escaped_title}\")))\n#v(1.5em)"
        ),
        LayoutType::Letter => format!(
            "#align(left, text(weight: \"bold\", \"{escaped_title}\"))\n#v(1em)"
        ),
        LayoutType::Official => format!(
            "#align(center, text(weight: \"bold\", size: 14pt, upper(\"{escaped_title}\")))\n#line(length: 100%)\n#v(1.5em)"
        ),
        LayoutType::Standard => format!(
            "#align(center, text(weight: \"bold\", size: 13pt, \"{escaped_title}\"))\n#v(1em)"
        ),
    }
}

/// Compile the source file in `temp_dir` to PDF.
fn compile_typst_to_pdf(binary: &str, temp_dir: &TempDir) -> Result<Vec<u8>, GeneratorError> {
    let typ_path = temp_dir.path().join(SOURCE_FILE);
    let output_path = temp_dir.path().join(OUTPUT_FILE);

    let status = Command::new(binary)
        .arg("compile")
        .arg(&typ_path)
        .arg(&output_path)
        .current_dir(temp_dir.path())
        .status()
        .map_err(GeneratorError::TypstIo)?;

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        return Err(GeneratorError::TypstExit(code));
    }

    fs::read(&output_path).map_err(GeneratorError::ReadPdf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(layout: LayoutType) -> DocumentSource {
        DocumentSource {
            title: "Declaração de \"Residência\"".to_string(),
            layout,
            body: "Eu, Ana Mabunda,\nresidente no bairro #Central.".to_string(),
            issued_on: "5 de Março de 2026".to_string(),
        }
    }

    #[test]
    fn test_build_typst_source_escapes_body() {
        let source = build_typst_source(&document(LayoutType::Declaration));
        assert!(source.contains(r#"#let corpo = "Eu, Ana Mabunda,\nresidente no bairro #Central.""#));
        assert!(source.contains(r#"upper("Declaração de \"Residência\"")"#));
        assert!(source.contains(r#"#align(right, "5 de Março de 2026")"#));
    }

    #[test]
    fn test_build_typst_source_layouts_differ() {
        let official = build_typst_source(&document(LayoutType::Official));
        let letter = build_typst_source(&document(LayoutType::Letter));
        assert!(official.contains("#line(length: 100%)"));
        assert!(!letter.contains("#line(length: 100%)"));
        assert!(letter.contains("#align(left"));
    }

    #[test]
    fn test_missing_binary_is_reported() {
        let engine = TypstRenderEngine::new("minuta-typst-binary-that-does-not-exist");
        let result = engine.render_pdf(&document(LayoutType::Standard));
        assert!(matches!(result, Err(GeneratorError::TypstIo(_))));
    }
}
