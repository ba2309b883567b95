pub mod pdf;

use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pdf generation failed: {message}")]
    Pdf { message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
}

impl DocumentFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub file_name: String,
    pub format: DocumentFormat,
}

/// Renders submissions to durable artifacts named `tramite_<id>.<ext>`.
/// The pdf path is primary; any pdf failure degrades to an equivalent
/// plain-text artifact under the same logical name, so callers address
/// documents by id only.
pub struct Renderer {
    docs_dir: PathBuf,
}

impl Renderer {
    pub fn new(docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
        }
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    pub fn pdf_name(id: i64) -> String {
        format!("tramite_{id}.pdf")
    }

    pub fn text_name(id: i64) -> String {
        format!("tramite_{id}.txt")
    }

    pub fn render(
        &self,
        id: i64,
        tipo: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<RenderedDocument, RenderError> {
        std::fs::create_dir_all(&self.docs_dir)?;
        let lines = document_lines(tipo, fields);

        let pdf_path = self.docs_dir.join(Self::pdf_name(id));
        if pdf::write_pdf(&pdf_path, &lines).is_ok() {
            return Ok(RenderedDocument {
                file_name: Self::pdf_name(id),
                format: DocumentFormat::Pdf,
            });
        }

        let text_path = self.docs_dir.join(Self::text_name(id));
        std::fs::write(&text_path, lines.join("\n"))?;
        Ok(RenderedDocument {
            file_name: Self::text_name(id),
            format: DocumentFormat::Text,
        })
    }

    /// Resolves the artifact for a submission id, pdf first.
    pub fn find(&self, id: i64) -> Option<(PathBuf, DocumentFormat)> {
        let pdf_path = self.docs_dir.join(Self::pdf_name(id));
        if pdf_path.is_file() {
            return Some((pdf_path, DocumentFormat::Pdf));
        }
        let text_path = self.docs_dir.join(Self::text_name(id));
        if text_path.is_file() {
            return Some((text_path, DocumentFormat::Text));
        }
        None
    }
}

fn document_lines(tipo: &str, fields: &BTreeMap<String, String>) -> Vec<String> {
    let mut lines = vec![
        "EduBot - Comprobante de Trámite".to_string(),
        format!("Trámite: {tipo}"),
        format!("Generado: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
    ];
    for (key, value) in fields {
        lines.push(format!("{key}: {value}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert("nombre".to_string(), "Ana".to_string());
        fields.insert("grado".to_string(), "5to".to_string());
        fields
    }

    #[test]
    fn renders_a_pdf_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(dir.path());
        let doc = renderer.render(1, "constancia", &fields()).unwrap();
        assert_eq!(doc.file_name, "tramite_1.pdf");
        assert_eq!(doc.format, DocumentFormat::Pdf);
        let bytes = std::fs::read(dir.path().join("tramite_1.pdf")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn paginates_long_field_sets() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(dir.path());
        let mut many = BTreeMap::new();
        for index in 0..120 {
            many.insert(format!("campo_{index:03}"), "valor".to_string());
        }
        let doc = renderer.render(2, "constancia", &many).unwrap();
        assert_eq!(doc.format, DocumentFormat::Pdf);
        let document = lopdf::Document::load(dir.path().join(doc.file_name)).unwrap();
        assert!(document.get_pages().len() > 1);
    }

    #[test]
    fn falls_back_to_text_when_pdf_cannot_be_written() {
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on the pdf path forces the primary write to fail.
        std::fs::create_dir_all(dir.path().join("tramite_3.pdf")).unwrap();
        let renderer = Renderer::new(dir.path());
        let doc = renderer.render(3, "constancia", &fields()).unwrap();
        assert_eq!(doc.file_name, "tramite_3.txt");
        assert_eq!(doc.format, DocumentFormat::Text);
        let text = std::fs::read_to_string(dir.path().join("tramite_3.txt")).unwrap();
        assert!(text.contains("nombre: Ana"));
        assert!(text.contains("Trámite: constancia"));
    }

    #[test]
    fn find_prefers_pdf_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(dir.path());
        assert!(renderer.find(9).is_none());
        renderer.render(9, "constancia", &fields()).unwrap();
        let (path, format) = renderer.find(9).unwrap();
        assert_eq!(format, DocumentFormat::Pdf);
        assert!(path.ends_with("tramite_9.pdf"));
    }
}
