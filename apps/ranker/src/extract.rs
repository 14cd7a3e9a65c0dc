//! Plain-text extraction from resume and job description files.
//!
//! Supports `.pdf` (via `pdf-extract`, all pages in document order) and
//! `.docx` (OOXML container opened with `zip`, `word/document.xml` streamed
//! with `quick-xml`). Extension matching is case-insensitive.
//!
//! An unreadable or malformed file is an `Extraction` error, never an empty
//! success. Empty text from a well-formed file is a valid result and is
//! handled downstream by the scorer.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::{RankError, Result};

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// File format inferred from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Unsupported,
}

impl DocumentFormat {
    /// Infers the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> DocumentFormat {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => DocumentFormat::Pdf,
            Some("docx") => DocumentFormat::Docx,
            _ => DocumentFormat::Unsupported,
        }
    }
}

/// Role a document plays in a ranking request. Carried for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    JobDescription,
    Resume,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::JobDescription => write!(f, "job description"),
            DocumentRole::Resume => write!(f, "resume"),
        }
    }
}

/// An input file scheduled for extraction. Immutable once built.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub format: DocumentFormat,
    pub role: DocumentRole,
}

impl SourceDocument {
    pub fn new(path: PathBuf, role: DocumentRole) -> Self {
        let format = DocumentFormat::from_path(&path);
        SourceDocument { path, format, role }
    }

    /// Document identifier: the full path rendered as a string. Unique per
    /// request even when two candidates upload files with the same name.
    pub fn id(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Raw text recovered from one source document.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub id: String,
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

/// Extracts plain text from a source document.
///
/// Blocking (file I/O plus parsing); callers run this on the blocking pool.
pub fn extract(doc: &SourceDocument) -> Result<ExtractedText> {
    let text = match doc.format {
        DocumentFormat::Pdf => extract_pdf(&doc.path)?,
        DocumentFormat::Docx => extract_docx(&doc.path)?,
        DocumentFormat::Unsupported => {
            return Err(RankError::UnsupportedFormat(format!(
                "{}: a {} must be a .pdf or .docx file",
                doc.path.display(),
                doc.role
            )))
        }
    };
    Ok(ExtractedText {
        id: doc.id(),
        text,
    })
}

fn extract_pdf(path: &Path) -> Result<String> {
    // pdf-extract panics on fonts and encodings it does not recognize; a
    // panic counts as an unreadable document, same as an Err return.
    match std::panic::catch_unwind(|| pdf_extract::extract_text(path)) {
        Ok(outcome) => outcome.map_err(|e| {
            RankError::Extraction(format!("{}: PDF parse failed: {e}", path.display()))
        }),
        Err(_) => Err(RankError::Extraction(format!(
            "{}: panic during PDF text extraction",
            path.display()
        ))),
    }
}

fn extract_docx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)
        .map_err(|e| RankError::Extraction(format!("{}: cannot open: {e}", path.display())))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| {
        RankError::Extraction(format!("{}: not a valid DOCX archive: {e}", path.display()))
    })?;
    let mut entry = archive.by_name("word/document.xml").map_err(|e| {
        RankError::Extraction(format!("{}: missing word/document.xml: {e}", path.display()))
    })?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml).map_err(|e| {
        RankError::Extraction(format!("{}: unreadable document XML: {e}", path.display()))
    })?;

    document_xml_text(&xml)
        .map_err(|e| RankError::Extraction(format!("{}: malformed document XML: {e}", path.display())))
}

/// Recovers visible text from a DOCX `word/document.xml` body.
///
/// Every `w:p` paragraph ends with a newline; list items and headings are
/// ordinary paragraphs so they come through with the same rule. Explicit
/// breaks become newlines, tab marks become spaces.
fn document_xml_text(xml: &str) -> std::result::Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) => {
                if e.name().as_ref() == b"w:t" {
                    in_text_run = true;
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => out.push(' '),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                out.push_str(&t.unescape()?);
            }
            _ => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_docx, write_pdf, write_pdf_with_font_encoding};
    use std::io::Write;

    #[test]
    fn test_format_inference_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.PDF")),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.Docx")),
            DocumentFormat::Docx
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.txt")),
            DocumentFormat::Unsupported
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv")),
            DocumentFormat::Unsupported
        );
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "plain text resume").unwrap();

        let doc = SourceDocument::new(path, DocumentRole::Resume);
        let err = extract(&doc).unwrap_err();
        assert!(matches!(err, RankError::UnsupportedFormat(_)), "{err}");
    }

    #[test]
    fn test_docx_paragraphs_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(
            dir.path(),
            "cv.docx",
            &["Jane Doe", "Software Engineer", "Python and AWS"],
        );

        let doc = SourceDocument::new(path, DocumentRole::Resume);
        let extracted = extract(&doc).unwrap();
        assert_eq!(extracted.text, "Jane Doe\nSoftware Engineer\nPython and AWS\n");
    }

    #[test]
    fn test_docx_garbage_bytes_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"\x00\x01\x02 not a zip archive").unwrap();

        let doc = SourceDocument::new(path, DocumentRole::Resume);
        let err = extract(&doc).unwrap_err();
        assert!(matches!(err, RankError::Extraction(_)), "{err}");
    }

    #[test]
    fn test_pdf_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(
            dir.path(),
            "cv.pdf",
            &["Alpha skills summary", "Omega closing remarks"],
        );

        let doc = SourceDocument::new(path, DocumentRole::Resume);
        let text = extract(&doc).unwrap().text;
        let first = text.find("Alpha").unwrap();
        let second = text.find("Omega").unwrap();
        assert!(first < second, "pages out of order: {text:?}");
    }

    #[test]
    fn test_pdf_unknown_font_encoding_is_extraction_error() {
        // pdf-extract aborts on encoding names outside its known set; that
        // must surface as a document-scoped error, not take the caller down.
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf_with_font_encoding(
            dir.path(),
            "odd_font.pdf",
            &["Readable text in an unreadable font"],
            "BogusEncoding",
        );

        let doc = SourceDocument::new(path, DocumentRole::Resume);
        let err = extract(&doc).unwrap_err();
        assert!(matches!(err, RankError::Extraction(_)), "{err}");
        assert!(err.is_document_scoped());
    }

    #[test]
    fn test_missing_pdf_is_extraction_error() {
        let doc = SourceDocument::new(
            PathBuf::from("/nonexistent/resume.pdf"),
            DocumentRole::Resume,
        );
        let err = extract(&doc).unwrap_err();
        assert!(matches!(err, RankError::Extraction(_)), "{err}");
    }

    #[test]
    fn test_document_xml_breaks_and_tabs() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>line one</w:t><w:br/><w:t>line two</w:t></w:r></w:p>
                <w:p><w:r><w:t>left</w:t><w:tab/><w:t>right</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;
        let text = document_xml_text(xml).unwrap();
        assert_eq!(text, "line one\nline two\nleft right\n");
    }

    #[test]
    fn test_document_xml_unescapes_entities() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body><w:p><w:r><w:t>R&amp;D engineer</w:t></w:r></w:p></w:body>
            </w:document>"#;
        let text = document_xml_text(xml).unwrap();
        assert_eq!(text, "R&D engineer\n");
    }

    #[test]
    fn test_document_ignores_text_outside_runs() {
        // Whitespace between elements must not leak into the output.
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>only this</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;
        let text = document_xml_text(xml).unwrap();
        assert_eq!(text, "only this\n");
    }

    #[test]
    fn test_source_document_id_is_full_path() {
        let doc = SourceDocument::new(PathBuf::from("/tmp/a/cv.pdf"), DocumentRole::Resume);
        assert_eq!(doc.id(), "/tmp/a/cv.pdf");
    }
}
