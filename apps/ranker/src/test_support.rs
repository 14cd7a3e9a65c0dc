//! Shared fixtures for the unit tests: deterministic DOCX and PDF files
//! assembled on the fly and an offline tokenizer provider, so no test reads
//! binary blobs from the tree or touches the network.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::json;

use crate::errors::Result;
use crate::score::models::TokenizerProvider;

const UNK: &str = "[UNK]";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

/// Writes a minimal but well-formed DOCX file, one `w:p` per paragraph.
pub fn write_docx(dir: &Path, name: &str, paragraphs: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(CONTENT_TYPES_XML.as_bytes()).unwrap();

    writer.start_file("word/document.xml", options).unwrap();
    writer
        .write_all(document_xml(paragraphs).as_bytes())
        .unwrap();

    writer.finish().unwrap();
    path
}

fn document_xml(paragraphs: &[&str]) -> String {
    let mut body = String::new();
    for paragraph in paragraphs {
        body.push_str("<w:p><w:r><w:t>");
        body.push_str(&escape_xml(paragraph));
        body.push_str("</w:t></w:r></w:p>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Writes a minimal single-font PDF, one page of Helvetica text per entry,
/// with the cross-reference offsets computed from the assembled body.
pub fn write_pdf(dir: &Path, name: &str, pages: &[&str]) -> PathBuf {
    write_pdf_with_font_encoding(dir, name, pages, "WinAnsiEncoding")
}

/// Same as [`write_pdf`] with an explicit font `/Encoding` name. PDF text
/// extractors only understand a handful of well-known encoding names, so an
/// unknown one exercises their failure handling on an otherwise valid file.
pub fn write_pdf_with_font_encoding(
    dir: &Path,
    name: &str,
    pages: &[&str],
    encoding: &str,
) -> PathBuf {
    let font_object = 3 + 2 * pages.len();
    let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 3 + i)).collect();

    let mut objects: Vec<String> = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    ];
    for content_object in (3 + pages.len())..(3 + 2 * pages.len()) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Contents {content_object} 0 R \
             /Resources << /Font << /F1 {font_object} 0 R >> >> >>"
        ));
    }
    for text in pages {
        let escaped = text
            .replace('\\', r"\\")
            .replace('(', r"\(")
            .replace(')', r"\)");
        let stream = format!("BT /F1 12 Tf 72 720 Td ({escaped}) Tj ET");
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }
    let widths = vec!["500"; 95].join(" ");
    objects.push(format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /{encoding} \
         /FirstChar 32 /LastChar 126 /Widths [{widths}] >>"
    ));

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{object}\nendobj\n", index + 1));
    }

    // Each cross-reference entry is exactly 20 bytes.
    let xref_offset = pdf.len();
    pdf.push_str(&format!(
        "xref\n0 {}\n0000000000 65535 f \n",
        objects.len() + 1
    ));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));

    let path = dir.join(name);
    std::fs::write(&path, pdf).unwrap();
    path
}

/// Offline stand-in for the Hub: serves one word-level `tokenizer.json`
/// built from the given texts, whatever the requested repo, and records
/// every request so tests can assert which ensemble variants were resolved.
pub struct FixtureTokenizerProvider {
    file: PathBuf,
    requested: Mutex<Vec<String>>,
    // Keeps the tokenizer file alive for the provider's lifetime.
    _dir: tempfile::TempDir,
}

impl FixtureTokenizerProvider {
    /// Builds the fixture vocabulary from normalized tokens of `texts`, the
    /// same form the ensemble feeds its tokenizers.
    pub fn with_vocab_texts(texts: &[&str]) -> Self {
        let mut vocab = serde_json::Map::new();
        vocab.insert(UNK.to_string(), json!(0));
        for text in texts {
            for token in crate::normalize::normalize(text).split_whitespace() {
                let next_id = vocab.len() as u64;
                vocab.entry(token.to_string()).or_insert(json!(next_id));
            }
        }

        // The stable `tokenizer.json` layout: a WordLevel model behind a
        // whitespace pre-tokenizer, nothing else.
        let config = json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": { "type": "WhitespaceSplit" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": UNK,
            },
        });

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tokenizer.json");
        std::fs::write(&file, serde_json::to_string(&config).unwrap()).unwrap();

        FixtureTokenizerProvider {
            file,
            requested: Mutex::new(Vec::new()),
            _dir: dir,
        }
    }

    /// Repo ids requested so far, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl TokenizerProvider for FixtureTokenizerProvider {
    fn tokenizer_file(&self, repo_id: &str) -> Result<PathBuf> {
        self.requested.lock().unwrap().push(repo_id.to_string());
        Ok(self.file.clone())
    }
}
