//! Document loading — page-level text extraction for the two supported
//! resume formats. PDF text comes from `pdf-extract`; DOCX bodies are read
//! straight out of the OOXML archive (`word/document.xml`).

use std::fs;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

/// One page worth of extracted text.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPage {
    /// 1-based page number within the source document.
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("DOCX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unsupported document extension: '{0}'")]
    Unsupported(String),
}

/// Produces page-level text for a document path. The pipeline and tests
/// depend on this seam, not on the concrete parsers.
pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Vec<DocumentPage>, LoadError>;
}

/// Extension-dispatching loader over the real file parsers.
pub struct FileLoader;

impl DocumentLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Vec<DocumentPage>, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => load_pdf(path),
            "docx" => load_docx(path),
            other => Err(LoadError::Unsupported(other.to_string())),
        }
    }
}

fn load_pdf(path: &Path) -> Result<Vec<DocumentPage>, LoadError> {
    let text = pdf_extract::extract_text(path)?;
    // pdf-extract separates pages with form feeds; without them the whole
    // document is treated as a single page.
    Ok(collect_pages(text.split('\u{0c}')))
}

fn load_docx(path: &Path) -> Result<Vec<DocumentPage>, LoadError> {
    let file = fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;
    let text = plaintext_from_docx_xml(&xml)?;
    Ok(collect_pages(std::iter::once(text.as_str())))
}

/// Pulls the visible text out of an OOXML document body: `w:t` runs carry
/// the characters, paragraph and line-break elements become newlines.
fn plaintext_from_docx_xml(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"w:br" => text.push('\n'),
            Event::Text(t) if in_text_run => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}

fn collect_pages<'a>(segments: impl Iterator<Item = &'a str>) -> Vec<DocumentPage> {
    let mut pages = Vec::new();
    for (i, segment) in segments.enumerate() {
        let number = i + 1;
        if segment.trim().is_empty() {
            debug!("document has empty page: {number}");
            continue;
        }
        debug!("page {} length: {}", number, segment.len());
        pages.push(DocumentPage {
            number,
            text: segment.to_string(),
        });
    }
    pages
}
