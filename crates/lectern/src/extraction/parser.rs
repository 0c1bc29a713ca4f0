//! Text extraction from PDF and PPTX lecture files

use std::io::Read;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};

use super::upload::SavedUpload;

/// pdf-extract can spin on malformed files, so it runs on its own
/// thread with a deadline.
const PDF_EXTRACT_TIMEOUT_SECS: u64 = 60;

/// Supported lecture file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Pptx,
}

impl FileKind {
    /// Detect the format from a filename extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())?;

        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }
}

/// Multi-format text extractor for lecture uploads
pub struct TextExtractor;

impl TextExtractor {
    /// Extract text from an upload, dispatched on the file extension.
    ///
    /// Fails with [`Error::UnsupportedFileType`] for anything that is
    /// not PDF or PPTX, and with a parse error when no text can be
    /// recovered.
    pub fn extract(upload: &SavedUpload) -> Result<String> {
        let filename = upload.filename();
        let kind = FileKind::from_filename(filename).ok_or_else(|| {
            let extension = Path::new(filename)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string();
            Error::UnsupportedFileType(extension)
        })?;

        let data = std::fs::read(upload.path())?;
        tracing::info!("Extracting text from {} ({} bytes)", filename, data.len());

        match kind {
            FileKind::Pdf => Self::extract_pdf(filename, &data),
            FileKind::Pptx => Self::extract_pptx(filename, &data),
        }
    }

    /// Extract text for the chat path. PDF and PPTX are parsed;
    /// anything else is read as plain text. Parse failures yield empty
    /// text so the caller can answer with its fixed no-text message.
    pub fn extract_notes(upload: &SavedUpload) -> Result<String> {
        let filename = upload.filename();
        let data = std::fs::read(upload.path())?;

        let text = match FileKind::from_filename(filename) {
            Some(FileKind::Pdf) => Self::extract_pdf(filename, &data).unwrap_or_else(|e| {
                tracing::warn!("Notes extraction failed for {}: {}", filename, e);
                String::new()
            }),
            Some(FileKind::Pptx) => Self::extract_pptx(filename, &data).unwrap_or_else(|e| {
                tracing::warn!("Notes extraction failed for {}: {}", filename, e);
                String::new()
            }),
            None => String::from_utf8_lossy(&data).into_owned(),
        };

        Ok(text)
    }

    fn extract_pdf(filename: &str, data: &[u8]) -> Result<String> {
        let content = match Self::extract_pdf_primary(filename, data) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("Primary PDF extraction found no text, trying fallback");
                Self::extract_pdf_fallback(filename, data)?
            }
            Err(e) => {
                tracing::warn!("Primary PDF extraction failed ({}), trying fallback", e);
                Self::extract_pdf_fallback(filename, data)?
            }
        };

        let content = content
            .replace('\0', "")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if content.is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text content could be extracted from PDF",
            ));
        }

        Ok(content)
    }

    /// Run pdf-extract on a worker thread with a deadline.
    fn extract_pdf_primary(filename: &str, data: &[u8]) -> Result<String> {
        let data = data.to_vec();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(Duration::from_secs(PDF_EXTRACT_TIMEOUT_SECS)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(Error::file_parse(filename, format!("pdf-extract failed: {}", e))),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(Error::file_parse(
                filename,
                format!("PDF extraction timed out after {}s", PDF_EXTRACT_TIMEOUT_SECS),
            )),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(Error::file_parse(filename, "PDF extraction thread panicked"))
            }
        }
    }

    /// Walk the page content streams directly with lopdf. Catches PDFs
    /// whose fonts or encodings trip up pdf-extract.
    fn extract_pdf_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let mut all_text = String::new();
        for (page_number, page_id) in doc.get_pages() {
            match doc.get_page_content(page_id) {
                Ok(content) => {
                    let page_text = Self::content_stream_text(&content);
                    if !page_text.trim().is_empty() {
                        all_text.push_str(&page_text);
                        all_text.push('\n');
                    }
                }
                Err(e) => {
                    tracing::debug!("Skipping page {}: {}", page_number, e);
                }
            }
        }

        if all_text.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "PDF appears to be image-based or has no extractable text",
            ));
        }

        Ok(all_text)
    }

    /// Pull string literals out of BT..ET text blocks in a content
    /// stream. Handles the standard escapes and nested parentheses.
    fn content_stream_text(content: &[u8]) -> String {
        let stream = String::from_utf8_lossy(content);
        let mut chars = stream.chars().peekable();
        let mut text = String::new();
        let mut in_text_block = false;

        while let Some(c) = chars.next() {
            if !in_text_block {
                if c == 'B' && chars.peek() == Some(&'T') {
                    chars.next();
                    in_text_block = true;
                }
                continue;
            }

            match c {
                'E' if chars.peek() == Some(&'T') => {
                    chars.next();
                    in_text_block = false;
                    text.push('\n');
                }
                '(' => {
                    let mut depth = 0usize;
                    while let Some(sc) = chars.next() {
                        match sc {
                            '\\' => {
                                if let Some(escaped) = chars.next() {
                                    match escaped {
                                        'n' => text.push('\n'),
                                        'r' => text.push('\r'),
                                        't' => text.push('\t'),
                                        '(' | ')' | '\\' => text.push(escaped),
                                        other => text.push(other),
                                    }
                                }
                            }
                            '(' => {
                                depth += 1;
                                text.push('(');
                            }
                            ')' => {
                                if depth == 0 {
                                    break;
                                }
                                depth -= 1;
                                text.push(')');
                            }
                            other => text.push(other),
                        }
                    }
                    text.push(' ');
                }
                _ => {}
            }
        }

        text
    }

    /// PPTX is a zip of XML parts; slide text lives in `a:t` runs under
    /// `ppt/slides/slideN.xml`. Slides are read in numeric order, one
    /// line per paragraph.
    fn extract_pptx(filename: &str, data: &[u8]) -> Result<String> {
        let cursor = std::io::Cursor::new(data);
        let mut archive = zip::ZipArchive::new(cursor)
            .map_err(|e| Error::file_parse(filename, format!("Not a valid PPTX archive: {}", e)))?;

        let mut slide_names: Vec<String> = archive
            .file_names()
            .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
            .map(|name| name.to_string())
            .collect();

        slide_names.sort_by_key(|name| {
            name.trim_start_matches("ppt/slides/slide")
                .trim_end_matches(".xml")
                .parse::<u32>()
                .unwrap_or(0)
        });

        let mut content = String::new();
        for slide_name in &slide_names {
            let mut xml = String::new();
            match archive.by_name(slide_name) {
                Ok(mut file) => {
                    if file.read_to_string(&mut xml).is_err() {
                        tracing::debug!("Skipping unreadable slide {}", slide_name);
                        continue;
                    }
                }
                Err(e) => {
                    tracing::debug!("Skipping slide {}: {}", slide_name, e);
                    continue;
                }
            }

            let slide_text = Self::slide_text(&xml);
            if !slide_text.is_empty() {
                content.push_str(&slide_text);
                content.push('\n');
            }
        }

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text content could be extracted from presentation",
            ));
        }

        Ok(content)
    }

    fn slide_text(xml: &str) -> String {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut lines: Vec<String> = Vec::new();
        let mut current_line = String::new();
        let mut in_text_run = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => {
                    in_text_run = true;
                }
                Ok(Event::Text(e)) => {
                    if in_text_run {
                        if let Ok(fragment) = e.unescape() {
                            current_line.push_str(&fragment);
                        }
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"t" => in_text_run = false,
                    b"p" => {
                        let line = current_line.trim().to_string();
                        if !line.is_empty() {
                            lines.push(line);
                        }
                        current_line.clear();
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(_) => break,
                _ => {}
            }
        }

        let tail = current_line.trim();
        if !tail.is_empty() {
            lines.push(tail.to_string());
        }

        lines.join("\n")
    }
}
