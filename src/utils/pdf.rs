//! PDF text extraction utilities.
//!
//! Text is pulled page by page with the pure-Rust `lopdf` reader, so no native
//! libraries are needed. Each page's text is followed by a `Page Number: <n>`
//! marker line so downstream readers can cite pages.

use std::path::Path;

use lopdf::Document;
use thiserror::Error;

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),

    #[error("File not found or not a valid PDF: {0}")]
    InvalidFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract text from a PDF file, page by page
///
/// Returns every page's text in order, each followed by
/// `"\nPage Number: <n>"` (1-indexed). Pages are concatenated with no extra
/// separator. A page whose text cannot be decoded contributes empty text but
/// keeps its marker.
///
/// # Examples
///
/// ```ignore
/// let text = read_pdf(Path::new("data/papers/2301.12345.pdf"))?;
/// assert!(text.contains("Page Number: 1"));
/// ```
pub fn read_pdf(path: &Path) -> Result<String, PdfExtractError> {
    if !path.exists() {
        return Err(PdfExtractError::InvalidFile(format!(
            "File not found: {}",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(PdfExtractError::InvalidFile(format!(
            "Not a file: {}",
            path.display()
        )));
    }

    let document = Document::load(path).map_err(|e| {
        PdfExtractError::ExtractionFailed(format!("{}: {}", path.display(), e))
    })?;

    let pages = document.get_pages();
    let texts = pages.keys().map(|&page_number| {
        document.extract_text(&[page_number]).unwrap_or_else(|e| {
            tracing::debug!(
                "No text extracted from page {} of {}: {}",
                page_number,
                path.display(),
                e
            );
            String::new()
        })
    });

    let text = join_pages(texts);
    if text.is_empty() {
        tracing::debug!("PDF has no pages: {}", path.display());
    }
    Ok(text)
}

/// Number of pages in a PDF file
pub fn page_count(path: &Path) -> Result<usize, PdfExtractError> {
    let document = Document::load(path).map_err(|e| {
        PdfExtractError::ExtractionFailed(format!("{}: {}", path.display(), e))
    })?;
    Ok(document.get_pages().len())
}

/// Interleave page texts with 1-indexed page markers
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, page) in pages.into_iter().enumerate() {
        out.push_str(page.as_ref());
        out.push_str("\nPage Number: ");
        out.push_str(&(i + 1).to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a minimal PDF with one line of Helvetica text per page
    fn write_pdf(path: &Path, pages: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_join_pages_layout() {
        assert_eq!(
            join_pages(["first", "second"]),
            "first\nPage Number: 1second\nPage Number: 2"
        );
        assert_eq!(join_pages(Vec::<String>::new()), "");
    }

    #[test]
    fn test_read_pdf_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        write_pdf(&path, &["Introduction", "Results", "Conclusion"]);

        let text = read_pdf(&path).unwrap();
        let p1 = text.find("Page Number: 1").unwrap();
        let p2 = text.find("Page Number: 2").unwrap();
        let p3 = text.find("Page Number: 3").unwrap();
        assert!(p1 < p2 && p2 < p3);
        assert!(text.ends_with("Page Number: 3"));
        assert!(text[..p1].contains("Introduction"));
        assert!(text[p2..p3].contains("Conclusion"));

        assert_eq!(page_count(&path).unwrap(), 3);
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_pdf(Path::new("/nonexistent/file.pdf"));
        assert!(matches!(result, Err(PdfExtractError::InvalidFile(_))));
    }

    #[test]
    fn test_read_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_pdf(dir.path());
        assert!(matches!(result, Err(PdfExtractError::InvalidFile(_))));
    }

    #[test]
    fn test_read_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"plain text, not a PDF").unwrap();

        let result = read_pdf(&path);
        assert!(matches!(result, Err(PdfExtractError::ExtractionFailed(_))));
    }
}
