//! Document Text Extractor: turns an uploaded PDF into plain text.
//!
//! Parsing is delegated to `pdf-extract`. A document the parser rejects is a
//! hard failure for the request; nothing here tries to recover partial text.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Could not read PDF: {0}")]
    Parse(String),

    #[error("PDF parser aborted: {0}")]
    Aborted(String),
}

/// Concatenates per-page text in page order. No separator is inserted.
pub fn concat_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages.into_iter().fold(String::new(), |mut text, page| {
        text.push_str(page.as_ref());
        text
    })
}

/// Extracts the text of every page of `pdf` and joins it.
/// Zero pages yields an empty string.
pub fn extract_text_from_pdf(pdf: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf)
        .map_err(|e| ExtractError::Parse(e.to_string()))?;
    debug!("Extracted {} page(s) from PDF", pages.len());
    Ok(concat_pages(pages))
}

/// Runs extraction on the blocking pool; a parser panic becomes `Aborted`.
pub async fn extract_text_from_upload(pdf: Bytes) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text_from_pdf(&pdf))
        .await
        .map_err(|e| ExtractError::Aborted(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PAGE_PDF: &[u8] = include_bytes!("../../fixtures/two_page_resume.pdf");

    #[test]
    fn test_two_page_pdf_keeps_page_order() {
        let pages = pdf_extract::extract_text_from_mem_by_pages(TWO_PAGE_PDF).unwrap();
        assert_eq!(pages.len(), 2);

        let text = extract_text_from_pdf(TWO_PAGE_PDF).unwrap();
        let first = text.find("FIRSTPAGE").unwrap();
        let second = text.find("SECONDPAGE").unwrap();
        assert!(first < second);
        assert!(text.contains("Jane"));
        assert!(text.contains("TensorFlow"));
    }

    #[tokio::test]
    async fn test_upload_extracts_on_blocking_pool() {
        let text = extract_text_from_upload(Bytes::from_static(TWO_PAGE_PDF))
            .await
            .unwrap();
        assert!(text.contains("FIRSTPAGE"));
    }

    #[test]
    fn test_concat_pages_keeps_page_order() {
        let text = concat_pages(["Page 1 content ", "Page 2 content"]);
        assert_eq!(text, "Page 1 content Page 2 content");
    }

    #[test]
    fn test_concat_pages_single_page() {
        assert_eq!(concat_pages(["Sample resume text"]), "Sample resume text");
    }

    #[test]
    fn test_concat_pages_zero_pages_is_empty() {
        let pages: Vec<String> = Vec::new();
        assert_eq!(concat_pages(pages), "");
    }

    #[test]
    fn test_concat_pages_preserves_special_characters() {
        let text = concat_pages(vec![
            "Python, C++, C# & Java\n".to_string(),
            "Salary: $100,000-$150,000".to_string(),
        ]);
        assert!(text.contains("C# & Java"));
        assert!(text.contains('$'));
    }

    #[test]
    fn test_non_pdf_bytes_are_rejected() {
        let result = extract_text_from_pdf(b"this is definitely not a pdf");
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[tokio::test]
    async fn test_upload_of_garbage_is_an_error() {
        let result = extract_text_from_upload(Bytes::from_static(b"%PDF-garbage")).await;
        assert!(result.is_err());
    }
}
