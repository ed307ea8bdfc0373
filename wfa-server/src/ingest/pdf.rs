//! PDF text extraction
//!
//! The ingestion flow only needs "page count" and "text of page N", so the
//! PDF library sits behind [`PdfExtractor`]/[`PdfPages`]. [`LopdfExtractor`]
//! is the production implementation.

use tracing::warn;

use crate::error::IngestError;

/// What to do when a single page's text cannot be extracted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageFailurePolicy {
    /// Drop the page and keep going. The analysis may be silently incomplete.
    #[default]
    Skip,
    /// Fail the whole upload with a decode error
    Fail,
}

impl PageFailurePolicy {
    pub fn from_skip_flag(skip_failed_pages: bool) -> Self {
        if skip_failed_pages {
            PageFailurePolicy::Skip
        } else {
            PageFailurePolicy::Fail
        }
    }
}

/// An opened PDF document
pub trait PdfPages {
    /// Number of pages; pages are numbered `1..=page_count()`
    fn page_count(&self) -> u32;

    /// Plain text of one page
    fn page_text(&self, page: u32) -> Result<String, IngestError>;
}

/// Opens PDF bytes
pub trait PdfExtractor: Send + Sync {
    /// Parse the document structure. Fails with [`IngestError::Decode`] when
    /// the bytes are not a readable PDF.
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfPages>, IngestError>;
}

/// Text gathered from a document, plus the pages that contributed nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub skipped_pages: Vec<u32>,
}

/// Concatenate page texts in page order under `policy`
///
/// Pages are separated by a newline so the last word of one page never fuses
/// with the first word of the next.
pub fn extract_pages(
    pages: &dyn PdfPages,
    policy: PageFailurePolicy,
) -> Result<ExtractedText, IngestError> {
    let mut extracted = ExtractedText::default();

    for page in 1..=pages.page_count() {
        match pages.page_text(page) {
            Ok(text) => {
                if !extracted.text.is_empty() {
                    extracted.text.push('\n');
                }
                extracted.text.push_str(&text);
            }
            Err(e) => match policy {
                PageFailurePolicy::Skip => {
                    warn!("Skipping PDF page {}: {}", page, e);
                    extracted.skipped_pages.push(page);
                }
                PageFailurePolicy::Fail => {
                    return Err(match e {
                        IngestError::Decode(msg) => {
                            IngestError::Decode(format!("page {}: {}", page, msg))
                        }
                        other => other,
                    });
                }
            },
        }
    }

    Ok(extracted)
}

/// [`PdfExtractor`] backed by the `lopdf` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfPages>, IngestError> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| IngestError::Decode(format!("invalid PDF: {}", e)))?;
        let page_numbers = document.get_pages().keys().copied().collect();

        Ok(Box::new(LopdfPages {
            document,
            page_numbers,
        }))
    }
}

struct LopdfPages {
    document: lopdf::Document,
    /// Page numbers as reported by the page tree, in order
    page_numbers: Vec<u32>,
}

impl PdfPages for LopdfPages {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String, IngestError> {
        let number = page
            .checked_sub(1)
            .and_then(|index| self.page_numbers.get(index as usize))
            .ok_or_else(|| IngestError::Decode(format!("no page {}", page)))?;

        self.document
            .extract_text(&[*number])
            .map_err(|e| IngestError::Decode(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory document: `Ok` pages yield text, `Err` pages fail
    pub(crate) struct FakePages(pub Vec<Result<&'static str, &'static str>>);

    impl PdfPages for FakePages {
        fn page_count(&self) -> u32 {
            self.0.len() as u32
        }

        fn page_text(&self, page: u32) -> Result<String, IngestError> {
            match self.0[(page - 1) as usize] {
                Ok(text) => Ok(text.to_string()),
                Err(msg) => Err(IngestError::Decode(msg.to_string())),
            }
        }
    }

    /// Hands out a clone of the scripted pages for any input
    pub(crate) struct FakeExtractor(pub Vec<Result<&'static str, &'static str>>);

    impl PdfExtractor for FakeExtractor {
        fn open(&self, _bytes: &[u8]) -> Result<Box<dyn PdfPages>, IngestError> {
            Ok(Box::new(FakePages(self.0.clone())))
        }
    }

    /// Build a PDF with one page per entry, each showing that text
    pub(crate) fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
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
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_texts.len() as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pages_concatenated_in_order() {
        let pages = FakePages(vec![Ok("first page"), Ok("second"), Ok("third")]);
        let extracted = extract_pages(&pages, PageFailurePolicy::Skip).unwrap();

        assert_eq!(extracted.text, "first page\nsecond\nthird");
        assert!(extracted.skipped_pages.is_empty());
    }

    #[test]
    fn test_skip_policy_drops_failed_pages() {
        let pages = FakePages(vec![Ok("alpha"), Err("bad stream"), Ok("gamma"), Err("bad font")]);
        let extracted = extract_pages(&pages, PageFailurePolicy::Skip).unwrap();

        assert_eq!(extracted.text, "alpha\ngamma");
        assert_eq!(extracted.skipped_pages, vec![2, 4]);
    }

    #[test]
    fn test_fail_policy_reports_first_failed_page() {
        let pages = FakePages(vec![Ok("alpha"), Err("bad stream"), Err("bad font")]);
        let error = extract_pages(&pages, PageFailurePolicy::Fail).unwrap_err();

        assert_eq!(error, IngestError::Decode("page 2: bad stream".to_string()));
    }

    #[test]
    fn test_zero_pages() {
        let extracted = extract_pages(&FakePages(Vec::new()), PageFailurePolicy::Fail).unwrap();
        assert_eq!(extracted, ExtractedText::default());
    }

    #[test]
    fn test_policy_from_flag() {
        assert_eq!(PageFailurePolicy::from_skip_flag(true), PageFailurePolicy::Skip);
        assert_eq!(PageFailurePolicy::from_skip_flag(false), PageFailurePolicy::Fail);
        assert_eq!(PageFailurePolicy::default(), PageFailurePolicy::Skip);
    }

    #[test]
    fn test_lopdf_rejects_garbage() {
        let result = LopdfExtractor.open(b"definitely not a pdf");
        assert!(matches!(result, Err(IngestError::Decode(_))));
    }

    #[test]
    fn test_lopdf_reads_generated_document() {
        let bytes = build_pdf(&["Hello World", "Goodbye World"]);
        let pages = LopdfExtractor.open(&bytes).unwrap();

        assert_eq!(pages.page_count(), 2);
        assert!(pages.page_text(1).unwrap().contains("Hello World"));
        assert!(pages.page_text(2).unwrap().contains("Goodbye World"));
        assert!(pages.page_text(3).is_err());
        assert!(pages.page_text(0).is_err());
    }
}
