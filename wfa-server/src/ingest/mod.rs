//! Upload ingestion
//!
//! bytes + declared media type → plain text (PDF pages extracted when
//! needed) → tokenize → aggregate → store. Returns the new analysis id.
//!
//! The CPU-bound part runs on the blocking thread pool; the store is only
//! touched once the frequencies are ready.

pub mod pdf;

use axum::body::Bytes;
use std::fmt;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wfa_common::api::WordFrequency;

use crate::analysis::analyze_text;
use crate::error::IngestError;
use crate::store::AnalysisStore;

pub use pdf::{LopdfExtractor, PageFailurePolicy, PdfExtractor, PdfPages};

/// Accepted upload media types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    TextPlain,
    ApplicationPdf,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::TextPlain => "text/plain",
            MediaType::ApplicationPdf => "application/pdf",
        }
    }
}

impl FromStr for MediaType {
    type Err = IngestError;

    /// Exact match on the essence. Parameters are tolerated for `text/plain`
    /// only, and a declared `charset` must be one the UTF-8 decoder can read
    /// (`utf-8` or `us-ascii`); `text/plain; charset=utf-16` is rejected.
    fn from_str(declared: &str) -> Result<Self, Self::Err> {
        let declared = declared.trim();
        let unsupported = || IngestError::UnsupportedMediaType(declared.to_string());
        let (essence, params) = match declared.split_once(';') {
            Some((essence, params)) => (essence.trim(), Some(params)),
            None => (declared, None),
        };

        match (essence, params) {
            ("text/plain", None) => Ok(MediaType::TextPlain),
            ("text/plain", Some(params)) => {
                if utf8_compatible_params(params) {
                    Ok(MediaType::TextPlain)
                } else {
                    Err(unsupported())
                }
            }
            ("application/pdf", None) => Ok(MediaType::ApplicationPdf),
            _ => Err(unsupported()),
        }
    }
}

/// `false` when any `charset=` parameter names something other than UTF-8
/// or its ASCII subset
fn utf8_compatible_params(params: &str) -> bool {
    params
        .split(';')
        .filter_map(|param| param.split_once('='))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .all(|(_, value)| {
            let charset = value.trim().trim_matches('"');
            ["utf-8", "utf8", "us-ascii"]
                .iter()
                .any(|known| charset.eq_ignore_ascii_case(known))
        })
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns uploads into stored analyses
pub struct Ingestor {
    store: Arc<AnalysisStore>,
    pdf: Arc<dyn PdfExtractor>,
    page_policy: PageFailurePolicy,
}

impl Ingestor {
    /// Ingestor using lopdf and the lenient (skip) page policy
    pub fn new(store: Arc<AnalysisStore>) -> Self {
        Self {
            store,
            pdf: Arc::new(LopdfExtractor),
            page_policy: PageFailurePolicy::default(),
        }
    }

    pub fn with_pdf_extractor(mut self, pdf: Arc<dyn PdfExtractor>) -> Self {
        self.pdf = pdf;
        self
    }

    pub fn with_page_policy(mut self, page_policy: PageFailurePolicy) -> Self {
        self.page_policy = page_policy;
        self
    }

    pub fn page_policy(&self) -> PageFailurePolicy {
        self.page_policy
    }

    pub fn store(&self) -> &Arc<AnalysisStore> {
        &self.store
    }

    /// Analyze an in-memory upload and store the result
    ///
    /// The media type is checked before any processing; an unsupported type
    /// leaves the store untouched.
    pub async fn ingest(
        &self,
        bytes: Bytes,
        declared_media_type: &str,
    ) -> Result<String, IngestError> {
        let media_type: MediaType = declared_media_type.parse()?;
        debug!("Ingesting {} bytes as {}", bytes.len(), media_type);

        let analyzer = self.analyzer();
        let frequencies = run_blocking(move || analyzer.analyze(&bytes, media_type)).await?;
        self.commit(frequencies).await
    }

    /// Like [`Ingestor::ingest`], consuming a byte stream
    ///
    /// A stream that fails before reaching EOF yields [`IngestError::Read`].
    pub async fn ingest_reader<R>(
        &self,
        reader: R,
        declared_media_type: &str,
    ) -> Result<String, IngestError>
    where
        R: Read + Send + 'static,
    {
        let media_type: MediaType = declared_media_type.parse()?;

        let analyzer = self.analyzer();
        let frequencies = run_blocking(move || {
            let mut reader = reader;
            let mut bytes = Vec::new();
            reader
                .read_to_end(&mut bytes)
                .map_err(|e| IngestError::Read(e.to_string()))?;
            debug!("Read {} bytes as {}", bytes.len(), media_type);
            analyzer.analyze(&bytes, media_type)
        })
        .await?;
        self.commit(frequencies).await
    }

    /// Synchronous extraction + analysis, without storing
    pub fn analyze(
        &self,
        bytes: &[u8],
        media_type: MediaType,
    ) -> Result<Vec<WordFrequency>, IngestError> {
        self.analyzer().analyze(bytes, media_type)
    }

    fn analyzer(&self) -> Analyzer {
        Analyzer {
            pdf: Arc::clone(&self.pdf),
            page_policy: self.page_policy,
        }
    }

    async fn commit(&self, frequencies: Vec<WordFrequency>) -> Result<String, IngestError> {
        let words = frequencies.len();
        let id = self.store.create(frequencies).await?;
        info!(analysis_id = %id, words, "Analysis stored");
        Ok(id)
    }
}

/// Owned slice of the ingestor that can move onto the blocking pool
struct Analyzer {
    pdf: Arc<dyn PdfExtractor>,
    page_policy: PageFailurePolicy,
}

impl Analyzer {
    fn analyze(
        &self,
        bytes: &[u8],
        media_type: MediaType,
    ) -> Result<Vec<WordFrequency>, IngestError> {
        let text = match media_type {
            MediaType::TextPlain => String::from_utf8_lossy(bytes).into_owned(),
            MediaType::ApplicationPdf => {
                let pages = self.pdf.open(bytes)?;
                let extracted = pdf::extract_pages(pages.as_ref(), self.page_policy)?;
                if !extracted.skipped_pages.is_empty() {
                    warn!(
                        "PDF analysis is missing {} of {} pages: {:?}",
                        extracted.skipped_pages.len(),
                        pages.page_count(),
                        extracted.skipped_pages
                    );
                }
                extracted.text
            }
        };

        let frequencies = analyze_text(&text);
        debug!("Analyzed {} chars into {} distinct words", text.len(), frequencies.len());
        Ok(frequencies)
    }
}

/// Run CPU-bound work off the async runtime, re-raising panics
async fn run_blocking<T, F>(work: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(value) => value,
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}
