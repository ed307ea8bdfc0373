//! Shared API request/response types

use serde::{Deserialize, Serialize};

// ========================================
// Analysis Types
// ========================================

/// One ranked entry of an analysis
///
/// Within one analysis `word` values are unique and `frequency` is at least 1.
///
/// # Examples
///
/// ```
/// use wfa_common::api::types::WordFrequency;
///
/// let entry = WordFrequency::new("cat", 2);
/// let json = serde_json::to_string(&entry).unwrap();
/// assert_eq!(json, r#"{"word":"cat","frequency":2}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct WordFrequency {
    /// Case-folded token
    pub word: String,

    /// Number of occurrences in the document
    pub frequency: u64,
}

impl WordFrequency {
    pub fn new(word: impl Into<String>, frequency: u64) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }
}

/// Stored result of processing one uploaded document
///
/// Body of `GET /api/analysis/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Analysis {
    /// Opaque identifier assigned when the analysis was stored
    pub id: String,

    /// Ranked frequencies, descending by count then ascending by word
    pub frequencies: Vec<WordFrequency>,
}

/// Body of a successful `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadResponse {
    pub id: String,
}

// ========================================
// Service Types
// ========================================

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Number of analyses currently held in memory
    pub analyses: usize,
}

/// Error response envelope
///
/// ```json
/// {"error": {"code": "NOT_FOUND", "message": "Analysis not found: abc"}}
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g. "UNSUPPORTED_MEDIA_TYPE")
    pub code: String,
    /// Human-readable description
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_wire_format() {
        let analysis = Analysis {
            id: "abc".to_string(),
            frequencies: vec![WordFrequency::new("the", 3), WordFrequency::new("cat", 2)],
        };

        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["frequencies"][0]["word"], "the");
        assert_eq!(value["frequencies"][0]["frequency"], 3);
        assert_eq!(value["frequencies"][1]["word"], "cat");
    }

    #[test]
    fn test_error_response_envelope() {
        let value = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "missing")).unwrap();
        assert_eq!(value["error"]["code"], "NOT_FOUND");
        assert_eq!(value["error"]["message"], "missing");
    }
}
