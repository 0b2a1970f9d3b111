//! Enrichment service seam
//!
//! The extractor is a black box behind this trait: quality of its
//! natural-language understanding is out of scope. Calls are async,
//! fallible, and must tolerate being dropped mid-flight (cancellation
//! happens by dropping the future).

use async_trait::async_trait;

/// Structured fields extracted from free text
///
/// Every field is optional; the extractor fills what it can and the
/// draft merge keeps whatever the user already typed for the rest.
/// Times come back as bare `HH:mm` strings and are validated at the
/// parse boundary, not trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    /// Suggested item title
    pub title: Option<String>,
    /// Start time of day as `HH:mm`
    pub start_hm: Option<String>,
    /// End time of day as `HH:mm`
    pub end_hm: Option<String>,
    /// Longer description
    pub description: Option<String>,
}

/// Enrichment failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichError {
    /// Transient service failure; the caller may retry
    #[error("enrichment service failure: {0}")]
    Service(String),
}

/// Async seam to the text/attachment extractor
#[async_trait]
pub trait EnrichmentService: Send + Sync + 'static {
    /// Extract structured fields from free text
    async fn extract(&self, text: &str) -> Result<ExtractedFields, EnrichError>;

    /// Produce free-form annotated text describing an attachment
    async fn extract_from_attachment(
        &self,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, EnrichError>;
}
