//! Attachment analysis
//!
//! Re-uses the generic debounce primitive for file-to-annotation
//! extraction: picking a different file supersedes the running
//! analysis exactly like a keystroke supersedes a text extraction.

use crate::config::EnrichConfig;
use crate::debounce::{Debouncer, Phase};
use crate::service::EnrichmentService;
use futures::FutureExt;
use std::sync::Arc;

/// A selected file awaiting analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInput {
    /// Raw file bytes
    pub bytes: Vec<u8>,
    /// MIME type reported by the picker
    pub mime_type: String,
}

/// Debounced attachment-to-annotation analyzer
pub struct AttachmentAnalyzer {
    debouncer: Debouncer<AttachmentInput, String>,
}

impl AttachmentAnalyzer {
    /// Create an analyzer backed by `service`
    #[must_use]
    pub fn new<S: EnrichmentService>(service: Arc<S>, config: EnrichConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce, move |input: AttachmentInput| {
            let service = Arc::clone(&service);
            async move {
                service
                    .extract_from_attachment(&input.bytes, &input.mime_type)
                    .await
            }
            .boxed()
        })
        .with_gate(|input: &AttachmentInput| !input.bytes.is_empty());

        Self { debouncer }
    }

    /// A file was (re)selected
    pub fn on_attachment(&self, bytes: Vec<u8>, mime_type: impl Into<String>) {
        self.debouncer.on_input(AttachmentInput {
            bytes,
            mime_type: mime_type.into(),
        });
    }

    /// Annotation for the most recently settled file, if any
    #[inline]
    #[must_use]
    pub fn annotation(&self) -> Option<String> {
        self.debouncer.latest()
    }

    /// Current settle-cycle phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.debouncer.phase()
    }

    /// Teardown path for dialog close / unmount
    pub fn close(&self) {
        self.debouncer.close();
    }
}
