//! Tripline Enrichment Pipeline
//!
//! Debounced, cancelable text-to-structured-data extraction for "quick
//! add" input and attachment analysis.
//!
//! # Core Concepts
//!
//! - [`Debouncer`]: generic settle-then-extract primitive with
//!   last-writer-wins application and cooperative cancellation
//! - [`EnrichmentService`]: async seam to the black-box extractor
//! - [`QuickAddController`]: free-text input -> draft item fields
//! - [`AttachmentAnalyzer`]: the same primitive reused for file analysis
//!
//! # Example
//!
//! ```rust,ignore
//! use tripline_enrich::{EnrichConfig, QuickAddController};
//!
//! let controller = QuickAddController::new(service, EnrichConfig::new());
//! controller.on_input("Lunch at the harbour 12:30");
//! // ...after the input settles, the draft carries extracted fields:
//! let draft = controller.draft();
//! ```

#![warn(unreachable_pub)]

// Core modules
mod attachment;
mod config;
mod debounce;
mod quick_add;
mod service;

// Re-exports
pub use attachment::{AttachmentAnalyzer, AttachmentInput};
pub use config::EnrichConfig;
pub use debounce::{Debouncer, Phase};
pub use quick_add::{ItemDraft, QuickAddController};
pub use service::{EnrichError, EnrichmentService, ExtractedFields};
