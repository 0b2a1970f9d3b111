//! Quick-add controller
//!
//! Feeds free-text keystrokes through the debouncer and merges winning
//! extraction results into a draft item. The draft is what the add-item
//! dialog submits; extraction only ever fills fields, the user's raw
//! text is never lost.

use crate::config::EnrichConfig;
use crate::debounce::{Debouncer, Phase};
use crate::service::{EnrichError, EnrichmentService, ExtractedFields};
use chrono::NaiveTime;
use futures::FutureExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tripline_model::{at_time, parse_hm, DayKey, ItineraryItem, UserId, ValidationError};

/// Draft item being assembled from quick-add input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    /// Raw text as currently typed
    pub text: String,
    /// Extracted or user-chosen title
    pub title: Option<String>,
    /// Extracted start time of day
    pub start: Option<NaiveTime>,
    /// Extracted end time of day
    pub end: Option<NaiveTime>,
    /// Extracted description
    pub description: Option<String>,
}

impl ItemDraft {
    /// Merge winning extraction results into the draft
    ///
    /// Times arrive as `HH:mm` strings from the black-box extractor and
    /// go through the parse boundary; a malformed one is skipped, it
    /// never poisons the draft.
    pub fn merge(&mut self, fields: &ExtractedFields) {
        if let Some(title) = &fields.title {
            if !title.trim().is_empty() {
                self.title = Some(title.clone());
            }
        }
        if let Some(hm) = &fields.start_hm {
            match parse_hm(hm) {
                Ok(t) => self.start = Some(t),
                Err(error) => tracing::debug!(%error, "skipping malformed extracted start"),
            }
        }
        if let Some(hm) = &fields.end_hm {
            match parse_hm(hm) {
                Ok(t) => self.end = Some(t),
                Err(error) => tracing::debug!(%error, "skipping malformed extracted end"),
            }
        }
        if let Some(description) = &fields.description {
            self.description = Some(description.clone());
        }
    }

    /// Build a real item for `day`, consuming the draft's fields
    ///
    /// An end at or before the start is taken to cross midnight; the
    /// item still files under `day` (the bucket key is authoritative).
    ///
    /// # Errors
    /// [`ValidationError::MissingField`] when title or times are absent.
    pub fn into_item(self, day: DayKey, creator: UserId) -> Result<ItineraryItem, ValidationError> {
        let title = self.title.ok_or(ValidationError::MissingField("title"))?;
        let start = self.start.ok_or(ValidationError::MissingField("start"))?;
        let end = self.end.ok_or(ValidationError::MissingField("end"))?;

        let start_at = at_time(day, start);
        let mut end_at = at_time(day, end);
        if end_at <= start_at {
            end_at += chrono::Duration::days(1);
        }

        let item = ItineraryItem::new(title, start_at, end_at, creator)?;
        Ok(match self.description {
            Some(description) => item.with_description(description),
            None => item,
        })
    }
}

/// Debounced quick-add input controller
///
/// One per dialog instance. Dropping it (or calling [`close`]) tears
/// down the timer and any in-flight extraction — nothing mutates the
/// draft after the dialog is gone.
///
/// [`close`]: QuickAddController::close
pub struct QuickAddController {
    draft: Arc<Mutex<ItemDraft>>,
    debouncer: Debouncer<String, ExtractedFields>,
}

impl QuickAddController {
    /// Create a controller backed by `service`
    #[must_use]
    pub fn new<S: EnrichmentService>(service: Arc<S>, config: EnrichConfig) -> Self {
        let draft = Arc::new(Mutex::new(ItemDraft::default()));
        let merge_target = Arc::clone(&draft);
        let min_len = config.min_input_len;

        let debouncer = Debouncer::new(config.debounce, move |text: String| {
            let service = Arc::clone(&service);
            async move { service.extract(&text).await }.boxed()
        })
        .with_gate(move |text: &String| text.trim().chars().count() >= min_len)
        .with_on_apply(move |_text: &String, fields: &ExtractedFields| {
            merge_target.lock().merge(fields);
        });

        Self { draft, debouncer }
    }

    /// Record a keystroke's new field value
    pub fn on_input(&self, text: &str) {
        self.draft.lock().text = text.to_string();
        self.debouncer.on_input(text.to_string());
    }

    /// Snapshot of the current draft
    #[inline]
    #[must_use]
    pub fn draft(&self) -> ItemDraft {
        self.draft.lock().clone()
    }

    /// Current settle-cycle phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.debouncer.phase()
    }

    /// Most recent retryable extraction failure
    #[inline]
    #[must_use]
    pub fn last_error(&self) -> Option<EnrichError> {
        self.debouncer.last_error()
    }

    /// Teardown path for dialog close / unmount
    pub fn close(&self) {
        self.debouncer.close();
    }
}
