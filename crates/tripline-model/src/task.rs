//! Trip tasks
//!
//! Lightweight to-dos owned by the trip. Completion is role-gated at the
//! coordinator (assignee or admin); the model only carries state.

use crate::error::ValidationError;
use crate::ids::{TaskId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A trip to-do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier
    pub id: TaskId,
    /// Short title
    pub title: String,
    /// Optional due date
    #[serde(default)]
    pub due: Option<NaiveDate>,
    /// Optional assignee
    #[serde(default)]
    pub assignee: Option<UserId>,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// Creator identity
    pub creator: UserId,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new open task
    ///
    /// # Errors
    /// [`ValidationError::MissingField`] when the title is blank.
    pub fn new(title: impl Into<String>, creator: UserId) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }

        Ok(Self {
            id: TaskId::new(),
            title,
            due: None,
            assignee: None,
            completed: false,
            creator,
            created_at: Utc::now(),
        })
    }

    /// Set the due date
    #[inline]
    #[must_use]
    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.due = Some(due);
        self
    }

    /// Assign to a collaborator
    #[inline]
    #[must_use]
    pub fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Whether `user` is the assignee
    #[inline]
    #[must_use]
    pub fn is_assignee(&self, user: &UserId) -> bool {
        self.assignee.as_ref() == Some(user)
    }
}
