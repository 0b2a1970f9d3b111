//! Sync coordinator
//!
//! Applies one actor's mutations to one trip: validate, gate on role,
//! write an atomic batch, then append an activity record best-effort.
//! Permission checks here are a UX courtesy — an external authorization
//! layer must re-validate every write, since a client is never a
//! security boundary.

use crate::attachments::{AttachmentStore, FileUpload};
use crate::path::TreePath;
use crate::store::{StoreError, TripStore, Value};
use crate::tree::TripPaths;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tripline_model::{
    ActivityDetail, ActivityRecord, ActorContext, AdminGrant, Attachment, DayKey, ItemId,
    ItineraryItem, Rsvp, RsvpStatus, Task, TaskId, TripField, TripId, TripMeta, UserId,
    ValidationError,
};

/// Sync-layer failure taxonomy
///
/// Permission denials are a distinct class so the UI can explain *why*
/// an action was refused rather than showing a generic failure.
/// Cancellation is deliberately absent: superseded work is silent by
/// contract and never reaches this type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// Input rejected before any write was issued
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Role-gated action attempted without the required role
    #[error("permission denied: {action} requires {requirement}")]
    Permission {
        /// What was attempted
        action: &'static str,
        /// What it needs
        requirement: &'static str,
    },

    /// The target no longer exists (typically a concurrent deletion)
    #[error("not found: {0}")]
    NotFound(String),

    /// A stored value did not decode as its expected shape
    #[error("malformed stored value at {path}: {message}")]
    Corrupt {
        /// Offending path
        path: String,
        /// Decoder message
        message: String,
    },

    /// Transient store failure; retryable
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Permission-gated mutation surface for one actor on one trip
pub struct SyncCoordinator<S> {
    store: Arc<S>,
    paths: TripPaths,
    trip: TripId,
    actor: ActorContext,
}

impl<S: TripStore> SyncCoordinator<S> {
    /// Create a coordinator for `actor` acting on `trip`
    #[must_use]
    pub fn new(store: Arc<S>, trip: TripId, actor: ActorContext) -> Self {
        Self {
            store,
            paths: TripPaths::new(trip),
            trip,
            actor,
        }
    }

    /// Path layout for this trip
    #[inline]
    #[must_use]
    pub fn paths(&self) -> &TripPaths {
        &self.paths
    }

    /// The acting collaborator
    #[inline]
    #[must_use]
    pub fn actor(&self) -> &ActorContext {
        &self.actor
    }

    /// Bootstrap the trip: metadata plus the creator's admin grant and
    /// RSVP, in one atomic batch (the last-admin invariant holds from
    /// the very first write)
    ///
    /// # Errors
    /// [`SyncError::Store`] on write failure.
    pub async fn create_trip(&self, meta: &TripMeta) -> Result<(), SyncError> {
        let mut batch: Vec<(TreePath, Option<Value>)> = Vec::new();
        if let Some(name) = &meta.name {
            batch.push((self.paths.meta_field(TripField::Name), Some(encode(name)?)));
        }
        if let Some(destination) = &meta.destination {
            batch.push((
                self.paths.meta_field(TripField::Destination),
                Some(encode(destination)?),
            ));
        }
        if let Some(start) = &meta.start_date {
            batch.push((
                self.paths.meta_field(TripField::StartDate),
                Some(encode(start)?),
            ));
        }
        if let Some(end) = &meta.end_date {
            batch.push((self.paths.meta_field(TripField::EndDate), Some(encode(end)?)));
        }
        batch.push((
            self.paths.admin(&self.actor.user),
            Some(encode(&AdminGrant::by(self.actor.user.clone()))?),
        ));
        batch.push((
            self.paths.rsvp(&self.actor.user),
            Some(encode(&Rsvp {
                status: RsvpStatus::Going,
                display_name: self.actor.display_name.clone(),
            })?),
        ));

        self.store.write_batch(batch).await?;
        tracing::debug!(trip = %self.trip, "trip created");
        Ok(())
    }

    /// Add an item to its day bucket (derived from the item's start)
    ///
    /// # Errors
    /// [`SyncError::Store`] on write failure.
    pub async fn add_item(&self, item: &ItineraryItem) -> Result<(), SyncError> {
        let day = item.day();
        self.store
            .write_batch(vec![(self.paths.item(day, item.id), Some(encode(item)?))])
            .await?;

        self.record_activity(ActivityDetail::ItemAdded {
            day,
            item_id: item.id,
            name: item.name.clone(),
        })
        .await;
        Ok(())
    }

    /// Overwrite an existing item (edit-dialog submit)
    ///
    /// `previous_day` is the bucket the item currently lives in. When
    /// the edit moved the start onto a different calendar day, the old
    /// entry is removed and the new one written in a single atomic
    /// batch, so no observer ever sees the item twice or not at all.
    /// Last-write-wins at the item path: concurrent edits of the same
    /// item resolve to whichever write lands last.
    ///
    /// # Errors
    /// [`SyncError::NotFound`] when the item was concurrently deleted.
    pub async fn update_item(
        &self,
        previous_day: DayKey,
        item: &ItineraryItem,
    ) -> Result<(), SyncError> {
        let old_path = self.paths.item(previous_day, item.id);
        if self.store.read(&old_path).await?.is_null() {
            return Err(SyncError::NotFound(old_path.to_string()));
        }

        let new_path = self.paths.item(item.day(), item.id);
        let mut batch = Vec::with_capacity(2);
        if new_path != old_path {
            batch.push((old_path, None));
        }
        batch.push((new_path, Some(encode(item)?)));
        self.store.write_batch(batch).await?;
        Ok(())
    }

    /// Delete an item (admin only); removes exactly that item's subtree
    ///
    /// # Errors
    /// [`SyncError::Permission`] for non-admins, [`SyncError::NotFound`]
    /// when it is already gone.
    pub async fn delete_item(&self, day: DayKey, item: ItemId) -> Result<(), SyncError> {
        self.require_admin("delete item").await?;
        let path = self.paths.item(day, item);
        if self.store.read(&path).await?.is_null() {
            return Err(SyncError::NotFound(path.to_string()));
        }
        self.store.write_batch(vec![(path, None)]).await?;
        Ok(())
    }

    /// Toggle the actor's vote on an item; returns the new vote state
    ///
    /// Read-modify-write of the whole vote map. Concurrent toggles by
    /// different voters touch disjoint keys and are safe; two rapid
    /// toggles by the *same* voter can race their own stale read and
    /// lose one update. A real fix needs a per-key compare-and-swap the
    /// store API does not promise — accepted gap, not silently patched.
    ///
    /// # Errors
    /// [`SyncError::NotFound`] when the item no longer exists.
    pub async fn toggle_vote(&self, day: DayKey, item: ItemId) -> Result<bool, SyncError> {
        // Existence check and vote fetch are one read, so a concurrent
        // deletion cannot slip between them.
        let item_path = self.paths.item(day, item);
        let value = self.store.read(&item_path).await?;
        if value.is_null() {
            return Err(SyncError::NotFound(item_path.to_string()));
        }
        let current: ItineraryItem = decode(value, &item_path)?;
        let mut votes = current.votes;

        let voted = !votes.get(&self.actor.user).copied().unwrap_or(false);
        if voted {
            votes.insert(self.actor.user.clone(), true);
        } else {
            votes.remove(&self.actor.user);
        }

        self.store
            .write_batch(vec![(self.paths.item_votes(day, item), Some(encode(&votes)?))])
            .await?;

        self.record_activity(ActivityDetail::VoteToggled {
            day,
            item_id: item,
            voted,
        })
        .await;
        Ok(voted)
    }

    /// Set the actor's RSVP
    ///
    /// # Errors
    /// [`SyncError::Store`] on write failure.
    pub async fn set_rsvp(&self, status: RsvpStatus) -> Result<(), SyncError> {
        let rsvp = Rsvp {
            status,
            display_name: self.actor.display_name.clone(),
        };
        self.store
            .write_batch(vec![(self.paths.rsvp(&self.actor.user), Some(encode(&rsvp)?))])
            .await?;

        self.record_activity(ActivityDetail::RsvpChanged { status }).await;
        Ok(())
    }

    /// Create a task
    ///
    /// # Errors
    /// [`SyncError::Store`] on write failure.
    pub async fn create_task(&self, task: &Task) -> Result<(), SyncError> {
        self.store
            .write_batch(vec![(self.paths.task(task.id), Some(encode(task)?))])
            .await?;

        self.record_activity(ActivityDetail::TaskCreated {
            task_id: task.id,
            title: task.title.clone(),
        })
        .await;
        Ok(())
    }

    /// Toggle a task's completion flag (assignee or admin)
    ///
    /// Writes only the flag's path, so it never clobbers a concurrent
    /// edit of the task's other fields.
    ///
    /// # Errors
    /// [`SyncError::NotFound`] for a vanished task, [`SyncError::Permission`]
    /// when the actor is neither assignee nor admin.
    pub async fn set_task_completed(
        &self,
        task_id: TaskId,
        completed: bool,
    ) -> Result<(), SyncError> {
        let path = self.paths.task(task_id);
        let value = self.store.read(&path).await?;
        if value.is_null() {
            return Err(SyncError::NotFound(path.to_string()));
        }
        let task: Task = decode(value, &path)?;

        if !task.is_assignee(&self.actor.user) && !self.is_admin().await? {
            return Err(SyncError::Permission {
                action: "complete task",
                requirement: "assignee or admin",
            });
        }

        self.store
            .write_batch(vec![(
                self.paths.task_completed(task_id),
                Some(Value::Bool(completed)),
            )])
            .await?;

        self.record_activity(ActivityDetail::TaskCompleted { task_id, completed })
            .await;
        Ok(())
    }

    /// Delete a task (admin only)
    ///
    /// # Errors
    /// [`SyncError::Permission`] for non-admins, [`SyncError::NotFound`]
    /// when it is already gone.
    pub async fn delete_task(&self, task_id: TaskId) -> Result<(), SyncError> {
        self.require_admin("delete task").await?;
        let path = self.paths.task(task_id);
        if self.store.read(&path).await?.is_null() {
            return Err(SyncError::NotFound(path.to_string()));
        }
        self.store.write_batch(vec![(path, None)]).await?;
        Ok(())
    }

    /// Grant the admin role (admin only)
    ///
    /// # Errors
    /// [`SyncError::Permission`] for non-admins.
    pub async fn grant_admin(&self, user: &UserId) -> Result<(), SyncError> {
        self.require_admin("grant admin").await?;
        self.store
            .write_batch(vec![(
                self.paths.admin(user),
                Some(encode(&AdminGrant::by(self.actor.user.clone()))?),
            )])
            .await?;
        Ok(())
    }

    /// Revoke the admin role (admin only); rejected when it would leave
    /// the trip with zero admins
    ///
    /// # Errors
    /// [`SyncError::Permission`] for non-admins or on a last-admin
    /// removal, [`SyncError::NotFound`] when `user` holds no grant.
    pub async fn revoke_admin(&self, user: &UserId) -> Result<(), SyncError> {
        self.require_admin("revoke admin").await?;

        let admins_path = self.paths.admins();
        let admins: BTreeMap<UserId, AdminGrant> =
            decode_or_default(self.store.read(&admins_path).await?, &admins_path)?;
        if !admins.contains_key(user) {
            return Err(SyncError::NotFound(self.paths.admin(user).to_string()));
        }
        if admins.len() <= 1 {
            return Err(SyncError::Permission {
                action: "revoke admin",
                requirement: "at least one remaining admin",
            });
        }

        self.store
            .write_batch(vec![(self.paths.admin(user), None)])
            .await?;
        Ok(())
    }

    /// Edit one trip metadata field
    ///
    /// Date fields are validated as ISO dates at this boundary.
    ///
    /// # Errors
    /// [`SyncError::Validation`] for a malformed date value.
    pub async fn set_trip_field(&self, field: TripField, value: &str) -> Result<(), SyncError> {
        let encoded = match field {
            TripField::Name | TripField::Destination => {
                if value.trim().is_empty() {
                    return Err(ValidationError::MissingField(field.segment()).into());
                }
                Value::String(value.to_string())
            }
            TripField::StartDate | TripField::EndDate => {
                let day: DayKey = value.parse().map_err(SyncError::Validation)?;
                encode(&day.date())?
            }
        };

        self.store
            .write_batch(vec![(self.paths.meta_field(field), Some(encoded))])
            .await?;

        self.record_activity(ActivityDetail::TripFieldChanged {
            field: field.segment().to_string(),
            value: value.to_string(),
        })
        .await;
        Ok(())
    }

    /// Upload a file and append it to an item's attachment list
    ///
    /// # Errors
    /// [`SyncError::Validation`] for oversize files, [`SyncError::NotFound`]
    /// when the item vanished, [`SyncError::Store`] on upload failure.
    pub async fn attach_file<A: AttachmentStore>(
        &self,
        attachments: &A,
        day: DayKey,
        item: ItemId,
        file: FileUpload,
    ) -> Result<Attachment, SyncError> {
        file.check_size()?;

        let item_path = self.paths.item(day, item);
        if self.store.read(&item_path).await?.is_null() {
            return Err(SyncError::NotFound(item_path.to_string()));
        }

        let stored = attachments.upload(&file, self.trip, item).await?;
        let attachment = Attachment {
            url: stored.url,
            mime_type: stored.mime_type,
            display_name: file.display_name,
        };

        // The item may have been deleted or edited across the upload
        // suspension point. Existence re-check and list fetch are one
        // read; writing under a deleted item's path would plant a
        // partial ghost node there.
        let value = self.store.read(&item_path).await?;
        if value.is_null() {
            return Err(SyncError::NotFound(item_path.to_string()));
        }
        let current: ItineraryItem = decode(value, &item_path)?;
        let mut list = current.attachments;
        list.push(attachment.clone());
        self.store
            .write_batch(vec![(
                self.paths.item_attachments(day, item),
                Some(encode(&list)?),
            )])
            .await?;

        Ok(attachment)
    }

    /// Whether the actor currently holds an admin grant
    ///
    /// # Errors
    /// [`SyncError::Store`] when the admin map cannot be read.
    pub async fn is_admin(&self) -> Result<bool, SyncError> {
        let admins_path = self.paths.admins();
        let admins: BTreeMap<UserId, AdminGrant> =
            decode_or_default(self.store.read(&admins_path).await?, &admins_path)?;
        Ok(admins.contains_key(&self.actor.user))
    }

    async fn require_admin(&self, action: &'static str) -> Result<(), SyncError> {
        if self.is_admin().await? {
            Ok(())
        } else {
            Err(SyncError::Permission {
                action,
                requirement: "admin",
            })
        }
    }

    /// Append one activity record, best-effort
    ///
    /// A failure here is logged and swallowed: history must never roll
    /// back or block the primary mutation it accompanies.
    async fn record_activity(&self, detail: ActivityDetail) {
        let record = ActivityRecord::now(self.actor.user.clone(), detail);
        let encoded = match encode(&record) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, "activity record not encodable; skipping");
                return;
            }
        };
        if let Err(error) = self
            .store
            .write_batch(vec![(self.paths.activity(record.id), Some(encoded))])
            .await
        {
            tracing::warn!(%error, record = %record.id, "activity append failed");
        }
    }
}

/// Serialize into a store value
fn encode<T: Serialize>(value: &T) -> Result<Value, SyncError> {
    serde_json::to_value(value).map_err(|e| SyncError::Corrupt {
        path: String::new(),
        message: e.to_string(),
    })
}

/// Decode a store value into its expected shape
fn decode<T: DeserializeOwned>(value: Value, path: &TreePath) -> Result<T, SyncError> {
    serde_json::from_value(value).map_err(|e| SyncError::Corrupt {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Decode, treating null as the type's empty value
fn decode_or_default<T: DeserializeOwned + Default>(
    value: Value,
    path: &TreePath,
) -> Result<T, SyncError> {
    if value.is_null() {
        return Ok(T::default());
    }
    decode(value, path)
}
