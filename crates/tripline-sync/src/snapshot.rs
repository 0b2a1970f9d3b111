//! Trip read model
//!
//! Each inbound snapshot replaces the local view wholesale; every
//! derived view (day item lists, task list, RSVP summary, activity
//! feed) is recomputed from the new snapshot. Local optimistic state
//! never survives an inbound snapshot for the same path.

use crate::coordinator::SyncError;
use crate::store::{Subscription, TripStore, Value};
use crate::tree::TripPaths;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tripline_model::{
    ActivityId, ActivityRecord, AdminGrant, DayKey, ItemId, ItineraryItem, Rsvp, RsvpStatus,
    Task, TaskId, TripMeta, UserId,
};

/// Decoded state of one trip's whole sub-tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripSnapshot {
    /// Trip display metadata
    pub meta: TripMeta,
    /// Day buckets: date -> item id -> item
    pub days: BTreeMap<DayKey, BTreeMap<ItemId, ItineraryItem>>,
    /// Tasks by id
    pub tasks: BTreeMap<TaskId, Task>,
    /// RSVPs by collaborator
    pub rsvps: BTreeMap<UserId, Rsvp>,
    /// Admin grants by collaborator
    pub admins: BTreeMap<UserId, AdminGrant>,
    /// Activity trail by record id
    pub activity: BTreeMap<ActivityId, ActivityRecord>,
}

/// Per-status RSVP counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RsvpSummary {
    /// Attending
    pub going: usize,
    /// Undecided
    pub maybe: usize,
    /// Not attending
    pub not_going: usize,
}

impl TripSnapshot {
    /// Decode a raw store value; null means an empty trip
    ///
    /// Lenient per entry: a malformed item, task, or record (a lost
    /// write race can leave a partial node behind) is skipped with a
    /// warning. One bad node must never disable the whole read model.
    ///
    /// # Errors
    /// Only when the trip root is neither null nor an object.
    pub fn decode(value: Value) -> Result<Self, serde_json::Error> {
        let root = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(serde::de::Error::custom(format!(
                    "trip root must be an object, got {other}"
                )))
            }
        };

        let mut snapshot = Self::default();
        for (key, section) in root {
            match key.as_str() {
                "meta" => match serde_json::from_value(section) {
                    Ok(meta) => snapshot.meta = meta,
                    Err(error) => tracing::warn!(%error, "skipping undecodable trip meta"),
                },
                "days" => {
                    let Value::Object(days) = section else { continue };
                    for (date, bucket) in days {
                        match date.parse::<DayKey>() {
                            Ok(day) => {
                                snapshot.days.insert(day, lenient_entries(bucket, "item"));
                            }
                            Err(error) => {
                                tracing::warn!(%error, key = %date, "skipping undecodable day bucket");
                            }
                        }
                    }
                }
                "tasks" => snapshot.tasks = lenient_entries(section, "task"),
                "rsvps" => snapshot.rsvps = lenient_entries(section, "rsvp"),
                "admins" => snapshot.admins = lenient_entries(section, "admin grant"),
                "activity" => snapshot.activity = lenient_entries(section, "activity record"),
                _ => {}
            }
        }
        Ok(snapshot)
    }

    /// One day's items, in render order (start ascending, then manual
    /// sort key, then id) — the direct input to the layout engine
    #[must_use]
    pub fn items_for_day(&self, day: DayKey) -> Vec<ItineraryItem> {
        let mut items: Vec<ItineraryItem> = self
            .days
            .get(&day)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default();
        items.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(a.sort_key.total_cmp(&b.sort_key))
                .then(a.id.cmp(&b.id))
        });
        items
    }

    /// Look up one item
    #[must_use]
    pub fn item(&self, day: DayKey, id: ItemId) -> Option<&ItineraryItem> {
        self.days.get(&day).and_then(|bucket| bucket.get(&id))
    }

    /// Tasks, oldest first
    #[must_use]
    pub fn tasks_sorted(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.values().collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        tasks
    }

    /// Counts per RSVP status
    #[must_use]
    pub fn rsvp_summary(&self) -> RsvpSummary {
        let mut summary = RsvpSummary::default();
        for rsvp in self.rsvps.values() {
            match rsvp.status {
                RsvpStatus::Going => summary.going += 1,
                RsvpStatus::Maybe => summary.maybe += 1,
                RsvpStatus::NotGoing => summary.not_going += 1,
            }
        }
        summary
    }

    /// Whether `user` holds an admin grant
    #[must_use]
    pub fn is_admin(&self, user: &UserId) -> bool {
        self.admins.contains_key(user)
    }

    /// Activity records, newest first (timestamp, then id, descending)
    #[must_use]
    pub fn activity_newest_first(&self) -> Vec<&ActivityRecord> {
        let mut records: Vec<&ActivityRecord> = self.activity.values().collect();
        records.sort_by(|a, b| b.at.cmp(&a.at).then(b.id.cmp(&a.id)));
        records
    }
}

/// Live view of one trip
///
/// Owns the root subscription; dropping the view unsubscribes. The
/// subscription is opened before the initial read so a write landing
/// in between is never missed (replays are harmless — snapshots
/// replace, they don't accumulate).
pub struct TripView {
    snapshot: TripSnapshot,
    subscription: Subscription,
}

impl TripView {
    /// Open a view of the trip rooted at `paths`
    ///
    /// # Errors
    /// [`SyncError::Store`] when the initial read fails.
    pub async fn open<S: TripStore>(store: &S, paths: &TripPaths) -> Result<Self, SyncError> {
        let subscription = store.subscribe(paths.root());
        let initial = store.read(paths.root()).await?;
        let snapshot = match TripSnapshot::decode(initial) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, "initial trip value undecodable; starting empty");
                TripSnapshot::default()
            }
        };
        Ok(Self {
            snapshot,
            subscription,
        })
    }

    /// The current snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &TripSnapshot {
        &self.snapshot
    }

    /// Wait for the next remote change and return the fresh snapshot
    ///
    /// Returns `None` once the store side has shut down. Undecodable
    /// snapshots are skipped (logged), keeping the last good state.
    pub async fn changed(&mut self) -> Option<&TripSnapshot> {
        loop {
            let value = self.subscription.next_snapshot().await?;
            match TripSnapshot::decode(value) {
                Ok(snapshot) => {
                    self.snapshot = snapshot;
                    return Some(&self.snapshot);
                }
                Err(error) => tracing::warn!(%error, "skipping undecodable snapshot"),
            }
        }
    }

    /// Apply any already-delivered snapshots without waiting
    ///
    /// Returns true when the view changed.
    pub fn poll_changes(&mut self) -> bool {
        let mut latest = None;
        while let Some(value) = self.subscription.try_next_snapshot() {
            latest = Some(value);
        }
        match latest.map(TripSnapshot::decode) {
            Some(Ok(snapshot)) => {
                self.snapshot = snapshot;
                true
            }
            Some(Err(error)) => {
                tracing::warn!(%error, "skipping undecodable snapshot");
                false
            }
            None => false,
        }
    }
}

/// Decode one map section entry by entry, skipping malformed entries
fn lenient_entries<K, V>(section: Value, kind: &'static str) -> BTreeMap<K, V>
where
    K: DeserializeOwned + Ord,
    V: DeserializeOwned,
{
    let Value::Object(map) = section else {
        return BTreeMap::new();
    };
    let mut entries = BTreeMap::new();
    for (key, value) in map {
        let decoded = serde_json::from_value::<K>(Value::String(key.clone()))
            .and_then(|k| serde_json::from_value::<V>(value).map(|v| (k, v)));
        match decoded {
            Ok((k, v)) => {
                entries.insert(k, v);
            }
            Err(error) => {
                tracing::warn!(%error, key = %key, kind, "skipping undecodable entry");
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn null_decodes_to_an_empty_trip() {
        let snapshot = TripSnapshot::decode(Value::Null).unwrap();
        assert_eq!(snapshot, TripSnapshot::default());
        assert_eq!(snapshot.rsvp_summary(), RsvpSummary::default());
    }

    #[test]
    fn decodes_a_populated_tree() {
        let item = ItineraryItem::new(
            "Lunch",
            "2025-06-01T12:00:00".parse().unwrap(),
            "2025-06-01T13:00:00".parse().unwrap(),
            UserId::new("+1"),
        )
        .unwrap();
        let mut value = json!({
            "meta": { "name": "Norway" },
            "rsvps": {
                "+1": { "status": "going", "display_name": "Ada" },
                "+2": { "status": "maybe", "display_name": "Grace" }
            }
        });
        value["days"]["2025-06-01"][item.id.to_string()] =
            serde_json::to_value(&item).unwrap();

        let snapshot = TripSnapshot::decode(value).unwrap();
        assert_eq!(snapshot.meta.name.as_deref(), Some("Norway"));
        let day: DayKey = "2025-06-01".parse().unwrap();
        assert_eq!(snapshot.items_for_day(day), vec![item]);
        assert_eq!(
            snapshot.rsvp_summary(),
            RsvpSummary {
                going: 1,
                maybe: 1,
                not_going: 0
            }
        );
    }

    #[test]
    fn a_partial_item_node_does_not_disable_the_read_model() {
        let item = ItineraryItem::new(
            "Lunch",
            "2025-06-01T12:00:00".parse().unwrap(),
            "2025-06-01T13:00:00".parse().unwrap(),
            UserId::new("+1"),
        )
        .unwrap();
        let mut value = json!({
            "rsvps": { "+1": { "status": "going", "display_name": "Ada" } }
        });
        value["days"]["2025-06-01"][item.id.to_string()] = serde_json::to_value(&item).unwrap();
        // A lost write race can leave a field-only ghost under an item
        // path; it carries none of the item's required fields.
        value["days"]["2025-06-01"]["01ARZ3NDEKTSV4RRFFQ69G5FAV"] = json!({
            "attachments": []
        });
        value["days"]["not-a-date"] = json!({});

        let snapshot = TripSnapshot::decode(value).unwrap();
        let day: DayKey = "2025-06-01".parse().unwrap();
        assert_eq!(snapshot.items_for_day(day), vec![item]);
        assert_eq!(snapshot.rsvp_summary().going, 1);
        assert_eq!(snapshot.days.len(), 1);
    }

    #[test]
    fn day_items_come_back_in_render_order() {
        let mk = |name: &str, hour: u32| {
            ItineraryItem::new(
                name,
                format!("2025-06-01T{hour:02}:00:00").parse().unwrap(),
                format!("2025-06-01T{hour:02}:30:00").parse().unwrap(),
                UserId::new("+1"),
            )
            .unwrap()
        };
        let (late, early) = (mk("Late", 18), mk("Early", 8));

        let mut snapshot = TripSnapshot::default();
        let day: DayKey = "2025-06-01".parse().unwrap();
        let bucket = snapshot.days.entry(day).or_default();
        bucket.insert(late.id, late);
        bucket.insert(early.id, early);

        let names: Vec<String> = snapshot
            .items_for_day(day)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Early".to_string(), "Late".to_string()]);
    }

    #[test]
    fn activity_orders_newest_first() {
        use tripline_model::{ActivityDetail, ActivityRecord, RsvpStatus};

        let older = ActivityRecord {
            at: "2025-06-01T10:00:00Z".parse().unwrap(),
            ..ActivityRecord::now(
                UserId::new("+1"),
                ActivityDetail::RsvpChanged {
                    status: RsvpStatus::Going,
                },
            )
        };
        let newer = ActivityRecord {
            at: "2025-06-01T11:00:00Z".parse().unwrap(),
            ..ActivityRecord::now(
                UserId::new("+2"),
                ActivityDetail::RsvpChanged {
                    status: RsvpStatus::Maybe,
                },
            )
        };

        let mut snapshot = TripSnapshot::default();
        snapshot.activity.insert(older.id, older.clone());
        snapshot.activity.insert(newer.id, newer.clone());

        let feed = snapshot.activity_newest_first();
        assert_eq!(feed, vec![&newer, &older]);
    }
}
