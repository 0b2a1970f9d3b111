//! Coordinator integration tests: permission gates, vote toggling,
//! activity trail behavior, and deletion scoping against the in-memory
//! store.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tripline_model::{DayKey, RsvpStatus, Task, TripField};
use tripline_sync::{
    AttachmentStore, FileUpload, MemoryStore, StoreError, StoredAttachment, SyncCoordinator,
    SyncError, TreePath, TripPaths, TripSnapshot, TripStore, MAX_ATTACHMENT_BYTES,
};
use tripline_test_utils::{actor, bootstrap_trip, coordinator_for, item_on, mem_store, FaultyStore};

const DAY: &str = "2025-06-01";

fn day() -> DayKey {
    DAY.parse().unwrap()
}

async fn snapshot_of<S: TripStore>(store: &S, paths: &TripPaths) -> TripSnapshot {
    TripSnapshot::decode(store.read(paths.root()).await.unwrap()).unwrap()
}

#[tokio::test]
async fn creator_is_admin_and_going_from_the_first_write() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    let snapshot = snapshot_of(store.as_ref(), coordinator.paths()).await;
    assert!(snapshot.is_admin(&ada.user));
    assert_eq!(snapshot.rsvp_summary().going, 1);
    assert_eq!(snapshot.meta.name.as_deref(), Some("Norway 2025"));
}

#[tokio::test]
async fn delete_item_is_admin_only() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let bob = actor("+15550002222", "Bob");
    let (trip, owner) = bootstrap_trip(store.clone(), ada.clone()).await;

    let item = item_on(DAY, "Lunch", "12:00", "13:00", &ada.user);
    owner.add_item(&item).await.unwrap();

    let member = coordinator_for(store.clone(), trip, bob);
    let denied = member.delete_item(day(), item.id).await;
    assert!(matches!(denied, Err(SyncError::Permission { .. })));

    owner.delete_item(day(), item.id).await.unwrap();
    let snapshot = snapshot_of(store.as_ref(), owner.paths()).await;
    assert!(snapshot.item(day(), item.id).is_none());
}

#[tokio::test]
async fn deleting_one_item_leaves_its_siblings_intact() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    let lunch = item_on(DAY, "Lunch", "12:00", "13:00", &ada.user);
    let museum = item_on(DAY, "Museum", "14:00", "16:00", &ada.user);
    coordinator.add_item(&lunch).await.unwrap();
    coordinator.add_item(&museum).await.unwrap();

    coordinator.delete_item(day(), lunch.id).await.unwrap();

    let snapshot = snapshot_of(store.as_ref(), coordinator.paths()).await;
    assert!(snapshot.item(day(), lunch.id).is_none());
    assert_eq!(
        snapshot.item(day(), museum.id).map(|i| i.name.as_str()),
        Some("Museum")
    );
}

#[tokio::test]
async fn update_of_a_deleted_item_reports_not_found() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    let item = item_on(DAY, "Lunch", "12:00", "13:00", &ada.user);
    coordinator.add_item(&item).await.unwrap();
    coordinator.delete_item(day(), item.id).await.unwrap();

    let result = coordinator.update_item(day(), &item).await;
    assert!(matches!(result, Err(SyncError::NotFound(_))));
}

#[tokio::test]
async fn rescheduling_onto_another_day_moves_the_item_atomically() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    let item = item_on(DAY, "Hike", "08:00", "12:00", &ada.user);
    coordinator.add_item(&item).await.unwrap();

    let mut moved = item.clone();
    moved.start += chrono::Duration::days(1);
    moved.end += chrono::Duration::days(1);
    coordinator.update_item(day(), &moved).await.unwrap();

    let next_day: DayKey = "2025-06-02".parse().unwrap();
    let snapshot = snapshot_of(store.as_ref(), coordinator.paths()).await;
    assert!(snapshot.item(day(), item.id).is_none());
    assert_eq!(
        snapshot.item(next_day, item.id).map(|i| i.name.as_str()),
        Some("Hike")
    );
}

#[tokio::test]
async fn editing_in_place_keeps_the_item_on_its_day() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    let item = item_on(DAY, "Hike", "08:00", "12:00", &ada.user);
    coordinator.add_item(&item).await.unwrap();

    let mut renamed = item.clone();
    renamed.name = "Summit hike".to_string();
    coordinator.update_item(day(), &renamed).await.unwrap();

    let snapshot = snapshot_of(store.as_ref(), coordinator.paths()).await;
    assert_eq!(
        snapshot.item(day(), item.id).map(|i| i.name.as_str()),
        Some("Summit hike")
    );
}

#[tokio::test]
async fn vote_toggles_on_then_off_per_voter() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let bob = actor("+15550002222", "Bob");
    let (trip, owner) = bootstrap_trip(store.clone(), ada.clone()).await;

    let item = item_on(DAY, "Museum", "14:00", "16:00", &ada.user);
    owner.add_item(&item).await.unwrap();

    let member = coordinator_for(store.clone(), trip, bob.clone());
    assert!(owner.toggle_vote(day(), item.id).await.unwrap());
    assert!(member.toggle_vote(day(), item.id).await.unwrap());

    let snapshot = snapshot_of(store.as_ref(), owner.paths()).await;
    assert_eq!(snapshot.item(day(), item.id).unwrap().vote_count(), 2);

    // Off again for one voter only.
    assert!(!owner.toggle_vote(day(), item.id).await.unwrap());
    let snapshot = snapshot_of(store.as_ref(), owner.paths()).await;
    let voted = snapshot.item(day(), item.id).unwrap();
    assert_eq!(voted.vote_count(), 1);
    assert!(voted.has_vote(&bob.user));
}

#[tokio::test]
async fn voting_on_a_deleted_item_reports_not_found() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    let item = item_on(DAY, "Museum", "14:00", "16:00", &ada.user);
    coordinator.add_item(&item).await.unwrap();
    coordinator.delete_item(day(), item.id).await.unwrap();

    let result = coordinator.toggle_vote(day(), item.id).await;
    assert!(matches!(result, Err(SyncError::NotFound(_))));
}

#[tokio::test]
async fn task_completion_allows_assignee_and_admin_but_not_strangers() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let bob = actor("+15550002222", "Bob");
    let eve = actor("+15550003333", "Eve");
    let (trip, owner) = bootstrap_trip(store.clone(), ada.clone()).await;

    let task = Task::new("Book cabins", ada.user.clone())
        .unwrap()
        .with_assignee(bob.user.clone());
    owner.create_task(&task).await.unwrap();

    let stranger = coordinator_for(store.clone(), trip, eve);
    let denied = stranger.set_task_completed(task.id, true).await;
    assert!(matches!(denied, Err(SyncError::Permission { .. })));

    let assignee = coordinator_for(store.clone(), trip, bob);
    assignee.set_task_completed(task.id, true).await.unwrap();
    owner.set_task_completed(task.id, false).await.unwrap();

    let snapshot = snapshot_of(store.as_ref(), owner.paths()).await;
    assert!(!snapshot.tasks[&task.id].completed);
}

#[tokio::test]
async fn completion_flag_write_preserves_other_task_fields() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    let task = Task::new("Book cabins", ada.user.clone())
        .unwrap()
        .with_assignee(ada.user.clone());
    coordinator.create_task(&task).await.unwrap();
    coordinator.set_task_completed(task.id, true).await.unwrap();

    let snapshot = snapshot_of(store.as_ref(), coordinator.paths()).await;
    let stored = &snapshot.tasks[&task.id];
    assert!(stored.completed);
    assert_eq!(stored.title, "Book cabins");
    assert_eq!(stored.assignee, Some(ada.user.clone()));
}

#[tokio::test]
async fn the_last_admin_cannot_be_revoked() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let bob = actor("+15550002222", "Bob");
    let (_, owner) = bootstrap_trip(store.clone(), ada.clone()).await;

    let result = owner.revoke_admin(&ada.user).await;
    assert!(matches!(result, Err(SyncError::Permission { .. })));

    // With a second admin in place the same revocation goes through.
    owner.grant_admin(&bob.user).await.unwrap();
    owner.revoke_admin(&ada.user).await.unwrap();

    let snapshot = snapshot_of(store.as_ref(), owner.paths()).await;
    assert!(!snapshot.is_admin(&ada.user));
    assert!(snapshot.is_admin(&bob.user));
}

#[tokio::test]
async fn revoking_a_user_without_a_grant_reports_not_found() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let bob = actor("+15550002222", "Bob");
    let (_, owner) = bootstrap_trip(store.clone(), ada).await;

    let result = owner.revoke_admin(&bob.user).await;
    assert!(matches!(result, Err(SyncError::NotFound(_))));
}

#[tokio::test]
async fn trip_date_fields_are_validated_at_the_boundary() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada).await;

    let bad = coordinator.set_trip_field(TripField::StartDate, "06/01/2025").await;
    assert!(matches!(bad, Err(SyncError::Validation(_))));

    coordinator
        .set_trip_field(TripField::StartDate, "2025-06-01")
        .await
        .unwrap();
    let snapshot = snapshot_of(store.as_ref(), coordinator.paths()).await;
    assert_eq!(snapshot.meta.start_date.map(|d| d.to_string()), Some("2025-06-01".to_string()));
}

#[tokio::test]
async fn blank_trip_name_is_rejected() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada).await;

    let result = coordinator.set_trip_field(TripField::Name, "   ").await;
    assert!(matches!(result, Err(SyncError::Validation(_))));
}

#[tokio::test]
async fn activity_trail_reads_newest_first() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    coordinator.set_rsvp(RsvpStatus::Maybe).await.unwrap();
    let item = item_on(DAY, "Lunch", "12:00", "13:00", &ada.user);
    coordinator.add_item(&item).await.unwrap();

    let snapshot = snapshot_of(store.as_ref(), coordinator.paths()).await;
    let trail = snapshot.activity_newest_first();
    assert_eq!(trail.len(), 2);
    assert!(matches!(
        trail[0].detail,
        tripline_model::ActivityDetail::ItemAdded { .. }
    ));
    assert!(matches!(
        trail[1].detail,
        tripline_model::ActivityDetail::RsvpChanged { .. }
    ));
}

#[tokio::test]
async fn a_failing_activity_append_does_not_roll_back_the_mutation() {
    tripline_test_utils::init_tracing();
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (trip, _) = bootstrap_trip(store.clone(), ada.clone()).await;

    let activity_prefix = TripPaths::new(trip).root().child("activity");
    let faulty = Arc::new(FaultyStore::denying(store.clone(), activity_prefix));
    let coordinator = SyncCoordinator::new(faulty.clone(), trip, ada.clone());

    let item = item_on(DAY, "Lunch", "12:00", "13:00", &ada.user);
    coordinator.add_item(&item).await.unwrap();

    assert_eq!(faulty.rejected_batches(), 1);
    let snapshot = snapshot_of(store.as_ref(), coordinator.paths()).await;
    assert!(snapshot.item(day(), item.id).is_some());
    assert!(snapshot.activity_newest_first().is_empty());
}

/// Attachment store that hands back a deterministic URL
struct StubAttachments;

#[async_trait]
impl AttachmentStore for StubAttachments {
    async fn upload(
        &self,
        file: &FileUpload,
        trip: tripline_model::TripId,
        item: tripline_model::ItemId,
    ) -> Result<StoredAttachment, StoreError> {
        Ok(StoredAttachment {
            url: format!("mem://{trip}/{item}/{}", file.display_name),
            name: file.display_name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.bytes.len(),
        })
    }

    async fn delete(&self, _url: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn attach_file_appends_to_the_item_attachment_list() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    let item = item_on(DAY, "Museum", "14:00", "16:00", &ada.user);
    coordinator.add_item(&item).await.unwrap();

    let file = FileUpload {
        bytes: b"%PDF-1.7".to_vec(),
        mime_type: "application/pdf".to_string(),
        display_name: "tickets.pdf".to_string(),
    };
    let attachment = coordinator
        .attach_file(&StubAttachments, day(), item.id, file)
        .await
        .unwrap();
    assert_eq!(attachment.display_name, "tickets.pdf");

    let snapshot = snapshot_of(store.as_ref(), coordinator.paths()).await;
    let stored = snapshot.item(day(), item.id).unwrap();
    assert_eq!(stored.attachments.len(), 1);
    assert_eq!(stored.attachments[0].url, attachment.url);
}

/// Attachment store that deletes a store path while the upload is in
/// flight, standing in for a collaborator's concurrent item deletion
struct DeletingAttachments {
    store: Arc<MemoryStore>,
    target: TreePath,
}

#[async_trait]
impl AttachmentStore for DeletingAttachments {
    async fn upload(
        &self,
        file: &FileUpload,
        _trip: tripline_model::TripId,
        _item: tripline_model::ItemId,
    ) -> Result<StoredAttachment, StoreError> {
        self.store
            .write_batch(vec![(self.target.clone(), None)])
            .await?;
        Ok(StoredAttachment {
            url: format!("mem://{}", file.display_name),
            name: file.display_name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.bytes.len(),
        })
    }

    async fn delete(&self, _url: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn attaching_to_an_item_deleted_mid_upload_does_not_resurrect_it() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    let item = item_on(DAY, "Museum", "14:00", "16:00", &ada.user);
    coordinator.add_item(&item).await.unwrap();

    let attachments = DeletingAttachments {
        store: store.clone(),
        target: coordinator.paths().item(day(), item.id),
    };
    let file = FileUpload {
        bytes: b"%PDF-1.7".to_vec(),
        mime_type: "application/pdf".to_string(),
        display_name: "tickets.pdf".to_string(),
    };
    let result = coordinator
        .attach_file(&attachments, day(), item.id, file)
        .await;
    assert!(matches!(result, Err(SyncError::NotFound(_))));

    // No partial ghost under the deleted item's path, and the trip
    // root still decodes for every view.
    let snapshot = snapshot_of(store.as_ref(), coordinator.paths()).await;
    assert!(snapshot.item(day(), item.id).is_none());
    assert!(!snapshot.activity_newest_first().is_empty());
}

#[tokio::test]
async fn oversize_uploads_are_rejected_before_leaving_the_client() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, coordinator) = bootstrap_trip(store.clone(), ada.clone()).await;

    let item = item_on(DAY, "Museum", "14:00", "16:00", &ada.user);
    coordinator.add_item(&item).await.unwrap();

    let file = FileUpload {
        bytes: vec![0; MAX_ATTACHMENT_BYTES + 1],
        mime_type: "video/mp4".to_string(),
        display_name: "drone.mp4".to_string(),
    };
    let result = coordinator.attach_file(&StubAttachments, day(), item.id, file).await;
    assert!(matches!(result, Err(SyncError::Validation(_))));
}
