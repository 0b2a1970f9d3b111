//! Multi-client convergence: two coordinators sharing one store, each
//! with a live view, end up observing identical state.

use pretty_assertions::assert_eq;
use tripline_model::{DayKey, RsvpStatus, TripField};
use tripline_sync::{TripPaths, TripView};
use tripline_test_utils::{actor, bootstrap_trip, coordinator_for, item_on, mem_store};

const DAY: &str = "2025-06-01";

fn day() -> DayKey {
    DAY.parse().unwrap()
}

#[tokio::test]
async fn a_write_by_one_client_reaches_the_other_client_view() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (_, owner) = bootstrap_trip(store.clone(), ada.clone()).await;

    let paths = owner.paths().clone();
    let mut remote_view = TripView::open(store.as_ref(), &paths).await.unwrap();

    let item = item_on(DAY, "Lunch", "12:00", "13:00", &ada.user);
    owner.add_item(&item).await.unwrap();

    let snapshot = remote_view.changed().await.unwrap();
    assert_eq!(
        snapshot.item(day(), item.id).map(|i| i.name.as_str()),
        Some("Lunch")
    );
}

#[tokio::test]
async fn disjoint_concurrent_edits_both_survive() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let bob = actor("+15550002222", "Bob");
    let (trip, owner) = bootstrap_trip(store.clone(), ada.clone()).await;
    let member = coordinator_for(store.clone(), trip, bob.clone());

    let lunch = item_on(DAY, "Lunch", "12:00", "13:00", &ada.user);
    let museum = item_on(DAY, "Museum", "14:00", "16:00", &bob.user);
    let (a, b) = tokio::join!(owner.add_item(&lunch), member.add_item(&museum));
    a.unwrap();
    b.unwrap();

    let paths = TripPaths::new(trip);
    let mut view = TripView::open(store.as_ref(), &paths).await.unwrap();
    view.poll_changes();
    let items = view.snapshot().items_for_day(day());
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Lunch");
    assert_eq!(items[1].name, "Museum");
}

#[tokio::test]
async fn same_path_edits_resolve_to_the_last_write() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let bob = actor("+15550002222", "Bob");
    let (trip, owner) = bootstrap_trip(store.clone(), ada.clone()).await;
    let member = coordinator_for(store.clone(), trip, bob);

    owner
        .set_trip_field(TripField::Destination, "Lofoten")
        .await
        .unwrap();
    member
        .set_trip_field(TripField::Destination, "Senja")
        .await
        .unwrap();

    let paths = TripPaths::new(trip);
    let view = TripView::open(store.as_ref(), &paths).await.unwrap();
    assert_eq!(view.snapshot().meta.destination.as_deref(), Some("Senja"));
}

#[tokio::test]
async fn rsvps_from_both_clients_land_in_one_summary() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let bob = actor("+15550002222", "Bob");
    let (trip, owner) = bootstrap_trip(store.clone(), ada.clone()).await;
    let member = coordinator_for(store.clone(), trip, bob);

    owner.set_rsvp(RsvpStatus::Going).await.unwrap();
    member.set_rsvp(RsvpStatus::Maybe).await.unwrap();

    let paths = TripPaths::new(trip);
    let view = TripView::open(store.as_ref(), &paths).await.unwrap();
    let summary = view.snapshot().rsvp_summary();
    assert_eq!((summary.going, summary.maybe, summary.not_going), (1, 1, 0));
}

#[tokio::test]
async fn two_views_of_the_same_trip_converge() {
    let store = mem_store();
    let ada = actor("+15550001111", "Ada");
    let (trip, owner) = bootstrap_trip(store.clone(), ada.clone()).await;

    let paths = TripPaths::new(trip);
    let mut first = TripView::open(store.as_ref(), &paths).await.unwrap();
    let mut second = TripView::open(store.as_ref(), &paths).await.unwrap();

    let item = item_on(DAY, "Hike", "08:00", "12:00", &ada.user);
    owner.add_item(&item).await.unwrap();

    first.changed().await.unwrap();
    second.changed().await.unwrap();
    assert_eq!(first.snapshot(), second.snapshot());
}
