//! Day layout algorithm
//!
//! First-fit column packing over the day's items, then cluster-wide
//! column-count propagation so every member of a maximal overlap cluster
//! renders at the same fractional width. Pure and deterministic: equal
//! input always yields equal geometry.

use crate::config::LayoutConfig;
use chrono::{NaiveDateTime, Timelike};
use tripline_model::{ItemId, ItineraryItem};

/// Minutes in one day bucket; geometry never extends past this
const DAY_MINUTES: i64 = 24 * 60;

/// An item plus its computed geometry for one render pass
///
/// Derived and ephemeral: recomputed from the current item set on every
/// render, never persisted, no lifecycle of its own. Fractional width is
/// `100% / total_columns`, horizontal offset `column / total_columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedItem {
    /// The underlying item
    pub item: ItineraryItem,
    /// Vertical offset in pixels from the top of the day grid
    pub top: f64,
    /// Rendered height in pixels (>= the configured minimum)
    pub height: f64,
    /// Assigned column index within the overlap cluster
    pub column: usize,
    /// Column count of the item's maximal overlap cluster
    pub total_columns: usize,
}

/// Layout rejection — a caller error, never NaN geometry
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// An item's end precedes its start
    #[error("invalid time range for item {id}: end {end} precedes start {start}")]
    InvalidRange {
        /// Offending item
        id: ItemId,
        /// Its start instant
        start: NaiveDateTime,
        /// Its end instant
        end: NaiveDateTime,
    },
}

/// Working geometry during packing
struct Slot {
    start_min: i64,
    end_min: i64,
    column: usize,
}

/// Strict overlap test: touching endpoints do not overlap
fn overlaps(a: &Slot, b: &Slot) -> bool {
    !(a.end_min <= b.start_min || a.start_min >= b.end_min)
}

/// Compute render geometry for one day bucket's items
///
/// Column-assignment priority is start time ascending, ties broken by
/// the order items appear in `items` (stable sort). Items whose range
/// crosses midnight are clamped to the bucket's 24h extent — the day
/// bucket key is authoritative, not the end instant. Zero-duration items
/// (possible under concurrent edits) keep the configured minimum height.
///
/// # Errors
/// [`LayoutError::InvalidRange`] when any item's end precedes its start.
pub fn layout_day(
    items: &[ItineraryItem],
    config: &LayoutConfig,
) -> Result<Vec<PositionedItem>, LayoutError> {
    for item in items {
        if item.end < item.start {
            return Err(LayoutError::InvalidRange {
                id: item.id,
                start: item.start,
                end: item.end,
            });
        }
    }

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| items[i].start);

    // First-fit packing: each item takes the lowest column not used by
    // any previously placed overlapping item.
    let mut slots: Vec<Slot> = Vec::with_capacity(order.len());
    for &idx in &order {
        let item = &items[idx];
        let start_min =
            i64::from(item.start.time().hour()) * 60 + i64::from(item.start.time().minute());
        let end_min = (start_min + item.duration_minutes()).min(DAY_MINUTES);

        let mut column = 0;
        loop {
            let taken = slots
                .iter()
                .any(|placed| placed.column == column && overlaps_range(placed, start_min, end_min));
            if !taken {
                break;
            }
            column += 1;
        }

        slots.push(Slot {
            start_min,
            end_min,
            column,
        });
    }

    // Maximal overlap clusters are the connected components of the
    // overlap graph; every member reports the cluster's column count.
    let component = components(&slots);
    let mut component_columns = vec![0usize; slots.len()];
    for (i, slot) in slots.iter().enumerate() {
        let root = component[i];
        component_columns[root] = component_columns[root].max(slot.column + 1);
    }

    let mut positioned = Vec::with_capacity(order.len());
    for (i, &idx) in order.iter().enumerate() {
        let slot = &slots[i];
        let span_min = slot.end_min - slot.start_min;
        positioned.push(PositionedItem {
            item: items[idx].clone(),
            top: slot.start_min as f64 / 60.0 * config.row_height,
            height: (span_min as f64 / 60.0 * config.row_height).max(config.min_item_height),
            column: slot.column,
            total_columns: component_columns[component[i]],
        });
    }

    Ok(positioned)
}

/// Overlap test against an unplaced range
fn overlaps_range(placed: &Slot, start_min: i64, end_min: i64) -> bool {
    !(end_min <= placed.start_min || start_min >= placed.end_min)
}

/// Union-find over the overlap graph; returns each slot's root index
fn components(slots: &[Slot]) -> Vec<usize> {
    let mut parent: Vec<usize> = (0..slots.len()).collect();

    fn find(parent: &mut Vec<usize>, i: usize) -> usize {
        if parent[i] != i {
            let root = find(parent, parent[i]);
            parent[i] = root;
        }
        parent[i]
    }

    for i in 0..slots.len() {
        for j in (i + 1)..slots.len() {
            if overlaps(&slots[i], &slots[j]) {
                let (a, b) = (find(&mut parent, i), find(&mut parent, j));
                if a != b {
                    parent[a] = b;
                }
            }
        }
    }

    (0..slots.len()).map(|i| find(&mut parent, i)).collect()
}
