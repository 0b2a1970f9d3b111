//! Tripline Layout Engine
//!
//! Turns one day's possibly-overlapping itinerary items into
//! non-overlapping visual columns on a vertical time grid.
//!
//! # Core Concepts
//!
//! - [`layout_day`]: pure item set -> positioned geometry transform
//! - [`PositionedItem`]: derived geometry, recomputed per render, never persisted
//! - [`LayoutConfig`]: presentation parameters (pixels per hour, minimum height)
//!
//! # Example
//!
//! ```rust,ignore
//! use tripline_layout::{layout_day, LayoutConfig};
//!
//! let config = LayoutConfig::new();
//! let positioned = layout_day(&day_items, &config)?;
//! for p in &positioned {
//!     println!("{} -> col {}/{}", p.item.name, p.column, p.total_columns);
//! }
//! ```

#![warn(unreachable_pub)]

// Core modules
mod config;
mod engine;

// Re-exports
pub use config::LayoutConfig;
pub use engine::{layout_day, LayoutError, PositionedItem};
