//! # Snapshot Publication
//!
//! ## The Problem
//!
//! ```text
//! UI / audio callbacks:  WRITE palette, matrix size, noise scale ...
//! Render thread:         READ all of it, once per frame
//!
//! Field-by-field writes: torn reads (new palette size, stale colors)
//! Lock in pixel loop:    contention on every pixel
//! ```
//!
//! ## The Solution: Whole-Value Snapshots
//!
//! ```text
//! Writer:  lock staging → mutate → drop guard → publish Arc<T>, generation += 1
//! Render:  load() once at frame start → Arc<T> → pixel loop reads it lock-free
//! ```
//!
//! A frame either sees a write completely or not at all.

mod snapshot;

pub use snapshot::{SnapshotCell, SnapshotWriteGuard};
