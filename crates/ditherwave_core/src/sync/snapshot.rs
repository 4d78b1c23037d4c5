//! Copy-on-publish configuration cell.
//!
//! ## Architecture
//!
//! ```text
//!              ┌──────────────────────────────────┐
//!              │          SnapshotCell<T>         │
//!              │                                  │
//!              │  ┌──────────────┐  ┌───────────┐ │
//!              │  │ Mutex<T>     │  │ RwLock<   │ │
//!              │  │ (staging)    │─▶│  Arc<T>>  │ │
//!              │  └──────────────┘  └───────────┘ │
//!              │        generation: AtomicU64     │
//!              └──────────────────────────────────┘
//!                  ▲                       │
//!        ┌─────────┴────────┐     ┌────────▼───────┐
//!        │ SnapshotWriteGuard│     │  load() → Arc  │
//!        │ (UI / audio)      │     │  (render)      │
//!        └───────────────────┘     └────────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! - Writers are serialized by the staging mutex (single writer at a time)
//! - Publication swaps one `Arc`; the read lock is held only for the clone
//! - A loaded snapshot is immutable for as long as the reader keeps it

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::trace;

/// Holds a value that is edited in place and read as whole snapshots.
///
/// ## Usage
///
/// ```rust,ignore
/// let cell = SnapshotCell::new(DitherSettings::default());
///
/// // UI thread
/// cell.update(|s| s.params.set_noise_scale(0.7));
///
/// // Render thread, once per frame
/// let settings = cell.load();
/// let compositor = DitherCompositor::new(&settings);
/// ```
pub struct SnapshotCell<T> {
    /// Value writers mutate. Never read by the render thread.
    staging: Mutex<T>,

    /// Last published value.
    published: RwLock<Arc<T>>,

    /// Incremented on each publish.
    generation: AtomicU64,
}

impl<T: Clone> SnapshotCell<T> {
    /// Creates a cell whose first snapshot is `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            published: RwLock::new(Arc::new(value.clone())),
            staging: Mutex::new(value),
            generation: AtomicU64::new(0),
        }
    }

    /// Begins a write.
    ///
    /// Blocks while another writer holds a guard. Dropping the guard publishes
    /// the staged value.
    #[must_use]
    pub fn begin_write(&self) -> SnapshotWriteGuard<'_, T> {
        SnapshotWriteGuard {
            cell: self,
            guard: self.staging.lock(),
            cancelled: false,
        }
    }

    /// Returns the last published snapshot.
    ///
    /// Never blocks on writers that are still editing.
    #[must_use]
    pub fn load(&self) -> Arc<T> {
        Arc::clone(&self.published.read())
    }

    /// Returns the current generation (incremented on each publish).
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Applies `edit` to the staged value and publishes it.
    pub fn update<R>(&self, edit: impl FnOnce(&mut T) -> R) -> R {
        let mut write = self.begin_write();
        edit(&mut write)
    }

    /// Applies a fallible edit.
    ///
    /// On `Ok` the result is published. On `Err` the staged value is rolled
    /// back to the last published snapshot and nothing is published.
    ///
    /// # Errors
    ///
    /// Returns whatever `edit` returns.
    pub fn try_update<R, E>(&self, edit: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        let mut write = self.begin_write();
        let result = edit(&mut write);
        if result.is_err() {
            write.cancel();
        }
        result
    }

    fn publish(&self, value: &T) {
        let fresh = Arc::new(value.clone());
        *self.published.write() = fresh;
        let generation = self.generation.fetch_add(1, Ordering::Release) + 1;
        trace!(generation, "snapshot published");
    }
}

impl<T: Clone + Default> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Exclusive write access to the staged value.
///
/// Publishes on drop unless cancelled.
pub struct SnapshotWriteGuard<'a, T: Clone> {
    cell: &'a SnapshotCell<T>,
    guard: MutexGuard<'a, T>,
    cancelled: bool,
}

impl<T: Clone> SnapshotWriteGuard<'_, T> {
    /// Discards the staged edits and restores the last published value.
    pub fn cancel(&mut self) {
        *self.guard = (*self.cell.load()).clone();
        self.cancelled = true;
        trace!("snapshot write cancelled");
    }
}

impl<T: Clone> Deref for SnapshotWriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T: Clone> DerefMut for SnapshotWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<T: Clone> Drop for SnapshotWriteGuard<'_, T> {
    fn drop(&mut self) {
        // Staging lock is still held here, so publications keep writer order
        if !self.cancelled {
            self.cell.publish(&self.guard);
        }
    }
}
