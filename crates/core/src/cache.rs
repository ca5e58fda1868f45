//! Memoized image metadata lookups shared by both rewrite phases.

use crate::{Dimensions, FsProbe, ImageProbe};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Slot = Arc<Mutex<Option<Dimensions>>>;

/// Path-keyed cache of image dimensions.
///
/// Each path owns a slot behind its own lock, so two callers asking for the same
/// uncached path share one probe while distinct paths resolve independently.
/// Only successful lookups are stored; a failed probe drops its slot and the
/// next lookup tries again.
pub struct DimensionCache<P: ImageProbe = FsProbe> {
    probe: P,
    slots: DashMap<PathBuf, Slot>,
    resolved: AtomicUsize,
}

impl DimensionCache<FsProbe> {
    /// Creates a cache that reads headers from disk.
    pub fn new() -> Self {
        Self::with_probe(FsProbe)
    }
}

impl Default for DimensionCache<FsProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ImageProbe> DimensionCache<P> {
    /// Creates a cache over a custom probe.
    pub fn with_probe(probe: P) -> Self {
        Self {
            probe,
            slots: DashMap::new(),
            resolved: AtomicUsize::new(0),
        }
    }

    /// Returns the dimensions of the image at `path`, probing on first use.
    ///
    /// Never fails: any read or decode problem yields `None`.
    pub fn resolve(&self, path: &Path) -> Option<Dimensions> {
        let slot = Arc::clone(self.slots.entry(path.to_path_buf()).or_default().value());
        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(dims) = *entry {
            return Some(dims);
        }

        match self.probe.probe(path) {
            Ok(dims) => {
                *entry = Some(dims);
                self.resolved.fetch_add(1, Ordering::Relaxed);
                Some(dims)
            }
            Err(err) => {
                log::debug!("image metadata unavailable: {}", err);
                drop(entry);
                self.forget(path, &slot);
                None
            }
        }
    }

    /// Returns cached dimensions for `path` without probing.
    pub fn cached(&self, path: &Path) -> Option<Dimensions> {
        let slot = self.slots.get(path).map(|slot| Arc::clone(slot.value()))?;
        let entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        *entry
    }

    /// Number of paths with resolved dimensions.
    pub fn len(&self) -> usize {
        self.resolved.load(Ordering::Relaxed)
    }

    /// Whether no path has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A slot some other caller holds or has filled stays in place.
    fn forget(&self, path: &Path, slot: &Slot) {
        self.slots.remove_if(path, |_, current| {
            Arc::ptr_eq(current, slot)
                && Arc::strong_count(current) == 2
                && matches!(current.try_lock().as_deref(), Ok(None))
        });
    }
}
