//! Editor instance cache.
//!
//! Hosts keep heavyweight editor objects around for recently used notes so
//! switching back to a note is instant. The controller only ever asks the
//! cache to forget: [`EditorCache::free_editor`] when a note's path stops being
//! valid, and [`EditorCache::clear_cache`] when the whole library is reloaded.
//!
//! [`EditorInstanceCache`] keeps entries in least-recently-used order with a
//! fixed capacity. Pinned entries survive both capacity eviction and a soft
//! (`force = false`) clear.

use parking_lot::Mutex;
use std::collections::HashSet;

use super::EditorHandle;

pub trait EditorCache: Send + Sync {
    /// Drop the cached editor for `path`, if any
    fn free_editor(&self, path: &str);

    /// Drop cached editors. Without `force`, pinned entries are kept.
    fn clear_cache(&self, force: bool);
}

/// Default number of editors kept alive.
pub const DEFAULT_CACHE_SIZE: usize = 4;

#[derive(Default)]
struct CacheState {
    // Least recently used first.
    entries: Vec<(String, EditorHandle)>,
    pinned: HashSet<String>,
}

pub struct EditorInstanceCache {
    state: Mutex<CacheState>,
    capacity: usize,
}

impl Default for EditorInstanceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl EditorInstanceCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            capacity: capacity.max(1),
        }
    }

    /// Cached editor for `path`, marking it most recently used.
    pub fn get(&self, path: &str) -> Option<EditorHandle> {
        let mut state = self.state.lock();
        let pos = state.entries.iter().position(|(p, _)| p == path)?;
        let entry = state.entries.remove(pos);
        let editor = entry.1.clone();
        state.entries.push(entry);
        Some(editor)
    }

    pub fn insert(&self, path: &str, editor: EditorHandle) {
        let mut state = self.state.lock();
        state.entries.retain(|(p, _)| p != path);
        state.entries.push((path.to_string(), editor));

        while state.entries.len() > self.capacity {
            let pinned = &state.pinned;
            let Some(victim) = state.entries.iter().position(|(p, _)| !pinned.contains(p)) else {
                break;
            };
            let (evicted, _) = state.entries.remove(victim);
            tracing::debug!(path = %evicted, "evicted cached editor");
        }
    }

    pub fn pin(&self, path: &str) {
        self.state.lock().pinned.insert(path.to_string());
    }

    pub fn unpin(&self, path: &str) {
        self.state.lock().pinned.remove(path);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.state.lock().entries.iter().any(|(p, _)| p == path)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached paths, least recently used first.
    pub fn paths(&self) -> Vec<String> {
        self.state
            .lock()
            .entries
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }
}

impl EditorCache for EditorInstanceCache {
    fn free_editor(&self, path: &str) {
        let mut state = self.state.lock();
        state.entries.retain(|(p, _)| p != path);
        state.pinned.remove(path);
    }

    fn clear_cache(&self, force: bool) {
        let mut state = self.state.lock();
        if force {
            state.entries.clear();
            state.pinned.clear();
        } else {
            let pinned = std::mem::take(&mut state.pinned);
            state.entries.retain(|(p, _)| pinned.contains(p));
            state.pinned = pinned;
        }
    }
}
