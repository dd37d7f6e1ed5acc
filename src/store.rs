//! Flat per-category entity containers with stable `u32` handles.
//!
//! Iteration order is insertion order. Dead entities are compacted only at
//! the end of a frame's death-collection phase via `retain_alive`, never
//! mid-tick, so a handle resolved earlier in the frame stays valid for the
//! whole frame.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store<T> {
    next_id: u32,
    entries: Vec<(u32, T)>,
    cap: usize,
    /// Count of spawns dropped because the store was at capacity.
    pub dropped: u32,
}

impl<T> Store<T> {
    pub fn new(cap: usize) -> Self {
        Store { next_id: 0, entries: Vec::new(), cap, dropped: 0 }
    }

    /// Attempts to insert `value`; returns its id, or `None` if the store is
    /// at capacity. This is not an error — callers increment a run-stats
    /// counter and move on.
    pub fn spawn(&mut self, value: T) -> Option<u32> {
        if self.entries.len() >= self.cap {
            self.dropped += 1;
            return None;
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, value));
        Some(id)
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.entries.iter().find(|(i, _)| *i == id).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.entries.iter_mut().find(|(i, _)| *i == id).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.entries.iter().map(|(i, v)| (*i, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> {
        self.entries.iter_mut().map(|(i, v)| (*i, &mut *v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    /// Remove every entry for which `keep` returns false. Call once per
    /// frame, after death effects have been queued.
    pub fn retain_alive<F: Fn(&T) -> bool>(&mut self, keep: F) {
        self.entries.retain(|(_, v)| keep(v));
    }

    pub fn remove(&mut self, id: u32) -> Option<T> {
        if let Some(pos) = self.entries.iter().position(|(i, _)| *i == id) {
            Some(self.entries.remove(pos).1)
        } else {
            None
        }
    }
}
