use std::collections::BTreeMap;

use solido_scene::{ResourceId, ResourceKind};

/// Tracks which GPU-side resources the scene currently owns. Released ids are
/// queued until the renderer drains them and destroys the matching buffers.
#[derive(Debug)]
pub struct ResourceLedger {
    next_id: u64,
    live: BTreeMap<ResourceId, ResourceKind>,
    released: Vec<ResourceId>,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self {
            next_id: 1,
            live: BTreeMap::new(),
            released: Vec::new(),
        }
    }
}

impl ResourceLedger {
    pub fn allocate(&mut self, kind: ResourceKind) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, kind);
        id
    }

    /// Returns false for ids that were never allocated or are already released.
    pub fn release(&mut self, id: ResourceId) -> bool {
        if self.live.remove(&id).is_some() {
            self.released.push(id);
            true
        } else {
            false
        }
    }

    pub fn release_all(&mut self) {
        let ids: Vec<ResourceId> = self.live.keys().copied().collect();
        for id in ids {
            self.release(id);
        }
    }

    pub fn is_live(&self, id: ResourceId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.live.values().filter(|live| **live == kind).count()
    }

    pub fn pending_release(&self) -> &[ResourceId] {
        &self.released
    }

    pub fn drain_released(&mut self) -> Vec<ResourceId> {
        std::mem::take(&mut self.released)
    }
}
