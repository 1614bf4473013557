//! Ordered, deduplicated notification list.

use crate::Notification;
use std::collections::{HashSet, VecDeque};

struct Entry {
    notification: Notification,
    /// Push sequence number for entries inserted from the live channel.
    pushed: Option<u64>,
}

/// Newest-first list in which no two entries share an id.
///
/// Order is arrival order, not `created_at`.
#[derive(Default)]
pub struct NotificationFeed {
    entries: VecDeque<Entry>,
    ids: HashSet<String>,
    push_seq: u64,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.entries
            .iter()
            .map(|e| &e.notification)
            .find(|n| n.id == id)
    }

    /// Number of entries with `read == false`.
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.notification.read).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().map(|e| &e.notification)
    }

    pub fn to_vec(&self) -> Vec<Notification> {
        self.iter().cloned().collect()
    }

    /// Sequence number of the most recent live insertion.
    pub fn push_seq(&self) -> u64 {
        self.push_seq
    }

    /// Insert a live notification at the head unless its id is present.
    pub fn insert_pushed(&mut self, notification: Notification) -> bool {
        if !self.ids.insert(notification.id.clone()) {
            return false;
        }
        self.push_seq += 1;
        self.entries.push_front(Entry {
            notification,
            pushed: Some(self.push_seq),
        });
        true
    }

    /// Replace the contents with a snapshot, first occurrence of an id winning.
    ///
    /// Live entries inserted after push sequence `keep_pushed_after` that the
    /// snapshot does not contain stay at the head in their current order.
    /// Returns the resulting length.
    pub fn replace_with_snapshot(
        &mut self,
        snapshot: impl IntoIterator<Item = Notification>,
        keep_pushed_after: u64,
    ) -> usize {
        let mut ids = HashSet::new();
        let mut entries = VecDeque::new();
        for notification in snapshot {
            if ids.insert(notification.id.clone()) {
                entries.push_back(Entry {
                    notification,
                    pushed: None,
                });
            }
        }

        let recent: Vec<Entry> = self
            .entries
            .drain(..)
            .filter(|e| matches!(e.pushed, Some(seq) if seq > keep_pushed_after))
            .collect();
        for entry in recent.into_iter().rev() {
            if ids.insert(entry.notification.id.clone()) {
                entries.push_front(entry);
            }
        }

        self.entries = entries;
        self.ids = ids;
        self.entries.len()
    }

    /// Mark one entry read. Returns true if it was unread.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.notification.id == id) {
            Some(entry) if !entry.notification.read => {
                entry.notification.read = true;
                true
            }
            _ => false,
        }
    }

    /// Mark every entry read. Returns how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for entry in self.entries.iter_mut().filter(|e| !e.notification.read) {
            entry.notification.read = true;
            changed += 1;
        }
        changed
    }

    pub fn remove(&mut self, id: &str) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        self.entries.retain(|e| e.notification.id != id);
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.ids.clear();
    }

    pub fn view(&self) -> FeedView {
        FeedView {
            notifications: self.to_vec(),
            unread_count: self.unread_count(),
        }
    }
}

/// Snapshot of the feed published to observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedView {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}
