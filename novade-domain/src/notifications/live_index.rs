use std::collections::BTreeMap;

use super::types::{NotificationId, SenderKey};

/// Which ids are currently live, and the content key each was created with.
///
/// Ordered by id so that a content lookup matching several ids resolves to
/// the lowest one.
#[derive(Debug, Default)]
pub struct LiveNotificationIndex {
    entries: BTreeMap<NotificationId, SenderKey>,
}

impl LiveNotificationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` for `id`, replacing whatever the id held before.
    pub fn insert(&mut self, id: NotificationId, key: SenderKey) -> Option<SenderKey> {
        self.entries.insert(id, key)
    }

    pub fn remove(&mut self, id: NotificationId) -> Option<SenderKey> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Reverse lookup: the live id created with `key`, if any.
    pub fn find_by_key(&self, key: &SenderKey) -> Option<NotificationId> {
        self.entries.iter().find(|(_, k)| *k == key).map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
