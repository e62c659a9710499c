//! Decides which id an incoming notification ends up under.
//!
//! The decision is an ordered pipeline, each stage allowed to override the
//! previous one:
//!
//! 1. a live notification with the same sender and summary claims the request,
//!    even over an explicit `replaces_id`;
//! 2. otherwise the explicit `replaces_id` is used when non-zero, else a fresh
//!    id is allocated;
//! 3. a throttled sender that already owns a tracked id is forced back onto it;
//!    the first request of a throttled sender starts tracking its id.
//!
//! Tracked ids are never forgotten while the process runs, even after the
//! notification they point to has been closed.

use std::collections::{HashMap, HashSet};

use super::identity::IdAllocator;
use super::live_index::LiveNotificationIndex;
use super::types::{NotificationId, SenderKey};

/// Which pipeline stage produced the final id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    SameContent,
    Explicit,
    Fresh,
    Throttled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdResolution {
    pub id: NotificationId,
    pub source: IdSource,
}

#[derive(Debug, Default)]
pub struct ReplacementEngine {
    throttled_applications: HashSet<String>,
    tracked: HashMap<String, NotificationId>,
}

impl ReplacementEngine {
    pub fn new<I, S>(throttled_applications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            throttled_applications: throttled_applications.into_iter().map(Into::into).collect(),
            tracked: HashMap::new(),
        }
    }

    pub fn is_throttled(&self, app_name: &str) -> bool {
        self.throttled_applications.contains(app_name)
    }

    /// The id a throttled sender is pinned to, once it has sent anything.
    pub fn tracked_id(&self, app_name: &str) -> Option<NotificationId> {
        self.tracked.get(app_name).copied()
    }

    pub fn resolve_id(
        &mut self,
        app_name: &str,
        summary: &str,
        replaces_id: NotificationId,
        live: &LiveNotificationIndex,
        ids: &IdAllocator,
    ) -> IdResolution {
        let candidate = Self::same_content(live, app_name, summary)
            .or_else(|| Self::explicit(replaces_id))
            .unwrap_or_else(|| IdResolution {
                id: ids.next_id(),
                source: IdSource::Fresh,
            });
        self.apply_throttle(app_name, candidate)
    }

    fn same_content(live: &LiveNotificationIndex, app_name: &str, summary: &str) -> Option<IdResolution> {
        live.find_by_key(&SenderKey::new(app_name, summary)).map(|id| IdResolution {
            id,
            source: IdSource::SameContent,
        })
    }

    fn explicit(replaces_id: NotificationId) -> Option<IdResolution> {
        (replaces_id != 0).then_some(IdResolution {
            id: replaces_id,
            source: IdSource::Explicit,
        })
    }

    fn apply_throttle(&mut self, app_name: &str, candidate: IdResolution) -> IdResolution {
        if !self.is_throttled(app_name) {
            return candidate;
        }
        match self.tracked.get(app_name) {
            Some(&id) => IdResolution {
                id,
                source: IdSource::Throttled,
            },
            None => {
                tracing::debug!("Tracking throttled sender '{}' at id {}", app_name, candidate.id);
                self.tracked.insert(app_name.to_string(), candidate.id);
                candidate
            }
        }
    }
}
