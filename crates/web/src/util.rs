use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::hash::Hash;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Guards against two concurrent syncs for the same (competition, user).
/// The second caller is turned away instead of queued; with recompute-from-
/// scratch aggregation there is nothing to gain from running both.
#[derive(Default)]
pub struct SyncGuard {
    in_flight: DashMap<(Uuid, Uuid), ()>,
}

impl SyncGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the key, or return `None` if a sync for it is already running.
    /// The claim is released when the returned permit drops.
    pub fn begin(&self, competition_id: Uuid, user_id: Uuid) -> Option<SyncPermit<'_>> {
        let key = (competition_id, user_id);
        match self.in_flight.entry(key) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                vacant.insert(());
                Some(SyncPermit { guard: self, key })
            }
        }
    }
}

pub struct SyncPermit<'a> {
    guard: &'a SyncGuard,
    key: (Uuid, Uuid),
}

impl Drop for SyncPermit<'_> {
    fn drop(&mut self) {
        self.guard.in_flight.remove(&self.key);
    }
}

/// Per-key once-within-a-window marker, replacing process-lifetime "already
/// handled" flags. Entries expire, so behavior does not depend on how long
/// the process has been up.
pub struct KeyedTtl<K> {
    entries: DashMap<K, Instant>,
    ttl: Duration,
}

impl<K: Eq + Hash> KeyedTtl<K> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// True exactly once per key per TTL window.
    pub fn try_mark(&self, key: K) -> bool {
        self.try_mark_at(key, Instant::now())
    }

    fn try_mark_at(&self, key: K, now: Instant) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if now.duration_since(*occupied.get()) >= self.ttl {
                    occupied.insert(now);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_guard_rejects_concurrent_same_key() {
        let guard = SyncGuard::new();
        let competition = Uuid::new_v4();
        let user = Uuid::new_v4();

        let permit = guard.begin(competition, user).expect("first claim succeeds");
        assert!(guard.begin(competition, user).is_none());

        // a different user in the same competition is unaffected
        assert!(guard.begin(competition, Uuid::new_v4()).is_some());

        drop(permit);
        assert!(guard.begin(competition, user).is_some());
    }

    #[test]
    fn test_keyed_ttl_marks_once_per_window() {
        let marks = KeyedTtl::new(Duration::from_secs(60));
        let key = Uuid::new_v4();
        let start = Instant::now();

        assert!(marks.try_mark_at(key, start));
        assert!(!marks.try_mark_at(key, start + Duration::from_secs(30)));
        // a fresh window opens once the ttl has elapsed
        assert!(marks.try_mark_at(key, start + Duration::from_secs(61)));
    }

    #[test]
    fn test_keyed_ttl_keys_are_independent() {
        let marks = KeyedTtl::new(Duration::from_secs(60));
        assert!(marks.try_mark(Uuid::new_v4()));
        assert!(marks.try_mark(Uuid::new_v4()));
    }
}
