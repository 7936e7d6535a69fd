use std::time::Instant;

use dashmap::{DashMap, mapref::entry::Entry};

use super::UserId;

/// Bookkeeping for the most recent code issued to one user on one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleEntry {
    pub user_id: UserId,
    pub issued_at: Instant,
    pub code: String,
}

impl ThrottleEntry {
    pub fn new(user_id: UserId, issued_at: Instant, code: impl Into<String>) -> Self {
        Self {
            user_id,
            issued_at,
            code: code.into(),
        }
    }

    /// Time since issuance as seen from `now`. Zero if `now` is earlier.
    #[inline]
    pub fn age_at(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.issued_at)
    }
}

/// Throttle entries for a single channel, keyed by user.
///
/// Backed by a sharded concurrent map, so lookups for unrelated users rarely
/// contend. The store has no policy of its own; [`ThrottleGuard`] decides what
/// goes in and what comes out.
///
/// [`ThrottleGuard`]: super::ThrottleGuard
#[derive(Debug, Default)]
pub struct ChannelStore {
    entries: DashMap<UserId, ThrottleEntry>,
}

impl ChannelStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns a copy of the entry so no map guard outlives the call.
    pub fn get(&self, user_id: UserId) -> Option<ThrottleEntry> {
        self.entries.get(&user_id).map(|entry| entry.value().clone())
    }

    pub fn put(&self, user_id: UserId, entry: ThrottleEntry) {
        self.entries.insert(user_id, entry);
    }

    pub fn remove(&self, user_id: UserId) {
        self.entries.remove(&user_id);
    }

    /// Inserts `entry` if the user has no entry yet or `admit` accepts the
    /// existing one. The check and the write happen under the same shard lock.
    ///
    /// On success returns the entry that was replaced, if any. On refusal
    /// returns a copy of the entry that blocked the write, as seen under the lock.
    pub fn reserve(
        &self,
        user_id: UserId,
        admit: impl FnOnce(&ThrottleEntry) -> bool,
        entry: ThrottleEntry,
    ) -> Result<Option<ThrottleEntry>, ThrottleEntry> {
        match self.entries.entry(user_id) {
            Entry::Occupied(mut occupied) => {
                if !admit(occupied.get()) {
                    return Err(occupied.get().clone());
                }
                Ok(Some(occupied.insert(entry)))
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                Ok(None)
            }
        }
    }

    /// Undoes a write: if the current entry satisfies `is_ours`, puts
    /// `previous` back, or drops the entry when there was none. Returns
    /// whether anything changed.
    pub fn restore(
        &self,
        user_id: UserId,
        is_ours: impl FnOnce(&ThrottleEntry) -> bool,
        previous: Option<ThrottleEntry>,
    ) -> bool {
        let Entry::Occupied(mut occupied) = self.entries.entry(user_id) else {
            return false;
        };
        if !is_ours(occupied.get()) {
            return false;
        }
        match previous {
            Some(previous) => {
                occupied.insert(previous);
            }
            None => {
                occupied.remove();
            }
        }
        true
    }

    /// Visits a snapshot of all entries.
    ///
    /// Entries are cloned out before `f` runs, so `f` holds no lock and may
    /// call back into the store.
    pub fn for_each(&self, mut f: impl FnMut(UserId, &ThrottleEntry)) {
        let snapshot: Vec<(UserId, ThrottleEntry)> = self
            .entries
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        for (user_id, entry) in &snapshot {
            f(*user_id, entry);
        }
    }

    /// Keeps only entries for which `keep` returns true. Locks one shard at a
    /// time, returns how many entries were dropped.
    pub fn retain(&self, mut keep: impl FnMut(&ThrottleEntry) -> bool) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let kept = keep(entry);
            if !kept {
                removed += 1;
            }
            kept
        });
        removed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
