use std::time::{Duration, Instant};

use constant_time_eq::constant_time_eq;
use tracing::{debug, instrument, trace};

use super::{ChannelStore, ChannelType, ThrottleConfig, ThrottleEntry, UserId, code};

/// A successful reservation: the entry written and the one it replaced.
#[derive(Debug, Clone)]
pub struct Reservation {
    channel: ChannelType,
    entry: ThrottleEntry,
    replaced: Option<ThrottleEntry>,
}

impl Reservation {
    #[inline]
    pub fn channel(&self) -> ChannelType {
        self.channel
    }

    #[inline]
    pub fn user_id(&self) -> UserId {
        self.entry.user_id
    }

    /// The code to deliver.
    #[inline]
    pub fn code(&self) -> &str {
        &self.entry.code
    }
}

/// Gates verification-code issuance per (channel, user).
///
/// One [`ChannelStore`] per [`ChannelType`] is created up front, so every
/// channel is usable from the first call and channels never share a lock.
///
/// Time-dependent operations come in two forms: the plain one reads the
/// monotonic clock, the `_at` one takes `now` explicitly.
///
/// # Races
///
/// [`is_issuance_allowed`](Self::is_issuance_allowed) followed by
/// [`record_issuance`](Self::record_issuance) is two critical sections; two
/// callers can both see "allowed" and both record. Use
/// [`try_reserve`](Self::try_reserve) when exactly one issuance per interval
/// must win.
#[derive(Debug)]
pub struct ThrottleGuard {
    stores: [ChannelStore; ChannelType::COUNT],
    config: ThrottleConfig,
}

impl ThrottleGuard {
    pub fn new(config: ThrottleConfig) -> Self {
        debug!(
            min_reissue_interval = ?config.min_reissue_interval(),
            code_validity_window = ?config.code_validity_window(),
            code_length = config.code_length(),
            "Creating throttle guard"
        );

        Self {
            stores: std::array::from_fn(|_| ChannelStore::new()),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    #[inline]
    fn store(&self, channel: ChannelType) -> &ChannelStore {
        &self.stores[channel.index()]
    }

    #[inline]
    fn reissue_allowed(&self, entry: &ThrottleEntry, now: Instant) -> bool {
        entry.age_at(now) >= self.config.min_reissue_interval()
    }

    #[inline]
    fn still_valid(&self, entry: &ThrottleEntry, now: Instant) -> bool {
        entry.age_at(now) < self.config.code_validity_window()
    }

    /// Whether a new code may be issued right now. Informational under races.
    pub fn is_issuance_allowed(&self, channel: ChannelType, user_id: UserId) -> bool {
        self.is_issuance_allowed_at(channel, user_id, Instant::now())
    }

    pub fn is_issuance_allowed_at(&self, channel: ChannelType, user_id: UserId, now: Instant) -> bool {
        self.store(channel)
            .get(user_id)
            .is_none_or(|entry| self.reissue_allowed(&entry, now))
    }

    /// Time left before a new code may be issued, `None` if allowed already.
    pub fn retry_after(&self, channel: ChannelType, user_id: UserId) -> Option<Duration> {
        self.retry_after_at(channel, user_id, Instant::now())
    }

    pub fn retry_after_at(&self, channel: ChannelType, user_id: UserId, now: Instant) -> Option<Duration> {
        let entry = self.store(channel).get(user_id)?;
        self.config
            .min_reissue_interval()
            .checked_sub(entry.age_at(now))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Records `code` as issued now, overwriting any previous issuance.
    pub fn record_issuance(&self, channel: ChannelType, user_id: UserId, code: &str) {
        self.record_issuance_at(channel, user_id, code, Instant::now());
    }

    pub fn record_issuance_at(&self, channel: ChannelType, user_id: UserId, code: &str, now: Instant) {
        trace!(%channel, user_id, "Recording issuance");
        self.store(channel)
            .put(user_id, ThrottleEntry::new(user_id, now, code));
    }

    /// Checks admission and records `code` in a single critical section.
    ///
    /// Returns `false` without touching the store when the previous code is
    /// younger than the re-issue interval.
    pub fn try_reserve(&self, channel: ChannelType, user_id: UserId, code: &str) -> bool {
        self.reserve(channel, user_id, code).is_ok()
    }

    pub fn try_reserve_at(&self, channel: ChannelType, user_id: UserId, code: &str, now: Instant) -> bool {
        self.reserve_at(channel, user_id, code, now).is_ok()
    }

    /// Like [`try_reserve`](Self::try_reserve), but keeps what is needed to
    /// undo the reservation with [`cancel_issuance`](Self::cancel_issuance).
    ///
    /// # Errors
    ///
    /// The time left until issuance is allowed, taken from the entry that
    /// blocked the reservation under the same lock. Never zero.
    #[instrument(level = "debug", skip(self, code))]
    pub fn reserve(&self, channel: ChannelType, user_id: UserId, code: &str) -> Result<Reservation, Duration> {
        self.reserve_at(channel, user_id, code, Instant::now())
    }

    pub fn reserve_at(
        &self,
        channel: ChannelType,
        user_id: UserId,
        code: &str,
        now: Instant,
    ) -> Result<Reservation, Duration> {
        let entry = ThrottleEntry::new(user_id, now, code);
        let outcome = self.store(channel).reserve(
            user_id,
            |existing| self.reissue_allowed(existing, now),
            entry.clone(),
        );
        debug!(reserved = outcome.is_ok(), "Reservation attempt finished");

        match outcome {
            Ok(replaced) => Ok(Reservation {
                channel,
                entry,
                replaced,
            }),
            Err(blocking) => Err(self
                .config
                .min_reissue_interval()
                .saturating_sub(blocking.age_at(now))
                .max(Duration::from_nanos(1))),
        }
    }

    /// Undoes a reservation whose delivery failed.
    ///
    /// The code that was live before the reservation comes back, so a user
    /// holding it can still verify; with none, the pair returns to absent. A
    /// newer issuance that replaced the reservation in the meantime is left
    /// alone. Returns whether the store changed.
    pub fn cancel_issuance(&self, reservation: Reservation) -> bool {
        let Reservation {
            channel,
            entry,
            replaced,
        } = reservation;
        self.store(channel)
            .restore(entry.user_id, |current| *current == entry, replaced)
    }

    /// The last code recorded for this pair, unless its validity window elapsed.
    pub fn current_code(&self, channel: ChannelType, user_id: UserId) -> Option<String> {
        self.current_code_at(channel, user_id, Instant::now())
    }

    pub fn current_code_at(&self, channel: ChannelType, user_id: UserId, now: Instant) -> Option<String> {
        self.store(channel)
            .get(user_id)
            .filter(|entry| self.still_valid(entry, now))
            .map(|entry| entry.code)
    }

    /// Whether `submitted` matches the live code for this pair.
    pub fn verify_code(&self, channel: ChannelType, user_id: UserId, submitted: &str) -> bool {
        self.verify_code_at(channel, user_id, submitted, Instant::now())
    }

    pub fn verify_code_at(&self, channel: ChannelType, user_id: UserId, submitted: &str, now: Instant) -> bool {
        // Constant time so response latency says nothing about matching prefixes.
        self.current_code_at(channel, user_id, now)
            .is_some_and(|code| constant_time_eq(code.as_bytes(), submitted.as_bytes()))
    }

    /// A fresh code of the configured length.
    #[inline]
    pub fn generate_code(&self) -> String {
        code::generate_code(self.config.code_length())
    }

    /// Removes every entry whose validity window has elapsed as of `now`.
    ///
    /// Returns the number of entries removed across all channels.
    #[instrument(level = "debug", skip(self, now))]
    pub fn sweep_expired(&self, now: Instant) -> usize {
        ChannelType::ALL
            .iter()
            .map(|&channel| {
                let removed = self
                    .store(channel)
                    .retain(|entry| self.still_valid(entry, now));
                if removed > 0 {
                    debug!(%channel, removed, "Swept expired entries");
                }
                removed
            })
            .sum()
    }

    /// Live entries across all channels.
    pub fn len(&self) -> usize {
        self.stores.iter().map(ChannelStore::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.iter().all(ChannelStore::is_empty)
    }
}

impl Default for ThrottleGuard {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}
