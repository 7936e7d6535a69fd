use std::time::{Duration, Instant};

use edgex_admin::throttle::{ChannelStore, ThrottleEntry};

#[test]
fn put_get_and_overwrite() {
    let store = ChannelStore::new();
    let t0 = Instant::now();

    assert_eq!(store.get(1), None);

    store.put(1, ThrottleEntry::new(1, t0, "111111"));
    assert_eq!(store.get(1), Some(ThrottleEntry::new(1, t0, "111111")));

    let later = t0 + Duration::from_secs(5);
    store.put(1, ThrottleEntry::new(1, later, "222222"));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(1).map(|e| e.code), Some("222222".to_string()));
    assert_eq!(store.get(1).map(|e| e.issued_at), Some(later));
}

#[test]
fn remove_is_a_noop_when_absent() {
    let store = ChannelStore::new();
    store.remove(3);
    assert!(store.is_empty());

    store.put(3, ThrottleEntry::new(3, Instant::now(), "333333"));
    store.remove(3);
    assert_eq!(store.get(3), None);
    store.remove(3);
    assert!(store.is_empty());
}

#[test]
fn for_each_visits_a_snapshot() {
    let store = ChannelStore::new();
    let now = Instant::now();
    for user_id in 0..5 {
        store.put(user_id, ThrottleEntry::new(user_id, now, format!("{user_id:06}")));
    }

    let mut seen = Vec::new();
    store.for_each(|user_id, entry| {
        assert_eq!(entry.user_id, user_id);
        seen.push(user_id);
        // Mutating from inside the visit must not deadlock
        store.remove(user_id);
    });

    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    assert!(store.is_empty());
}

#[test]
fn reserve_checks_existing_entry() {
    let store = ChannelStore::new();
    let now = Instant::now();
    let first = ThrottleEntry::new(1, now, "aaaaaa");

    assert_eq!(store.reserve(1, |_| false, first.clone()), Ok(None));
    assert_eq!(
        store.reserve(1, |_| false, ThrottleEntry::new(1, now, "bbbbbb")),
        Err(first.clone())
    );
    assert_eq!(store.get(1).map(|e| e.code), Some("aaaaaa".to_string()));

    let replaced = store.reserve(
        1,
        |existing| existing.code == "aaaaaa",
        ThrottleEntry::new(1, now, "cccccc"),
    );
    assert_eq!(replaced, Ok(Some(first)));
    assert_eq!(store.get(1).map(|e| e.code), Some("cccccc".to_string()));
}

#[test]
fn restore_puts_previous_entry_back_only_over_its_own_write() {
    let store = ChannelStore::new();
    let now = Instant::now();
    let previous = ThrottleEntry::new(2, now, "111111");
    let written = ThrottleEntry::new(2, now + Duration::from_secs(1), "222222");
    store.put(2, written.clone());

    assert!(!store.restore(2, |current| current.code == "999999", Some(previous.clone())));
    assert_eq!(store.get(2), Some(written.clone()));

    assert!(store.restore(2, |current| *current == written, Some(previous.clone())));
    assert_eq!(store.get(2), Some(previous));

    // Nothing replaced: the pair goes back to absent
    store.put(3, ThrottleEntry::new(3, now, "333333"));
    assert!(store.restore(3, |current| current.code == "333333", None));
    assert_eq!(store.get(3), None);
    assert!(!store.restore(3, |_| true, None));
}

#[test]
fn retain_reports_removals() {
    let store = ChannelStore::new();
    let now = Instant::now();
    for user_id in 0..6 {
        store.put(user_id, ThrottleEntry::new(user_id, now, "000000"));
    }

    assert_eq!(store.retain(|entry| entry.user_id % 2 == 0), 3);
    assert_eq!(store.len(), 3);
    assert_eq!(store.retain(|entry| entry.user_id % 2 == 0), 0);
}
