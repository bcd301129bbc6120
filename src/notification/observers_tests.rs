//! Tests for observers

use super::*;
use std::sync::Mutex;

type Seen = Arc<Mutex<Vec<Option<String>>>>;

fn recorder() -> (Seen, Observer) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let observer: Observer = Arc::new(move |value: Option<&Toast>| {
        sink.lock()
            .unwrap()
            .push(value.map(|toast| toast.message.clone()));
    });
    (seen, observer)
}

fn msg(text: &str) -> Option<String> {
    Some(text.to_string())
}

#[test]
fn test_insert_assigns_distinct_ids() {
    let observers = Observers::default();
    let (_, a) = recorder();
    let (_, b) = recorder();
    let first = observers.insert(a, || None);
    let second = observers.insert(b, || None);
    assert_ne!(first, second);
    assert_eq!(observers.len(), 2);
}

#[test]
fn test_insert_delivers_current_value_first() {
    let observers = Observers::default();
    let (seen, observer) = recorder();

    observers.insert(observer, || Some(Toast::success("now")));

    assert_eq!(*seen.lock().unwrap(), vec![msg("now")]);
}

#[test]
fn test_remove_is_idempotent() {
    let observers = Observers::default();
    let (_, observer) = recorder();
    let id = observers.insert(observer, || None);
    assert!(observers.remove(id));
    assert!(!observers.remove(id));
    assert_eq!(observers.len(), 0);
}

#[test]
fn test_update_delivers_to_every_observer() {
    let observers = Observers::default();
    let (seen_a, a) = recorder();
    let (seen_b, b) = recorder();
    observers.insert(a, || None);
    observers.insert(b, || None);

    let result = observers.update(|| Some((Some(Toast::success("hi")), 7)));

    assert_eq!(result, Some(7));
    assert_eq!(*seen_a.lock().unwrap(), vec![None, msg("hi")]);
    assert_eq!(*seen_b.lock().unwrap(), vec![None, msg("hi")]);
}

#[test]
fn test_update_without_change_notifies_nobody() {
    let observers = Observers::default();
    let (seen, observer) = recorder();
    observers.insert(observer, || None);

    let result: Option<()> = observers.update(|| None);

    assert!(result.is_none());
    assert_eq!(*seen.lock().unwrap(), vec![None]);
}

#[test]
fn test_reentrant_update_is_queued_in_order() {
    let observers = Arc::new(Observers::default());
    let (seen, recorder_observer) = recorder();

    let inner = Arc::clone(&observers);
    let republisher: Observer = Arc::new(move |value: Option<&Toast>| {
        if value.is_some_and(|toast| toast.message == "first") {
            inner.update(|| Some((Some(Toast::error("second")), ())));
        }
    });

    observers.insert(republisher, || None);
    observers.insert(recorder_observer, || None);
    observers.update(|| Some((Some(Toast::success("first")), ())));

    // The recorder sees "first" before "second" even though "second" was
    // produced while "first" was still being delivered.
    assert_eq!(
        *seen.lock().unwrap(),
        vec![None, msg("first"), msg("second")]
    );
}

#[test]
fn test_insert_during_delivery_skips_older_queued_values() {
    let observers = Arc::new(Observers::default());
    let (late_seen, late_observer) = recorder();
    let late_observer = Mutex::new(Some(late_observer));

    let inner = Arc::clone(&observers);
    let joiner: Observer = Arc::new(move |value: Option<&Toast>| {
        if value.is_some_and(|toast| toast.message == "first") {
            inner.update(|| Some((Some(Toast::success("second")), ())));
            if let Some(observer) = late_observer.lock().unwrap().take() {
                inner.insert(observer, || Some(Toast::success("second")));
            }
        }
    });

    observers.insert(joiner, || None);
    observers.update(|| Some((Some(Toast::success("first")), ())));
    observers.update(|| Some((None, ())));

    // "second" was queued before the late observer joined, so it only
    // arrives once, as the replayed current value.
    assert_eq!(*late_seen.lock().unwrap(), vec![msg("second"), None]);
}

#[test]
fn test_subscription_drop_removes_observer() {
    let observers = Arc::new(Observers::default());
    let (seen, observer) = recorder();
    let id = observers.insert(observer, || None);
    let subscription = Subscription::new(&observers, id);

    subscription.unsubscribe();
    observers.update(|| Some((Some(Toast::success("after")), ())));

    assert_eq!(observers.len(), 0);
    assert_eq!(*seen.lock().unwrap(), vec![None]);
}

#[test]
fn test_subscription_outliving_registry_is_harmless() {
    let observers = Arc::new(Observers::default());
    let (_, observer) = recorder();
    let id = observers.insert(observer, || None);
    let subscription = Subscription::new(&observers, id);

    drop(observers);
    drop(subscription);
}

#[test]
fn test_panicking_observer_does_not_wedge_delivery() {
    let observers = Observers::default();
    let panicker: Observer = Arc::new(|value: Option<&Toast>| {
        if value.is_some() {
            panic!("observer failure");
        }
    });
    let (seen, observer) = recorder();
    observers.insert(panicker, || None);
    observers.insert(observer, || None);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        observers.update(|| Some((Some(Toast::success("boom")), ())));
    }));
    assert!(outcome.is_err());

    observers.update(|| Some((None, ())));
    assert_eq!(*seen.lock().unwrap(), vec![None, None]);
}
