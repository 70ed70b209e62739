//! Concurrent listener delivery.

use confsync_engine::{apply, ChangeListener, FullChangeEvent, SyncState};
use confsync_testkit::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::thread;

fn variant(i: u32) -> ServiceConfig {
    ServiceConfig {
        workers: i,
        name: format!("worker-{i}"),
        ..sample_service()
    }
}

#[test]
fn concurrent_updates_leave_one_complete_value() {
    const THREADS: u32 = 16;

    let env = TestEnv::new();
    let remote = seeded_remote();
    let destination = empty_destination();
    let session = apply(&destination, &env.session_config(1), &remote).unwrap();

    let barrier = Arc::new(Barrier::new(THREADS as usize));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let session = Arc::clone(&session);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut changes = HashMap::new();
                changes.insert(KEY.to_string(), variant(i).to_json());
                let event = FullChangeEvent {
                    namespace: NAMESPACE.to_string(),
                    changes,
                };
                barrier.wait();
                session.on_full_change(&event);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let final_value = destination.read().clone();
    let winner = (0..THREADS)
        .find(|i| variant(*i) == final_value)
        .expect("destination is not one of the published values");

    // Cached raw, fallback file and destination all agree on the winner.
    assert_eq!(session.cached_raw(), Some(variant(winner).to_json()));
    assert_eq!(env.read_fallback(), Some(variant(winner).to_json()));
    assert_eq!(session.stats().updates_applied, u64::from(THREADS));
}

#[test]
fn readers_never_observe_partial_values() {
    let env = TestEnv::new();
    let remote = seeded_remote();
    let destination = empty_destination();
    let session = apply(&destination, &env.session_config(1), &remote).unwrap();
    assert_eq!(session.state(), SyncState::Listening);

    let writer = {
        let remote = remote.clone();
        thread::spawn(move || {
            for i in 0..200 {
                remote.update_value(NAMESPACE, KEY, variant(i).to_yaml());
            }
        })
    };

    let reader = {
        let destination = Arc::clone(&destination);
        thread::spawn(move || {
            for _ in 0..500 {
                let value = destination.read().clone();
                let consistent = value == sample_service()
                    || value.name == format!("worker-{}", value.workers);
                assert!(consistent, "torn read: {value:?}");
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(*destination.read(), variant(199));
}

#[test]
fn sessions_for_different_keys_are_independent() {
    let env = TestEnv::new();
    let remote = seeded_remote();
    remote.set_value(NAMESPACE, "secondary", updated_service().to_json());

    let primary = empty_destination();
    let secondary = empty_destination();
    apply(&primary, &env.session_config(1), &remote).unwrap();
    let mut config = env.session_config(1);
    config.key = "secondary".into();
    apply(&secondary, &config, &remote).unwrap();

    let mut snapshot = remote.snapshot(NAMESPACE);
    snapshot.insert("secondary".into(), variant(7).to_json());
    remote.publish(NAMESPACE, snapshot);

    assert_eq!(*primary.read(), sample_service());
    assert_eq!(*secondary.read(), variant(7));
    assert_ne!(config.fallback_path(), env.fallback_path());
}

#[test]
fn listener_is_usable_as_trait_object() {
    let env = TestEnv::new();
    let remote = seeded_remote();
    let destination = empty_destination();
    let session = apply(&destination, &env.session_config(1), &remote).unwrap();

    let listener: Arc<dyn ChangeListener> = session;
    let mut changes = HashMap::new();
    changes.insert(KEY.to_string(), updated_service().to_json());
    listener.on_full_change(&FullChangeEvent {
        namespace: NAMESPACE.to_string(),
        changes,
    });

    assert_eq!(*destination.read(), updated_service());
}
