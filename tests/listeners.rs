use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use reduce_store::{reducer_fn, Dispatcher, Store, Subscription};

type Counter = Store<i64, i64>;

fn counter() -> Arc<Counter> {
    let _ = env_logger::builder().is_test(true).try_init();
    Arc::new(Store::new(reducer_fn(|state: &i64, delta: &i64| state + delta)).unwrap())
}

fn recorder() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn listeners_run_in_registration_order() {
    let store = counter();
    let log = recorder();
    for name in ["first", "second", "third"] {
        let log = log.clone();
        store.subscribe(move || log.lock().push(name.to_string()));
    }

    store.dispatch(1).unwrap();
    assert_eq!(*log.lock(), vec!["first", "second", "third"]);
}

#[test]
fn listener_sees_committed_state() {
    let store = counter();
    let seen = recorder();
    let weak = Arc::downgrade(&store);
    let log = seen.clone();
    store.subscribe(move || {
        if let Some(store) = weak.upgrade() {
            log.lock().push(store.state().to_string());
        }
    });

    store.dispatch(2).unwrap();
    store.dispatch(3).unwrap();
    assert_eq!(*seen.lock(), vec!["2", "5"]);
}

#[test]
fn same_closure_subscribed_twice_runs_twice() {
    let store = counter();
    let calls = Arc::new(Mutex::new(0));
    let listener = {
        let calls = calls.clone();
        Arc::new(move || *calls.lock() += 1)
    };

    let first = {
        let listener = listener.clone();
        store.subscribe(move || listener())
    };
    let _second = store.subscribe(move || listener());

    store.dispatch(1).unwrap();
    assert_eq!(*calls.lock(), 2);

    first.unsubscribe();
    store.dispatch(1).unwrap();
    assert_eq!(*calls.lock(), 3);
}

#[test]
fn subscription_added_during_pass_waits_for_next_dispatch() {
    let store = counter();
    let log = recorder();
    let weak = Arc::downgrade(&store);
    let added: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

    {
        let log = log.clone();
        let added = added.clone();
        store.subscribe(move || {
            log.lock().push("outer".to_string());
            let mut added = added.lock();
            if added.is_none() {
                if let Some(store) = weak.upgrade() {
                    let log = log.clone();
                    *added = Some(store.subscribe(move || log.lock().push("late".to_string())));
                }
            }
        });
    }

    store.dispatch(1).unwrap();
    assert_eq!(*log.lock(), vec!["outer"]);

    store.dispatch(1).unwrap();
    assert_eq!(*log.lock(), vec!["outer", "outer", "late"]);
}

#[test]
fn unsubscribe_during_pass_does_not_affect_snapshot() {
    let store = counter();
    let log = recorder();
    let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

    {
        let victim = victim.clone();
        let log = log.clone();
        store.subscribe(move || {
            log.lock().push("killer".to_string());
            if let Some(subscription) = victim.lock().as_ref() {
                subscription.unsubscribe();
            }
        });
    }
    {
        let log = log.clone();
        *victim.lock() = Some(store.subscribe(move || log.lock().push("victim".to_string())));
    }

    store.dispatch(1).unwrap();
    assert_eq!(*log.lock(), vec!["killer", "victim"]);

    store.dispatch(1).unwrap();
    assert_eq!(*log.lock(), vec!["killer", "victim", "killer"]);
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn nested_dispatch_completes_before_outer_pass_resumes() {
    let store = counter();
    let log = recorder();
    let weak: Weak<Counter> = Arc::downgrade(&store);

    {
        let log = log.clone();
        let weak = weak.clone();
        store.subscribe(move || {
            let state = weak.upgrade().map(|store| *store.state()).unwrap_or_default();
            log.lock().push(format!("a:{}", state));
            if state == 1 {
                weak.dispatch(10).unwrap();
            }
        });
    }
    {
        let log = log.clone();
        store.subscribe(move || {
            let state = weak.upgrade().map(|store| *store.state()).unwrap_or_default();
            log.lock().push(format!("b:{}", state));
        });
    }

    store.dispatch(1).unwrap();

    assert_eq!(*store.state(), 11);
    assert_eq!(*log.lock(), vec!["a:1", "a:11", "b:11", "b:11"]);
}

#[test]
fn subscription_made_before_nested_dispatch_skips_outer_pass() {
    let store = counter();
    let log = recorder();
    let weak: Weak<Counter> = Arc::downgrade(&store);
    let late: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

    {
        let log = log.clone();
        let late = late.clone();
        store.subscribe(move || {
            log.lock().push("a".to_string());
            let Some(store) = weak.upgrade() else {
                return;
            };
            if late.lock().is_some() {
                return;
            }
            let c = {
                let log = log.clone();
                store.subscribe(move || log.lock().push("c".to_string()))
            };
            *late.lock() = Some(c);
            store.dispatch(1).unwrap();
        });
    }

    store.dispatch(1).unwrap();

    assert_eq!(*store.state(), 2);
    assert_eq!(*log.lock(), vec!["a", "a", "c"]);
    assert_eq!(store.listener_count(), 2);
}
