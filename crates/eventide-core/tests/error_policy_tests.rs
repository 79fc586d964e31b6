//! Integration tests for the error-policy state machine: what a failing
//! listener does to the rest of the drain under each policy, for both
//! signaled failures and panics.

use std::any::Any;
use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use eventide_core::{
    DispatchError, ErrorPolicy, Event, EventBroker, EventContext, EventError, FailureKind,
    Listener, ListenerRegistry,
};

type Log = Arc<Mutex<Vec<String>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().expect("log poisoned").clone()
}

#[derive(Debug)]
struct Task {
    label: &'static str,
}

impl Task {
    fn new(label: &'static str) -> Self {
        Self { label }
    }

    fn shared(label: &'static str) -> Arc<dyn Event> {
        Arc::new(Self::new(label))
    }
}

impl Event for Task {
    fn source(&self) -> &(dyn Any + Send + Sync) {
        &self.label
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Listener that always signals an event-level failure.
struct Failing {
    name: &'static str,
    message: &'static str,
}

impl Listener for Failing {
    fn name(&self) -> &str {
        self.name
    }

    fn on_event(&self, _ctx: &EventContext<'_>) -> Result<(), EventError> {
        Err(EventError::new(self.message))
    }
}

/// Listener that always panics.
struct Panicking {
    name: &'static str,
}

impl Listener for Panicking {
    fn name(&self) -> &str {
        self.name
    }

    fn on_event(&self, _ctx: &EventContext<'_>) -> Result<(), EventError> {
        panic!("listener exploded");
    }
}

/// Registers a recorder for `Task` that logs `tag`.
fn record<K: Any>(registry: &ListenerRegistry, log: &Log, tag: &'static str) {
    let log = Arc::clone(log);
    registry.register_fn::<K, _>(move |_ctx: &EventContext<'_>| {
        log.lock().expect("log poisoned").push(tag.to_string());
        Ok(())
    });
}

// ==================== Throw (default) ====================

#[test]
fn default_policy_propagates_listener_failures() {
    let registry = Arc::new(ListenerRegistry::new());
    registry.register::<Task>(Arc::new(Failing {
        name: "projector",
        message: "projection out of date",
    }));

    let broker = EventBroker::fifo();
    broker.set_locator(registry);

    let err = broker
        .dispatch(Task::new("t1"))
        .expect_err("failure must propagate under Throw");

    match &err {
        DispatchError::ListenerFailed { listener, source, .. } => {
            assert_eq!(listener, "projector");
            assert_eq!(source.message(), "projection out of date");
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
    assert_eq!(err.listener(), "projector");
}

#[test]
fn throw_preserves_the_original_cause_chain() {
    let registry = Arc::new(ListenerRegistry::new());
    registry.register_fn::<Task, _>(|_ctx: &EventContext<'_>| {
        let io = std::io::Error::other("connection reset");
        Err(EventError::with_cause("could not notify downstream", io))
    });

    let broker = EventBroker::fifo();
    broker.set_locator(registry);

    let err = broker.dispatch(Task::new("t1")).expect_err("must propagate");
    let event_error = StdError::source(&err).expect("EventError chained");
    assert_eq!(event_error.to_string(), "could not notify downstream");
    let io = event_error.source().expect("io cause chained");
    assert_eq!(io.to_string(), "connection reset");
}

#[test]
fn throw_leaves_remaining_events_pending_for_a_later_dispatch() {
    let registry = Arc::new(ListenerRegistry::new());
    let log = new_log();

    let failing_log = Arc::clone(&log);
    registry.register_fn::<Task, _>(move |ctx: &EventContext<'_>| {
        let task = ctx.event_as::<Task>().expect("registered for Task");
        if task.label == "bad" {
            return Err(EventError::new("refused"));
        }
        failing_log
            .lock()
            .expect("log poisoned")
            .push(task.label.to_string());
        Ok(())
    });

    let broker = EventBroker::fifo();
    broker.set_locator(registry);

    broker
        .dispatch_all(vec![Task::shared("bad"), Task::shared("good")])
        .expect_err("bad must abort the drain");

    // "good" is still queued; the next dispatch drains it first.
    let report = broker.dispatch(Task::new("next")).expect("dispatch");
    assert_eq!(entries(&log), vec!["good", "next"]);
    assert_eq!(report.events_processed, 2);
}

// ==================== IgnoreListener ====================

#[test]
fn ignore_listener_attempts_every_listener() {
    let registry = Arc::new(ListenerRegistry::new());
    let log = new_log();
    registry.register::<Task>(Arc::new(Failing {
        name: "flaky",
        message: "nope",
    }));
    record::<Task>(&registry, &log, "steady");

    let broker = EventBroker::fifo();
    broker.set_locator(registry);
    broker.set_event_error_policy(ErrorPolicy::IgnoreListener);

    let report = broker.dispatch(Task::new("t1")).expect("must absorb");

    assert_eq!(entries(&log), vec!["steady"]);
    assert_eq!(report.listeners_invoked, 2);
    assert_eq!(report.absorbed.len(), 1);
    assert_eq!(report.absorbed[0].kind, FailureKind::Event);
    assert_eq!(report.absorbed[0].listener, "flaky");
    assert_eq!(report.absorbed[0].message, "nope");
    assert!(!report.is_clean());
}

// ==================== IgnoreEvent ====================

#[test]
fn ignore_event_abandons_the_event_but_keeps_draining() {
    let registry = Arc::new(ListenerRegistry::new());
    let log = new_log();

    // First listener: rejects only the event labeled "first".
    registry.register_fn::<Task, _>(|ctx: &EventContext<'_>| {
        let task = ctx.event_as::<Task>().expect("registered for Task");
        if task.label == "first" {
            return Err(EventError::new("refused"));
        }
        Ok(())
    });
    // Second listener: records every event it is reached for.
    let record_log = Arc::clone(&log);
    registry.register_fn::<Task, _>(move |ctx: &EventContext<'_>| {
        let task = ctx.event_as::<Task>().expect("registered for Task");
        record_log
            .lock()
            .expect("log poisoned")
            .push(task.label.to_string());
        Ok(())
    });

    let broker = EventBroker::fifo();
    broker.set_locator(registry);
    broker.set_event_error_policy(ErrorPolicy::IgnoreEvent);

    let report = broker
        .dispatch_all(vec![Task::shared("first"), Task::shared("second")])
        .expect("must absorb");

    // "first" was abandoned before its recorder ran; "second" still
    // drained and reached both listeners.
    assert_eq!(entries(&log), vec!["second"]);
    assert_eq!(report.events_processed, 2);
    assert_eq!(report.absorbed.len(), 1);
    assert!(!report.halted);
}

// ==================== Stop ====================

#[test]
fn stop_halts_quietly_without_invoking_later_listeners() {
    let registry = Arc::new(ListenerRegistry::new());
    let log = new_log();
    registry.register::<Task>(Arc::new(Failing {
        name: "gate",
        message: "closed",
    }));
    record::<Task>(&registry, &log, "l2");

    let broker = EventBroker::fifo();
    broker.set_locator(registry);
    broker.set_event_error_policy(ErrorPolicy::Stop);

    // No error surfaces, and L2 is never invoked.
    let report = broker.dispatch(Task::new("t1")).expect("stop is silent");
    assert!(entries(&log).is_empty());
    assert!(report.halted);
    assert_eq!(report.absorbed.len(), 1);
}

#[test]
fn stop_discards_the_rest_of_the_queue() {
    let registry = Arc::new(ListenerRegistry::new());
    let log = new_log();

    let stop_log = Arc::clone(&log);
    registry.register_fn::<Task, _>(move |ctx: &EventContext<'_>| {
        let task = ctx.event_as::<Task>().expect("registered for Task");
        if task.label == "bad" {
            return Err(EventError::new("refused"));
        }
        stop_log
            .lock()
            .expect("log poisoned")
            .push(task.label.to_string());
        Ok(())
    });

    let broker = EventBroker::fifo();
    broker.set_locator(registry);
    broker.set_event_error_policy(ErrorPolicy::Stop);

    broker
        .dispatch_all(vec![Task::shared("bad"), Task::shared("stale")])
        .expect("stop is silent");

    // "stale" was discarded with the halted drain; a fresh dispatch must
    // not resurrect it.
    let report = broker.dispatch(Task::new("fresh")).expect("dispatch");
    assert_eq!(entries(&log), vec!["fresh"]);
    assert_eq!(report.events_processed, 1);
}

// ==================== Runtime failures (panics) ====================

#[test]
fn panic_propagates_as_a_typed_error_under_throw() {
    let registry = Arc::new(ListenerRegistry::new());
    registry.register::<Task>(Arc::new(Panicking { name: "buggy" }));

    let broker = EventBroker::fifo();
    broker.set_locator(registry);

    let err = broker
        .dispatch(Task::new("t1"))
        .expect_err("panic must propagate under Throw");

    match err {
        DispatchError::ListenerPanicked { listener, panic, .. } => {
            assert_eq!(listener, "buggy");
            assert_eq!(panic, "listener exploded");
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}

#[test]
fn panic_is_absorbed_under_ignore_listener() {
    let registry = Arc::new(ListenerRegistry::new());
    let log = new_log();
    registry.register::<Task>(Arc::new(Panicking { name: "buggy" }));
    record::<Task>(&registry, &log, "survivor");

    let broker = EventBroker::fifo();
    broker.set_locator(registry);
    broker.set_runtime_error_policy(ErrorPolicy::IgnoreListener);

    let report = broker.dispatch(Task::new("t1")).expect("must absorb");

    assert_eq!(entries(&log), vec!["survivor"]);
    assert_eq!(report.absorbed.len(), 1);
    assert_eq!(report.absorbed[0].kind, FailureKind::Runtime);
    assert_eq!(report.absorbed[0].message, "listener exploded");
}

#[test]
fn event_and_runtime_policies_are_independent() {
    let registry = Arc::new(ListenerRegistry::new());
    registry.register::<Task>(Arc::new(Panicking { name: "buggy" }));
    registry.register::<Task>(Arc::new(Failing {
        name: "refuser",
        message: "no",
    }));

    let broker = EventBroker::fifo();
    broker.set_locator(registry);
    // Panics are tolerated, signaled failures are not.
    broker.set_runtime_error_policy(ErrorPolicy::IgnoreListener);

    let err = broker
        .dispatch(Task::new("t1"))
        .expect_err("signaled failure still propagates");

    // The panic was absorbed (so the second listener ran at all), and the
    // propagated error is the signaled one.
    match err {
        DispatchError::ListenerFailed { listener, .. } => assert_eq!(listener, "refuser"),
        other => panic!("unexpected error variant: {other:?}"),
    }
}

// ==================== Policy mutability ====================

#[test]
fn policy_changes_take_effect_on_the_next_dispatch() {
    let registry = Arc::new(ListenerRegistry::new());
    registry.register::<Task>(Arc::new(Failing {
        name: "flaky",
        message: "nope",
    }));

    let broker = EventBroker::fifo();
    broker.set_locator(registry);

    broker
        .dispatch(Task::new("t1"))
        .expect_err("default Throw propagates");

    broker.set_event_error_policy(ErrorPolicy::IgnoreListener);
    let report = broker.dispatch(Task::new("t2")).expect("now absorbed");
    assert_eq!(report.absorbed.len(), 1);
}
