//! Integration tests for the pack runtime against a scripted gateway.

use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use courier_pack::{Command, Event, EventDef, FATAL_EVENT_NAME, Pack, PackConfig, PackDef, PackError};
use courier_types::{ClientError, Gateway, wire};

/// A gateway that replays scripted results and records every call.
///
/// Unscripted calls fall back to benign defaults: registration echoes the
/// pack with discovery links, polling finds no action, posts and
/// completions succeed.
#[derive(Clone, Default)]
struct MockGateway(Arc<MockState>);

#[derive(Default)]
struct MockState {
    register_results: Mutex<VecDeque<Result<wire::Pack, ClientError>>>,
    registered_packs: Mutex<Vec<wire::Pack>>,
    take_results: Mutex<VecDeque<Result<Option<wire::Action>, ClientError>>>,
    take_calls: AtomicUsize,
    complete_results: Mutex<VecDeque<Result<(), ClientError>>>,
    completions: Mutex<Vec<(wire::Action, wire::Event)>>,
    post_results: Mutex<VecDeque<Result<(), ClientError>>>,
    posted: Mutex<Vec<wire::Event>>,
}

fn registered_echo(pack: &wire::Pack) -> wire::Pack {
    let mut echo = pack.clone();
    echo.links = vec![
        wire::Link {
            href: "http://server/actions/take".into(),
            rel: "takeAction".into(),
        },
        wire::Link {
            href: "http://server/events".into(),
            rel: "event".into(),
        },
    ];
    echo
}

impl Gateway for MockGateway {
    fn register_pack(
        &mut self,
        pack: &wire::Pack,
    ) -> impl Future<Output = Result<wire::Pack, ClientError>> + Send {
        let state = Arc::clone(&self.0);
        let pack = pack.clone();
        async move {
            state
                .registered_packs
                .lock()
                .expect("test lock poisoned")
                .push(pack.clone());
            state
                .register_results
                .lock()
                .expect("test lock poisoned")
                .pop_front()
                .unwrap_or_else(|| Ok(registered_echo(&pack)))
        }
    }

    fn post_event(&self, event: &wire::Event) -> impl Future<Output = Result<(), ClientError>> + Send {
        let state = Arc::clone(&self.0);
        let event = event.clone();
        async move {
            state
                .posted
                .lock()
                .expect("test lock poisoned")
                .push(event);
            state
                .post_results
                .lock()
                .expect("test lock poisoned")
                .pop_front()
                .unwrap_or(Ok(()))
        }
    }

    fn take_action(&self) -> impl Future<Output = Result<Option<wire::Action>, ClientError>> + Send {
        let state = Arc::clone(&self.0);
        async move {
            state.take_calls.fetch_add(1, Ordering::SeqCst);
            state
                .take_results
                .lock()
                .expect("test lock poisoned")
                .pop_front()
                .unwrap_or(Ok(None))
        }
    }

    fn complete_action(
        &self,
        action: &wire::Action,
        event: &wire::Event,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        let state = Arc::clone(&self.0);
        let action = action.clone();
        let event = event.clone();
        async move {
            state
                .completions
                .lock()
                .expect("test lock poisoned")
                .push((action, event));
            state
                .complete_results
                .lock()
                .expect("test lock poisoned")
                .pop_front()
                .unwrap_or(Ok(()))
        }
    }
}

fn server_error() -> ClientError {
    ClientError::Server {
        status: 500,
        body: "boom".into(),
    }
}

/// Timing config with no real delays, so tests run instantly.
fn zero_config() -> PackConfig {
    PackConfig {
        polling_interval: Duration::ZERO,
        registration_backoff: Duration::ZERO,
    }
}

/// A continuation predicate that allows exactly `n` loop iterations.
fn iterations(n: usize) -> impl FnMut() -> bool + Send + 'static {
    let mut count = 0;
    move || {
        count += 1;
        count <= n
    }
}

fn rota_def() -> PackDef {
    PackDef::new("rota-pack")
        .label("env", "test")
        .command(
            Command::new("Rota", |_: &str| {
                Event::new(EventDef::new("RotaRetrieved"), "Isaac")
            })
            .output_event(EventDef::new("RotaRetrieved"))
            .help_url("http://example.com/rota"),
        )
        .help_url("http://example.com")
}

fn rota_action() -> wire::Action {
    wire::Action {
        command: "Rota".into(),
        input: "x".into(),
        links: vec![wire::Link {
            href: "http://server/actions/1/result".into(),
            rel: "actionResult".into(),
        }],
    }
}

#[tokio::test]
async fn registration_failing_twice_makes_exactly_two_attempts() {
    let gateway = MockGateway::default();
    gateway
        .0
        .register_results
        .lock()
        .unwrap()
        .extend([Err(server_error()), Err(server_error())]);

    let mut pack = Pack::with_config(rota_def(), gateway.clone(), zero_config());
    let err = pack.start().await.unwrap_err();

    assert!(matches!(err, PackError::Registration(_)));
    assert_eq!(gateway.0.registered_packs.lock().unwrap().len(), 2);
    assert_eq!(gateway.0.take_calls.load(Ordering::SeqCst), 0);
    assert!(pack.registration().is_none());
}

#[tokio::test]
async fn registration_succeeding_on_retry_enters_the_loop() {
    let gateway = MockGateway::default();
    gateway
        .0
        .register_results
        .lock()
        .unwrap()
        .push_back(Err(server_error()));

    let mut pack = Pack::with_config(rota_def(), gateway.clone(), zero_config())
        .run_while(iterations(1));
    pack.start().await.expect("start");

    assert_eq!(gateway.0.registered_packs.lock().unwrap().len(), 2);
    assert_eq!(gateway.0.take_calls.load(Ordering::SeqCst), 1);
    assert!(pack.registration().is_some());
}

#[tokio::test]
async fn consumes_one_action_then_keeps_polling() {
    let gateway = MockGateway::default();
    gateway
        .0
        .take_results
        .lock()
        .unwrap()
        .push_back(Ok(Some(rota_action())));

    let mut pack = Pack::with_config(rota_def(), gateway.clone(), zero_config())
        .run_while(iterations(3));
    pack.start().await.expect("start");

    let completions = gateway.0.completions.lock().unwrap();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].0, rota_action());
    assert_eq!(
        completions[0].1,
        wire::Event {
            event: "RotaRetrieved".into(),
            payload: Some("Isaac".into()),
        }
    );
    // The two remaining iterations polled and found nothing.
    assert_eq!(gateway.0.take_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unknown_command_is_completed_with_a_fatal_event() {
    let gateway = MockGateway::default();
    gateway
        .0
        .take_results
        .lock()
        .unwrap()
        .push_back(Ok(Some(wire::Action {
            command: "Unknown".into(),
            input: "x".into(),
            links: vec![],
        })));

    let mut pack = Pack::with_config(rota_def(), gateway.clone(), zero_config())
        .run_while(iterations(1));
    pack.start().await.expect("start");

    let completions = gateway.0.completions.lock().unwrap();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].1.event, FATAL_EVENT_NAME);
    assert!(
        completions[0]
            .1
            .payload
            .as_deref()
            .unwrap_or_default()
            .contains("Unknown")
    );
}

#[tokio::test]
async fn take_action_failures_degrade_to_the_next_poll() {
    let gateway = MockGateway::default();
    gateway
        .0
        .take_results
        .lock()
        .unwrap()
        .extend([Err(server_error()), Ok(Some(rota_action()))]);

    let mut pack = Pack::with_config(rota_def(), gateway.clone(), zero_config())
        .run_while(iterations(2));
    pack.start().await.expect("start");

    assert_eq!(gateway.0.completions.lock().unwrap().len(), 1);
    assert_eq!(gateway.0.take_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn completion_failures_do_not_stop_the_loop() {
    let gateway = MockGateway::default();
    let second_action = wire::Action {
        input: "y".into(),
        ..rota_action()
    };
    gateway.0.take_results.lock().unwrap().extend([
        Ok(Some(rota_action())),
        Ok(Some(second_action.clone())),
    ]);
    gateway
        .0
        .complete_results
        .lock()
        .unwrap()
        .push_back(Err(server_error()));

    let mut pack = Pack::with_config(rota_def(), gateway.clone(), zero_config())
        .run_while(iterations(2));
    pack.start().await.expect("start");

    // The first completion failed and was dropped; the loop went on to the
    // second action anyway.
    let completions = gateway.0.completions.lock().unwrap();
    assert_eq!(completions.len(), 2);
    assert_eq!(completions[1].0, second_action);
}

#[tokio::test]
async fn pack_without_commands_returns_after_registration() {
    let gateway = MockGateway::default();
    let def = PackDef::new("observer-pack").event_def(EventDef::new("Heartbeat"));

    // No continuation predicate override: if the loop were entered with the
    // always-true default, this test would never finish.
    let mut pack = Pack::with_config(def, gateway.clone(), zero_config());
    pack.start().await.expect("start");

    assert!(pack.registration().is_some());
    assert_eq!(gateway.0.take_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn send_event_posts_the_mapped_event() {
    let gateway = MockGateway::default();
    let pack = Pack::with_config(rota_def(), gateway.clone(), zero_config());

    pack.send_event(&Event::new(EventDef::new("Heartbeat"), "ok"))
        .await
        .expect("send");

    let posted = gateway.0.posted.lock().unwrap();
    assert_eq!(
        posted[0],
        wire::Event {
            event: "Heartbeat".into(),
            payload: Some("ok".into()),
        }
    );
}

#[tokio::test]
async fn send_event_failures_name_the_offending_event() {
    let gateway = MockGateway::default();
    gateway
        .0
        .post_results
        .lock()
        .unwrap()
        .push_back(Err(server_error()));

    let pack = Pack::with_config(rota_def(), gateway.clone(), zero_config());
    let err = pack
        .send_event(&Event::new(EventDef::new("Heartbeat"), "ok"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PackError::SendEvent { ref event, .. } if event.contains("Heartbeat")
    ));
}

#[tokio::test]
async fn registration_round_trip_preserves_the_declared_shape() {
    let gateway = MockGateway::default();
    let def = PackDef::new("rota-pack")
        .command(
            Command::new("Rota", |_: &str| {
                Event::new(EventDef::new("RotaRetrieved"), "Isaac")
            })
            .output_event(EventDef::new("RotaRetrieved"))
            .output_event(EventDef::new("Error"))
            .help_url("http://example.com/rota"),
        )
        .command(
            Command::new("Swap", |_: &str| {
                Event::new(EventDef::new("Swapped"), "done")
            })
            .output_event(EventDef::new("Swapped")),
        )
        .help_url("http://example.com");

    let mut pack = Pack::with_config(def, gateway.clone(), zero_config())
        .run_while(iterations(0));
    pack.start().await.expect("start");

    let registered_packs = gateway.0.registered_packs.lock().unwrap();
    assert_eq!(registered_packs[0].links[0].rel, "help");
    drop(registered_packs);

    let registered = pack.registration().expect("registered");
    let names: Vec<&str> = registered.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Rota", "Swap"]);

    let rota = &registered.commands[0];
    let declared: HashSet<&str> = rota.events.iter().map(String::as_str).collect();
    assert_eq!(declared, HashSet::from(["RotaRetrieved", "Error"]));
    assert_eq!(rota.links[0].rel, "help");

    let flattened: HashSet<&str> = registered.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        flattened,
        HashSet::from(["RotaRetrieved", "Error", "Swapped"])
    );
}
