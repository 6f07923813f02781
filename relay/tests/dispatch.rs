use relay::{
    ConcurrentDelivery, DispatchOutcome, RegistryBuilder, RegistryError, Route, SinkBinding,
};
use relay_core::{Method, StatusCode};
use relay_std::{
    hooks::{EVENT_HEADER, GitHubPushHook},
    payload::GitHubPushEvent,
    testing::{CountingSink, RecordingSink, StaticHook},
};

mod common;
use common::{TestEvent, ctx, post};

#[tokio::test]
async fn test_forward_runs_every_sink() {
    let recorder = RecordingSink::new("rec");
    let counter = CountingSink::new("count");
    let registry = RegistryBuilder::new()
        .register(
            Route::post("/hook"),
            StaticHook::forward(TestEvent::new("hello")),
            vec![
                SinkBinding::essential(recorder.clone()),
                SinkBinding::essential(counter.clone()),
            ],
        )
        .unwrap()
        .build();

    let reply = registry.dispatch(&ctx(), &post("/hook", "")).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.detail, "OK");
    assert_eq!(recorder.payloads(), vec![TestEvent::new("hello")]);
    assert_eq!(recorder.request_ids(), vec!["test-request".to_string()]);
    assert_eq!(recorder.routes(), vec![Route::post("/hook")]);
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn test_sink_failures_become_500_listing_all() {
    let mut builder = RegistryBuilder::with_delivery(ConcurrentDelivery);
    let ok = CountingSink::new("ok");
    builder
        .route(Route::post("/hook"), StaticHook::forward(TestEvent::new("x")))
        .sink(CountingSink::failing("lark", "timeout"))
        .sink(ok.clone())
        .sink(CountingSink::failing("bytebase", "401"))
        .mount()
        .unwrap();
    let registry = builder.build();

    let reply = registry.dispatch(&ctx(), &post("/hook", "")).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        reply.detail,
        "failed to deliver to 2 of 3 sink(s) on [POST] /hook: lark: timeout; bytebase: 401"
    );
    assert_eq!(ok.count(), 1);
}

#[tokio::test]
async fn test_short_circuit_and_reject_skip_sinks() {
    let counter = CountingSink::new("count");
    let mut builder = RegistryBuilder::new();
    builder
        .route(
            Route::post("/skip"),
            StaticHook::<TestEvent>::new(DispatchOutcome::accepted("nothing to do")),
        )
        .sink(counter.clone())
        .mount()
        .unwrap();
    builder
        .route(
            Route::post("/bad"),
            StaticHook::<TestEvent>::new(DispatchOutcome::reject(StatusCode::BAD_REQUEST, "bad")),
        )
        .sink(counter.clone())
        .mount()
        .unwrap();
    let registry = builder.build();

    let reply = registry.dispatch(&ctx(), &post("/skip", "")).await;
    assert_eq!((reply.status, reply.detail.as_str()), (StatusCode::ACCEPTED, "nothing to do"));

    let reply = registry.dispatch(&ctx(), &post("/bad", "")).await;
    assert_eq!((reply.status, reply.detail.as_str()), (StatusCode::BAD_REQUEST, "bad"));

    assert_eq!(counter.count(), 0);
}

#[tokio::test]
async fn test_github_ping_never_reaches_sinks() {
    let counter = CountingSink::new("count");
    let mut builder = RegistryBuilder::new();
    builder
        .route(Route::post("/github"), GitHubPushHook::default())
        .sink(counter.clone())
        .mount()
        .unwrap();
    let registry = builder.build();

    let request = post("/github", "{}").with_header(EVENT_HEADER, "ping");
    let reply = registry.dispatch(&ctx(), &request).await;

    assert_eq!(reply.status, StatusCode::ACCEPTED);
    assert_eq!(reply.detail, "Pong");
    assert_eq!(counter.count(), 0);
}

#[tokio::test]
async fn test_github_push_reaches_sinks() {
    let recorder: RecordingSink<GitHubPushEvent> = RecordingSink::new("rec");
    let mut builder = RegistryBuilder::new();
    builder
        .route(Route::post("/github"), GitHubPushHook::default())
        .sink(recorder.clone())
        .mount()
        .unwrap();
    let registry = builder.build();

    let request = post("/github", r#"{"ref":"refs/heads/main","compare":"https://x/compare"}"#)
        .with_header(EVENT_HEADER, "push");
    let reply = registry.dispatch(&ctx(), &request).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(recorder.payloads()[0].git_ref, "refs/heads/main");
}

#[test]
fn test_duplicate_route_fails() {
    let mut builder = RegistryBuilder::new();
    builder
        .register_mut(Route::post("/hook"), StaticHook::forward(1u8), vec![])
        .unwrap();

    let err = builder
        .register_mut(Route::post("/hook"), StaticHook::forward(2u8), vec![])
        .unwrap_err();

    assert!(matches!(err, RegistryError::DuplicateRoute(ref route) if route == &Route::post("/hook")));
    assert_eq!(err.to_string(), "a hook is already mounted on [POST] /hook");

    // Same path, other method is a different route.
    builder
        .register_mut(Route::new(Method::PUT, "/hook"), StaticHook::forward(3u8), vec![])
        .unwrap();
    assert_eq!(builder.len(), 2);
}

#[test]
fn test_invalid_hook_fails() {
    let err = RegistryBuilder::new()
        .register(
            Route::post("/hook"),
            StaticHook::forward(1u8).with_invalid_config("missing project"),
            vec![],
        )
        .err()
        .unwrap();
    assert!(matches!(err, RegistryError::InvalidHook { ref hook, .. } if hook == "static"));
}

#[test]
fn test_invalid_essential_sink_fails() {
    let mut builder = RegistryBuilder::new();
    let err = builder
        .route(Route::post("/hook"), StaticHook::forward(1u8))
        .sink(CountingSink::new("lark").with_invalid_config("no destinations"))
        .mount()
        .unwrap_err();

    assert!(matches!(err, RegistryError::InvalidSink { ref sink, .. } if sink == "lark"));
    assert!(builder.is_empty());
}

#[tokio::test]
async fn test_invalid_optional_sink_is_dropped() {
    let kept = CountingSink::new("kept");
    let dropped = CountingSink::new("bytebase").with_invalid_config("missing credentials");
    let mut builder = RegistryBuilder::new();
    builder
        .route(Route::post("/hook"), StaticHook::forward(1u8))
        .sink(kept.clone())
        .optional_sink(dropped.clone())
        .mount()
        .unwrap();
    let registry = builder.build();

    let routes: Vec<_> = registry.routes().collect();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].2, vec!["kept".to_string()]);

    let reply = registry.dispatch(&ctx(), &post("/hook", "")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(kept.count(), 1);
    assert_eq!(dropped.count(), 0);
}

#[tokio::test]
async fn test_unknown_path_and_wrong_method() {
    let registry = RegistryBuilder::new()
        .register(Route::post("/hook"), StaticHook::forward(1u8), vec![])
        .unwrap()
        .build();

    let reply = registry.dispatch(&ctx(), &post("/other", "")).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let get = relay::InboundRequest::new(Method::GET, "/hook", "");
    let reply = registry.dispatch(&ctx(), &get).await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
}
