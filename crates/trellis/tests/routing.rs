//! End-to-end routing behaviour through the public facade.

use std::collections::BTreeMap;
use std::sync::Arc;

use trellis::prelude::*;

type ServerRequest = http::Request<()>;

#[derive(Default)]
struct SampleController;

impl SampleController {
    fn home(&self) -> &'static str {
        "Home"
    }

    fn show(&self, route: MatchedRoute) -> String {
        format!("user {}", route.parameter("id").unwrap_or_default())
    }
}

impl Controller for SampleController {
    fn actions(actions: &mut Actions<Self>) {
        actions.add("home", Self::home);
        actions.add("show", Self::show);
    }
}

fn router() -> (Router, TrapPublisher) {
    let trap = TrapPublisher::new();
    let mut router = Router::with_publisher(trap.clone());
    router.register_controller::<SampleController>();
    (router, trap)
}

fn request(method: &str, uri: &str) -> BoxedRequest {
    Arc::new(
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap(),
    )
}

fn home_request() -> BoxedRequest {
    request("GET", "http://example.com/")
}

#[test]
fn test_injection_of_request_by_interface() {
    let (mut router, trap) = router();
    router.get("/", |r: BoxedRequest| r.method().to_string());
    router.dispatch(home_request()).unwrap();

    assert_eq!(trap.output(), "GET");
}

#[test]
fn test_injection_of_request_by_type() {
    let (mut router, trap) = router();
    router.get("/", |r: Request<ServerRequest>| r.method().to_string());
    router.dispatch(home_request()).unwrap();

    assert_eq!(trap.output(), "GET");
}

#[test]
fn test_injection_of_default_value() {
    let (mut router, trap) = router();
    router.get(
        "/",
        Function::new(|default: String| default).with_default(0, "Default"),
    );
    router.dispatch(home_request()).unwrap();

    assert_eq!(trap.output(), "Default");
}

#[test]
fn test_injection_of_optional_value() {
    let (mut router, trap) = router();
    router.get("/", |missing: Option<String>| {
        missing.unwrap_or_else(|| "none".to_string())
    });
    router.dispatch(home_request()).unwrap();

    assert_eq!(trap.output(), "none");
}

#[test]
fn test_default_publisher() {
    let sink = Arc::new(WritePublisher::new(Vec::new()));
    let mut router = Router::with_publisher(Arc::clone(&sink));
    router.get("/", || "home");

    router.dispatch(home_request()).unwrap();
    assert_eq!(sink.writer().as_slice(), b"home");

    router.dispatch(home_request()).unwrap();
    assert_eq!(sink.writer().as_slice(), b"homehome");
}

#[test]
fn test_router_defaults_to_stdout() {
    let mut router = Router::new();
    router.get("/", || "home");

    router.dispatch(home_request()).unwrap();
    assert_eq!(router.handle(home_request()).unwrap().to_string(), "home");
}

#[test]
fn test_with_fully_namespaced_controller() {
    let (mut router, trap) = router();
    router.get("/", HandlerRef::method::<SampleController>("home"));
    router.dispatch(home_request()).unwrap();

    assert_eq!(trap.output(), "Home");
}

#[test]
fn test_with_class_method_pair() {
    let (mut router, trap) = router();
    router.get("/", ("SampleController", "home"));
    router.dispatch(home_request()).unwrap();

    assert_eq!(trap.output(), "Home");
}

#[test]
fn test_with_class_method_string() {
    let (mut router, trap) = router();
    router.get("/users/{id}", "SampleController@show");
    router
        .dispatch(request("GET", "http://example.com/users/42"))
        .unwrap();

    assert_eq!(trap.output(), "user 42");
}

#[test]
fn test_not_found_error() {
    let (mut router, trap) = router();
    router.get("/", || "OK");

    let err = router
        .dispatch(request("GET", "http://example.com/unknowon"))
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(trap.last().is_none());
}

#[test]
fn test_wrong_method_is_not_found() {
    let (mut router, _) = router();
    router.get("/", || "OK");

    let err = router.dispatch(request("POST", "http://example.com/")).unwrap_err();
    assert!(matches!(err, DispatchError::RouteNotFound(RouteNotFoundError { .. })));
}

#[test]
fn test_with_class_method_but_invalid_controller_class() {
    let (mut router, _) = router();
    router.get("/", "UnknownController@method");

    let err = router.dispatch(home_request()).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::InvalidCallable(InvalidCallableError::UnknownClass { .. })
    ));
}

#[test]
fn test_with_class_but_invalid_method() {
    let (mut router, _) = router();
    router.get("/", "SampleController@invalid");

    let err = router.dispatch(home_request()).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::InvalidCallable(InvalidCallableError::UnknownMethod { .. })
    ));
}

#[test]
fn test_with_invalid_controller_class() {
    let (mut router, _) = router();
    router.get("/", 666_i64);

    let err = router.dispatch(home_request()).unwrap_err();
    assert!(err.is_invalid_callable());
}

#[test]
fn test_current_route() {
    let (mut router, trap) = router();
    router
        .get("/", |r: MatchedRoute| {
            [
                r.name().unwrap_or_default().to_string(),
                r.path().to_string(),
                r.uri().to_string(),
                serde_json::to_string(r.parameters()).unwrap_or_default(),
                r.method().to_string(),
                r.middleware_count().to_string(),
                r.domain().unwrap_or("-").to_string(),
            ]
            .join(",")
        })
        .name("home");
    router.dispatch(home_request()).unwrap();

    assert_eq!(trap.output(), "home,/,/,{},GET,0,-");
}

#[test]
fn test_route_parameters_and_reverse_routing() {
    let (mut router, trap) = router();
    router
        .get("/posts/{post}/comments/{comment}", |r: MatchedRoute| {
            format!(
                "{}:{}",
                r.parameter("post").unwrap_or_default(),
                r.parameter("comment").unwrap_or_default()
            )
        })
        .name("comment");

    router
        .dispatch(request("GET", "http://example.com/posts/7/comments/3/"))
        .unwrap();
    assert_eq!(trap.output(), "7:3");

    let params = BTreeMap::from([
        ("post".to_string(), "1".to_string()),
        ("comment".to_string(), "2".to_string()),
    ]);
    assert_eq!(
        router.url("comment", &params).unwrap(),
        "/posts/1/comments/2"
    );
}

#[test]
fn test_first_registered_route_wins() {
    let (mut router, trap) = router();
    router.get("/users/{id}", || "first");
    router.get("/users/{id}", || "second");

    router.dispatch(request("GET", "/users/1")).unwrap();
    assert_eq!(trap.output(), "first");
}

#[test]
fn test_domain_routes() {
    let (mut router, trap) = router();
    router.get("/", || "api").domain("api.example.com");
    router.get("/", || "site");

    router.dispatch(request("GET", "http://API.example.com/")).unwrap();
    assert_eq!(trap.output(), "api");

    router.dispatch(home_request()).unwrap();
    assert_eq!(trap.output(), "site");

    let by_header = Arc::new(
        http::Request::builder()
            .uri("/")
            .header("host", "api.example.com:8080")
            .body(())
            .unwrap(),
    );
    router.dispatch(by_header).unwrap();
    assert_eq!(trap.output(), "api");
}

#[test]
fn test_handler_error_reaches_caller() {
    let (mut router, trap) = router();
    router.get("/", || -> Result<String, std::io::Error> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"))
    });

    let err = router.dispatch(home_request()).unwrap_err();
    let inner = err.into_handler_error().unwrap();
    let io = inner.downcast::<std::io::Error>().unwrap();
    assert_eq!(io.kind(), std::io::ErrorKind::PermissionDenied);
    assert!(trap.last().is_none());
}

#[test]
fn test_router_is_shareable_across_threads() {
    let (mut router, trap) = router();
    router.get("/users/{id}", |r: MatchedRoute| {
        r.parameter("id").unwrap_or_default().to_string()
    });
    let router = Arc::new(router);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let router = Arc::clone(&router);
            std::thread::spawn(move || {
                router
                    .handle(request("GET", &format!("/users/{i}")))
                    .unwrap()
                    .to_string()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), i.to_string());
    }
    assert!(trap.last().is_none());
}
