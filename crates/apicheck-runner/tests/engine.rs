//! End-to-end engine tests against a local HTTP fixture server.

use std::collections::HashMap;

use serde_json::{Value, json};

use apicheck_core::{Config, FailureKind};
use apicheck_runner::{HttpRequest, Method, ResponseBody, Runner, TestCase};

/// Spawn a fixture server; the handler runs for every incoming request on a
/// detached thread for the rest of the test process.
fn spawn_server<F>(handler: F) -> String
where
    F: Fn(tiny_http::Request) + Send + 'static,
{
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            handler(request);
        }
    });
    format!("http://{addr}")
}

fn json_response(value: Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let header =
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
    tiny_http::Response::from_data(value.to_string().into_bytes()).with_header(header)
}

fn config_for(base_url: &str) -> Config {
    Config {
        base_url: Some(base_url.to_string()),
        ..Config::default()
    }
}

#[test]
fn results_preserve_order_and_isolation() {
    let base = spawn_server(|request| {
        let _ = request.respond(json_response(json!({"ok": true})));
    });

    let mut runner = Runner::new(&config_for(&base)).unwrap();
    let tests = vec![
        TestCase::new("fails", |ctx| {
            let response = ctx.get("/anything")?;
            ctx.expect(&response).to_have_status(201)?;
            Ok(())
        }),
        TestCase::new("passes", |ctx| {
            let response = ctx.get("/anything")?;
            ctx.expect(&response).to_have_status(200)?;
            Ok(())
        }),
    ];

    let results = runner.run_tests(&tests, "isolation");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "fails");
    assert!(!results[0].passed);
    assert_eq!(results[1].name, "passes");
    assert!(results[1].passed);
}

#[test]
fn failed_test_carries_last_response() {
    let base = spawn_server(|request| {
        let _ = request.respond(json_response(json!({"detail": "context"})));
    });

    let mut runner = Runner::new(&config_for(&base)).unwrap();
    let tests = vec![TestCase::new("fails after request", |ctx| {
        ctx.get("/thing")?;
        ctx.expect(1).to_be(2)?;
        Ok(())
    })];

    let results = runner.run_tests(&tests, "last-response");
    let response = results[0].response.as_ref().unwrap();
    assert_eq!(response.body.as_value(), json!({"detail": "context"}));
}

#[test]
fn request_header_overrides_config_header_on_the_wire() {
    // Echo request headers back as a JSON object of lowercased names.
    let base = spawn_server(|request| {
        let headers: HashMap<String, String> = request
            .headers()
            .iter()
            .map(|h| {
                (
                    h.field.as_str().as_str().to_ascii_lowercase(),
                    h.value.as_str().to_string(),
                )
            })
            .collect();
        let _ = request.respond(json_response(serde_json::to_value(headers).unwrap()));
    });

    let config = Config {
        base_url: Some(base),
        headers: HashMap::from([("X-A".to_string(), "1".to_string())]),
        ..Config::default()
    };
    let mut runner = Runner::new(&config).unwrap();

    let tests = vec![TestCase::new("merge", |ctx| {
        let request = HttpRequest::new(Method::GET, "/echo").with_header("X-A", "2");
        let response = ctx.send(request)?;
        ctx.expect(response.body.as_value().get("x-a")).to_be("2")?;
        ctx.expect(response.body.as_value().get("content-type"))
            .to_be("application/json")?;
        Ok(())
    })];

    let results = runner.run_tests(&tests, "header-merge");
    assert!(results[0].passed, "error: {:?}", results[0].error);
}

#[test]
fn query_parameters_are_appended() {
    let base = spawn_server(|request| {
        let url = request.url().to_string();
        let _ = request.respond(json_response(json!({"url": url})));
    });

    let mut runner = Runner::new(&config_for(&base)).unwrap();
    let tests = vec![TestCase::new("query", |ctx| {
        let request = HttpRequest::new(Method::GET, "/search")
            .with_query("q", "ditto")
            .with_query("limit", "5");
        let response = ctx.send(request)?;
        ctx.expect(response.body.as_value().get("url"))
            .to_be("/search?q=ditto&limit=5")?;
        Ok(())
    })];

    assert!(runner.run_tests(&tests, "query")[0].passed);
}

#[test]
fn post_body_is_serialized_as_json() {
    let base = spawn_server(|mut request| {
        let mut body = String::new();
        let _ = request.as_reader().read_to_string(&mut body);
        let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let _ = request.respond(json_response(json!({"received": parsed})));
    });

    let mut runner = Runner::new(&config_for(&base)).unwrap();
    let tests = vec![TestCase::new("post", |ctx| {
        let response = ctx.post("/users", json!({"name": "ditto"}))?;
        ctx.expect(response.body.as_value().get("received"))
            .to_equal(json!({"name": "ditto"}))?;
        Ok(())
    })];

    assert!(runner.run_tests(&tests, "post")[0].passed);
}

#[test]
fn non_json_content_type_is_kept_as_text() {
    let base = spawn_server(|request| {
        let header =
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/plain"[..]).unwrap();
        let _ = request.respond(tiny_http::Response::from_string("plain text").with_header(header));
    });

    let config = config_for(&base);
    let client = apicheck_runner::HttpClient::new(&config).unwrap();
    let response = client.get("/raw").unwrap();

    assert_eq!(response.body, ResponseBody::Text("plain text".into()));
    assert_eq!(response.body.as_json(), None);
}

#[test]
fn unparseable_json_body_is_a_transport_failure() {
    let base = spawn_server(|request| {
        let header =
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
        let _ = request.respond(tiny_http::Response::from_string("{ nope").with_header(header));
    });

    let config = config_for(&base);
    let client = apicheck_runner::HttpClient::new(&config).unwrap();
    let error = client.get("/bad-json").unwrap_err();

    assert_eq!(error.kind(), FailureKind::Transport);
}

#[test]
fn timeout_surfaces_as_transport_failure_with_elapsed_time() {
    let base = spawn_server(|request| {
        std::thread::sleep(std::time::Duration::from_millis(1500));
        let _ = request.respond(json_response(json!({"late": true})));
    });

    let config = Config {
        base_url: Some(base),
        timeout_ms: Some(100),
        ..Config::default()
    };
    let client = apicheck_runner::HttpClient::new(&config).unwrap();
    let error = client.get("/slow").unwrap_err();

    match error {
        apicheck_core::TestError::Transport { duration_ms, .. } => {
            assert!(duration_ms >= 100, "elapsed {duration_ms}ms");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[test]
fn connection_refused_fails_the_test_only() {
    // Port 9 is discard; nothing listens there in the test environment.
    let config = config_for("http://127.0.0.1:9");
    let mut runner = Runner::new(&config).unwrap();

    let tests = vec![
        TestCase::new("unreachable", |ctx| {
            ctx.get("/nope")?;
            Ok(())
        }),
        TestCase::new("still runs", |_| Ok(())),
    ];

    let results = runner.run_tests(&tests, "transport");
    assert!(!results[0].passed);
    assert_eq!(
        results[0].error.as_ref().unwrap().kind(),
        FailureKind::Transport
    );
    assert!(results[1].passed);
}

#[test]
fn status_text_and_duration_are_populated() {
    let base = spawn_server(|request| {
        let _ = request.respond(json_response(json!({})).with_status_code(404));
    });

    let config = config_for(&base);
    let client = apicheck_runner::HttpClient::new(&config).unwrap();
    let response = client.get("/missing").unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.status_text, "Not Found");
}
