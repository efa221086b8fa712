//! Integration tests for the echo responder over a live listener.

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn get_returns_diagnostic_document() {
    let addr = common::start_echo_server().await;

    let res = common::client()
        .get(format!("http://{}/some/path?b=2&a=1", addr))
        .header("X-Probe", "alpha")
        .send()
        .await
        .expect("Echo server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json"
    );

    let doc: Value = res.json().await.unwrap();
    assert_eq!(doc["statusBody"], "Healthy");
    assert_eq!(doc["statusCode"], 200);
    assert_eq!(
        doc["statusReason"],
        format!("Incoming request was on port {}", addr.port())
    );
    assert_eq!(doc["hostname"], addr.to_string());
    assert_eq!(doc["uri"]["method"], "GET");
    assert_eq!(doc["uri"]["scheme"], "http");
    assert_eq!(doc["uri"]["httpVersion"], "HTTP/1.1");
    assert_eq!(doc["uri"]["fullPath"], "/some/path");
    assert_eq!(doc["uri"]["queryString"], "a=1&b=2");
    assert_eq!(doc["network"]["serverAddress"], addr.to_string());
    assert_eq!(doc["network"]["serverPort"], addr.port().to_string());
    assert_eq!(doc["requestHeaders"]["X-Probe"], "alpha");
    assert_eq!(doc["ssl"], json!({}));
    assert_eq!(doc["body"], json!({}));
    assert_eq!(doc["session"]["cookie"], json!([]));

    // The client port is whatever the OS picked, but it must be a real
    // port parsed from the peer address.
    let client_port = doc["network"]["clientPort"].as_str().unwrap();
    assert!(client_port.parse::<u16>().is_ok());
    assert!(doc["network"]["clientAddress"]
        .as_str()
        .unwrap()
        .ends_with(&format!(":{}", client_port)));
}

#[tokio::test]
async fn post_echoes_json_body_and_defaults_to_201() {
    let addr = common::start_echo_server().await;
    let body = json!({"alpha": 1, "nested": {"flag": true}});

    let res = common::client()
        .post(format!("http://{}/", addr))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 201);
    let doc: Value = res.json().await.unwrap();
    assert_eq!(doc["body"], body);
    assert_eq!(doc["uri"]["method"], "POST");
    // The document's own statusCode stays 200 regardless of transport
    // status.
    assert_eq!(doc["statusCode"], 200);
}

#[tokio::test]
async fn delete_defaults_to_204() {
    let addr = common::start_echo_server().await;

    let res = common::client()
        .delete(format!("http://{}/resource/7", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 204);
}

#[tokio::test]
async fn requested_status_header_wins_over_method_default() {
    let addr = common::start_echo_server().await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/", addr))
        .header("X-Requested-Status", "503")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);

    let res = client
        .post(format!("http://{}/", addr))
        .header("X-Requested-Status", "418")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 418);
}

#[tokio::test]
async fn unparseable_requested_status_falls_back_to_method_default() {
    let addr = common::start_echo_server().await;

    let res = common::client()
        .post(format!("http://{}/", addr))
        .header("X-Requested-Status", "teapot")
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 201);
}

#[tokio::test]
async fn malformed_json_body_yields_empty_body_mapping() {
    let addr = common::start_echo_server().await;

    let res = common::client()
        .post(format!("http://{}/", addr))
        .body("{not json at all")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 201);
    let doc: Value = res.json().await.unwrap();
    assert_eq!(doc["body"], json!({}));
}

#[tokio::test]
async fn empty_body_yields_empty_body_mapping() {
    let addr = common::start_echo_server().await;

    let res = common::client()
        .post(format!("http://{}/", addr))
        .send()
        .await
        .unwrap();

    let doc: Value = res.json().await.unwrap();
    assert_eq!(doc["body"], json!({}));
}

#[tokio::test]
async fn request_headers_are_mirrored_onto_the_response() {
    let addr = common::start_echo_server().await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .header("X-Probe", "alpha")
        .header("X-Trace-Token", "t-123")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers().get("x-probe").unwrap(), "alpha");
    assert_eq!(res.headers().get("x-trace-token").unwrap(), "t-123");
}

#[tokio::test]
async fn mirrored_content_type_never_overrides_json() {
    let addr = common::start_echo_server().await;

    let res = common::client()
        .post(format!("http://{}/", addr))
        .header("Content-Type", "text/plain")
        .body("ignored")
        .send()
        .await
        .unwrap();

    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json"
    );

    // The body is still parseable as the diagnostic document.
    let doc: Value = res.json().await.unwrap();
    assert_eq!(doc["requestHeaders"]["Content-Type"], "text/plain");
}

#[tokio::test]
async fn duplicate_request_headers_collapse_to_last_value() {
    let addr = common::start_echo_server().await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .header("X-Multi", "one")
        .header("X-Multi", "two")
        .send()
        .await
        .unwrap();

    let doc: Value = res.json().await.unwrap();
    assert_eq!(doc["requestHeaders"]["X-Multi"], "two");
}

#[tokio::test]
async fn cookies_are_parsed_into_the_session() {
    let addr = common::start_echo_server().await;

    let res = common::client()
        .get(format!("http://{}/", addr))
        .header("Cookie", "foo=bar; session=abc123")
        .send()
        .await
        .unwrap();

    let doc: Value = res.json().await.unwrap();
    assert_eq!(
        doc["session"]["cookie"],
        json!([
            {"name": "foo", "value": "bar"},
            {"name": "session", "value": "abc123"}
        ])
    );
}
