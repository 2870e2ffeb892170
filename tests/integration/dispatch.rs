//! End-to-end dispatch: URL, headers, envelope, errors

use super::mock_server::{LogBuffer, MockServerFixture};
use indicoio::input::normalize;
use indicoio::{Api, CallOptions, Client, EndpointRequest, Error, ImageInput, Input, Output, ServiceConfig};
use mockito::Matcher;
use serde_json::json;
use std::net::TcpListener;

#[test]
fn single_text_unwraps_results() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/sentiment")
        .match_header("content-type", "application/json")
        .match_header("x-apikey", "test-key")
        .match_header("client-lib", "rust")
        .match_header("version-number", env!("CARGO_PKG_VERSION"))
        .match_header("x-request-id", Matcher::Any)
        .match_body(Matcher::Json(json!({"data": "I love this"})))
        .with_status(200)
        .with_body(r#"{"results": 0.5}"#)
        .create();

    let client = fixture.public_client();
    let out = client.sentiment("I love this", &CallOptions::new()).unwrap();
    assert_eq!(out, Output::Single(0.5));
    mock.assert();
}

#[test]
fn batch_uses_batch_path_and_keeps_order() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/sentiment/batch")
        .match_body(Matcher::Json(json!({"data": ["good", "bad", "ok"]})))
        .with_status(200)
        .with_body(r#"{"results": [0.9, 0.1, 0.5]}"#)
        .create();

    let client = fixture.public_client();
    let out = client
        .sentiment(vec!["good", "bad", "ok"], &CallOptions::new())
        .unwrap();
    assert_eq!(out, Output::Batch(vec![0.9, 0.1, 0.5]));
    mock.assert();
}

#[test]
fn params_and_version_are_sent() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/keywords")
        .match_query(Matcher::UrlEncoded("version".into(), "2".into()))
        .match_body(Matcher::Json(json!({"data": "rates rise", "top_n": 2})))
        .with_status(200)
        .with_body(r#"{"results": {"rates": 0.7, "rise": 0.3}}"#)
        .create();

    let client = fixture.public_client();
    let out = client
        .keywords("rates rise", &CallOptions::new().version(2).param("top_n", 2))
        .unwrap()
        .into_single()
        .unwrap();
    assert_eq!(out["rates"], 0.7);
    mock.assert();
}

#[test]
fn repeated_calls_give_equal_results() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .json_mock("/language", 200, r#"{"results": {"English": 0.98}}"#)
        .expect(2)
        .create();

    let client = fixture.public_client();
    let first = client.language("hello there", &CallOptions::new()).unwrap();
    let second = client.language("hello there", &CallOptions::new()).unwrap();
    assert_eq!(first, second);
    mock.assert();
}

#[test]
fn service_error_keeps_status_and_message() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_json_response("/sentiment", 401, r#"{"error": "invalid api key"}"#);

    let client = fixture.public_client();
    match client.sentiment("hi", &CallOptions::new()) {
        Err(Error::Service { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid api key");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[test]
fn html_error_page_is_still_a_service_error() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture
        .server
        .mock("POST", "/political")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html>bad gateway</html>")
        .create();

    let err = fixture
        .public_client()
        .political("hi", &CallOptions::new())
        .unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("bad gateway"));
}

#[test]
fn unexpected_result_shape_is_malformed() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_json_response("/sentiment", 200, r#"{"results": "high"}"#);

    let err = fixture
        .public_client()
        .sentiment("hi", &CallOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { status: 200, .. }));
}

#[test]
fn warning_header_is_logged_and_result_returned() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture
        .server
        .mock("POST", "/sentiment")
        .with_status(200)
        .with_header("x-warning", "model version 1 is deprecated")
        .with_body(r#"{"results": 0.25}"#)
        .create();

    let client = fixture.public_client();
    let logs = LogBuffer::default();
    let out = logs.capture(|| client.sentiment("hi", &CallOptions::new()).unwrap());

    assert_eq!(out, Output::Single(0.25));
    let text = logs.contents();
    assert!(text.contains("WARN"), "logs: {text}");
    assert!(text.contains("model version 1 is deprecated"), "logs: {text}");
}

#[test]
fn warnings_are_exposed_on_raw_dispatch() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture
        .server
        .mock("POST", "/sentiment")
        .with_status(200)
        .with_header("x-warning", "slow down")
        .with_body(r#"{"results": 0.25}"#)
        .create();

    let client = fixture.public_client();
    let normalized = normalize(&Input::<String>::from("hi"), Api::Sentiment.spec().item).unwrap();
    let request = EndpointRequest::new(Api::Sentiment).with_payload(normalized);
    let response = client.dispatch(&request).unwrap();
    assert_eq!(response.warnings, vec!["slow down".to_string()]);
    assert_eq!(response.results, json!(0.25));
}

#[test]
fn image_urls_are_sent_as_references() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/imagefeatures/batch")
        .match_body(Matcher::Json(json!({
            "data": ["http://a.com/1.png", "http://a.com/2.png"]
        })))
        .with_status(200)
        .with_body(r#"{"results": [[0.1, 0.2], [0.3, 0.4]]}"#)
        .create();

    let client = fixture.public_client();
    let out = client
        .image_features(
            vec![
                ImageInput::url("http://a.com/1.png"),
                ImageInput::url("http://a.com/2.png"),
            ],
            &CallOptions::new(),
        )
        .unwrap();
    assert_eq!(out.len(), 2);
    mock.assert();
}

#[test]
fn mixed_image_batch_never_reaches_the_server() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .json_mock("/fer/batch", 200, r#"{"results": []}"#)
        .expect(0)
        .create();

    let err = fixture
        .public_client()
        .fer(vec!["http://a.com/face.png", "aGVsbG8="], &CallOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    mock.assert();
}

#[test]
fn private_endpoint_without_cloud_makes_no_request() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .json_mock("/custom/collections", 200, r#"{"results": {}}"#)
        .expect(0)
        .create();

    let err = fixture
        .public_client()
        .collections(&CallOptions::new())
        .unwrap_err();
    match err {
        Error::Configuration { message, .. } => {
            assert_eq!(message, "Api 'collections' is only available on private cloud")
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
    mock.assert();
}

#[test]
fn per_call_cloud_enables_private_endpoint() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_json_response("/custom/collections", 200, r#"{"results": {}}"#);

    let out = fixture
        .public_client()
        .collections(&CallOptions::new().cloud("acme"))
        .unwrap();
    assert!(out.is_empty());
    mock.assert();
}

#[test]
fn private_cloud_503_names_the_api() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_json_response("/texttags", 503, "{}");

    let err = fixture
        .private_client("acme")
        .text_tags("hi", &CallOptions::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Service error: HTTP 503: Private cloud 'acme' does not include api 'texttags'"
    );
}

#[test]
fn unreachable_host_is_a_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = Client::builder()
        .config(ServiceConfig::default())
        .base_url_override(format!("http://127.0.0.1:{port}"))
        .build()
        .unwrap();

    let err = client.sentiment("hi", &CallOptions::new()).unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    assert!(err.is_retryable());
    assert_eq!(err.status(), None);
}
