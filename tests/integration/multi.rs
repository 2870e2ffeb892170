//! Multi-API requests

use super::mock_server::MockServerFixture;
use indicoio::{Api, CallOptions, Error, Output};
use mockito::Matcher;
use serde_json::json;

#[test]
fn text_apis_are_combined_in_one_request() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture
        .server
        .mock("POST", "/apis/multiapi/batch")
        .match_query(Matcher::UrlEncoded("apis".into(), "sentiment,language".into()))
        .match_body(Matcher::Json(json!({"data": ["bonjour", "hello"]})))
        .with_status(200)
        .with_body(
            r#"{"results": {
                "sentiment": {"results": [0.7, 0.6]},
                "language": {"results": [{"French": 0.9}, {"English": 0.95}]}
            }}"#,
        )
        .create();

    let out = fixture
        .public_client()
        .predict_text(vec!["bonjour", "hello"], &[Api::Sentiment, Api::Language], &CallOptions::new())
        .unwrap();
    assert_eq!(out["sentiment"], Output::Batch(vec![json!(0.7), json!(0.6)]));
    assert_eq!(out["language"].len(), 2);
    mock.assert();
}

#[test]
fn image_api_in_text_request_is_rejected() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture.json_mock("/apis/multiapi", 200, "{}").expect(0).create();

    let err = fixture
        .public_client()
        .predict_text("hi", &[Api::Sentiment, Api::Fer], &CallOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    mock.assert();
}

#[test]
fn per_api_error_becomes_service_error() {
    let mut fixture = MockServerFixture::new();
    let _mock = fixture.mock_json_response(
        "/apis/multiapi",
        200,
        r#"{"results": {"fer": {"error": "no face found"}, "image_features": {"results": [0.1]}}}"#,
    );

    let err = fixture
        .public_client()
        .predict_image("http://a.com/face.png", &[Api::Fer, Api::ImageFeatures], &CallOptions::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "Service error: HTTP 200: fer: no face found");
}
