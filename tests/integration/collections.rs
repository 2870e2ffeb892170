//! Collection lifecycle against a mock private cloud

use super::mock_server::MockServerFixture;
use indicoio::{CallOptions, Error, ImageInput, Item, LabeledExample, Output};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

#[test]
fn add_train_predict_round() {
    let mut fixture = MockServerFixture::new();
    let add = fixture
        .server
        .mock("POST", "/custom/batch/add_data")
        .match_body(Matcher::Json(json!({
            "collection": "tags",
            "data": [["great product", "positive"], ["broke in a day", "negative"]]
        })))
        .with_status(200)
        .with_body(r#"{"results": "ok"}"#)
        .create();
    let train = fixture
        .server
        .mock("POST", "/custom/train")
        .match_body(Matcher::Json(json!({"collection": "tags", "data": "tags"})))
        .with_status(200)
        .with_body(r#"{"results": {"tags": {"status": "training"}}}"#)
        .create();
    let predict = fixture
        .server
        .mock("POST", "/custom/batch")
        .match_body(Matcher::Json(json!({
            "collection": "tags",
            "data": ["works well", "http://a.com/cat.png"]
        })))
        .with_status(200)
        .with_body(r#"{"results": [{"positive": 0.8}, {"positive": 0.4}]}"#)
        .create();

    let client = fixture.private_client("acme");
    let tags = client.collection("tags");
    let opts = CallOptions::new();

    let added = tags
        .add_data(
            vec![
                LabeledExample::new("great product", "positive"),
                LabeledExample::new("broke in a day", "negative"),
            ],
            &opts,
        )
        .unwrap();
    assert_eq!(added, json!("ok"));

    tags.train(&opts).unwrap();

    let out = tags
        .predict(
            vec![
                Item::from("works well"),
                Item::from(ImageInput::url("http://a.com/cat.png")),
            ],
            &opts,
        )
        .unwrap();
    assert_eq!(out, Output::Batch(vec![json!({"positive": 0.8}), json!({"positive": 0.4})]));

    add.assert();
    train.assert();
    predict.assert();
}

#[test]
fn add_data_works_without_private_cloud() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture.mock_json_response("/custom/add_data", 200, r#"{"results": "ok"}"#);

    fixture
        .public_client()
        .collection("scores")
        .add_data(("some text", 0.75), &CallOptions::new())
        .unwrap();
    mock.assert();
}

#[test]
fn clear_and_remove_example_hit_their_methods() {
    let mut fixture = MockServerFixture::new();
    let clear = fixture.mock_json_response("/custom/clear_collection", 200, r#"{"results": true}"#);
    let remove = fixture
        .server
        .mock("POST", "/custom/remove_example")
        .match_body(Matcher::Json(json!({"collection": "tags", "data": "stale text"})))
        .with_status(200)
        .with_body(r#"{"results": true}"#)
        .create();

    let client = fixture.private_client("acme");
    let tags = client.collection("tags");
    assert_eq!(tags.remove_example("stale text", &CallOptions::new()).unwrap(), json!(true));
    assert_eq!(tags.clear(&CallOptions::new()).unwrap(), json!(true));
    clear.assert();
    remove.assert();
}

#[test]
fn info_and_wait_read_the_collections_listing() {
    let mut fixture = MockServerFixture::new();
    let listing = r#"{"results": {
        "tags": {"input_type": "text", "model_type": "classification", "number_of_samples": 224, "status": "ready"},
        "scores": {"input_type": "text", "model_type": "regression", "number_of_samples": 231, "status": "training"}
    }}"#;
    let mock = fixture.json_mock("/custom/collections", 200, listing).expect(3).create();

    let client = fixture.private_client("acme");
    let opts = CallOptions::new();

    let all = client.collections(&opts).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["scores"].model_type.as_deref(), Some("regression"));

    let info = client.collection("missing").info(&opts).unwrap();
    assert!(info.is_none());

    let ready = client
        .collection("tags")
        .wait(Duration::from_millis(10), Duration::from_secs(1), &opts)
        .unwrap();
    assert_eq!(ready.number_of_samples, Some(224));
    mock.assert();
}

#[test]
fn train_without_cloud_is_rejected_locally() {
    let mut fixture = MockServerFixture::new();
    let mock = fixture.json_mock("/custom/train", 200, "{}").expect(0).create();

    let err = fixture
        .public_client()
        .collection("tags")
        .train(&CallOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    mock.assert();
}

#[test]
fn legacy_train_example_and_labels() {
    let mut fixture = MockServerFixture::new();
    let train = fixture
        .server
        .mock("POST", "/train/batch")
        .match_body(Matcher::Json(json!({"data": [["cheap and fast", "good"]]})))
        .with_status(200)
        .with_body(r#"{"results": "ok"}"#)
        .create();
    let labels = fixture.mock_json_response("/labels", 200, r#"{"results": ["good", "bad"]}"#);

    let client = fixture.private_client("acme");
    client
        .train_example(vec![LabeledExample::new("cheap and fast", "good")], &CallOptions::new())
        .unwrap();
    assert_eq!(client.labels(&CallOptions::new()).unwrap(), json!(["good", "bad"]));
    train.assert();
    labels.assert();
}
