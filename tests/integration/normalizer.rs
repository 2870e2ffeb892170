//! Input normalization properties that need no server

use indicoio::input::{infer_batch, normalize, normalize_value, ImageMode};
use indicoio::{Api, Error, ImageInput, Input, ItemShape};
use serde_json::json;

#[test]
fn batch_length_is_preserved_for_every_text_api() {
    let texts: Vec<String> = (0..7).map(|i| format!("text {i}")).collect();
    let input = Input::Batch(texts.clone());
    for api in Api::ALL.into_iter().filter(|a| a.spec().item == ItemShape::Text) {
        let n = normalize(&input, api.spec().item).unwrap();
        assert!(n.batch, "{api}");
        assert_eq!(n.len, texts.len(), "{api}");
        assert_eq!(n.data, json!(texts), "{api}");
    }
}

#[test]
fn every_image_mode_is_uniform_or_rejected() {
    let shape = Api::ImageFeatures.spec().item;
    let urls: Input<ImageInput> = vec!["https://a.com/1.jpg", "http://b.org/2.png"].into();
    assert_eq!(normalize(&urls, shape).unwrap().image_mode, Some(ImageMode::Reference));

    let inline: Input<ImageInput> = vec![
        ImageInput::Bytes(vec![1, 2, 3]),
        ImageInput::from_string("aGVsbG8="),
    ]
    .into();
    assert_eq!(normalize(&inline, shape).unwrap().image_mode, Some(ImageMode::Content));

    let mixed: Input<ImageInput> = vec![
        ImageInput::Bytes(vec![1, 2, 3]),
        ImageInput::url("https://a.com/1.jpg"),
    ]
    .into();
    assert!(matches!(normalize(&mixed, shape), Err(Error::Validation { .. })));
}

#[test]
fn face_endpoints_check_pixel_count() {
    let shape = Api::Fer.spec().item;
    let good = vec![0.5; 48 * 48];
    assert!(normalize(&Input::Single(ImageInput::Pixels(good)), shape).is_ok());

    let bad = vec![0.5; 10];
    assert!(matches!(
        normalize(&Input::Single(ImageInput::Pixels(bad)), shape),
        Err(Error::Validation { .. })
    ));
}

#[test]
fn untyped_json_batch_inference() {
    let text = Api::Sentiment.spec().item;
    assert!(!infer_batch(&json!("one"), text).unwrap());
    assert!(infer_batch(&json!(["one", "two"]), text).unwrap());
    assert!(infer_batch(&json!([]), text).unwrap());

    let labeled = Api::AddData.spec().item;
    assert!(!infer_batch(&json!(["text", "label"]), labeled).unwrap());
    assert!(infer_batch(&json!([["text", "label"]]), labeled).unwrap());

    assert!(normalize_value(&json!(null), Api::Collections.spec().item)
        .unwrap()
        .is_none());
}
