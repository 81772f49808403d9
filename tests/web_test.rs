mod common;

use hamlet_oracle::web::handle;
use tiny_http::Method;

use common::rigged_context;

#[test]
fn test_get_root_renders_form() {
    let ctx = rigged_context(4);
    let reply = handle(&ctx, &Method::Get, "/", "");

    assert_eq!(reply.status, 200);
    assert!(reply.content_type.starts_with("text/html"));
    assert!(reply.body.contains("The Hamlet Oracle"));
    assert!(reply.body.contains("Predict Next Word"));
}

#[test]
fn test_example_button_fills_text_without_predicting() {
    let ctx = rigged_context(4);
    let reply = handle(&ctx, &Method::Post, "/", "text=&example=By+Heaven+I+charge+thee");

    assert_eq!(reply.status, 200);
    assert!(reply.body.contains(r#"name="text" value="By Heaven I charge thee""#));
    assert!(!reply.body.contains("Next word:"));
}

#[test]
fn test_predict_shows_word() {
    let ctx = rigged_context(4);
    let reply = handle(&ctx, &Method::Post, "/", "text=the+king+is&action=predict");

    assert_eq!(reply.status, 200);
    assert!(reply.body.contains("Next word: <strong>dead</strong>"));
    assert!(reply.body.contains(r#"value="the king is""#));
}

#[test]
fn test_predict_empty_warns() {
    let ctx = rigged_context(4);
    let reply = handle(&ctx, &Method::Post, "/", "text=++&action=predict");

    assert!(reply.body.contains("banner warning"));
    assert!(reply.body.contains("Please enter a phrase or click an example!"));
}

#[test]
fn test_predict_confused() {
    let ctx = rigged_context(0);
    let reply = handle(&ctx, &Method::Post, "/", "text=the&action=predict");

    assert!(reply.body.contains("banner error"));
    assert!(reply.body.contains("The oracle is confused"));
}

#[test]
fn test_api_predict() {
    let ctx = rigged_context(4);
    let reply = handle(&ctx, &Method::Post, "/api/predict", r#"{"text": "the king is", "top_k": 2}"#);

    assert_eq!(reply.status, 200);
    assert_eq!(reply.content_type, "application/json");
    let json: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(json["outcome"], "predicted");
    assert_eq!(json["word"], "dead");
    assert_eq!(json["window"], serde_json::json!([1, 2, 3]));
    assert_eq!(json["candidates"].as_array().unwrap().len(), 2);
}

#[test]
fn test_api_empty_and_confused() {
    let ctx = rigged_context(0);

    let json: serde_json::Value =
        serde_json::from_str(&handle(&ctx, &Method::Post, "/api/predict", r#"{"text": ""}"#).body).unwrap();
    assert_eq!(json["outcome"], "empty_input");
    assert!(json.get("window").is_none());

    let json: serde_json::Value =
        serde_json::from_str(&handle(&ctx, &Method::Post, "/api/predict", r#"{"text": "the"}"#).body).unwrap();
    assert_eq!(json["outcome"], "confused");
    assert_eq!(json["window"], serde_json::json!([0, 0, 1]));
}

#[test]
fn test_api_bad_json() {
    let ctx = rigged_context(4);
    let reply = handle(&ctx, &Method::Post, "/api/predict", "text=the");
    assert_eq!(reply.status, 400);
}

#[test]
fn test_health_and_unknown_routes() {
    let ctx = rigged_context(4);

    let health = handle(&ctx, &Method::Get, "/health?verbose=1", "");
    assert_eq!(health.status, 200);
    let json: serde_json::Value = serde_json::from_str(&health.body).unwrap();
    assert_eq!(json["window_len"], 3);
    assert_eq!(json["vocab_size"], 4);

    assert_eq!(handle(&ctx, &Method::Get, "/missing", "").status, 404);
    assert_eq!(handle(&ctx, &Method::Delete, "/", "").status, 405);
    assert_eq!(handle(&ctx, &Method::Get, "/api/predict", "").status, 405);
}
