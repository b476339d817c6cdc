use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;
use crate::classifier::BiasClassifier;
use crate::pipeline::Pipeline;
use crate::priors::SourcePriors;
use crate::summary::Summarizer;

fn test_state() -> AppState {
    AppState::new(
        Arc::new(Pipeline::new(Arc::new(BiasClassifier::stub().unwrap()))),
        Arc::new(SourcePriors::empty()),
        Arc::new(Summarizer::extractive_only()),
        reqwest::Client::new(),
        8000,
        "stub".to_string(),
    )
}

fn test_router() -> Router {
    create_router(test_state())
}

async fn send(
    router: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_healthz() {
    let (status, body) = send(test_router(), Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert!(body["time"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_model_info() {
    let (status, body) = send(test_router(), Method::GET, "/model", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labels"], json!(["Left", "Center", "Right"]));
    assert_eq!(body["mode"], json!("stub"));
    assert_eq!(body["temperature"], json!(1.0));
}

#[tokio::test]
async fn test_predict_rejects_short_text() {
    let (status, body) = send(
        test_router(),
        Method::POST,
        "/predict",
        Some(json!({"text": "too short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("20 characters"));
}

#[tokio::test]
async fn test_predict_minimal() {
    let (status, body) = send(
        test_router(),
        Method::POST,
        "/predict",
        Some(json!({"text": "Lawmakers reached a bipartisan deal after talks."})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let label = body["bias"]["label"].as_str().unwrap();
    assert!(["Left", "Center", "Right"].contains(&label));
    assert_eq!(body["bias"]["probs"].as_object().unwrap().len(), 3);
    assert!(body["summary"].as_str().unwrap().contains("bipartisan"));
    assert!(body.get("source_prior").is_none());

    for span in body["explain"]["spans"].as_array().unwrap() {
        assert_eq!(span["source"], json!("keyword"));
        assert_eq!(span["score"], json!(0.15));
    }
}

#[tokio::test]
async fn test_predict_with_attribution() {
    let (status, body) = send(
        test_router(),
        Method::POST,
        "/predict",
        Some(json!({
            "text": "The radical extremist rhetoric fueled a surge in crime.",
            "useShap": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let spans = body["explain"]["spans"].as_array().unwrap();
    assert!(!spans.is_empty());
    for span in spans {
        assert_eq!(span["source"], json!("shap"));
        assert!(span.get("value").is_some());
        assert!(span.get("sign").is_some());
    }
}

#[tokio::test]
async fn test_predict_with_title() {
    let (status, body) = send(
        test_router(),
        Method::POST,
        "/predict",
        Some(json!({
            "title": "Radical agenda advances",
            "text": "Lawmakers debated immigration policy on Tuesday."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // the title participates in scanning, so its cue shows up in spans
    let spans = body["explain"]["spans"].as_array().unwrap();
    assert!(spans.iter().any(|s| s["text"] == json!("Radical")));
}

#[tokio::test]
async fn test_batch_predict_array() {
    let (status, body) = send(
        test_router(),
        Method::POST,
        "/batch_predict",
        Some(json!([
            {"text": "War on business with heavy regulation."},
            {"text": "Bipartisan talks concluded without agreement."}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert!(item["bias"]["confidence"].as_f64().unwrap() <= 1.0);
    }
}

#[tokio::test]
async fn test_predict_url_invalid_url_is_bad_gateway() {
    let (status, body) = send(
        test_router(),
        Method::POST,
        "/predict_url",
        Some(json!({"url": "not a url"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].as_str().unwrap().contains("fetch failed"));
}
