use axum::{Json, extract::State};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, error};

use super::error::ApiError;
use super::state::AppState;
use super::types::{
    HealthResponse, ModelInfo, PredictRequest, PredictResponse, PredictUrlRequest,
};
use crate::fetch::fetch_article;
use crate::summary::DEFAULT_MAX_WORDS;

/// Minimum request text length, in characters.
const MIN_TEXT_CHARS: usize = 20;

#[tracing::instrument]
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}

#[tracing::instrument(skip(state))]
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    let classifier = state.pipeline.classifier();
    let mode = if classifier.is_stub() { "stub" } else { "real" };
    Json(ModelInfo {
        model_name: state.model_name.clone(),
        labels: classifier.labels().names().to_vec(),
        temperature: classifier.temperature(),
        mode: mode.to_string(),
    })
}

#[tracing::instrument(skip(state, request))]
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    if request.text.chars().count() < MIN_TEXT_CHARS {
        return Err(ApiError::InvalidRequest(
            "`text` must be at least 20 characters.".to_string(),
        ));
    }

    let summary = state.summarizer.summarize(&request.text, DEFAULT_MAX_WORDS).await;
    let classification = run_prediction(
        &state,
        request.title.clone(),
        request.text.clone(),
        request.use_shap,
    )
    .await?;

    Ok(Json(PredictResponse::from_classification(
        summary,
        classification,
        None,
    )))
}

#[tracing::instrument(skip(state))]
pub async fn predict_url(
    State(state): State<AppState>,
    Json(request): Json<PredictUrlRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let article = fetch_article(&state.http_client, &request.url)
        .await
        .map_err(|e| ApiError::FetchFailed(e.to_string()))?;

    let text = clip_chars(&article.text, state.max_fetch_chars).to_string();
    if text.chars().count() < MIN_TEXT_CHARS {
        return Err(ApiError::InvalidRequest(
            "Extracted text too short.".to_string(),
        ));
    }

    debug!(
        url = %article.url,
        source = %article.source,
        chars = text.len(),
        "article extracted"
    );

    let summary = state.summarizer.summarize(&text, DEFAULT_MAX_WORDS).await;
    let title = if article.title.is_empty() {
        None
    } else {
        Some(article.title.clone())
    };
    let classification = run_prediction(&state, title, text, false).await?;

    let source_prior = state.priors.lookup(&article.source);

    Ok(Json(PredictResponse::from_classification(
        summary,
        classification,
        source_prior,
    )))
}

#[tracing::instrument(skip(state, requests))]
pub async fn batch_predict(
    State(state): State<AppState>,
    Json(requests): Json<Vec<PredictRequest>>,
) -> Result<Json<Vec<PredictResponse>>, ApiError> {
    let mut responses = Vec::with_capacity(requests.len());
    for request in requests {
        let summary = state.summarizer.summarize(&request.text, DEFAULT_MAX_WORDS).await;
        let classification =
            run_prediction(&state, request.title, request.text, request.use_shap).await?;
        responses.push(PredictResponse::from_classification(
            summary,
            classification,
            None,
        ));
    }
    Ok(Json(responses))
}

/// Runs the CPU-bound pipeline off the async runtime.
async fn run_prediction(
    state: &AppState,
    title: Option<String>,
    text: String,
    use_attribution: bool,
) -> Result<crate::classifier::Classification, ApiError> {
    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || {
        pipeline.predict(title.as_deref(), &text, use_attribution)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("prediction task failed: {}", e)))?;

    result.map_err(|e| {
        error!(error = %e, "classification error");
        ApiError::ClassifierFailed(e.to_string())
    })
}

fn clip_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
