//! Neutral article summaries.
//!
//! Two paths: an LLM call through the OpenAI chat-completions API when
//! enabled and a key is configured, and an extractive fallback (leading
//! sentences up to a word budget). Any LLM failure falls back to the
//! extractive path; summarization never fails a request.

mod error;


pub use error::SummaryError;

use std::sync::LazyLock;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use regex::Regex;
use tracing::{debug, warn};

/// Input clip applied before either path, to keep latency and cost bounded.
const MAX_INPUT_CHARS: usize = 12_000;

/// Target summary length.
pub const DEFAULT_MAX_WORDS: usize = 100;

const SYSTEM_PROMPT: &str = "You are a neutral news assistant. Write a concise, faithful \
     summary in third person. Avoid opinionated adjectives, speculation, or instructions; \
     no bullet points unless asked. Include who/what/when/where, and key context if \
     essential. Keep it objective.";

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence pattern compiles"));

#[derive(Debug, Clone)]
/// Configuration for [`Summarizer`].
pub struct SummaryConfig {
    /// Enables the LLM path.
    pub enabled: bool,
    /// Chat-completions model name.
    pub model: String,
    /// API key; without one the LLM path stays off.
    pub api_key: Option<String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "gpt-4o-mini".to_string(),
            api_key: None,
        }
    }
}

struct LlmBackend {
    client: Client<OpenAIConfig>,
    model: String,
}

/// Article summarizer (LLM-backed with an extractive fallback).
pub struct Summarizer {
    backend: Option<LlmBackend>,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("llm", &self.backend.as_ref().map(|b| b.model.as_str()))
            .finish()
    }
}

impl Summarizer {
    pub fn new(config: SummaryConfig) -> Self {
        let backend = match (&config.api_key, config.enabled) {
            (Some(key), true) if !key.is_empty() => Some(LlmBackend {
                client: Client::with_config(OpenAIConfig::new().with_api_key(key.clone())),
                model: config.model.clone(),
            }),
            _ => None,
        };
        if backend.is_none() {
            debug!("LLM summaries disabled, using extractive fallback only");
        }
        Self { backend }
    }

    /// A summarizer that only uses the extractive path.
    pub fn extractive_only() -> Self {
        Self { backend: None }
    }

    /// Returns `true` if the LLM path is configured.
    pub fn has_llm(&self) -> bool {
        self.backend.is_some()
    }

    /// Summarizes `text` in roughly `max_words` words.
    ///
    /// Empty input yields an empty summary; LLM failures are logged and
    /// answered by the extractive fallback.
    pub async fn summarize(&self, text: &str, max_words: usize) -> String {
        let text = text.trim();
        if text.is_empty() {
            return String::new();
        }

        if let Some(backend) = &self.backend {
            match summarize_llm(backend, text, max_words).await {
                Ok(summary) => return summary,
                Err(e) => warn!(error = %e, "LLM summary failed, using extractive fallback"),
            }
        }

        extractive_summary(text, max_words)
    }
}

async fn summarize_llm(
    backend: &LlmBackend,
    text: &str,
    max_words: usize,
) -> Result<String, SummaryError> {
    let article = clip_chars(text, MAX_INPUT_CHARS);
    let user_prompt = format!(
        "Summarize the following article in ~{} words.\n\n--- ARTICLE START ---\n{}\n--- ARTICLE END ---",
        max_words, article
    );

    let request = CreateChatCompletionRequestArgs::default()
        .model(&backend.model)
        .temperature(0.2)
        .max_tokens(300u32)
        .messages([
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()?,
            ),
        ])
        .build()?;

    let response = backend.client.chat().create(request).await?;
    let summary = response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .map(str::trim)
        .unwrap_or_default();

    if summary.is_empty() {
        return Err(SummaryError::EmptyResponse);
    }
    Ok(summary.to_string())
}

/// Leading sentences until roughly `max_words` words.
pub fn extractive_summary(text: &str, max_words: usize) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let collapsed = WHITESPACE_RE.replace_all(text, " ");
    let clipped = clip_chars(&collapsed, MAX_INPUT_CHARS);

    let mut out: Vec<&str> = Vec::new();
    let mut word_count = 0usize;
    for sentence in split_sentences(clipped) {
        if sentence.is_empty() {
            continue;
        }
        word_count += sentence.split_whitespace().count();
        out.push(sentence);
        if word_count >= max_words {
            break;
        }
    }
    out.join(" ").trim().to_string()
}

/// Sentence boundaries: terminal punctuation followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for m in SENTENCE_END_RE.find_iter(text) {
        let end = m.start() + 1;
        sentences.push(text[last..end].trim());
        last = m.end();
    }
    if last < text.len() {
        sentences.push(text[last..].trim());
    }
    sentences
}

/// Clips to at most `limit` characters on a char boundary.
fn clip_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
