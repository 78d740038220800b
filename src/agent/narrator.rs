//! LLM narration of computed facts.
//!
//! One chat call to an Ollama endpoint turns the question, detected intent,
//! date window, and facts JSON into prose. Any failure surfaces as an error
//! the caller answers with the templated fallback summary instead.

use crate::intent::Intent;
use crate::models::Facts;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the narrator.
#[derive(Debug, Clone)]
pub struct NarratorConfig {
    pub ollama_url: String,
    pub model_name: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model_name: "llama3.2:latest".to_string(),
            temperature: 0.1,
            timeout_seconds: 120,
        }
    }
}

/// Message in the chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat API response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// The fact narrator.
pub struct Narrator {
    config: NarratorConfig,
    http_client: reqwest::Client,
}

impl Narrator {
    pub fn new(config: NarratorConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Turn computed facts into a natural-language answer.
    pub async fn narrate(
        &self,
        query: &str,
        intent: Intent,
        facts: &Facts,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<String> {
        let prompt = build_prompt(query, intent, facts, range)?;
        debug!("Narration prompt is {} bytes", prompt.len());

        let url = format!("{}/api/chat", self.config.ollama_url);
        let request = OllamaChatRequest {
            model: self.config.model_name.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: NARRATOR_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("Request timed out after {}s", self.config.timeout_seconds)
                } else if e.is_connect() {
                    anyhow::anyhow!("Cannot connect to Ollama at {}", self.config.ollama_url)
                } else {
                    anyhow::anyhow!("Failed to send request: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Ollama API error {}: {}", status, body));
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        let answer = chat_response.message.content.trim().to_string();
        if answer.is_empty() {
            return Err(anyhow::anyhow!("Empty LLM response"));
        }

        info!("Narration complete ({} bytes)", answer.len());
        Ok(answer)
    }
}

/// Readable description of the queried window for prompts and reports.
pub fn describe_range(range: Option<(NaiveDate, NaiveDate)>) -> String {
    match range {
        Some((start, end)) if start == end => format!("for {}", start.format("%B %d, %Y")),
        Some((start, end)) => format!(
            "from {} to {}",
            start.format("%B %d, %Y"),
            end.format("%B %d, %Y")
        ),
        None => "unspecified".to_string(),
    }
}

fn build_prompt(
    query: &str,
    intent: Intent,
    facts: &Facts,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<String> {
    let facts_json =
        serde_json::to_string_pretty(facts).context("Failed to serialize facts")?;

    Ok(format!(
        r#"Question: "{query}"
Intent: {intent}
Date range: {range}

Facts computed from real sales data:
{facts_json}

Summarize these results clearly in natural language.
Keep it factual and formatted in bullet or numbered lists."#,
        range = describe_range(range),
    ))
}

const NARRATOR_SYSTEM_PROMPT: &str = r#"You are a sales insights assistant.
You are given metrics computed from real point-of-sale data.
Summarize them factually for a store manager. Never invent numbers that
are not present in the facts."#;
