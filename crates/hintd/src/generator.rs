//! Generative hint client for the Gemini `generateContent` API.
//!
//! Builds a fixed-template prompt, sends one request with fixed sampling and
//! safety settings, and extracts the generated text. Does not touch the
//! store; persisting results is the resolver's job.

use async_trait::async_trait;
use hint_common::{GenerationConfig, GenerationFailure};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, info};

/// Interface to any remote text-generation backend.
#[async_trait]
pub trait HintGenerator: Send + Sync {
    async fn generate(&self, title: &str) -> Result<String, GenerationFailure>;
}

/// Prompt sent for a problem title.
pub fn build_prompt(title: &str) -> String {
    format!(
        r#"You are a coding mentor helping with a LeetCode problem. Give a helpful and concise coding hint for: "{title}"

Guidelines:
- Don't solve the problem directly or provide code
- Suggest the right approach, algorithm, or data structure
- Mention time/space complexity considerations if relevant
- Be encouraging and guide toward the solution
- Keep response under 150 words
- Focus on the key insight that will help solve the problem

Example good hints:
- "Consider using a hash map to store values you've seen before"
- "Think about the two-pointer technique for this array problem"
- "This looks like a dynamic programming problem - what are the subproblems?"
- "Binary search might help optimize this solution"

Problem: "{title}"
Hint:"#
    )
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: SamplingConfig,
    #[serde(rename = "safetySettings")]
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub stop_sequences: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

impl GenerateRequest {
    pub fn new(title: &str, config: &GenerationConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(title),
                }],
            }],
            generation_config: SamplingConfig {
                temperature: config.temperature,
                top_k: config.top_k,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
                stop_sequences: Vec::new(),
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body.
///
/// A missing, non-string or blank text field is an invalid format.
pub fn extract_hint(body: &Value) -> Result<String, GenerationFailure> {
    let text = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| {
            GenerationFailure::InvalidFormat("missing candidates[0].content.parts[0].text".to_string())
        })?;

    let hint = text.trim();
    if hint.is_empty() {
        return Err(GenerationFailure::InvalidFormat("generated text is empty".to_string()));
    }
    Ok(hint.to_string())
}

// ============================================================================
// Gemini Client
// ============================================================================

pub struct GeminiClient {
    http_client: reqwest::Client,
    config: GenerationConfig,
}

impl GeminiClient {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationFailure> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationFailure::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl HintGenerator for GeminiClient {
    async fn generate(&self, title: &str) -> Result<String, GenerationFailure> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GenerationFailure::MissingApiKey)?;

        info!("Calling generation API for: {}", title);

        let response = self
            .http_client
            .post(self.url())
            .query(&[("key", api_key)])
            .json(&GenerateRequest::new(title, &self.config))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationFailure::Network(format!(
                        "timed out after {} seconds",
                        self.config.timeout_secs
                    ))
                } else {
                    GenerationFailure::Network(e.to_string())
                }
            })?;

        let status = response.status();
        info!("Generation API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Generation API error response: {}", body);
            return Err(GenerationFailure::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GenerationFailure::InvalidFormat(format!("body is not JSON: {}", e)))?;
        debug!("Generation API response body: {}", body);

        let hint = extract_hint(&body)?;
        debug!("Got generated hint ({} chars)", hint.len());
        Ok(hint)
    }
}

// ============================================================================
// Fake Generator (Testing)
// ============================================================================

/// Generator with scripted responses and a call counter
pub struct FakeGenerator {
    responses: Mutex<Vec<Result<String, GenerationFailure>>>,
    call_count: AtomicUsize,
    titles: Mutex<Vec<String>>,
}

impl FakeGenerator {
    /// Scripted responses are consumed in order; the last one repeats.
    pub fn new(responses: Vec<Result<String, GenerationFailure>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: AtomicUsize::new(0),
            titles: Mutex::new(Vec::new()),
        }
    }

    pub fn always_ok(hint: &str) -> Self {
        Self::new(vec![Ok(hint.to_string())])
    }

    pub fn always_error(failure: GenerationFailure) -> Self {
        Self::new(vec![Err(failure)])
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Titles passed to `generate`, in call order
    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HintGenerator for FakeGenerator {
    async fn generate(&self, title: &str) -> Result<String, GenerationFailure> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut titles) = self.titles.lock() {
            titles.push(title.to_string());
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| GenerationFailure::Network("fake generator poisoned".to_string()))?;
        match responses.len() {
            0 => Err(GenerationFailure::InvalidFormat("no scripted response".to_string())),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_embeds_title_and_rules() {
        let prompt = build_prompt("Two Sum");
        assert!(prompt.contains("concise coding hint for: \"Two Sum\""));
        assert!(prompt.contains("Problem: \"Two Sum\""));
        assert!(prompt.contains("Don't solve the problem directly or provide code"));
        assert!(prompt.contains("Keep response under 150 words"));
        assert!(prompt.ends_with("Hint:"));
    }

    #[test]
    fn test_request_shape() {
        let req = GenerateRequest::new("Two Sum", &GenerationConfig::default());
        let value = serde_json::to_value(&req).unwrap();

        assert!(value["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Two Sum"));
        let cfg = &value["generationConfig"];
        assert_eq!(cfg["topK"], 40);
        assert_eq!(cfg["maxOutputTokens"], 200);
        assert!((cfg["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((cfg["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
        assert_eq!(cfg["stopSequences"], json!([]));

        let safety = value["safetySettings"].as_array().unwrap();
        assert_eq!(safety.len(), 4);
        assert!(safety
            .iter()
            .all(|s| s["threshold"] == "BLOCK_MEDIUM_AND_ABOVE"));
        assert_eq!(safety[1]["category"], "HARM_CATEGORY_HATE_SPEECH");
    }

    #[test]
    fn test_extract_trims_text() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "  Use a hash map.\n" }] } }]
        });
        assert_eq!(extract_hint(&body).unwrap(), "Use a hash map.");
    }

    #[test]
    fn test_extract_missing_text_is_invalid_format() {
        for body in [
            json!({}),
            json!({ "candidates": [] }),
            json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": 42 }] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": "   " }] } }] }),
        ] {
            assert!(
                matches!(extract_hint(&body), Err(GenerationFailure::InvalidFormat(_))),
                "{}",
                body
            );
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = GeminiClient::new(GenerationConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            ..GenerationConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.generate("Two Sum").await,
            Err(GenerationFailure::MissingApiKey)
        );
    }

    #[tokio::test]
    async fn test_fake_generator_sequence() {
        let fake = FakeGenerator::new(vec![
            Err(GenerationFailure::Network("down".to_string())),
            Ok("second".to_string()),
        ]);
        assert!(fake.generate("a").await.is_err());
        assert_eq!(fake.generate("b").await.unwrap(), "second");
        assert_eq!(fake.generate("c").await.unwrap(), "second");
        assert_eq!(fake.call_count(), 3);
        assert_eq!(fake.titles(), vec!["a", "b", "c"]);
    }
}
