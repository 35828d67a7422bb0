//! Gemini API client — the model invoker
//!
//! One external round-trip per call: either a structured-JSON completion
//! validated against a declared output schema, or an image generation call
//! returning a data-URI payload. No retry, batching, or caching lives here;
//! retry is always the caller's decision.
//!
//! Uses a long-lived reqwest::Client for connection pooling.

use crate::error::BucketListError;
use crate::schema::Schema;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

const TEXT_MODEL: &str = "gemini-2.0-flash";
const IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Seam between the flows and the remote backend, so flows and the fan-out
/// orchestrator can be exercised against a mock in tests.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Send a rendered prompt and a declared output schema; return the
    /// parsed, schema-validated JSON object.
    async fn generate_structured(
        &self,
        template_name: &str,
        prompt: &str,
        output: &Schema,
    ) -> Result<Value>;

    /// Generate an image for a rendered prompt; returns a data URI.
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            // Retries bound attempt count, not wall-clock time; the
            // transport deadline is what stops a hung call.
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(BucketListError::Generation(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }
        Ok(format!(
            "{}/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        ))
    }

    async fn post(&self, url: &str, request: &GeminiRequest) -> Result<GeminiResponse> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                BucketListError::Generation(format!("Gemini API error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response: {}", error_text);
            return Err(BucketListError::Generation(format!(
                "Gemini API error: {}",
                error_text
            )));
        }

        response.json::<GeminiResponse>().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            BucketListError::Generation(format!("Gemini parse error: {}", e))
        })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_structured(
        &self,
        template_name: &str,
        prompt: &str,
        output: &Schema,
    ) -> Result<Value> {
        let url = self.endpoint(TEXT_MODEL)?;

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(output.response_schema()),
                response_modalities: None,
            },
        };

        info!(template = template_name, "Calling Gemini API");

        let response = self.post(&url, &request).await?;
        let raw = first_text(&response)?;

        let parsed: Value = serde_json::from_str(strip_fences(&raw)).map_err(|e| {
            BucketListError::Generation(format!(
                "Gemini returned malformed JSON for '{}': {} | raw={}",
                template_name, e, raw
            ))
        })?;

        output.validate(&parsed)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint(IMAGE_MODEL)?;

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                response_mime_type: None,
                response_schema: None,
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            },
        };

        info!("Calling Gemini image API");

        let response = self.post(&url, &request).await?;
        first_inline_image(&response)
    }
}

//
// ================= Wire Types =================
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

//
// ================= Response Extraction =================
//

/// Pull the first text part out of a response.
fn first_text(response: &GeminiResponse) -> Result<String> {
    response
        .candidates
        .first()
        .and_then(|c| c.content.parts.iter().find_map(|p| p.text.clone()))
        .ok_or_else(|| BucketListError::Generation("Empty response from Gemini".to_string()))
}

/// Pull the first inline image out of a response as a data URI. The image
/// model interleaves text and image parts; only the image counts.
fn first_inline_image(response: &GeminiResponse) -> Result<String> {
    response
        .candidates
        .first()
        .and_then(|c| c.content.parts.iter().find_map(|p| p.inline_data.as_ref()))
        .map(|media| format!("data:{};base64,{}", media.mime_type, media.data))
        .ok_or_else(|| {
            BucketListError::Generation(
                "Image generation returned no media payload".to_string(),
            )
        })
}

/// Strip a markdown code fence if the model wrapped its JSON in one.
fn strip_fences(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldKind, STR};

    static TIMING: Schema = Schema {
        name: "timing",
        fields: &[Field {
            name: "bestTime",
            kind: STR,
            required: true,
            describe: "The best time of year to do the activity.",
        }],
    };

    #[test]
    fn test_request_serialization_declares_response_schema() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part::text("Suggest the best time of year")],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(TIMING.response_schema()),
                response_modalities: None,
            },
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("responseSchema"));
        assert!(json.contains("bestTime"));
        assert!(!json.contains("responseModalities"));
    }

    #[test]
    fn test_first_text_from_response() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"bestTime\":\"Spring\"}"}]}}]}"#,
        )
        .unwrap();

        let text = first_text(&response).unwrap();
        let parsed: Value = serde_json::from_str(strip_fences(&text)).unwrap();
        assert_eq!(TIMING.validate(&parsed).unwrap()["bestTime"], "Spring");
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_inline_image_becomes_data_uri() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Here is your image"},
                {"inlineData":{"mimeType":"image/png","data":"aGVsbG8="}}
            ]}}]}"#,
        )
        .unwrap();

        let uri = first_inline_image(&response).unwrap();
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_missing_media_is_a_generation_error() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"no image today"}]}}]}"#,
        )
        .unwrap();

        let err = first_inline_image(&response).unwrap_err();
        assert!(matches!(err, BucketListError::Generation(_)));
    }
}
