//! Google Gemini advisory oracle.
//!
//! Calls the Gemini `generateContent` API with a structured-output schema
//! and validates the answer into an [`AdvisoryResult`]. Auth is via an API
//! key passed as a query parameter (`key={api_key}`).

use std::time::{Duration, Instant};

use serde_json::Value;

use cs_domain::config::AdvisorConfig;
use cs_domain::error::{Error, Result};
use cs_domain::trace::TraceEvent;
use cs_domain::{AdvisoryResult, AdvisoryStatus, LoadSummary};

use crate::prompt::build_prompt;
use crate::traits::AdvisoryOracle;
use crate::util::{from_reqwest, redact_url_key, resolve_api_key};

const PROVIDER_ID: &str = "google";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An advisory oracle backed by the Google Gemini API.
pub struct GeminiOracle {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiOracle {
    /// Create an oracle from the advisor config, resolving the API key.
    pub fn from_config(cfg: &AdvisorConfig) -> Result<Self> {
        let api_key = resolve_api_key(&cfg.auth)?;
        Self::new(&cfg.base_url, &cfg.model, api_key, cfg.timeout_ms)
    }

    /// Create an oracle with an explicit key. `timeout_ms == 0` leaves the
    /// HTTP client unbounded.
    pub fn new(base_url: &str, model: &str, api_key: String, timeout_ms: u64) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build().map_err(from_reqwest)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    async fn call(&self, summary: &LoadSummary) -> Result<AdvisoryResult> {
        let url = self.generate_url();
        let body = build_body(summary);

        tracing::debug!(provider = PROVIDER_ID, url = %redact_url_key(&url), "gemini advisory request");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Provider {
                provider: PROVIDER_ID.into(),
                message: format!("HTTP {} - {}", status.as_u16(), resp_text),
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        parse_gemini_response(&resp_json)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request serialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Structured-output schema the model must answer with.
fn response_schema() -> Value {
    let statuses: Vec<&str> = AdvisoryStatus::ALL.iter().map(|s| s.as_str()).collect();
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "status": {
                "type": "STRING",
                "enum": statuses,
                "description": "safe if < 70%, warning if 70-95%, danger if > 95%",
            },
            "message": { "type": "STRING" },
            "tips": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
            },
        },
        "required": ["status", "message", "tips"],
    })
}

fn build_body(summary: &LoadSummary) -> Value {
    serde_json::json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": build_prompt(summary) }],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        },
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_gemini_response(body: &Value) -> Result<AdvisoryResult> {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: PROVIDER_ID.into(),
            message: "no candidates in response".into(),
        })?;

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|v| v.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::InvalidAdvice("empty answer".into()));
    }

    parse_advice(&text)
}

/// Validate the model's JSON answer against the advisory shape.
pub fn parse_advice(text: &str) -> Result<AdvisoryResult> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::InvalidAdvice(format!("answer is not JSON: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| Error::InvalidAdvice("answer is not an object".into()))?;

    let status = match obj.get("status").and_then(|v| v.as_str()) {
        Some(raw) => AdvisoryStatus::ALL
            .into_iter()
            .find(|s| s.as_str() == raw)
            .ok_or_else(|| Error::InvalidAdvice(format!("unknown status '{raw}'")))?,
        None => return Err(Error::InvalidAdvice("missing string field 'status'".into())),
    };

    let message = obj
        .get("message")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::InvalidAdvice("missing string field 'message'".into()))?
        .to_string();

    let tips = obj
        .get("tips")
        .and_then(|v| v.as_array())
        .ok_or_else(|| Error::InvalidAdvice("missing array field 'tips'".into()))?
        .iter()
        .map(|tip| {
            tip.as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::InvalidAdvice("non-string entry in 'tips'".into()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AdvisoryResult {
        status,
        message,
        tips,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl AdvisoryOracle for GeminiOracle {
    async fn request_judgment(&self, summary: &LoadSummary) -> Result<AdvisoryResult> {
        let started = Instant::now();
        let result = self.call(summary).await;

        TraceEvent::OracleRequest {
            provider: PROVIDER_ID.into(),
            model: self.model.clone(),
            duration_ms: started.elapsed().as_millis() as u64,
            ok: result.is_ok(),
        }
        .emit();
        if let Err(ref e) = result {
            tracing::warn!(provider = PROVIDER_ID, error = %e, "advisory request failed");
        }

        result
    }

    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }
}
