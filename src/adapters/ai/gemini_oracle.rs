//! Gemini Oracle - ExtractionOracle implementation over Google's Gemini API.
//!
//! Uses `generateContent` with JSON response mode at temperature 0, so the
//! model acts as a deterministic-ish structured extractor: one call per
//! turn returns candidate slots plus the user-facing reply.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-2.5-flash")
//!     .with_base_url("https://generativelanguage.googleapis.com");
//!
//! let oracle = GeminiOracle::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

use crate::domain::booking::{BookingContext, DomainSpec, SlotValue, SlotValues};
use crate::domain::foundation::{MessageRole, TravelDomain, TurnMessage};
use crate::ports::{ExtractionOracle, OracleError, SlotExtraction};

/// Configuration for the Gemini oracle.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g. "gemini-2.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini-backed extraction oracle.
pub struct GeminiOracle {
    config: GeminiConfig,
    client: Client,
}

impl GeminiOracle {
    /// Creates a new oracle with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::unavailable(format!("HTTP client init failed: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the generateContent endpoint URL.
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Converts turn history to Gemini's content format.
    fn to_contents(history: &[TurnMessage]) -> Vec<GeminiContent> {
        history
            .iter()
            .map(|msg| GeminiContent {
                role: match msg.role {
                    MessageRole::User => "user".to_string(),
                    MessageRole::Assistant => "model".to_string(),
                },
                parts: vec![GeminiPart {
                    text: msg.content.clone(),
                }],
            })
            .collect()
    }

    /// System prompt for the routing classification call.
    fn routing_prompt(previous: Option<TravelDomain>) -> String {
        let current = previous.map(|d| d.label()).unwrap_or("none");
        format!(
            "You are the routing layer of a Smart Travel Companion. \
             Determine whether the user wants to interact with the flight booking \
             service or the hotel booking service. If they are asking a follow-up \
             question, determine which service it applies to. \
             Current active service: {current}. \
             If context switching is detected (e.g. they were doing flights, but now \
             ask about hotels), switch the service. \
             Respond with JSON only: {{\"domain\": \"flight\" | \"hotel\" | null, \
             \"reasoning\": \"...\"}}. Use null when no service can be determined."
        )
    }

    /// System prompt for the slot extraction call.
    fn extraction_prompt(spec: &DomainSpec, context: &BookingContext) -> String {
        let slot_lines: Vec<String> = spec
            .slots
            .iter()
            .map(|slot| {
                format!(
                    "- {} ({}{})",
                    slot.name,
                    slot.description,
                    if slot.numeric { ", number" } else { "" }
                )
            })
            .collect();
        let context_json = serde_json::to_string(context).unwrap_or_else(|_| "{}".to_string());

        format!(
            "You are the {domain} booking agent of a Smart Travel Companion.\n\
             Your current context state: {context_json}\n\n\
             Instructions:\n\
             1. Extract or update these parameters from the conversation:\n{slots}\n\
             2. Context awareness: answer questions about the `results` list if the \
             user asks (e.g. which one is refundable).\n\
             3. Do NOT re-ask for information you already have in the context.\n\
             4. Ask for one missing parameter at a time.\n\
             5. Provide a user-friendly reply guiding the user to the next step.\n\n\
             Respond with JSON only:\n\
             {{\"slots\": {{<name>: <value or null>}}, \
             \"selection_id\": <offering id the user selected, or null>, \
             \"transaction_details\": <booking details the user supplied, or null>, \
             \"reply\": \"<your reply to the user>\"}}",
            domain = spec.domain,
            context_json = context_json,
            slots = slot_lines.join("\n"),
        )
    }

    /// Sends a generateContent request, retrying transient failures with
    /// exponential backoff.
    async fn send_with_retries(
        &self,
        system_prompt: String,
        history: &[TurnMessage],
    ) -> Result<String, OracleError> {
        let mut attempt = 0;
        loop {
            match self.send_request(system_prompt.clone(), history).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    warn!(error = %err, attempt, "transient oracle failure, retrying");
                    tokio::time::sleep(Duration::from_secs(1 << attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Sends a generateContent request.
    async fn send_request(
        &self,
        system_prompt: String,
        history: &[TurnMessage],
    ) -> Result<String, OracleError> {
        let request = GeminiRequest {
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiPart { text: system_prompt }],
            },
            contents: Self::to_contents(history),
            generation_config: GeminiGenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    OracleError::network(format!("Connection failed: {}", e))
                } else {
                    OracleError::network(e.to_string())
                }
            })?;

        let response = self.handle_response_status(response).await?;

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| OracleError::malformed(e.to_string()))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| OracleError::malformed("response contained no candidates"))
    }

    /// Maps API error statuses to oracle errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, OracleError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(OracleError::AuthenticationFailed),
            429 => Err(OracleError::rate_limited(30)),
            500..=599 => Err(OracleError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(OracleError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses the routing classification JSON.
    fn parse_route(text: &str) -> Result<Option<TravelDomain>, OracleError> {
        let wire: RouteWire =
            serde_json::from_str(text).map_err(|e| OracleError::malformed(e.to_string()))?;

        Ok(match wire.domain.as_deref() {
            Some("flight") => Some(TravelDomain::Flight),
            Some("hotel") => Some(TravelDomain::Hotel),
            _ => None,
        })
    }

    /// Parses the extraction JSON into candidate slot values.
    fn parse_extraction(spec: &DomainSpec, text: &str) -> Result<SlotExtraction, OracleError> {
        let wire: ExtractionWire =
            serde_json::from_str(text).map_err(|e| OracleError::malformed(e.to_string()))?;

        let mut slots = SlotValues::new();
        for slot in spec.slots {
            let value = match wire.slots.get(slot.name) {
                Some(value) => value,
                None => continue,
            };
            match Self::to_slot_value(value, slot.numeric) {
                Some(v) => slots.set(slot.name, v),
                None => continue,
            }
        }

        Ok(SlotExtraction {
            slots,
            selection_id: wire.selection_id.filter(|s| !s.trim().is_empty()),
            transaction_details: wire.transaction_details.filter(|s| !s.trim().is_empty()),
            reply: wire.reply.unwrap_or_default(),
        })
    }

    /// Converts one JSON value into a slot value, if usable.
    fn to_slot_value(value: &serde_json::Value, numeric: bool) -> Option<SlotValue> {
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => {
                if numeric {
                    s.trim().parse::<u32>().ok().map(SlotValue::Count)
                } else {
                    Some(SlotValue::text(s.clone()))
                }
            }
            serde_json::Value::Number(n) => {
                let n = n.as_u64()?;
                let n = u32::try_from(n).ok()?;
                if numeric {
                    Some(SlotValue::Count(n))
                } else {
                    Some(SlotValue::text(n.to_string()))
                }
            }
            _ => None,
        }
    }
}

#[async_trait]
impl ExtractionOracle for GeminiOracle {
    async fn classify_domain(
        &self,
        history: &[TurnMessage],
        previous: Option<TravelDomain>,
    ) -> Result<Option<TravelDomain>, OracleError> {
        let text = self
            .send_with_retries(Self::routing_prompt(previous), history)
            .await?;
        Self::parse_route(&text)
    }

    async fn extract(
        &self,
        spec: &DomainSpec,
        context: &BookingContext,
        history: &[TurnMessage],
    ) -> Result<SlotExtraction, OracleError> {
        let text = self
            .send_with_retries(Self::extraction_prompt(spec, context), history)
            .await?;
        Self::parse_extraction(spec, &text)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiSystemInstruction,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct RouteWire {
    domain: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExtractionWire {
    #[serde(default)]
    slots: BTreeMap<String, serde_json::Value>,
    selection_id: Option<String>,
    transaction_details: Option<String>,
    reply: Option<String>,
}
