use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use tracing::warn;

use aisle_types::api::{AskRequest, AskResponse, ValidatePasswordRequest, ValidatePasswordResponse};

use crate::auth::{AppState, validate_admin_password};

pub const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Returned whenever the model can't be reached or answers with garbage.
pub const APOLOGY: &str = "I'm sorry, I couldn't answer that right now. \
     Please try again later or reach out to the couple directly.";

const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Q&A over the site's own content, answered by a hosted chat model.
pub struct Assistant {
    client: reqwest::Client,
    api_key: Option<String>,
    url: String,
}

impl Assistant {
    pub fn new(api_key: Option<String>, url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            url,
        }
    }

    /// Never fails: any error becomes the fixed apology.
    pub async fn ask(&self, context: &str, question: &str) -> String {
        match self.try_ask(context, question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Assistant request failed: {:#}", e);
                APOLOGY.to_string()
            }
        }
    }

    async fn try_ask(&self, context: &str, question: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("no API key configured"))?;

        let system = format!(
            "You are a friendly assistant on a wedding website. Answer guests' \
             questions using only the information below. If the answer is not \
             there, say so and suggest contacting the couple.\n\n{context}"
        );

        let request = ChatRequest {
            model: MODEL,
            messages: [
                ChatMessage { role: "system", content: &system },
                ChatMessage { role: "user", content: question },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("chat request")?;

        let status = response.status();
        if !status.is_success() {
            bail!("chat endpoint returned {}", status);
        }

        let body: ChatResponse = response.json().await.context("chat response body")?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("chat response had no content"))
    }
}

/// POST /functions/ask
pub async fn ask(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Json<AskResponse> {
    let answer = state.assistant.ask(&req.context, &req.question).await;
    Json(AskResponse { answer })
}

/// POST /functions/validate-admin-password. Always answers `{valid}`, even
/// for a malformed body.
pub async fn validate_password(
    State(state): State<AppState>,
    body: Bytes,
) -> Json<ValidatePasswordResponse> {
    let supplied = serde_json::from_slice::<ValidatePasswordRequest>(&body)
        .ok()
        .and_then(|r| r.password);

    Json(ValidatePasswordResponse {
        valid: validate_admin_password(state.admin_password.as_deref(), supplied.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_gets_apology() {
        let assistant = Assistant::new(None, DEFAULT_CHAT_URL.into());
        assert_eq!(assistant.ask("The venue is in Boise.", "Where?").await, APOLOGY);
    }

    #[tokio::test]
    async fn unreachable_endpoint_gets_apology() {
        let assistant = Assistant::new(Some("sk-test".into()), "http://127.0.0.1:9/v1/chat".into());
        assert_eq!(assistant.ask("ctx", "question").await, APOLOGY);
    }

    #[test]
    fn request_carries_fixed_model_settings() {
        let request = ChatRequest {
            model: MODEL,
            messages: [
                ChatMessage { role: "system", content: "ctx" },
                ChatMessage { role: "user", content: "q" },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["messages"][1]["role"], "user");
    }
}
