//! Gemini chat client
//!
//! Keeps the conversation history locally and sends the whole exchange on
//! every turn through the `generateContent` REST endpoint. Network and API
//! failures are answered with a fixed apology so a flaky connection never
//! aborts a turn.

use std::time::Duration;

use ash_core::config::LlmConfig;
use ash_core::traits::LanguageModel;
use ash_core::ModelError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// REST base for the Generative Language API
pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Reply to a blank prompt
pub const EMPTY_PROMPT_REPLY: &str = "I didn't catch that. Could you repeat?";

/// Reply when the service could not be reached or answered badly
pub const FALLBACK_REPLY: &str = "Sorry, I had trouble thinking of a response.";

/// Replies longer than this are cut to two sentences
pub const MAX_REPLY_CHARS: usize = 500;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// `generateContent` request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// `generateContent` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Text of the first candidate, all parts joined
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        Some(text.trim().to_string()).filter(|t| !t.is_empty())
    }
}

/// Sends one request to a model endpoint
pub trait Transport {
    fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse, ModelError>;
}

/// HTTPS transport over a blocking `reqwest` client
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: String) -> Result<Self, ModelError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ModelError::NotConfigured(e.to_string()))?;
        Ok(Self {
            client,
            base_url: API_BASE.to_string(),
            api_key,
        })
    }
}

impl Transport for HttpTransport {
    fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse, ModelError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        // Key goes in a header so it never shows up in logged URLs
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .map_err(|e| ModelError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            debug!(status = status.as_u16(), %body, "Model error body");
            return Err(ModelError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .map_err(|e| ModelError::Response(e.without_url().to_string()))
    }
}

/// Conversational Gemini client
pub struct GeminiClient<T = HttpTransport> {
    transport: T,
    config: LlmConfig,
    history: Vec<Content>,
}

impl GeminiClient<HttpTransport> {
    /// Client for the public endpoint
    pub fn connect(config: &LlmConfig, api_key: String) -> Result<Self, ModelError> {
        Ok(Self::with_transport(HttpTransport::new(api_key)?, config))
    }
}

impl<T: Transport> GeminiClient<T> {
    pub fn with_transport(transport: T, config: &LlmConfig) -> Self {
        info!(model = %config.model, "Language model client ready");
        Self {
            transport,
            config: config.clone(),
            history: Vec::new(),
        }
    }

    /// Messages exchanged so far
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    fn request(&self) -> GenerateRequest {
        let instruction = self.config.system_instruction.trim();
        GenerateRequest {
            contents: self.history.clone(),
            system_instruction: (!instruction.is_empty()).then(|| Content::text(None, instruction)),
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        }
    }
}

impl<T: Transport> LanguageModel for GeminiClient<T> {
    fn ask(&mut self, prompt: &str) -> Result<String, ModelError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(EMPTY_PROMPT_REPLY.to_string());
        }

        self.history.push(Content::text(Some("user"), prompt));
        let reply = self
            .transport
            .generate(&self.config.model, &self.request())
            .and_then(|response| {
                response
                    .text()
                    .ok_or_else(|| ModelError::Response("no candidate text".to_string()))
            });

        match reply {
            Ok(text) => {
                self.history.push(Content::text(Some("model"), &text));
                Ok(shorten(&text))
            }
            Err(e) => {
                warn!("Model call failed: {}", e);
                self.history.pop();
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }

    fn reset_conversation(&mut self) {
        info!(messages = self.history().len(), "Conversation history reset");
        self.history.clear();
    }
}

/// Cut an overlong reply to its first two sentences
pub fn shorten(reply: &str) -> String {
    if reply.chars().count() <= MAX_REPLY_CHARS {
        return reply.to_string();
    }
    let mut short = reply.split(". ").take(2).collect::<Vec<_>>().join(". ");
    if !short.ends_with('.') {
        short.push('.');
    }
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedTransport {
        replies: RefCell<VecDeque<Result<GenerateResponse, ModelError>>>,
        requests: RefCell<Vec<GenerateRequest>>,
    }

    impl ScriptedTransport {
        fn reply(self, text: &str) -> Self {
            let body = format!(
                r#"{{"candidates":[{{"content":{{"role":"model","parts":[{{"text":{}}}]}}}}]}}"#,
                serde_json::to_string(text).unwrap()
            );
            self.replies
                .borrow_mut()
                .push_back(Ok(serde_json::from_str(&body).unwrap()));
            self
        }

        fn fail(self, error: ModelError) -> Self {
            self.replies.borrow_mut().push_back(Err(error));
            self
        }
    }

    impl Transport for &ScriptedTransport {
        fn generate(&self, _model: &str, request: &GenerateRequest) -> Result<GenerateResponse, ModelError> {
            self.requests.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ModelError::Request("no reply scripted".into())))
        }
    }

    #[test]
    fn test_history_and_request_shape() {
        let transport = ScriptedTransport::default().reply("Hi there!").reply("Blue.");
        let mut client = GeminiClient::with_transport(&transport, &LlmConfig::default());

        assert_eq!(client.ask("hello").unwrap(), "Hi there!");
        assert_eq!(client.ask("  favourite colour?  ").unwrap(), "Blue.");
        assert_eq!(client.history().len(), 4);

        let requests = transport.requests.borrow();
        let last = serde_json::to_value(&requests[1]).unwrap();
        assert_eq!(last["contents"].as_array().unwrap().len(), 3);
        assert_eq!(last["contents"][1]["role"], "model");
        assert_eq!(last["contents"][2]["parts"][0]["text"], "favourite colour?");
        assert_eq!(last["generationConfig"]["maxOutputTokens"], 150);
        assert!(last["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("You are Ash"));
        assert!(last["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn test_empty_prompt_skips_the_service() {
        let transport = ScriptedTransport::default();
        let mut client = GeminiClient::with_transport(&transport, &LlmConfig::default());
        assert_eq!(client.ask("   ").unwrap(), EMPTY_PROMPT_REPLY);
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_failure_apologizes_and_forgets_prompt() {
        let transport = ScriptedTransport::default()
            .fail(ModelError::Status { status: 503 })
            .reply("Back again.");
        let mut client = GeminiClient::with_transport(&transport, &LlmConfig::default());

        assert_eq!(client.ask("anyone there?").unwrap(), FALLBACK_REPLY);
        assert!(client.history().is_empty());
        assert_eq!(client.ask("now?").unwrap(), "Back again.");
        assert_eq!(client.history().len(), 2);
    }

    #[test]
    fn test_candidate_without_text_is_a_failure() {
        let transport = ScriptedTransport::default();
        transport
            .replies
            .borrow_mut()
            .push_back(Ok(serde_json::from_str(r#"{"candidates":[]}"#).unwrap()));
        let mut client = GeminiClient::with_transport(&transport, &LlmConfig::default());
        assert_eq!(client.ask("hello").unwrap(), FALLBACK_REPLY);
    }

    #[test]
    fn test_reset_clears_history() {
        let transport = ScriptedTransport::default().reply("Hello.");
        let mut client = GeminiClient::with_transport(&transport, &LlmConfig::default());
        client.ask("hi").unwrap();
        client.reset_conversation();
        assert!(client.history().is_empty());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Two "},{"text":"parts. "}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Two parts."));
    }

    #[test]
    fn test_shorten_long_reply() {
        let long = format!("First one. Second one. {}", "x".repeat(600));
        assert_eq!(shorten(&long), "First one. Second one.");

        let no_period = "y".repeat(501);
        assert_eq!(shorten(&no_period), format!("{}.", no_period));

        assert_eq!(shorten("Short. Reply. Stays."), "Short. Reply. Stays.");
    }
}
