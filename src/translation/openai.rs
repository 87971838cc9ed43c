//! OpenAI chat-completions implementation of [`Translator`].

use serde::{Deserialize, Serialize};

use super::{TranslationContext, Translator};
use crate::config::OpenAiSettings;
use crate::http;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Translates through `POST {base_url}/chat/completions`.
pub struct OpenAiTranslator {
    client: reqwest::Client,
    settings: OpenAiSettings,
}

impl OpenAiTranslator {
    pub fn new(settings: OpenAiSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }
}

impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str, context: TranslationContext) -> anyhow::Result<String> {
        let url = format!("{}/chat/completions", self.settings.base_url);
        let request = ChatRequest {
            model: &self.settings.translation.model,
            messages: vec![
                Message {
                    role: "system",
                    content: context.system_prompt(),
                },
                Message {
                    role: "user",
                    content: text,
                },
            ],
            temperature: self.settings.translation.temperature,
        };

        tracing::debug!(
            "OpenAI chat call: POST {} model={} context={:?} chars={}",
            url,
            request.model,
            context,
            text.len()
        );

        let body = http::send(
            "OpenAI",
            self.client
                .post(&url)
                .bearer_auth(&self.settings.api_key)
                .json(&request),
        )
        .await?;

        parse_completion(&body)
    }
}

/// Extracts the trimmed first completion from a chat response body.
fn parse_completion(body: &str) -> anyhow::Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| anyhow::anyhow!("Failed to parse OpenAI chat response: {e}"))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| anyhow::anyhow!("OpenAI chat response contained no completion"))
}
