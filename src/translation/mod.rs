//! English to Japanese translation through a chat-completion API.
//!
//! The [`Translator`] trait is the raw remote call and may fail.
//! [`translate_text`] is what the segment pipeline uses: it never fails and
//! turns any remote error into a labeled string that is stored as the
//! translation.

mod openai;

use serde::{Deserialize, Serialize};
use std::future::Future;

pub use openai::OpenAiTranslator;

/// Prefix of the text stored in place of a failed translation.
pub const TRANSLATION_ERROR_LABEL: &str = "Translation error";

/// Selects the system instruction sent with a translation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationContext {
    /// Natural, readable subtitle phrasing; long sentences are split
    #[default]
    Subtitle,
    /// Plain translation
    General,
}

impl TranslationContext {
    /// Returns the system instruction for this context.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            TranslationContext::Subtitle => SUBTITLE_PROMPT,
            TranslationContext::General => GENERAL_PROMPT,
        }
    }
}

const SUBTITLE_PROMPT: &str = "You are a professional translator of video subtitles. \
Translate the following English text into natural, easy-to-read Japanese subtitles.

Guidelines:
- Write natural Japanese that reads well as a subtitle
- Consider the context and choose expressions that fit the footage
- Use honorifics only where the context calls for them
- Render technical terms with their common Japanese equivalents
- Split sentences that are too long for a single subtitle

Output only the Japanese translation.";

const GENERAL_PROMPT: &str = "Translate the following English text into natural Japanese. \
Output only the translation.";

/// A remote service that translates English text into Japanese.
pub trait Translator: Send + Sync {
    /// Translates `text`, returning the trimmed completion.
    ///
    /// # Errors
    /// Any network, authentication, quota or response-format failure.
    fn translate(
        &self,
        text: &str,
        context: TranslationContext,
    ) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// Translates `text`, substituting a labeled error string on failure.
pub async fn translate_text<T: Translator>(
    translator: &T,
    text: &str,
    context: TranslationContext,
) -> String {
    match translator.translate(text, context).await {
        Ok(translated) => translated,
        Err(e) => {
            tracing::warn!("Translation failed, keeping error text as subtitle: {e}");
            format!("{TRANSLATION_ERROR_LABEL}: {e}")
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Translator double that records requests and fails on chosen inputs.
    #[derive(Default)]
    pub(crate) struct FakeTranslator {
        pub fail_on: Vec<String>,
        pub requests: Mutex<Vec<(String, TranslationContext)>>,
    }

    impl FakeTranslator {
        pub(crate) fn failing_on(texts: &[&str]) -> Self {
            Self {
                fail_on: texts.iter().map(|t| t.to_string()).collect(),
                ..Self::default()
            }
        }

        pub(crate) fn requested_texts(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(text, _)| text.clone())
                .collect()
        }
    }

    impl Translator for FakeTranslator {
        async fn translate(
            &self,
            text: &str,
            context: TranslationContext,
        ) -> anyhow::Result<String> {
            self.requests
                .lock()
                .unwrap()
                .push((text.to_string(), context));
            if self.fail_on.iter().any(|t| t == text) {
                return Err(anyhow::anyhow!("quota exceeded"));
            }
            Ok(format!("JA({text})"))
        }
    }

    #[tokio::test]
    async fn test_successful_translation_is_returned_verbatim() {
        let translator = FakeTranslator::default();
        let result = translate_text(&translator, "Hello", TranslationContext::Subtitle).await;
        assert_eq!(result, "JA(Hello)");
    }

    #[tokio::test]
    async fn test_failure_becomes_labeled_string() {
        let translator = FakeTranslator::failing_on(&["Hello"]);
        let result = translate_text(&translator, "Hello", TranslationContext::Subtitle).await;
        assert_eq!(result, "Translation error: quota exceeded");
    }

    #[tokio::test]
    async fn test_context_is_forwarded() {
        let translator = FakeTranslator::default();
        translate_text(&translator, "Hi", TranslationContext::General).await;
        let requests = translator.requests.lock().unwrap();
        assert_eq!(requests[0].1, TranslationContext::General);
    }

    #[test]
    fn test_contexts_select_different_prompts() {
        let subtitle = TranslationContext::Subtitle.system_prompt();
        let general = TranslationContext::General.system_prompt();
        assert_ne!(subtitle, general);
        assert!(subtitle.contains("subtitle"));
        assert!(subtitle.contains("Split sentences"));
    }

    #[test]
    fn test_context_parses_from_config_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            context: TranslationContext,
        }
        let parsed: Wrapper = toml::from_str(r#"context = "general""#).unwrap();
        assert_eq!(parsed.context, TranslationContext::General);
    }
}
