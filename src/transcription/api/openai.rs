//! OpenAI Whisper API implementation.
//!
//! Handles transcription requests to OpenAI's Whisper API using multipart form data.

use std::path::Path;

use super::{first_success, RequestShape, SpeechRecognizer, TranscriptionResult};
use crate::config::OpenAiSettings;
use crate::http;

/// Speech is always recognized as English.
const SOURCE_LANGUAGE: &str = "en";

/// Transcribes through `POST {base_url}/audio/transcriptions`.
pub struct OpenAiRecognizer {
    client: reqwest::Client,
    settings: OpenAiSettings,
}

impl OpenAiRecognizer {
    pub fn new(settings: OpenAiSettings) -> Self {
        Self::with_client(settings, reqwest::Client::new())
    }

    pub(crate) fn with_client(settings: OpenAiSettings, client: reqwest::Client) -> Self {
        Self { client, settings }
    }

    /// Builds the multipart form for one request shape.
    ///
    /// The file is read again for every attempt so each upload starts from
    /// the beginning of the audio.
    async fn build_form(
        &self,
        audio_path: &Path,
        shape: RequestShape,
    ) -> anyhow::Result<reqwest::multipart::Form> {
        let audio_data = tokio::fs::read(audio_path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read audio file: {e}"))?;

        let file_name = audio_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let file_part = reqwest::multipart::Part::bytes(audio_data)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| anyhow::anyhow!("Failed to create file part for upload: {e}"))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.settings.transcription.model.clone())
            .text("language", SOURCE_LANGUAGE)
            .text("response_format", "verbose_json");

        if shape.requests_segment_timestamps() {
            form = form.text("timestamp_granularities[]", "segment");
        }

        Ok(form)
    }

    async fn request(
        &self,
        audio_path: &Path,
        shape: RequestShape,
    ) -> anyhow::Result<TranscriptionResult> {
        let form = self.build_form(audio_path, shape).await?;
        let url = format!("{}/audio/transcriptions", self.settings.base_url);

        tracing::debug!(
            "OpenAI API Call:\n  URL: {}\n  Method: POST\n  Headers:\n    Authorization: Bearer <redacted>\n    Content-Type: multipart/form-data\n  Body parameters: model={} language={} response_format=verbose_json shape={:?}",
            url,
            self.settings.transcription.model,
            SOURCE_LANGUAGE,
            shape
        );

        let body = http::send(
            "OpenAI",
            self.client
                .post(&url)
                .bearer_auth(&self.settings.api_key)
                .multipart(form),
        )
        .await?;

        let transcription: TranscriptionResult = serde_json::from_str(&body)
            .map_err(|e| anyhow::anyhow!("Failed to parse OpenAI response: {e}"))?;

        tracing::debug!(
            "OpenAI API Response:\n  Status: Success\n  Transcription length: {} characters\n  Segments: {}",
            transcription.text.len(),
            transcription.segments.len()
        );

        Ok(transcription)
    }
}

impl SpeechRecognizer for OpenAiRecognizer {
    async fn recognize(&self, audio_path: &Path) -> anyhow::Result<TranscriptionResult> {
        first_success(&RequestShape::ATTEMPT_ORDER, move |shape| {
            self.request(audio_path, shape)
        })
        .await
    }
}
