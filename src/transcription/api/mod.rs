//! Speech-recognition API client and the data it returns.
//!
//! The remote call is behind the [`SpeechRecognizer`] trait so the adapter
//! can be exercised without network access. Request compatibility is handled
//! with an explicit ordered list of [`RequestShape`]s: the first shape that
//! succeeds wins, and the call fails only when every shape has failed.

mod openai;

use serde::{Deserialize, Deserializer};
use std::future::Future;
use std::path::Path;

pub use openai::OpenAiRecognizer;

/// Structured result of one transcription call (`verbose_json`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptionResult {
    /// Full transcript
    pub text: String,
    /// Language reported by the API
    #[serde(default)]
    pub language: String,
    /// Audio length in seconds
    #[serde(default)]
    pub duration: f64,
    /// Timestamped segments; empty when the API omits them
    #[serde(default, deserialize_with = "null_as_empty")]
    pub segments: Vec<RawSegment>,
}

/// One timestamped span as returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSegment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

impl RawSegment {
    #[cfg(test)]
    pub fn new(start: f64, end: f64, text: &str) -> Self {
        Self {
            start,
            end,
            text: text.to_string(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawSegment>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawSegment>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A remote speech-recognition service.
pub trait SpeechRecognizer: Send + Sync {
    /// Uploads the audio file and returns the structured transcript.
    ///
    /// # Errors
    /// Any read, network, authentication, quota or response-format failure.
    fn recognize(
        &self,
        audio_path: &Path,
    ) -> impl Future<Output = anyhow::Result<TranscriptionResult>> + Send;
}

/// Variants of the transcription request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// Asks for segment-level timestamp granularity
    Segmented,
    /// Omits the granularity parameter for APIs that reject it
    Legacy,
}

impl RequestShape {
    /// Shapes in the order they are attempted.
    pub const ATTEMPT_ORDER: [RequestShape; 2] = [RequestShape::Segmented, RequestShape::Legacy];

    /// Whether the request carries `timestamp_granularities[]=segment`.
    pub fn requests_segment_timestamps(&self) -> bool {
        matches!(self, RequestShape::Segmented)
    }
}

/// Runs `attempt` for each shape in order and returns the first success.
///
/// # Errors
/// The error of the last attempt when every shape fails.
pub async fn first_success<T, F, Fut>(shapes: &[RequestShape], mut attempt: F) -> anyhow::Result<T>
where
    F: FnMut(RequestShape) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut last_error = None;

    for &shape in shapes {
        match attempt(shape).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!("Transcription request ({shape:?}) failed: {e}");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("No transcription request was attempted")))
}
