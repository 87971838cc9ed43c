//! ejsub - English speech to Japanese subtitles.
//!
//! Sends a WAV file to a speech-recognition API, translates each recognized
//! segment into Japanese with a chat model, and renders SRT and bilingual text.

mod app;
mod commands;
mod config;
mod http;
mod logging;
mod pipeline;
mod setup;
mod subtitle;
mod transcription;
mod translation;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        tracing::error!("{e:#}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
