//! Application command handlers for ejsub.
//!
//! # Commands
//! - `process`: Generate bilingual subtitles for WAV files
//! - `auth`: OpenAI API key management
//! - `convert_help`: How to convert other formats to WAV
//! - `config`: Open configuration file in user's preferred editor
//! - `logs`: Display recent log entries

pub mod auth;
pub mod config;
pub mod convert_help;
pub mod logs;
pub mod process;

pub use auth::handle_auth;
pub use config::handle_config;
pub use convert_help::handle_convert_help;
pub use logs::handle_logs;
pub use process::{handle_process, ProcessOptions, View};
