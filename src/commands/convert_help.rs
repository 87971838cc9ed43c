//! How to turn other audio formats into WAV files ejsub accepts.

use cliclack::{intro, note, outro};
use console::style;

const TOOLS: &str = "\
Audacity (recommended)
  https://www.audacityteam.org/
  File > Import, then File > Export > Export as WAV

VLC Media Player
  Media > Convert / Save, choose a WAV profile

Online converters
  https://convertio.co/
  https://online-audio-converter.com/";

const COMMANDS: &str = "\
ffmpeg -i input.mp3 -ar 16000 -ac 1 -c:a pcm_s16le output.wav

From a video URL:
yt-dlp --extract-audio --audio-format wav <URL>";

const RECOMMENDED: &str = "\
Sample rate:  16000 Hz or 44100 Hz
Bit depth:    16 bit
Channels:     mono
File size:    25 MB or less";

/// Prints conversion instructions.
///
/// # Errors
/// - If the terminal cannot be written to
pub fn handle_convert_help() -> anyhow::Result<()> {
    intro(style(" convert-help ").on_white().black())?;
    note("Only WAV files are supported", "Convert MP3, M4A and other formats to WAV first.")?;
    note("Free tools", TOOLS)?;
    note("Command line", COMMANDS)?;
    note("Recommended settings", RECOMMENDED)?;
    outro("Then run: ejsub process output.wav")?;
    Ok(())
}
