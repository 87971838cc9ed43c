//! Local checks run on an audio file before it is uploaded.

use std::path::Path;

use super::TranscriptionError;

/// Upload limit of the speech-recognition API.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Header information of a validated WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_rate: u32,
    pub duration_secs: f64,
    pub file_size: u64,
}

/// Checks that `path` is a readable WAV file within the upload limit.
///
/// Checks run in order: extension, container header, file size. Nothing here
/// touches the network.
///
/// # Errors
/// - [`TranscriptionError::WrongFormat`] if the extension is not `.wav`
/// - [`TranscriptionError::Unreadable`] if the WAV header cannot be parsed
/// - [`TranscriptionError::TooLarge`] if the file exceeds 25 MiB
pub fn validate_wav(path: &Path) -> Result<WavInfo, TranscriptionError> {
    if !has_wav_extension(path) {
        return Err(TranscriptionError::WrongFormat);
    }

    let reader = hound::WavReader::open(path).map_err(TranscriptionError::Unreadable)?;
    let spec = reader.spec();
    let duration_secs = if spec.sample_rate > 0 {
        reader.duration() as f64 / spec.sample_rate as f64
    } else {
        0.0
    };
    drop(reader);

    let file_size = std::fs::metadata(path)
        .map_err(|e| TranscriptionError::Unreadable(hound::Error::IoError(e)))?
        .len();

    if file_size > MAX_UPLOAD_BYTES {
        return Err(TranscriptionError::TooLarge {
            size_mb: file_size as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(WavInfo {
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        sample_rate: spec.sample_rate,
        duration_secs,
        file_size,
    })
}

fn has_wav_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::path::PathBuf;

    /// Writes one second of 16 kHz mono silence.
    pub(crate) fn write_wav(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..16000 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn padded_wav(dir: &Path, len: u64) -> PathBuf {
        let path = dir.join("padded.wav");
        write_wav(&path);
        let file = OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len(len).unwrap();
        path
    }

    #[test]
    fn test_valid_wav_reports_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        write_wav(&path);

        let info = validate_wav(&path).unwrap();
        assert_eq!(info.channels, 1);
        assert_eq!(info.bits_per_sample, 16);
        assert_eq!(info.sample_rate, 16000);
        assert!((info.duration_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SPEECH.WAV");
        write_wav(&path);
        assert!(validate_wav(&path).is_ok());
    }

    #[test]
    fn test_other_extensions_are_rejected_before_reading() {
        // The file does not exist, so only the extension check can fail here.
        let result = validate_wav(Path::new("/nonexistent/speech.mp3"));
        assert!(matches!(result, Err(TranscriptionError::WrongFormat)));

        let result = validate_wav(Path::new("/nonexistent/speech"));
        assert!(matches!(result, Err(TranscriptionError::WrongFormat)));
    }

    #[test]
    fn test_corrupt_container_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"definitely not RIFF data").unwrap();

        let err = validate_wav(&path).unwrap_err();
        assert!(matches!(err, TranscriptionError::Unreadable(_)));
        assert!(err.to_string().starts_with("Failed to read WAV file:"));
    }

    #[test]
    fn test_file_at_limit_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = padded_wav(dir.path(), MAX_UPLOAD_BYTES);
        assert_eq!(validate_wav(&path).unwrap().file_size, MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_file_over_limit_is_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let path = padded_wav(dir.path(), 30 * 1024 * 1024);

        let err = validate_wav(&path).unwrap_err();
        assert!(matches!(err, TranscriptionError::TooLarge { .. }));
        assert_eq!(err.to_string(), "File is too large: 30.0MB (limit: 25MB)");
    }
}
