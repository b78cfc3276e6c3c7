//! Audio clip assets
//!
//! Holds encoded clip bytes (WAV, OGG, MP3 or FLAC) for devices that decode
//! on play. Bytes are shared, so handing a clip to a new voice is cheap.

use std::path::Path;
use std::sync::Arc;

/// Clip loading errors
#[derive(thiserror::Error, Debug)]
pub enum ClipError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Empty input
    #[error("Empty audio file")]
    Empty,

    /// Magic bytes did not match a supported format
    #[error("Unknown audio format")]
    UnknownFormat,
}

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// WAV uncompressed
    Wav,
    /// OGG Vorbis compressed
    Ogg,
    /// MP3 compressed
    Mp3,
    /// FLAC lossless
    Flac,
    /// Unknown format
    Unknown,
}

/// Encoded audio clip
#[derive(Debug, Clone)]
pub struct AudioClip {
    data: Arc<[u8]>,
    format: AudioFormat,
}

impl AudioClip {
    /// Create a clip from raw bytes, detecting the format
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClipError> {
        if bytes.is_empty() {
            return Err(ClipError::Empty);
        }

        let format = Self::detect_format(bytes);
        if format == AudioFormat::Unknown {
            return Err(ClipError::UnknownFormat);
        }

        // Decoding is left to the device at play time
        Ok(Self { data: Arc::from(bytes), format })
    }

    /// Load a clip from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClipError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Encoded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the encoded bytes
    pub fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Detected format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Detect audio format from magic bytes
    fn detect_format(bytes: &[u8]) -> AudioFormat {
        if bytes.len() < 4 {
            return AudioFormat::Unknown;
        }

        match &bytes[0..4] {
            b"RIFF" => AudioFormat::Wav,
            b"OggS" => AudioFormat::Ogg,
            b"fLaC" => AudioFormat::Flac,
            // MP3 can start with ID3 tag or frame sync
            [0xFF, 0xFB | 0xFA | 0xF3 | 0xF2, _, _] | [b'I', b'D', b'3', _] => AudioFormat::Mp3,
            _ => AudioFormat::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_detection() {
        assert_eq!(AudioClip::detect_format(b"RIFF....WAVE"), AudioFormat::Wav);
        assert_eq!(AudioClip::detect_format(b"OggS...."), AudioFormat::Ogg);
        assert_eq!(AudioClip::detect_format(b"fLaC...."), AudioFormat::Flac);
        assert_eq!(AudioClip::detect_format(b"ID3\x03"), AudioFormat::Mp3);
        assert_eq!(AudioClip::detect_format(&[0xFF, 0xFB, 0x90, 0x00]), AudioFormat::Mp3);
        assert_eq!(AudioClip::detect_format(b"ABCD"), AudioFormat::Unknown);
        assert_eq!(AudioClip::detect_format(b"RI"), AudioFormat::Unknown);
    }

    #[test]
    fn test_empty_data_fails() {
        assert!(matches!(AudioClip::from_bytes(&[]), Err(ClipError::Empty)));
    }

    #[test]
    fn test_unknown_format_fails() {
        assert!(matches!(AudioClip::from_bytes(b"garbage"), Err(ClipError::UnknownFormat)));
    }

    #[test]
    fn test_load_from_file_shares_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"RIFF\x00\x00\x00\x00WAVE").unwrap();

        let clip = AudioClip::load(file.path()).unwrap();
        assert_eq!(clip.format(), AudioFormat::Wav);
        assert_eq!(clip.data().len(), 12);

        let shared = clip.shared_data();
        assert_eq!(&shared[..4], b"RIFF");
    }
}
