use thiserror::Error;

/// Errors raised while moving audio between its wire, buffer and container forms
#[derive(Error, Debug)]
pub enum AudioError {
    /// Base64 text could not be decoded
    #[error(
        "Malformed base64 audio payload: {0}\nSuggestion: Ensure the payload uses the standard base64 alphabet"
    )]
    MalformedEncoding(#[from] base64::DecodeError),

    /// PCM byte count does not divide into whole frames
    #[error(
        "Truncated PCM payload: {byte_len} bytes is not a multiple of the {frame_size}-byte frame size\nDetails: The payload was not padded or truncated"
    )]
    TruncatedPcm { byte_len: usize, frame_size: usize },

    /// Caller supplied an unusable format parameter
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    /// WAV bytes could not be read
    #[error("Failed to read WAV file: {0}")]
    Wav(#[from] hound::Error),

    /// WAV or MIME type describes audio other than 16-bit linear PCM
    #[error("Unsupported audio format: {0}\nSuggestion: Only 16-bit linear PCM is supported")]
    UnsupportedContainerFormat(String),

    /// Sample data does not fit the 32-bit RIFF size fields
    #[error("Audio data of {data_len} bytes is too large for a WAV container")]
    ContainerTooLarge { data_len: usize },

    /// IO error while persisting a container
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        AudioError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Result type for audio interchange operations
pub type AudioResult<T> = Result<T, AudioError>;
