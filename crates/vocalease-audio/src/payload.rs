use crate::config::PcmFormat;
use crate::error::AudioResult;
use crate::types::EncodedPayload;
use serde::{Deserialize, Serialize};

/// Inline audio part as returned by the speech model
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineAudio {
    /// e.g. `audio/L16;codec=pcm;rate=24000`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64 encoded PCM
    pub data: String,
}

impl InlineAudio {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            mime_type: None,
            data: data.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Resolve the declared format, falling back to `fallback` for anything the MIME type omits
    pub fn format(&self, fallback: PcmFormat) -> AudioResult<PcmFormat> {
        match &self.mime_type {
            Some(mime_type) => PcmFormat::from_mime_type(mime_type, fallback),
            None => {
                fallback.validate()?;
                Ok(fallback)
            }
        }
    }

    pub fn into_payload(self, fallback: PcmFormat) -> AudioResult<EncodedPayload> {
        let format = self.format(fallback)?;
        EncodedPayload::from_base64(&self.data, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudioError;

    #[test]
    fn test_deserializes_inline_data() {
        let json = r#"{"mimeType":"audio/L16;codec=pcm;rate=24000","data":"AEAAwA=="}"#;
        let inline: InlineAudio = serde_json::from_str(json).unwrap();
        assert_eq!(
            inline,
            InlineAudio::new("AEAAwA==").with_mime_type("audio/L16;codec=pcm;rate=24000")
        );

        let payload = inline.into_payload(PcmFormat::mono(16_000)).unwrap();
        assert_eq!(payload.format(), PcmFormat::mono(24_000));
        assert_eq!(payload.bytes(), &[0x00, 0x40, 0x00, 0xC0]);
    }

    #[test]
    fn test_missing_mime_type_uses_fallback() {
        let inline: InlineAudio = serde_json::from_str(r#"{"data":""}"#).unwrap();
        let payload = inline.into_payload(PcmFormat::default()).unwrap();
        assert!(payload.is_empty());
        assert_eq!(payload.decode().unwrap().frame_count(), 0);
    }

    #[test]
    fn test_malformed_data_is_reported() {
        let err = InlineAudio::new("not base64!")
            .into_payload(PcmFormat::default())
            .unwrap_err();
        assert!(matches!(err, AudioError::MalformedEncoding(_)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&InlineAudio::new("AA==").with_mime_type("audio/pcm"))
            .unwrap();
        assert_eq!(json, r#"{"mimeType":"audio/pcm","data":"AA=="}"#);
    }
}
