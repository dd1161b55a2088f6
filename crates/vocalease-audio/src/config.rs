use crate::error::{AudioError, AudioResult};

/// Bit depth of every PCM stream handled by this crate.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Bytes occupied by one sample of one channel.
pub const BYTES_PER_SAMPLE: usize = (BITS_PER_SAMPLE / 8) as usize;

/// Native output rate of the remote speech model.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Declared layout of a signed 16-bit little-endian PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn mono(sample_rate: u32) -> Self {
        Self::new(sample_rate, 1)
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub fn validate(&self) -> AudioResult<()> {
        if self.sample_rate == 0 {
            return Err(AudioError::invalid("sample_rate", "must be positive"));
        }
        if self.channels == 0 {
            return Err(AudioError::invalid("channels", "must be positive"));
        }
        if usize::from(self.channels) * BYTES_PER_SAMPLE > usize::from(u16::MAX) {
            return Err(AudioError::invalid(
                "channels",
                format!("block align of {} channels exceeds the WAV header limit", self.channels),
            ));
        }
        let byte_rate = u64::from(self.sample_rate) * u64::from(self.block_align());
        if byte_rate > u64::from(u32::MAX) {
            return Err(AudioError::invalid(
                "sample_rate",
                format!(
                    "byte rate {byte_rate} for {} Hz x {} channel(s) exceeds the WAV header limit",
                    self.sample_rate, self.channels
                ),
            ));
        }
        Ok(())
    }

    /// Bytes per interleaved frame.
    pub fn frame_size(&self) -> usize {
        usize::from(self.channels) * BYTES_PER_SAMPLE
    }

    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(BYTES_PER_SAMPLE as u16)
    }

    /// Only meaningful after `validate` succeeded.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate
            .saturating_mul(u32::from(self.channels))
            .saturating_mul(BYTES_PER_SAMPLE as u32)
    }

    /// Read the layout from a raw PCM MIME type such as `audio/L16;codec=pcm;rate=24000`.
    ///
    /// Parameters missing from the MIME type keep the values of `fallback`.
    pub fn from_mime_type(mime_type: &str, fallback: PcmFormat) -> AudioResult<Self> {
        let mut parts = mime_type.split(';').map(str::trim);
        let essence = parts.next().unwrap_or_default().to_ascii_lowercase();
        if essence != "audio/l16" && essence != "audio/pcm" {
            return Err(AudioError::UnsupportedContainerFormat(format!(
                "MIME type '{mime_type}'"
            )));
        }

        let mut format = fallback;
        for param in parts {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            match key.trim().to_ascii_lowercase().as_str() {
                "rate" => {
                    format.sample_rate = value.parse().map_err(|_| {
                        AudioError::invalid("sample_rate", format!("'{value}' is not a number"))
                    })?;
                }
                "channels" => {
                    format.channels = value.parse().map_err(|_| {
                        AudioError::invalid("channels", format!("'{value}' is not a number"))
                    })?;
                }
                _ => {}
            }
        }

        format.validate()?;
        Ok(format)
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
        }
    }
}
