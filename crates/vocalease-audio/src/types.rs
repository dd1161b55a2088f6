use crate::config::PcmFormat;
use crate::error::{AudioError, AudioResult};
use crate::pcm;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// Raw 16-bit PCM bytes together with their declared layout
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedPayload {
    bytes: Vec<u8>,
    format: PcmFormat,
}

impl EncodedPayload {
    /// Wrap raw bytes, which must hold whole frames of the declared format
    pub fn new(bytes: Vec<u8>, format: PcmFormat) -> AudioResult<Self> {
        format.validate()?;
        let frame_size = format.frame_size();
        if bytes.len() % frame_size != 0 {
            return Err(AudioError::TruncatedPcm {
                byte_len: bytes.len(),
                frame_size,
            });
        }
        Ok(Self { bytes, format })
    }

    /// Decode base64 text into a payload
    pub fn from_base64(text: &str, format: PcmFormat) -> AudioResult<Self> {
        format.validate()?;
        Self::new(pcm::decode_base64(text)?, format)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Transcode into a playable sample buffer, consuming the payload
    pub fn decode(self) -> AudioResult<SampleBuffer> {
        pcm::decode_pcm16(&self.bytes, self.format)
    }
}

/// Per-channel floating point samples, nominally normalized to [-1.0, 1.0]
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Build a buffer from de-interleaved channels.
    ///
    /// Requires at least one channel, equal channel lengths and a positive
    /// sample rate. Sample values are not range-checked; the WAV encoder clamps.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::invalid("sample_rate", "must be positive"));
        }
        let Some(first) = channels.first() else {
            return Err(AudioError::invalid("channels", "must be positive"));
        };
        if u16::try_from(channels.len()).is_err() {
            return Err(AudioError::invalid(
                "channels",
                format!("{} channels exceed the WAV limit of {}", channels.len(), u16::MAX),
            ));
        }
        let frame_count = first.len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, channel)| channel.len() != frame_count)
        {
            return Err(AudioError::invalid(
                "channels",
                format!(
                    "channel {index} has {} samples, channel 0 has {frame_count}",
                    channel.len()
                ),
            ));
        }
        PcmFormat::new(sample_rate, channels.len() as u16).validate()?;
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Single channel buffer
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> AudioResult<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Split interleaved samples into channels
    pub fn from_interleaved(samples: &[f32], channels: u16, sample_rate: u32) -> AudioResult<Self> {
        if channels == 0 {
            return Err(AudioError::invalid("channels", "must be positive"));
        }
        let channel_count = usize::from(channels);
        if samples.len() % channel_count != 0 {
            return Err(AudioError::invalid(
                "samples",
                format!(
                    "{} interleaved samples do not divide into {channel_count} channels",
                    samples.len()
                ),
            ));
        }
        let frame_count = samples.len() / channel_count;
        let mut split = vec![Vec::with_capacity(frame_count); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in split.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(split, sample_rate)
    }

    /// One silent mono frame, as handed out when speech is rendered by an offline engine
    pub fn placeholder(sample_rate: u32) -> AudioResult<Self> {
        Self::mono(vec![0.0], sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channel_count())
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Whether the buffer carries real audio rather than an empty or one-frame placeholder
    pub fn is_playable(&self) -> bool {
        self.frame_count() > 1
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count() as f64 / f64::from(self.sample_rate))
    }

    /// Frame-ordered samples, channel 0 first within each frame
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frame_count() * self.channels.len());
        for frame in 0..self.frame_count() {
            out.extend(self.channels.iter().map(|channel| channel[frame]));
        }
        out
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}

impl Serialize for SampleBuffer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("SampleBuffer", 3)?;

        // Interleaved samples as base64 of little-endian f32
        let bytes: Vec<u8> = self
            .interleaved()
            .iter()
            .flat_map(|f| f.to_le_bytes())
            .collect();
        let base64_samples = base64::engine::general_purpose::STANDARD.encode(&bytes);

        state.serialize_field("samples", &base64_samples)?;
        state.serialize_field("channels", &self.channel_count())?;
        state.serialize_field("sample_rate", &self.sample_rate)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for SampleBuffer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SampleBufferHelper {
            samples: String,
            channels: u16,
            sample_rate: u32,
        }

        let helper = SampleBufferHelper::deserialize(deserializer)?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&helper.samples)
            .map_err(serde::de::Error::custom)?;
        if bytes.len() % 4 != 0 {
            return Err(serde::de::Error::custom(format!(
                "{} sample bytes are not a multiple of 4",
                bytes.len()
            )));
        }

        let samples: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        SampleBuffer::from_interleaved(&samples, helper.channels, helper.sample_rate)
            .map_err(serde::de::Error::custom)
    }
}
