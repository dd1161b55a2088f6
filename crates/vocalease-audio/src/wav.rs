//! Canonical RIFF/WAVE containers for 16-bit PCM.

use crate::config::{BITS_PER_SAMPLE, PcmFormat};
use crate::error::{AudioError, AudioResult};
use crate::pcm;
use crate::types::SampleBuffer;
use log::debug;
use std::io::Cursor;
use std::path::Path;

/// MIME type of the downloadable container.
pub const MIME_TYPE: &str = "audio/wav";

/// File extension of the downloadable container, without the dot.
pub const FILE_EXTENSION: &str = "wav";

/// Size of the canonical header written by [`encode_wav`].
pub const HEADER_LEN: usize = 44;

const FORMAT_PCM: u16 = 1;

/// A complete WAV file held in memory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WavContainer {
    bytes: Vec<u8>,
}

impl WavContainer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Interleaved sample bytes following the header
    pub fn data(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    pub fn header(&self) -> WavHeader {
        WavHeader::from_canonical(&self.bytes)
    }

    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    /// Persist the container bytes to `path`
    pub fn write_to(&self, path: impl AsRef<Path>) -> AudioResult<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes)?;
        debug!("Wrote {} byte WAV container to {}", self.len(), path.display());
        Ok(())
    }

    /// Read back into a sample buffer
    pub fn decode(&self) -> AudioResult<SampleBuffer> {
        decode_wav(&self.bytes)
    }
}

impl AsRef<[u8]> for WavContainer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Name used when offering a freshly generated clip for download
pub fn download_file_name(voice_id: &str, timestamp_ms: u64) -> String {
    format!("vocalease-{voice_id}-{timestamp_ms}.{FILE_EXTENSION}")
}

/// Name used when re-downloading a clip from the generation history
pub fn history_file_name(voice_id: &str, timestamp_ms: u64) -> String {
    format!("VocalEase_{voice_id}_{timestamp_ms}.{FILE_EXTENSION}")
}

/// Serialize a buffer as a canonical 44-byte-header WAV file.
pub fn encode_wav(buffer: &SampleBuffer) -> AudioResult<WavContainer> {
    let format = buffer.format();
    format.validate()?;

    let data = pcm::encode_pcm16(buffer);
    let data_len = u32::try_from(data.len())
        .ok()
        .filter(|len| len.checked_add(36).is_some())
        .ok_or(AudioError::ContainerTooLarge {
            data_len: data.len(),
        })?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + data.len());
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    bytes.extend_from_slice(&format.channels.to_le_bytes());
    bytes.extend_from_slice(&format.sample_rate.to_le_bytes());
    bytes.extend_from_slice(&format.byte_rate().to_le_bytes());
    bytes.extend_from_slice(&format.block_align().to_le_bytes());
    bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    debug_assert_eq!(bytes.len(), HEADER_LEN);
    bytes.extend_from_slice(&data);

    debug!(
        "Encoded {} frame(s) x {} channel(s) at {} Hz into {} byte WAV",
        buffer.frame_count(),
        format.channels,
        format.sample_rate,
        bytes.len()
    );

    Ok(WavContainer { bytes })
}

/// Read a WAV file holding 16-bit integer PCM into a sample buffer.
pub fn decode_wav(bytes: &[u8]) -> AudioResult<SampleBuffer> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != BITS_PER_SAMPLE
    {
        return Err(AudioError::UnsupportedContainerFormat(format!(
            "{:?} WAV with {} bits per sample",
            spec.sample_format, spec.bits_per_sample
        )));
    }

    let samples: Vec<i16> = reader.samples::<i16>().collect::<Result<_, _>>()?;
    debug!(
        "Read {} sample(s) from {} byte WAV ({} Hz, {} channel(s))",
        samples.len(),
        bytes.len(),
        spec.sample_rate,
        spec.channels
    );

    pcm::samples_to_buffer(&samples, PcmFormat::new(spec.sample_rate, spec.channels))
}

/// Header fields of a container produced by [`encode_wav`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_len: u32,
}

impl WavHeader {
    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channels)
    }

    /// Fixed offsets of the canonical 44-byte layout.
    fn from_canonical(bytes: &[u8]) -> Self {
        Self {
            chunk_size: read_u32(bytes, 4),
            audio_format: read_u16(bytes, 20),
            channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            byte_rate: read_u32(bytes, 28),
            block_align: read_u16(bytes, 32),
            bits_per_sample: read_u16(bytes, 34),
            data_len: read_u32(bytes, 40),
        }
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
