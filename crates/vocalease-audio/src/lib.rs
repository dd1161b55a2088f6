//! # VocalEase Audio
//!
//! Audio interchange layer for the VocalEase speech studio.
//!
//! The remote speech model returns base64-encoded signed 16-bit little-endian PCM
//! together with a sample rate and channel count. This crate turns that payload
//! into a floating point [`SampleBuffer`] for playback, and turns a buffer into a
//! self-contained [`WavContainer`] for download or storage.
//!
//! ## Pipeline
//!
//! - [`decode_base64`]: base64 text to raw bytes
//! - [`decode_pcm16`]: raw PCM bytes to a [`SampleBuffer`], samples normalized by `s / 32768`
//! - [`encode_wav`]: a [`SampleBuffer`] to a canonical 44-byte-header WAV file
//! - [`decode_wav`]: a stored WAV file back to a [`SampleBuffer`] (read with `hound`)
//!
//! Every operation is a pure, synchronous transform. There is no resampling or
//! pitch processing; speed and pitch are left to the speech model.
//!
//! ## Features
//!
//! - `playback`: [`playback::AudioPlayer`] for the default output device (via `rodio`)
//!
//! ## Example
//!
//! ```rust
//! use vocalease_audio::{EncodedPayload, PcmFormat, encode_wav};
//!
//! # fn main() -> vocalease_audio::AudioResult<()> {
//! let payload = EncodedPayload::from_base64("AEAAwA==", PcmFormat::mono(24000))?;
//! let buffer = payload.decode()?;
//! assert_eq!(buffer.channel(0), Some(&[0.5, -0.5][..]));
//!
//! let wav = encode_wav(&buffer)?;
//! assert_eq!(wav.len(), 48);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod payload;
pub mod pcm;
pub mod types;
pub mod wav;

#[cfg(feature = "playback")]
pub mod playback;

pub use config::{BITS_PER_SAMPLE, DEFAULT_SAMPLE_RATE, PcmFormat};
pub use error::{AudioError, AudioResult};
pub use payload::InlineAudio;
pub use pcm::{decode_base64, decode_pcm16, encode_base64, encode_pcm16, samples_to_buffer};
pub use types::{EncodedPayload, SampleBuffer};
pub use wav::{
    FILE_EXTENSION, MIME_TYPE, WavContainer, WavHeader, decode_wav, download_file_name,
    encode_wav, history_file_name,
};
