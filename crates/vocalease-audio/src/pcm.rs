//! Base64 and signed 16-bit little-endian PCM conversion.

use crate::config::{BYTES_PER_SAMPLE, PcmFormat};
use crate::error::{AudioError, AudioResult};
use crate::types::SampleBuffer;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use log::{debug, warn};

/// Full-scale divisor for 16-bit samples.
const PCM16_SCALE: f32 = 32768.0;

/// Decode standard base64 text into raw bytes.
///
/// Padding is optional, but when present it must be complete.
pub fn decode_base64(text: &str) -> AudioResult<Vec<u8>> {
    let bytes = if text.ends_with('=') {
        STANDARD.decode(text)?
    } else {
        STANDARD_NO_PAD.decode(text)?
    };
    debug!("Decoded {} base64 characters into {} bytes", text.len(), bytes.len());
    Ok(bytes)
}

/// Encode raw bytes as padded standard base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Interpret `bytes` as interleaved signed 16-bit little-endian PCM.
///
/// Each sample `s` becomes `s / 32768.0`, so the output range is
/// `[-1.0, 32767/32768]`. An empty input yields an empty buffer.
pub fn decode_pcm16(bytes: &[u8], format: PcmFormat) -> AudioResult<SampleBuffer> {
    format.validate()?;

    let frame_size = format.frame_size();
    if bytes.len() % frame_size != 0 {
        return Err(AudioError::TruncatedPcm {
            byte_len: bytes.len(),
            frame_size,
        });
    }

    let samples: Vec<i16> = bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|sample| i16::from_le_bytes([sample[0], sample[1]]))
        .collect();

    debug!(
        "Decoded {} PCM bytes at {} Hz x {} channel(s)",
        bytes.len(),
        format.sample_rate,
        format.channels
    );

    samples_to_buffer(&samples, format)
}

/// De-interleave 16-bit samples into a buffer, normalizing each by `s / 32768.0`.
pub fn samples_to_buffer(samples: &[i16], format: PcmFormat) -> AudioResult<SampleBuffer> {
    format.validate()?;

    let channel_count = usize::from(format.channels);
    if samples.len() % channel_count != 0 {
        return Err(AudioError::TruncatedPcm {
            byte_len: samples.len() * BYTES_PER_SAMPLE,
            frame_size: format.frame_size(),
        });
    }

    let frame_count = samples.len() / channel_count;
    let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
    for frame in samples.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample as f32 / PCM16_SCALE);
        }
    }

    SampleBuffer::new(channels, format.sample_rate)
}

/// Interleave a buffer back into signed 16-bit little-endian PCM bytes.
///
/// Samples are scaled by 32768, rounded and clamped to the i16 range; NaN becomes 0.
pub fn encode_pcm16(buffer: &SampleBuffer) -> Vec<u8> {
    let channels = buffer.channels();
    let mut bytes = Vec::with_capacity(buffer.frame_count() * channels.len() * BYTES_PER_SAMPLE);
    let mut clamped = 0usize;

    for frame in 0..buffer.frame_count() {
        for channel in channels {
            let (value, was_clamped) = quantize(channel[frame]);
            clamped += usize::from(was_clamped);
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }

    if clamped > 0 {
        warn!("Clamped {clamped} out-of-range sample(s) while encoding PCM");
    }

    bytes
}

fn quantize(sample: f32) -> (i16, bool) {
    let scaled = (sample * PCM16_SCALE).round();
    let clamped = scaled.clamp(i16::MIN as f32, i16::MAX as f32);
    // `as` saturates and maps NaN to 0
    (clamped as i16, clamped != scaled && !scaled.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_roundtrip() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(decode_base64(&encode_base64(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn test_base64_without_padding_is_accepted() {
        assert_eq!(decode_base64("AEAAwA").unwrap(), vec![0x00, 0x40, 0x00, 0xC0]);
        assert_eq!(decode_base64("AEAAwA==").unwrap(), vec![0x00, 0x40, 0x00, 0xC0]);
    }

    #[test]
    fn test_base64_rejects_foreign_characters() {
        let err = decode_base64("AEA*wA==").unwrap_err();
        assert!(matches!(err, AudioError::MalformedEncoding(_)));
    }

    #[test]
    fn test_base64_rejects_partial_padding() {
        let err = decode_base64("AEAAwA=").unwrap_err();
        assert!(matches!(err, AudioError::MalformedEncoding(_)));
    }

    #[test]
    fn test_base64_rejects_excess_padding() {
        let err = decode_base64("AEAAwA===").unwrap_err();
        assert!(matches!(err, AudioError::MalformedEncoding(_)));
    }

    #[test]
    fn test_base64_rejects_inner_padding() {
        let err = decode_base64("AE==AEAA").unwrap_err();
        assert!(matches!(err, AudioError::MalformedEncoding(_)));
    }

    #[test]
    fn test_base64_rejects_invalid_length() {
        let err = decode_base64("AEAAw").unwrap_err();
        assert!(matches!(err, AudioError::MalformedEncoding(_)));
    }

    #[test]
    fn test_base64_empty_is_empty() {
        assert!(decode_base64("").unwrap().is_empty());
    }

    #[test]
    fn test_decodes_mono_scenario() {
        let buffer = decode_pcm16(&[0x00, 0x40, 0x00, 0xC0], PcmFormat::mono(24_000)).unwrap();
        assert_eq!(buffer.sample_rate(), 24_000);
        assert_eq!(buffer.channel_count(), 1);
        assert_eq!(buffer.channel(0), Some(&[0.5, -0.5][..]));
    }

    #[test]
    fn test_normalization_is_asymmetric() {
        let bytes = [0x00, 0x80, 0xFF, 0x7F];
        let buffer = decode_pcm16(&bytes, PcmFormat::mono(8_000)).unwrap();
        let samples = buffer.channel(0).unwrap();
        assert_eq!(samples[0], -1.0);
        assert_eq!(samples[1], 32767.0 / 32768.0);
        assert!(samples[1] < 1.0);
    }

    #[test]
    fn test_deinterleaves_channel_zero_first() {
        // frames: (1, -1), (2, -2)
        let bytes = [0x01, 0x00, 0xFF, 0xFF, 0x02, 0x00, 0xFE, 0xFF];
        let buffer = decode_pcm16(&bytes, PcmFormat::new(24_000, 2)).unwrap();
        assert_eq!(buffer.frame_count(), 2);
        assert_eq!(buffer.channel(0), Some(&[1.0 / 32768.0, 2.0 / 32768.0][..]));
        assert_eq!(buffer.channel(1), Some(&[-1.0 / 32768.0, -2.0 / 32768.0][..]));
    }

    #[test]
    fn test_empty_payload_is_valid() {
        let buffer = decode_pcm16(&[], PcmFormat::default()).unwrap();
        assert_eq!(buffer.frame_count(), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_odd_byte_count_is_truncated() {
        let err = decode_pcm16(&[0x00, 0x40, 0x00], PcmFormat::mono(24_000)).unwrap_err();
        match err {
            AudioError::TruncatedPcm {
                byte_len,
                frame_size,
            } => {
                assert_eq!(byte_len, 3);
                assert_eq!(frame_size, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_partial_stereo_frame_is_truncated() {
        let err = decode_pcm16(&[0; 6], PcmFormat::new(24_000, 2)).unwrap_err();
        assert!(matches!(
            err,
            AudioError::TruncatedPcm {
                byte_len: 6,
                frame_size: 4
            }
        ));
    }

    #[test]
    fn test_invalid_format_is_checked_first() {
        let err = decode_pcm16(&[0x00], PcmFormat::new(0, 1)).unwrap_err();
        assert!(matches!(err, AudioError::InvalidParameter { .. }));
    }

    #[test]
    fn test_samples_with_partial_frame_are_truncated() {
        let err = samples_to_buffer(&[1, 2, 3], PcmFormat::new(24_000, 2)).unwrap_err();
        assert!(matches!(
            err,
            AudioError::TruncatedPcm {
                byte_len: 6,
                frame_size: 4
            }
        ));
    }

    #[test]
    fn test_encode_clamps_out_of_range() {
        let buffer = SampleBuffer::mono(vec![2.0, -2.0, 1.0], 24_000).unwrap();
        let bytes = encode_pcm16(&buffer);
        assert_eq!(&bytes[0..2], &i16::MAX.to_le_bytes());
        assert_eq!(&bytes[2..4], &i16::MIN.to_le_bytes());
        assert_eq!(&bytes[4..6], &i16::MAX.to_le_bytes());
    }

    #[test]
    fn test_encode_rounds_to_nearest() {
        let buffer = SampleBuffer::mono(vec![0.4 / 32768.0, 0.6 / 32768.0, f32::NAN], 24_000)
            .unwrap();
        let bytes = encode_pcm16(&buffer);
        assert_eq!(bytes, vec![0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_encode_reinterleaves() {
        let bytes = [0x01, 0x00, 0xFF, 0xFF, 0x02, 0x00, 0xFE, 0xFF];
        let buffer = decode_pcm16(&bytes, PcmFormat::new(24_000, 2)).unwrap();
        assert_eq!(encode_pcm16(&buffer), bytes);
    }
}
