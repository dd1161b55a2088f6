use crate::types::SampleBuffer;
use log::debug;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Failed to initialize audio output stream")]
    InitFailed,
}

/// Plays sample buffers on the default output device.
///
/// The output stream lives as long as the player; dropping it stops playback.
pub struct AudioPlayer {
    _stream: OutputStream,
    sink: Sink,
}

impl AudioPlayer {
    /// Returns an error if no audio device is available
    pub fn try_new() -> Result<Self, PlaybackError> {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(_) => return Err(PlaybackError::InitFailed),
        };

        let sink = Sink::connect_new(stream.mixer());

        Ok(AudioPlayer {
            _stream: stream,
            sink,
        })
    }

    /// Queue a buffer for playback.
    ///
    /// Empty and one-frame placeholder buffers are skipped; returns whether anything was queued.
    pub fn play(&self, buffer: &SampleBuffer) -> bool {
        if !buffer.is_playable() {
            debug!(
                "Skipping playback of {} frame placeholder buffer",
                buffer.frame_count()
            );
            return false;
        }

        let source = rodio::buffer::SamplesBuffer::new(
            buffer.channel_count(),
            buffer.sample_rate(),
            buffer.interleaved(),
        );
        self.sink.append(source);
        true
    }

    /// Wait until all audio has finished playing
    pub fn wait_until_end(&self) {
        self.sink.sleep_until_end();
    }

    /// Drop everything queued
    pub fn stop(&self) {
        self.sink.stop();
    }

    pub fn is_playing(&self) -> bool {
        !self.sink.empty()
    }
}
