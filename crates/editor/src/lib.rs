//! The editor receiver: a text buffer, a volume level, and a media-player
//! flag, mutated only through small relative operations.
//!
//! Every mutation is relative (append one character, adjust volume by a
//! step, flip a flag), which is what makes each one reversible by its
//! algebraic inverse. The editor knows nothing about commands, key
//! bindings, or history; it only mutates state and records each mutation
//! in an append-only [`Transcript`].

pub mod transcript;

pub use transcript::{FileTranscript, MemoryTranscript, Transcript};

/// Lower bound of the volume range.
pub const MIN_VOLUME: i32 = 0;
/// Upper bound of the volume range.
pub const MAX_VOLUME: i32 = 100;

const INITIAL_VOLUME: i32 = 50;

/// Mutable document/device state.
pub struct Editor {
    text: String,
    volume: i32,
    media_playing: bool,
    transcript: Box<dyn Transcript>,
}

impl Editor {
    /// Create an editor that records mutations into `transcript`.
    pub fn new(transcript: Box<dyn Transcript>) -> Self {
        Self {
            text: String::new(),
            volume: INITIAL_VOLUME,
            media_playing: false,
            transcript,
        }
    }

    /// Append one character to the text buffer.
    pub fn insert_char(&mut self, c: char) {
        self.text.push(c);
        let line = format!("text: {}", self.text);
        self.record(&line);
    }

    /// Remove the last character from the text buffer. Removing from an
    /// empty buffer is a no-op and records nothing.
    pub fn delete_last_char(&mut self) {
        if self.text.pop().is_some() {
            let line = format!("text: {}", self.text);
            self.record(&line);
        }
    }

    /// Raise the volume by `step`, clamped to [`MAX_VOLUME`]. The sum
    /// saturates first, so a persisted step near `i32::MAX` clamps
    /// instead of overflowing.
    pub fn raise_volume(&mut self, step: i32) {
        self.volume = self.volume.saturating_add(step).min(MAX_VOLUME);
        let line = format!("volume increased to {}%", self.volume);
        self.record(&line);
    }

    /// Lower the volume by `step`, clamped to [`MIN_VOLUME`].
    pub fn lower_volume(&mut self, step: i32) {
        self.volume = self.volume.saturating_sub(step).max(MIN_VOLUME);
        let line = format!("volume decreased to {}%", self.volume);
        self.record(&line);
    }

    /// Flip the media-player flag.
    pub fn toggle_media(&mut self) {
        self.media_playing = !self.media_playing;
        let line = if self.media_playing {
            "media player started"
        } else {
            "media player stopped"
        };
        self.record(line);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn volume(&self) -> i32 {
        self.volume
    }

    pub fn is_media_playing(&self) -> bool {
        self.media_playing
    }

    /// A write failure must not abort the mutation that was already
    /// applied, so it is reported instead of propagated.
    fn record(&mut self, line: &str) {
        if let Err(err) = self.transcript.append_line(line) {
            tracing::error!("failed to record transcript line: {err}");
        }
    }
}
