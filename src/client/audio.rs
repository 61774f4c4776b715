use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording {
        chunks: Vec<Vec<u8>>,
    },
    Recorded {
        blob: Vec<u8>,
        url: String,
    },
}

/// In-memory audio note recorder.
///
/// Audio never leaves the device; once stopped, the recording is addressed by
/// a `blob:` URL that is only meaningful to the client that created it.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioRecorder {
    origin: String,
    state: RecordingState,
}

impl AudioRecorder {
    /// `origin` is the client origin the blob URLs are scoped to
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            state: RecordingState::Idle,
        }
    }

    pub fn state(&self) -> &RecordingState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording { .. })
    }

    /// Begin a new recording, replacing any finished one
    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.is_recording() {
            return Err(AudioError::AlreadyRecording);
        }
        self.state = RecordingState::Recording { chunks: Vec::new() };
        Ok(())
    }

    pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), AudioError> {
        match &mut self.state {
            RecordingState::Recording { chunks } => {
                chunks.push(chunk.to_vec());
                Ok(())
            }
            _ => Err(AudioError::NotRecording),
        }
    }

    /// Finish recording and return the local URL of the result
    pub fn stop(&mut self) -> Result<&str, AudioError> {
        let chunks = match std::mem::take(&mut self.state) {
            RecordingState::Recording { chunks } => chunks,
            other => {
                self.state = other;
                return Err(AudioError::NotRecording);
            }
        };

        let blob = chunks.concat();
        let url = format!("blob:{}/{}", self.origin, Uuid::new_v4());
        tracing::debug!("Audio note recorded: {} bytes at {}", blob.len(), url);

        self.state = RecordingState::Recorded { blob, url };
        Ok(self.url().unwrap_or_default())
    }

    pub fn discard(&mut self) {
        self.state = RecordingState::Idle;
    }

    pub fn url(&self) -> Option<&str> {
        match &self.state {
            RecordingState::Recorded { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn blob(&self) -> Option<&[u8]> {
        match &self.state {
            RecordingState::Recorded { blob, .. } => Some(blob),
            _ => None,
        }
    }
}
