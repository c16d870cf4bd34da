//! Soundtrack played by an external program

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use falcon_core::traits::{AudioError, AudioOutput};

use crate::config::ShowConfig;

/// Audio file played through a child process (`aplay <file>` by default)
pub struct ProcessAudio {
    program: String,
    file: PathBuf,
    child: Option<Child>,
}

impl ProcessAudio {
    /// Create a new process-backed audio output
    pub fn new(program: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            file: file.into(),
            child: None,
        }
    }

    /// Audio output for a show, if it has a soundtrack
    pub fn from_config(show: &ShowConfig) -> Option<Self> {
        show.audio
            .as_ref()
            .map(|file| Self::new(show.audio_player.clone(), file.clone()))
    }
}

impl AudioOutput for ProcessAudio {
    fn start(&mut self) -> Result<(), AudioError> {
        self.stop();

        if !self.file.is_file() {
            tracing::warn!(file = %self.file.display(), "soundtrack not found");
            return Err(AudioError::NotFound);
        }

        let child = Command::new(&self.program)
            .arg(&self.file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                tracing::warn!(program = %self.program, error = %err, "cannot start audio player");
                AudioError::Spawn
            })?;

        tracing::debug!(pid = child.id(), "audio started");
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        // Already exited is fine
        let _ = child.kill();
        match child.wait() {
            Ok(status) => tracing::debug!(%status, "audio stopped"),
            Err(err) => tracing::warn!(error = %err, "cannot reap audio player"),
        }
    }

    fn is_playing(&mut self) -> bool {
        match self.child.as_mut().map(|child| child.try_wait()) {
            Some(Ok(None)) => true,
            Some(Ok(Some(_))) | Some(Err(_)) | None => false,
        }
    }
}

impl Drop for ProcessAudio {
    fn drop(&mut self) {
        self.stop();
    }
}
