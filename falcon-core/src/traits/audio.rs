//! Audio output trait
//!
//! The soundtrack is played by an external process; the controller only
//! starts it with the show and stops it on every exit path.

/// Audio start failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioError {
    /// Player could not be started
    #[error("audio player could not be started")]
    Spawn,
    /// Audio file is missing
    #[error("audio file not found")]
    NotFound,
}

/// Soundtrack output
pub trait AudioOutput {
    /// Start playing from the beginning
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop playback; a no-op when nothing is playing
    fn stop(&mut self);

    /// Check if audio is currently playing
    fn is_playing(&mut self) -> bool;
}

/// Silent audio output for shows without a soundtrack
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAudio;

impl AudioOutput for NoAudio {
    fn start(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn is_playing(&mut self) -> bool {
        false
    }
}

/// Optional soundtrack; `None` behaves like [`NoAudio`]
impl<T: AudioOutput> AudioOutput for Option<T> {
    fn start(&mut self) -> Result<(), AudioError> {
        match self {
            Some(audio) => audio.start(),
            None => Ok(()),
        }
    }

    fn stop(&mut self) {
        if let Some(audio) = self {
            audio.stop();
        }
    }

    fn is_playing(&mut self) -> bool {
        self.as_mut().is_some_and(|audio| audio.is_playing())
    }
}

impl<T: AudioOutput + ?Sized> AudioOutput for &mut T {
    fn start(&mut self) -> Result<(), AudioError> {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_playing(&mut self) -> bool {
        (**self).is_playing()
    }
}
