//! Scoped ownership of the outputs during a run
//!
//! [`RunGuard`] borrows the actuator port and the audio output for the
//! duration of a run. Draining happens explicitly on normal exit and from
//! `Drop` on any other path, including unwinding out of a port call.

use crate::traits::{ActuatorPort, AudioOutput};

/// Outputs held by a running show
pub struct RunGuard<'a, P: ActuatorPort, A: AudioOutput> {
    port: &'a mut P,
    audio: &'a mut A,
    drained: bool,
}

impl<'a, P: ActuatorPort, A: AudioOutput> RunGuard<'a, P, A> {
    /// Take the outputs for a run
    pub fn new(port: &'a mut P, audio: &'a mut A) -> Self {
        Self {
            port,
            audio,
            drained: false,
        }
    }

    /// Actuator port
    pub fn port(&mut self) -> &mut P {
        self.port
    }

    /// Audio output
    pub fn audio(&mut self) -> &mut A {
        self.audio
    }

    /// Force outputs off and stop audio
    pub fn drain(&mut self) {
        self.port.all_off();
        self.audio.stop();
        self.drained = true;
    }
}

impl<P: ActuatorPort, A: AudioOutput> Drop for RunGuard<'_, P, A> {
    fn drop(&mut self) {
        if !self.drained {
            tracing::warn!("run left without draining, forcing outputs off");
            self.drain();
        }
    }
}
