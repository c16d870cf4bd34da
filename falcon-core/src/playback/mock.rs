//! Simulated time, port and audio for controller tests

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use embassy_time::{Duration, Instant};
use falcon_hal::Rgb;

use crate::traits::{
    ActuatorPort, AudioError, AudioOutput, Capabilities, Channel, ChannelSet, Clock, PortError,
};

/// Shared simulated time in microseconds
#[derive(Debug, Clone, Default)]
pub(crate) struct SimTime(Rc<Cell<u64>>);

impl SimTime {
    pub(crate) fn now(&self) -> Instant {
        Instant::from_micros(self.0.get())
    }

    pub(crate) fn millis(&self) -> u64 {
        self.0.get() / 1000
    }

    pub(crate) fn advance(&self, duration: Duration) {
        self.0.set(self.0.get() + duration.as_micros());
    }
}

/// Clock that advances simulated time on sleep
pub(crate) struct FakeClock {
    pub(crate) time: SimTime,
    pub(crate) sleeps: Vec<Duration>,
    /// Extra time added to every sleep (scheduling overrun)
    pub(crate) overrun: Duration,
}

impl FakeClock {
    pub(crate) fn new(time: SimTime) -> Self {
        Self {
            time,
            sleeps: Vec::new(),
            overrun: Duration::from_ticks(0),
        }
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.time.now()
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        self.time.advance(duration + self.overrun);
    }
}

/// Recording actuator port
pub(crate) struct MockPort {
    pub(crate) caps: Capabilities,
    pub(crate) values: [f32; 4],
    pub(crate) pixels: Vec<Rgb>,
    pub(crate) channel_writes: Vec<(Channel, f32)>,
    pub(crate) strip_writes: usize,
    pub(crate) all_off_calls: usize,
    /// Trigger reads high until this time (ms); `None` = held forever
    pub(crate) held_until_ms: Option<u64>,
    pub(crate) trigger_pressed: bool,
    /// Fail the strip write with this index (0-based count of writes)
    pub(crate) fail_strip_write: Option<usize>,
    pub(crate) time: SimTime,
}

impl MockPort {
    pub(crate) fn new(strip_len: usize) -> Self {
        Self::with_time(strip_len, SimTime::default())
    }

    pub(crate) fn with_time(strip_len: usize, time: SimTime) -> Self {
        Self {
            caps: Capabilities {
                channels: ChannelSet::full(),
                strip_len,
            },
            values: [0.0; 4],
            pixels: alloc::vec![Rgb::default(); strip_len],
            channel_writes: Vec::new(),
            strip_writes: 0,
            all_off_calls: 0,
            held_until_ms: None,
            trigger_pressed: true,
            fail_strip_write: None,
            time,
        }
    }

    pub(crate) fn value(&self, channel: Channel) -> f32 {
        self.values[channel.index()]
    }

    pub(crate) fn is_dark(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0) && self.pixels.iter().all(|p| *p == Rgb::default())
    }
}

impl ActuatorPort for MockPort {
    fn capabilities(&self) -> Capabilities {
        self.caps.clone()
    }

    fn set_channel(&mut self, channel: Channel, value: f32) -> Result<(), PortError> {
        if !self.caps.channels.contains(channel) {
            return Err(PortError::UnsupportedChannel(channel));
        }
        self.values[channel.index()] = value;
        self.channel_writes.push((channel, value));
        Ok(())
    }

    fn set_strip_pixels(&mut self, colors: &[Rgb]) -> Result<(), PortError> {
        if colors.len() > self.caps.strip_len {
            return Err(PortError::StripLength {
                pixels: colors.len(),
                strip_len: self.caps.strip_len,
            });
        }
        if self.fail_strip_write == Some(self.strip_writes) {
            return Err(PortError::Hardware);
        }
        self.strip_writes += 1;
        for (i, pixel) in self.pixels.iter_mut().enumerate() {
            *pixel = colors.get(i).copied().unwrap_or_default();
        }
        Ok(())
    }

    fn is_start_requested(&mut self) -> bool {
        match self.held_until_ms {
            Some(until) => self.trigger_pressed && self.time.millis() < until,
            None => self.trigger_pressed,
        }
    }

    fn all_off(&mut self) {
        self.all_off_calls += 1;
        self.values = [0.0; 4];
        for pixel in &mut self.pixels {
            *pixel = Rgb::default();
        }
    }
}

/// Recording audio output
#[derive(Debug, Default)]
pub(crate) struct MockAudio {
    pub(crate) starts: usize,
    pub(crate) stops: usize,
    pub(crate) playing: bool,
    pub(crate) fail_start: bool,
}

impl AudioOutput for MockAudio {
    fn start(&mut self) -> Result<(), AudioError> {
        if self.fail_start {
            return Err(AudioError::Spawn);
        }
        self.starts += 1;
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.playing = false;
    }

    fn is_playing(&mut self) -> bool {
        self.playing
    }
}
