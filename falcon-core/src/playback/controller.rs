//! Playback controller
//!
//! Drives the state machine and the real-time loop:
//!
//! - `Idle`: sample the trigger; arm once it is pressed and the previous
//!   run's re-arm latch has been cleared by a release
//! - `Running`: each tick maps elapsed time to a step, writes the step if
//!   it changed, then sleeps until the next boundary or one quantum,
//!   whichever comes first
//! - `Draining`: force outputs off, stop audio, latch re-arm
//!
//! Completion, trigger release and termination are checked on every tick
//! in that order.

use embassy_time::Duration;
use heapless::Vec;

use super::guard::RunGuard;
use super::session::{PlaybackSession, RunOutcome, RunReport};
use crate::config::{ConfigError, EngineConfig};
use crate::error::RunError;
use crate::output::Compensator;
use crate::safety::CancellationSource;
use crate::scheduler::{step_index_for, step_start};
use crate::sequence::SequenceTable;
use crate::state::{Event, State};
use crate::traits::{ActuatorPort, AudioOutput, Capabilities, Channel, Clock};

/// Counts of runs handled by [`PlaybackController::serve`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    /// Runs started
    pub runs: usize,
    /// Runs that played every step
    pub completed: usize,
    /// Runs stopped by trigger release or termination
    pub cancelled: usize,
    /// Runs aborted by a fault
    pub faulted: usize,
}

impl ServeSummary {
    fn record(&mut self, report: &RunReport) {
        self.runs += 1;
        if report.outcome.event().is_fault() {
            self.faulted += 1;
        } else if report.outcome.is_cancelled() {
            self.cancelled += 1;
        } else {
            self.completed += 1;
        }
    }
}

/// Real-time show controller
///
/// Owns the port, audio output and clock exclusively; borrows the table,
/// which may be shared by any number of sequential controllers.
pub struct PlaybackController<'t, P, A, C, X> {
    table: &'t SequenceTable,
    port: P,
    audio: A,
    clock: C,
    termination: X,
    config: EngineConfig,
    compensator: Compensator,
    state: State,
    rearm_pending: bool,
}

impl<'t, P, A, C, X> PlaybackController<'t, P, A, C, X>
where
    P: ActuatorPort,
    A: AudioOutput,
    C: Clock,
    X: CancellationSource,
{
    /// Create a controller in `Idle`
    pub fn new(
        table: &'t SequenceTable,
        port: P,
        audio: A,
        clock: C,
        termination: X,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let compensator = Compensator::new(config.compensation_base)?;

        Ok(Self {
            table,
            port,
            audio,
            clock,
            termination,
            config,
            compensator,
            state: State::Idle,
            rearm_pending: false,
        })
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Check if a release must be seen before the next run can arm
    pub fn rearm_pending(&self) -> bool {
        self.rearm_pending
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Actuator port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Release the owned resources
    pub fn into_parts(self) -> (P, A, C, X) {
        (self.port, self.audio, self.clock, self.termination)
    }

    /// One supervisory step
    ///
    /// Samples the trigger and, if a run arms, plays it to the end before
    /// returning its report.
    pub fn poll(&mut self) -> Option<RunReport> {
        if self.termination.is_requested() {
            return None;
        }

        let pressed = self.port.is_start_requested();
        if !pressed {
            if self.rearm_pending {
                tracing::debug!("trigger released, ready to re-arm");
                self.rearm_pending = false;
            }
            return None;
        }

        if self.rearm_pending || self.state.is_active() {
            return None;
        }

        advance(&mut self.state, Event::TriggerPressed);
        tracing::info!("trigger pressed, show armed");
        Some(self.play())
    }

    /// Play the show once from step 0
    pub fn play(&mut self) -> RunReport {
        if self.state == State::Idle {
            advance(&mut self.state, Event::TriggerPressed);
        }
        advance(&mut self.state, Event::Start);

        let table = self.table;
        let config = self.config;
        let compensator = self.compensator;

        let mut guard = RunGuard::new(&mut self.port, &mut self.audio);
        if let Err(err) = guard.audio().start() {
            tracing::warn!(error = %err, "audio did not start, playing silently");
        }

        let mut session = PlaybackSession::new(self.clock.now());
        tracing::info!(
            steps = table.len(),
            duration_ms = table.duration(config.step_duration_ms).as_millis(),
            "show started"
        );

        let outcome = run_loop(
            self.state,
            &mut guard,
            &mut self.clock,
            &self.termination,
            table,
            &compensator,
            &config,
            &mut session,
        );
        session.cancelled = outcome.is_cancelled();
        log_outcome(&outcome, &session, table.len());

        advance(&mut self.state, outcome.event());
        guard.drain();
        drop(guard);
        advance(&mut self.state, Event::Drained);
        self.rearm_pending = true;

        let elapsed = self
            .clock
            .now()
            .checked_duration_since(session.start)
            .unwrap_or(Duration::from_ticks(0));

        RunReport {
            outcome,
            current_step_index: session.current_step_index,
            steps_applied: session.steps_applied,
            elapsed,
        }
    }

    /// Poll until termination is requested
    pub fn serve(&mut self) -> ServeSummary {
        let idle = Duration::from_millis(u64::from(self.config.idle_poll_ms));
        let mut summary = ServeSummary::default();

        tracing::info!("waiting for trigger");
        while !self.termination.is_requested() {
            match self.poll() {
                Some(report) => summary.record(&report),
                None => self.clock.sleep(idle),
            }
        }

        self.port.all_off();
        tracing::info!(
            runs = summary.runs,
            completed = summary.completed,
            cancelled = summary.cancelled,
            faulted = summary.faulted,
            "stopping gracefully"
        );
        summary
    }
}

/// Apply an event to the state, tracing real transitions
fn advance(state: &mut State, event: Event) {
    let next = state.transition(event);
    if next != *state {
        tracing::trace!(from = ?state, to = ?next, event = ?event, "state transition");
    }
    *state = next;
}

/// Running state: tick until the run ends
fn run_loop<P, A, C, X>(
    state: State,
    guard: &mut RunGuard<'_, P, A>,
    clock: &mut C,
    termination: &X,
    table: &SequenceTable,
    compensator: &Compensator,
    config: &EngineConfig,
    session: &mut PlaybackSession,
) -> RunOutcome
where
    P: ActuatorPort,
    A: AudioOutput,
    C: Clock,
    X: CancellationSource,
{
    let caps = guard.port().capabilities();
    for channel in Channel::ALL {
        if !caps.channels.contains(channel) {
            tracing::debug!(%channel, "channel not wired on this rig, skipping");
        }
    }

    let step_ms = config.step_duration_ms;
    let quantum = Duration::from_millis(u64::from(config.tick_quantum_ms));
    let len = table.len();

    loop {
        let elapsed = clock
            .now()
            .checked_duration_since(session.start)
            .unwrap_or(Duration::from_ticks(0));
        let index = session.observe(step_index_for(elapsed, step_ms), len);

        if index >= len {
            return RunOutcome::Completed;
        }
        if !guard.port().is_start_requested() {
            return RunOutcome::TriggerReleased;
        }
        if termination.is_requested() {
            return RunOutcome::Terminated;
        }

        if session.applied_step != Some(index) && state.outputs_allowed() {
            if let Some(skipped) = session.applied_step.map(|last| index - last - 1) {
                if skipped > 0 {
                    tracing::debug!(index, skipped, "late tick, skipped steps");
                }
            }
            if let Err(err) = apply_step(guard.port(), &caps, table, index, compensator) {
                return RunOutcome::Faulted(err);
            }
            session.applied_step = Some(index);
            session.steps_applied += 1;
        }

        let until_boundary = step_start(index + 1, step_ms)
            .checked_sub(elapsed)
            .unwrap_or(Duration::from_ticks(0));
        clock.sleep(until_boundary.min(quantum));
    }
}

/// Write one step to the port
///
/// All values are validated and compensated before the first write, so a
/// bad step never reaches the outputs partially.
fn apply_step<P: ActuatorPort>(
    port: &mut P,
    caps: &Capabilities,
    table: &SequenceTable,
    index: usize,
    compensator: &Compensator,
) -> Result<(), RunError> {
    let Some(step) = table.get(index) else {
        return Ok(());
    };

    let pixels = step.drive_pixels.len();
    if pixels != table.drive_led_count() {
        return Err(RunError::MalformedStep {
            step: index,
            pixels,
            expected: table.drive_led_count(),
        });
    }
    if caps.strip_len > 0 && pixels > caps.strip_len {
        return Err(RunError::PixelIndexOutOfRange {
            step: index,
            pixels,
            strip_len: caps.strip_len,
        });
    }

    let mut values: Vec<(Channel, f32), 4> = Vec::new();
    for channel in caps.channels.iter() {
        let value = compensator
            .compensate(step.channel(channel))
            .map_err(|source| RunError::ChannelOutOfRange {
                step: index,
                source,
            })?;
        // At most one entry per channel
        let _ = values.push((channel, value));
    }

    for (channel, value) in values {
        port.set_channel(channel, value)?;
    }
    if caps.strip_len > 0 {
        port.set_strip_pixels(&step.drive_pixels)?;
    }
    Ok(())
}

fn log_outcome(outcome: &RunOutcome, session: &PlaybackSession, len: usize) {
    match outcome {
        RunOutcome::Completed => {
            tracing::info!(steps = len, applied = session.steps_applied, "show completed")
        }
        RunOutcome::TriggerReleased => tracing::info!(
            step = session.current_step_index,
            "trigger released, stopping show"
        ),
        RunOutcome::Terminated => tracing::info!(
            step = session.current_step_index,
            "received signal to stop, stopping show"
        ),
        RunOutcome::Faulted(err) => tracing::error!(
            step = session.current_step_index,
            error = %err,
            "show aborted"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::mock::{FakeClock, MockAudio, MockPort, SimTime};
    use crate::safety::{CancelFlag, FnSource, Never};
    use crate::sequence::SequenceStep;
    use crate::traits::{ChannelSet, PortError};
    use alloc::vec;
    use alloc::vec::Vec as StdVec;
    use falcon_hal::Rgb;

    const STEP_MS: u32 = 200;

    /// Five steps; step `i` has turret `i / 4` and one pixel `(i, i, i)`
    fn ramp_table() -> SequenceTable {
        let steps = (0..5)
            .map(|i| {
                SequenceStep::new(
                    [i as f32 / 4.0, 1.0, 0.0, 0.5],
                    vec![Rgb::new(i as u8, i as u8, i as u8)],
                )
            })
            .collect();
        SequenceTable::from_steps(1, steps).unwrap()
    }

    fn config() -> EngineConfig {
        EngineConfig {
            step_duration_ms: STEP_MS,
            tick_quantum_ms: 20,
            idle_poll_ms: 50,
            ..Default::default()
        }
    }

    fn rig(time: &SimTime) -> (MockPort, MockAudio, FakeClock) {
        (
            MockPort::with_time(1, time.clone()),
            MockAudio::default(),
            FakeClock::new(time.clone()),
        )
    }

    #[test]
    fn test_uninterrupted_run_completes() {
        let table = ramp_table();
        let time = SimTime::default();
        let (port, audio, clock) = rig(&time);
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();

        let report = ctrl.play();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.current_step_index, table.len());
        assert_eq!(report.steps_applied, 5);
        assert_eq!(report.elapsed, Duration::from_millis(1000));
        assert_eq!(ctrl.state(), State::Idle);
        assert!(ctrl.rearm_pending());

        let (port, audio, clock, _) = ctrl.into_parts();
        assert!(port.is_dark());
        assert_eq!(port.all_off_calls, 1);
        assert_eq!(port.strip_writes, 5);
        assert_eq!(audio.starts, 1);
        assert_eq!(audio.stops, 1);
        assert!(clock.sleeps.iter().all(|s| *s <= Duration::from_millis(20)));
    }

    #[test]
    fn test_steps_written_in_order_with_compensation() {
        let table = ramp_table();
        let time = SimTime::default();
        let (port, audio, clock) = rig(&time);
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();
        ctrl.play();

        let (port, ..) = ctrl.into_parts();
        let comp = Compensator::default();
        let turret: StdVec<f32> = port
            .channel_writes
            .iter()
            .filter(|(c, _)| *c == Channel::Turret)
            .map(|(_, v)| *v)
            .collect();
        let expected: StdVec<f32> = (0..5)
            .map(|i| comp.compensate(i as f32 / 4.0).unwrap())
            .collect();
        assert_eq!(turret, expected);
        // Cockpit at full intensity compensates to zero drive
        assert!(port
            .channel_writes
            .iter()
            .filter(|(c, _)| *c == Channel::Cockpit)
            .all(|(_, v)| v.abs() < 1e-5));
    }

    #[test]
    fn test_trigger_release_stops_run() {
        let table = ramp_table();
        let time = SimTime::default();
        let (mut port, audio, clock) = rig(&time);
        port.held_until_ms = Some(450);
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();

        let report = ctrl.play();

        assert_eq!(report.outcome, RunOutcome::TriggerReleased);
        assert_eq!(report.current_step_index, 2);
        assert!(report.current_step_index < table.len());
        // Released within one quantum
        assert!(report.elapsed <= Duration::from_millis(450 + 20));
        assert_eq!(ctrl.state(), State::Idle);

        let (port, audio, ..) = ctrl.into_parts();
        assert!(port.is_dark());
        assert!(!audio.playing);
    }

    #[test]
    fn test_termination_stops_run() {
        let table = ramp_table();
        let time = SimTime::default();
        let (port, audio, clock) = rig(&time);
        let probe = time.clone();
        let termination = FnSource(move || probe.millis() >= 300);
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, termination, config()).unwrap();

        let report = ctrl.play();

        assert_eq!(report.outcome, RunOutcome::Terminated);
        assert_eq!(report.current_step_index, 1);
        assert!(ctrl.port().is_dark());
    }

    #[test]
    fn test_overrun_jumps_to_current_step() {
        let table = ramp_table();
        let time = SimTime::default();
        let (port, audio, mut clock) = rig(&time);
        clock.overrun = Duration::from_millis(330);
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();

        let report = ctrl.play();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.current_step_index, 5);
        // Some steps were never shown, and those shown were in order
        assert!(report.steps_applied < 5);
        let (port, ..) = ctrl.into_parts();
        assert_eq!(port.strip_writes, report.steps_applied);
    }

    #[test]
    fn test_sleeps_align_to_boundaries() {
        let table = ramp_table();
        let time = SimTime::default();
        let (port, audio, clock) = rig(&time);
        let config = EngineConfig {
            tick_quantum_ms: 200,
            ..config()
        };
        let mut ctrl = PlaybackController::new(&table, port, audio, clock, Never, config).unwrap();

        ctrl.play();

        let (_, _, clock, _) = ctrl.into_parts();
        assert_eq!(clock.sleeps, vec![Duration::from_millis(200); 5]);
    }

    #[test]
    fn test_pixel_overflow_faults_without_partial_write() {
        let time = SimTime::default();
        let (port, audio, clock) = rig(&time);
        let steps = vec![SequenceStep::dark(2), SequenceStep::dark(2)];
        let wide = SequenceTable::from_steps(2, steps).unwrap();
        let mut ctrl = PlaybackController::new(&wide, port, audio, clock, Never, config()).unwrap();

        let report = ctrl.play();

        assert!(matches!(
            report.outcome,
            RunOutcome::Faulted(RunError::PixelIndexOutOfRange {
                step: 0,
                pixels: 2,
                strip_len: 1
            })
        ));
        assert_eq!(report.steps_applied, 0);
        let (port, ..) = ctrl.into_parts();
        assert!(port.channel_writes.is_empty());
        assert_eq!(port.all_off_calls, 1);
    }

    #[test]
    fn test_port_failure_aborts_to_safe_state() {
        let table = ramp_table();
        let time = SimTime::default();
        let (mut port, audio, clock) = rig(&time);
        port.fail_strip_write = Some(2);
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();

        let report = ctrl.play();

        assert_eq!(
            report.outcome,
            RunOutcome::Faulted(RunError::Port(PortError::Hardware))
        );
        assert_eq!(report.current_step_index, 2);
        assert_eq!(ctrl.state(), State::Idle);
        let (port, audio, ..) = ctrl.into_parts();
        assert!(port.is_dark());
        assert_eq!(audio.stops, 1);
    }

    #[test]
    fn test_unwired_channels_skipped() {
        let table = ramp_table();
        let time = SimTime::default();
        let (mut port, audio, clock) = rig(&time);
        port.caps.channels = ChannelSet::from_channels(&[Channel::Turret]);
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();

        let report = ctrl.play();

        assert_eq!(report.outcome, RunOutcome::Completed);
        let (port, ..) = ctrl.into_parts();
        assert!(port
            .channel_writes
            .iter()
            .all(|(c, _)| *c == Channel::Turret));
        assert_eq!(port.channel_writes.len(), 5);
    }

    #[test]
    fn test_rig_without_strip_skips_pixels() {
        let table = ramp_table();
        let time = SimTime::default();
        let (_, audio, clock) = rig(&time);
        let port = MockPort::with_time(0, time.clone());
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();

        assert_eq!(ctrl.play().outcome, RunOutcome::Completed);
        assert_eq!(ctrl.port().strip_writes, 0);
    }

    #[test]
    fn test_empty_table_completes_immediately() {
        let table = SequenceTable::from_steps(0, StdVec::new()).unwrap();
        let time = SimTime::default();
        let (port, audio, clock) = rig(&time);
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();

        let report = ctrl.play();
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.current_step_index, 0);
        assert_eq!(report.steps_applied, 0);
    }

    #[test]
    fn test_audio_failure_does_not_stop_show() {
        let table = ramp_table();
        let time = SimTime::default();
        let (port, mut audio, clock) = rig(&time);
        audio.fail_start = true;
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();

        assert_eq!(ctrl.play().outcome, RunOutcome::Completed);
    }

    #[test]
    fn test_held_trigger_does_not_restart() {
        let table = ramp_table();
        let time = SimTime::default();
        let (mut port, audio, clock) = rig(&time);
        port.held_until_ms = Some(1100);
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();

        let first = ctrl.poll().unwrap();
        assert_eq!(first.outcome, RunOutcome::Completed);

        // Still held after the show: no new run
        assert!(ctrl.poll().is_none());
        assert!(ctrl.rearm_pending());

        // Release clears the latch
        time.advance(Duration::from_millis(200));
        assert!(ctrl.poll().is_none());
        assert!(!ctrl.rearm_pending());
        assert_eq!(ctrl.state(), State::Idle);
    }

    #[test]
    fn test_no_run_while_released() {
        let table = ramp_table();
        let time = SimTime::default();
        let (mut port, audio, clock) = rig(&time);
        port.trigger_pressed = false;
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, Never, config()).unwrap();

        assert!(ctrl.poll().is_none());
        assert_eq!(ctrl.state(), State::Idle);
        let (port, audio, ..) = ctrl.into_parts();
        assert!(port.channel_writes.is_empty());
        assert_eq!(audio.starts, 0);
    }

    #[test]
    fn test_termination_blocks_arming() {
        let table = ramp_table();
        let time = SimTime::default();
        let (port, audio, clock) = rig(&time);
        let flag = CancelFlag::new();
        flag.request();
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, flag, config()).unwrap();

        assert!(ctrl.poll().is_none());
        assert_eq!(ctrl.state(), State::Idle);
    }

    #[test]
    fn test_serve_until_termination() {
        let table = ramp_table();
        let time = SimTime::default();
        let (port, audio, clock) = rig(&time);
        let flag = CancelFlag::new();
        let probe = time.clone();
        let handle = flag.clone();
        let termination = crate::safety::AnyOf(
            flag,
            FnSource(move || {
                if probe.millis() >= 3000 {
                    handle.request();
                }
                false
            }),
        );
        let mut ctrl =
            PlaybackController::new(&table, port, audio, clock, termination, config()).unwrap();

        let summary = ctrl.serve();

        // Trigger held the whole time: one run, then the latch holds
        assert_eq!(summary.runs, 1);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.cancelled, 0);
        assert_eq!(summary.faulted, 0);
        assert_eq!(ctrl.state(), State::Idle);
        assert!(time.millis() >= 3000);
        assert!(ctrl.port().is_dark());
    }

    #[test]
    fn test_summary_counts_outcomes() {
        let mut summary = ServeSummary::default();
        let report = |outcome| RunReport {
            outcome,
            current_step_index: 0,
            steps_applied: 0,
            elapsed: Duration::from_ticks(0),
        };

        summary.record(&report(RunOutcome::Completed));
        summary.record(&report(RunOutcome::TriggerReleased));
        summary.record(&report(RunOutcome::Terminated));
        summary.record(&report(RunOutcome::Faulted(RunError::Port(PortError::Hardware))));

        assert_eq!(
            summary,
            ServeSummary {
                runs: 4,
                completed: 1,
                cancelled: 2,
                faulted: 1,
            }
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let table = ramp_table();
        let time = SimTime::default();
        let (port, audio, clock) = rig(&time);
        let bad = EngineConfig {
            step_duration_ms: 0,
            ..config()
        };
        assert!(matches!(
            PlaybackController::new(&table, port, audio, clock, Never, bad),
            Err(ConfigError::ZeroStepDuration)
        ));
    }
}
