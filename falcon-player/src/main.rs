//! Falcon show player service
//!
//! Loads the show, waits for the start trigger and plays the sequence in
//! sync with the soundtrack until SIGINT or SIGTERM.

mod audio;
mod backend;
mod clock;
mod config;
mod error;
mod logging;
mod signals;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use falcon_core::playback::{PlaybackController, RunOutcome};
use falcon_core::safety::CancelFlag;
use falcon_core::sequence::SequenceTable;
use falcon_core::traits::ActuatorPort;

use crate::audio::ProcessAudio;
use crate::clock::SystemClock;
use crate::config::PlayerConfig;
use crate::error::PlayerError;

#[derive(Parser)]
#[command(name = "falcon-service")]
#[command(about = "Plays the Millennium Falcon light and sound show")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "/etc/falcon/falcon.toml")]
    config: PathBuf,

    /// Play the show once right away, ignoring the trigger, then exit
    #[arg(long, conflicts_with = "validate")]
    once: bool,

    /// Check the configuration and sequence, print a summary and exit
    #[arg(long)]
    validate: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "falcon-service failed");
            eprintln!("falcon-service: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PlayerError> {
    let mut config = PlayerConfig::load(&cli.config)?;
    if !cli.validate {
        logging::init(&config.log)?;
    }
    tracing::info!(config = %cli.config.display(), "starting falcon-service");

    let table = load_sequence(&config)?;

    if cli.validate {
        print_summary(&config, &table);
        return Ok(());
    }

    let termination = CancelFlag::new();
    signals::spawn_listener(termination.clone())?;

    if cli.once {
        config.hardware.ignore_trigger();
    }
    let rig = backend::build_rig(&config.hardware);
    let audio = ProcessAudio::from_config(&config.show);

    let mut controller = PlaybackController::new(
        &table,
        rig,
        audio,
        SystemClock,
        termination,
        config.engine,
    )?;

    if cli.once {
        let report = controller.play();
        if let RunOutcome::Faulted(err) = report.outcome {
            tracing::warn!(error = %err, "show ended with a fault");
        }
    } else {
        controller.serve();
    }

    let (mut rig, ..) = controller.into_parts();
    rig.all_off();
    tracing::info!("stopping gracefully");
    Ok(())
}

fn load_sequence(config: &PlayerConfig) -> Result<SequenceTable, PlayerError> {
    let path = &config.show.sequence;
    SequenceTable::load(path).map_err(|source| PlayerError::Sequence {
        path: path.clone(),
        source,
    })
}

fn print_summary(config: &PlayerConfig, table: &SequenceTable) {
    let hardware = &config.hardware;
    println!("sequence:  {}", config.show.sequence.display());
    println!("steps:     {}", table.len());
    println!(
        "duration:  {:.1} s",
        table.duration(config.engine.step_duration_ms).as_millis() as f64 / 1000.0
    );
    println!("drive leds: {} (strip has {})", table.drive_led_count(), hardware.strip_length);
    let channels: Vec<String> = hardware.channel_set().iter().map(|c| c.to_string()).collect();
    println!("channels:  {}", channels.join(", "));
    match &config.show.audio {
        Some(audio) => println!("audio:     {} via {}", audio.display(), config.show.audio_player),
        None => println!("audio:     none"),
    }
    if hardware.strip_length > 0 && table.drive_led_count() > hardware.strip_length {
        println!("warning:   sequence drives more pixels than the strip has");
    }
}
