//! Command line entry point: chart validation and headless rounds.

use beatline::input::manager::InputManager;
use beatline::input::{Autoplay, InputSource, KeyboardInput, NoInput, start_stdin_thread};
use beatline::logic::audio::AudioManager;
use beatline::logic::audio_thread::start_audio_thread;
use beatline::logic::clock::TransportClock;
use beatline::logic::{RunOptions, run_round};
use beatline::models::engine::{Chart, Direction};
use beatline::models::settings::GameSettings;
use beatline::render::{LayeredRenderCache, Palette, ScreenLayout};
use beatline::state::GameEngine;
use beatline::system::bus::AudioBus;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "beatline", about = "Four-lane arrow rhythm game judgment engine")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a chart, then print what it contains.
    Check {
        /// Path to a chart JSON file.
        chart: PathBuf,
    },
    /// Play a chart headlessly and report the result.
    Play {
        /// Path to a chart JSON file.
        chart: PathBuf,

        /// Path to a TOML settings file.
        #[arg(long, env = "BEATLINE_CONFIG", default_value = "beatline.toml")]
        config: PathBuf,

        /// Press every note exactly on its onset.
        #[arg(long, conflicts_with = "stdin_keys")]
        autoplay: bool,

        /// Read key labels from stdin, one per line.
        #[arg(long)]
        stdin_keys: bool,

        /// Play this audio file and follow its playback time.
        #[arg(long)]
        audio: Option<PathBuf>,

        /// Write the last composed frame as PNG.
        #[arg(long)]
        frame_out: Option<PathBuf>,

        /// Pace ticks against the wall clock.
        #[arg(long)]
        realtime: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let result = match args.command {
        Command::Check { chart } => check(&chart),
        Command::Play {
            chart,
            config,
            autoplay,
            stdin_keys,
            audio,
            frame_out,
            realtime,
        } => play(PlayArgs {
            chart,
            config,
            autoplay,
            stdin_keys,
            audio,
            frame_out,
            realtime,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("MAIN: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn check(path: &Path) -> Result<(), Box<dyn Error>> {
    let chart = Chart::load(path)?;

    println!("title:  {}", chart.title());
    println!("bpm:    {}", chart.bpm());
    println!("notes:  {}", chart.len());
    for direction in Direction::ALL {
        println!("  {:<6}{}", direction.name(), chart.count_for(direction));
    }
    match chart.last_onset() {
        Some(onset) => println!("last onset: {:.2} beats", onset),
        None => println!("last onset: -"),
    }
    Ok(())
}

struct PlayArgs {
    chart: PathBuf,
    config: PathBuf,
    autoplay: bool,
    stdin_keys: bool,
    audio: Option<PathBuf>,
    frame_out: Option<PathBuf>,
    realtime: bool,
}

fn play(args: PlayArgs) -> Result<(), Box<dyn Error>> {
    let settings = GameSettings::load_or_default(&args.config)?;
    let chart = Arc::new(Chart::load(&args.chart)?);
    let layout = ScreenLayout::new(settings.display.screen_width, settings.display.screen_height)?;
    let mut cache = LayeredRenderCache::new(layout, Palette::default());

    let mut audio = None;
    let mut engine = match &args.audio {
        Some(track) => {
            let bus = AudioBus::new();
            let mut manager = AudioManager::new(&bus);
            let control = AudioManager::new(&bus);
            manager.set_volume(settings.playback.volume);
            let handle = start_audio_thread(bus);
            let clock = TransportClock::with_audio(&chart, Box::new(manager));
            let mut engine = GameEngine::new(chart.clone(), &settings, clock);
            engine.start(track);
            audio = Some((control, handle));
            engine
        }
        None => GameEngine::with_frame_clock(chart.clone(), &settings),
    };

    let mut input: Box<dyn InputSource> = if args.autoplay {
        Box::new(Autoplay::new(chart.clone()))
    } else if args.stdin_keys {
        let (tx, rx) = crossbeam_channel::unbounded();
        // Never joined: the reader blocks on stdin until end of input.
        let _stdin = start_stdin_thread(tx);
        Box::new(KeyboardInput::new(InputManager::new(&settings.keybinds), rx))
    } else {
        Box::new(NoInput)
    };

    let options = RunOptions::new(
        settings.playback.ticks_per_second,
        args.realtime || args.stdin_keys || audio.is_some(),
    );
    let (summary, frame) = run_round(&mut engine, input.as_mut(), &mut cache, &options);

    if let Some((mut control, handle)) = audio {
        if !engine.clock().follows_audio() {
            log::warn!("AUDIO: No audio output, the round was timed by logic ticks");
        }
        control.stop();
        control.shutdown();
        if handle.join().is_err() {
            log::warn!("AUDIO: Thread panicked during shutdown");
        }
    }

    log::info!(
        "MAIN: {} finished with score {} (max streak {}, health {}/{})",
        summary.title,
        summary.score,
        summary.max_streak,
        summary.health,
        summary.health_max
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(path) = &args.frame_out {
        frame.save_png(path)?;
    }
    Ok(())
}
