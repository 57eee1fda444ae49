//! Ash - desktop companion robot
//!
//! Listens through the microphone (or the console), asks a cloud language
//! model, and answers with speech, a face on the LCD and arm gestures.
//!
//! # Usage
//!
//! ```bash
//! # Voice input when a microphone is present
//! GEMINI_API_KEY=... ash
//!
//! # Typed input only
//! ash --text
//!
//! # Explicit configuration file
//! ash --config /etc/ash/robot.toml
//!
//! # Verbose logging
//! RUST_LOG=debug ash
//! ```
//!
//! Ctrl-C ends the session through the normal shutdown (farewell, arms
//! reset, display off), also while waiting at the `You:` prompt. A second
//! Ctrl-C exits immediately.

mod audio;
mod config;
mod console;
mod llm;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use ash_core::config::{RobotConfig, ServoConfig};
use ash_core::traits::{ArmGestures, ThreadPacer};
use ash_core::{Collaborators, Robot, RobotSettings};
use ash_drivers::servo::{ArmController, Pca9685};
use ash_face::{choose, open_backend, Face, FaceCache, SelectPaths};
use ash_hal_linux::{open_i2c, Delay};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use audio::Audio;
use console::StdinConsole;
use llm::GeminiClient;

const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Exit status after a forced second interrupt
const FORCED_EXIT: i32 = 130;

/// Ash desktop companion robot
#[derive(Parser, Debug)]
#[command(name = "ash")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use typed input instead of the microphone
    #[arg(long = "text", visible_alias = "text-only")]
    text: bool,

    /// Configuration file path
    #[arg(short = 'c', long, env = "ASH_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupt);
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(FORCED_EXIT);
        }
        info!("Interrupt received, finishing current step");
    })
    .context("Failed to install Ctrl-C handler")?;
    Ok(interrupt)
}

fn open_arms(servos: &ServoConfig) -> Box<dyn ArmGestures> {
    let board = match open_i2c(servos.i2c_bus) {
        Ok(i2c) => Some(Pca9685::new(i2c, servos.i2c_address)),
        Err(e) => {
            warn!("Servo bus unavailable: {}", e);
            None
        }
    };
    Box::new(ArmController::new(board, Delay, servos.clone()))
}

fn build(config: &RobotConfig, api_key: String, interrupt: &Arc<AtomicBool>) -> Result<Collaborators> {
    let display = &config.display;
    let choice = choose(&SelectPaths::from_config(display));
    info!(?choice, "Face output selected");
    let cache = FaceCache::load(
        &display.faces_directory,
        display.resolution.width,
        display.resolution.height,
    );
    let face = Face::new(open_backend(display, choice), cache);

    let speech_key = crate::config::api_key(std::env::var(audio::recognizer::SPEECH_KEY_VAR).ok());
    let model = GeminiClient::connect(&config.llm, api_key)
        .context("Failed to create language model client")?;

    Ok(Collaborators {
        face: Box::new(face),
        arms: open_arms(&config.servos),
        voice: Box::new(Audio::new(&config.audio, speech_key)),
        console: Box::new(StdinConsole::stdin(Arc::clone(interrupt))),
        model: Box::new(model),
        pacer: Box::new(ThreadPacer),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    info!(version = env!("CARGO_PKG_VERSION"), "Ash starting");

    let workdir = std::env::current_dir().context("Failed to resolve working directory")?;
    let (config, _) = config::load(args.config.as_deref(), &workdir)?;

    let api_key = config::api_key(std::env::var(API_KEY_VAR).ok()).with_context(|| {
        format!(
            "{API_KEY_VAR} is not set. Get a key from https://aistudio.google.com/app/apikey \
             and export it, e.g. `export {API_KEY_VAR}=<your key>`"
        )
    })?;

    let interrupt = install_interrupt_handler()?;
    let parts = build(&config, api_key, &interrupt)?;
    let settings = RobotSettings::from_config(&config.main, args.text);

    let mut robot = Robot::new(parts, settings, interrupt);
    robot.run();

    info!("Ash stopped");
    Ok(())
}
