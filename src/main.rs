use std::fs::File;
use std::panic;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use metal_snake::clock::MonotonicClock;
use metal_snake::config::{FRAME_DELAY_MS, GameConfig, GameSpeed};
use metal_snake::driver::FrameDriver;
use metal_snake::error::Error;
use metal_snake::keyboard::KeyboardThread;
use metal_snake::mailbox::KeyMailbox;
use metal_snake::terminal_runtime::{TerminalSession, restore_terminal};
use tracing::{Level, error, info};
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(version, about = "Snake on a 640x480 RGB565 framebuffer")]
struct Cli {
    /// JSON config file (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base update speed.
    #[arg(long, value_enum)]
    speed: Option<GameSpeed>,

    /// Seed for food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Hide the grid lines.
    #[arg(long = "no-grid")]
    no_grid: bool,

    /// Draw straight into the visible buffer.
    #[arg(long = "single-buffer")]
    single_buffer: bool,

    /// Write logs to this file; nothing is logged otherwise.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log at debug level instead of info.
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("metal-snake: {error}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = &cli.log_file {
        if let Err(error) = setup_logging(path, cli.verbose) {
            eprintln!("metal-snake: cannot open log file {}: {error}", path.display());
            return ExitCode::FAILURE;
        }
    }

    install_panic_hook();

    match run(&config, cli.seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "exiting");
            eprintln!("metal-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig, Error> {
    let mut config = GameConfig::load(cli.config.as_deref())?;

    if let Some(speed) = cli.speed {
        config.speed = speed;
    }
    if cli.no_grid {
        config.show_grid = false;
    }
    if cli.single_buffer {
        config.double_buffer = false;
    }

    config.validate()?;
    Ok(config)
}

fn setup_logging(path: &Path, verbose: bool) -> std::io::Result<()> {
    let file = File::create(path)?;
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .finish()
        .init();

    Ok(())
}

fn run(config: &GameConfig, seed: Option<u64>) -> Result<(), Error> {
    let mailbox = Arc::new(KeyMailbox::with_debounce(config.debounce_ms));
    let clock = Arc::new(MonotonicClock::new());

    info!(
        grid_width = config.grid.width,
        grid_height = config.grid.height,
        cell_size = config.cell_size(),
        speed = ?config.speed,
        "starting"
    );

    let mut session = TerminalSession::enter()?;
    let keyboard = KeyboardThread::spawn(Arc::clone(&mailbox), Arc::clone(&clock))?;
    let mut driver = FrameDriver::new(config, mailbox, clock, seed);

    let result = driver.run(&mut session, Duration::from_millis(FRAME_DELAY_MS));
    keyboard.stop()?;
    result?;

    info!(score = driver.state().score, "final score");
    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}
