use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use pocketboy::RunConfig;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// DMG emulator
#[derive(Parser, Debug)]
#[command(name = "pocketboy", version, about, long_about = None)]
struct Args {
    /// Path to a no-mapper (type 0x00) cartridge image
    rom: PathBuf,

    /// Scale factor for the frame dump
    #[arg(short, long, default_value_t = 1)]
    scale: u32,

    /// Log level; RUST_LOG overrides it
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Step one instruction per line on stdin, 'q' to stop
    #[arg(short, long)]
    debug: bool,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Write the last frame as a PGM image
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Run as fast as possible
    #[arg(long)]
    no_throttle: bool,
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let config = RunConfig::builder()
        .rom(args.rom)
        .scale(args.scale)
        .debug(args.debug)
        .frames(args.frames)
        .dump(args.dump)
        .throttle(!args.no_throttle)
        .build();

    if let Err(err) = pocketboy::run(config) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
