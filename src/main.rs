//! blockstack - vertical block stacking with debounced persistence
//!
//! Headless driver: restores the saved stack, replays a command script and
//! prints the resulting stack.

mod command_script;
mod commands;
mod config;
mod headless;

use anyhow::Result;
use config::{AppConfig, DEFAULT_BLOCKS_PATH, DEFAULT_CONFIG_PATH, DEFAULT_STORE_DIR};
use headless::HeadlessConfig;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting blockstack v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    if cli.help {
        print_usage();
        return Ok(());
    }

    let mut app = AppConfig::load_from_path(&cli.config);
    if cli.immersive {
        app.display.immersive = true;
    }

    let lines = headless::run(HeadlessConfig {
        app,
        blocks_path: cli.blocks,
        store_dir: cli.store_dir,
        command_script: cli.script,
        event_log: cli.event_log,
        reset: cli.reset,
    })?;
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn print_usage() {
    println!(
        "Usage: blockstack [--config <toml>] [--blocks <json>] [--store-dir <dir>] \
         [--script <json>] [--event-log <jsonl>] [--immersive] [--reset]"
    );
}

#[derive(Clone)]
struct CliOptions {
    config: PathBuf,
    blocks: PathBuf,
    store_dir: PathBuf,
    script: Option<PathBuf>,
    event_log: Option<PathBuf>,
    immersive: bool,
    reset: bool,
    help: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            blocks: PathBuf::from(DEFAULT_BLOCKS_PATH),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            script: None,
            event_log: None,
            immersive: false,
            reset: false,
            help: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => match args.next() {
                    Some(path) => opts.config = PathBuf::from(path),
                    None => tracing::error!("--config requires a file path"),
                },
                "--blocks" => match args.next() {
                    Some(path) => opts.blocks = PathBuf::from(path),
                    None => tracing::error!("--blocks requires a file path"),
                },
                "--store-dir" => match args.next() {
                    Some(path) => opts.store_dir = PathBuf::from(path),
                    None => tracing::error!("--store-dir requires a directory path"),
                },
                "--script" => match args.next() {
                    Some(path) => opts.script = Some(PathBuf::from(path)),
                    None => tracing::error!("--script requires a file path"),
                },
                "--event-log" => match args.next() {
                    Some(path) => opts.event_log = Some(PathBuf::from(path)),
                    None => tracing::error!("--event-log requires a file path"),
                },
                "--immersive" => opts.immersive = true,
                "--reset" => opts.reset = true,
                "--help" | "-h" => opts.help = true,
                other => tracing::warn!(arg = %other, "Ignoring unknown argument"),
            }
        }

        opts
    }
}
