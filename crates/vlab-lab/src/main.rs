#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::Parser;
use vlab_lab::{HostOptions, LabConfig, LabError, host, init_tracing};

#[derive(Debug, Parser)]
#[command(
    name = "vlab",
    about = "Valentine Interactive Lab in the terminal: type commands, watch the page",
    version
)]
struct Cli {
    /// TOML or JSON page configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for particle and escape-game randomness.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable entrance animations.
    #[arg(long)]
    no_motion: bool,

    /// Show every card immediately instead of simulating a viewport.
    #[arg(long)]
    reveal_all: bool,

    /// Log JSON lines to stderr.
    #[arg(long)]
    log_json: bool,

    /// Escape-zone width in pixels.
    #[arg(long)]
    width: Option<f64>,

    /// Escape-zone height in pixels.
    #[arg(long)]
    height: Option<f64>,
}

impl Cli {
    fn load_config(&self) -> Result<LabConfig, LabError> {
        let mut config = match &self.config {
            Some(path) => LabConfig::from_file(path)?,
            None => LabConfig::default(),
        };
        if self.no_motion {
            config.motion.enabled = false;
        }
        if self.log_json {
            config.logging.json = true;
        }
        if let Some(width) = self.width {
            config.layout.escape_zone.width = width;
        }
        if let Some(height) = self.height {
            config.layout.escape_zone.height = height;
        }
        Ok(config.validated()?)
    }
}

fn run(cli: Cli) -> Result<(), LabError> {
    let config = cli.load_config()?;
    init_tracing(&config.logging);
    host::run(
        config,
        HostOptions {
            seed: cli.seed,
            reveal_all: cli.reveal_all,
        },
    )
}

fn main() {
    if let Err(error) = run(Cli::parse()) {
        eprintln!("vlab: {error}");
        std::process::exit(error.exit_code());
    }
}
