use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};

use sink_rotator::logging::{self, LoggingConfig};
use sink_rotator::{ConfigLoader, PROGRAM_TAG, PulseAudioServer, SessionOutcome, rotate_with_watchdog};

#[derive(Parser)]
#[command(name = "sink-rotator")]
#[command(about = "Switch the PulseAudio default sink to the next one and move all playing streams to it")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// PulseAudio server to connect to (overrides the configuration)
    #[arg(short, long)]
    server: Option<String>,

    /// Write the default configuration file and exit without rotating
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", PROGRAM_TAG, e);
            1
        }
    };

    // Exit directly: a hung server may still hold the blocking thread.
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let loader = ConfigLoader::for_path(cli.config.as_deref())?;
    if cli.init_config {
        loader.write_default_config()?;
        println!("Wrote {}", loader.get_config_path().display());
        return Ok(0);
    }
    let config = loader.load_config()?;

    let _guard = logging::initialize_logging(LoggingConfig::from_general(
        &config.general,
        cli.verbose,
    )?)?;
    debug!("Configuration loaded from {}", loader.get_config_path().display());
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    let server = cli.server.or_else(|| config.general.server.clone());
    let outcome = rotate_with_watchdog(
        move || PulseAudioServer::new(server),
        config.exclusion_set(),
        config.general.timeout(),
    )
    .await?;

    match &outcome {
        SessionOutcome::Terminated { rotation: Some(report) } => info!("Done: {}", report),
        SessionOutcome::Terminated { rotation: None } => info!("Connection closed, nothing rotated"),
        SessionOutcome::NoTarget(reason) => info!("No rotation: {}", reason),
    }

    Ok(outcome.exit_code())
}
