use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clothswap::{
    composer::extension_for_mime,
    logger::{self, LogLevel, LoggerConfig},
    models::decode_data_url,
    Composer, Config, SelectedFile, Slot, SwapBridge, TransportKind, ViewState,
};

#[derive(Parser)]
#[command(name = "clothswap", version, about = "Swap clothing between two photos with a hosted image model")]
struct Cli {
    /// Debug-level logging with file locations
    #[arg(long, global = true)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Also append log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP relay server
    #[cfg(feature = "server")]
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Put the garment from one photo onto the person in another
    Swap {
        #[arg(long)]
        person: PathBuf,
        #[arg(long)]
        clothing: PathBuf,
        /// Where to write the result; defaults to a timestamped file
        #[arg(long)]
        out: Option<PathBuf>,
        /// direct, relay or callable; overrides SWAP_TRANSPORT
        #[arg(long)]
        transport: Option<TransportKind>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let mut logger_config = if cli.verbose {
        LoggerConfig::development()
    } else {
        LoggerConfig::default()
    };
    if let Some(level) = std::env::var("RUST_LOG").ok().as_deref().and_then(LogLevel::parse) {
        logger_config = logger_config.with_level(level);
    }
    if cli.json_logs {
        logger_config = LoggerConfig::production().with_level(logger_config.min_level);
    }
    if let Some(path) = &cli.log_file {
        logger_config = logger_config.with_file_output(&path.to_string_lossy());
    }
    logger::init_with_config(logger_config)?;

    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    let config = Config::from_env();

    match cli.command {
        #[cfg(feature = "server")]
        Command::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }

            logger::log_startup_info(
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                config.host(),
                config.port(),
            );
            logger::log_config_info(&config);

            let bridge = SwapBridge::from_config(&config);
            clothswap::server::run(config, bridge).await?;
        }
        Command::Swap {
            person,
            clothing,
            out,
            transport,
        } => {
            let config = match transport {
                Some(kind) => config.with_transport(kind),
                None => config,
            };
            swap(&config, person, clothing, out).await?;
        }
    }

    Ok(())
}

async fn swap(
    config: &Config,
    person: PathBuf,
    clothing: PathBuf,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let bridge = SwapBridge::from_config(config);
    let mut composer = Composer::new();

    for (slot, path) in [(Slot::Person, &person), (Slot::Clothing, &clothing)] {
        let file = SelectedFile::read(path)?;
        if !composer.upload(slot, file) {
            return Err(format!("{} is not a recognised image file", path.display()).into());
        }
    }

    log::info!("🎨 Swapping clothes via {} transport...", bridge.transport_name());
    composer.swap(&bridge).await;

    match composer.view() {
        ViewState::Ready { image_url, caption } => {
            let (mime_type, bytes) = decode_data_url(&image_url)?;
            let path = out.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "ai-clothes-swap-result-{}.{}",
                    chrono::Utc::now().timestamp_millis(),
                    extension_for_mime(&mime_type)
                ))
            });
            std::fs::write(&path, bytes)?;
            log::info!("💾 Result saved to {}", path.display());
            println!("{}", caption);
            Ok(())
        }
        ViewState::Failed(message) => Err(message.into()),
        ViewState::Idle | ViewState::Loading => Err("swap did not complete".into()),
    }
}
