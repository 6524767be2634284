//! Plex Assistant - resolve a spoken command against a library snapshot
//!
//! Prints the resolved media item and playback device as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use plexassist::config::{config_path, Config};
use plexassist::devices::{run_discovery, Client, DeviceHandle, DeviceRegistry, DiscoveryEvent};
use plexassist::i18n::Localization;
use plexassist::library::{LibraryIndex, LibraryStore};
use plexassist::processor::Processor;
use plexassist::providers::{ClientSource, LibrarySnapshot, SnapshotProvider};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The spoken command, e.g. "play the latest episode of friends on kitchen"
    #[arg(required = true)]
    command: Vec<String>,

    /// Library snapshot JSON (defaults to the configured library path)
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Cast device to announce to discovery (repeatable)
    #[arg(short, long)]
    device: Vec<String>,

    /// Playback client as NAME=MACHINE_ID (repeatable)
    #[arg(long)]
    client: Vec<String>,

    /// Device used when the command names none
    #[arg(long)]
    default_device: Option<String>,

    /// Vocabulary language
    #[arg(long)]
    language: Option<String>,

    /// Keep --default-device and --language in the config file
    #[arg(long)]
    save: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_client(arg: &str) -> Client {
    match arg.split_once('=') {
        Some((title, machine_id)) => Client {
            title: title.trim().to_string(),
            machine_id: machine_id.trim().to_string(),
        },
        None => Client {
            title: arg.to_string(),
            machine_id: arg.to_string(),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load()?;

    // Setup logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from_str(&config.log_level).unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🎬 Plex Assistant v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(device) = args.default_device {
        config.default_device = Some(device);
    }
    if let Some(language) = args.language {
        config.language = language;
    }
    if args.save {
        config.save()?;
        info!("💾 Saved configuration to {}", config_path().display());
    }

    let localization = Arc::new(Localization::load(&config.language, config.locale_dir()));

    let library_path = args.library.unwrap_or_else(|| PathBuf::from(&config.library_path));
    let mut snapshot = LibrarySnapshot::from_file(&library_path)
        .with_context(|| format!("loading library snapshot {}", library_path.display()))?;
    snapshot.clients.extend(args.client.iter().map(|c| parse_client(c)));
    let provider = Arc::new(SnapshotProvider::new(snapshot));

    let library = Arc::new(LibraryStore::new(LibraryIndex::fetch(provider.as_ref())?));

    // Discovery: the registry's only writer
    let registry = Arc::new(DeviceRegistry::new(config.aliases.clone()));
    let (tx, rx) = mpsc::channel(16);
    let source: Arc<dyn ClientSource> = provider.clone();
    let discovery = tokio::spawn(run_discovery(registry.clone(), rx, source));
    for name in &args.device {
        tx.send(DiscoveryEvent::Device(DeviceHandle::new(name.as_str()))).await?;
    }
    tx.send(DiscoveryEvent::ClientsChanged).await?;
    drop(tx);
    discovery.await?;

    let processor = Processor::new(localization, library, registry, provider, config);
    let command = args.command.join(" ");
    info!("📝 Heard: '{}'", command);

    let resolution = processor.process(&command)?;
    println!("{}", serde_json::to_string_pretty(&resolution)?);

    Ok(())
}
