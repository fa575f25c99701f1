//! ufid-sync - dump and re-apply local audio file identifiers
//!
//! Thin driver around the library: parses arguments, initializes tracing,
//! runs the requested phase and maps errors to the exit code. All fatal
//! conditions are typed errors surfaced by the library; nothing below this
//! file terminates the process.

use std::path::PathBuf;
use std::process::Command as ProcessCommand;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use ufid_sync::config::{Config, DEFAULT_DUMP_FILE, DEFAULT_LOCAL_OWNER};
use ufid_sync::tags::LoftyTagStore;
use ufid_sync::{apply, dump};

/// Command-line arguments for ufid-sync
#[derive(Parser, Debug)]
#[command(name = "ufid-sync")]
#[command(about = "Dump and re-apply local audio file identifiers by MusicBrainz recording id")]
#[command(version)]
struct Args {
    /// Dump file carrying the mapping between the two phases
    #[arg(short = 'd', long = "dump-file", default_value = DEFAULT_DUMP_FILE)]
    dump_file: PathBuf,

    /// Directory to scan (non-recursive)
    #[arg(long, default_value = ".")]
    directory: PathBuf,

    /// Owner namespace of the local identifier
    #[arg(long, default_value = DEFAULT_LOCAL_OWNER)]
    owner: String,

    /// Dump: overwrite an existing dump file.
    /// Apply: overwrite divergent local ids and tolerate unmapped files
    #[arg(short, long)]
    force: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Send a desktop notification when the phase finishes
    #[arg(short, long)]
    notify: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dump the identifier mappings of a directory to the dump file
    Dump,
    /// Apply the dumped identifier mappings onto a directory
    Apply,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing; --verbose lowers the default level, RUST_LOG wins
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .init();

    info!(
        "ufid-sync v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config {
        directory: args.directory,
        dump_file: args.dump_file,
        force: args.force,
        owner: args.owner,
    };
    let mut store = LoftyTagStore::new();

    let outcome = match args.command {
        Command::Dump => dump::run(&config, &mut store).map(|summary| {
            info!(
                "dumped {} entries ({} files without a local id)",
                summary.written, summary.skipped_no_local_id
            );
            "finished dump"
        }),
        Command::Apply => apply::run(&config, &mut store).map(|_| "finished apply"),
    };

    match outcome {
        Ok(message) => {
            if args.notify {
                notify_finished(message);
            }
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Best-effort desktop notification; failure to spawn is never fatal.
fn notify_finished(message: &str) {
    if let Err(e) = ProcessCommand::new("notify-send")
        .arg("ufid-sync")
        .arg(message)
        .status()
    {
        warn!("unable to send desktop notification: {}", e);
    }
}
