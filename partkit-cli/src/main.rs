mod commands;
mod platform;
mod size;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use partkit_core::FragmentConfig;

#[derive(Parser)]
#[command(name = "partkit", about = "Split files into ordered parts and merge them back")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into part files next to it
    Split {
        /// Path to the file to split
        file: String,

        /// Size of each part with unit (e.g. 512B, 64KB, 10MB, 1GB)
        #[arg(long, short, default_value = "1MB", value_parser = size::parse_size)]
        size: u64,
    },

    /// Merge the part files in a directory into a single file and delete the parts
    Merge {
        /// Directory containing the part files
        directory: String,

        /// Name of the merged file. If omitted, the original file name is recovered from the parts.
        #[arg(long, short)]
        output: Option<String>,

        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// List the part files in a directory without merging them
    Inspect {
        /// Directory containing the part files
        directory: String,
    },
}

fn main() {
    // Initialize tracing (controlled by RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = FragmentConfig::from_env();

    let result = match cli.command {
        Commands::Split { file, size } => commands::split::run_split(&file, size, config),
        Commands::Merge { directory, output, yes } => {
            commands::merge::run_merge(&directory, output.as_deref(), config, yes)
        }
        Commands::Inspect { directory } => commands::inspect::run_inspect(&directory, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
