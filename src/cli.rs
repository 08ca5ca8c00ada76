use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidshelf")]
#[command(author, version, about = "Catalog TV series across storage volumes")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan connected volumes and merge the results into the catalog
    Scan {
        /// Ignore cached walks
        #[arg(long)]
        force: bool,

        /// Only scan the volume with this id
        #[arg(long)]
        volume: Option<String>,
    },

    /// Walk a directory and print the discovered series without saving
    Walk {
        /// Directory to walk
        #[arg(required = true)]
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a folder or file name is classified
    Classify {
        /// Folder or file name
        #[arg(required = true)]
        name: String,
    },

    /// List catalog series
    List,

    /// Remove cached walk results
    ClearCache,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
