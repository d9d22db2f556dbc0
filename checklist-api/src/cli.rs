use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "checklist-api")]
#[command(about = "Bilingual success-criteria checklist service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Print an Argon2 hash for the `[admin] password_hash` setting
    HashPassword { password: String },

    /// Import a workbook into the configured database and exit
    Import {
        /// Workbook to import; defaults to `[import] seed_file`
        path: Option<PathBuf>,

        /// Replace existing questions
        #[arg(long)]
        force: bool,
    },
}
