//! PdV CLI - build, verify and inspect preservation packages.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

use commands::{build, canonicalize, inspect, verify};

#[derive(Parser)]
#[command(name = "pdv")]
#[command(about = "Preservation package (PdV) builder and verifier")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a package from files or a JSON manifest
    Build {
        /// Files to preserve, in package order
        files: Vec<PathBuf>,
        /// JSON array of document descriptors (filePath, fileName, mimeType, documentId, subject)
        #[arg(long, conflicts_with = "files")]
        manifest: Option<PathBuf>,
        /// Write the package here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// JSON preservation profile (producer, recipient, document class, retention)
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Closure date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        closure_date: Option<String>,
        /// Sort attributes lexicographically when canonicalizing
        #[arg(long)]
        sorted_attributes: bool,
        /// Print a JSON summary (requires --output)
        #[arg(long, requires = "output")]
        json: bool,
    },
    /// Recompute every hash of a package
    Verify {
        /// Path to package file
        package: PathBuf,
        /// Exit with error code if verification fails
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Package was built with sorted attributes
        #[arg(long)]
        sorted_attributes: bool,
    },
    /// List the documents in a package
    Inspect {
        /// Path to package file
        package: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show canonical bytes for input XML
    Canonicalize {
        /// Input XML file (or stdin if not provided)
        input: Option<PathBuf>,
        /// Sort attributes lexicographically
        #[arg(long)]
        sorted_attributes: bool,
    },
}

/// Logs go to stderr so package bytes on stdout stay clean.
fn setup_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    setup_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            files,
            manifest,
            output,
            profile,
            closure_date,
            sorted_attributes,
            json,
        } => build::run(build::BuildArgs {
            files,
            manifest,
            output,
            profile,
            closure_date,
            sorted_attributes,
            json,
        }),
        Commands::Verify {
            package,
            strict,
            json,
            sorted_attributes,
        } => verify::run(package, strict, json, sorted_attributes),
        Commands::Inspect { package, json } => inspect::run(package, json),
        Commands::Canonicalize {
            input,
            sorted_attributes,
        } => canonicalize::run(input, sorted_attributes),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
