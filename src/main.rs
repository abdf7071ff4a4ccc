//! TRS trace set CLI
//!
//! Inspects and exports trace-set containers of side-channel
//! measurement traces.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use trs_codec::commands::{
    display_info, dump_trace, execute_export, validate_args, validate_trace_set, ExportArgs,
};
use trs_codec::utils::config::{DEFAULT_EXPORT_LIMIT, SUMMARY_SCHEMA_VERSION};

/// TRS trace set tool
#[derive(Parser, Debug)]
#[command(name = "trs")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show header fields and trace block layout
    Info {
        /// Trace set file
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one trace
    Dump {
        /// Trace set file
        file: PathBuf,

        /// Trace index
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        index: i64,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read every trace and check the file size
    Validate {
        /// Trace set file
        file: PathBuf,
    },

    /// Export header and traces to a JSON summary
    Export {
        /// Trace set file
        file: PathBuf,

        /// Output path for JSON summary
        #[arg(short, long, default_value = "traceset.json")]
        output: PathBuf,

        /// Number of traces to include
        #[arg(long, default_value_t = DEFAULT_EXPORT_LIMIT)]
        limit: usize,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Info { file, json } => {
            display_info(&file, json)?;
        }

        Commands::Dump { file, index, json } => {
            dump_trace(&file, index, json)?;
        }

        Commands::Validate { file } => {
            validate_trace_set(&file)?;
        }

        Commands::Export {
            file,
            output,
            limit,
        } => {
            let args = ExportArgs {
                input: file,
                output_json: output,
                limit,
            };

            validate_args(&args)?;
            execute_export(args)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("trs v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SUMMARY_SCHEMA_VERSION);
}
