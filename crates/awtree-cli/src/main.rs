//! awtree CLI - Export an Appwrite schema document into a directory tree

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{convert, instructions};

#[derive(Parser)]
#[command(name = "awtree")]
#[command(about = "Convert appwrite.json into per-collection schema files", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write collection, attribute and index files from a schema document
    Convert {
        /// Path to the schema document
        #[arg(long)]
        input: Option<String>,

        /// Output root directory
        #[arg(short, long)]
        output: Option<String>,

        /// Database id used when the document has only top-level collections
        #[arg(long)]
        database_id: Option<String>,

        /// Database name used when the document has only top-level collections
        #[arg(long)]
        database_name: Option<String>,

        /// List the files that would be written without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Print steps for adding pending attributes in the Appwrite console
    Instructions {
        /// Path to the schema document checked for the marker
        #[arg(long)]
        input: Option<String>,

        /// Collection the fields belong to
        #[arg(long)]
        collection: Option<String>,

        /// Text whose presence means the document was already updated
        #[arg(long)]
        marker: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            database_id,
            database_name,
            dry_run,
        } => convert::run(convert::ConvertArgs {
            input,
            output,
            database_id,
            database_name,
            dry_run,
        }),
        Commands::Instructions {
            input,
            collection,
            marker,
        } => instructions::run(instructions::InstructionsArgs {
            input,
            collection,
            marker,
        }),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        log::debug!("{:?}", err);
        eprintln!("\n{}", error_line(&err));
        std::process::exit(1);
    }
}

/// The single line printed for a failed run, including the cause chain
fn error_line(err: &anyhow::Error) -> String {
    format!("❌ An error occurred: {:#}", err)
}
