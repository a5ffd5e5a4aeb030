use clap::Parser;
use std::{path::PathBuf, process::ExitCode};

use crate::{commands::Commands, request::Request};

mod commands;
mod request;
mod style;

/// Inspect, check and repair rustdoc's trait implementor indexes
#[derive(Parser, Debug)]
#[command(name = "impldex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Rustdoc output directory (the one containing `trait.impl/`)
    #[arg(short, long, global = true, env = "IMPLDEX_DOC_DIR")]
    doc_dir: Option<PathBuf>,

    /// Path to Cargo.toml; its `target/doc` is used (defaults to current directory)
    #[arg(short, long, global = true, conflicts_with = "doc_dir")]
    manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let path = match cli.doc_dir.or(cli.manifest_path) {
        Some(path) => path,
        None => match std::env::current_dir() {
            Ok(path) => path,
            Err(error) => {
                eprintln!("could not determine the current directory: {error}");
                return ExitCode::FAILURE;
            }
        },
    };

    let request = match Request::load(&path) {
        Ok(request) => request,
        Err(error) => {
            eprintln!("could not load rustdoc output from {}", path.display());
            log::error!("{error:?}");
            return ExitCode::FAILURE;
        }
    };

    let (output, is_error) = cli.command.unwrap_or_else(Commands::list).execute(&request);
    print!("{output}");

    if is_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
