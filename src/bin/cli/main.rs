//! CLI tool for single-file decompression tasks.

mod commands;
mod exit_codes;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Decompress a gzip, bzip2, xz or lzma file into place
#[derive(Parser)]
#[command(name = "uncompress")]
#[command(author, version, about = "Decompress a gzip, bzip2, xz or lzma file into place", long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Compressed source: local path, or URL with --fetch
    #[arg(required_unless_present = "params")]
    src: Option<String>,

    /// Destination file, or directory (trailing '/' or existing directory)
    #[arg(required_unless_present = "params")]
    dest: Option<String>,

    /// Read task parameters from a JSON file
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Fetch SRC when it is a URL instead of treating it as a local path
    #[arg(long)]
    fetch: bool,

    /// Destination mode, octal (0644) or symbolic (u=rw,g=r,o=r)
    #[arg(short = 'm', long)]
    mode: Option<String>,

    /// Destination owner (name or uid)
    #[arg(long)]
    owner: Option<String>,

    /// Destination group (name or gid)
    #[arg(long)]
    group: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long, value_name = "SECONDS", env = "UNCOMPRESS_TIMEOUT")]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let exit_code = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
        None => commands::uncompress(&commands::TaskConfig {
            src: cli.src,
            dest: cli.dest,
            params: cli.params,
            fetch: cli.fetch,
            mode: cli.mode,
            owner: cli.owner,
            group: cli.group,
            timeout: cli.timeout,
            format: cli.format,
            quiet: cli.quiet,
        }),
    };

    std::process::exit(exit_code.code());
}
