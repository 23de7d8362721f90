mod check;
mod generate;
mod inspect;

use std::path::PathBuf;

use autodsl::{CONFIG_FILE, Config};
use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use eyre::Result;
use generate::GenerateCommand;
use inspect::InspectCommand;

/// Extension trait for exiting on source or config errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T, E> UnwrapOrExit<T> for std::result::Result<T, Box<E>>
where
    E: miette::Diagnostic + Send + Sync + 'static,
{
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Where to find the marked items.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Files or directories to scan (defaults to `sources` in autodsl.toml, then the source root)
    pub files: Vec<PathBuf>,

    /// Path to autodsl.toml
    #[arg(short, long, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory module paths are computed from (src/lib.rs is `crate`)
    #[arg(long)]
    pub source_root: Option<PathBuf>,
}

impl SourceArgs {
    /// Configuration file overlaid with the command line.
    pub fn config(&self) -> Config {
        let mut config = Config::load_or_default(&self.config).unwrap_or_exit();
        if let Some(root) = &self.source_root {
            config = config.with_source_root(root);
        }
        if !self.files.is_empty() {
            config = config.with_sources(&self.files);
        }
        config
    }
}

#[derive(Parser)]
#[command(name = "autodsl")]
#[command(version)]
#[command(about = "Generate builder DSLs for structs marked with #[auto_dsl]")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Inspect(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate builders for every marked struct
    Generate(GenerateCommand),

    /// Validate marked items without writing anything
    Check(CheckCommand),

    /// Print the extracted class models as JSON
    Inspect(InspectCommand),
}
