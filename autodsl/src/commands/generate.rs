use std::path::PathBuf;

use autodsl::Harness;
use clap::Args;
use eyre::{Context, Result};

use super::{SourceArgs, UnwrapOrExit};
use crate::reports::{GenerateReport, Report, TerminalOutput, TerminalReporter};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory generated builders are written under
    #[arg(short, long, env = "AUTODSL_GENERATED_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let mut config = self.source.config();
        if let Some(dir) = &self.out_dir {
            config = config.with_generated_dir(dir);
        }

        let mut harness = Harness::new(config);
        if self.dry_run {
            harness = harness.dry_run();
        }
        let candidates = harness.discover().unwrap_or_exit();

        let mut reporter = TerminalReporter::new();
        let report = harness
            .run(candidates, &mut reporter)
            .wrap_err("Failed to generate builders")?;

        GenerateReport::new(&report, harness.config().generated_dir.clone(), self.dry_run)
            .render(&mut TerminalOutput::new());

        if report.has_errors() {
            std::process::exit(1);
        }
        Ok(())
    }
}
