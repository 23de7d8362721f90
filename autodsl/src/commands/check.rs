use autodsl::{CollectingReporter, Harness, HarnessReport, Reporter};
use autodsl_ir::ClassHandle;
use clap::Args;
use eyre::{Context, Result};

use super::{SourceArgs, UnwrapOrExit};
use crate::reports::{CheckReport, Report, TerminalOutput, TerminalReporter};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let mut harness = Harness::new(self.source.config()).dry_run();
        let candidates = harness.discover().unwrap_or_exit();

        let report = if self.json {
            let report = run(&mut harness, candidates, CollectingReporter::new())?;
            let check = CheckReport::new(&report);
            println!("{}", serde_json::to_string_pretty(&check)?);
            report
        } else {
            let report = run(&mut harness, candidates, TerminalReporter::new())?;
            CheckReport::new(&report).render(&mut TerminalOutput::new());
            report
        };

        if report.has_errors() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn run(
    harness: &mut Harness,
    candidates: Vec<ClassHandle>,
    mut reporter: impl Reporter,
) -> Result<HarnessReport> {
    harness
        .run(candidates, &mut reporter)
        .wrap_err("Validation failed")
}
