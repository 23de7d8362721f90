use autodsl::Harness;
use clap::Args;
use eyre::{Context, Result};

use super::{SourceArgs, UnwrapOrExit};
use crate::reports::TerminalReporter;

#[derive(Args)]
pub struct InspectCommand {
    #[command(flatten)]
    pub source: SourceArgs,
}

impl InspectCommand {
    /// Run the inspect command
    pub fn run(&self) -> Result<()> {
        let mut harness = Harness::new(self.source.config()).dry_run();
        let candidates = harness.discover().unwrap_or_exit();

        let report = harness
            .run(candidates, &mut TerminalReporter::new())
            .wrap_err("Extraction failed")?;
        println!("{}", serde_json::to_string_pretty(&report.models)?);

        if report.has_errors() {
            std::process::exit(1);
        }
        Ok(())
    }
}
