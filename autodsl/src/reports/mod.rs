//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.
//! Diagnostics are rendered as they arrive by [`TerminalReporter`].

mod check;
mod diagnostics;
mod generate;
mod output;

pub use check::CheckReport;
pub use diagnostics::TerminalReporter;
pub use generate::GenerateReport;
pub use output::{Report, TerminalOutput};
