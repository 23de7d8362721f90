//! Check command report data structures.

use autodsl::{Diagnostic, HarnessReport};
use autodsl_codegen::pipeline::CandidateOutcome;
use serde::Serialize;

use super::output::{Output, Report};

/// Report data from a check run.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    pub candidates: Vec<CandidateOutcome>,
    pub builders: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn new(report: &HarnessReport) -> Self {
        Self {
            valid: !report.has_errors(),
            candidates: report.outcomes.clone(),
            builders: report.units.iter().map(|u| u.builder.clone()).collect(),
            diagnostics: report.diagnostics.clone(),
        }
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        // Diagnostics were already printed by the reporter.
        if !self.diagnostics.is_empty() {
            out.newline();
        }

        let count = self.candidates.len();
        out.section(&format!(
            "{} marked item{}",
            count,
            if count == 1 { "" } else { "s" }
        ));
        for candidate in &self.candidates {
            let line = format!("{} ({:?})", candidate.qualified_name, candidate.state);
            if candidate.state.is_failure() {
                out.failed_item(&line);
            } else {
                out.list_item(&line);
            }
        }

        if self.valid {
            out.newline();
            out.preformatted(&format!(
                "✓ {} builder{} can be generated",
                self.builders.len(),
                if self.builders.len() == 1 { "" } else { "s" }
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use autodsl_codegen::pipeline::CandidateState;

    use super::*;
    use crate::reports::output::RecordingOutput;

    fn outcome(name: &str, state: CandidateState) -> CandidateOutcome {
        CandidateOutcome {
            qualified_name: name.into(),
            state,
        }
    }

    #[test]
    fn test_render_valid() {
        let report = CheckReport {
            valid: true,
            candidates: vec![outcome("crate::Point", CandidateState::Emitted)],
            builders: vec!["crate::PointBuilder".into()],
            diagnostics: Vec::new(),
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);
        assert_eq!(
            out.lines,
            [
                "1 marked item:",
                "  - crate::Point (Emitted)",
                "",
                "✓ 1 builder can be generated",
            ]
        );
    }

    #[test]
    fn test_json_shape() {
        let report = CheckReport {
            valid: false,
            candidates: vec![outcome("crate::Shape", CandidateState::Rejected)],
            builders: Vec::new(),
            diagnostics: vec![Diagnostic::error(
                "validate",
                "Only classes can be annotated with AutoDsl.",
            )],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["diagnostics"][0]["severity"], "error");
        assert_eq!(json["diagnostics"][0]["stage"], "validate");
        assert_eq!(json["candidates"][0]["qualified_name"], "crate::Shape");
    }
}
