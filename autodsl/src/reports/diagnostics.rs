//! Terminal rendering of pipeline diagnostics.

use std::{collections::HashMap, fs};

use autodsl::{Diagnostic, Reporter};
use miette::{LabeledSpan, MietteDiagnostic, NamedSource};

/// Prints each diagnostic to stderr as a miette report, with the source
/// snippet when the anchor points into a readable file.
#[derive(Default)]
pub struct TerminalReporter {
    sources: HashMap<String, Option<String>>,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn source(&mut self, file: &str) -> Option<String> {
        self.sources
            .entry(file.to_string())
            .or_insert_with(|| fs::read_to_string(file).ok())
            .clone()
    }

    fn to_report(&mut self, diagnostic: &Diagnostic) -> miette::Report {
        let mut rendered = MietteDiagnostic::new(diagnostic.message.clone())
            .with_code(format!("autodsl::{}", diagnostic.stage))
            .with_severity(miette::Severity::Error);

        let anchor = &diagnostic.anchor;
        if let (Some(file), Some(span)) = (&anchor.file, anchor.span)
            && let Some(text) = self.source(file)
            && span.offset + span.len <= text.len()
        {
            rendered = rendered.and_label(LabeledSpan::at(
                span.offset..span.offset + span.len,
                anchor.element.clone(),
            ));
            return miette::Report::new(rendered).with_source_code(NamedSource::new(file, text));
        }

        if !anchor.element.is_empty() {
            rendered = rendered.with_help(format!("at {}", anchor));
        }
        miette::Report::new(rendered)
    }
}

impl Reporter for TerminalReporter {
    fn report(&mut self, diagnostic: &Diagnostic) {
        let report = self.to_report(diagnostic);
        eprintln!("{:?}", report);
    }
}

#[cfg(test)]
mod tests {
    use autodsl_ir::{Anchor, Span};

    use super::*;

    #[test]
    fn test_report_without_source() {
        let diagnostic = Diagnostic::error("validate", "Only classes can be annotated with AutoDsl.")
            .at(Anchor::new("crate::Shape"));
        let report = TerminalReporter::new().to_report(&diagnostic);

        assert_eq!(report.to_string(), "Only classes can be annotated with AutoDsl.");
        assert_eq!(
            report.help().map(|h| h.to_string()),
            Some("at crate::Shape".to_string())
        );
    }

    #[test]
    fn test_report_with_source_label() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lib.rs");
        fs::write(&file, "pub enum Shape {}").unwrap();
        let file = file.display().to_string();

        let diagnostic = Diagnostic::error("validate", "Only classes can be annotated with AutoDsl.")
            .at(Anchor::new("crate::Shape").in_file(&file).at(Span::new(9, 5)));
        let report = TerminalReporter::new().to_report(&diagnostic);

        let labels: Vec<_> = report.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 9);
        assert_eq!(labels[0].len(), 5);
        assert!(report.source_code().is_some());
        assert_eq!(
            report.code().map(|c| c.to_string()),
            Some("autodsl::validate".to_string())
        );
    }
}
