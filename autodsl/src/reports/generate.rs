//! Generate command report.

use std::path::PathBuf;

use autodsl::{EmitStatus, HarnessReport};

use super::output::{Output, Report};

/// One generated builder as shown to the user.
#[derive(Debug)]
pub struct GeneratedBuilder {
    pub builder: String,
    pub path: PathBuf,
    pub status: EmitStatus,
    pub source_text: String,
}

/// Report data from a generate run.
#[derive(Debug)]
pub struct GenerateReport {
    pub generated_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub rounds: usize,
    pub builders: Vec<GeneratedBuilder>,
    pub failed: Vec<String>,
}

impl GenerateReport {
    pub fn new(report: &HarnessReport, generated_dir: Option<PathBuf>, dry_run: bool) -> Self {
        Self {
            generated_dir,
            dry_run,
            rounds: report.rounds,
            builders: report
                .units
                .iter()
                .map(|unit| GeneratedBuilder {
                    builder: unit.builder.clone(),
                    path: unit.path.clone(),
                    status: unit.status,
                    source_text: unit.source_text.clone(),
                })
                .collect(),
            failed: report
                .outcomes
                .iter()
                .filter(|o| o.state.is_failure())
                .map(|o| o.qualified_name.clone())
                .collect(),
        }
    }

    fn written(&self) -> usize {
        self.builders
            .iter()
            .filter(|b| b.status == EmitStatus::Written)
            .count()
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        if self.dry_run {
            for builder in &self.builders {
                out.divider(&builder.path.display().to_string());
                out.preformatted(&builder.source_text);
            }
            out.divider("Summary");
            out.preformatted(&format!(
                "{} builders would be generated",
                self.builders.len()
            ));
            return;
        }

        out.section(&format!("Builders ({})", self.builders.len()));
        for builder in &self.builders {
            let line = format!("{} -> {}", builder.builder, builder.path.display());
            match builder.status {
                EmitStatus::Written => out.added_item(&line),
                EmitStatus::Unchanged | EmitStatus::Skipped => out.list_item(&line),
            }
        }

        if !self.failed.is_empty() {
            out.newline();
            out.section(&format!("Failed ({})", self.failed.len()));
            for name in &self.failed {
                out.failed_item(name);
            }
        }

        out.newline();
        if let Some(dir) = &self.generated_dir {
            out.key_value("Generated", &dir.display().to_string());
        }
        out.key_value(
            "Written",
            &format!(
                "{} of {} in {} round{}",
                self.written(),
                self.builders.len(),
                self.rounds,
                if self.rounds == 1 { "" } else { "s" }
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    fn builder(name: &str, status: EmitStatus) -> GeneratedBuilder {
        GeneratedBuilder {
            builder: format!("crate::{}Builder", name),
            path: PathBuf::from(format!("gen/{}_builder.rs", name.to_lowercase())),
            status,
            source_text: format!("pub struct {}Builder;", name),
        }
    }

    #[test]
    fn test_render_summary() {
        let report = GenerateReport {
            generated_dir: Some(PathBuf::from("gen")),
            dry_run: false,
            rounds: 1,
            builders: vec![
                builder("Point", EmitStatus::Written),
                builder("Line", EmitStatus::Unchanged),
            ],
            failed: vec!["crate::Shape".into()],
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            [
                "Builders (2):",
                "  + crate::PointBuilder -> gen/point_builder.rs",
                "  - crate::LineBuilder -> gen/line_builder.rs",
                "",
                "Failed (1):",
                "  x crate::Shape",
                "",
                "Generated: gen",
                "Written: 1 of 2 in 1 round",
            ]
        );
    }

    #[test]
    fn test_render_dry_run_previews_sources() {
        let report = GenerateReport {
            generated_dir: None,
            dry_run: true,
            rounds: 1,
            builders: vec![builder("Point", EmitStatus::Skipped)],
            failed: Vec::new(),
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            [
                "── gen/point_builder.rs ──",
                "pub struct PointBuilder;",
                "── Summary ──",
                "1 builders would be generated",
            ]
        );
    }
}
