//! Round loop around the codegen processor.
//!
//! The harness owns everything host-specific: it discovers marked items,
//! feeds them to a [`Processor`] round by round, writes the generated units
//! and scans them for new marked items. It stops when a round discovers
//! nothing new.

use std::path::{Path, PathBuf};

use autodsl_codegen::{Diagnostic, Processor, Reporter, pipeline::CandidateOutcome};
use autodsl_core::{OutputFile, WriteResult};
use autodsl_ir::{ClassHandle, ClassModel, GeneratedUnit};
use eyre::{Context, Result, eyre};
use serde::Serialize;
use tracing::{debug, info};

use crate::{Config, GENERATED_DIR_ENV};

/// What happened to one generated unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitStatus {
    /// The file was created or its content changed.
    Written,
    /// The file already had this content.
    Unchanged,
    /// Nothing was written (dry run).
    Skipped,
}

impl From<WriteResult> for EmitStatus {
    fn from(result: WriteResult) -> Self {
        match result {
            WriteResult::Written => Self::Written,
            WriteResult::Unchanged => Self::Unchanged,
        }
    }
}

/// A generated unit and where it went.
#[derive(Debug, Clone, Serialize)]
pub struct EmittedUnit {
    pub builder: String,
    pub path: PathBuf,
    pub status: EmitStatus,
    #[serde(skip)]
    pub source_text: String,
}

/// Everything a harness run produced, across all rounds.
#[derive(Debug, Default, Serialize)]
pub struct HarnessReport {
    pub rounds: usize,
    pub units: Vec<EmittedUnit>,
    pub models: Vec<ClassModel>,
    pub outcomes: Vec<CandidateOutcome>,
    pub diagnostics: Vec<Diagnostic>,
}

impl HarnessReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

/// Drives discovery, processing and emission.
///
/// # Example
///
/// ```ignore
/// let config = Config::default().with_generated_dir(out_dir);
/// let mut harness = Harness::new(config);
/// let candidates = harness.discover()?;
/// let report = harness.run(candidates, &mut reporter)?;
/// ```
pub struct Harness {
    config: Config,
    processor: Processor,
    emit: bool,
}

impl Harness {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            processor: Processor::new(),
            emit: true,
        }
    }

    /// Process without writing anything.
    pub fn dry_run(mut self) -> Self {
        self.emit = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Marked items of every configured source file, in file order.
    pub fn discover(&self) -> autodsl_source::Result<Vec<ClassHandle>> {
        let mut candidates = Vec::new();
        for file in self.config.source_files()? {
            candidates.extend(autodsl_source::discover_file(&file, &self.config.source_root)?);
        }
        debug!(candidates = candidates.len(), "discovered marked items");
        Ok(candidates)
    }

    /// Run rounds until one discovers no new candidates.
    ///
    /// Diagnostics go to `reporter` as each round finishes and are also
    /// kept in the returned report. Only emission failures end the run
    /// early.
    pub fn run(
        &mut self,
        candidates: Vec<ClassHandle>,
        reporter: &mut impl Reporter,
    ) -> Result<HarnessReport> {
        let generated_dir = match (&self.config.generated_dir, self.emit) {
            (Some(dir), _) => Some(dir.clone()),
            (None, false) => None,
            (None, true) => {
                return Err(eyre!(
                    "no generated-sources directory configured; set `generated_dir` in \
                     autodsl.toml, pass --out-dir or set {}",
                    GENERATED_DIR_ENV
                ));
            }
        };

        let mut report = HarnessReport::default();
        let mut candidates = candidates;

        while !candidates.is_empty() {
            let output = self.processor.process_round(&candidates);
            report.rounds += 1;
            output.report_to(reporter);

            let mut next = Vec::new();
            for unit in &output.units {
                let path = match &generated_dir {
                    Some(dir) => dir.join(&unit.relative_path),
                    None => unit.relative_path.clone(),
                };
                let status = if self.emit {
                    OutputFile::new(&path, &unit.source_text)
                        .write()
                        .wrap_err_with(|| format!("failed to write {}", path.display()))?
                        .into()
                } else {
                    EmitStatus::Skipped
                };
                debug!(builder = %unit.builder_qualified_name, path = %path.display(), ?status, "emitted unit");

                next.extend(rescan(unit, &path)?);
                report.units.push(EmittedUnit {
                    builder: unit.builder_qualified_name.clone(),
                    path,
                    status,
                    source_text: unit.source_text.clone(),
                });
            }

            let keep_going = output.should_continue();
            report.models.extend(output.models);
            report.outcomes.extend(output.outcomes);
            report.diagnostics.extend(output.diagnostics);
            if !keep_going {
                break;
            }
            candidates = next;
        }

        info!(
            rounds = report.rounds,
            units = report.units.len(),
            errors = report.diagnostics.len(),
            "generation finished"
        );
        Ok(report)
    }
}

/// Marked items declared by a generated unit.
fn rescan(unit: &GeneratedUnit, path: &Path) -> Result<Vec<ClassHandle>> {
    let module_path = unit
        .builder_qualified_name
        .rsplit_once("::")
        .map_or("crate", |(module, _)| module);
    autodsl_source::parse_source(&unit.source_text, &path.display().to_string(), module_path)
        .wrap_err_with(|| format!("generated unit {} does not parse", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use autodsl_codegen::{CollectingReporter, pipeline::CandidateState};
    use tempfile::TempDir;

    use super::*;

    const SHAPES: &str = r#"
#[auto_dsl]
pub struct Point {
    x: i32,
    y: i32,
}

#[auto_dsl]
pub enum Shape {
    Circle,
}
"#;

    fn project() -> (TempDir, Config) {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("lib.rs"), "pub mod shapes;\n").unwrap();
        fs::write(src.join("shapes.rs"), SHAPES).unwrap();

        let config = Config::default()
            .with_source_root(&src)
            .with_generated_dir(temp.path().join("generated"));
        (temp, config)
    }

    #[test]
    fn test_run_writes_units_and_reports_failures() {
        let (temp, config) = project();
        let mut harness = Harness::new(config);
        let candidates = harness.discover().unwrap();
        assert_eq!(candidates.len(), 2);

        let mut reporter = CollectingReporter::new();
        let report = harness.run(candidates, &mut reporter).unwrap();

        assert_eq!(report.rounds, 1);
        assert!(report.has_errors());
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(
            reporter.diagnostics()[0].message,
            "Only classes can be annotated with AutoDsl."
        );

        let written = temp.path().join("generated/shapes/point_builder.rs");
        assert_eq!(report.units.len(), 1);
        assert_eq!(report.units[0].path, written);
        assert_eq!(report.units[0].status, EmitStatus::Written);
        assert!(
            fs::read_to_string(&written)
                .unwrap()
                .contains("pub struct PointBuilder")
        );

        let states: Vec<_> = report.outcomes.iter().map(|o| o.state).collect();
        assert_eq!(states, [CandidateState::Emitted, CandidateState::Rejected]);
    }

    #[test]
    fn test_second_run_leaves_files_unchanged() {
        let (_temp, config) = project();

        let mut first = Harness::new(config.clone());
        let candidates = first.discover().unwrap();
        first
            .run(candidates, &mut CollectingReporter::new())
            .unwrap();

        let mut second = Harness::new(config);
        let candidates = second.discover().unwrap();
        let report = second
            .run(candidates, &mut CollectingReporter::new())
            .unwrap();
        assert_eq!(report.units[0].status, EmitStatus::Unchanged);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (temp, mut config) = project();
        config.generated_dir = None;

        let mut harness = Harness::new(config).dry_run();
        let candidates = harness.discover().unwrap();
        let report = harness
            .run(candidates, &mut CollectingReporter::new())
            .unwrap();

        assert_eq!(report.units[0].status, EmitStatus::Skipped);
        assert_eq!(report.units[0].path, PathBuf::from("shapes/point_builder.rs"));
        assert_eq!(report.models.len(), 1);
        assert!(!temp.path().join("generated").exists());
    }

    #[test]
    fn test_emitting_needs_generated_dir() {
        let (_temp, mut config) = project();
        config.generated_dir = None;

        let mut harness = Harness::new(config);
        let candidates = harness.discover().unwrap();
        let err = harness
            .run(candidates, &mut CollectingReporter::new())
            .unwrap_err();
        assert!(err.to_string().contains(GENERATED_DIR_ENV));
    }

    #[test]
    fn test_no_candidates_means_no_rounds() {
        let (_temp, config) = project();
        let report = Harness::new(config)
            .run(Vec::new(), &mut CollectingReporter::new())
            .unwrap();
        assert_eq!(report.rounds, 0);
        assert!(!report.has_errors());
    }
}
