//! Builder DSL generation for Rust structs marked with `#[auto_dsl]`.
//!
//! This crate wires source discovery ([`autodsl_source`]) to the generation
//! pipeline ([`autodsl_codegen`]) and writes the results. It backs both the
//! `autodsl` binary and build scripts:
//!
//! ```ignore
//! // build.rs
//! let out_dir = std::env::var("OUT_DIR")?;
//! let config = autodsl::Config::default().with_generated_dir(out_dir);
//! let report = autodsl::generate(config)?;
//! ```

pub mod config;
pub mod harness;

pub use autodsl_codegen::{CollectingReporter, Diagnostic, Reporter};
pub use config::{CONFIG_FILE, Config, ConfigError, GENERATED_DIR_ENV};
pub use harness::{EmitStatus, EmittedUnit, Harness, HarnessReport};

/// Discover, process and write everything `config` points at.
///
/// Diagnostics are collected in the returned report rather than printed.
pub fn generate(config: Config) -> eyre::Result<HarnessReport> {
    let mut harness = Harness::new(config);
    let candidates = harness.discover()?;
    harness.run(candidates, &mut CollectingReporter::new())
}
