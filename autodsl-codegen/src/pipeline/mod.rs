//! Per-candidate generation pipeline.
//!
//! A [`Processor`] runs each candidate of a round through explicit phases:
//!
//! - validate: is the marked item a public, constructible struct?
//! - extract: turn its fields into a [`ClassModel`](autodsl_ir::ClassModel),
//!   resolving nested classes against the round's [`EligibilityIndex`]
//! - generate: render the builder unit
//!
//! A failing phase abandons only its candidate and records a [`Diagnostic`].
//!
//! # Example
//!
//! ```ignore
//! use autodsl_codegen::pipeline::{CollectingReporter, Processor};
//!
//! let mut processor = Processor::new();
//! let output = processor.process_round(&candidates);
//!
//! let mut reporter = CollectingReporter::new();
//! output.report_to(&mut reporter);
//! ```

mod context;
mod diagnostic;
mod error;
mod phase;
pub mod phases;
mod reporter;
mod resolve;
mod runner;

pub use context::{CandidateContext, CandidateState};
pub use diagnostic::{Diagnostic, Severity};
pub use error::{EligibilityError, ProcessingError};
pub use phase::Phase;
pub use reporter::{CollectingReporter, Reporter};
pub use resolve::{EligibilityIndex, Scope, builder_name};
pub use runner::{CandidateOutcome, Processor, RoundOutput};
