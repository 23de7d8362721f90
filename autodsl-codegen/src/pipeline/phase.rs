//! Pipeline phase trait.

use eyre::Result;

use super::{CandidateContext, CandidateState};

/// A phase in the per-candidate pipeline.
///
/// Phases are executed in order by the [`Processor`](super::Processor). A
/// phase fails by returning an error; the processor turns structured errors
/// ([`EligibilityError`](super::EligibilityError),
/// [`ProcessingError`](super::ProcessingError)) into their own diagnostic and
/// anything else into the generic one.
///
/// Built-in phases:
/// - `ValidatePhase` - checks the candidate may get a builder
/// - `ExtractPhase` - builds the class model
/// - `GeneratePhase` - renders the builder source unit
pub trait Phase: Send + Sync {
    /// The name of this phase (recorded as the diagnostic stage).
    fn name(&self) -> &'static str;

    /// A human-readable description of what this phase does.
    fn description(&self) -> &'static str;

    /// State of the candidate while this phase runs.
    fn running_state(&self) -> CandidateState;

    /// State of the candidate if this phase fails.
    fn failed_state(&self) -> CandidateState;

    /// Run this phase on the candidate context.
    fn run(&self, ctx: &mut CandidateContext<'_>) -> Result<()>;
}
