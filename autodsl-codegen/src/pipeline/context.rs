//! Per-candidate context passed through pipeline phases.

use autodsl_ir::{ClassHandle, ClassModel, GeneratedUnit};
use serde::Serialize;

use super::EligibilityIndex;

/// Lifecycle of one candidate within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CandidateState {
    Discovered,
    Validating,
    Rejected,
    Extracting,
    ExtractionFailed,
    Generating,
    GenerationFailed,
    Emitted,
}

impl CandidateState {
    /// Returns true once no further phase will run for the candidate.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::ExtractionFailed | Self::GenerationFailed | Self::Emitted
        )
    }

    /// Returns true for every terminal state except [`CandidateState::Emitted`].
    pub fn is_failure(&self) -> bool {
        self.is_terminal() && *self != Self::Emitted
    }
}

/// State carried through the phases for a single candidate.
#[derive(Debug)]
pub struct CandidateContext<'a> {
    /// The candidate being processed.
    pub handle: &'a ClassHandle,
    /// Eligible classes of the round, for nested-type lookups.
    pub index: &'a EligibilityIndex,
    pub state: CandidateState,
    /// Populated by `ExtractPhase`.
    pub model: Option<ClassModel>,
    /// Populated by `GeneratePhase`.
    pub unit: Option<GeneratedUnit>,
}

impl<'a> CandidateContext<'a> {
    pub fn new(handle: &'a ClassHandle, index: &'a EligibilityIndex) -> Self {
        Self {
            handle,
            index,
            state: CandidateState::Discovered,
            model: None,
            unit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation() {
        let handle = ClassHandle::class("crate", "Point");
        let index = EligibilityIndex::new();
        let ctx = CandidateContext::new(&handle, &index);

        assert_eq!(ctx.state, CandidateState::Discovered);
        assert!(ctx.model.is_none());
        assert!(ctx.unit.is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!CandidateState::Discovered.is_terminal());
        assert!(!CandidateState::Generating.is_terminal());
        assert!(CandidateState::Emitted.is_terminal());
        assert!(!CandidateState::Emitted.is_failure());
        assert!(CandidateState::Rejected.is_failure());
        assert!(CandidateState::GenerationFailed.is_failure());
    }
}
