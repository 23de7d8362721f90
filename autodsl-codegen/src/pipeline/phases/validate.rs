//! Validate phase - eligibility of a marked item.

use autodsl_ir::{ClassHandle, ElementKind};
use eyre::Result;

use crate::pipeline::{CandidateContext, CandidateState, EligibilityError, Phase};

/// Check whether a marked item may get a builder. The first failing rule wins.
pub fn check_eligibility(handle: &ClassHandle) -> std::result::Result<(), EligibilityError> {
    if handle.kind != ElementKind::Class {
        return Err(EligibilityError::NotAClass {
            element: handle.qualified_name.clone(),
        });
    }
    if !handle.modifiers.public || handle.modifiers.is_abstract {
        return Err(EligibilityError::NotPublicOrAbstract {
            qualified_name: handle.qualified_name.clone(),
        });
    }
    Ok(())
}

/// Phase that rejects items which cannot get a builder.
pub struct ValidatePhase;

impl Phase for ValidatePhase {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn description(&self) -> &'static str {
        "Check that the marked item is a public, constructible struct"
    }

    fn running_state(&self) -> CandidateState {
        CandidateState::Validating
    }

    fn failed_state(&self) -> CandidateState {
        CandidateState::Rejected
    }

    fn run(&self, ctx: &mut CandidateContext<'_>) -> Result<()> {
        check_eligibility(ctx.handle)?;
        Ok(())
    }
}
