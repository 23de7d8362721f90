//! Generate phase - renders the builder unit from the class model.

use eyre::{Result, eyre};

use crate::{
    generator::BuilderGenerator,
    pipeline::{CandidateContext, CandidateState, Phase},
};

/// Phase that renders the [`GeneratedUnit`](autodsl_ir::GeneratedUnit) for
/// the extracted model.
pub struct GeneratePhase;

impl Phase for GeneratePhase {
    fn name(&self) -> &'static str {
        "generate"
    }

    fn description(&self) -> &'static str {
        "Render the builder source unit"
    }

    fn running_state(&self) -> CandidateState {
        CandidateState::Generating
    }

    fn failed_state(&self) -> CandidateState {
        CandidateState::GenerationFailed
    }

    fn run(&self, ctx: &mut CandidateContext<'_>) -> Result<()> {
        let model = ctx
            .model
            .as_ref()
            .ok_or_else(|| eyre!("no class model for {}", ctx.handle.qualified_name))?;
        ctx.unit = Some(BuilderGenerator::new(model).generate()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use autodsl_ir::ClassHandle;

    use super::*;
    use crate::pipeline::{EligibilityIndex, phases::ExtractPhase};

    #[test]
    fn test_generate_after_extract() {
        let handle = ClassHandle::class("crate::shapes", "Point");
        let index = EligibilityIndex::from_candidates([&handle]);
        let mut ctx = CandidateContext::new(&handle, &index);

        ExtractPhase.run(&mut ctx).unwrap();
        GeneratePhase.run(&mut ctx).unwrap();

        let unit = ctx.unit.unwrap();
        assert_eq!(unit.builder_qualified_name, "crate::shapes::PointBuilder");
    }

    #[test]
    fn test_generate_without_model_fails() {
        let handle = ClassHandle::class("crate", "Point");
        let index = EligibilityIndex::new();
        let mut ctx = CandidateContext::new(&handle, &index);

        let err = GeneratePhase.run(&mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "no class model for crate::Point");
    }
}
