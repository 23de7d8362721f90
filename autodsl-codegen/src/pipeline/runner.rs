//! Round processor.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use autodsl_ir::{Anchor, ClassHandle, ClassModel, GeneratedUnit};
use serde::Serialize;
use tracing::{debug, info_span, warn};

use super::{
    CandidateContext, CandidateState, Diagnostic, EligibilityError, EligibilityIndex, Phase,
    ProcessingError, Reporter,
    phases::{ExtractPhase, GeneratePhase, ValidatePhase},
};

/// Final state of one candidate in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateOutcome {
    pub qualified_name: String,
    pub state: CandidateState,
}

/// Everything a round produced, in candidate order.
#[derive(Debug, Default)]
pub struct RoundOutput {
    pub units: Vec<GeneratedUnit>,
    pub models: Vec<ClassModel>,
    pub diagnostics: Vec<Diagnostic>,
    pub outcomes: Vec<CandidateOutcome>,
}

impl RoundOutput {
    /// Whether the host should run another round. Failures never stop the
    /// host from asking for more input; an empty round is what ends it.
    pub fn should_continue(&self) -> bool {
        true
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Send every diagnostic of the round to `reporter`.
    pub fn report_to(&self, reporter: &mut impl Reporter) {
        for diagnostic in &self.diagnostics {
            reporter.report(diagnostic);
        }
    }
}

/// Runs the validate, extract and generate phases over each candidate.
///
/// Every candidate is isolated: an error or panic in one phase abandons that
/// candidate with a diagnostic and processing moves on to the next.
///
/// # Example
///
/// ```ignore
/// let mut processor = Processor::new();
/// let output = processor.process_round(&candidates);
/// output.report_to(&mut reporter);
/// for unit in &output.units {
///     emit(unit)?;
/// }
/// ```
pub struct Processor {
    phases: Vec<Box<dyn Phase>>,
    index: EligibilityIndex,
    round: usize,
}

impl Processor {
    /// Create a processor with the built-in phases.
    pub fn new() -> Self {
        Self {
            phases: vec![
                Box::new(ValidatePhase),
                Box::new(ExtractPhase),
                Box::new(GeneratePhase),
            ],
            index: EligibilityIndex::new(),
            round: 0,
        }
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Eligible classes seen in all rounds so far.
    pub fn index(&self) -> &EligibilityIndex {
        &self.index
    }

    /// Process one round of candidates in discovery order.
    pub fn process_round(&mut self, candidates: &[ClassHandle]) -> RoundOutput {
        self.round += 1;
        let _span = info_span!("round", round = self.round).entered();

        self.index.extend(candidates);
        debug!(
            candidates = candidates.len(),
            eligible = self.index.len(),
            "starting round"
        );

        let mut output = RoundOutput::default();
        for handle in candidates {
            let mut ctx = CandidateContext::new(handle, &self.index);

            for phase in &self.phases {
                ctx.state = phase.running_state();
                debug!(
                    candidate = %handle.qualified_name,
                    state = ?ctx.state,
                    phase = phase.description(),
                    "entering phase"
                );

                if let Err(failure) = run_guarded(phase.as_ref(), &mut ctx) {
                    ctx.state = phase.failed_state();
                    let diagnostic = failure.into_diagnostic(phase.name(), handle);
                    warn!(
                        candidate = %handle.qualified_name,
                        state = ?ctx.state,
                        "{}",
                        diagnostic.message
                    );
                    output.diagnostics.push(diagnostic);
                    break;
                }
            }

            if !ctx.state.is_failure() {
                ctx.state = CandidateState::Emitted;
                if let Some(model) = ctx.model.take() {
                    output.models.push(model);
                }
                if let Some(unit) = ctx.unit.take() {
                    debug!(builder = %unit.builder_qualified_name, "builder generated");
                    output.units.push(unit);
                }
            }

            output.outcomes.push(CandidateOutcome {
                qualified_name: handle.qualified_name.clone(),
                state: ctx.state,
            });
        }

        output
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

enum Failure {
    Report(eyre::Report),
    Panic(String),
}

impl Failure {
    fn into_diagnostic(self, stage: &str, handle: &ClassHandle) -> Diagnostic {
        let report = match self {
            Failure::Report(report) => report,
            Failure::Panic(message) => return unexpected(stage, handle, &message),
        };

        if let Some(err) = report.downcast_ref::<EligibilityError>() {
            Diagnostic::error(stage, err.to_string()).at(anchor_for(handle, err.element()))
        } else if let Some(err) = report.downcast_ref::<ProcessingError>() {
            Diagnostic::error(stage, err.to_string()).at(anchor_for(handle, err.element()))
        } else {
            unexpected(stage, handle, &format!("{:#}", report))
        }
    }
}

fn run_guarded(phase: &dyn Phase, ctx: &mut CandidateContext<'_>) -> Result<(), Failure> {
    match panic::catch_unwind(AssertUnwindSafe(|| phase.run(ctx))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(report)) => Err(Failure::Report(report)),
        Err(payload) => Err(Failure::Panic(panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn unexpected(stage: &str, handle: &ClassHandle, message: &str) -> Diagnostic {
    Diagnostic::error(
        stage,
        format!(
            "There was an error while processing your annotated classes. error = {}",
            message
        ),
    )
    .at(handle.anchor.clone())
}

/// The field's anchor when `element` names one, else the class anchor.
fn anchor_for(handle: &ClassHandle, element: &str) -> Anchor {
    handle
        .parameters
        .iter()
        .find(|param| param.anchor.element == element)
        .map(|param| param.anchor.clone())
        .unwrap_or_else(|| handle.anchor.clone())
}

#[cfg(test)]
mod tests {
    use autodsl_ir::{AttributeArg, ConstructorParam, ElementKind, Modifiers, TypeRef};
    use eyre::eyre;

    use super::*;

    struct FailingPhase;

    impl Phase for FailingPhase {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn description(&self) -> &'static str {
            "Always fails"
        }

        fn running_state(&self) -> CandidateState {
            CandidateState::Generating
        }

        fn failed_state(&self) -> CandidateState {
            CandidateState::GenerationFailed
        }

        fn run(&self, ctx: &mut CandidateContext<'_>) -> eyre::Result<()> {
            if ctx.handle.simple_name == "Boom" {
                panic!("kaboom");
            }
            Err(eyre!("disk full"))
        }
    }

    fn point() -> ClassHandle {
        ClassHandle::class("crate::shapes", "Point")
            .param(ConstructorParam::new("x", TypeRef::named("i32")))
            .param(ConstructorParam::new("y", TypeRef::named("i32")))
    }

    #[test]
    fn test_round_generates_units() {
        let mut processor = Processor::new();
        let output = processor.process_round(&[point()]);

        assert!(!output.has_errors());
        assert_eq!(output.units.len(), 1);
        assert_eq!(output.models.len(), 1);
        assert_eq!(
            output.outcomes,
            [CandidateOutcome {
                qualified_name: "crate::shapes::Point".into(),
                state: CandidateState::Emitted,
            }]
        );
        assert!(output.should_continue());
    }

    #[test]
    fn test_failure_is_isolated() {
        let shape = ClassHandle::class("crate::shapes", "Shape").with_kind(ElementKind::Enum);
        let hidden = ClassHandle::class("crate::shapes", "Hidden").with_modifiers(Modifiers::default());
        let mut processor = Processor::new();
        let output = processor.process_round(&[shape, point(), hidden]);

        let states: Vec<_> = output.outcomes.iter().map(|o| o.state).collect();
        assert_eq!(
            states,
            [
                CandidateState::Rejected,
                CandidateState::Emitted,
                CandidateState::Rejected
            ]
        );
        assert_eq!(output.units.len(), 1);

        let messages: Vec<_> = output.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Only classes can be annotated with AutoDsl.",
                "The class crate::shapes::Hidden is not public or is abstract.",
            ]
        );
        assert!(output.diagnostics.iter().all(|d| d.stage == "validate"));
        assert!(output.should_continue());
    }

    #[test]
    fn test_processing_error_is_anchored_to_field() {
        let handle = ClassHandle::class("crate", "Point").param(
            ConstructorParam::new("x", TypeRef::named("i32")).option(AttributeArg::flag("sorted")),
        );
        let output = Processor::new().process_round(&[handle]);

        assert_eq!(output.outcomes[0].state, CandidateState::ExtractionFailed);
        let diagnostic = &output.diagnostics[0];
        assert_eq!(diagnostic.stage, "extract");
        assert_eq!(diagnostic.anchor.element, "crate::Point.x");
    }

    #[test]
    fn test_unexpected_errors_use_generic_message() {
        let boom = ClassHandle::class("crate", "Boom");
        let mut processor = Processor::new().phase(FailingPhase);
        let output = processor.process_round(&[point(), boom]);

        let messages: Vec<_> = output.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "There was an error while processing your annotated classes. error = disk full",
                "There was an error while processing your annotated classes. error = kaboom",
            ]
        );
        assert!(output.units.is_empty());
        assert!(
            output
                .outcomes
                .iter()
                .all(|o| o.state == CandidateState::GenerationFailed)
        );
    }

    #[test]
    fn test_index_carries_across_rounds() {
        let address = ClassHandle::class("crate", "Address");
        let person = ClassHandle::class("crate", "Person")
            .param(ConstructorParam::new("home", TypeRef::named("Address")));

        let mut processor = Processor::new();
        processor.process_round(&[address]);
        let output = processor.process_round(&[person]);

        assert!(output.models[0].parameters[0].is_nested_generatable());
        assert_eq!(processor.index().len(), 2);
    }

    #[test]
    fn test_report_to() {
        let shape = ClassHandle::class("crate", "Shape").with_kind(ElementKind::Enum);
        let output = Processor::new().process_round(&[shape]);

        let mut reporter = crate::pipeline::CollectingReporter::new();
        output.report_to(&mut reporter);
        assert_eq!(reporter.error_count(), 1);
    }
}
