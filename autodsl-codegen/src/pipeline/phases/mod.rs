//! Built-in pipeline phases.
//!
//! - [`ValidatePhase`] - rejects items that cannot get a builder
//! - [`ExtractPhase`] - builds the class model
//! - [`GeneratePhase`] - renders the builder unit

mod extract;
mod generate;
mod validate;

pub use extract::{ExtractPhase, extract};
pub use generate::GeneratePhase;
pub use validate::{ValidatePhase, check_eligibility};
