pub mod batch;
pub mod composite;
pub mod evaluation;
pub mod factory;
pub mod format;
pub mod function;
pub mod message;
pub mod molecular_function;
pub mod patient;
pub mod reconciliation;
pub mod target_coverage;
pub mod test_filter;

#[cfg(test)]
pub mod testutil;

pub use composite::CompositeRule;
pub use evaluation::{Evaluation, EvaluationResult};
pub use function::EvaluationFunction;
pub use message::EvaluationMessage;
pub use molecular_function::{MolecularCriterion, MolecularEvaluator};
pub use patient::{ExperimentType, MolecularTest, PatientRecord};
pub use reconciliation::{EvaluationPrecedence, MolecularEvaluation};
pub use target_coverage::{MolecularTestTarget, TargetCoveragePredicate};
