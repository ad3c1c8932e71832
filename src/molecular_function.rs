//! Per-test evaluation template for molecular criteria.
//!
//! Filters the test history, gates on gene coverage, runs the criterion's
//! per-test logic and reconciles the per-test verdicts into one evaluation.

use crate::evaluation::{Evaluation, EvaluationResult};
use crate::factory;
use crate::function::EvaluationFunction;
use crate::patient::{MolecularTest, PatientRecord};
use crate::reconciliation::{self, EvaluationPrecedence, MolecularEvaluation};
use crate::target_coverage::{self, TargetCoveragePredicate};
use crate::test_filter::MolecularTestFilter;
use chrono::NaiveDate;

/// A criterion judged per molecular test. Implementors supply the per-test
/// logic in `evaluate_test`; everything else has domain defaults.
pub trait MolecularCriterion: Send + Sync {
    /// Tests older than this are ignored.
    fn max_test_age(&self) -> Option<NaiveDate> {
        None
    }

    /// Opt into tests of insufficient quality.
    fn use_insufficient_quality_records(&self) -> bool {
        false
    }

    /// The gene this criterion targets, if any. Gene-targeted criteria are
    /// gated on test coverage before any per-test logic runs.
    fn gene(&self) -> Option<&str> {
        None
    }

    fn target_coverage(&self) -> TargetCoveragePredicate {
        target_coverage::any(None)
    }

    /// Fallback when no qualifying test exists or no test yielded a verdict.
    fn no_molecular_test_evaluation(&self) -> Option<Evaluation> {
        None
    }

    /// Per-test logic; `None` means this test contributes no verdict.
    fn evaluate_test(&self, test: &MolecularTest) -> Option<Evaluation> {
        let _ = test;
        None
    }

    fn precedence(&self) -> EvaluationPrecedence {
        EvaluationPrecedence::default()
    }
}

/// Adapts a `MolecularCriterion` to the `EvaluationFunction` contract.
pub struct MolecularEvaluator<T: MolecularCriterion>(pub T);

impl<T: MolecularCriterion> EvaluationFunction for MolecularEvaluator<T> {
    fn evaluate(&self, record: &PatientRecord) -> Evaluation {
        evaluate_molecular(&self.0, record)
    }
}

pub fn evaluate_molecular(
    criterion: &impl MolecularCriterion,
    record: &PatientRecord,
) -> Evaluation {
    let filter = MolecularTestFilter::new(
        criterion.max_test_age(),
        criterion.use_insufficient_quality_records(),
    );
    let recent_tests = filter.apply(&record.molecular_tests);

    if recent_tests.is_empty() {
        return criterion.no_molecular_test_evaluation().unwrap_or_else(|| {
            factory::undetermined_missing_molecular("No molecular results of sufficient quality")
        });
    }

    // Hard gate, before any per-test logic: "we never looked for this" must
    // be reported uniformly regardless of which criterion asked.
    if let Some(gene) = criterion.gene() {
        let coverage = criterion.target_coverage();
        if !recent_tests.iter().any(|t| t.tests_gene(gene, &coverage)) {
            let mut evaluation = Evaluation::empty(EvaluationResult::Undetermined, false);
            evaluation.undetermined_messages.insert(coverage.message(gene));
            evaluation.missing_molecular_result_for_evaluation = true;
            return evaluation;
        }
    }

    let test_evaluations: Vec<MolecularEvaluation> = recent_tests
        .iter()
        .filter_map(|test| {
            criterion
                .evaluate_test(test)
                .map(|evaluation| MolecularEvaluation::new(test.clone(), evaluation))
        })
        .collect();

    if !test_evaluations.is_empty() {
        return reconciliation::combine(&test_evaluations, criterion.precedence());
    }

    criterion
        .no_molecular_test_evaluation()
        .unwrap_or_else(|| factory::undetermined_missing_molecular("Insufficient molecular data"))
}
