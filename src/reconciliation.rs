//! Precedence ordering and merging across redundant molecular evidence.
//!
//! One criterion may be judged by several tests of the same patient. Evidence
//! quality is the first tie-break: a single authoritative source supersedes
//! everything else in its result group, and only when the best available
//! evidence is weak are all sources of the group reported together.

use crate::evaluation::{Evaluation, EvaluationResult};
use crate::patient::MolecularTest;
use chrono::NaiveDate;
use itertools::Itertools;
use std::collections::BTreeMap;

/// One molecular test paired with the evaluation computed against it.
#[derive(Clone, Debug)]
pub struct MolecularEvaluation {
    pub test: MolecularTest,
    pub evaluation: Evaluation,
}

impl MolecularEvaluation {
    pub fn new(test: MolecularTest, evaluation: Evaluation) -> Self {
        MolecularEvaluation { test, evaluation }
    }
}

/// Order in which result groups are preferred when reconciling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluationPrecedence {
    order: [EvaluationResult; 4],
}

impl EvaluationPrecedence {
    /// Any positive finding outranks warnings, failures and uncertainty.
    pub fn positive_first() -> Self {
        EvaluationPrecedence {
            order: [
                EvaluationResult::Pass,
                EvaluationResult::Warn,
                EvaluationResult::Fail,
                EvaluationResult::Undetermined,
            ],
        }
    }

    /// For wild-type-style criteria: any positive finding of an effect must
    /// dominate a clean read, so failures come first.
    pub fn negative_first() -> Self {
        EvaluationPrecedence {
            order: [
                EvaluationResult::Fail,
                EvaluationResult::Warn,
                EvaluationResult::Pass,
                EvaluationResult::Undetermined,
            ],
        }
    }
}

impl Default for EvaluationPrecedence {
    fn default() -> Self {
        EvaluationPrecedence::positive_first()
    }
}

/// Reconciles per-test evaluations of one criterion into a single verdict.
///
/// Panics on an empty input or when no result group matches the precedence
/// order; the molecular template guards against both, so reaching either
/// signals an internal defect rather than a data problem.
pub fn combine(
    evaluations: &[MolecularEvaluation],
    precedence: EvaluationPrecedence,
) -> Evaluation {
    let mut by_result: BTreeMap<EvaluationResult, Vec<&MolecularEvaluation>> = BTreeMap::new();
    for evaluation in evaluations {
        by_result
            .entry(evaluation.evaluation.result)
            .or_default()
            .push(evaluation);
    }

    let preferred = precedence
        .order
        .iter()
        .find_map(|result| by_result.get(result))
        .unwrap_or_else(|| panic!("unable to combine molecular evaluations: {evaluations:?}"));

    let sorted: Vec<&MolecularEvaluation> = preferred
        .iter()
        .copied()
        .sorted_by_key(|e| {
            (
                e.test.experiment_type.precedence_rank(),
                std::cmp::Reverse(e.test.date.unwrap_or(NaiveDate::MIN)),
            )
        })
        .collect();

    let top = sorted
        .first()
        .unwrap_or_else(|| panic!("unable to combine molecular evaluations: {evaluations:?}"));

    if top.test.experiment_type.is_authoritative() {
        top.evaluation.clone()
    } else {
        sorted
            .iter()
            .skip(1)
            .fold(top.evaluation.clone(), |acc, evaluation| {
                acc.add_messages_and_events(&evaluation.evaluation)
            })
    }
}
