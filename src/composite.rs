//! Structural composition of criterion evaluators.
//!
//! Any criterion can be expressed as a boolean tree over simpler criteria.
//! The tree is explicit data evaluated by one interpreter, so the result
//! combination rules are unit-testable on bare evaluations without
//! constructing evaluator objects.

use crate::evaluation::{Evaluation, EvaluationResult};
use crate::function::EvaluationFunction;
use crate::patient::PatientRecord;
use std::collections::BTreeMap;

pub enum CompositeRule {
    Leaf(Box<dyn EvaluationFunction>),
    And(Vec<CompositeRule>),
    Or(Vec<CompositeRule>),
    Not(Box<CompositeRule>),
}

impl CompositeRule {
    pub fn leaf(function: impl EvaluationFunction + 'static) -> Self {
        CompositeRule::Leaf(Box::new(function))
    }

    /// Panics on an empty child list: an empty AND is semantically ambiguous
    /// and indicates a wiring bug upstream.
    pub fn and(children: Vec<CompositeRule>) -> Self {
        assert!(
            !children.is_empty(),
            "AND combinator requires at least one child"
        );
        CompositeRule::And(children)
    }

    /// Panics on an empty child list, as for `and`.
    pub fn or(children: Vec<CompositeRule>) -> Self {
        assert!(
            !children.is_empty(),
            "OR combinator requires at least one child"
        );
        CompositeRule::Or(children)
    }

    pub fn not(child: CompositeRule) -> Self {
        CompositeRule::Not(Box::new(child))
    }
}

impl EvaluationFunction for CompositeRule {
    fn evaluate(&self, record: &PatientRecord) -> Evaluation {
        match self {
            CompositeRule::Leaf(function) => function.evaluate(record),
            CompositeRule::And(children) => {
                combine_and(children.iter().map(|c| c.evaluate(record)).collect())
            }
            CompositeRule::Or(children) => {
                combine_or(children.iter().map(|c| c.evaluate(record)).collect())
            }
            CompositeRule::Not(child) => negate(child.evaluate(record)),
        }
    }
}

fn group_by_result(evaluations: Vec<Evaluation>) -> BTreeMap<EvaluationResult, Vec<Evaluation>> {
    let mut distinct: Vec<Evaluation> = Vec::new();
    for evaluation in evaluations {
        if !distinct.contains(&evaluation) {
            distinct.push(evaluation);
        }
    }
    let mut by_result: BTreeMap<EvaluationResult, Vec<Evaluation>> = BTreeMap::new();
    for evaluation in distinct {
        by_result.entry(evaluation.result).or_default().push(evaluation);
    }
    by_result
}

/// Selects the most favorable child outcome: any one qualifying condition is
/// enough, and a warn or undetermined is still more informative than a flat
/// fail.
pub fn combine_or(evaluations: Vec<Evaluation>) -> Evaluation {
    let by_result = group_by_result(evaluations);
    let best = *by_result
        .keys()
        .max()
        .unwrap_or_else(|| panic!("could not determine OR result without evaluations"));

    // An undetermined verdict caused only by missing molecular data must not
    // hide a sibling warning that did observe a molecular event.
    let final_result = if best == EvaluationResult::Undetermined
        && undetermined_missing_while_warn_has_event(&by_result)
    {
        EvaluationResult::Warn
    } else {
        best
    };

    let additional = molecular_event_carriers(
        &by_result,
        &[
            EvaluationResult::Pass,
            EvaluationResult::Warn,
            EvaluationResult::Undetermined,
        ],
    );

    let winners = by_result
        .get(&final_result)
        .unwrap_or_else(|| panic!("no evaluations for OR result {final_result:?}"));
    let contributing: Vec<&Evaluation> = winners.iter().chain(additional).collect();
    let recoverable = contributing.iter().any(|e| e.recoverable);
    let filtered: Vec<&Evaluation> = if final_result == EvaluationResult::Fail && recoverable {
        contributing.into_iter().filter(|e| e.recoverable).collect()
    } else {
        contributing
    };

    filtered.iter().fold(
        Evaluation::empty(final_result, recoverable),
        |acc, evaluation| acc.add_messages_and_events(evaluation),
    )
}

/// Selects the least favorable child outcome: all conditions must hold, so
/// any failure or uncertainty dominates.
pub fn combine_and(evaluations: Vec<Evaluation>) -> Evaluation {
    let by_result = group_by_result(evaluations);
    let worst = *by_result
        .keys()
        .min()
        .unwrap_or_else(|| panic!("could not determine AND result without evaluations"));

    let winners = &by_result[&worst];
    let (recoverable_winners, unrecoverable_winners): (Vec<&Evaluation>, Vec<&Evaluation>) =
        winners.iter().partition(|e| e.recoverable);
    let recoverable = unrecoverable_winners.is_empty();
    let contributing = if recoverable {
        recoverable_winners
    } else {
        unrecoverable_winners
    };

    let combined = contributing.iter().fold(
        Evaluation::empty(worst, recoverable),
        |acc, evaluation| acc.add_messages_and_events(evaluation),
    );

    // Molecular events observed by passing or warning children stay visible
    // on the final verdict even when a sibling dominates the result.
    let additional =
        molecular_event_carriers(&by_result, &[EvaluationResult::Pass, EvaluationResult::Warn]);
    let mut result = combined;
    for evaluation in additional {
        result
            .inclusion_molecular_events
            .extend(evaluation.inclusion_molecular_events.iter().cloned());
        result
            .exclusion_molecular_events
            .extend(evaluation.exclusion_molecular_events.iter().cloned());
    }
    result
}

/// Inverts pass and fail; warn and undetermined are logically non-invertible
/// and pass through with their result unchanged. Inclusion and exclusion
/// molecular events swap roles in every case.
pub fn negate(evaluation: Evaluation) -> Evaluation {
    match evaluation.result {
        EvaluationResult::Pass => swap_messages_and_events(evaluation, EvaluationResult::Fail),
        EvaluationResult::Fail => swap_messages_and_events(evaluation, EvaluationResult::Pass),
        EvaluationResult::NotEvaluated => {
            swap_messages_and_events(evaluation, EvaluationResult::NotEvaluated)
        }
        _ => {
            let mut result = evaluation;
            std::mem::swap(
                &mut result.inclusion_molecular_events,
                &mut result.exclusion_molecular_events,
            );
            result
        }
    }
}

fn swap_messages_and_events(evaluation: Evaluation, negated: EvaluationResult) -> Evaluation {
    let mut result = evaluation;
    result.result = negated;
    std::mem::swap(
        &mut result.inclusion_molecular_events,
        &mut result.exclusion_molecular_events,
    );
    std::mem::swap(&mut result.pass_messages, &mut result.fail_messages);
    result
}

fn undetermined_missing_while_warn_has_event(
    by_result: &BTreeMap<EvaluationResult, Vec<Evaluation>>,
) -> bool {
    let undetermined_missing = by_result
        .get(&EvaluationResult::Undetermined)
        .map(|group| {
            group
                .iter()
                .any(|e| e.missing_molecular_result_for_evaluation)
        })
        .unwrap_or(false);
    let warn_with_event = by_result
        .get(&EvaluationResult::Warn)
        .map(|group| group.iter().any(Evaluation::has_molecular_events))
        .unwrap_or(false);
    undetermined_missing && warn_with_event
}

fn molecular_event_carriers<'a>(
    by_result: &'a BTreeMap<EvaluationResult, Vec<Evaluation>>,
    results: &[EvaluationResult],
) -> Vec<&'a Evaluation> {
    results
        .iter()
        .flat_map(|result| {
            by_result
                .get(result)
                .into_iter()
                .flatten()
                .filter(|e| e.has_molecular_events())
        })
        .collect()
}
