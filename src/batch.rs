//! Embarrassingly parallel batch evaluation.
//!
//! Every criterion evaluation is pure and independent, so evaluating many
//! criteria for one patient or one criterion across a cohort needs no
//! ordering and no shared mutable state.

use crate::evaluation::Evaluation;
use crate::function::EvaluationFunction;
use crate::patient::PatientRecord;
use rayon::prelude::*;

/// Evaluates every criterion against one record, in input order.
pub fn evaluate_criteria(
    record: &PatientRecord,
    criteria: &[Box<dyn EvaluationFunction>],
) -> Vec<Evaluation> {
    criteria
        .par_iter()
        .map(|criterion| criterion.evaluate(record))
        .collect()
}

/// Evaluates one criterion across a cohort of records, in input order.
pub fn evaluate_cohort(
    criterion: &dyn EvaluationFunction,
    records: &[PatientRecord],
) -> Vec<Evaluation> {
    records
        .par_iter()
        .map(|record| criterion.evaluate(record))
        .collect()
}
