use crate::evaluation::Evaluation;
use crate::patient::PatientRecord;

/// The single-method contract every criterion evaluator implements.
///
/// Implementations are pure: the same record yields an equal evaluation, no
/// I/O is performed, and "don't know" is expressed as `Undetermined` rather
/// than an error. Panics are reserved for malformed construction.
pub trait EvaluationFunction: Send + Sync {
    fn evaluate(&self, record: &PatientRecord) -> Evaluation;
}

impl<F> EvaluationFunction for F
where
    F: Fn(&PatientRecord) -> Evaluation + Send + Sync,
{
    fn evaluate(&self, record: &PatientRecord) -> Evaluation {
        self(record)
    }
}
