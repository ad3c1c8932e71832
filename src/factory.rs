//! Sanctioned constructors for `Evaluation` values.
//!
//! Each constructor pairs the message with the matching result kind, so
//! message sets for other result kinds stay empty.

use crate::evaluation::{Evaluation, EvaluationResult};
use crate::message::EvaluationMessage;

fn with_message(result: EvaluationResult, recoverable: bool, message: &str) -> Evaluation {
    let mut evaluation = Evaluation::empty(result, recoverable);
    let message = EvaluationMessage::static_message(message);
    match result {
        EvaluationResult::Pass | EvaluationResult::NotEvaluated => {
            evaluation.pass_messages.insert(message);
        }
        EvaluationResult::Warn => {
            evaluation.warn_messages.insert(message);
        }
        EvaluationResult::Fail => {
            evaluation.fail_messages.insert(message);
        }
        EvaluationResult::Undetermined => {
            evaluation.undetermined_messages.insert(message);
        }
    }
    evaluation
}

pub fn pass(message: &str) -> Evaluation {
    with_message(EvaluationResult::Pass, false, message)
}

pub fn pass_with_events(message: &str, inclusion_events: &[&str]) -> Evaluation {
    let mut evaluation = pass(message);
    evaluation.inclusion_molecular_events =
        inclusion_events.iter().map(|e| e.to_string()).collect();
    evaluation
}

pub fn warn(message: &str) -> Evaluation {
    with_message(EvaluationResult::Warn, false, message)
}

pub fn warn_with_events(message: &str, inclusion_events: &[&str]) -> Evaluation {
    let mut evaluation = warn(message);
    evaluation.inclusion_molecular_events =
        inclusion_events.iter().map(|e| e.to_string()).collect();
    evaluation
}

pub fn fail(message: &str) -> Evaluation {
    with_message(EvaluationResult::Fail, false, message)
}

pub fn fail_with_events(message: &str, exclusion_events: &[&str]) -> Evaluation {
    let mut evaluation = fail(message);
    evaluation.exclusion_molecular_events =
        exclusion_events.iter().map(|e| e.to_string()).collect();
    evaluation
}

pub fn recoverable_fail(message: &str) -> Evaluation {
    with_message(EvaluationResult::Fail, true, message)
}

pub fn undetermined(message: &str) -> Evaluation {
    with_message(EvaluationResult::Undetermined, false, message)
}

pub fn recoverable_undetermined(message: &str) -> Evaluation {
    with_message(EvaluationResult::Undetermined, true, message)
}

/// Undetermined verdict that is known to stem from absent molecular data.
pub fn undetermined_missing_molecular(message: &str) -> Evaluation {
    let mut evaluation = undetermined(message);
    evaluation.missing_molecular_result_for_evaluation = true;
    evaluation
}

pub fn not_evaluated(message: &str) -> Evaluation {
    with_message(EvaluationResult::NotEvaluated, false, message)
}
