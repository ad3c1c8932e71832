use crate::message::{merge_message_sets, EvaluationMessage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Verdict for one criterion against one patient record.
///
/// Variants are declared in combination-preference order: `Or` keeps the
/// maximum, `And` the minimum. The multi-test reconciliation engine applies
/// its own precedence and does not rely on this ordering.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EvaluationResult {
    Fail,
    Warn,
    Undetermined,
    Pass,
    NotEvaluated,
}

/// The verdict plus its justification, produced for one criterion.
///
/// Message sets for result kinds other than `result` are empty by
/// construction; build evaluations through the `factory` functions to keep
/// that invariant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub result: EvaluationResult,
    pub recoverable: bool,
    #[serde(default)]
    pub inclusion_molecular_events: BTreeSet<String>,
    #[serde(default)]
    pub exclusion_molecular_events: BTreeSet<String>,
    #[serde(default)]
    pub pass_messages: BTreeSet<EvaluationMessage>,
    #[serde(default)]
    pub warn_messages: BTreeSet<EvaluationMessage>,
    #[serde(default)]
    pub undetermined_messages: BTreeSet<EvaluationMessage>,
    #[serde(default)]
    pub fail_messages: BTreeSet<EvaluationMessage>,
    /// Marks that the verdict may be an artifact of absent molecular data
    /// rather than a genuine negative, even when `result` is `Fail`.
    #[serde(default)]
    pub missing_molecular_result_for_evaluation: bool,
}

impl Evaluation {
    pub fn empty(result: EvaluationResult, recoverable: bool) -> Self {
        Evaluation {
            result,
            recoverable,
            inclusion_molecular_events: BTreeSet::new(),
            exclusion_molecular_events: BTreeSet::new(),
            pass_messages: BTreeSet::new(),
            warn_messages: BTreeSet::new(),
            undetermined_messages: BTreeSet::new(),
            fail_messages: BTreeSet::new(),
            missing_molecular_result_for_evaluation: false,
        }
    }

    pub fn has_molecular_events(&self) -> bool {
        !self.inclusion_molecular_events.is_empty() || !self.exclusion_molecular_events.is_empty()
    }

    pub fn pass_message_strings(&self) -> BTreeSet<String> {
        self.pass_messages.iter().map(|m| m.to_string()).collect()
    }

    pub fn warn_message_strings(&self) -> BTreeSet<String> {
        self.warn_messages.iter().map(|m| m.to_string()).collect()
    }

    pub fn undetermined_message_strings(&self) -> BTreeSet<String> {
        self.undetermined_messages
            .iter()
            .map(|m| m.to_string())
            .collect()
    }

    pub fn fail_message_strings(&self) -> BTreeSet<String> {
        self.fail_messages.iter().map(|m| m.to_string()).collect()
    }

    /// Associative merge keeping this evaluation's result and recoverability
    /// while unioning the other's messages and molecular events.
    ///
    /// A `Pass` result clears the missing-molecular flag: a positive finding
    /// cannot be an artifact of absent data.
    pub fn add_messages_and_events(&self, other: &Evaluation) -> Evaluation {
        let missing = if self.result == EvaluationResult::Pass {
            false
        } else {
            self.missing_molecular_result_for_evaluation
                || other.missing_molecular_result_for_evaluation
        };
        Evaluation {
            result: self.result,
            recoverable: self.recoverable,
            inclusion_molecular_events: self
                .inclusion_molecular_events
                .union(&other.inclusion_molecular_events)
                .cloned()
                .collect(),
            exclusion_molecular_events: self
                .exclusion_molecular_events
                .union(&other.exclusion_molecular_events)
                .cloned()
                .collect(),
            pass_messages: merge_message_sets(&self.pass_messages, &other.pass_messages),
            warn_messages: merge_message_sets(&self.warn_messages, &other.warn_messages),
            undetermined_messages: merge_message_sets(
                &self.undetermined_messages,
                &other.undetermined_messages,
            ),
            fail_messages: merge_message_sets(&self.fail_messages, &other.fail_messages),
            missing_molecular_result_for_evaluation: missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;

    #[test]
    fn test_add_messages_and_events_unions_sets() {
        let a = factory::pass_with_events("variant detected", &["EGFR L858R"]);
        let b = factory::pass_with_events("second variant detected", &["EGFR T790M"]);
        let merged = a.add_messages_and_events(&b);
        assert_eq!(merged.result, EvaluationResult::Pass);
        assert_eq!(merged.pass_messages.len(), 2);
        assert_eq!(merged.inclusion_molecular_events.len(), 2);
    }

    #[test]
    fn test_add_messages_and_events_keeps_own_result() {
        let a = factory::fail("no qualifying variant");
        let b = factory::pass("variant detected");
        let merged = a.add_messages_and_events(&b);
        assert_eq!(merged.result, EvaluationResult::Fail);
        assert_eq!(merged.fail_messages.len(), 1);
        assert_eq!(merged.pass_messages.len(), 1);
    }

    #[test]
    fn test_missing_molecular_flag_propagates_unless_pass() {
        let a = factory::fail("no qualifying variant");
        let b = factory::undetermined_missing_molecular("no test covers gene");
        assert!(
            a.add_messages_and_events(&b)
                .missing_molecular_result_for_evaluation
        );

        let pass = factory::pass("variant detected");
        assert!(
            !pass
                .add_messages_and_events(&b)
                .missing_molecular_result_for_evaluation
        );
    }

    #[test]
    fn test_result_set_invariant_holds_for_factories() {
        let evaluations = [
            factory::pass("p"),
            factory::warn("w"),
            factory::fail("f"),
            factory::undetermined("u"),
        ];
        for evaluation in &evaluations {
            let non_empty = [
                !evaluation.pass_messages.is_empty(),
                !evaluation.warn_messages.is_empty(),
                !evaluation.fail_messages.is_empty(),
                !evaluation.undetermined_messages.is_empty(),
            ]
            .iter()
            .filter(|&&b| b)
            .count();
            assert_eq!(non_empty, 1);
        }
    }
}
