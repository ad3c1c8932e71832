use crate::format;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One rendered justification line attached to an evaluation.
///
/// Messages sharing a `combine_by` key are merged rather than listed twice,
/// so five genes untested for the same capability render as one line with
/// five gene names.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EvaluationMessage {
    Static(String),
    TargetCoverage(TargetCoverageMessage),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetCoverageMessage {
    pub message_prefix: Option<String>,
    pub target_string: String,
    pub genes: BTreeSet<String>,
}

impl EvaluationMessage {
    pub fn static_message(text: impl Into<String>) -> Self {
        EvaluationMessage::Static(text.into())
    }

    /// Grouping key: messages with equal keys may be merged via `combine`.
    pub fn combine_by(&self) -> String {
        match self {
            EvaluationMessage::Static(text) => format!("static:{text}"),
            EvaluationMessage::TargetCoverage(m) => format!(
                "coverage:{}:{}",
                m.message_prefix.as_deref().unwrap_or(""),
                m.target_string
            ),
        }
    }

    /// Associative merge of two messages sharing a `combine_by` key.
    ///
    /// Panics when the variants differ; merging across variants is a contract
    /// violation on the caller's side.
    pub fn combine(self, other: EvaluationMessage) -> EvaluationMessage {
        match (self, other) {
            (EvaluationMessage::Static(text), EvaluationMessage::Static(_)) => {
                EvaluationMessage::Static(text)
            }
            (EvaluationMessage::TargetCoverage(a), EvaluationMessage::TargetCoverage(b)) => {
                EvaluationMessage::TargetCoverage(TargetCoverageMessage {
                    message_prefix: a.message_prefix,
                    target_string: a.target_string,
                    genes: a.genes.union(&b.genes).cloned().collect(),
                })
            }
            (a, b) => panic!("cannot combine message {b:?} with {a:?}"),
        }
    }
}

impl fmt::Display for EvaluationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationMessage::Static(text) => write!(f, "{text}"),
            EvaluationMessage::TargetCoverage(m) => {
                let prefix = m
                    .message_prefix
                    .as_ref()
                    .map(|p| format!("{p} "))
                    .unwrap_or_default();
                let plural = if m.genes.len() > 1 { "s" } else { "" };
                write!(
                    f,
                    "{prefix}gene{plural} {} undetermined (not tested for {})",
                    format::concat(&m.genes),
                    m.target_string
                )
            }
        }
    }
}

/// Unions two message sets, merging entries that share a `combine_by` key.
pub fn merge_message_sets(
    a: &BTreeSet<EvaluationMessage>,
    b: &BTreeSet<EvaluationMessage>,
) -> BTreeSet<EvaluationMessage> {
    let mut by_key: BTreeMap<String, EvaluationMessage> = BTreeMap::new();
    for message in a.iter().chain(b.iter()) {
        match by_key.remove(&message.combine_by()) {
            Some(existing) => {
                by_key.insert(message.combine_by(), existing.combine(message.clone()));
            }
            None => {
                by_key.insert(message.combine_by(), message.clone());
            }
        }
    }
    by_key.into_values().collect()
}
