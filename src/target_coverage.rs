//! Boolean predicates over the capabilities a molecular test declares.
//!
//! A gene-targeted criterion is only judgeable when some test in the patient
//! history declared coverage of the right capabilities for that gene; these
//! predicates express "the right capabilities" and render the missing ones
//! when no test qualifies.

use crate::message::{EvaluationMessage, TargetCoverageMessage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Capability a molecular test may declare for a gene.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MolecularTestTarget {
    Mutation,
    Fusion,
    Amplification,
    Deletion,
}

impl MolecularTestTarget {
    pub const ALL: [MolecularTestTarget; 4] = [
        MolecularTestTarget::Mutation,
        MolecularTestTarget::Fusion,
        MolecularTestTarget::Amplification,
        MolecularTestTarget::Deletion,
    ];

    fn display_plural(&self) -> &'static str {
        match self {
            MolecularTestTarget::Mutation => "mutations",
            MolecularTestTarget::Fusion => "fusions",
            MolecularTestTarget::Amplification => "amplifications",
            MolecularTestTarget::Deletion => "deletions",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CoverageMode {
    /// At least one of the targets must be declared.
    AnyOf,
    /// Every target must be declared.
    AllOf,
    /// A capability implying coverage of the target must be declared.
    AtLeast,
}

/// Named boolean predicate over a test's declared target list, built once per
/// criterion at construction time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetCoveragePredicate {
    targets: BTreeSet<MolecularTestTarget>,
    mode: CoverageMode,
    message_prefix: Option<String>,
}

impl TargetCoveragePredicate {
    pub fn test(&self, declared: &[MolecularTestTarget]) -> bool {
        match self.mode {
            CoverageMode::AnyOf | CoverageMode::AtLeast => {
                self.targets.iter().any(|t| declared.contains(t))
            }
            CoverageMode::AllOf => self.targets.iter().all(|t| declared.contains(t)),
        }
    }

    /// Structured message identifying the capability missing for `gene`.
    pub fn message(&self, gene: &str) -> EvaluationMessage {
        EvaluationMessage::TargetCoverage(TargetCoverageMessage {
            message_prefix: self.message_prefix.clone(),
            target_string: self.target_string(),
            genes: [gene.to_string()].into_iter().collect(),
        })
    }

    fn target_string(&self) -> String {
        let names: Vec<&str> = self.targets.iter().map(|t| t.display_plural()).collect();
        match self.mode {
            CoverageMode::AtLeast => format!("at least {}", join_with(&names, "and")),
            CoverageMode::AllOf => join_with(&names, "and"),
            CoverageMode::AnyOf => join_with(&names, "or"),
        }
    }
}

fn join_with(names: &[&str], conjunction: &str) -> String {
    match names.len() {
        0 => String::new(),
        1 => names[0].to_string(),
        2 => format!("{} {conjunction} {}", names[0], names[1]),
        _ => format!(
            "{} {conjunction} {}",
            names[..names.len() - 1].join(", "),
            names[names.len() - 1]
        ),
    }
}

/// The test must declare exactly this capability.
pub fn specific(target: MolecularTestTarget, message_prefix: &str) -> TargetCoveragePredicate {
    TargetCoveragePredicate {
        targets: [target].into_iter().collect(),
        mode: CoverageMode::AnyOf,
        message_prefix: Some(message_prefix.to_string()),
    }
}

/// The test must declare a capability implying coverage of `target`, e.g.
/// mutation coverage implies codon-level coverage.
pub fn at_least(target: MolecularTestTarget, message_prefix: &str) -> TargetCoveragePredicate {
    TargetCoveragePredicate {
        targets: [target].into_iter().collect(),
        mode: CoverageMode::AtLeast,
        message_prefix: Some(message_prefix.to_string()),
    }
}

/// The test must declare at least one capability of the full target alphabet.
pub fn any(message_prefix: Option<&str>) -> TargetCoveragePredicate {
    TargetCoveragePredicate {
        targets: MolecularTestTarget::ALL.into_iter().collect(),
        mode: CoverageMode::AnyOf,
        message_prefix: message_prefix.map(|p| p.to_string()),
    }
}

/// The test must declare every capability of the full target alphabet.
pub fn all(message_prefix: &str) -> TargetCoveragePredicate {
    TargetCoveragePredicate {
        targets: MolecularTestTarget::ALL.into_iter().collect(),
        mode: CoverageMode::AllOf,
        message_prefix: Some(message_prefix.to_string()),
    }
}

/// All of the given targets must be declared ("mutations and fusions").
pub fn and(targets: &[MolecularTestTarget], message_prefix: &str) -> TargetCoveragePredicate {
    TargetCoveragePredicate {
        targets: targets.iter().copied().collect(),
        mode: CoverageMode::AllOf,
        message_prefix: Some(message_prefix.to_string()),
    }
}

/// Any of the given targets must be declared ("mutations or fusions").
pub fn or(targets: &[MolecularTestTarget], message_prefix: &str) -> TargetCoveragePredicate {
    TargetCoveragePredicate {
        targets: targets.iter().copied().collect(),
        mode: CoverageMode::AnyOf,
        message_prefix: Some(message_prefix.to_string()),
    }
}
