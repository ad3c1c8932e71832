//! Shared fixtures for unit tests.

use crate::evaluation::{Evaluation, EvaluationResult};
use crate::message::EvaluationMessage;
use crate::patient::{
    Drivers, ExperimentType, MolecularTest, PanelTargetSpecification, PatientRecord, Variant,
};
use crate::target_coverage::MolecularTestTarget;
use chrono::NaiveDate;
use std::collections::HashMap;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn empty_record() -> PatientRecord {
    PatientRecord {
        patient_id: "ACTN-01-02-9999".to_string(),
        molecular_tests: Vec::new(),
        clinical: HashMap::new(),
    }
}

pub fn record_with_tests(tests: Vec<MolecularTest>) -> PatientRecord {
    PatientRecord {
        molecular_tests: tests,
        ..empty_record()
    }
}

pub fn whole_genome_test(test_date: Option<NaiveDate>) -> MolecularTest {
    MolecularTest {
        date: test_date,
        sample_id: Some("ACTN01029999T".to_string()),
        experiment_type: ExperimentType::WholeGenome,
        test_type_display: None,
        target_specification: None,
        has_sufficient_purity: true,
        has_sufficient_quality: true,
        drivers: Drivers::default(),
    }
}

pub fn panel_test(
    experiment_type: ExperimentType,
    test_date: Option<NaiveDate>,
    gene_targets: &[(&str, Vec<MolecularTestTarget>)],
) -> MolecularTest {
    MolecularTest {
        date: test_date,
        sample_id: Some("ACTN01029999T".to_string()),
        experiment_type,
        test_type_display: Some("panel".to_string()),
        target_specification: Some(PanelTargetSpecification {
            gene_targets: gene_targets
                .iter()
                .map(|(gene, targets)| (gene.to_string(), targets.clone()))
                .collect(),
        }),
        has_sufficient_purity: true,
        has_sufficient_quality: true,
        drivers: Drivers::default(),
    }
}

pub fn variant(gene: &str, event: &str) -> Variant {
    Variant {
        gene: gene.to_string(),
        event: event.to_string(),
        is_reportable: true,
    }
}

fn fixed_evaluation(result: EvaluationResult, index: usize) -> Evaluation {
    // Deliberately fills every message set so retention through combinators
    // is observable per result kind.
    let mut evaluation = Evaluation::empty(result, false);
    evaluation
        .pass_messages
        .insert(EvaluationMessage::static_message(format!("pass {index}")));
    evaluation
        .warn_messages
        .insert(EvaluationMessage::static_message(format!("warn {index}")));
    evaluation
        .fail_messages
        .insert(EvaluationMessage::static_message(format!("fail {index}")));
    evaluation
        .undetermined_messages
        .insert(EvaluationMessage::static_message(format!(
            "undetermined {index}"
        )));
    evaluation
}

/// Evaluator returning the same evaluation for every record.
pub fn fixed(
    result: EvaluationResult,
    index: usize,
) -> impl Fn(&PatientRecord) -> Evaluation + Send + Sync {
    let evaluation = fixed_evaluation(result, index);
    move |_: &PatientRecord| evaluation.clone()
}

/// Like `fixed`, with inclusion and exclusion molecular events attached.
pub fn fixed_with_events(
    result: EvaluationResult,
    index: usize,
) -> impl Fn(&PatientRecord) -> Evaluation + Send + Sync {
    let mut evaluation = fixed_evaluation(result, index);
    evaluation
        .inclusion_molecular_events
        .insert(format!("inclusion event {index}"));
    evaluation
        .exclusion_molecular_events
        .insert(format!("exclusion event {index}"));
    move |_: &PatientRecord| evaluation.clone()
}
