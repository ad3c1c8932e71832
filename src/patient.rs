use crate::target_coverage::{MolecularTestTarget, TargetCoveragePredicate};
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Write};

/// Read-only input to every evaluation: the patient's molecular test history
/// plus an opaque clinical payload consumed by concrete criterion evaluators.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_id: String,
    #[serde(default)]
    pub molecular_tests: Vec<MolecularTest>,
    #[serde(default)]
    pub clinical: HashMap<String, serde_json::Value>,
}

impl PatientRecord {
    pub fn from_json_file(filename: &str) -> Result<PatientRecord> {
        let file = File::open(filename)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn write_json_file(&self, filename: &str) -> Result<()> {
        let mut file = File::create(filename)?;
        file.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
        Ok(())
    }
}

/// Platform a molecular test was run on, ranked by evidence quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperimentType {
    WholeGenome,
    TargetedPanel,
    ExternalPanel,
}

impl ExperimentType {
    /// Lower rank wins ties during reconciliation.
    pub fn precedence_rank(&self) -> u8 {
        match self {
            ExperimentType::WholeGenome => 1,
            ExperimentType::TargetedPanel => 2,
            ExperimentType::ExternalPanel => 3,
        }
    }

    /// Whole-genome and curated targeted panels are structurally called and
    /// supersede weaker corroborating or conflicting sources outright.
    pub fn is_authoritative(&self) -> bool {
        matches!(
            self,
            ExperimentType::WholeGenome | ExperimentType::TargetedPanel
        )
    }
}

/// Per-gene capabilities a panel declares; absent genes are not covered.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PanelTargetSpecification {
    pub gene_targets: HashMap<String, Vec<MolecularTestTarget>>,
}

impl PanelTargetSpecification {
    pub fn tests_gene(&self, gene: &str, targets: &TargetCoveragePredicate) -> bool {
        self.gene_targets
            .get(gene)
            .map(|declared| targets.test(declared))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MolecularTest {
    pub date: Option<NaiveDate>,
    pub sample_id: Option<String>,
    pub experiment_type: ExperimentType,
    pub test_type_display: Option<String>,
    pub target_specification: Option<PanelTargetSpecification>,
    pub has_sufficient_purity: bool,
    pub has_sufficient_quality: bool,
    #[serde(default)]
    pub drivers: Drivers,
}

impl MolecularTest {
    /// Whether this test's declared capabilities can judge `gene` at all.
    ///
    /// Panics when a non-whole-genome test carries no panel specification;
    /// such a test cannot exist given correct upstream loading.
    pub fn tests_gene(&self, gene: &str, targets: &TargetCoveragePredicate) -> bool {
        if self.experiment_type == ExperimentType::WholeGenome {
            return true;
        }
        match &self.target_specification {
            Some(specification) => specification.tests_gene(gene, targets),
            None => panic!(
                "non whole-genome test without a panel target specification: {:?}",
                self.test_type_display
            ),
        }
    }

    pub fn has_sufficient_quality_and_purity(&self) -> bool {
        self.has_sufficient_quality && self.has_sufficient_purity
    }
}

/// Named molecular findings of one test, the inputs to per-test criterion
/// logic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Drivers {
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub copy_numbers: Vec<CopyNumber>,
    #[serde(default)]
    pub fusions: Vec<Fusion>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Variant {
    pub gene: String,
    pub event: String,
    pub is_reportable: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyNumberType {
    Amplification,
    Deletion,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CopyNumber {
    pub gene: String,
    pub event: String,
    pub copy_number_type: CopyNumberType,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fusion {
    pub gene_start: String,
    pub gene_end: String,
    pub event: String,
    pub is_reportable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target_coverage::{self, MolecularTestTarget::*};
    use crate::testutil;

    #[test]
    fn test_whole_genome_covers_every_gene() {
        let test = testutil::whole_genome_test(Some(testutil::date(2023, 1, 1)));
        assert!(test.tests_gene("EGFR", &target_coverage::any(None)));
        assert!(test.tests_gene("XYZ1", &target_coverage::all("Status of")));
    }

    #[test]
    fn test_panel_delegates_to_specification() {
        let test = testutil::panel_test(
            ExperimentType::ExternalPanel,
            Some(testutil::date(2023, 1, 1)),
            &[("EGFR", vec![Mutation, Fusion])],
        );
        assert!(test.tests_gene("EGFR", &target_coverage::specific(Mutation, "x")));
        assert!(!test.tests_gene("EGFR", &target_coverage::specific(Amplification, "x")));
        assert!(!test.tests_gene("KRAS", &target_coverage::any(None)));
    }

    #[test]
    #[should_panic(expected = "panel target specification")]
    fn test_panel_without_specification_panics() {
        let mut test = testutil::whole_genome_test(None);
        test.experiment_type = ExperimentType::ExternalPanel;
        test.tests_gene("EGFR", &target_coverage::any(None));
    }

    #[test]
    fn test_record_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patient.json");
        let record = testutil::record_with_tests(vec![testutil::whole_genome_test(Some(
            testutil::date(2023, 5, 12),
        ))]);
        record.write_json_file(path.to_str().unwrap()).unwrap();
        let loaded = PatientRecord::from_json_file(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.patient_id, record.patient_id);
        assert_eq!(loaded.molecular_tests.len(), 1);
        assert_eq!(
            loaded.molecular_tests[0].date,
            Some(testutil::date(2023, 5, 12))
        );
    }
}
