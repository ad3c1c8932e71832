use crate::patient::{ExperimentType, MolecularTest};
use chrono::NaiveDate;

/// Filters a patient's molecular test history before criterion logic runs.
///
/// Insufficient-quality tests are dropped unless a criterion explicitly opts
/// into them. With a maximum test age set, superseded external panels are
/// dropped: only panels newer than the newest in-house result remain, except
/// fusion-bearing panels which stay as long as they clear the age cutoff
/// (in-house whole-genome data absent, fusions may only exist on the panel).
#[derive(Clone, Debug, Default)]
pub struct MolecularTestFilter {
    max_test_age: Option<NaiveDate>,
    use_insufficient_quality_records: bool,
}

impl MolecularTestFilter {
    pub fn new(max_test_age: Option<NaiveDate>, use_insufficient_quality_records: bool) -> Self {
        MolecularTestFilter {
            max_test_age,
            use_insufficient_quality_records,
        }
    }

    pub fn apply(&self, tests: &[MolecularTest]) -> Vec<MolecularTest> {
        let filtered: Vec<MolecularTest> = if self.use_insufficient_quality_records {
            tests.to_vec()
        } else {
            tests
                .iter()
                .filter(|t| t.has_sufficient_quality)
                .cloned()
                .collect()
        };

        let max_test_age = match self.max_test_age {
            Some(age) if !filtered.is_empty() => age,
            _ => return filtered,
        };

        let most_recent_test_date = filtered.iter().filter_map(|t| t.date).max();
        let most_recent_whole_genome = filtered
            .iter()
            .find(|t| t.experiment_type == ExperimentType::WholeGenome)
            .and_then(|t| t.date);
        let most_recent_targeted_panel = filtered
            .iter()
            .find(|t| t.experiment_type == ExperimentType::TargetedPanel)
            .and_then(|t| t.date);

        filtered
            .into_iter()
            .filter(|test| {
                let date = match test.date {
                    Some(date) => date,
                    None => return true,
                };
                let is_external = test.experiment_type == ExperimentType::ExternalPanel;
                if is_external
                    && most_recent_targeted_panel.is_some()
                    && most_recent_whole_genome.is_none()
                    && !test.drivers.fusions.is_empty()
                {
                    date >= max_test_age
                } else if is_external && most_recent_targeted_panel.is_some() {
                    date > most_recent_targeted_panel.unwrap_or(max_test_age)
                } else if is_external && most_recent_whole_genome.is_some() {
                    date > most_recent_whole_genome.unwrap_or(max_test_age)
                } else {
                    most_recent_test_date.map(|m| date >= m).unwrap_or(true) || date >= max_test_age
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::Fusion;
    use crate::testutil::{self, date};
    use crate::target_coverage::MolecularTestTarget::Mutation;

    fn external_panel(d: NaiveDate) -> MolecularTest {
        testutil::panel_test(
            ExperimentType::ExternalPanel,
            Some(d),
            &[("EGFR", vec![Mutation])],
        )
    }

    #[test]
    fn test_drops_insufficient_quality_tests() {
        let mut low_quality = testutil::whole_genome_test(Some(date(2023, 1, 1)));
        low_quality.has_sufficient_quality = false;
        let good = testutil::whole_genome_test(Some(date(2023, 2, 1)));
        let filter = MolecularTestFilter::new(None, false);
        assert_eq!(filter.apply(&[low_quality.clone(), good.clone()]).len(), 1);
        let filter = MolecularTestFilter::new(None, true);
        assert_eq!(filter.apply(&[low_quality, good]).len(), 2);
    }

    #[test]
    fn test_no_max_age_keeps_everything() {
        let tests = vec![
            testutil::whole_genome_test(Some(date(2018, 1, 1))),
            external_panel(date(2015, 1, 1)),
        ];
        let filter = MolecularTestFilter::new(None, false);
        assert_eq!(filter.apply(&tests).len(), 2);
    }

    #[test]
    fn test_external_panel_older_than_whole_genome_is_dropped() {
        let tests = vec![
            testutil::whole_genome_test(Some(date(2023, 6, 1))),
            external_panel(date(2023, 1, 1)),
        ];
        let filter = MolecularTestFilter::new(Some(date(2022, 1, 1)), false);
        let kept = filter.apply(&tests);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].experiment_type, ExperimentType::WholeGenome);
    }

    #[test]
    fn test_external_panel_newer_than_whole_genome_is_kept() {
        let tests = vec![
            testutil::whole_genome_test(Some(date(2023, 1, 1))),
            external_panel(date(2023, 6, 1)),
        ];
        let filter = MolecularTestFilter::new(Some(date(2022, 1, 1)), false);
        assert_eq!(filter.apply(&tests).len(), 2);
    }

    #[test]
    fn test_fusion_bearing_panel_survives_newer_targeted_panel() {
        let mut panel = external_panel(date(2022, 6, 1));
        panel.drivers.fusions.push(Fusion {
            gene_start: "EML4".to_string(),
            gene_end: "ALK".to_string(),
            event: "EML4-ALK fusion".to_string(),
            is_reportable: true,
        });
        let tests = vec![
            testutil::panel_test(ExperimentType::TargetedPanel, Some(date(2023, 1, 1)), &[]),
            panel,
        ];
        let filter = MolecularTestFilter::new(Some(date(2022, 1, 1)), false);
        assert_eq!(filter.apply(&tests).len(), 2);
    }

    #[test]
    fn test_undated_tests_are_kept() {
        let tests = vec![
            testutil::whole_genome_test(Some(date(2023, 1, 1))),
            testutil::whole_genome_test(None),
        ];
        let filter = MolecularTestFilter::new(Some(date(2022, 1, 1)), false);
        assert_eq!(filter.apply(&tests).len(), 2);
    }
}
