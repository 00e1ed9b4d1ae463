//! # Group aggregation
//!
//! Partition runs by solver configuration and compare annealing against the greedy
//! baseline inside each group.
//!
//! ## Grouping
//! -----------------
//! Runs are keyed by their [`RunConfiguration`]. Groups are numbered from `1` in ascending
//! configuration order (location count, then last epoch, then cooling description), and
//! the run ids of a group are sorted. Numbering therefore only depends on the set of runs,
//! never on the order in which they were listed.
//!
//! ## Per-group statistics
//! -----------------
//! * [`WinTally`] – annealing strictly better versus greedy better or tied.
//! * [`TimeToMatch`] – wall time of the first epoch strictly below the greedy score, runs
//!   that never get there are counted apart.
//! * [`ImprovementDistribution`] – `greedy − final best` per run, with symmetric bins.
//! * [`TimingComparison`] – greedy runtimes and match times, in microseconds.
//! * [`AblationComparison`] – when every run of the group was also solved without the
//!   alternate representation.
//!
//! Any error raised while loading a run is wrapped into [`TelAnnealError::RunFailed`] so that
//! the run responsible is named.
use std::collections::BTreeMap;

use itertools::Itertools;
use log::info;

use crate::{
    constants::RunId,
    repository::{
        layout::RunVariant,
        run_record::{RunConfiguration, RunRecord},
        RunRepository,
    },
    telanneal_errors::TelAnnealError,
};

pub mod histogram;
pub mod report;
pub mod stats;

use histogram::{Bins, HistogramParams};
use stats::{
    AblationComparison, AblationEntry, ImprovementDistribution, TimeToMatch, TimingComparison,
    WinTally,
};

/// Runs sharing one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// 1-based ordinal in configuration order.
    pub number: usize,
    pub configuration: RunConfiguration,
    /// Ascending.
    pub run_ids: Vec<RunId>,
}

/// Statistics of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group: Group,
    pub records: Vec<RunRecord>,
    pub wins: WinTally,
    pub time_to_match: TimeToMatch,
    pub improvement: ImprovementDistribution,
    pub improvement_bins: Bins,
    pub timing: TimingComparison,
    pub timing_bins: Bins,
    pub ablation: Option<AblationComparison>,
}

impl GroupSummary {
    /// Compute the statistics of `group` from its loaded records.
    pub fn compute(group: Group, records: Vec<RunRecord>, params: &HistogramParams) -> Self {
        let wins = WinTally::from_records(&records);
        let time_to_match = TimeToMatch::from_records(&records);
        let improvement = ImprovementDistribution::from_records(&records);
        let improvement_bins = improvement.bins(params);
        let timing = TimingComparison::new(&records, &time_to_match);
        let timing_bins = timing.bins(params);

        GroupSummary {
            group,
            records,
            wins,
            time_to_match,
            improvement,
            improvement_bins,
            timing,
            timing_bins,
            ablation: None,
        }
    }

    pub fn with_ablation(mut self, ablation: AblationComparison) -> Self {
        self.ablation = Some(ablation);
        self
    }
}

/// Build the numbered groups from `(run id, configuration)` pairs.
///
/// A run id listed more than once appears once in its group.
pub fn group_configurations(
    configurations: impl IntoIterator<Item = (RunId, RunConfiguration)>,
) -> Vec<Group> {
    let mut by_configuration: BTreeMap<RunConfiguration, Vec<RunId>> = BTreeMap::new();
    for (run_id, configuration) in configurations {
        by_configuration
            .entry(configuration)
            .or_default()
            .push(run_id);
    }

    by_configuration
        .into_iter()
        .zip(1..)
        .map(|((configuration, mut run_ids), number)| {
            run_ids.sort_unstable();
            run_ids.dedup();
            Group {
                number,
                configuration,
                run_ids,
            }
        })
        .collect()
}

/// Group `run_ids` by the configuration read from `repo`.
pub fn group_runs(
    repo: &RunRepository,
    run_ids: &[RunId],
) -> Result<Vec<Group>, TelAnnealError> {
    let configurations = run_ids
        .iter()
        .unique()
        .map(|&run_id| {
            repo.load_configuration(run_id)
                .map(|configuration| (run_id, configuration))
                .map_err(|e| e.for_run(run_id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let groups = group_configurations(configurations);
    info!(
        "Grouped {} runs into {} configuration groups",
        run_ids.len(),
        groups.len()
    );
    Ok(groups)
}

/// Load every run of `group` from `repo`.
pub fn load_group_records(
    repo: &RunRepository,
    group: &Group,
) -> Result<Vec<RunRecord>, TelAnnealError> {
    group
        .run_ids
        .iter()
        .map(|&run_id| repo.load_record(run_id).map_err(|e| e.for_run(run_id)))
        .collect()
}

/// Compare every run of `group` with its single-representation variant.
///
/// Return
/// ----------
/// * `Ok(None)` if at least one run of the group has no single-representation output.
pub fn compare_representations(
    repo: &RunRepository,
    group: &Group,
    records: &[RunRecord],
) -> Result<Option<AblationComparison>, TelAnnealError> {
    let single_repo = repo.with_variant(RunVariant::SingleRepresentation);
    if !group
        .run_ids
        .iter()
        .all(|&run_id| repo.has_variant(run_id, RunVariant::SingleRepresentation))
    {
        return Ok(None);
    }

    let entries = records
        .iter()
        .map(|both| {
            let run_id = both.run_id();
            single_repo
                .load_record(run_id)
                .and_then(|single| AblationEntry::compare(both, &single))
                .map_err(|e| e.for_run(run_id))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(AblationComparison { entries }))
}

/// Group, load and summarize `run_ids` with the default histogram parameters.
pub fn summarize(
    repo: &RunRepository,
    run_ids: &[RunId],
) -> Result<Vec<GroupSummary>, TelAnnealError> {
    summarize_with(repo, run_ids, &HistogramParams::default())
}

/// Group, load and summarize `run_ids`.
///
/// Arguments
/// -----------------
/// * `repo` – Repository of the unrestricted solver outputs.
/// * `run_ids` – Runs to summarize, in any order.
/// * `params` – Histogram parameters, validated first.
///
/// Return
/// ----------
/// * One summary per group, in group number order. The ablation comparison is filled in
///   for the groups whose runs all have a single-representation output.
///
/// See also
/// ------------
/// * [`group_runs`] – Grouping step alone.
/// * [`GroupSummary::compute`] – Statistics of already loaded records.
pub fn summarize_with(
    repo: &RunRepository,
    run_ids: &[RunId],
    params: &HistogramParams,
) -> Result<Vec<GroupSummary>, TelAnnealError> {
    let params = params.validate()?;
    let groups = group_runs(repo, run_ids)?;

    let mut summaries = Vec::with_capacity(groups.len());
    for group in groups {
        let records = load_group_records(repo, &group)?;
        let ablation = compare_representations(repo, &group, &records)?;

        let mut summary = GroupSummary::compute(group, records, &params);
        if let Some(ablation) = ablation {
            summary = summary.with_ablation(ablation);
        }
        info!(
            "Group {}: {} runs, annealing better in {}, {} never matched greedy",
            summary.group.number,
            summary.group.run_ids.len(),
            summary.wins.annealing_better,
            summary.time_to_match.no_match_count()
        );
        summaries.push(summary);
    }
    Ok(summaries)
}

#[cfg(test)]
mod aggregate_test {
    use super::*;

    fn config(num_locations: usize, last_epoch: u64, cooling: &str) -> RunConfiguration {
        RunConfiguration {
            num_locations,
            last_epoch,
            cooling_description: cooling.into(),
        }
    }

    #[test]
    fn test_group_configurations() {
        let groups = group_configurations(vec![
            (4, config(10, 100, "A")),
            (1, config(10, 100, "A")),
            (2, config(20, 100, "A")),
            (3, config(10, 100, "A")),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].number, 1);
        assert_eq!(groups[0].run_ids, vec![1, 3, 4]);
        assert_eq!(groups[1].number, 2);
        assert_eq!(groups[1].run_ids, vec![2]);
        assert_eq!(groups[1].configuration.num_locations, 20);
    }

    #[test]
    fn test_group_order_is_input_independent() {
        let pairs = vec![
            (1, config(10, 200, "B")),
            (2, config(10, 100, "Z")),
            (3, config(10, 200, "A")),
            (4, config(5, 900, "A")),
        ];
        let mut reversed = pairs.clone();
        reversed.reverse();

        let groups = group_configurations(pairs);
        assert_eq!(groups, group_configurations(reversed));
        let order: Vec<RunId> = groups.iter().map(|g| g.run_ids[0]).collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_repeated_run_id_counts_once() {
        let groups = group_configurations(vec![
            (1, config(10, 100, "A")),
            (2, config(10, 100, "A")),
            (1, config(10, 100, "A")),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].run_ids, vec![1, 2]);
    }

    #[test]
    fn test_empty_grouping() {
        assert!(group_configurations(Vec::new()).is_empty());
    }
}
