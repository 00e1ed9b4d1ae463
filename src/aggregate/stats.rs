//! Comparative statistics of a group of runs: greedy baseline versus annealing.
use crate::{
    aggregate::histogram::{Bins, HistogramParams},
    constants::{Epoch, Nanos, RunId},
    repository::run_record::RunRecord,
    telanneal_errors::TelAnnealError,
};

/// How many runs annealing won, ties going to the greedy baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WinTally {
    pub annealing_better: usize,
    pub greedy_better: usize,
}

impl WinTally {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RunRecord>) -> Self {
        records
            .into_iter()
            .fold(WinTally::default(), |mut tally, record| {
                if record.annealing_beats_greedy() {
                    tally.annealing_better += 1;
                } else {
                    tally.greedy_better += 1;
                }
                tally
            })
    }

    pub fn total(&self) -> usize {
        self.annealing_better + self.greedy_better
    }
}

/// Trace row where annealing first went strictly below the greedy score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTime {
    pub run_id: RunId,
    pub epoch: Epoch,
    pub wall_time_ns: Nanos,
}

/// Time needed by annealing to beat the greedy score, per run.
///
/// Runs that never beat it are listed in `no_match`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeToMatch {
    pub matches: Vec<MatchTime>,
    pub no_match: Vec<RunId>,
}

impl TimeToMatch {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RunRecord>) -> Self {
        let mut stat = TimeToMatch::default();
        for record in records {
            match record.first_match() {
                Some(row) => stat.matches.push(MatchTime {
                    run_id: record.run_id(),
                    epoch: row.epoch,
                    wall_time_ns: row.wall_time_ns,
                }),
                None => stat.no_match.push(record.run_id()),
            }
        }
        stat
    }

    pub fn matched_count(&self) -> usize {
        self.matches.len()
    }

    pub fn no_match_count(&self) -> usize {
        self.no_match.len()
    }
}

/// `greedy score − final best objective` of every run of a group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImprovementDistribution {
    pub improvements: Vec<(RunId, f64)>,
}

impl ImprovementDistribution {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RunRecord>) -> Self {
        ImprovementDistribution {
            improvements: records
                .into_iter()
                .map(|record| (record.run_id(), record.improvement()))
                .collect(),
        }
    }

    /// Improvements where the greedy baseline did better.
    pub fn negatives(&self) -> Vec<f64> {
        self.values().filter(|i| *i < 0.0).collect()
    }

    /// Improvements where annealing did better.
    pub fn positives(&self) -> Vec<f64> {
        self.values().filter(|i| *i > 0.0).collect()
    }

    pub fn zero_count(&self) -> usize {
        self.values().filter(|i| *i == 0.0).count()
    }

    /// Largest magnitude, `0` for an empty group.
    pub fn max_abs(&self) -> f64 {
        self.values().map(f64::abs).fold(0.0, f64::max)
    }

    pub fn bins(&self, params: &HistogramParams) -> Bins {
        Bins::for_improvements(self.max_abs(), params)
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.improvements.iter().map(|(_, i)| *i)
    }
}

/// Greedy runtimes next to annealing match times, in microseconds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimingComparison {
    pub greedy_us: Vec<f64>,
    pub match_us: Vec<f64>,
}

impl TimingComparison {
    pub fn new<'a>(
        records: impl IntoIterator<Item = &'a RunRecord>,
        time_to_match: &TimeToMatch,
    ) -> Self {
        TimingComparison {
            greedy_us: records
                .into_iter()
                .map(|record| record.greedy().elapsed_ns as f64 / 1000.0)
                .collect(),
            match_us: time_to_match
                .matches
                .iter()
                .map(|m| m.wall_time_ns as f64 / 1000.0)
                .collect(),
        }
    }

    /// One shared range over both series.
    pub fn bins(&self, params: &HistogramParams) -> Bins {
        let all: Vec<f64> = self
            .greedy_us
            .iter()
            .chain(self.match_us.iter())
            .copied()
            .collect();
        Bins::for_timings(&all, params)
    }
}

/// Whether allowing both representations lowered a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AblationOutcome {
    Improved,
    NoImprovement,
}

impl AblationOutcome {
    /// `Improved` on a strict decrease only.
    pub fn classify(both_representations: f64, single_representation: f64) -> Self {
        if both_representations < single_representation {
            AblationOutcome::Improved
        } else {
            AblationOutcome::NoImprovement
        }
    }
}

/// Scores of one run with and without the alternate representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AblationEntry {
    pub run_id: RunId,
    pub greedy_both: f64,
    pub greedy_single: f64,
    pub anneal_both: f64,
    pub anneal_single: f64,
    pub greedy: AblationOutcome,
    pub anneal: AblationOutcome,
}

impl AblationEntry {
    /// Compare the two variants of the same run.
    ///
    /// Return
    /// ----------
    /// * `Err(TelAnnealError::ConfigurationError)` if the records are not the same run or
    ///   their configurations differ.
    pub fn compare(both: &RunRecord, single: &RunRecord) -> Result<Self, TelAnnealError> {
        if both.run_id() != single.run_id() {
            return Err(TelAnnealError::ConfigurationError(format!(
                "cannot compare run {} with run {}",
                both.run_id(),
                single.run_id()
            )));
        }
        if both.configuration() != single.configuration() {
            return Err(TelAnnealError::ConfigurationError(format!(
                "run {} was not solved with the same configuration by both variants",
                both.run_id()
            )));
        }

        let greedy_both = both.greedy().score;
        let greedy_single = single.greedy().score;
        let anneal_both = both.final_best_objective();
        let anneal_single = single.final_best_objective();
        Ok(AblationEntry {
            run_id: both.run_id(),
            greedy_both,
            greedy_single,
            anneal_both,
            anneal_single,
            greedy: AblationOutcome::classify(greedy_both, greedy_single),
            anneal: AblationOutcome::classify(anneal_both, anneal_single),
        })
    }
}

/// Per-run ablation entries of a group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AblationComparison {
    pub entries: Vec<AblationEntry>,
}

impl AblationComparison {
    pub fn greedy_improved(&self) -> usize {
        self.count(|e| e.greedy)
    }

    pub fn anneal_improved(&self) -> usize {
        self.count(|e| e.anneal)
    }

    fn count(&self, outcome: impl Fn(&AblationEntry) -> AblationOutcome) -> usize {
        self.entries
            .iter()
            .filter(|e| outcome(*e) == AblationOutcome::Improved)
            .count()
    }
}
