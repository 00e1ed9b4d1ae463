use crate::{
    codec::{epoch_log::EpochRecord, greedy_result::GreedyResult},
    constants::{Epoch, RunId},
    repository::layout::RunVariant,
    schedule::Schedule,
    telanneal_errors::TelAnnealError,
};

/// Solver settings shared by the runs of a group.
///
/// Ordering is lexicographic over the fields in declaration order: location count, then
/// last epoch, then cooling description.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunConfiguration {
    pub num_locations: usize,
    pub last_epoch: Epoch,
    /// Raw description lines, each terminated by `'\n'`.
    pub cooling_description: String,
}

/// Everything the solver produced for one run, read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    run_id: RunId,
    variant: RunVariant,
    inputs: Schedule,
    greedy: GreedyResult,
    epoch_series: Vec<EpochRecord>,
    last_epoch: Epoch,
    best_schedule: Schedule,
    cooling_description: String,
}

impl RunRecord {
    /// Assemble a run record.
    ///
    /// Arguments
    /// -----------------
    /// * `inputs` – The sampled pointing set of the run.
    /// * `greedy` – Greedy baseline score and runtime.
    /// * `epoch_series` – Annealing trace, in epoch order.
    /// * `best_trace` – Last snapshot epoch and its best schedule.
    ///
    /// Return
    /// ----------
    /// * `Err(TelAnnealError::CorruptInput)` if the trace has no row, since the final
    ///   annealed objective is its last row.
    pub fn new(
        run_id: RunId,
        variant: RunVariant,
        inputs: Schedule,
        greedy: GreedyResult,
        epoch_series: Vec<EpochRecord>,
        best_trace: (Epoch, Schedule),
        cooling_description: String,
    ) -> Result<Self, TelAnnealError> {
        if epoch_series.is_empty() {
            return Err(TelAnnealError::CorruptInput {
                file: format!("epoch log of run {run_id}"),
                reason: "the log holds no epoch row".into(),
            });
        }
        let (last_epoch, best_schedule) = best_trace;
        Ok(RunRecord {
            run_id,
            variant,
            inputs,
            greedy,
            epoch_series,
            last_epoch,
            best_schedule,
            cooling_description,
        })
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn variant(&self) -> RunVariant {
        self.variant
    }

    pub fn inputs(&self) -> &Schedule {
        &self.inputs
    }

    pub fn greedy(&self) -> GreedyResult {
        self.greedy
    }

    pub fn epoch_series(&self) -> &[EpochRecord] {
        &self.epoch_series
    }

    pub fn last_epoch(&self) -> Epoch {
        self.last_epoch
    }

    pub fn best_schedule(&self) -> &Schedule {
        &self.best_schedule
    }

    pub fn configuration(&self) -> RunConfiguration {
        RunConfiguration {
            num_locations: self.inputs.len(),
            last_epoch: self.last_epoch,
            cooling_description: self.cooling_description.clone(),
        }
    }

    /// Best objective on the last row of the annealing trace.
    pub fn final_best_objective(&self) -> f64 {
        self.epoch_series
            .last()
            .map(|row| row.best_objective)
            .unwrap_or(f64::INFINITY)
    }

    /// `greedy score − final best objective`, positive when annealing improved.
    pub fn improvement(&self) -> f64 {
        self.greedy.score - self.final_best_objective()
    }

    /// Strict: a tie counts for the greedy baseline.
    pub fn annealing_beats_greedy(&self) -> bool {
        self.final_best_objective() < self.greedy.score
    }

    /// First trace row whose best objective is strictly below the greedy score.
    pub fn first_match(&self) -> Option<&EpochRecord> {
        self.epoch_series
            .iter()
            .find(|row| row.best_objective < self.greedy.score)
    }

    /// Trace rows whose best objective is strictly below the greedy score.
    pub fn epochs_beating_greedy(&self) -> impl Iterator<Item = &EpochRecord> + '_ {
        self.epoch_series
            .iter()
            .filter(|row| row.best_objective < self.greedy.score)
    }
}
