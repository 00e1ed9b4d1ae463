//! # Run repository
//!
//! Locates and loads the files produced for one run id, following a [`RunLayout`].
//!
//! ## Overview
//!
//! | Operation | File |
//! |-----------|------|
//! | [`RunRepository::load_input_set`] | `input/directions-<run>.txt` |
//! | [`RunRepository::load_best_trace`] | the snapshot with the greatest epoch |
//! | [`RunRepository::load_greedy_result`] | `greedy-solution.txt` |
//! | [`RunRepository::load_epoch_series`] | `simanneal-full-log.txt` |
//! | [`RunRepository::load_configuration`] | input header, snapshots, cooling description |
//! | [`RunRepository::load_record`] | all of the above |
//!
//! Each file is loaded on its own: a missing greedy file does not prevent reading the epoch
//! series of the same run. A missing run folder or file is reported as
//! [`TelAnnealError::RunNotFound`].
//!
//! Snapshots are found by listing the run folder and keeping the names
//! `<prefix><epoch><suffix>`, minus the reserved full log name. The epoch part must be an
//! integer.
use std::{fs::File, io::BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use regex::Regex;

use crate::{
    codec::{
        epoch_log::{self, EpochRecord},
        greedy_result::{self, GreedyResult},
        input_set::{self, InputSet},
        snapshot::{self, Snapshot},
    },
    constants::{Epoch, RunId},
    schedule::Schedule,
    telanneal_errors::TelAnnealError,
};

pub mod layout;
pub mod run_record;

pub use layout::{RunLayout, RunLayoutBuilder, RunVariant};
pub use run_record::{RunConfiguration, RunRecord};

/// Read access to the runs of an experiment root, for one solver variant.
#[derive(Debug, Clone)]
pub struct RunRepository {
    layout: RunLayout,
    variant: RunVariant,
}

impl RunRepository {
    /// Repository over the outputs of the unrestricted solver.
    pub fn new(layout: RunLayout) -> Self {
        RunRepository {
            layout,
            variant: RunVariant::BothRepresentations,
        }
    }

    /// Repository over the default layout rooted at `root`.
    pub fn open(root: impl Into<Utf8PathBuf>) -> Self {
        Self::new(RunLayout::new(root))
    }

    /// Same experiment root, other solver variant.
    pub fn with_variant(&self, variant: RunVariant) -> Self {
        RunRepository {
            layout: self.layout.clone(),
            variant,
        }
    }

    pub fn layout(&self) -> &RunLayout {
        &self.layout
    }

    pub fn variant(&self) -> RunVariant {
        self.variant
    }

    /// True if the output folder of `run_id` exists for `variant`.
    pub fn has_variant(&self, run_id: RunId, variant: RunVariant) -> bool {
        self.layout.run_dir(run_id, variant).is_dir()
    }

    /// Run ids having a run folder in the output folder, ascending.
    ///
    /// Folders whose suffix after the run prefix is not an integer are ignored.
    pub fn discover_run_ids(&self) -> Result<Vec<RunId>, TelAnnealError> {
        let output_dir = self.layout.output_dir(self.variant);
        let prefix = self.layout.run_dir_prefix();

        let mut run_ids = Vec::new();
        for entry in output_dir.read_dir_utf8()? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(run_id) = entry
                .file_name()
                .strip_prefix(prefix)
                .and_then(|id| id.parse::<RunId>().ok())
            {
                run_ids.push(run_id);
            }
        }
        run_ids.sort_unstable();
        debug!("Discovered {} runs in {output_dir}", run_ids.len());
        Ok(run_ids)
    }

    /// Load and validate the sampled pointing set of `run_id`.
    pub fn load_input_set(&self, run_id: RunId) -> Result<InputSet, TelAnnealError> {
        let path = self.layout.input_path(run_id);
        debug!("Loading input set of run {run_id} from {path}");
        InputSet::load(&path, Some(run_id)).map_err(|e| not_found(e, run_id, &path))
    }

    /// Location count declared on the second line of the input set.
    pub fn declared_location_count(&self, run_id: RunId) -> Result<usize, TelAnnealError> {
        let path = self.layout.input_path(run_id);
        let file = File::open(&path).map_err(|e| not_found(e.into(), run_id, &path))?;
        let header = input_set::read_header(BufReader::new(file), path.as_str())?;
        if header.run_id != run_id {
            return Err(TelAnnealError::CorruptInput {
                file: path.to_string(),
                reason: format!(
                    "run id {} inside the file does not match requested run id {run_id}",
                    header.run_id
                ),
            });
        }
        Ok(header.num_directions)
    }

    /// Snapshot files of `run_id` as `(epoch, path)`, ascending by epoch.
    pub fn list_snapshots(
        &self,
        run_id: RunId,
    ) -> Result<Vec<(Epoch, Utf8PathBuf)>, TelAnnealError> {
        let run_dir = self.layout.run_dir(run_id, self.variant);
        let pattern = self.snapshot_pattern()?;

        let entries = run_dir
            .read_dir_utf8()
            .map_err(|e| not_found(e.into(), run_id, &run_dir))?;

        let mut snapshots = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            if name == self.layout.full_log_name() {
                continue;
            }
            let Some(captures) = pattern.captures(name) else {
                continue;
            };
            let epoch = captures[1]
                .parse::<Epoch>()
                .map_err(|_| TelAnnealError::CorruptInput {
                    file: entry.path().to_string(),
                    reason: format!("snapshot name \"{name}\" does not carry an epoch number"),
                })?;
            snapshots.push((epoch, entry.path().to_path_buf()));
        }
        snapshots.sort_by_key(|(epoch, _)| *epoch);
        Ok(snapshots)
    }

    /// Epoch and best schedule of the latest snapshot.
    pub fn load_best_trace(&self, run_id: RunId) -> Result<(Epoch, Schedule), TelAnnealError> {
        let (epoch, path) = self.latest_snapshot(run_id)?;
        debug!("Loading best state of run {run_id} from {path}");
        let schedule = snapshot::load_best_state(&path)?;
        Ok((epoch, schedule))
    }

    /// Full content of the snapshot of `run_id` at `epoch`.
    pub fn load_snapshot(&self, run_id: RunId, epoch: Epoch) -> Result<Snapshot, TelAnnealError> {
        let path = self.layout.snapshot_path(run_id, self.variant, epoch);
        Snapshot::load(&path).map_err(|e| not_found(e, run_id, &path))
    }

    pub fn load_greedy_result(&self, run_id: RunId) -> Result<GreedyResult, TelAnnealError> {
        let path = self.layout.greedy_path(run_id, self.variant);
        debug!("Loading greedy result of run {run_id} from {path}");
        greedy_result::load_greedy_result(&path).map_err(|e| not_found(e, run_id, &path))
    }

    pub fn load_greedy_schedule(&self, run_id: RunId) -> Result<Schedule, TelAnnealError> {
        let path = self.layout.greedy_path(run_id, self.variant);
        greedy_result::load_greedy_schedule(&path).map_err(|e| not_found(e, run_id, &path))
    }

    /// Annealing trace of `run_id`, in file order.
    pub fn load_epoch_series(&self, run_id: RunId) -> Result<Vec<EpochRecord>, TelAnnealError> {
        let path = self.layout.full_log_path(run_id, self.variant);
        debug!("Loading epoch log of run {run_id} from {path}");
        epoch_log::load_epoch_log(&path).map_err(|e| not_found(e, run_id, &path))
    }

    /// Cooling description read from the earliest snapshot of `run_id`.
    pub fn load_cooling_description(&self, run_id: RunId) -> Result<String, TelAnnealError> {
        let snapshots = self.list_snapshots(run_id)?;
        let (_, path) = snapshots
            .first()
            .ok_or_else(|| self.no_snapshot(run_id))?;
        snapshot::load_cooling_description(path)
    }

    /// Group key of `run_id`: declared location count, last snapshot epoch, cooling description.
    pub fn load_configuration(&self, run_id: RunId) -> Result<RunConfiguration, TelAnnealError> {
        let snapshots = self.list_snapshots(run_id)?;
        let ((_, first), (last_epoch, _)) = snapshots
            .first()
            .zip(snapshots.last())
            .ok_or_else(|| self.no_snapshot(run_id))?;

        Ok(RunConfiguration {
            num_locations: self.declared_location_count(run_id)?,
            last_epoch: *last_epoch,
            cooling_description: snapshot::load_cooling_description(first)?,
        })
    }

    /// Load every file of `run_id` into a [`RunRecord`].
    pub fn load_record(&self, run_id: RunId) -> Result<RunRecord, TelAnnealError> {
        debug!("Loading run {run_id} ({:?})", self.variant);
        let inputs = self.load_input_set(run_id)?;
        let greedy = self.load_greedy_result(run_id)?;
        let epoch_series = self.load_epoch_series(run_id)?;
        let best_trace = self.load_best_trace(run_id)?;
        let cooling_description = self.load_cooling_description(run_id)?;

        RunRecord::new(
            run_id,
            self.variant,
            inputs.schedule,
            greedy,
            epoch_series,
            best_trace,
            cooling_description,
        )
    }

    fn latest_snapshot(&self, run_id: RunId) -> Result<(Epoch, Utf8PathBuf), TelAnnealError> {
        self.list_snapshots(run_id)?
            .pop()
            .ok_or_else(|| self.no_snapshot(run_id))
    }

    fn snapshot_pattern(&self) -> Result<Regex, TelAnnealError> {
        let pattern = format!(
            "^{}(.+){}$",
            regex::escape(self.layout.snapshot_prefix()),
            regex::escape(self.layout.snapshot_suffix())
        );
        Regex::new(&pattern).map_err(|e| TelAnnealError::ConfigurationError(e.to_string()))
    }

    fn no_snapshot(&self, run_id: RunId) -> TelAnnealError {
        TelAnnealError::RunNotFound {
            run_id,
            path: self
                .layout
                .run_dir(run_id, self.variant)
                .join(format!(
                    "{}*{}",
                    self.layout.snapshot_prefix(),
                    self.layout.snapshot_suffix()
                ))
                .to_string(),
        }
    }
}

/// Report a missing file as [`TelAnnealError::RunNotFound`], other errors unchanged.
fn not_found(err: TelAnnealError, run_id: RunId, path: &Utf8Path) -> TelAnnealError {
    match err {
        TelAnnealError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
            TelAnnealError::RunNotFound {
                run_id,
                path: path.to_string(),
            }
        }
        other => other,
    }
}
