#![allow(dead_code)]

use std::{
    fs::{self, File},
    io::BufWriter,
};

use camino::Utf8Path;
use telanneal::{
    codec::{
        epoch_log::{write_epoch_log, EpochRecord},
        greedy_result::{write_greedy_result, GreedyResult},
        input_set::InputSet,
        snapshot::Snapshot,
    },
    constants::{Epoch, Nanos, RunId},
    RunLayout, RunVariant,
};

pub const GEOMETRIC_COOLING: &str = "Piecewise constant geometric cooling schedule:\n10 * 0.95^(epoch / 100)\n";

/// Solver outputs of one run.
#[derive(Debug, Clone)]
pub struct RunFixture {
    pub num_locations: usize,
    pub greedy_score: f64,
    pub greedy_ns: Nanos,
    /// `(epoch, wall time, best objective)` rows of the epoch log.
    pub trace: Vec<(Epoch, Nanos, f64)>,
    pub snapshot_epochs: Vec<Epoch>,
    pub cooling: String,
}

impl RunFixture {
    pub fn new(num_locations: usize, greedy_score: f64, trace: &[(Epoch, Nanos, f64)]) -> Self {
        RunFixture {
            num_locations,
            greedy_score,
            greedy_ns: 2_000,
            trace: trace.to_vec(),
            snapshot_epochs: trace.iter().map(|(epoch, _, _)| *epoch).collect(),
            cooling: GEOMETRIC_COOLING.to_string(),
        }
    }

    pub fn with_snapshots(mut self, epochs: &[Epoch]) -> Self {
        self.snapshot_epochs = epochs.to_vec();
        self
    }

    pub fn with_cooling(mut self, cooling: &str) -> Self {
        self.cooling = cooling.to_string();
        self
    }
}

pub fn tempdir_root(dir: &tempfile::TempDir) -> &Utf8Path {
    Utf8Path::from_path(dir.path()).expect("temporary folder is not UTF-8")
}

/// Sample and save the input set of `run_id`.
pub fn write_input(layout: &RunLayout, run_id: RunId, count: usize) -> InputSet {
    let input = InputSet::simulate(run_id, count);
    input
        .save(&layout.input_path(run_id))
        .expect("failed to save input set");
    input
}

/// Write the input set and every output file of `run_id` for `variant`.
pub fn write_run(layout: &RunLayout, run_id: RunId, variant: RunVariant, fixture: &RunFixture) {
    let input = if layout.input_path(run_id).exists() {
        InputSet::load(&layout.input_path(run_id), Some(run_id)).expect("bad input set")
    } else {
        write_input(layout, run_id, fixture.num_locations)
    };

    let run_dir = layout.run_dir(run_id, variant);
    fs::create_dir_all(&run_dir).unwrap();

    let mut greedy = BufWriter::new(File::create(layout.greedy_path(run_id, variant)).unwrap());
    write_greedy_result(
        &mut greedy,
        run_id,
        &GreedyResult {
            score: fixture.greedy_score,
            elapsed_ns: fixture.greedy_ns,
        },
        &input.schedule,
    )
    .unwrap();

    let records: Vec<EpochRecord> = fixture
        .trace
        .iter()
        .map(|&(epoch, ns, best)| EpochRecord::new(epoch, ns, best))
        .collect();
    let mut log = BufWriter::new(File::create(layout.full_log_path(run_id, variant)).unwrap());
    write_epoch_log(&mut log, run_id, &records).unwrap();

    let final_best = fixture.trace.last().map_or(fixture.greedy_score, |t| t.2);
    for &epoch in &fixture.snapshot_epochs {
        let snapshot = Snapshot {
            run_id,
            current_objective: final_best,
            best_objective: final_best,
            current_epoch: epoch,
            elapsed_ns: 1_000 * (epoch + 1),
            cooling_description: fixture.cooling.clone(),
            random_start: u64::from(run_id),
            best_epoch: epoch,
            best_elapsed_ns: 1_000 * (epoch + 1),
            best_state: input.schedule.clone(),
        };
        let mut file =
            BufWriter::new(File::create(layout.snapshot_path(run_id, variant, epoch)).unwrap());
        snapshot.write_to(&mut file).unwrap();
    }
}
