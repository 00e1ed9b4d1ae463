//! # Annealer state snapshots
//!
//! Each time the best objective improves enough, the annealer dumps a snapshot
//! `simanneal-<epoch>.txt`:
//!
//! ```text
//! Run id: 4
//! Current objective: 34.0100000000
//! Best objective: 34.0100000000
//! --------------------------------------------------
//! Current epoch: 12
//! Time running (ns): 20211
//! Cooling method description:
//! Geometric cooling schedule:
//! 10 * (0.99^epoch)
//! --------------------------------------------------
//! Random start: 4
//! --------------------------------------------------
//! Best state from epoch: 12
//! Best found after time (ns): 20211
//! Best State:
//! Direction(id=0, theta=..., phi=...)
//! --------------------------------------------------
//! ```
//!
//! Scalar values are read from `<label>: <value>` lines found anywhere in the file, the
//! cooling description and the best state are read as sections.
use std::{
    fs::File,
    io::{BufRead, BufReader, Read, Write},
    str::FromStr,
};

use camino::Utf8Path;

use super::{labeled_value, read_schedule, read_section, write_schedule};
use crate::{
    constants::{
        Epoch, Nanos, RunId, BEST_STATE_HEADER, COOLING_DESCRIPTION_HEADER, SEPARATOR,
    },
    schedule::Schedule,
    telanneal_errors::TelAnnealError,
};

const RUN_ID_LABEL: &str = "Run id:";
const CURRENT_OBJECTIVE_LABEL: &str = "Current objective:";
const BEST_OBJECTIVE_LABEL: &str = "Best objective:";
const CURRENT_EPOCH_LABEL: &str = "Current epoch:";
const ELAPSED_LABEL: &str = "Time running (ns):";
const RANDOM_START_LABEL: &str = "Random start:";
const BEST_EPOCH_LABEL: &str = "Best state from epoch:";
const BEST_ELAPSED_LABEL: &str = "Best found after time (ns):";

/// Full content of a snapshot file.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub run_id: RunId,
    pub current_objective: f64,
    pub best_objective: f64,
    pub current_epoch: Epoch,
    pub elapsed_ns: Nanos,
    /// Raw description lines, each terminated by `'\n'`.
    pub cooling_description: String,
    pub random_start: u64,
    pub best_epoch: Epoch,
    pub best_elapsed_ns: Nanos,
    pub best_state: Schedule,
}

impl Snapshot {
    /// Parse a whole snapshot.
    pub fn read_from<R: Read>(mut reader: R, source: &str) -> Result<Self, TelAnnealError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let bytes = text.as_bytes();

        Ok(Snapshot {
            run_id: find_labeled(bytes, RUN_ID_LABEL, source)?,
            current_objective: find_labeled(bytes, CURRENT_OBJECTIVE_LABEL, source)?,
            best_objective: find_labeled(bytes, BEST_OBJECTIVE_LABEL, source)?,
            current_epoch: find_labeled(bytes, CURRENT_EPOCH_LABEL, source)?,
            elapsed_ns: find_labeled(bytes, ELAPSED_LABEL, source)?,
            cooling_description: read_cooling_description(bytes, source)?,
            random_start: find_labeled(bytes, RANDOM_START_LABEL, source)?,
            best_epoch: find_labeled(bytes, BEST_EPOCH_LABEL, source)?,
            best_elapsed_ns: find_labeled(bytes, BEST_ELAPSED_LABEL, source)?,
            best_state: read_schedule(bytes, BEST_STATE_HEADER, source)?,
        })
    }

    pub fn load(path: &Utf8Path) -> Result<Self, TelAnnealError> {
        Self::read_from(File::open(path)?, path.as_str())
    }

    /// Write the snapshot in the annealer's layout.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{RUN_ID_LABEL} {}", self.run_id)?;
        writeln!(
            writer,
            "{CURRENT_OBJECTIVE_LABEL} {:.10}",
            self.current_objective
        )?;
        writeln!(writer, "{BEST_OBJECTIVE_LABEL} {:.10}", self.best_objective)?;
        writeln!(writer, "{SEPARATOR}")?;
        writeln!(writer, "{CURRENT_EPOCH_LABEL} {}", self.current_epoch)?;
        writeln!(writer, "{ELAPSED_LABEL} {}", self.elapsed_ns)?;
        writeln!(writer, "{COOLING_DESCRIPTION_HEADER}")?;
        write!(writer, "{}", self.cooling_description)?;
        writeln!(writer, "{SEPARATOR}")?;
        writeln!(writer, "{RANDOM_START_LABEL} {}", self.random_start)?;
        writeln!(writer, "{SEPARATOR}")?;
        writeln!(writer, "{BEST_EPOCH_LABEL} {}", self.best_epoch)?;
        writeln!(writer, "{BEST_ELAPSED_LABEL} {}", self.best_elapsed_ns)?;
        write_schedule(writer, BEST_STATE_HEADER, &self.best_state)
    }
}

/// Read the `Best State:` schedule of a snapshot.
pub fn load_best_state(path: &Utf8Path) -> Result<Schedule, TelAnnealError> {
    read_schedule(
        BufReader::new(File::open(path)?),
        BEST_STATE_HEADER,
        path.as_str(),
    )
}

/// Read the cooling description of a snapshot, each line terminated by `'\n'`.
pub fn load_cooling_description(path: &Utf8Path) -> Result<String, TelAnnealError> {
    read_cooling_description(BufReader::new(File::open(path)?), path.as_str())
}

/// Read the `Best objective:` value of a snapshot.
pub fn load_best_objective(path: &Utf8Path) -> Result<f64, TelAnnealError> {
    find_labeled(
        BufReader::new(File::open(path)?),
        BEST_OBJECTIVE_LABEL,
        path.as_str(),
    )
}

pub fn read_cooling_description<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<String, TelAnnealError> {
    Ok(read_section(reader, COOLING_DESCRIPTION_HEADER, source)?
        .into_iter()
        .fold(String::new(), |mut description, line| {
            description.push_str(&line.text);
            description.push('\n');
            description
        }))
}

/// Value of the first line starting with `label`.
///
/// A missing label is reported as [`TelAnnealError::SectionMissing`].
fn find_labeled<R: BufRead, T: FromStr>(
    reader: R,
    label: &str,
    source: &str,
) -> Result<T, TelAnnealError> {
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if !line.trim_start().starts_with(label) {
            continue;
        }
        return labeled_value(&line)
            .parse()
            .map_err(|_| TelAnnealError::MalformedRecord {
                file: source.to_string(),
                line_number: idx + 1,
                line: line.clone(),
            });
    }
    Err(TelAnnealError::SectionMissing {
        section: label.to_string(),
        file: source.to_string(),
    })
}
