//! # Sampled input sets
//!
//! The sampler saves each run's pointing set as:
//!
//! ```text
//! Run id: 12
//! Num directions: 3
//! Direction(id=0, theta=4.3122337791, phi=0.6432431096)
//! Direction(id=1, theta=1.0022336720, phi=0.1934457640)
//! Direction(id=2, theta=5.8003140937, phi=1.2042346700)
//! ```
//!
//! Reading validates the file against itself: the run id must match the requested run,
//! the declared count must match the number of records, and ids must be `0..N-1` in order.
//! Any violation is a [`TelAnnealError::CorruptInput`].
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
};

use camino::Utf8Path;

use super::{labeled_value, parse_pointing_line};
use crate::{
    constants::RunId, sampler, schedule::Schedule, telanneal_errors::TelAnnealError,
};

const RUN_ID_LABEL: &str = "Run id:";
const NUM_DIRECTIONS_LABEL: &str = "Num directions:";

/// The pointing set a run was solved on.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSet {
    pub run_id: RunId,
    pub schedule: Schedule,
}

/// The two header lines of an input set file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSetHeader {
    pub run_id: RunId,
    pub num_directions: usize,
}

impl InputSet {
    /// Sample the input set of `run_id` with `count` pointings, seeded with the run id.
    pub fn simulate(run_id: RunId, count: usize) -> Self {
        sampler::sample(run_id, count, u64::from(run_id))
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{RUN_ID_LABEL} {}", self.run_id)?;
        writeln!(writer, "{NUM_DIRECTIONS_LABEL} {}", self.schedule.len())?;
        for pointing in &self.schedule {
            writeln!(writer, "{pointing}")?;
        }
        Ok(())
    }

    /// Write the input set to `path`, creating parent folders as needed.
    pub fn save(&self, path: &Utf8Path) -> Result<(), TelAnnealError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Read and validate an input set.
    ///
    /// Arguments
    /// -----------------
    /// * `reader` – Source positioned at the start of the file.
    /// * `expected_run_id` – Run id the file must declare, if known.
    /// * `source` – Name of the source used in error messages.
    ///
    /// Return
    /// ----------
    /// * The input set, or `MalformedRecord` / `CorruptInput` describing the first problem.
    pub fn read_from<R: BufRead>(
        reader: R,
        expected_run_id: Option<RunId>,
        source: &str,
    ) -> Result<Self, TelAnnealError> {
        let mut lines = reader.lines().enumerate();
        let header = read_header_lines(&mut lines, source)?;

        if let Some(expected) = expected_run_id {
            if expected != header.run_id {
                return Err(corrupt(
                    source,
                    format!(
                        "run id {} inside the file does not match requested run id {expected}",
                        header.run_id
                    ),
                ));
            }
        }

        let mut pointings = Vec::new();
        for (idx, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let pointing =
                parse_pointing_line(&line).ok_or_else(|| TelAnnealError::MalformedRecord {
                    file: source.to_string(),
                    line_number: idx + 1,
                    line: line.clone(),
                })?;
            if pointing.id as usize != pointings.len() {
                return Err(corrupt(
                    source,
                    format!(
                        "direction id {} found where id {} was expected",
                        pointing.id,
                        pointings.len()
                    ),
                ));
            }
            pointings.push(pointing);
        }

        if pointings.len() != header.num_directions {
            return Err(corrupt(
                source,
                format!(
                    "declared {} directions but parsed {}",
                    header.num_directions,
                    pointings.len()
                ),
            ));
        }

        Ok(InputSet {
            run_id: header.run_id,
            schedule: Schedule::new(pointings),
        })
    }

    pub fn load(path: &Utf8Path, expected_run_id: Option<RunId>) -> Result<Self, TelAnnealError> {
        let reader = BufReader::new(File::open(path)?);
        Self::read_from(reader, expected_run_id, path.as_str())
    }
}

/// Read only the two header lines of an input set.
pub fn read_header<R: BufRead>(reader: R, source: &str) -> Result<InputSetHeader, TelAnnealError> {
    read_header_lines(&mut reader.lines().enumerate(), source)
}

fn read_header_lines<I>(lines: &mut I, source: &str) -> Result<InputSetHeader, TelAnnealError>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
{
    let run_id = read_labeled(lines, RUN_ID_LABEL, source)?;
    let num_directions = read_labeled(lines, NUM_DIRECTIONS_LABEL, source)?;
    Ok(InputSetHeader {
        run_id,
        num_directions,
    })
}

fn read_labeled<I, T>(lines: &mut I, label: &str, source: &str) -> Result<T, TelAnnealError>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
    T: std::str::FromStr,
{
    let (idx, line) = lines
        .next()
        .ok_or_else(|| corrupt(source, format!("missing \"{label}\" line")))?;
    let line = line?;

    if !line.trim_start().starts_with(label) {
        return Err(TelAnnealError::MalformedRecord {
            file: source.to_string(),
            line_number: idx + 1,
            line,
        });
    }
    labeled_value(&line)
        .parse()
        .map_err(|_| TelAnnealError::MalformedRecord {
            file: source.to_string(),
            line_number: idx + 1,
            line: line.clone(),
        })
}

fn corrupt(source: &str, reason: String) -> TelAnnealError {
    TelAnnealError::CorruptInput {
        file: source.to_string(),
        reason,
    }
}
