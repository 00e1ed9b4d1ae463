//! # Per-epoch annealing log
//!
//! The annealer appends one row to `simanneal-full-log.txt` every time its best objective
//! changes:
//!
//! ```text
//! Run id: 4
//! Best objective remained constant between epochs listed below.
//! (Current objective may have changed, however.)
//! Epoch, Current Objective, Best Objective, Wall Time (ns)
//! 0, 35.1200000000, 35.1200000000, 1830
//! 12, 34.0100000000, 34.0100000000, 20211
//! ```
//!
//! The three preamble lines are skipped, the remaining text is read as a CSV table with
//! `", "` separated columns. Columns are matched by name, so extra columns are ignored.
use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
};

use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord, Trim};
use itertools::Itertools;
use serde::Deserialize;

use crate::{
    constants::{Epoch, Nanos, RunId, EPOCH_LOG_PREAMBLE_LINES},
    telanneal_errors::TelAnnealError,
};

const REQUIRED_COLUMNS: [&str; 3] = ["Epoch", "Wall Time (ns)", "Best Objective"];

/// One row of the epoch log.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EpochRecord {
    #[serde(rename = "Epoch")]
    pub epoch: Epoch,
    #[serde(rename = "Wall Time (ns)")]
    pub wall_time_ns: Nanos,
    #[serde(rename = "Best Objective")]
    pub best_objective: f64,
    #[serde(rename = "Current Objective", default)]
    pub current_objective: Option<f64>,
}

impl EpochRecord {
    pub fn new(epoch: Epoch, wall_time_ns: Nanos, best_objective: f64) -> Self {
        EpochRecord {
            epoch,
            wall_time_ns,
            best_objective,
            current_objective: None,
        }
    }
}

/// Read the epoch series, in file order.
pub fn read_epoch_log<R: BufRead>(
    mut reader: R,
    source: &str,
) -> Result<Vec<EpochRecord>, TelAnnealError> {
    let mut skipped = String::new();
    for _ in 0..EPOCH_LOG_PREAMBLE_LINES {
        skipped.clear();
        if reader.read_line(&mut skipped)? == 0 {
            return Err(TelAnnealError::CorruptInput {
                file: source.to_string(),
                reason: "epoch log ends inside its preamble".into(),
            });
        }
    }

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(TelAnnealError::CorruptInput {
            file: source.to_string(),
            reason: format!("epoch log has no \"{missing}\" column"),
        });
    }

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let record = row
            .deserialize::<EpochRecord>(Some(&headers))
            .map_err(|_| malformed_row(&row, source))?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_epoch_log(path: &Utf8Path) -> Result<Vec<EpochRecord>, TelAnnealError> {
    read_epoch_log(BufReader::new(File::open(path)?), path.as_str())
}

/// Write an epoch log in the annealer's layout.
///
/// Rows without a current objective repeat their best objective in that column.
pub fn write_epoch_log<W: Write>(
    writer: &mut W,
    run_id: RunId,
    records: &[EpochRecord],
) -> std::io::Result<()> {
    writeln!(writer, "Run id: {run_id}")?;
    writeln!(
        writer,
        "Best objective remained constant between epochs listed below."
    )?;
    writeln!(writer, "(Current objective may have changed, however.)")?;
    writeln!(
        writer,
        "Epoch, Current Objective, Best Objective, Wall Time (ns)"
    )?;
    for record in records {
        writeln!(
            writer,
            "{}, {:.10}, {:.10}, {}",
            record.epoch,
            record.current_objective.unwrap_or(record.best_objective),
            record.best_objective,
            record.wall_time_ns
        )?;
    }
    Ok(())
}

fn malformed_row(row: &StringRecord, source: &str) -> TelAnnealError {
    let line_number = row
        .position()
        .map(|pos| pos.line() as usize + EPOCH_LOG_PREAMBLE_LINES)
        .unwrap_or_default();
    TelAnnealError::MalformedRecord {
        file: source.to_string(),
        line_number,
        line: row.iter().join(", "),
    }
}

#[cfg(test)]
mod epoch_log_test {
    use super::*;

    const LOG: &str = "Run id: 4\n\
        Best objective remained constant between epochs listed below.\n\
        (Current objective may have changed, however.)\n\
        Epoch, Current Objective, Best Objective, Wall Time (ns)\n\
        0, 35.12, 35.12, 1830\n\
        12, 34.5, 34.01, 20211\n\
        40, 33.0, 33.0, 51000\n";

    #[test]
    fn test_read_epoch_log() {
        let records = read_epoch_log(LOG.as_bytes(), "log").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].epoch, 12);
        assert_eq!(records[1].wall_time_ns, 20211);
        assert_eq!(records[1].best_objective, 34.01);
        assert_eq!(records[1].current_objective, Some(34.5));
    }

    #[test]
    fn test_header_only_log_is_empty() {
        let text = LOG.lines().take(4).join("\n");
        assert!(read_epoch_log(text.as_bytes(), "log").unwrap().is_empty());
    }

    #[test]
    fn test_missing_column() {
        let text = LOG.replace("Best Objective", "Best");
        let err = read_epoch_log(text.as_bytes(), "log").unwrap_err();
        assert_eq!(
            err,
            TelAnnealError::CorruptInput {
                file: "log".into(),
                reason: "epoch log has no \"Best Objective\" column".into()
            }
        );
    }

    #[test]
    fn test_malformed_row() {
        let text = LOG.replace("12, 34.5, 34.01, 20211", "12, 34.5, oops, 20211");
        let err = read_epoch_log(text.as_bytes(), "log").unwrap_err();
        assert_eq!(
            err,
            TelAnnealError::MalformedRecord {
                file: "log".into(),
                line_number: 6,
                line: "12, 34.5, oops, 20211".into()
            }
        );
    }

    #[test]
    fn test_short_preamble() {
        let err = read_epoch_log("Run id: 4\n".as_bytes(), "log").unwrap_err();
        assert!(matches!(err, TelAnnealError::CorruptInput { .. }));
    }

    #[test]
    fn test_write_then_read() {
        let records = vec![
            EpochRecord::new(0, 100, 10.0),
            EpochRecord::new(5, 900, 9.25),
        ];
        let mut buffer = Vec::new();
        write_epoch_log(&mut buffer, 4, &records).unwrap();

        let read = read_epoch_log(buffer.as_slice(), "log").unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[1].epoch, 5);
        assert_eq!(read[1].best_objective, 9.25);
        assert_eq!(read[1].current_objective, Some(9.25));
    }
}
