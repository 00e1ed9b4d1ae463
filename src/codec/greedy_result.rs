//! Greedy baseline file (`greedy-solution.txt`).
//!
//! ```text
//! Run id: 4
//! Objective: 36.2000000000
//! Time running (ns): 48120
//! --------------------------------------------------
//! Greedy solution:
//! Direction(id=0, theta=..., phi=...)
//! --------------------------------------------------
//! ```
//!
//! Only the value after the last `:` of lines 2 and 3 is read for the baseline; the label
//! text is free.
use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
};

use camino::Utf8Path;

use super::{labeled_value, read_schedule, write_schedule};
use crate::{
    constants::{Nanos, RunId, GREEDY_SOLUTION_HEADER, SEPARATOR},
    schedule::Schedule,
    telanneal_errors::TelAnnealError,
};

/// Score and runtime of the greedy baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedyResult {
    pub score: f64,
    pub elapsed_ns: Nanos,
}

/// Read the greedy score (line 2) and elapsed time (line 3).
pub fn read_greedy_result<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<GreedyResult, TelAnnealError> {
    let mut lines = reader.lines().enumerate().skip(1);

    let score = next_value(&mut lines, source)?;
    let elapsed_ns = next_value(&mut lines, source)?;
    Ok(GreedyResult { score, elapsed_ns })
}

pub fn load_greedy_result(path: &Utf8Path) -> Result<GreedyResult, TelAnnealError> {
    read_greedy_result(BufReader::new(File::open(path)?), path.as_str())
}

/// Read the `Greedy solution:` schedule.
pub fn load_greedy_schedule(path: &Utf8Path) -> Result<Schedule, TelAnnealError> {
    read_schedule(
        BufReader::new(File::open(path)?),
        GREEDY_SOLUTION_HEADER,
        path.as_str(),
    )
}

/// Write a greedy result file in the solver's layout.
pub fn write_greedy_result<W: Write>(
    writer: &mut W,
    run_id: RunId,
    result: &GreedyResult,
    schedule: &Schedule,
) -> std::io::Result<()> {
    writeln!(writer, "Run id: {run_id}")?;
    writeln!(writer, "Objective: {:.10}", result.score)?;
    writeln!(writer, "Time running (ns): {}", result.elapsed_ns)?;
    writeln!(writer, "{SEPARATOR}")?;
    write_schedule(writer, GREEDY_SOLUTION_HEADER, schedule)
}

fn next_value<I, T>(lines: &mut I, source: &str) -> Result<T, TelAnnealError>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
    T: std::str::FromStr,
{
    let (idx, line) = lines.next().ok_or_else(|| TelAnnealError::CorruptInput {
        file: source.to_string(),
        reason: "greedy result file has fewer than 3 lines".into(),
    })?;
    let line = line?;
    labeled_value(&line)
        .parse()
        .map_err(|_| TelAnnealError::MalformedRecord {
            file: source.to_string(),
            line_number: idx + 1,
            line: line.clone(),
        })
}
