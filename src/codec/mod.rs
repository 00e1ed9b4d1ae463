//! # Solver text formats
//!
//! Readers and writers for the plain-text files exchanged with the external annealing
//! solver.
//!
//! ## Section layout
//! -----------------
//! Schedules are stored as **named sections**:
//!
//! ```text
//! Best State:
//! Direction(id=0, theta=0.1234567890, phi=0.9876543210)
//! Direction(id=1, theta=2.0000000000, phi=-0.5000000000)
//! --------------------------------------------------
//! ```
//!
//! A section starts at an exact header line and ends at the 50-dash separator line.
//! Each record line holds `id=<int>, theta=<float>, phi=<float>)`; the leading
//! `Direction(` written by the solver is optional when reading. Angles are written with
//! 10 decimals, and any floating literal is accepted when reading.
//!
//! ## Scanner
//! -----------------
//! [`read_section`] is a two-state scanner:
//!
//! * `SeekingHeader` – skip lines until the header. End of input here is
//!   [`TelAnnealError::SectionMissing`].
//! * `ReadingRecords` – collect lines until the separator. End of input here is
//!   [`TelAnnealError::UnterminatedSection`].
//!
//! An empty section (header immediately followed by the separator) is valid.
//!
//! ## Submodules
//! -----------------
//! * [`input_set`] – sampled pointing sets (`directions-<run>.txt`).
//! * [`epoch_log`] – the per-epoch CSV log of the annealer.
//! * [`greedy_result`] – the greedy baseline file.
//! * [`snapshot`] – periodic best-state snapshots of the annealer.
use std::io::{BufRead, Write};

use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, u32 as parse_u32},
    combinator::{all_consuming, opt},
    number::complete::double,
    sequence::{delimited, preceded},
    IResult, Parser,
};

use crate::{
    constants::{PointingId, SEPARATOR},
    pointing::Pointing,
    schedule::Schedule,
    telanneal_errors::TelAnnealError,
};

pub mod epoch_log;
pub mod greedy_result;
pub mod input_set;
pub mod snapshot;

/// A raw line captured inside a section, with its 1-based line number in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionLine {
    pub line_number: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingHeader,
    ReadingRecords,
}

/// Collect the raw lines of the section introduced by `header`.
///
/// Arguments
/// -----------------
/// * `reader` – Source positioned at the start of the file.
/// * `header` – Exact header line (compared after trimming surrounding whitespace).
/// * `source` – Name of the source used in error messages.
///
/// Return
/// ----------
/// * The lines strictly between the header and the separator.
/// * `SectionMissing` if the header never appears, `UnterminatedSection` if the separator
///   never appears after it.
pub fn read_section<R: BufRead>(
    reader: R,
    header: &str,
    source: &str,
) -> Result<Vec<SectionLine>, TelAnnealError> {
    let mut state = ScanState::SeekingHeader;
    let mut body = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        match state {
            ScanState::SeekingHeader => {
                if trimmed == header {
                    state = ScanState::ReadingRecords;
                }
            }
            ScanState::ReadingRecords => {
                if trimmed == SEPARATOR {
                    return Ok(body);
                }
                body.push(SectionLine {
                    line_number: idx + 1,
                    text: line,
                });
            }
        }
    }

    match state {
        ScanState::SeekingHeader => Err(TelAnnealError::SectionMissing {
            section: header.to_string(),
            file: source.to_string(),
        }),
        ScanState::ReadingRecords => Err(TelAnnealError::UnterminatedSection {
            section: header.to_string(),
            file: source.to_string(),
        }),
    }
}

/// Read the schedule stored in the section introduced by `header`.
///
/// Every line of the section must be a pointing record, otherwise the load fails with
/// [`TelAnnealError::MalformedRecord`] carrying the offending line.
pub fn read_schedule<R: BufRead>(
    reader: R,
    header: &str,
    source: &str,
) -> Result<Schedule, TelAnnealError> {
    read_section(reader, header, source)?
        .into_iter()
        .map(|line| parse_record(&line, source))
        .collect()
}

/// Write `schedule` as a section: header, one record per pointing, separator.
pub fn write_schedule<W: Write>(
    writer: &mut W,
    header: &str,
    schedule: &Schedule,
) -> std::io::Result<()> {
    writeln!(writer, "{header}")?;
    for pointing in schedule {
        writeln!(writer, "{pointing}")?;
    }
    writeln!(writer, "{SEPARATOR}")
}

fn parse_record(line: &SectionLine, source: &str) -> Result<Pointing, TelAnnealError> {
    parse_pointing_line(&line.text).ok_or_else(|| TelAnnealError::MalformedRecord {
        file: source.to_string(),
        line_number: line.line_number,
        line: line.text.clone(),
    })
}

fn parse_pointing_fields(input: &str) -> IResult<&str, (PointingId, f64, f64)> {
    let (input, _) = opt(tag("Direction(")).parse(input)?;
    let (input, id) = preceded(tag("id="), parse_u32).parse(input)?;
    let (input, theta) = preceded((tag(","), multispace0, tag("theta=")), double).parse(input)?;
    let (input, phi) =
        delimited((tag(","), multispace0, tag("phi=")), double, tag(")")).parse(input)?;
    Ok((input, (id, theta, phi)))
}

/// Parse one pointing record, `None` if the line does not match the record pattern.
pub fn parse_pointing_line(line: &str) -> Option<Pointing> {
    all_consuming(parse_pointing_fields)
        .parse(line.trim())
        .ok()
        .map(|(_, (id, theta, phi))| Pointing::new(id, theta, phi))
}

/// Value of a `<label>: <value>` line (text after the last `:`), trimmed.
pub(crate) fn labeled_value(line: &str) -> &str {
    line.rsplit_once(':')
        .map(|(_, value)| value)
        .unwrap_or(line)
        .trim()
}
