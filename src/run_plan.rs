//! # Run plan (`run_details.csv`)
//!
//! Each row of the plan describes a batch of consecutive runs solved with the same
//! settings:
//!
//! ```text
//! # Ignore, PlotOnly, ... lines starting with '#' are comments
//! Ignore, PlotOnly, CountPlotAll, CountAnimate, FirstIdx, Count, NumLocs, NumEpochs, VbEvery, CoolInit, CoolBase, CoolFlatEpochs
//! ,       n,        1,            1,            1,        10,    50,      1_000_000, 10_000,  10.0,     0.95,     1_000
//! ```
//!
//! Columns are separated by commas with optional surrounding whitespace, numbers may use
//! `_` as a digit separator. The whole plan is validated when it is read, so that no run is
//! touched when a row is invalid:
//!
//! * `Count`, `NumLocs`, `NumEpochs`, `VbEvery`, `CoolInit` and `CoolFlatEpochs` must be
//!   strictly positive, `CoolBase` must lie in `(0, 1)`, `FirstIdx` must be non-negative:
//!   [`TelAnnealError::ConfigurationError`] otherwise.
//! * The run ids `FirstIdx..FirstIdx+Count` of a row must not overlap those of an earlier
//!   row: [`TelAnnealError::DuplicateRunId`] otherwise.
//! * `CountPlotAll` and `CountAnimate` larger than `Count` are clamped to `Count`, with a
//!   warning.
use std::{fs::File, io::Read, ops::Range, str::FromStr};

use camino::Utf8Path;
use csv::{ReaderBuilder, Trim};
use log::warn;
use serde::Deserialize;

use crate::{
    constants::{Epoch, RunId},
    telanneal_errors::TelAnnealError,
};

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Ignore")]
    ignore: Option<String>,
    #[serde(rename = "PlotOnly")]
    plot_only: Option<String>,
    #[serde(rename = "CountPlotAll")]
    count_plot_all: String,
    #[serde(rename = "CountAnimate")]
    count_animate: String,
    #[serde(rename = "FirstIdx")]
    first_idx: String,
    #[serde(rename = "Count")]
    count: String,
    #[serde(rename = "NumLocs")]
    num_locs: String,
    #[serde(rename = "NumEpochs")]
    num_epochs: String,
    #[serde(rename = "VbEvery")]
    vb_every: String,
    #[serde(rename = "CoolInit")]
    cool_init: String,
    #[serde(rename = "CoolBase")]
    cool_base: String,
    #[serde(rename = "CoolFlatEpochs")]
    cool_flat_epochs: String,
}

/// Piecewise constant geometric cooling: `init · base^(epoch / flat_epochs)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingSchedule {
    pub init: f64,
    pub base: f64,
    pub flat_epochs: Epoch,
}

/// A validated row of the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRow {
    /// 1-based index among the data rows of the plan.
    pub row: usize,
    pub ignore: bool,
    pub plot_only: bool,
    pub count_plot_all: usize,
    pub count_animate: usize,
    pub first_run_id: RunId,
    pub count: usize,
    pub num_locations: usize,
    pub num_epochs: Epoch,
    pub verbose_every: Epoch,
    pub cooling: CoolingSchedule,
}

impl PlanRow {
    /// Run ids of the row, ascending.
    pub fn run_ids(&self) -> Range<RunId> {
        // validated: first_run_id + count fits in a RunId
        self.first_run_id..self.first_run_id + self.count as RunId
    }

    fn from_raw(row: usize, raw: RawRow) -> Result<Self, TelAnnealError> {
        let count: i64 = parse_field(row, "Count", &raw.count)?;
        positive(row, "Count", count)?;
        let num_locations: i64 = parse_field(row, "NumLocs", &raw.num_locs)?;
        positive(row, "NumLocs", num_locations)?;
        let num_epochs: i64 = parse_field(row, "NumEpochs", &raw.num_epochs)?;
        positive(row, "NumEpochs", num_epochs)?;
        let verbose_every: i64 = parse_field(row, "VbEvery", &raw.vb_every)?;
        positive(row, "VbEvery", verbose_every)?;
        let flat_epochs: i64 = parse_field(row, "CoolFlatEpochs", &raw.cool_flat_epochs)?;
        positive(row, "CoolFlatEpochs", flat_epochs)?;

        let init: f64 = parse_field(row, "CoolInit", &raw.cool_init)?;
        if init.is_nan() || init <= 0.0 {
            return Err(invalid(row, format!("CoolInit must be > 0, got {init}")));
        }
        let base: f64 = parse_field(row, "CoolBase", &raw.cool_base)?;
        if base.is_nan() || base <= 0.0 || base >= 1.0 {
            return Err(invalid(
                row,
                format!("CoolBase must lie strictly between 0 and 1, got {base}"),
            ));
        }

        let first_idx: i64 = parse_field(row, "FirstIdx", &raw.first_idx)?;
        let first_run_id = RunId::try_from(first_idx)
            .ok()
            .filter(|first| u64::from(*first) + count as u64 <= u64::from(RunId::MAX))
            .ok_or_else(|| {
                invalid(
                    row,
                    format!(
                        "run ids {first_idx}..{} are out of range",
                        first_idx.saturating_add(count)
                    ),
                )
            })?;

        let count = count as usize;
        let count_plot_all = clamp_count(row, "CountPlotAll", &raw.count_plot_all, count)?;
        let count_animate = clamp_count(row, "CountAnimate", &raw.count_animate, count)?;

        Ok(PlanRow {
            row,
            ignore: is_yes(raw.ignore.as_deref()),
            plot_only: is_yes(raw.plot_only.as_deref()),
            count_plot_all,
            count_animate,
            first_run_id,
            count,
            num_locations: num_locations as usize,
            num_epochs: num_epochs as Epoch,
            verbose_every: verbose_every as Epoch,
            cooling: CoolingSchedule {
                init,
                base,
                flat_epochs: flat_epochs as Epoch,
            },
        })
    }
}

/// The validated run plan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunPlan {
    rows: Vec<PlanRow>,
}

impl RunPlan {
    /// Read and validate a plan.
    ///
    /// Return
    /// ----------
    /// * The plan, or the first `ConfigurationError` / `DuplicateRunId` found, in row order.
    pub fn read_from<R: Read>(reader: R) -> Result<Self, TelAnnealError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows: Vec<PlanRow> = Vec::new();
        for (idx, raw) in csv_reader.deserialize::<RawRow>().enumerate() {
            let row = PlanRow::from_raw(idx + 1, raw?)?;

            let duplicates = overlapping_ids(&rows, &row.run_ids());
            if !duplicates.is_empty() {
                return Err(TelAnnealError::DuplicateRunId {
                    row: row.row,
                    run_ids: duplicates,
                });
            }
            rows.push(row);
        }
        Ok(RunPlan { rows })
    }

    pub fn load(path: &Utf8Path) -> Result<Self, TelAnnealError> {
        Self::read_from(File::open(path)?)
    }

    pub fn rows(&self) -> &[PlanRow] {
        &self.rows
    }

    /// Every planned run id, in row order.
    pub fn run_ids(&self) -> Vec<RunId> {
        self.rows.iter().flat_map(PlanRow::run_ids).collect()
    }
}

/// Run ids of `ids` already claimed by one of `rows`, ascending and without repeats.
fn overlapping_ids(rows: &[PlanRow], ids: &Range<RunId>) -> Vec<RunId> {
    let mut overlaps: Vec<Range<RunId>> = rows
        .iter()
        .map(|earlier| {
            let claimed = earlier.run_ids();
            claimed.start.max(ids.start)..claimed.end.min(ids.end)
        })
        .filter(|overlap| !overlap.is_empty())
        .collect();
    overlaps.sort_unstable_by_key(|overlap| overlap.start);

    let mut duplicates = Vec::new();
    let mut next = ids.start;
    for overlap in overlaps {
        duplicates.extend(overlap.start.max(next)..overlap.end);
        next = next.max(overlap.end);
    }
    duplicates
}

/// Parse a numeric field, ignoring `_` digit separators.
fn parse_field<T: FromStr>(row: usize, field: &str, value: &str) -> Result<T, TelAnnealError> {
    value
        .replace('_', "")
        .parse()
        .map_err(|_| invalid(row, format!("{field} is not a number: \"{value}\"")))
}

fn positive(row: usize, field: &str, value: i64) -> Result<(), TelAnnealError> {
    if value <= 0 {
        return Err(invalid(row, format!("{field} must be > 0, got {value}")));
    }
    Ok(())
}

fn clamp_count(
    row: usize,
    field: &str,
    value: &str,
    count: usize,
) -> Result<usize, TelAnnealError> {
    let requested: i64 = parse_field(row, field, value)?;
    let requested = requested.max(0) as usize;
    if requested > count {
        warn!("Row {row}: {field} = {requested} exceeds Count = {count}, using {count}");
        return Ok(count);
    }
    Ok(requested)
}

fn is_yes(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("y") || v.eq_ignore_ascii_case("yes"))
}

fn invalid(row: usize, reason: String) -> TelAnnealError {
    TelAnnealError::ConfigurationError(format!("run plan row {row}: {reason}"))
}

#[cfg(test)]
mod run_plan_test {
    use super::*;

    const HEADER: &str = "Ignore, PlotOnly, CountPlotAll, CountAnimate, FirstIdx, Count, \
                          NumLocs, NumEpochs, VbEvery, CoolInit, CoolBase, CoolFlatEpochs\n";

    fn plan(rows: &str) -> Result<RunPlan, TelAnnealError> {
        RunPlan::read_from(format!("# run details\n{HEADER}{rows}").as_bytes())
    }

    #[test]
    fn test_read_plan() {
        let plan = plan(
            ", n, 1, 1, 1, 3, 50, 1_000_000, 10_000, 10.0, 0.95, 1_000\n\
             # second batch\n\
             y, Yes, 0, 0, 10, 2, 20, 500, 50, 1, 0.5, 10\n",
        )
        .unwrap();

        assert_eq!(plan.rows().len(), 2);
        let first = &plan.rows()[0];
        assert_eq!(first.row, 1);
        assert!(!first.plot_only);
        assert!(!first.ignore);
        assert_eq!(first.num_epochs, 1_000_000);
        assert_eq!(first.verbose_every, 10_000);
        assert_eq!(
            first.cooling,
            CoolingSchedule {
                init: 10.0,
                base: 0.95,
                flat_epochs: 1000
            }
        );
        assert!(plan.rows()[1].plot_only);
        assert!(plan.rows()[1].ignore);
        assert_eq!(plan.run_ids(), vec![1, 2, 3, 10, 11]);
    }

    #[test]
    fn test_duplicate_run_ids() {
        let err = plan(
            ", n, 0, 0, 1, 5, 50, 100, 10, 1.0, 0.9, 10\n\
             , n, 0, 0, 4, 3, 50, 100, 10, 1.0, 0.9, 10\n",
        )
        .unwrap_err();
        assert_eq!(
            err,
            TelAnnealError::DuplicateRunId {
                row: 2,
                run_ids: vec![4, 5]
            }
        );
    }

    #[test]
    fn test_duplicates_across_several_rows() {
        let err = plan(
            ", n, 0, 0, 1, 3, 50, 100, 10, 1.0, 0.9, 10\n\
             , n, 0, 0, 10, 3, 50, 100, 10, 1.0, 0.9, 10\n\
             , n, 0, 0, 2, 10, 50, 100, 10, 1.0, 0.9, 10\n",
        )
        .unwrap_err();
        assert_eq!(
            err,
            TelAnnealError::DuplicateRunId {
                row: 3,
                run_ids: vec![2, 3, 10, 11]
            }
        );
    }

    #[test]
    fn test_wide_rows_without_overlap() {
        let plan = plan(
            ", n, 0, 0, 0, 4_000_000_000, 50, 100, 10, 1.0, 0.9, 10\n\
             , n, 0, 0, 4_000_000_000, 2, 50, 100, 10, 1.0, 0.9, 10\n",
        )
        .unwrap();
        assert_eq!(plan.rows().len(), 2);
        assert_eq!(plan.rows()[1].run_ids(), 4_000_000_000..4_000_000_002);
    }

    #[test]
    fn test_first_index_at_integer_limit() {
        let err = plan(", n, 0, 0, 9223372036854775807, 1, 10, 100, 10, 1.0, 0.9, 10\n")
            .unwrap_err();
        assert_eq!(
            err,
            TelAnnealError::ConfigurationError(
                "run plan row 1: run ids 9223372036854775807..9223372036854775807 are out of range"
                    .into()
            )
        );
    }

    #[test]
    fn test_non_positive_count() {
        let err = plan(", n, 0, 0, 1, 0, 50, 100, 10, 1.0, 0.9, 10\n").unwrap_err();
        assert_eq!(
            err,
            TelAnnealError::ConfigurationError("run plan row 1: Count must be > 0, got 0".into())
        );
    }

    #[test]
    fn test_invalid_cooling_base() {
        for base in ["0", "1", "1.5", "-0.2"] {
            let row = format!(", n, 0, 0, 1, 2, 50, 100, 10, 1.0, {base}, 10\n");
            assert!(matches!(
                plan(&row),
                Err(TelAnnealError::ConfigurationError(_))
            ));
        }
    }

    #[test]
    fn test_invalid_values() {
        for row in [
            ", n, 0, 0, 1, 2, 0, 100, 10, 1.0, 0.9, 10\n",
            ", n, 0, 0, 1, 2, 50, -1, 10, 1.0, 0.9, 10\n",
            ", n, 0, 0, 1, 2, 50, 100, 0, 1.0, 0.9, 10\n",
            ", n, 0, 0, 1, 2, 50, 100, 10, 0.0, 0.9, 10\n",
            ", n, 0, 0, 1, 2, 50, 100, 10, 1.0, 0.9, 0\n",
            ", n, 0, 0, -3, 2, 50, 100, 10, 1.0, 0.9, 10\n",
            ", n, 0, 0, 1, two, 50, 100, 10, 1.0, 0.9, 10\n",
        ] {
            assert!(
                matches!(plan(row), Err(TelAnnealError::ConfigurationError(_))),
                "row accepted: {row}"
            );
        }
    }

    #[test]
    fn test_counts_are_clamped() {
        let plan = plan(", n, 9, 4, 1, 3, 50, 100, 10, 1.0, 0.9, 10\n").unwrap();
        assert_eq!(plan.rows()[0].count_plot_all, 3);
        assert_eq!(plan.rows()[0].count_animate, 3);
    }
}
