use thiserror::Error;

use crate::constants::RunId;

#[derive(Error, Debug)]
pub enum TelAnnealError {
    #[error("Section \"{section}\" not found in {file}")]
    SectionMissing { section: String, file: String },

    #[error("Section \"{section}\" in {file} is not closed by a separator line")]
    UnterminatedSection { section: String, file: String },

    #[error("Malformed record in {file} at line {line_number}: \"{line}\"")]
    MalformedRecord {
        file: String,
        line_number: usize,
        line: String,
    },

    #[error("Corrupt input file {file}: {reason}")]
    CorruptInput { file: String, reason: String },

    #[error("Run {run_id} not found: missing {path}")]
    RunNotFound { run_id: RunId, path: String },

    #[error("Row {row} of the run plan contains duplicate run ids: {run_ids:?}")]
    DuplicateRunId { row: usize, run_ids: Vec<RunId> },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Run {run_id} failed: {source}")]
    RunFailed {
        run_id: RunId,
        #[source]
        source: Box<TelAnnealError>,
    },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl TelAnnealError {
    /// Attach the run id responsible for this error.
    ///
    /// Errors that already name a run are returned unchanged.
    pub fn for_run(self, run_id: RunId) -> Self {
        match self {
            TelAnnealError::RunFailed { .. } | TelAnnealError::RunNotFound { .. } => self,
            other => TelAnnealError::RunFailed {
                run_id,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, looking through [`TelAnnealError::RunFailed`] wrappers.
    pub fn root_cause(&self) -> &TelAnnealError {
        match self {
            TelAnnealError::RunFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl PartialEq for TelAnnealError {
    fn eq(&self, other: &Self) -> bool {
        use TelAnnealError::*;
        match (self, other) {
            (
                SectionMissing {
                    section: s1,
                    file: f1,
                },
                SectionMissing {
                    section: s2,
                    file: f2,
                },
            ) => s1 == s2 && f1 == f2,
            (
                UnterminatedSection {
                    section: s1,
                    file: f1,
                },
                UnterminatedSection {
                    section: s2,
                    file: f2,
                },
            ) => s1 == s2 && f1 == f2,
            (
                MalformedRecord {
                    file: f1,
                    line_number: n1,
                    line: l1,
                },
                MalformedRecord {
                    file: f2,
                    line_number: n2,
                    line: l2,
                },
            ) => f1 == f2 && n1 == n2 && l1 == l2,
            (
                CorruptInput {
                    file: f1,
                    reason: r1,
                },
                CorruptInput {
                    file: f2,
                    reason: r2,
                },
            ) => f1 == f2 && r1 == r2,
            (
                RunNotFound {
                    run_id: a,
                    path: p1,
                },
                RunNotFound {
                    run_id: b,
                    path: p2,
                },
            ) => a == b && p1 == p2,
            (
                DuplicateRunId {
                    row: r1,
                    run_ids: i1,
                },
                DuplicateRunId {
                    row: r2,
                    run_ids: i2,
                },
            ) => r1 == r2 && i1 == i2,
            (ConfigurationError(a), ConfigurationError(b)) => a == b,
            (
                RunFailed {
                    run_id: a,
                    source: s1,
                },
                RunFailed {
                    run_id: b,
                    source: s2,
                },
            ) => a == b && s1 == s2,

            // not comparable: equal when the variant matches
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
