//! # Experiment folder layout
//!
//! An experiment root holds the sampled inputs and one output folder per run:
//!
//! ```text
//! <root>/
//! ├── input/directions-<run>.txt
//! ├── output/run-<run>/
//! │   ├── simanneal-<epoch>.txt       (one per snapshot)
//! │   ├── simanneal-full-log.txt
//! │   └── greedy-solution.txt
//! └── output-single-rep/run-<run>/    (optional, same content, alternate representation disabled)
//! ```
//!
//! Every name in this tree can be changed through [`RunLayoutBuilder`].
use camino::{Utf8Path, Utf8PathBuf};

use crate::{
    constants::{Epoch, RunId},
    telanneal_errors::TelAnnealError,
};

/// Which solver variant produced a run's outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunVariant {
    /// Both representations of every pointing were allowed.
    BothRepresentations,
    /// The solver was restricted to the primary representation.
    SingleRepresentation,
}

/// File and folder names of an experiment root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    root: Utf8PathBuf,
    input_dir: String,
    input_prefix: String,
    input_suffix: String,
    output_dir: String,
    single_representation_dir: String,
    run_dir_prefix: String,
    snapshot_prefix: String,
    snapshot_suffix: String,
    full_log_name: String,
    greedy_name: String,
}

impl RunLayout {
    /// Default layout rooted at `root`.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        RunLayout {
            root: root.into(),
            input_dir: "input".into(),
            input_prefix: "directions-".into(),
            input_suffix: ".txt".into(),
            output_dir: "output".into(),
            single_representation_dir: "output-single-rep".into(),
            run_dir_prefix: "run-".into(),
            snapshot_prefix: "simanneal-".into(),
            snapshot_suffix: ".txt".into(),
            full_log_name: "simanneal-full-log.txt".into(),
            greedy_name: "greedy-solution.txt".into(),
        }
    }

    pub fn builder(root: impl Into<Utf8PathBuf>) -> RunLayoutBuilder {
        RunLayoutBuilder::new(root)
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn run_dir_prefix(&self) -> &str {
        &self.run_dir_prefix
    }

    pub fn snapshot_prefix(&self) -> &str {
        &self.snapshot_prefix
    }

    pub fn snapshot_suffix(&self) -> &str {
        &self.snapshot_suffix
    }

    pub fn full_log_name(&self) -> &str {
        &self.full_log_name
    }

    pub fn input_path(&self, run_id: RunId) -> Utf8PathBuf {
        self.root.join(&self.input_dir).join(format!(
            "{}{run_id}{}",
            self.input_prefix, self.input_suffix
        ))
    }

    /// Folder holding the run folders of `variant`.
    pub fn output_dir(&self, variant: RunVariant) -> Utf8PathBuf {
        match variant {
            RunVariant::BothRepresentations => self.root.join(&self.output_dir),
            RunVariant::SingleRepresentation => self.root.join(&self.single_representation_dir),
        }
    }

    pub fn run_dir(&self, run_id: RunId, variant: RunVariant) -> Utf8PathBuf {
        self.output_dir(variant)
            .join(format!("{}{run_id}", self.run_dir_prefix))
    }

    pub fn snapshot_path(&self, run_id: RunId, variant: RunVariant, epoch: Epoch) -> Utf8PathBuf {
        self.run_dir(run_id, variant).join(format!(
            "{}{epoch}{}",
            self.snapshot_prefix, self.snapshot_suffix
        ))
    }

    pub fn full_log_path(&self, run_id: RunId, variant: RunVariant) -> Utf8PathBuf {
        self.run_dir(run_id, variant).join(&self.full_log_name)
    }

    pub fn greedy_path(&self, run_id: RunId, variant: RunVariant) -> Utf8PathBuf {
        self.run_dir(run_id, variant).join(&self.greedy_name)
    }
}

/// Builder for [`RunLayout`], starting from the default names.
#[derive(Debug, Clone)]
pub struct RunLayoutBuilder {
    layout: RunLayout,
}

impl RunLayoutBuilder {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            layout: RunLayout::new(root),
        }
    }

    pub fn input_dir(mut self, v: impl Into<String>) -> Self {
        self.layout.input_dir = v.into();
        self
    }
    pub fn input_prefix(mut self, v: impl Into<String>) -> Self {
        self.layout.input_prefix = v.into();
        self
    }
    pub fn input_suffix(mut self, v: impl Into<String>) -> Self {
        self.layout.input_suffix = v.into();
        self
    }
    pub fn output_dir(mut self, v: impl Into<String>) -> Self {
        self.layout.output_dir = v.into();
        self
    }
    pub fn single_representation_dir(mut self, v: impl Into<String>) -> Self {
        self.layout.single_representation_dir = v.into();
        self
    }
    pub fn run_dir_prefix(mut self, v: impl Into<String>) -> Self {
        self.layout.run_dir_prefix = v.into();
        self
    }
    pub fn snapshot_prefix(mut self, v: impl Into<String>) -> Self {
        self.layout.snapshot_prefix = v.into();
        self
    }
    pub fn snapshot_suffix(mut self, v: impl Into<String>) -> Self {
        self.layout.snapshot_suffix = v.into();
        self
    }
    pub fn full_log_name(mut self, v: impl Into<String>) -> Self {
        self.layout.full_log_name = v.into();
        self
    }
    pub fn greedy_name(mut self, v: impl Into<String>) -> Self {
        self.layout.greedy_name = v.into();
        self
    }

    /// Validate and return the layout.
    ///
    /// Return
    /// ----------
    /// * `Err(TelAnnealError::ConfigurationError)` if a folder or file name is empty or
    ///   contains a path separator, if the two output folders coincide, or if the snapshot
    ///   prefix is empty.
    pub fn build(self) -> Result<RunLayout, TelAnnealError> {
        let l = &self.layout;

        let names = [
            ("input_dir", &l.input_dir),
            ("output_dir", &l.output_dir),
            ("single_representation_dir", &l.single_representation_dir),
            ("run_dir_prefix", &l.run_dir_prefix),
            ("snapshot_prefix", &l.snapshot_prefix),
            ("full_log_name", &l.full_log_name),
            ("greedy_name", &l.greedy_name),
        ];
        for (field, value) in names {
            if !Self::is_plain_name(value) {
                return Err(TelAnnealError::ConfigurationError(format!(
                    "{field} must be a non-empty file name, got \"{value}\""
                )));
            }
        }
        if l.input_suffix.contains('/') || l.snapshot_suffix.contains('/') {
            return Err(TelAnnealError::ConfigurationError(
                "file suffixes must not contain a path separator".into(),
            ));
        }
        if l.output_dir == l.single_representation_dir {
            return Err(TelAnnealError::ConfigurationError(
                "output_dir and single_representation_dir must differ".into(),
            ));
        }

        Ok(self.layout)
    }

    fn is_plain_name(value: &str) -> bool {
        !value.is_empty() && !value.contains('/')
    }
}
