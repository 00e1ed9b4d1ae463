//! # Constants and type definitions for telanneal
//!
//! This module centralizes the **angular constants**, the **fixed text markers** shared
//! with the external annealing solver, and the **type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Angular constants (π, 2π) and the horizon exclusion used by the sampler
//! - Text markers of the solver output files (section headers, separator line)
//! - Core type aliases (angles, run identifiers, nanosecond durations)

// -------------------------------------------------------------------------------------------------
// Angular constants
// -------------------------------------------------------------------------------------------------

/// π
pub const PI: f64 = std::f64::consts::PI;

/// 2π, the period of the azimuth axis
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Default fraction of the quarter turn excluded above the horizon when sampling pointings.
///
/// Sampled unit vectors must satisfy `z >= sin(HORIZON_EXCLUSION_FRACTION · π/2)`.
pub const HORIZON_EXCLUSION_FRACTION: f64 = 0.02;

// -------------------------------------------------------------------------------------------------
// Solver text format
// -------------------------------------------------------------------------------------------------

/// Separator line closing every section (50 dashes)
pub const SEPARATOR: &str = "--------------------------------------------------";

/// Header of the annealed best schedule inside a snapshot file
pub const BEST_STATE_HEADER: &str = "Best State:";

/// Header of the greedy schedule inside the greedy result file
pub const GREEDY_SOLUTION_HEADER: &str = "Greedy solution:";

/// Header of the free-text cooling description inside a snapshot file
pub const COOLING_DESCRIPTION_HEADER: &str = "Cooling method description:";

/// Number of decimal digits written for angles
pub const ANGLE_DECIMALS: usize = 10;

/// Number of preamble lines preceding the header row of the epoch log
pub const EPOCH_LOG_PREAMBLE_LINES: usize = 3;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;

/// Identifier of a pointing, stable within a run
pub type PointingId = u32;

/// Identifier of an experiment run
pub type RunId = u32;

/// Annealing epoch counter
pub type Epoch = u64;

/// Wall-clock duration in nanoseconds
pub type Nanos = u64;
