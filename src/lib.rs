pub mod aggregate;
pub mod codec;
pub mod constants;
pub mod pointing;
pub mod repository;
pub mod run_plan;
pub mod sampler;
pub mod schedule;
pub mod telanneal_errors;

pub use aggregate::{group_runs, summarize, Group, GroupSummary};
pub use pointing::{movement_cost, plot_coordinates, switch_representation, Pointing};
pub use repository::{RunConfiguration, RunLayout, RunRecord, RunRepository, RunVariant};
pub use sampler::{sample, SphericalSampler};
pub use schedule::{total_distance, Schedule};
pub use telanneal_errors::TelAnnealError;
