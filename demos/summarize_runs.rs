//! Summarize the runs of an experiment folder.
//!
//! ```text
//! cargo run --example summarize_runs -- <experiment-root> [run_details.csv]
//! ```
//!
//! Without a run plan every `output/run-<id>` folder is summarized. Group settings reports
//! are written under `<experiment-root>/output-summary/group-<n>/`.
use camino::Utf8PathBuf;
use flexi_logger::Logger;
use telanneal::{
    aggregate::report::save_group_settings, run_plan::RunPlan, summarize, RunRepository,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _logger = Logger::try_with_str("info")?.start()?;

    let mut args = std::env::args().skip(1);
    let Some(root) = args.next().map(Utf8PathBuf::from) else {
        eprintln!("usage: summarize_runs <experiment-root> [run_details.csv]");
        return Ok(());
    };

    let repo = RunRepository::open(root.clone());
    let run_ids = match args.next() {
        Some(plan) => RunPlan::load(&Utf8PathBuf::from(plan))?.run_ids(),
        None => repo.discover_run_ids()?,
    };

    let summary_dir = root.join("output-summary");
    for summary in summarize(&repo, &run_ids)? {
        let group = &summary.group;
        let report = save_group_settings(&summary_dir, group)?;

        println!(
            "Group {} ({} locations, {} epochs): {} runs",
            group.number,
            group.configuration.num_locations,
            group.configuration.last_epoch,
            group.run_ids.len()
        );
        println!(
            "  annealing better {}/{}, greedy better {}/{}",
            summary.wins.annealing_better,
            summary.wins.total(),
            summary.wins.greedy_better,
            summary.wins.total()
        );
        println!(
            "  annealing matched greedy in {} runs, never in {}",
            summary.time_to_match.matched_count(),
            summary.time_to_match.no_match_count()
        );
        println!(
            "  improvement counts per bin: {:?}",
            summary
                .improvement_bins
                .count(&summary.improvement.positives())
        );
        if let Some(ablation) = &summary.ablation {
            println!(
                "  both representations helped greedy in {} runs, annealing in {} runs",
                ablation.greedy_improved(),
                ablation.anneal_improved()
            );
        }
        println!("  settings written to {report}");
    }
    Ok(())
}
