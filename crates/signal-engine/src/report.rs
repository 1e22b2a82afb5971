//! Logging and writing the comparison report.

use std::path::Path;

use signal_control::runner::{ComparisonReport, average_improvement};
use signal_types::Direction;
use tracing::info;

use crate::error::EngineError;

/// Log one line per scenario plus the averaged improvements.
pub fn log_report(report: &ComparisonReport) {
    for entry in &report.scenarios {
        info!(
            scenario = %entry.key,
            name = %entry.name,
            duration = entry.duration,
            fuzzy_avg_wait = entry.fuzzy.average_waiting_time,
            fixed_avg_wait = entry.fixed.average_waiting_time,
            fuzzy_avg_queue = entry.fuzzy.average_queue_length,
            fixed_avg_queue = entry.fixed.average_queue_length,
            fuzzy_throughput = entry.fuzzy.throughput_per_hour,
            fixed_throughput = entry.fixed.throughput_per_hour,
            fuzzy_fairness = entry.fuzzy.fairness_index,
            fixed_fairness = entry.fixed.fairness_index,
            waiting_time_improvement_pct = entry.comparison.waiting_time_improvement_pct,
            "scenario result"
        );
        for direction in Direction::ALL {
            let fuzzy = entry.fuzzy.by_direction.get(direction);
            let fixed = entry.fixed.by_direction.get(direction);
            info!(
                scenario = %entry.key,
                direction = %direction,
                fuzzy_avg_wait = fuzzy.avg_waiting_time,
                fixed_avg_wait = fixed.avg_waiting_time,
                fuzzy_avg_green = fuzzy.avg_green_time,
                fixed_avg_green = fixed.avg_green_time,
                "direction result"
            );
        }
    }

    let avg = average_improvement(report);
    info!(
        run_id = %report.run_id,
        scenarios = report.scenarios.len(),
        waiting_time_improvement_pct = avg.waiting_time_improvement_pct,
        queue_length_improvement_pct = avg.queue_length_improvement_pct,
        throughput_improvement_pct = avg.throughput_improvement_pct,
        delay_reduction_pct = avg.delay_reduction_pct,
        fairness_improvement = avg.fairness_improvement,
        "average improvement of fuzzy over fixed"
    );
}

/// Write `report` as pretty JSON to `path`.
pub fn write_report(report: &ComparisonReport, path: &Path) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|source| EngineError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), "report written");
    Ok(())
}
