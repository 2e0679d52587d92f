//! `check` subcommand: statistical self-test of every mixing schedule.

use nebula_noise::quality::{AVALANCHE_BOUNDS, LSB_BOUNDS, QualityReport, measure_all};
use tracing::{error, info};

/// One human-readable line per report.
pub fn format_report(report: &QualityReport) -> String {
    format!(
        "{:<15} {:>2}-bit  avalanche(index) {:.4}  avalanche(seed) {:.4}  lsb {:.4}  worst bit bias {:.4}  {}",
        report.kind.name(),
        report.bits,
        report.avalanche.index,
        report.avalanche.seed,
        report.lsb_frequency,
        report.worst_bit_bias,
        if report.passes() { "ok" } else { "FAIL" },
    )
}

/// Measure every schedule at both widths and print the results.
///
/// Returns `true` when every report is within bounds.
pub fn run_check(samples: u64) -> bool {
    info!(
        samples,
        avalanche_bounds = ?AVALANCHE_BOUNDS,
        lsb_bounds = ?LSB_BOUNDS,
        "running quality check"
    );
    let reports = measure_all(samples);
    for report in &reports {
        println!("{}", format_report(report));
        if !report.passes() {
            error!(kind = %report.kind, bits = report.bits, "quality check out of bounds");
        }
    }
    reports.iter().all(QualityReport::passes)
}

#[cfg(test)]
mod tests {
    use nebula_noise::NoiseType;

    use super::*;

    #[test]
    fn test_format_report() {
        let report = QualityReport::measure::<u32>(NoiseType::ShiftXor, 4096);
        let line = format_report(&report);
        assert!(line.starts_with("shift_xor"));
        assert!(line.contains("32-bit"));
        assert!(line.ends_with("ok"), "default schedules should pass: {line}");
    }

    #[test]
    fn test_run_check_passes() {
        assert!(run_check(8192));
    }
}
