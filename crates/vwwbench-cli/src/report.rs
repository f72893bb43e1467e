use std::fmt::Write as _;

use vwwbench_runtime::BenchmarkRunReport;

const NAME_WIDTH: usize = 20;

/// Table of `name  avg ms` rows. Variants without a result have no row.
pub fn render_table(report: &BenchmarkRunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<NAME_WIDTH$} {:>12}", "Model", "Avg latency");
    for r in &report.results {
        let _ = writeln!(out, "{:<NAME_WIDTH$} {:>9.2} ms", r.name, r.avg_ms);
    }
    out
}

pub fn done_status(report: &BenchmarkRunReport) -> String {
    if report.is_empty() {
        return "Done. No variant produced a measurement.".to_string();
    }
    format!(
        "Done. Measured {} iterations per model.",
        report.iterations
    )
}
