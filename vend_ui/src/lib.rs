#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Plain-text panels for the terminal dashboard.

use std::fmt::Write as _;
use vend_core::catalog::{self, Strategy};
use vend_core::dashboard::{Analysis, AnalysisKind};
use vend_core::optimizer::{Inference, OptimizationResult};
use vend_core::status::{LinkState, MachineStatus};
use vend_core::telemetry::TelemetryHistory;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One-line bar chart of `values`, scaled between their min and max.
pub fn sparkline(values: &[f64]) -> String {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = hi - lo;
    values
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                ' '
            } else if span <= 0.0 {
                BARS[0]
            } else {
                let idx = ((v - lo) / span * 7.0).round() as usize;
                BARS[idx.min(7)]
            }
        })
        .collect()
}

/// `● connected | Executing Logic 10: Fuzzy Logic10`
pub fn status_line(status: &MachineStatus, link: LinkState) -> String {
    let dot = if link.is_connected() { '●' } else { '○' };
    format!("{dot} {} | {status}", link.label())
}

fn improvement_text(p: Option<i64>) -> String {
    p.map_or_else(|| "n/a".to_string(), |p| format!("{p}%"))
}

/// The optimization panel shown after activating a strategy.
pub fn render_result(r: &OptimizationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Optimal RPM:        {}", r.optimal_rpm);
    let _ = writeln!(out, "Current accuracy:   ±{:.3} mm", r.current_accuracy);
    let _ = writeln!(out, "Predicted accuracy: ±{:.3} mm", r.predicted_accuracy);
    let _ = writeln!(out, "Improvement:        {}", improvement_text(r.improvement_percent));
    let _ = write!(out, "Vibration delta:    {:+.2}", r.vibration_delta);
    out
}

pub fn render_analysis(a: &Analysis) -> String {
    let header = match a.kind {
        AnalysisKind::Optimized => "Precision dispensing analysis",
        AnalysisKind::Preview => "Preview (strategy runs on the machine)",
    };
    format!(
        "{header}\nReading: {} RPM, vibration {}\n{}",
        a.sample.rpm,
        a.sample.vibration,
        render_result(&a.result)
    )
}

/// Memberships and rule strengths behind a result.
pub fn render_inference(inf: &Inference) -> String {
    let mut out = String::new();
    let m = &inf.memberships;
    let _ = writeln!(
        out,
        "weight {:.3}:    light {:.3}  medium {:.3}  heavy {:.3}",
        inf.params.medicine_weight, m.weight.low, m.weight.mid, m.weight.high
    );
    let _ = writeln!(
        out,
        "vibration {:.3}: minimal {:.3}  moderate {:.3}  significant {:.3}",
        inf.vibration, m.vibration.low, m.vibration.mid, m.vibration.high
    );
    let _ = writeln!(
        out,
        "rpm {:.3}:       slow {:.3}  medium {:.3}  fast {:.3}",
        inf.rpm, m.rpm.low, m.rpm.mid, m.rpm.high
    );
    for (f, rule) in inf.firings.iter().zip(vend_core::optimizer::RULES.iter()) {
        let _ = writeln!(out, "  R{} {:.3}  {rule}", f.rule, f.strength);
    }
    match inf.crisp_rpm {
        Some(c) => {
            let _ = write!(out, "crisp rpm {c:.3} -> {}", inf.optimal_rpm);
        }
        None => {
            let _ = write!(out, "no rule fired -> {}", inf.optimal_rpm);
        }
    }
    out
}

/// `10  Fuzzy Logic10  precision dispensing tuning (runs here)`
pub fn render_catalog() -> String {
    let mut out = String::new();
    for s in catalog::display_order() {
        let marker = if s.is_executable() { "  (runs here)" } else { "" };
        let _ = writeln!(
            out,
            "{:>2}  cmd {:>2}  {:<14} {}{marker}",
            s.id,
            s.command(),
            s.name,
            s.purpose
        );
    }
    out
}

pub fn render_strategy(s: &Strategy) -> String {
    format!(
        "{} (id {}, command {})\n{}\n\n{}\n\n{}",
        s.name,
        s.id,
        s.command(),
        s.purpose,
        s.description,
        s.reference_rules
    )
}

/// Status line plus RPM and vibration sparklines over the last `points`.
pub fn render_monitor(
    status: &MachineStatus,
    link: LinkState,
    history: &TelemetryHistory,
    points: usize,
) -> String {
    let latest = history.latest();
    format!(
        "{}\nrpm {:>5} {}\nvib {:>5} {}",
        status_line(status, link),
        latest.rpm,
        sparkline(&history.rpm_series(points)),
        latest.vibration,
        sparkline(&history.vibration_series(points)),
    )
}
