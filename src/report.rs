//! Plain-text lines for terminal output.

use crate::dashboard::DashboardSnapshot;
use crate::models::{Cashier, KpiReport};
use crate::navigation::NavigationView;
use crate::polling::DisplayState;
use crate::status::{StatusSummary, SubStatus, summarize};

pub fn status_lines(sub_statuses: &[SubStatus]) -> Vec<String> {
    let mut lines: Vec<String> = sub_statuses
        .iter()
        .map(|status| {
            let detail = status
                .detail
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(" ");
            format!("  {:<24} {:<10} {}", status.name, status.state, detail)
                .trim_end()
                .to_string()
        })
        .collect();
    lines.push(summary_line(&summarize(sub_statuses)));
    lines
}

fn summary_line(summary: &StatusSummary) -> String {
    format!(
        "Overall: {} ({} connected, {} warning, {} error)",
        summary.overall, summary.connected, summary.warning, summary.error
    )
}

pub fn cashier_lines(cashiers: &[Cashier]) -> Vec<String> {
    if cashiers.is_empty() {
        return vec!["No cashiers found".to_string()];
    }
    cashiers
        .iter()
        .map(|cashier| format!("  {:<12} {:<24} {}", cashier.id, cashier.name, cashier.shift))
        .collect()
}

pub fn kpi_lines(report: &KpiReport) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(range) = report.range {
        lines.push(format!("Period: {}", range));
    }
    if report.is_empty() {
        lines.push("No KPIs reported".to_string());
    }
    lines.extend(report.kpis.iter().map(|kpi| match kpi.change_pct {
        Some(change) => format!("  {:<24} {:>14.2} ({:+.1}%)", kpi.name, kpi.value, change),
        None => format!("  {:<24} {:>14.2}", kpi.name, kpi.value),
    }));
    lines
}

pub fn navigation_lines(view: &NavigationView) -> Vec<String> {
    if view.sections.is_empty() {
        return vec!["Nothing to show for this role".to_string()];
    }
    let mut lines = Vec::new();
    for section in &view.sections {
        let marker = if section.expanded { "v" } else { ">" };
        lines.push(format!("{} {}", marker, section.label));
        if !section.expanded {
            continue;
        }
        for item in &section.items {
            let active = view.active_path.as_deref() == Some(item.path.as_str());
            lines.push(format!(
                "  {} {:<16} {}",
                if active { "*" } else { " " },
                item.label,
                item.path
            ));
        }
    }
    lines
}

/// "fresh", "stale" or "loading" annotation for one widget.
pub fn freshness<T>(display: &DisplayState<T>) -> String {
    match (&display.error, display.last_updated) {
        (None, Some(at)) => format!("updated {}", at.format("%H:%M:%S")),
        (Some(error), Some(at)) => {
            format!("stale since {} ({})", at.format("%H:%M:%S"), error.kind)
        }
        (Some(error), None) => format!("unavailable ({}), retry pending", error.kind),
        (None, None) => "loading".to_string(),
    }
}

pub fn snapshot_lines(snapshot: &DashboardSnapshot) -> Vec<String> {
    let cashiers = &snapshot.cashiers;
    let metrics = &snapshot.metrics;
    vec![
        format!(
            "Integrations: {} [{}]",
            snapshot.integrations.overall,
            freshness(&DisplayState {
                value: (),
                error: snapshot.integrations.error.clone(),
                last_updated: snapshot.integrations.last_updated,
            })
        ),
        format!(
            "Cashiers: {} on roster, {} selected [{}]",
            cashiers.display.value.len(),
            cashiers.selected.len(),
            freshness(&cashiers.display)
        ),
        format!(
            "Metrics: {} KPIs for {} [{}]",
            metrics.display.value.kpis.len(),
            metrics.range,
            freshness(&metrics.display)
        ),
    ]
}
