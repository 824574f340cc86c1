// Console and JSON rendering of a run

use anyhow::{Context, Result};

use crate::actuator::ActuationOutcome;
use crate::pipeline::{Plan, RunReport};

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Everything known before acting: mode, default route, exclusions, the
/// interface table and the selection. Ends with the "Actions:" heading when
/// there is something to act on.
pub fn render_plan(plan: &Plan, simulate: bool, backend: &str) -> String {
    let mode = if simulate {
        "SIMULATION - no interface will be changed"
    } else {
        "LIVE"
    };

    let mut out = format!(
        "IfReaper v{} - {} (backend: {})\n\n",
        env!("CARGO_PKG_VERSION"),
        mode,
        backend
    );

    match &plan.default_route {
        Some(route) => out.push_str(&format!(
            "Default interface: {} (from {})\n",
            route.interface, route.source
        )),
        None => out.push_str("Default interface: ⚠️  not detected\n"),
    }
    out.push_str(&format!(
        "Excluded:          {}\n\n",
        plan.exclusions.iter().collect::<Vec<_>>().join(", ")
    ));

    out.push_str(&format!("Interfaces ({}):\n", plan.interfaces.len()));
    if plan.interfaces.is_empty() {
        out.push_str("  (none found)\n");
    }
    for record in plan.interfaces.iter() {
        let address = record
            .ipv4_address
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        let excluded = if plan.exclusions.contains(&record.name) {
            "  [excluded]"
        } else {
            ""
        };
        out.push_str(&format!(
            "  {:16} up: {:3}  running: {:3}  ipv4: {:15}  no-carrier: {:3}{}\n",
            record.name,
            yes_no(record.has_carrier_up),
            yes_no(record.is_running),
            address,
            yes_no(record.no_carrier),
            excluded
        ));
    }
    out.push('\n');

    if plan.selected.is_empty() {
        out.push_str("No unused interfaces found - nothing to disable.\n");
        return out;
    }

    out.push_str("Selected for deactivation:\n");
    for candidate in &plan.selected {
        let reasons: Vec<String> = candidate.reasons.iter().map(|r| r.to_string()).collect();
        out.push_str(&format!("  {:16} ({})\n", candidate.name, reasons.join(", ")));
    }
    out.push_str("\nActions:\n");

    out
}

/// One line per acted-on interface, without trailing newline
pub fn outcome_line(outcome: &ActuationOutcome) -> String {
    match outcome {
        ActuationOutcome::Simulated { command, .. } => {
            format!("  [simulate] would run: {}", command)
        }
        ActuationOutcome::Disabled { .. } => format!("  ✅ {} disabled", outcome.interface()),
        ActuationOutcome::Failed { reason, .. } => {
            format!("  ❌ {} failed: {}", outcome.interface(), reason)
        }
    }
}

/// Closing counts; empty when nothing was selected
pub fn render_summary(report: &RunReport) -> String {
    if report.plan.selected.is_empty() {
        return String::new();
    }

    let acted = report.outcomes.len() - report.failures();
    if report.simulate {
        format!(
            "\nSummary: {} selected, {} simulated\n",
            report.plan.selected.len(),
            acted
        )
    } else {
        format!(
            "\nSummary: {} selected, {} disabled, {} failed\n",
            report.plan.selected.len(),
            acted,
            report.failures()
        )
    }
}

/// Full human-readable report (not meant to be parsed)
pub fn render(report: &RunReport) -> String {
    let mut out = render_plan(&report.plan, report.simulate, report.backend);
    for outcome in &report.outcomes {
        out.push_str(&outcome_line(outcome));
        out.push('\n');
    }
    out.push_str(&render_summary(report));
    out
}

pub fn to_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize run report")
}
