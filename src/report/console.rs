use crate::report::report_model::SuiteReport;
use crate::scenario::scenario_model::Assertion;

// ============================================================================
// Console reporter
// ============================================================================

/// Format a suite report for the terminal.
///
/// ```text
/// === Scenarios: CLI Run ===
///
/// ✓ PASS  jump to a link (4 steps, 3 assertions)
/// ✗ FAIL  search narrows (3 steps, 2 assertions)
///     [FAIL] Step 2: VisibleBadgeCount: expected 4 visible badges, actual 188
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &SuiteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Scenarios: {} ===\n\n", report.suite_name));

    for result in &report.results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} assertions)\n",
            marker,
            result.name,
            result.steps_run,
            result.assertion_results.len()
        ));

        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }

        for ar in result.assertion_results.iter().filter(|ar| !ar.passed) {
            out.push_str(&format!(
                "    [FAIL] Step {}: {}: {}\n",
                ar.step_index,
                assertion_name(&ar.assertion),
                ar.message.as_deref().unwrap_or("assertion failed")
            ));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        out.push_str(&format!(" in {:.1}s", ms as f64 / 1000.0));
    }

    out.push_str(" ===\n");
    out
}

fn assertion_name(assertion: &Assertion) -> &'static str {
    match assertion {
        Assertion::BadgeCount { .. } => "BadgeCount",
        Assertion::VisibleBadgeCount { .. } => "VisibleBadgeCount",
        Assertion::OverlayNodeCount { .. } => "OverlayNodeCount",
        Assertion::SessionActive { .. } => "SessionActive",
        Assertion::PaletteOpen { .. } => "PaletteOpen",
        Assertion::PaletteVisible { .. } => "PaletteVisible",
        Assertion::PaletteSelected { .. } => "PaletteSelected",
        Assertion::ActivationCount { .. } => "ActivationCount",
        Assertion::LastActivationHrefContains { .. } => "LastActivationHrefContains",
        Assertion::LastActivationMode { .. } => "LastActivationMode",
        Assertion::BadgesWithinViewport => "BadgesWithinViewport",
        Assertion::ListenerCount { .. } => "ListenerCount",
    }
}
