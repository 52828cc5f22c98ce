use crate::report::report_model::SuiteReport;

// ============================================================================
// JUnit XML reporter
// ============================================================================

const CLASSNAME: &str = "jump-to";

/// Render the suite as JUnit XML for CI systems.
pub fn generate_junit_xml(report: &SuiteReport) -> String {
    let time_attr = report
        .duration_ms
        .map(|ms| format!(" time=\"{:.3}\"", ms as f64 / 1000.0))
        .unwrap_or_default();

    let mut cases = String::new();
    for result in &report.results {
        if result.passed {
            cases.push_str(&format!(
                "  <testcase name=\"{}\" classname=\"{}\" />\n",
                escape_xml(&result.name),
                CLASSNAME
            ));
            continue;
        }

        let mut body: Vec<String> = result
            .assertion_results
            .iter()
            .filter(|ar| !ar.passed)
            .map(|ar| {
                format!(
                    "Step {}: {}",
                    ar.step_index,
                    ar.message.as_deref().unwrap_or("assertion failed")
                )
            })
            .collect();
        let failure_count = body.len();
        if let Some(error) = &result.error {
            body.push(format!("Error: {}", error));
        }

        let message = if failure_count > 0 {
            format!("{} assertion(s) failed", failure_count)
        } else {
            "execution error".to_string()
        };

        cases.push_str(&format!(
            "  <testcase name=\"{name}\" classname=\"{class}\">\n    <failure message=\"{message}\" type=\"AssertionFailure\">{body}</failure>\n  </testcase>\n",
            name = escape_xml(&result.name),
            class = CLASSNAME,
            message = escape_xml(&message),
            body = escape_xml(&body.join("\n")),
        ));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\"{time}>\n{cases}</testsuite>\n",
        name = escape_xml(&report.suite_name),
        tests = report.total,
        failures = report.failed,
        time = time_attr,
        cases = cases,
    )
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
