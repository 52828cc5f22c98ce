use std::path::Path;

use tracing::info;

use crate::cli::config::AppConfig;
use crate::commands::command::build_commands;
use crate::commands::controller::Controller;
use crate::error::{JumpError, Result};
use crate::input::key::parse_keys;
use crate::labels::label::{LABEL_CAPACITY, LabelSequence};
use crate::labels::overlay::{LISTENER_COUNT_ID, MemorySurface};
use crate::matcher::matcher_model::SessionPhase;
use crate::page::snapshot::SnapshotPage;
use crate::report::console::format_console_report;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::SuiteReport;
use crate::scenario::runner::{ScenarioRunner, load_scenarios};
use crate::trace::logger::TraceLogger;

// ============================================================================
// replay subcommand
// ============================================================================

/// Press `keys` on the page in `page_path`, printing one line per keystroke.
pub fn cmd_replay(page_path: &str, keys: &str, config: &AppConfig) -> Result<()> {
    let page = SnapshotPage::from_file(Path::new(page_path))?;
    let events = parse_keys(keys)?;
    info!(page = page_path, url = page.url(), keys = events.len(), "replaying");

    let tracer = match &config.trace_path {
        Some(path) => TraceLogger::new(Path::new(path)),
        None => TraceLogger::disabled(),
    };
    let mut controller = Controller::new(page, MemorySurface::new(), config).with_tracer(tracer);
    controller.install();

    for event in &events {
        let disposition = controller.handle_key(event);
        // Let any delayed reposition fire before the next keystroke
        controller.advance(config.reposition_delay_ms);

        let state = match (controller.session(), controller.palette()) {
            (Some(session), _) => format!(
                "{} mode, buffer \"{}\", {} visible",
                session.mode().name(),
                session.buffer(),
                session.visible_count()
            ),
            (None, Some(palette)) => format!(
                "palette \"{}\", {} listed",
                palette.filter(),
                palette.visible().len()
            ),
            (None, None) => "idle".to_string(),
        };
        println!("{:<8} {:<12} {}", event.to_string(), format!("{:?}", disposition), state);
    }

    match controller.last_phase() {
        Some(SessionPhase::Resolved(label)) => println!("resolved: {}", label),
        Some(SessionPhase::Cancelled(reason)) => println!("cancelled: {}", reason),
        Some(SessionPhase::Collecting) | None => {}
    }
    if let Some(count) = controller.surface().listener_count() {
        println!("#{} data-count={}", LISTENER_COUNT_ID, count);
    }
    for activation in controller.page().activations() {
        println!(
            "activated {} ({}) {}",
            activation.element,
            activation.mode,
            activation.href.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

// ============================================================================
// run subcommand
// ============================================================================

/// Run scenarios and return whether all passed.
pub fn cmd_run(
    scenario_path: &str,
    format: &str,
    output: Option<&str>,
    config: &AppConfig,
) -> Result<bool> {
    let scenarios = load_scenarios(Path::new(scenario_path))?;

    if scenarios.is_empty() {
        eprintln!("No scenarios found at: {}", scenario_path);
        return Ok(true);
    }

    info!(count = scenarios.len(), "running scenarios");
    let start = std::time::Instant::now();

    let results = scenarios
        .iter()
        .map(|scenario| {
            info!(name = %scenario.name, "running scenario");
            ScenarioRunner::run(scenario, config)
        })
        .collect();

    let report =
        SuiteReport::from_results("CLI Run", results).with_duration(start.elapsed().as_millis());
    let all_passed = report.all_passed();

    let output_content = match format {
        "junit" => generate_junit_xml(&report),
        _ => format_console_report(&report),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &output_content).map_err(|e| JumpError::io(path, e))?
        }
        None => print!("{}", output_content),
    }

    Ok(all_passed)
}

// ============================================================================
// labels / commands subcommands
// ============================================================================

pub fn cmd_labels(count: usize) {
    if count > LABEL_CAPACITY {
        eprintln!("Only {} labels exist; printing all of them", LABEL_CAPACITY);
    }
    let labels: Vec<String> = LabelSequence::new()
        .take(count)
        .map(|l| l.to_string())
        .collect();
    println!("{}", labels.join(" "));
}

pub fn cmd_commands(config: &AppConfig) {
    println!("{:<4} Open command palette", config.bindings.palette);
    for command in build_commands(&config.bindings) {
        println!("{:<4} {}", command.trigger, command.description);
    }
}
