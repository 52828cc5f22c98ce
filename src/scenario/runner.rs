use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::config::AppConfig;
use crate::commands::controller::Controller;
use crate::error::{JumpError, Result};
use crate::input::key::parse_keys;
use crate::labels::overlay::{MemorySurface, OVERLAY_CLASS};
use crate::page::host::Page;
use crate::page::page_model::ElementId;
use crate::page::snapshot::SnapshotPage;
use crate::scenario::context::ScenarioContext;
use crate::scenario::scenario_model::{Assertion, AssertionResult, Scenario, ScenarioResult, ScenarioStep};

type ScenarioController = Controller<SnapshotPage, MemorySurface>;

/// Executes a [`Scenario`] step by step against an in-memory page.
pub struct ScenarioRunner;

impl ScenarioRunner {
    pub fn run(scenario: &Scenario, config: &AppConfig) -> ScenarioResult {
        let mut ctx = ScenarioContext::new();

        let page = match Self::load_page(scenario) {
            Ok(page) => page,
            Err(e) => {
                return ScenarioResult {
                    name: scenario.name.clone(),
                    passed: false,
                    steps_run: 0,
                    assertion_results: ctx.assertion_results,
                    error: Some(format!("Failed to load page: {}", e)),
                };
            }
        };

        let mut controller = Controller::new(page, MemorySurface::new(), config);
        controller.install();

        for (i, step) in scenario.steps.iter().enumerate() {
            ctx.current_step = i;
            if let Err(e) = Self::execute_step(step, i, &mut controller, &mut ctx) {
                return ScenarioResult {
                    name: scenario.name.clone(),
                    passed: false,
                    steps_run: ctx.current_step + 1,
                    error: Some(format!("Step {} failed: {}", ctx.current_step, e)),
                    assertion_results: ctx.assertion_results,
                };
            }
        }

        ScenarioResult {
            name: scenario.name.clone(),
            passed: ctx.all_passed(),
            steps_run: scenario.steps.len(),
            assertion_results: ctx.assertion_results,
            error: None,
        }
    }

    fn load_page(scenario: &Scenario) -> Result<SnapshotPage> {
        match (&scenario.inline_page, &scenario.page) {
            (Some(snapshot), _) => Ok(SnapshotPage::new(snapshot.clone())),
            (None, Some(path)) => SnapshotPage::from_file(Path::new(path)),
            (None, None) => Err(JumpError::io(
                scenario.name.clone(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "scenario has no page"),
            )),
        }
    }

    fn execute_step(
        step: &ScenarioStep,
        step_index: usize,
        controller: &mut ScenarioController,
        ctx: &mut ScenarioContext,
    ) -> Result<()> {
        debug!(step = step_index, ?step, "scenario step");
        match step {
            ScenarioStep::Keys { keys } => {
                for key in parse_keys(keys)? {
                    controller.handle_key(&key);
                }
            }
            ScenarioStep::Scroll { x, y } => {
                controller.page_mut().scroll_by(*x, *y);
                controller.on_scroll();
            }
            ScenarioStep::Resize { width, height } => {
                controller.page_mut().resize(*width, *height);
                controller.on_resize();
            }
            ScenarioStep::Wait { duration_ms } => {
                controller.advance(*duration_ms);
            }
            ScenarioStep::Detach { element } => {
                controller.page_mut().detach(ElementId(*element));
            }
            ScenarioStep::Focus { element } => {
                controller.page_mut().focus(element.map(ElementId));
            }
            ScenarioStep::Assert { assertions } => {
                let results = assertions
                    .iter()
                    .map(|a| Self::evaluate_one(a, step_index, controller))
                    .collect();
                ctx.record_assertions(results);
            }
        }
        Ok(())
    }

    fn evaluate_one(
        assertion: &Assertion,
        step_index: usize,
        controller: &ScenarioController,
    ) -> AssertionResult {
        let surface = controller.surface();
        let page = controller.page();

        let (passed, actual) = match assertion {
            Assertion::BadgeCount { expected } => {
                let n = surface.markers().len();
                (n == *expected, n.to_string())
            }
            Assertion::VisibleBadgeCount { expected } => {
                let n = surface.visible_markers().len();
                (n == *expected, n.to_string())
            }
            Assertion::OverlayNodeCount { expected } => {
                let n = surface.count_class(OVERLAY_CLASS);
                (n == *expected, n.to_string())
            }
            Assertion::SessionActive { expected } => {
                let active = controller.is_active();
                (active == *expected, active.to_string())
            }
            Assertion::PaletteOpen { expected } => {
                let open = controller.palette().is_some();
                (open == *expected, open.to_string())
            }
            Assertion::PaletteVisible { expected } => {
                let n = controller.palette().map(|p| p.visible().len()).unwrap_or(0);
                (n == *expected, n.to_string())
            }
            Assertion::PaletteSelected { expected } => {
                let selected = controller
                    .palette()
                    .and_then(|p| p.selected())
                    .and_then(|i| controller.commands().get(i))
                    .map(|c| c.trigger);
                (
                    selected == Some(*expected),
                    selected.map(|c| c.to_string()).unwrap_or_else(|| "none".into()),
                )
            }
            Assertion::ActivationCount { expected } => {
                let n = page.activations().len();
                (n == *expected, n.to_string())
            }
            Assertion::LastActivationHrefContains { expected } => {
                let href = page.last_activation().and_then(|a| a.href.clone());
                (
                    href.as_deref().map(|h| h.contains(expected.as_str())).unwrap_or(false),
                    href.unwrap_or_else(|| "none".into()),
                )
            }
            Assertion::LastActivationMode { expected } => {
                let mode = page.last_activation().map(|a| a.mode);
                (
                    mode == Some(*expected),
                    mode.map(|m| m.to_string()).unwrap_or_else(|| "none".into()),
                )
            }
            Assertion::BadgesWithinViewport => {
                let vp = page.viewport();
                let outside: Vec<String> = surface
                    .visible_markers()
                    .into_iter()
                    .filter(|n| {
                        !n.rect
                            .translate(-vp.scroll_x, -vp.scroll_y)
                            .is_within(vp.width, vp.height)
                    })
                    .map(|n| n.label.to_string())
                    .collect();
                (outside.is_empty(), format!("outside: [{}]", outside.join(", ")))
            }
            Assertion::ListenerCount { expected } => {
                let n = controller.listener_count();
                (n == *expected, n.to_string())
            }
        };

        AssertionResult {
            step_index,
            assertion: assertion.clone(),
            passed,
            message: if passed {
                None
            } else {
                Some(format!("{}, actual {}", describe(assertion), actual))
            },
            actual: Some(actual),
        }
    }
}

/// Short human-readable form of an assertion for reports.
pub fn describe(assertion: &Assertion) -> String {
    match assertion {
        Assertion::BadgeCount { expected } => format!("expected {} badges", expected),
        Assertion::VisibleBadgeCount { expected } => format!("expected {} visible badges", expected),
        Assertion::OverlayNodeCount { expected } => format!("expected {} overlay nodes", expected),
        Assertion::SessionActive { expected } => format!("expected session active = {}", expected),
        Assertion::PaletteOpen { expected } => format!("expected palette open = {}", expected),
        Assertion::PaletteVisible { expected } => format!("expected {} palette rows", expected),
        Assertion::PaletteSelected { expected } => format!("expected '{}' selected", expected),
        Assertion::ActivationCount { expected } => format!("expected {} activations", expected),
        Assertion::LastActivationHrefContains { expected } => {
            format!("expected last activation href to contain '{}'", expected)
        }
        Assertion::LastActivationMode { expected } => {
            format!("expected last activation in {}", expected)
        }
        Assertion::BadgesWithinViewport => "expected all badges inside the viewport".to_string(),
        Assertion::ListenerCount { expected } => format!("expected {} root listeners", expected),
    }
}

/// Load scenarios from a YAML file or a directory of YAML files.
///
/// `page` paths are resolved against the directory holding the scenario.
pub fn load_scenarios(path: &Path) -> Result<Vec<Scenario>> {
    let metadata = std::fs::metadata(path).map_err(|e| JumpError::io(path.display().to_string(), e))?;
    if metadata.is_dir() {
        let mut scenarios = Vec::new();
        let entries =
            std::fs::read_dir(path).map_err(|e| JumpError::io(path.display().to_string(), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| JumpError::io(path.display().to_string(), e))?;
            let p = entry.path();
            if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
                scenarios.push(load_scenario(&p)?);
            }
        }
        // Sort by name for deterministic order
        scenarios.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(scenarios)
    } else {
        Ok(vec![load_scenario(path)?])
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let content =
        std::fs::read_to_string(path).map_err(|e| JumpError::io(path.display().to_string(), e))?;
    let mut scenario: Scenario =
        serde_yaml::from_str(&content).map_err(|source| JumpError::ScenarioParse {
            context: path.display().to_string(),
            source,
        })?;

    if let Some(page) = &scenario.page {
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let resolved: PathBuf = base.join(page);
        scenario.page = Some(resolved.display().to_string());
    }
    Ok(scenario)
}
