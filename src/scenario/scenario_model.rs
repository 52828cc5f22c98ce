use serde::{Deserialize, Serialize};

use crate::page::page_model::{OpenMode, PageSnapshot};

/// A scripted keyboard session against one page snapshot, written as YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Human-readable name for this scenario
    pub name: String,

    /// Page snapshot JSON, relative to the scenario file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,

    /// Snapshot embedded in the scenario itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_page: Option<PageSnapshot>,

    /// Ordered list of steps to execute
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Press keys, in key notation
    Keys { keys: String },

    /// Scroll the page by an offset and deliver a scroll event
    Scroll {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },

    /// Resize the viewport and deliver a resize event
    Resize { width: f64, height: f64 },

    /// Let the timer clock run
    Wait { duration_ms: u64 },

    /// Remove an element from the page
    Detach { element: usize },

    /// Move keyboard focus
    Focus { element: Option<usize> },

    /// Check the current state
    Assert { assertions: Vec<Assertion> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Number of rendered badges (markers), shown or hidden
    BadgeCount { expected: usize },

    /// Number of badges currently shown
    VisibleBadgeCount { expected: usize },

    /// Number of overlay nodes of any kind
    OverlayNodeCount { expected: usize },

    SessionActive { expected: bool },

    PaletteOpen { expected: bool },

    /// Number of commands listed by the open palette
    PaletteVisible { expected: usize },

    /// Trigger key of the selected palette command
    PaletteSelected { expected: char },

    ActivationCount { expected: usize },

    LastActivationHrefContains { expected: String },

    LastActivationMode { expected: OpenMode },

    /// Every shown marker lies inside the viewport
    BadgesWithinViewport,

    ListenerCount { expected: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// Which step this assertion belongs to (0-indexed)
    pub step_index: usize,

    pub assertion: Assertion,

    pub passed: bool,

    /// Actual value found (for debugging failed assertions)
    pub actual: Option<String>,

    /// Human-readable failure message
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,

    /// Whether all steps and assertions passed
    pub passed: bool,

    pub steps_run: usize,

    pub assertion_results: Vec<AssertionResult>,

    /// Error message if the scenario failed to execute (not assertion failure)
    pub error: Option<String>,
}
