use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "jump-to",
    version,
    about = "Keyboard label navigation for web pages, driven from page snapshots"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: jump-to.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append a JSON-lines session trace to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Feed keystrokes to a page snapshot and print what happens
    Replay {
        /// Page snapshot JSON
        #[arg(long)]
        page: String,

        /// Keys to press, e.g. "k ca" or "/sin<Enter>bb"
        #[arg(long)]
        keys: String,

        /// Delay before badges are repositioned after a Ctrl chord
        #[arg(long)]
        reposition_delay_ms: Option<u64>,
    },

    /// Run keystroke scenarios from YAML files
    Run {
        /// Path to a scenario YAML file or a directory of them
        #[arg(long)]
        scenario: String,

        /// Output format: console, junit
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout for console, report.xml for junit)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print labels in allocation order
    Labels {
        /// How many labels to print (at most 676)
        #[arg(long, default_value_t = 26)]
        count: usize,
    },

    /// Print the command table
    Commands,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `jump-to.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub bindings: Bindings,

    /// Text a link must contain to be labeled by the comment flows
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,

    #[serde(default = "default_reposition_delay")]
    pub reposition_delay_ms: u64,

    #[serde(default)]
    pub trace_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Bindings::default(),
            comment_marker: default_comment_marker(),
            reposition_delay_ms: default_reposition_delay(),
            trace_path: None,
        }
    }
}

/// Single-key triggers for each command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    pub jump: char,
    pub jump_new_tab: char,
    pub comments: char,
    pub comments_new_tab: char,
    pub search: char,
    pub search_new_tab: char,
    pub disable: char,
    pub palette: char,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            jump: 'k',
            jump_new_tab: 'K',
            comments: 'h',
            comments_new_tab: 'H',
            search: '/',
            search_new_tab: '?',
            disable: 'x',
            palette: 'p',
        }
    }
}

// Serde default helpers
fn default_comment_marker() -> String { "comment".to_string() }
fn default_reposition_delay() -> u64 { 50 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("jump-to.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = config_path, error = %e, "malformed config, using defaults");
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

/// Apply CLI overrides on top of the loaded config.
pub fn merge_overrides(
    mut config: AppConfig,
    trace: Option<&str>,
    reposition_delay_ms: Option<u64>,
) -> AppConfig {
    if let Some(path) = trace {
        config.trace_path = Some(path.to_string());
    }
    if let Some(ms) = reposition_delay_ms {
        config.reposition_delay_ms = ms;
    }
    config
}
