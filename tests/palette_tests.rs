use jump_to::cli::config::{AppConfig, Bindings};
use jump_to::commands::command::{CommandAction, Flow, build_commands, find_command};
use jump_to::commands::palette::{Palette, PaletteStep};
use jump_to::input::key::{KeyEvent, parse_keys};
use jump_to::page::page_model::OpenMode;

use crate::common::pages::{controller, links};

mod common;

fn type_keys(palette: &mut Palette, keys: &str) -> Vec<PaletteStep> {
    let commands = build_commands(&Bindings::default());
    parse_keys(keys)
        .unwrap()
        .iter()
        .map(|k| palette.handle_key(k, &commands))
        .collect()
}

// ============================================================================
// Command table
// ============================================================================

#[test]
fn command_table_has_seven_entries_in_order() {
    let commands = build_commands(&Bindings::default());
    let triggers: String = commands.iter().map(|c| c.trigger).collect();
    assert_eq!(triggers, "kKhH/?x");

    assert_eq!(
        commands[1].action,
        CommandAction::Start {
            flow: Flow::Links,
            open_mode: OpenMode::NewTab
        }
    );
    assert_eq!(
        find_command(&commands, '?').map(|c| c.action),
        Some(CommandAction::Start {
            flow: Flow::Search,
            open_mode: OpenMode::NewTab
        })
    );
    assert_eq!(commands[6].action, CommandAction::Disable);
    assert!(find_command(&commands, 'p').is_none());
}

#[test]
fn bindings_rename_triggers() {
    let bindings = Bindings {
        jump: 'f',
        ..Bindings::default()
    };
    let commands = build_commands(&bindings);
    assert_eq!(commands[0].trigger, 'f');
    assert!(find_command(&commands, 'k').is_none());
}

// ============================================================================
// Filtering and selection
// ============================================================================

#[test]
fn palette_opens_with_everything_listed() {
    let palette = Palette::open(&build_commands(&Bindings::default()));
    assert_eq!(palette.visible().len(), 7);
    assert_eq!(palette.selected(), Some(0));
    assert_eq!(palette.filter(), "");
}

#[test]
fn filter_is_case_sensitive() {
    let commands = build_commands(&Bindings::default());
    let mut palette = Palette::open(&commands);

    let steps = type_keys(&mut palette, "k");
    assert_eq!(steps, vec![PaletteStep::Filtered { visible: 1 }]);
    assert_eq!(palette.visible(), &[0]);

    type_keys(&mut palette, "<BS>K");
    assert_eq!(palette.visible(), &[1]);
    assert_eq!(palette.selected(), Some(1));
}

#[test]
fn hidden_selection_re_anchors_to_first_visible() {
    let mut palette = Palette::open(&build_commands(&Bindings::default()));
    type_keys(&mut palette, "<Down><Down><Down>");
    assert_eq!(palette.selected(), Some(3));

    type_keys(&mut palette, "?");
    assert_eq!(palette.selected(), Some(5));

    type_keys(&mut palette, "<BS>");
    // Still visible, so the selection stays put
    assert_eq!(palette.selected(), Some(5));
}

#[test]
fn arrows_clamp_at_both_ends() {
    let mut palette = Palette::open(&build_commands(&Bindings::default()));

    let steps = type_keys(&mut palette, "<Up>");
    assert_eq!(steps, vec![PaletteStep::Moved { selected: 0 }]);

    type_keys(&mut palette, &"<Down>".repeat(10));
    assert_eq!(palette.selected_row(), Some(6));
    assert_eq!(type_keys(&mut palette, "<Enter>"), vec![PaletteStep::Execute(6)]);
}

#[test]
fn empty_filter_result_closes_on_enter() {
    let mut palette = Palette::open(&build_commands(&Bindings::default()));

    let steps = type_keys(&mut palette, "z");
    assert_eq!(steps, vec![PaletteStep::Filtered { visible: 0 }]);
    assert_eq!(palette.selected(), None);
    assert_eq!(type_keys(&mut palette, "<Down>"), vec![PaletteStep::Ignored]);
    assert_eq!(type_keys(&mut palette, "<Enter>"), vec![PaletteStep::Closed]);
}

#[test]
fn escape_closes_and_ctrl_passes_through() {
    let commands = build_commands(&Bindings::default());
    let mut palette = Palette::open(&commands);
    assert_eq!(
        palette.handle_key(&KeyEvent::char('r').with_ctrl(), &commands),
        PaletteStep::PassThrough
    );
    assert_eq!(palette.handle_key(&KeyEvent::escape(), &commands), PaletteStep::Closed);
}

// ============================================================================
// Through the controller
// ============================================================================

#[test]
fn palette_enter_matches_direct_trigger() {
    let mut via_palette = controller(links(5));
    for key in parse_keys("p<Down><Enter>ca").unwrap() {
        via_palette.handle_key(&key);
    }

    let mut direct = controller(links(5));
    for key in parse_keys("Kca").unwrap() {
        direct.handle_key(&key);
    }

    assert_eq!(via_palette.page().activations(), direct.page().activations());
    assert_eq!(
        via_palette.page().last_activation().map(|a| a.mode),
        Some(OpenMode::NewTab)
    );
}

#[test]
fn palette_filter_then_enter_runs_filtered_command() {
    let mut c = controller(links(5));
    for key in parse_keys("ph").unwrap() {
        c.handle_key(&key);
    }
    assert_eq!(c.palette().map(|p| p.visible().len()), Some(1));

    c.handle_key(&KeyEvent::enter());
    assert!(c.palette().is_none());
    // No link text contains "comment", so the comment flow labels nothing
    assert!(c.is_active());
    assert_eq!(c.session().map(|s| s.labels().len()), Some(0));
}

#[test]
fn palette_escape_runs_nothing() {
    let mut c = controller(links(5));
    for key in parse_keys("p<Esc>").unwrap() {
        c.handle_key(&key);
    }
    assert!(c.palette().is_none());
    assert!(!c.is_active());
    assert_eq!(c.session_count(), 0);
}

#[test]
fn palette_trigger_is_configurable() {
    let config = AppConfig {
        bindings: Bindings {
            palette: ';',
            ..Bindings::default()
        },
        ..AppConfig::default()
    };
    let mut c = jump_to::commands::controller::Controller::new(
        links(2),
        jump_to::labels::overlay::MemorySurface::new(),
        &config,
    );
    c.install();
    c.handle_key(&KeyEvent::char(';'));
    assert!(c.palette().is_some());
}
