use jump_to::commands::command::Flow;
use jump_to::commands::controller::KeyDisposition;
use jump_to::error::JumpError;
use jump_to::input::key::{KeyEvent, parse_keys};
use jump_to::labels::label::Label;
use jump_to::labels::overlay::OVERLAY_CLASS;
use jump_to::matcher::matcher_model::{CancelReason, SessionPhase};
use jump_to::page::page_model::{ElementId, OpenMode, PageElement, Rect};
use jump_to::page::snapshot::SnapshotPage;

use crate::common::pages::{TestController, controller, edge_page, links};

mod common;

fn press(c: &mut TestController, keys: &str) -> Vec<KeyDisposition> {
    parse_keys(keys)
        .unwrap()
        .iter()
        .map(|k| c.handle_key(k))
        .collect()
}

// ============================================================================
// Root listener lifecycle
// ============================================================================

#[test]
fn install_is_guarded_against_double_registration() {
    let mut c = controller(links(3));
    assert!(c.is_installed());
    assert!(!c.install());
    assert_eq!(c.listener_count(), 1);
    assert_eq!(c.surface().listener_count(), Some(1));
}

#[test]
fn uninstall_tears_down_active_session() {
    let mut c = controller(links(3));
    press(&mut c, "k");
    assert!(c.is_active());

    assert!(c.uninstall());
    assert!(!c.is_active());
    assert_eq!(c.listener_count(), 0);
    assert_eq!(c.surface().listener_count(), Some(0));
    assert_eq!(c.surface().count_class(OVERLAY_CLASS), 0);
    assert_eq!(
        c.last_phase(),
        Some(&SessionPhase::Cancelled(CancelReason::Uninstalled))
    );
    assert_eq!(press(&mut c, "k"), vec![KeyDisposition::Ignored]);
}

#[test]
fn disable_command_uninstalls() {
    let mut c = controller(links(3));
    assert_eq!(press(&mut c, "x"), vec![KeyDisposition::Consumed]);
    assert!(!c.is_installed());
    assert_eq!(c.start_flow(Flow::Links, OpenMode::SameTab).unwrap_err().to_string(),
        JumpError::NotInstalled.to_string());
}

// ============================================================================
// Triggers
// ============================================================================

#[test]
fn trigger_starts_a_session_with_badges() {
    let mut c = controller(links(4));

    assert_eq!(press(&mut c, "k"), vec![KeyDisposition::Consumed]);

    assert!(c.is_active());
    assert_eq!(c.session_count(), 1);
    assert_eq!(c.surface().markers().len(), 4);
    assert_eq!(c.surface().count_class(OVERLAY_CLASS), 8);
}

#[test]
fn full_label_activates_and_cleans_up() {
    let mut c = controller(links(4));
    press(&mut c, "kda");

    assert!(!c.is_active());
    assert!(c.session().is_none());
    assert_eq!(c.last_phase(), Some(&SessionPhase::Resolved(Label::new("da"))));
    assert_eq!(c.page().last_activation().map(|a| a.element), Some(ElementId(3)));
    assert!(c.surface().nodes().is_empty());
}

#[test]
fn second_flow_is_rejected_while_one_is_active() {
    let mut c = controller(links(4));
    c.start_flow(Flow::Links, OpenMode::SameTab).unwrap();

    match c.start_flow(Flow::Search, OpenMode::SameTab) {
        Err(JumpError::SessionActive(id)) => assert_eq!(id, 1),
        other => panic!("expected SessionActive, got {:?}", other),
    }
    assert_eq!(c.surface().markers().len(), 4);
}

#[test]
fn trigger_keys_during_a_session_are_label_input() {
    let mut c = controller(links(30));
    press(&mut c, "k");
    // "k" again is a label character, not a new session
    press(&mut c, "k");
    assert_eq!(c.session_count(), 1);
    assert_eq!(c.session().map(|s| s.buffer()), Some("k".to_string()));
}

#[test]
fn unbound_and_modified_keys_are_ignored_when_idle() {
    let mut c = controller(links(3));
    assert_eq!(press(&mut c, "q"), vec![KeyDisposition::Ignored]);
    assert_eq!(c.handle_key(&KeyEvent::char('h').with_ctrl()), KeyDisposition::Ignored);
    assert_eq!(c.handle_key(&KeyEvent::char('k').with_meta()), KeyDisposition::Ignored);
    assert_eq!(c.session_count(), 0);
}

#[test]
fn editable_focus_swallows_triggers() {
    let mut page = links(3);
    let input = page.push_element(PageElement::new("input", "", Rect::new(10.0, 600.0, 200.0, 20.0)));
    page.focus(Some(input));
    let mut c = controller(page);

    assert_eq!(press(&mut c, "k"), vec![KeyDisposition::Ignored]);
    assert!(!c.is_active());

    c.page_mut().focus(None);
    assert_eq!(press(&mut c, "k"), vec![KeyDisposition::Consumed]);
}

#[test]
fn comment_flow_labels_only_comment_links() {
    let page = SnapshotPage::with_elements(vec![
        PageElement::link("Show HN: thing", "/thing", Rect::new(10.0, 10.0, 200.0, 20.0)),
        PageElement::link("12 comments", "/item?id=1", Rect::new(10.0, 40.0, 100.0, 20.0)),
        PageElement::link("Ask HN: other", "/other", Rect::new(10.0, 70.0, 200.0, 20.0)),
        PageElement::link("3 comments", "/item?id=2", Rect::new(10.0, 100.0, 100.0, 20.0)),
    ]);
    let mut c = controller(page);

    press(&mut c, "Hba");

    let activation = c.page().last_activation().unwrap();
    assert_eq!(activation.href.as_deref(), Some("/item?id=2"));
    assert_eq!(activation.mode, OpenMode::NewTab);
}

#[test]
fn search_flow_through_controller() {
    let page = SnapshotPage::with_elements(vec![
        PageElement::link("Rust 2024", "/rust", Rect::new(10.0, 10.0, 200.0, 20.0)),
        PageElement::link("Go 1.22", "/go", Rect::new(10.0, 40.0, 100.0, 20.0)),
        PageElement::link("Rustlings", "/rustlings", Rect::new(10.0, 70.0, 200.0, 20.0)),
    ]);
    let mut c = controller(page);

    press(&mut c, "/rust");
    assert_eq!(c.session().map(|s| s.visible_count()), Some(2));

    press(&mut c, "l");
    assert_eq!(c.page().last_activation().and_then(|a| a.href.clone()), Some("/rustlings".into()));
}

#[test]
fn escape_cancels_and_next_trigger_starts_fresh() {
    let mut c = controller(links(3));
    press(&mut c, "kb<Esc>");
    assert_eq!(c.last_phase(), Some(&SessionPhase::Cancelled(CancelReason::Escape)));
    assert!(c.surface().nodes().is_empty());

    press(&mut c, "k");
    assert_eq!(c.session_count(), 2);
    assert_eq!(c.session().map(|s| s.visible_count()), Some(3));
}

// ============================================================================
// Visual sync
// ============================================================================

#[test]
fn ctrl_chord_schedules_one_delayed_reposition() {
    let mut c = controller(links(3));
    press(&mut c, "k");

    assert_eq!(c.handle_key(&KeyEvent::char('f').with_ctrl()), KeyDisposition::PassThrough);
    assert_eq!(c.timers().pending(), 1);
    assert!(c.is_active());

    assert_eq!(c.advance(49), 0);
    assert_eq!(c.advance(1), 1);
    assert_eq!(c.timers().pending(), 0);
    assert_eq!(c.surface().markers().len(), 3);
}

#[test]
fn late_timer_after_teardown_is_harmless() {
    let mut c = controller(links(3));
    press(&mut c, "k");
    c.handle_key(&KeyEvent::char('f').with_ctrl());
    press(&mut c, "<Esc>");

    assert_eq!(c.advance(100), 0);
    assert!(c.surface().nodes().is_empty());
}

#[test]
fn scroll_moves_badges_with_their_targets() {
    let page = SnapshotPage::with_elements(vec![PageElement::link(
        "a",
        "/a",
        Rect::new(100.0, 300.0, 80.0, 20.0),
    )]);
    let mut c = controller(page);
    press(&mut c, "k");

    c.page_mut().resize(1280.0, 330.0);
    assert!(c.on_resize());
    assert_eq!(c.surface().marker("aa").map(|m| m.rect.top), Some(270.0));
    assert_eq!(c.surface().markers().len(), 1);

    // Matcher state survives
    press(&mut c, "a");
    assert_eq!(c.session().map(|s| s.buffer()), Some("a".to_string()));
}

#[test]
fn scroll_without_session_does_nothing() {
    let mut c = controller(links(3));
    c.page_mut().scroll_by(0.0, 50.0);
    assert!(!c.on_scroll());
}

#[test]
fn badges_at_viewport_edges_stay_inside() {
    let mut c = controller(edge_page());
    press(&mut c, "k");

    let vp = jump_to::page::page_model::Viewport::default();
    let markers = c.surface().markers();
    assert_eq!(markers.len(), 4);
    for marker in markers {
        assert!(
            marker.rect.is_within(vp.width, vp.height),
            "{} at {:?}",
            marker.label,
            marker.rect
        );
    }
    // Left-edge target gets the right-anchored marker
    assert_eq!(c.surface().marker("aa").map(|m| m.rect.left), Some(70.0));
}
