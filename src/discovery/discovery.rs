use tracing::debug;

use crate::page::host::Page;
use crate::page::page_model::{ElementId, PageElement};

/// Which part of the page a flow labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every interactive element in the viewport
    Page,
    /// Only interactive elements whose text contains the marker
    /// (comment threads on link aggregators)
    TextContains(String),
}

impl Scope {
    pub fn comments(marker: &str) -> Self {
        Scope::TextContains(marker.to_string())
    }
}

/// An element eligible for activation during one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub id: ElementId,
}

/// Enumerate the interactive, fully visible elements of `page` in document order.
pub fn discover(page: &dyn Page, scope: &Scope) -> Vec<Target> {
    let targets: Vec<Target> = page
        .elements()
        .into_iter()
        .filter(|&id| is_visible_target(page, id))
        .filter(|&id| match scope {
            Scope::Page => true,
            Scope::TextContains(marker) => page
                .text(id)
                .map(|text| text.contains(marker.as_str()))
                .unwrap_or(false),
        })
        .map(|id| Target { id })
        .collect();

    debug!(count = targets.len(), ?scope, "discovered targets");
    targets
}

fn is_visible_target(page: &dyn Page, id: ElementId) -> bool {
    match page.element(id) {
        Some(el) => is_interactive(el) && is_visible_in_viewport(page, id, el),
        None => false,
    }
}

/// Anchors, buttons, and anything styled with a pointer cursor.
pub fn is_interactive(el: &PageElement) -> bool {
    let tag = el.tag.to_ascii_lowercase();
    if tag == "a" || tag == "button" {
        return true;
    }
    el.cursor.as_deref() == Some("pointer")
}

/// Computed style is displayed and visible, the browser's visibility check
/// passes, and the whole client rect sits inside the viewport.
pub fn is_visible_in_viewport(page: &dyn Page, id: ElementId, el: &PageElement) -> bool {
    if !el.check_visibility
        || el.visibility.as_deref() == Some("hidden")
        || el.display.as_deref() == Some("none")
    {
        return false;
    }

    let Some(rect) = page.client_rect(id) else {
        return false;
    };
    let vp = page.viewport();

    rect.is_within(vp.width, vp.height)
}
