use crate::error::Result;
use crate::page::page_model::{Activation, ElementId, OpenMode, PageElement, Rect, Viewport};

/// The host page as seen by the labeling engine.
///
/// Implementations wrap a live DOM (or a snapshot of one). The engine only
/// ever holds `ElementId`s, never the elements themselves, so every call must
/// tolerate ids that no longer resolve.
pub trait Page {
    fn viewport(&self) -> Viewport;

    /// Every element under `body`, in document order.
    fn elements(&self) -> Vec<ElementId>;

    fn element(&self, id: ElementId) -> Option<&PageElement>;

    /// Viewport-relative bounding rectangle, `None` when detached.
    fn client_rect(&self, id: ElementId) -> Option<Rect>;

    /// Whether keyboard focus currently sits in an input, textarea or
    /// content-editable node.
    fn focus_is_editable(&self) -> bool;

    /// Click the element, or request a Ctrl-click for `OpenMode::NewTab`.
    fn activate(&mut self, id: ElementId, mode: OpenMode) -> Result<Activation>;

    /// Display text used for search matching (`innerText`).
    fn text(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|el| el.text.as_str())
    }
}
