use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::error::{JumpError, Result};
use crate::page::host::Page;
use crate::page::page_model::{
    Activation, ElementId, OpenMode, PageElement, PageSnapshot, Rect, Viewport,
};

/// In-memory page backed by a [`PageSnapshot`].
///
/// Scrolling, resizing and detaching elements mutate the snapshot the same
/// way a live page would change under the overlay. Clicks are recorded
/// instead of navigating.
#[derive(Debug, Clone)]
pub struct SnapshotPage {
    snapshot: PageSnapshot,
    detached: HashSet<usize>,
    activations: Vec<Activation>,
}

impl SnapshotPage {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self {
            snapshot,
            detached: HashSet::new(),
            activations: Vec::new(),
        }
    }

    /// Page with the default 1280x720 viewport and the given elements.
    pub fn with_elements(elements: Vec<PageElement>) -> Self {
        Self::new(PageSnapshot {
            url: "about:blank".to_string(),
            title: String::new(),
            viewport: Viewport::default(),
            elements,
            focused: None,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: PageSnapshot =
            serde_json::from_str(json).map_err(|source| JumpError::PageParse {
                context: "page snapshot".to_string(),
                source,
            })?;
        Ok(Self::new(snapshot))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| JumpError::io(path.display().to_string(), e))?;
        let snapshot: PageSnapshot =
            serde_json::from_str(&content).map_err(|source| JumpError::PageParse {
                context: path.display().to_string(),
                source,
            })?;
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &PageSnapshot {
        &self.snapshot
    }

    pub fn url(&self) -> &str {
        &self.snapshot.url
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.snapshot.viewport.scroll_x = x.max(0.0);
        self.snapshot.viewport.scroll_y = y.max(0.0);
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        let vp = self.snapshot.viewport;
        self.scroll_to(vp.scroll_x + dx, vp.scroll_y + dy);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.snapshot.viewport.width = width;
        self.snapshot.viewport.height = height;
    }

    /// Remove an element from the page while keeping ids stable.
    pub fn detach(&mut self, id: ElementId) {
        debug!(element = %id, "detaching element");
        self.detached.insert(id.0);
    }

    pub fn focus(&mut self, id: Option<ElementId>) {
        self.snapshot.focused = id.map(|id| id.0);
    }

    pub fn push_element(&mut self, element: PageElement) -> ElementId {
        self.snapshot.elements.push(element);
        ElementId(self.snapshot.elements.len() - 1)
    }

    pub fn activations(&self) -> &[Activation] {
        &self.activations
    }

    pub fn last_activation(&self) -> Option<&Activation> {
        self.activations.last()
    }
}

impl Page for SnapshotPage {
    fn viewport(&self) -> Viewport {
        self.snapshot.viewport
    }

    fn elements(&self) -> Vec<ElementId> {
        (0..self.snapshot.elements.len())
            .filter(|i| !self.detached.contains(i))
            .map(ElementId)
            .collect()
    }

    fn element(&self, id: ElementId) -> Option<&PageElement> {
        if self.detached.contains(&id.0) {
            return None;
        }
        self.snapshot.elements.get(id.0)
    }

    fn client_rect(&self, id: ElementId) -> Option<Rect> {
        let vp = self.snapshot.viewport;
        self.element(id)
            .map(|el| el.rect.translate(-vp.scroll_x, -vp.scroll_y))
    }

    fn focus_is_editable(&self) -> bool {
        self.snapshot
            .focused
            .and_then(|i| self.element(ElementId(i)))
            .map(|el| el.is_editable())
            .unwrap_or(false)
    }

    fn activate(&mut self, id: ElementId, mode: OpenMode) -> Result<Activation> {
        let element = self.element(id).ok_or(JumpError::DetachedTarget(id))?;
        let activation = Activation {
            element: id,
            mode,
            href: element.href.clone(),
        };
        self.activations.push(activation.clone());
        Ok(activation)
    }
}
