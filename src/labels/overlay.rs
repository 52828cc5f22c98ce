use serde::Serialize;

use crate::labels::label::Label;
use crate::page::page_model::Rect;

/// Carried by every overlay node, so one query wipes them all.
pub const OVERLAY_CLASS: &str = "--jump";
/// Carried by the marker node (the one showing the code).
pub const LINK_CLASS: &str = "--jump-link";
pub const LISTENER_COUNT_ID: &str = "_jumpToListenerCount";

pub fn label_class(label: &Label) -> String {
    format!("--jump-{}", label)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Marker,
    Outline,
}

/// One absolutely positioned node painted over the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayNode {
    pub kind: NodeKind,
    pub label: Label,
    pub classes: Vec<String>,
    /// Page coordinates (client rect plus scroll offset)
    pub rect: Rect,
    pub text: Option<String>,
    pub visible: bool,
}

impl OverlayNode {
    pub fn marker(label: &Label, rect: Rect) -> Self {
        Self {
            kind: NodeKind::Marker,
            label: label.clone(),
            classes: vec![
                OVERLAY_CLASS.to_string(),
                label_class(label),
                LINK_CLASS.to_string(),
            ],
            rect,
            text: Some(label.to_string()),
            visible: true,
        }
    }

    pub fn outline(label: &Label, rect: Rect) -> Self {
        Self {
            kind: NodeKind::Outline,
            label: label.clone(),
            classes: vec![OVERLAY_CLASS.to_string(), label_class(label)],
            rect,
            text: None,
            visible: true,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Paints and removes overlay nodes on the host page.
pub trait OverlaySurface {
    fn append(&mut self, node: OverlayNode);

    /// Remove every node carrying `class`; returns how many were removed.
    fn remove_class(&mut self, class: &str) -> usize;

    /// Toggle `display` for every node carrying `class`.
    fn set_display_class(&mut self, class: &str, visible: bool);

    /// Update the hidden node exposing how many root listeners are installed.
    fn set_listener_count(&mut self, count: u32);
}

/// Overlay surface that keeps nodes in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    nodes: Vec<OverlayNode>,
    listener_count: Option<u32>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[OverlayNode] {
        &self.nodes
    }

    pub fn visible_nodes(&self) -> Vec<&OverlayNode> {
        self.nodes.iter().filter(|n| n.visible).collect()
    }

    pub fn count_class(&self, class: &str) -> usize {
        self.nodes.iter().filter(|n| n.has_class(class)).count()
    }

    pub fn markers(&self) -> Vec<&OverlayNode> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Marker)
            .collect()
    }

    pub fn visible_markers(&self) -> Vec<&OverlayNode> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Marker && n.visible)
            .collect()
    }

    pub fn marker(&self, label: &str) -> Option<&OverlayNode> {
        self.nodes
            .iter()
            .find(|n| n.kind == NodeKind::Marker && n.label.as_str() == label)
    }

    /// `None` until a root listener has been installed at least once.
    pub fn listener_count(&self) -> Option<u32> {
        self.listener_count
    }
}

impl OverlaySurface for MemorySurface {
    fn append(&mut self, node: OverlayNode) {
        self.nodes.push(node);
    }

    fn remove_class(&mut self, class: &str) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| !n.has_class(class));
        before - self.nodes.len()
    }

    fn set_display_class(&mut self, class: &str, visible: bool) {
        for node in self.nodes.iter_mut().filter(|n| n.has_class(class)) {
            node.visible = visible;
        }
    }

    fn set_listener_count(&mut self, count: u32) {
        self.listener_count = Some(count);
    }
}
