use std::collections::HashMap;

use tracing::{debug, warn};

use crate::discovery::discovery::Target;
use crate::labels::label::{LABEL_CAPACITY, Label, LabelSequence};
use crate::labels::overlay::{OVERLAY_CLASS, OverlayNode, OverlaySurface, label_class};
use crate::labels::placement::marker_rect;
use crate::page::host::Page;

/// Overlay state of one label: whether its nodes are painted and shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub rendered: bool,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct LabelEntry {
    pub label: Label,
    pub target: Target,
    pub badge: Badge,
}

/// Label -> Target for one session, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    entries: Vec<LabelEntry>,
    index: HashMap<Label, usize>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &Label) -> Option<Target> {
        self.index.get(label).map(|&i| self.entries[i].target)
    }

    pub fn find(&self, code: &str) -> Option<&LabelEntry> {
        self.index
            .get(&Label::new(code))
            .map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.entries.iter().map(|e| &e.label)
    }

    /// Labels whose badge is currently shown, in discovery order.
    pub fn visible_labels(&self) -> Vec<Label> {
        self.entries
            .iter()
            .filter(|e| e.badge.rendered && e.badge.visible)
            .map(|e| e.label.clone())
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.badge.rendered && e.badge.visible)
            .count()
    }

    fn insert(&mut self, label: Label, target: Target) {
        self.index.insert(label.clone(), self.entries.len());
        self.entries.push(LabelEntry {
            label,
            target,
            badge: Badge {
                rendered: false,
                visible: true,
            },
        });
    }

    fn entry_mut(&mut self, label: &Label) -> Option<&mut LabelEntry> {
        let i = *self.index.get(label)?;
        self.entries.get_mut(i)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

/// Assign odometer labels to `targets` in order and paint a badge for each.
///
/// Targets past [`LABEL_CAPACITY`] are left unlabeled.
pub fn allocate(
    targets: &[Target],
    page: &dyn Page,
    surface: &mut dyn OverlaySurface,
) -> LabelMap {
    if targets.len() > LABEL_CAPACITY {
        warn!(
            targets = targets.len(),
            capacity = LABEL_CAPACITY,
            "more targets than labels, the rest stay unlabeled"
        );
    }

    let mut map = LabelMap::new();
    for (label, target) in LabelSequence::new().zip(targets.iter().copied()) {
        map.insert(label.clone(), target);
        render(&mut map, page, surface, &label);
    }

    debug!(labels = map.len(), "allocated labels");
    map
}

/// Paint marker and outline for `label` at its target's current rect.
///
/// A detached target is skipped; the label stays allocated but unpainted.
pub fn render(
    map: &mut LabelMap,
    page: &dyn Page,
    surface: &mut dyn OverlaySurface,
    label: &Label,
) {
    let Some(entry) = map.entry_mut(label) else {
        return;
    };
    let Some(client) = page.client_rect(entry.target.id) else {
        warn!(%label, element = %entry.target.id, "target detached, not rendering badge");
        entry.badge.rendered = false;
        return;
    };

    let vp = page.viewport();
    let marker = marker_rect(client, &vp).translate(vp.scroll_x, vp.scroll_y);
    let outline = client.translate(vp.scroll_x, vp.scroll_y);

    surface.append(OverlayNode::marker(label, marker));
    surface.append(OverlayNode::outline(label, outline));
    entry.badge.rendered = true;

    if !entry.badge.visible {
        surface.set_display_class(&label_class(label), false);
    }
}

/// Remove and re-render one badge, keeping its shown/hidden state.
pub fn reposition(
    map: &mut LabelMap,
    page: &dyn Page,
    surface: &mut dyn OverlaySurface,
    label: &Label,
) {
    if map.get(label).is_none() {
        return;
    }
    surface.remove_class(&label_class(label));
    render(map, page, surface, label);
}

pub fn reposition_all(map: &mut LabelMap, page: &dyn Page, surface: &mut dyn OverlaySurface) {
    let labels: Vec<Label> = map.labels().cloned().collect();
    for label in &labels {
        reposition(map, page, surface, label);
    }
}

/// Remove one badge from the page; the label itself stays in the map.
pub fn remove(map: &mut LabelMap, surface: &mut dyn OverlaySurface, label: &Label) {
    surface.remove_class(&label_class(label));
    if let Some(entry) = map.entry_mut(label) {
        entry.badge.rendered = false;
    }
}

/// Wipe every overlay node and drop the session's labels.
pub fn remove_all(map: &mut LabelMap, surface: &mut dyn OverlaySurface) {
    let removed = surface.remove_class(OVERLAY_CLASS);
    debug!(removed, "removed overlay nodes");
    map.clear();
}

/// Recompute every badge's visibility from scratch; returns how many are shown.
pub fn apply_visibility<F>(map: &mut LabelMap, surface: &mut dyn OverlaySurface, mut keep: F) -> usize
where
    F: FnMut(&LabelEntry) -> bool,
{
    let mut shown = 0;
    for entry in map.entries.iter_mut() {
        let visible = keep(entry);
        entry.badge.visible = visible;
        if entry.badge.rendered {
            surface.set_display_class(&label_class(&entry.label), visible);
            if visible {
                shown += 1;
            }
        }
    }
    shown
}
