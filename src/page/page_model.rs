use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of an element in document order (`body *`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned rectangle in CSS pixels, edges as `getBoundingClientRect` reports them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }

    /// All four edges lie within `[0, width] x [0, height]`.
    pub fn is_within(&self, width: f64, height: f64) -> bool {
        self.left >= 0.0 && self.top >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

/// Visible area of the page plus its current scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub scroll_x: f64,
    #[serde(default)]
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

/// One element as extracted from the host page.
///
/// `rect` is in document coordinates; the client rect is derived from it and
/// the current scroll offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageElement {
    pub tag: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rect: Rect,
    /// Computed `cursor` style
    #[serde(default)]
    pub cursor: Option<String>,
    /// Computed `display` style
    #[serde(default)]
    pub display: Option<String>,
    /// Computed `visibility` style
    #[serde(default)]
    pub visibility: Option<String>,
    /// Result of `element.checkVisibility()`
    #[serde(rename = "checkVisibility", default = "default_true")]
    pub check_visibility: bool,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(rename = "contentEditable", default)]
    pub content_editable: bool,
}

impl PageElement {
    pub fn new(tag: &str, text: &str, rect: Rect) -> Self {
        Self {
            tag: tag.to_string(),
            text: text.to_string(),
            rect,
            cursor: None,
            display: None,
            visibility: None,
            check_visibility: true,
            href: None,
            content_editable: false,
        }
    }

    pub fn link(text: &str, href: &str, rect: Rect) -> Self {
        Self {
            href: Some(href.to_string()),
            ..Self::new("a", text, rect)
        }
    }

    pub fn with_cursor(mut self, cursor: &str) -> Self {
        self.cursor = Some(cursor.to_string());
        self
    }

    pub fn with_display(mut self, display: &str) -> Self {
        self.display = Some(display.to_string());
        self
    }

    pub fn with_visibility(mut self, visibility: &str) -> Self {
        self.visibility = Some(visibility.to_string());
        self
    }

    pub fn hidden_by_browser(mut self) -> Self {
        self.check_visibility = false;
        self
    }

    /// Text inputs and content-editable nodes swallow keystrokes.
    pub fn is_editable(&self) -> bool {
        let tag = self.tag.to_ascii_lowercase();
        self.content_editable || tag == "input" || tag == "textarea"
    }
}

/// Serialized page, as produced by a DOM extraction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub elements: Vec<PageElement>,
    /// Index of the focused element, if any
    #[serde(default)]
    pub focused: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    SameTab,
    NewTab,
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenMode::SameTab => write!(f, "same-tab"),
            OpenMode::NewTab => write!(f, "new-tab"),
        }
    }
}

/// A click performed on behalf of the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activation {
    pub element: ElementId,
    pub mode: OpenMode,
    pub href: Option<String>,
}

fn default_true() -> bool {
    true
}
