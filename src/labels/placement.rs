use crate::page::page_model::{Rect, Viewport};

pub const MARKER_WIDTH: f64 = 50.0;
pub const MARKER_HEIGHT: f64 = 30.0;
/// How far the marker sits left of the target's left edge.
pub const MARKER_OFFSET: f64 = 20.0;

/// Client-space box for the marker of a target at `target`.
///
/// Lower-left by default; lower-right when the left edge would overflow;
/// above the target when the bottom edge would overflow.
pub fn marker_rect(target: Rect, viewport: &Viewport) -> Rect {
    let mut left = target.left - MARKER_OFFSET;
    if left < 0.0 {
        left = target.right() - MARKER_WIDTH;
    }

    let mut top = target.bottom();
    if top + MARKER_HEIGHT > viewport.height {
        top = target.top - MARKER_HEIGHT;
    }

    let max_left = (viewport.width - MARKER_WIDTH).max(0.0);
    let max_top = (viewport.height - MARKER_HEIGHT).max(0.0);

    Rect::new(
        left.clamp(0.0, max_left),
        top.clamp(0.0, max_top),
        MARKER_WIDTH,
        MARKER_HEIGHT,
    )
}
