use super::GestureLimits;
use crate::geometry::{Geometry, Point, Size, clamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::Top,
        ResizeEdge::Bottom,
        ResizeEdge::Left,
        ResizeEdge::Right,
        ResizeEdge::TopLeft,
        ResizeEdge::TopRight,
        ResizeEdge::BottomLeft,
        ResizeEdge::BottomRight,
    ];

    /// Parse a compass direction (`n`, `se`, ...).
    pub fn from_compass(direction: &str) -> Option<Self> {
        Some(match direction {
            "n" => ResizeEdge::Top,
            "s" => ResizeEdge::Bottom,
            "w" => ResizeEdge::Left,
            "e" => ResizeEdge::Right,
            "nw" => ResizeEdge::TopLeft,
            "ne" => ResizeEdge::TopRight,
            "sw" => ResizeEdge::BottomLeft,
            "se" => ResizeEdge::BottomRight,
            _ => return None,
        })
    }

    pub fn compass(self) -> &'static str {
        match self {
            ResizeEdge::Top => "n",
            ResizeEdge::Bottom => "s",
            ResizeEdge::Left => "w",
            ResizeEdge::Right => "e",
            ResizeEdge::TopLeft => "nw",
            ResizeEdge::TopRight => "ne",
            ResizeEdge::BottomLeft => "sw",
            ResizeEdge::BottomRight => "se",
        }
    }

    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }
}

/// Resize snapshot taken when the pointer grabbed a resize affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDrag {
    pub edge: ResizeEdge,
    pub mouse_start: Point,
    pub start: Geometry,
    pub last_valid: Geometry,
}

impl ResizeDrag {
    pub fn new(edge: ResizeEdge, mouse_start: Point, start: Geometry) -> Self {
        Self {
            edge,
            mouse_start,
            start,
            last_valid: start,
        }
    }

    pub fn update(&mut self, pointer: Point, limits: &GestureLimits) -> Geometry {
        let delta = pointer.delta_from(self.mouse_start);
        self.last_valid = apply_resize_drag(self.start, self.edge, delta, limits);
        self.last_valid
    }
}

/// Resize `start` by the pointer `delta` for the given edge.
///
/// Edges that move the origin (`Left`, `Top`) invert the delta so the opposite
/// edge stays fixed. Sizes clamp to the limits' constraints and to the room
/// between the fixed edge and the container.
pub fn apply_resize_drag(
    start: Geometry,
    edge: ResizeEdge,
    delta: Point,
    limits: &GestureLimits,
) -> Geometry {
    let min = limits.constraints.min;
    let max = limits.constraints.max;
    let margin = limits.margin;
    let top_limit = limits.top_limit();
    let Geometry {
        position: Point { x, y },
        size: Size { width, height },
    } = start;

    let mut next = start;

    if edge.moves_right() {
        // A window already inside the margin keeps its width as the cap.
        let room = (limits.bounds.width - x - margin).max(width);
        next.size.width = clamp(width + delta.x, min.width, max.width.min(room));
    } else if edge.moves_left() {
        // Bound the origin move so the right edge never travels. An origin
        // already inside the margin only moves when the window shrinks.
        let right = x + width;
        let hi = width - min.width;
        let lo = (margin - x).min(0).max(width - max.width).min(hi);
        let dx = clamp(delta.x, lo, hi);
        next.size.width = width - dx;
        next.position.x = right - next.size.width;
    }

    if edge.moves_bottom() {
        let room = (limits.bounds.height - y - margin).max(height);
        next.size.height = clamp(height + delta.y, min.height, max.height.min(room));
    } else if edge.moves_top() {
        let bottom = y + height;
        let hi = height - min.height;
        let lo = (top_limit - y).min(0).max(height - max.height).min(hi);
        let dy = clamp(delta.y, lo, hi);
        next.size.height = height - dy;
        next.position.y = bottom - next.size.height;
    }

    next
}
