use super::GestureLimits;
use crate::geometry::{Point, Side, Size, clamp};

/// Move snapshot taken when the pointer grabbed a window header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDrag {
    pub mouse_start: Point,
    pub position_start: Point,
    pub size: Size,
    pub last_valid: Point,
    pub snap: Option<Side>,
}

impl HeaderDrag {
    pub fn new(mouse_start: Point, position_start: Point, size: Size) -> Self {
        Self {
            mouse_start,
            position_start,
            size,
            last_valid: position_start,
            snap: None,
        }
    }

    /// Position the window would take if nothing clamped it.
    pub fn raw_candidate(&self, pointer: Point) -> Point {
        let delta = pointer.delta_from(self.mouse_start);
        self.position_start.offset(delta.x, delta.y)
    }

    pub fn update(&mut self, pointer: Point, limits: &GestureLimits) -> Point {
        let raw = self.raw_candidate(pointer);
        self.snap = snap_zone(raw.x, self.size.width, limits);
        self.last_valid = clamp_drag_position(raw, self.size, limits);
        self.last_valid
    }
}

/// Clamp a dragged position to the live drag area.
///
/// The top edge may not enter the reserved header strip.
pub fn clamp_drag_position(raw: Point, size: Size, limits: &GestureLimits) -> Point {
    let margin = limits.margin;
    Point {
        x: clamp(raw.x, margin, limits.bounds.width - size.width - margin),
        y: clamp(
            raw.y,
            limits.top_limit(),
            limits.bounds.height - size.height - margin,
        ),
    }
}

/// Snap side for a raw left edge `x`, measured against the window edge.
pub fn snap_zone(x: i32, width: i32, limits: &GestureLimits) -> Option<Side> {
    let threshold = limits.snap_threshold;
    if x < threshold {
        Some(Side::Left)
    } else if x > limits.bounds.width - width - threshold {
        Some(Side::Right)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Bounds, SizeConstraints};

    fn limits() -> GestureLimits {
        GestureLimits {
            bounds: Bounds::new(1200, 800),
            margin: 8,
            header_height: 38,
            snap_threshold: -50,
            constraints: SizeConstraints::new(Size::new(350, 250), Size::new(2000, 2000)),
        }
    }

    #[test]
    fn drag_clamps_below_header_and_inside_margin() {
        let mut drag = HeaderDrag::new(
            Point::new(300, 60),
            Point::new(250, 150),
            Size::new(700, 500),
        );
        let p = drag.update(Point::new(-1000, -1000), &limits());
        assert_eq!(p, Point::new(8, 46));
        let p = drag.update(Point::new(5000, 5000), &limits());
        assert_eq!(p, Point::new(492, 292));
    }

    #[test]
    fn snap_zone_uses_window_edge() {
        let l = limits();
        assert_eq!(snap_zone(-51, 700, &l), Some(Side::Left));
        assert_eq!(snap_zone(-50, 700, &l), None);
        assert_eq!(snap_zone(0, 700, &l), None);
        assert_eq!(snap_zone(550, 700, &l), None);
        assert_eq!(snap_zone(551, 700, &l), Some(Side::Right));
    }

    #[test]
    fn snap_follows_raw_candidate_not_clamped_position() {
        let mut drag = HeaderDrag::new(
            Point::new(300, 200),
            Point::new(100, 150),
            Size::new(500, 400),
        );
        let p = drag.update(Point::new(120, 200), &limits());
        assert_eq!(drag.raw_candidate(Point::new(120, 200)).x, -80);
        assert_eq!(p.x, 8);
        assert_eq!(drag.snap, Some(Side::Left));

        drag.update(Point::new(260, 200), &limits());
        assert_eq!(drag.snap, None);
    }
}
