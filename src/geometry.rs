//! Pure geometry helpers shared by the registry and the gesture engine.
//!
//! All coordinates are logical units relative to the constraints container's
//! origin. The container itself is described by [`Bounds`], which carries only
//! a size because its origin is always `(0, 0)` in this coordinate space.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Component-wise difference `self - origin`.
    pub fn delta_from(self, origin: Point) -> Point {
        Point {
            x: self.x.saturating_sub(origin.x),
            y: self.y.saturating_sub(origin.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Component-wise minimum.
    pub fn min(self, other: Size) -> Size {
        Size {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
        }
    }

    pub fn fits_within(self, other: Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Size of the constraints container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Space left once `inset` is removed from every edge.
    pub fn available(&self, inset: i32) -> Size {
        Size {
            width: (self.width - inset * 2).max(0),
            height: (self.height - inset * 2).max(0),
        }
    }
}

/// Position plus size of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Geometry {
    pub position: Point,
    pub size: Size,
}

impl Geometry {
    pub const fn new(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    pub fn right(&self) -> i32 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> i32 {
        self.position.y + self.size.height
    }

    pub fn contains(&self, point: Point) -> bool {
        self.size.width > 0
            && self.size.height > 0
            && point.x >= self.position.x
            && point.x < self.right()
            && point.y >= self.position.y
            && point.y < self.bottom()
    }

    /// True when every edge of `self` lies within `tolerance` of `other`.
    pub fn approx_eq(&self, other: &Geometry, tolerance: i32) -> bool {
        (self.position.x - other.position.x).abs() <= tolerance
            && (self.position.y - other.position.y).abs() <= tolerance
            && (self.size.width - other.size.width).abs() <= tolerance
            && (self.size.height - other.size.height).abs() <= tolerance
    }

    /// True when the rectangle sits inside `bounds` keeping `inset` clear.
    pub fn is_within(&self, bounds: Bounds, inset: i32) -> bool {
        self.position.x >= inset
            && self.position.y >= inset
            && self.right() <= bounds.width - inset
            && self.bottom() <= bounds.height - inset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Per-window clamp bounds for the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeConstraints {
    pub min: Size,
    pub max: Size,
}

impl SizeConstraints {
    pub const fn new(min: Size, max: Size) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, size: Size) -> Size {
        Size {
            width: clamp(size.width, self.min.width, self.max.width),
            height: clamp(size.height, self.min.height, self.max.height),
        }
    }
}

/// Numeric clamp where the lower bound wins when `min > max`.
///
/// Callers use this to pin a window to the inset edge when the available range
/// is empty instead of panicking like `i32::clamp` would.
pub fn clamp(value: i32, min: i32, max: i32) -> i32 {
    value.min(max).max(min)
}

pub fn clamp_rect_to_bounds(position: Point, size: Size, bounds: Bounds, inset: i32) -> Point {
    Point {
        x: clamp(position.x, inset, bounds.width - size.width - inset),
        y: clamp(position.y, inset, bounds.height - size.height - inset),
    }
}

pub fn centered_position(size: Size, bounds: Bounds, inset: i32) -> Point {
    let size = size.min(bounds.available(inset));
    Point {
        x: inset.max(round_half(bounds.width - size.width)),
        y: inset.max(round_half(bounds.height - size.height)),
    }
}

pub fn cascade_offset(index: i32, step: i32) -> Point {
    Point {
        x: index * step,
        y: index * step,
    }
}

/// Place a window one cascade step away from `anchor`, or center it when the
/// cascaded rectangle would leave the bounds.
pub fn cascade_position(anchor: Point, size: Size, bounds: Bounds, inset: i32, step: i32) -> Point {
    let offset = cascade_offset(1, step);
    let candidate = Geometry::new(anchor.offset(offset.x, offset.y), size);
    if candidate.is_within(bounds, inset) {
        candidate.position
    } else {
        centered_position(size, bounds, inset)
    }
}

/// Half-screen rectangle used for snapping.
///
/// Both halves share the same width; when `bounds.width - 3 * inset` is odd the
/// leftover unit stays as extra margin on the right edge.
pub fn half_split_rect(side: Side, bounds: Bounds, inset: i32) -> Geometry {
    let half = ((bounds.width - inset * 3) / 2).max(0);
    let x = match side {
        Side::Left => inset,
        Side::Right => inset * 2 + half,
    };
    Geometry {
        position: Point { x, y: inset },
        size: Size {
            width: half,
            height: (bounds.height - inset * 2).max(0),
        },
    }
}

pub fn full_bounds_rect(bounds: Bounds, inset: i32) -> Geometry {
    Geometry {
        position: Point { x: inset, y: inset },
        size: bounds.available(inset),
    }
}

// Math.round semantics for halves of integer spans.
fn round_half(span: i32) -> i32 {
    (span as f64 / 2.0).round() as i32
}
