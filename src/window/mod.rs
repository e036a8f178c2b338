pub mod decorator;
pub mod history;
pub mod registry;
pub mod surface;

use std::borrow::Borrow;
use std::fmt;

use crate::geometry::{Geometry, Point, Size, SizeConstraints};

pub use history::NavHistory;
pub use registry::{OpenOutcome, WindowRegistry};
pub use surface::{SurfaceSignal, WindowSurface};

/// Stable identity of an open window.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowKey(String);

impl WindowKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for WindowKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WindowKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One level of remembered geometry used by restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryMemo {
    pub size: Size,
    pub position: Point,
}

impl GeometryMemo {
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.position, self.size)
    }
}

/// Where a surface last laid its window out, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceHandle {
    pub area: Geometry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub key: WindowKey,
    pub route: String,
    pub title: Option<String>,
    pub position: Point,
    pub size: Size,
    pub memo: Option<GeometryMemo>,
    pub z_index: u32,
    pub minimized: bool,
    pub fixed_size: bool,
    pub minimal: bool,
    pub size_constraints: SizeConstraints,
    pub from_history: bool,
    pub surface: Option<SurfaceHandle>,
}

impl Window {
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.position, self.size)
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("untitled")
    }

    /// Area used for hit testing: the surface's last layout, or the committed
    /// geometry when no surface has registered yet.
    pub fn hit_area(&self) -> Geometry {
        self.surface
            .map(|handle| handle.area)
            .unwrap_or_else(|| self.geometry())
    }
}

/// Request to open (or re-focus) a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub key: WindowKey,
    pub route: String,
    pub title: Option<String>,
    pub size: Option<Size>,
    pub position: Option<Point>,
    pub fixed_size: bool,
    pub minimal: bool,
    pub size_constraints: Option<SizeConstraints>,
}

impl OpenRequest {
    pub fn new(key: impl Into<WindowKey>, route: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            route: route.into(),
            title: None,
            size: None,
            position: None,
            fixed_size: false,
            minimal: false,
            size_constraints: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn fixed_size(mut self, fixed: bool) -> Self {
        self.fixed_size = fixed;
        self
    }

    pub fn minimal(mut self, minimal: bool) -> Self {
        self.minimal = minimal;
        self
    }

    pub fn size_constraints(mut self, constraints: SizeConstraints) -> Self {
        self.size_constraints = Some(constraints);
        self
    }
}

/// Partial update merged into a window by `WindowRegistry::update`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowPatch {
    pub route: Option<String>,
    pub title: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub previous_position: Option<Point>,
    pub previous_size: Option<Size>,
    pub minimized: Option<bool>,
    pub from_history: Option<bool>,
}

impl WindowPatch {
    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            position: Some(geometry.position),
            size: Some(geometry.size),
            ..Self::default()
        }
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn route(mut self, route: impl Into<String>, from_history: bool) -> Self {
        self.route = Some(route.into());
        self.from_history = Some(from_history);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn previous(mut self, memo: GeometryMemo) -> Self {
        self.previous_position = Some(memo.position);
        self.previous_size = Some(memo.size);
        self
    }

    pub fn touches_geometry(&self) -> bool {
        self.position.is_some() || self.size.is_some()
    }
}
