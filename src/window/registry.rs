use std::sync::Arc;

use super::{GeometryMemo, OpenRequest, SurfaceHandle, Window, WindowKey, WindowPatch};
use crate::config::DesktopConfig;
use crate::geometry::{
    Bounds, Geometry, Point, Side, Size, SizeConstraints, cascade_offset, cascade_position,
    centered_position, clamp_rect_to_bounds, full_bounds_rect, half_split_rect,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Created,
    Refocused,
}

/// Authoritative collection of open windows.
///
/// Every operation is a synchronous transition over the current collection.
/// Operations that name an unknown key are ignored: UI events routinely race
/// with a window that has already been closed.
///
/// The collection lives behind an `Arc` and is replaced copy-on-write, so a
/// [`snapshot`](Self::snapshot) taken by a reader never changes underneath it.
#[derive(Debug, Clone)]
pub struct WindowRegistry {
    windows: Arc<Vec<Window>>,
    focused: Option<WindowKey>,
    bounds: Option<Bounds>,
    config: DesktopConfig,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new(DesktopConfig::default())
    }
}

impl WindowRegistry {
    pub fn new(config: DesktopConfig) -> Self {
        Self {
            windows: Arc::new(Vec::new()),
            focused: None,
            bounds: None,
            config,
        }
    }

    pub fn with_bounds(config: DesktopConfig, bounds: Bounds) -> Self {
        let mut registry = Self::new(config);
        registry.bounds = Some(bounds);
        registry
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Record a new container size and re-fit every window to it.
    ///
    /// Windows that were maximized under the old bounds stay maximized.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        if self.bounds == Some(bounds) {
            return;
        }
        let previous = self.bounds.replace(bounds);
        if self.windows.is_empty() {
            return;
        }
        tracing::debug!(width = bounds.width, height = bounds.height, "container resized");
        let was_full = previous.map(|old| full_bounds_rect(old, 0));
        let tolerance = self.config.maximize_tolerance;
        let refit: Vec<(Size, Point)> = self
            .windows
            .iter()
            .map(|w| {
                if was_full.is_some_and(|full| w.geometry().approx_eq(&full, tolerance)) {
                    let full = full_bounds_rect(bounds, 0);
                    self.fit(w, full.size, full.position)
                } else {
                    self.fit(w, w.size, w.position)
                }
            })
            .collect();
        let windows = Arc::make_mut(&mut self.windows);
        for (window, (size, position)) in windows.iter_mut().zip(refit) {
            window.size = size;
            window.position = position;
        }
    }

    /// Cheap shared view of the current collection.
    pub fn snapshot(&self) -> Arc<Vec<Window>> {
        Arc::clone(&self.windows)
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Window> {
        self.windows.iter().find(|w| w.key.as_str() == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn focused_key(&self) -> Option<&WindowKey> {
        self.focused.as_ref()
    }

    pub fn focused(&self) -> Option<&Window> {
        self.focused.as_ref().and_then(|key| self.get(key.as_str()))
    }

    pub fn is_focused(&self, key: &str) -> bool {
        self.focused.as_ref().is_some_and(|k| k.as_str() == key)
    }

    /// Windows ordered bottom to top.
    pub fn stacking_order(&self) -> Vec<&Window> {
        let mut order: Vec<&Window> = self.windows.iter().collect();
        order.sort_by_key(|w| w.z_index);
        order
    }

    /// Topmost visible window whose surface covers `point`.
    pub fn topmost_at(&self, point: Point) -> Option<&Window> {
        self.windows
            .iter()
            .filter(|w| !w.minimized && w.hit_area().contains(point))
            .max_by_key(|w| w.z_index)
    }

    /// Size constraints after narrowing them to the current container.
    pub fn effective_constraints(&self, window: &Window) -> SizeConstraints {
        self.config
            .effective_constraints(window.size_constraints, self.bounds)
    }

    pub fn open(&mut self, request: OpenRequest) -> OpenOutcome {
        if self.contains(request.key.as_str()) {
            tracing::debug!(key = %request.key, "window already open; refocusing");
            self.bring_to_front(request.key.as_str());
            return OpenOutcome::Refocused;
        }

        let inset = self.config.inset;
        let constraints = request
            .size_constraints
            .unwrap_or(self.config.size_constraints);
        let mut window = Window {
            key: request.key,
            route: request.route,
            title: request.title,
            position: Point::new(inset, inset),
            size: request.size.unwrap_or(self.config.default_size),
            memo: None,
            z_index: self.windows.len() as u32 + 1,
            minimized: false,
            fixed_size: request.fixed_size,
            minimal: request.minimal,
            size_constraints: constraints,
            from_history: false,
            surface: None,
        };
        let (size, _) = self.fit(&window, window.size, window.position);
        let position = match (request.position, self.bounds) {
            (Some(position), _) => position,
            (None, Some(bounds)) => match self.stacking_order().last() {
                Some(anchor) => {
                    cascade_position(anchor.position, size, bounds, inset, self.config.cascade_step)
                }
                None => centered_position(size, bounds, inset),
            },
            (None, None) => Point::new(inset, inset),
        };
        let (size, position) = self.fit(&window, size, position);
        window.size = size;
        window.position = position;
        window.memo = Some(GeometryMemo { size, position });

        tracing::debug!(
            key = %window.key,
            route = %window.route,
            x = position.x,
            y = position.y,
            width = size.width,
            height = size.height,
            z = window.z_index,
            "opened window"
        );
        self.focused = Some(window.key.clone());
        Arc::make_mut(&mut self.windows).push(window);
        OpenOutcome::Created
    }

    /// Open the search window, sized for the current container.
    pub fn open_search(&mut self, filter: Option<&str>) -> OpenOutcome {
        let route = match filter {
            Some(filter) if !filter.is_empty() => format!("/search?q={filter}"),
            _ => "/search".to_string(),
        };
        let mut request = OpenRequest::new("search", route).title("Search");
        let default = self.config.default_size;
        match self.bounds {
            Some(bounds) if self.config.is_mobile(bounds) => {
                let size = Size::new(bounds.width * 9 / 10, default.height * 16 / 25);
                request = request
                    .size(size)
                    .position(Point::new((bounds.width - size.width) / 2, self.config.inset));
            }
            _ => {
                request = request
                    .size(Size::new(default.width * 6 / 7, default.height * 4 / 5))
                    .position(cascade_offset(10, self.config.cascade_step));
            }
        }
        self.open(request)
    }

    pub fn close(&mut self, key: &str) {
        let Some(index) = self.index_of(key) else {
            tracing::trace!(key, "close ignored for unknown window");
            return;
        };
        let windows = Arc::make_mut(&mut self.windows);
        let removed = windows.remove(index);
        for window in windows.iter_mut() {
            if window.z_index > removed.z_index {
                window.z_index -= 1;
            }
        }
        if self.is_focused(key) {
            self.focused = self
                .windows
                .iter()
                .max_by_key(|w| w.z_index)
                .map(|w| w.key.clone());
        }
        tracing::debug!(key, focus = ?self.focused, "closed window");
    }

    pub fn close_all(&mut self) {
        tracing::debug!(count = self.windows.len(), "closing all windows");
        Arc::make_mut(&mut self.windows).clear();
        self.focused = None;
    }

    pub fn minimize(&mut self, key: &str) {
        let Some(index) = self.index_of(key) else {
            tracing::trace!(key, "minimize ignored for unknown window");
            return;
        };
        Arc::make_mut(&mut self.windows)[index].minimized = true;
        if self.is_focused(key) {
            self.focused = None;
        }
        tracing::debug!(key, "minimized window");
    }

    pub fn bring_to_front(&mut self, key: &str) {
        let Some(index) = self.index_of(key) else {
            tracing::trace!(key, "bring_to_front ignored for unknown window");
            return;
        };
        let count = self.windows.len() as u32;
        let old = self.windows[index].z_index;
        let windows = Arc::make_mut(&mut self.windows);
        for (i, window) in windows.iter_mut().enumerate() {
            if i == index {
                window.z_index = count;
                window.minimized = false;
            } else if window.z_index > old {
                window.z_index -= 1;
            }
        }
        self.focused = Some(windows[index].key.clone());
    }

    /// Shallow-merge `patch` into the window and return the updated record.
    ///
    /// Geometry in the patch is memoized: unless the patch carries its own
    /// previous size/position, the window's prior value is remembered first.
    /// The merged geometry is clamped to the window's constraints and the
    /// container.
    pub fn update(&mut self, key: &str, patch: WindowPatch) -> Option<Window> {
        let Some(index) = self.index_of(key) else {
            tracing::trace!(key, "update ignored for unknown window");
            return None;
        };
        let current = &self.windows[index];
        let mut memo = current.memo.unwrap_or(GeometryMemo {
            size: current.size,
            position: current.position,
        });
        if patch.size.is_some() {
            memo.size = patch.previous_size.unwrap_or(current.size);
        } else if let Some(size) = patch.previous_size {
            memo.size = size;
        }
        if patch.position.is_some() {
            memo.position = patch.previous_position.unwrap_or(current.position);
        } else if let Some(position) = patch.previous_position {
            memo.position = position;
        }
        let touches_memo = patch.touches_geometry()
            || patch.previous_size.is_some()
            || patch.previous_position.is_some();
        let (size, position) = if patch.touches_geometry() {
            self.fit(
                current,
                patch.size.unwrap_or(current.size),
                patch.position.unwrap_or(current.position),
            )
        } else {
            (current.size, current.position)
        };

        let window = &mut Arc::make_mut(&mut self.windows)[index];
        if let Some(route) = patch.route {
            window.route = route;
        }
        if let Some(title) = patch.title {
            window.title = Some(title);
        }
        if let Some(minimized) = patch.minimized {
            window.minimized = minimized;
        }
        if let Some(from_history) = patch.from_history {
            window.from_history = from_history;
        }
        if touches_memo {
            window.memo = Some(memo);
        }
        window.size = size;
        window.position = position;
        Some(window.clone())
    }

    pub fn attach_surface(&mut self, key: &str, handle: SurfaceHandle) {
        let Some(index) = self.index_of(key) else {
            return;
        };
        if self.windows[index].surface == Some(handle) {
            return;
        }
        Arc::make_mut(&mut self.windows)[index].surface = Some(handle);
    }

    /// Full-container rectangle a maximized window occupies.
    pub fn maximized_geometry(&self) -> Option<Geometry> {
        self.bounds.map(|bounds| full_bounds_rect(bounds, 0))
    }

    /// Derived: a window is maximized when it covers the container within the
    /// configured tolerance.
    pub fn is_maximized(&self, key: &str) -> bool {
        match (self.get(key), self.maximized_geometry()) {
            (Some(window), Some(full)) => window
                .geometry()
                .approx_eq(&full, self.config.maximize_tolerance),
            _ => false,
        }
    }

    pub fn maximize(&mut self, key: &str) {
        let Some(full) = self.maximized_geometry() else {
            return;
        };
        tracing::debug!(key, "maximizing window");
        self.update(key, WindowPatch::geometry(full));
    }

    pub fn restore(&mut self, key: &str) {
        let (Some(window), Some(bounds)) = (self.get(key), self.bounds) else {
            return;
        };
        let inset = self.config.inset;
        let tolerance = self.config.maximize_tolerance;
        let full = full_bounds_rect(bounds, 0);
        let memo = window
            .memo
            .map(|memo| memo.geometry())
            .filter(|memo| !memo.approx_eq(&full, tolerance));
        let target = match memo {
            Some(memo) if self.config.is_mobile(bounds) && memo.size.width >= bounds.width - 10 => {
                let size = Size::new(
                    (bounds.width as f64 * 0.85) as i32,
                    (bounds.height as f64 * 0.7) as i32,
                );
                Geometry::new(centered_position(size, bounds, inset), size)
            }
            Some(memo) => memo,
            None => {
                let size = self.effective_constraints(window).min;
                Geometry::new(centered_position(size, bounds, inset), size)
            }
        };
        tracing::debug!(key, "restoring window");
        self.update(key, WindowPatch::geometry(target));
    }

    pub fn toggle_maximize(&mut self, key: &str) {
        if self.is_maximized(key) {
            self.restore(key);
        } else {
            self.maximize(key);
        }
    }

    pub fn snap_to_side(&mut self, key: &str, side: Side) {
        let Some(bounds) = self.bounds else {
            return;
        };
        tracing::debug!(key, %side, "snapping window");
        let rect = half_split_rect(side, bounds, self.config.inset);
        self.update(key, WindowPatch::geometry(rect));
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.windows.iter().position(|w| w.key.as_str() == key)
    }

    // Clamp size to constraints and the container, then keep the rectangle
    // inside the container.
    fn fit(&self, window: &Window, size: Size, position: Point) -> (Size, Point) {
        let constraints = self.effective_constraints(window);
        let mut size = constraints.clamp(size);
        let Some(bounds) = self.bounds else {
            return (size, position);
        };
        let inset = self.config.inset;
        size = size.min(bounds.available(inset));
        let position = clamp_rect_to_bounds(position, size, bounds, inset);
        (size, position)
    }
}
