//! Pointer gesture state machine for a single window.
//!
//! The engine only does geometry. It never touches the registry: the surface
//! feeds it pointer positions, draws whatever [`LiveGeometry`] it reports, and
//! applies the [`GestureCommit`] returned on release.

pub mod drag;
pub mod resize;

pub use drag::{HeaderDrag, clamp_drag_position, snap_zone};
pub use resize::{ResizeDrag, ResizeEdge, apply_resize_drag};

use crate::config::DesktopConfig;
use crate::geometry::{Bounds, Geometry, Point, Side, SizeConstraints};
use crate::window::Window;

/// Container-derived limits a gesture is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureLimits {
    pub bounds: Bounds,
    pub margin: i32,
    pub header_height: i32,
    pub snap_threshold: i32,
    pub constraints: SizeConstraints,
}

impl GestureLimits {
    pub fn new(config: &DesktopConfig, bounds: Bounds, constraints: SizeConstraints) -> Self {
        Self {
            bounds,
            margin: config.drag_margin,
            header_height: config.header_height,
            snap_threshold: config.snap_threshold,
            constraints,
        }
    }

    /// Smallest y a window's top edge may reach while dragging or resizing.
    pub fn top_limit(&self) -> i32 {
        self.header_height + self.margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging(HeaderDrag),
    Resizing(ResizeDrag),
}

/// Geometry reported back to the surface while a gesture is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveGeometry {
    pub geometry: Geometry,
    pub snap: Option<Side>,
}

/// What a finished gesture asks the registry to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureCommit {
    Move(Point),
    Snap(Side),
    Resize(Geometry),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEngine {
    state: GestureState,
    live: Option<LiveGeometry>,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureEngine {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
            live: None,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, GestureState::Resizing(_))
    }

    /// Last live geometry, present only after the pointer actually moved.
    pub fn live(&self) -> Option<LiveGeometry> {
        self.live
    }

    pub fn begin_drag(&mut self, window: &Window, maximized: bool, pointer: Point) -> bool {
        if self.is_active() || window.fixed_size || maximized {
            return false;
        }
        tracing::debug!(key = %window.key, x = pointer.x, y = pointer.y, "drag started");
        self.state = GestureState::Dragging(HeaderDrag::new(pointer, window.position, window.size));
        self.live = None;
        true
    }

    pub fn begin_resize(
        &mut self,
        window: &Window,
        maximized: bool,
        edge: ResizeEdge,
        pointer: Point,
    ) -> bool {
        if self.is_active()
            || window.fixed_size
            || window.minimal
            || window.minimized
            || maximized
        {
            return false;
        }
        tracing::debug!(key = %window.key, edge = edge.compass(), "resize started");
        self.state = GestureState::Resizing(ResizeDrag::new(edge, pointer, window.geometry()));
        self.live = None;
        true
    }

    /// Feed a pointer position. Without limits (container gone) the gesture
    /// is discarded.
    pub fn pointer_move(
        &mut self,
        pointer: Point,
        limits: Option<&GestureLimits>,
    ) -> Option<LiveGeometry> {
        let Some(limits) = limits else {
            self.cancel();
            return None;
        };
        let live = match &mut self.state {
            GestureState::Idle => return None,
            GestureState::Dragging(drag) => {
                let position = drag.update(pointer, limits);
                LiveGeometry {
                    geometry: Geometry::new(position, drag.size),
                    snap: drag.snap,
                }
            }
            GestureState::Resizing(resize) => LiveGeometry {
                geometry: resize.update(pointer, limits),
                snap: None,
            },
        };
        tracing::trace!(
            x = live.geometry.position.x,
            y = live.geometry.position.y,
            width = live.geometry.size.width,
            height = live.geometry.size.height,
            snap = ?live.snap,
            "gesture moved"
        );
        self.live = Some(live);
        Some(live)
    }

    /// End the gesture. A press that never moved commits nothing.
    pub fn release(&mut self, limits: Option<&GestureLimits>) -> Option<GestureCommit> {
        let state = std::mem::replace(&mut self.state, GestureState::Idle);
        let live = self.live.take();
        if limits.is_none() {
            tracing::debug!("gesture discarded; container unavailable");
            return None;
        }
        if live.is_none() {
            return None;
        }
        let commit = match state {
            GestureState::Idle => return None,
            GestureState::Dragging(drag) => match drag.snap {
                Some(side) => GestureCommit::Snap(side),
                None => GestureCommit::Move(drag.last_valid),
            },
            GestureState::Resizing(resize) => GestureCommit::Resize(resize.last_valid),
        };
        tracing::debug!(?commit, "gesture committed");
        Some(commit)
    }

    pub fn cancel(&mut self) {
        if self.is_active() {
            tracing::debug!("gesture cancelled");
        }
        self.state = GestureState::Idle;
        self.live = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Size, half_split_rect};
    use crate::window::{OpenRequest, WindowRegistry};

    fn registry() -> WindowRegistry {
        WindowRegistry::with_bounds(DesktopConfig::default(), Bounds::new(1200, 800))
    }

    fn limits_for(reg: &WindowRegistry, key: &str) -> GestureLimits {
        let window = reg.get(key).expect("window open");
        GestureLimits::new(
            reg.config(),
            reg.bounds().expect("bounds"),
            reg.effective_constraints(window),
        )
    }

    #[test]
    fn east_resize_below_minimum_commits_minimum_width() {
        let mut reg = registry();
        reg.open(OpenRequest::new("w", "/w").size(Size::new(500, 400)));
        let window = reg.get("w").expect("open").clone();
        let limits = limits_for(&reg, "w");
        let mut engine = GestureEngine::new();
        let grab = Point::new(window.geometry().right(), 300);
        assert!(engine.begin_resize(&window, false, ResizeEdge::Right, grab));
        let live = engine
            .pointer_move(grab.offset(-200, 0), Some(&limits))
            .expect("live");
        assert_eq!(live.geometry.size.width, 350);
        let commit = engine.release(Some(&limits));
        assert_eq!(
            commit,
            Some(GestureCommit::Resize(Geometry::new(
                window.position,
                Size::new(350, 400)
            )))
        );
        assert!(!engine.is_active());
    }

    #[test]
    fn drag_past_snap_threshold_commits_left_half() {
        let mut reg = registry();
        reg.open(OpenRequest::new("w", "/w"));
        let window = reg.get("w").expect("open").clone();
        let limits = limits_for(&reg, "w");
        let mut engine = GestureEngine::new();
        let grab = Point::new(window.position.x + 20, window.position.y + 10);
        assert!(engine.begin_drag(&window, false, grab));
        let dx = -80 - window.position.x;
        let live = engine
            .pointer_move(grab.offset(dx, 0), Some(&limits))
            .expect("live");
        assert_eq!(live.snap, Some(Side::Left));
        assert_eq!(live.geometry.position.x, 8);

        let Some(GestureCommit::Snap(side)) = engine.release(Some(&limits)) else {
            panic!("expected snap commit");
        };
        reg.snap_to_side("w", side);
        let bounds = Bounds::new(1200, 800);
        assert_eq!(
            reg.get("w").map(|w| w.geometry()),
            Some(half_split_rect(Side::Left, bounds, 0))
        );
        assert_eq!(
            half_split_rect(Side::Left, bounds, 0),
            Geometry::new(Point::new(0, 0), Size::new(600, 800))
        );
    }

    #[test]
    fn drag_without_snap_commits_clamped_position() {
        let mut reg = registry();
        reg.open(OpenRequest::new("w", "/w"));
        let window = reg.get("w").expect("open").clone();
        let limits = limits_for(&reg, "w");
        let mut engine = GestureEngine::new();
        assert!(engine.begin_drag(&window, false, Point::new(300, 160)));
        engine.pointer_move(Point::new(300, 0), Some(&limits));
        assert_eq!(
            engine.release(Some(&limits)),
            Some(GestureCommit::Move(Point::new(250, 46)))
        );
    }

    #[test]
    fn gestures_are_mutually_exclusive() {
        let mut reg = registry();
        reg.open(OpenRequest::new("w", "/w"));
        let window = reg.get("w").expect("open").clone();
        let mut engine = GestureEngine::new();
        assert!(engine.begin_drag(&window, false, Point::new(300, 160)));
        assert!(!engine.begin_resize(&window, false, ResizeEdge::Left, Point::new(250, 300)));
        assert!(!engine.begin_drag(&window, false, Point::new(300, 160)));
        assert!(engine.is_dragging());
    }

    #[test]
    fn restricted_windows_refuse_gestures() {
        let mut reg = registry();
        reg.open(OpenRequest::new("fixed", "/f").fixed_size(true));
        reg.open(OpenRequest::new("mini", "/m").minimal(true));
        let fixed = reg.get("fixed").expect("open").clone();
        let mini = reg.get("mini").expect("open").clone();
        let mut engine = GestureEngine::new();
        assert!(!engine.begin_drag(&fixed, false, Point::new(0, 0)));
        assert!(!engine.begin_resize(&fixed, false, ResizeEdge::Bottom, Point::new(0, 0)));
        assert!(!engine.begin_resize(&mini, false, ResizeEdge::Bottom, Point::new(0, 0)));
        assert!(!engine.begin_drag(&mini, true, Point::new(0, 0)));
        assert!(engine.begin_drag(&mini, false, Point::new(0, 0)));
    }

    #[test]
    fn missing_container_discards_gesture() {
        let mut reg = registry();
        reg.open(OpenRequest::new("w", "/w"));
        let window = reg.get("w").expect("open").clone();
        let limits = limits_for(&reg, "w");
        let mut engine = GestureEngine::new();
        engine.begin_drag(&window, false, Point::new(300, 160));
        engine.pointer_move(Point::new(320, 180), Some(&limits));
        assert_eq!(engine.pointer_move(Point::new(330, 190), None), None);
        assert!(!engine.is_active());

        engine.begin_drag(&window, false, Point::new(300, 160));
        engine.pointer_move(Point::new(320, 180), Some(&limits));
        assert_eq!(engine.release(None), None);
        assert!(engine.live().is_none());
    }

    #[test]
    fn click_without_movement_commits_nothing() {
        let mut reg = registry();
        reg.open(OpenRequest::new("w", "/w"));
        let window = reg.get("w").expect("open").clone();
        let limits = limits_for(&reg, "w");
        let mut engine = GestureEngine::new();
        engine.begin_drag(&window, false, Point::new(300, 160));
        assert_eq!(engine.release(Some(&limits)), None);
        assert!(!engine.is_active());
    }
}
