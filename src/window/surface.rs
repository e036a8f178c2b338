use std::time::Instant;

use super::decorator::{HeaderAction, HitZone};
use super::{NavHistory, SurfaceHandle, Window, WindowKey, WindowPatch, WindowRegistry};
use crate::geometry::{Geometry, Point, Side};
use crate::gesture::{GestureCommit, GestureEngine, GestureLimits, LiveGeometry};

/// Notifications a surface raises for the rest of the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceSignal {
    Minimized(WindowKey),
    Closed(WindowKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CloseTransition {
    remaining: u16,
}

/// On-screen counterpart of one registry window.
///
/// The surface owns the window's gesture engine and navigation history. It
/// reads committed state from the registry and only writes back when a
/// gesture ends or a chrome control is used.
#[derive(Debug)]
pub struct WindowSurface {
    key: WindowKey,
    engine: GestureEngine,
    history: NavHistory,
    closing: Option<CloseTransition>,
    mounted: bool,
    last_header_click: Option<Instant>,
}

impl WindowSurface {
    pub fn new(window: &Window) -> Self {
        Self {
            key: window.key.clone(),
            engine: GestureEngine::new(),
            history: NavHistory::new(window.route.clone()),
            closing: None,
            mounted: false,
            last_header_click: None,
        }
    }

    pub fn key(&self) -> &WindowKey {
        &self.key
    }

    pub fn history(&self) -> &NavHistory {
        &self.history
    }

    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Register where the window is drawn. The first mount inside a
    /// mobile-sized container maximizes the window.
    pub fn mount(&mut self, registry: &mut WindowRegistry, handle: SurfaceHandle) {
        registry.attach_surface(self.key.as_str(), handle);
        if self.mounted {
            return;
        }
        self.mounted = true;
        let mobile = registry
            .bounds()
            .is_some_and(|bounds| registry.config().is_mobile(bounds));
        if mobile && !registry.is_maximized(self.key.as_str()) {
            tracing::debug!(key = %self.key, "mobile container; maximizing on mount");
            registry.maximize(self.key.as_str());
        }
    }

    /// Geometry to draw: live while a gesture runs, committed otherwise.
    pub fn display_geometry(&self, window: &Window) -> Geometry {
        match self.engine.live() {
            Some(live) if self.engine.is_active() => live.geometry,
            _ => window.geometry(),
        }
    }

    /// Half the drag would snap to on release, for the preview overlay.
    pub fn snap_preview(&self) -> Option<Side> {
        if !self.engine.is_dragging() {
            return None;
        }
        self.engine.live().and_then(|live| live.snap)
    }

    pub fn is_closing(&self) -> bool {
        self.closing.is_some()
    }

    pub fn has_gesture(&self) -> bool {
        self.engine.is_active()
    }

    fn limits(&self, registry: &WindowRegistry) -> Option<GestureLimits> {
        let bounds = registry.bounds().filter(|b| !b.is_empty())?;
        let window = registry.get(self.key.as_str())?;
        Some(GestureLimits::new(
            registry.config(),
            bounds,
            registry.effective_constraints(window),
        ))
    }

    /// Pointer pressed on this window's chrome.
    pub fn pointer_down(
        &mut self,
        registry: &mut WindowRegistry,
        zone: HitZone,
        pointer: Point,
        now: Instant,
    ) -> Option<SurfaceSignal> {
        if self.closing.is_some() {
            return None;
        }
        let key = self.key.clone();
        let window = registry.get(key.as_str())?.clone();
        let maximized = registry.is_maximized(key.as_str());
        match zone {
            HitZone::Header(HeaderAction::Close) => {
                self.last_header_click = None;
                self.request_close(registry);
            }
            HitZone::Header(HeaderAction::Minimize) => {
                self.last_header_click = None;
                return Some(self.minimize(registry));
            }
            HitZone::Header(HeaderAction::Maximize) => {
                self.last_header_click = None;
                if !window.fixed_size {
                    self.toggle_maximize(registry);
                }
            }
            HitZone::Header(HeaderAction::Back) => {
                self.go_back(registry);
            }
            HitZone::Header(HeaderAction::Forward) => {
                self.go_forward(registry);
            }
            HitZone::Header(HeaderAction::Drag) => {
                let interval = registry.config().double_click;
                if let Some(prev) = self.last_header_click
                    && now.duration_since(prev) <= interval
                    && !window.fixed_size
                {
                    self.last_header_click = None;
                    self.toggle_maximize(registry);
                    return None;
                }
                self.last_header_click = Some(now);
                self.engine.begin_drag(&window, maximized, pointer);
            }
            HitZone::Resize(edge) => {
                self.engine.begin_resize(&window, maximized, edge, pointer);
            }
            HitZone::Content | HitZone::Frame => {}
        }
        None
    }

    pub fn pointer_drag(
        &mut self,
        registry: &WindowRegistry,
        pointer: Point,
    ) -> Option<LiveGeometry> {
        if !self.engine.is_active() {
            return None;
        }
        let limits = self.limits(registry);
        self.engine.pointer_move(pointer, limits.as_ref())
    }

    /// Pointer released: commit whatever the gesture produced.
    pub fn pointer_up(&mut self, registry: &mut WindowRegistry) -> Option<GestureCommit> {
        if !self.engine.is_active() {
            return None;
        }
        let limits = self.limits(registry);
        let commit = self.engine.release(limits.as_ref())?;
        let key = self.key.as_str();
        match commit {
            GestureCommit::Move(position) => {
                registry.update(key, WindowPatch::default().position(position));
            }
            GestureCommit::Snap(side) => registry.snap_to_side(key, side),
            GestureCommit::Resize(geometry) => {
                registry.update(key, WindowPatch::geometry(geometry));
            }
        }
        Some(commit)
    }

    pub fn cancel_gesture(&mut self) {
        self.engine.cancel();
    }

    /// Start the exit transition. The registry entry is removed once it ends.
    pub fn request_close(&mut self, registry: &WindowRegistry) {
        if self.closing.is_some() {
            return;
        }
        self.engine.cancel();
        let frames = registry.config().close_transition_frames;
        tracing::debug!(key = %self.key, frames, "close requested");
        self.closing = Some(CloseTransition { remaining: frames });
    }

    /// Advance the close transition by one frame.
    pub fn tick(&mut self, registry: &mut WindowRegistry) -> Option<SurfaceSignal> {
        let transition = self.closing.as_mut()?;
        transition.remaining = transition.remaining.saturating_sub(1);
        if transition.remaining > 0 {
            return None;
        }
        registry.close(self.key.as_str());
        Some(SurfaceSignal::Closed(self.key.clone()))
    }

    pub fn minimize(&mut self, registry: &mut WindowRegistry) -> SurfaceSignal {
        self.engine.cancel();
        registry.minimize(self.key.as_str());
        SurfaceSignal::Minimized(self.key.clone())
    }

    pub fn toggle_maximize(&mut self, registry: &mut WindowRegistry) {
        self.engine.cancel();
        registry.toggle_maximize(self.key.as_str());
    }

    /// Follow a link inside the window.
    pub fn navigate(&mut self, registry: &mut WindowRegistry, route: &str) {
        self.history.navigate(route);
        registry.update(
            self.key.as_str(),
            WindowPatch::default().route(route, false),
        );
    }

    pub fn go_back(&mut self, registry: &mut WindowRegistry) -> bool {
        let Some(route) = self.history.go_back().map(str::to_string) else {
            return false;
        };
        registry.update(self.key.as_str(), WindowPatch::default().route(route, true));
        true
    }

    pub fn go_forward(&mut self, registry: &mut WindowRegistry) -> bool {
        let Some(route) = self.history.go_forward().map(str::to_string) else {
            return false;
        };
        registry.update(self.key.as_str(), WindowPatch::default().route(route, true));
        true
    }

    /// Pick up route changes made to the window from outside the surface.
    pub fn sync_route(&mut self, window: &Window) {
        self.history.sync(&window.route, window.from_history);
    }
}
