//! The desktop: the injected window service plus everything drawn around it.
//!
//! `Desktop` owns the [`WindowRegistry`], one [`WindowSurface`] per open
//! window, the taskbar, the content router and the record store. The host
//! loop feeds it input events, idle ticks and frames; nothing else mutates
//! window state.
use std::collections::BTreeMap;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Paragraph, Wrap};

use crate::actions::Action;
use crate::backend::{Change, RecordStore, Table};
use crate::config::DesktopConfig;
use crate::geometry::{Bounds, Geometry, Point, Side, half_split_rect};
use crate::router::{ContentRouter, SiteRouter};
use crate::taskbar::{Taskbar, TaskbarCommand};
use crate::theme;
use crate::ui::{UiFrame, rect_contains};
use crate::window::decorator::{ChromeFlags, ChromeState, DefaultDecorator, WindowDecorator};
use crate::window::{
    OpenOutcome, OpenRequest, SurfaceHandle, SurfaceSignal, WindowKey, WindowRegistry,
    WindowSurface,
};

const SITE_NAME: &str = "site";

pub struct Desktop {
    registry: WindowRegistry,
    surfaces: BTreeMap<WindowKey, WindowSurface>,
    taskbar: Taskbar,
    router: Box<dyn ContentRouter>,
    decorator: Box<dyn WindowDecorator>,
    store: Box<dyn RecordStore>,
    changes: Vec<Receiver<Change>>,
    container: Rect,
    capture: Option<WindowKey>,
}

impl Desktop {
    pub fn new(config: DesktopConfig, mut store: Box<dyn RecordStore>) -> Self {
        let changes = Table::ALL
            .into_iter()
            .map(|table| store.subscribe(table))
            .collect();
        let taskbar = Taskbar::new(SITE_NAME, config.minimize_highlight_frames);
        Self {
            registry: WindowRegistry::new(config),
            surfaces: BTreeMap::new(),
            taskbar,
            router: Box::new(SiteRouter),
            decorator: Box::new(DefaultDecorator),
            store,
            changes,
            container: Rect::default(),
            capture: None,
        }
    }

    pub fn with_router(mut self, router: Box<dyn ContentRouter>) -> Self {
        self.router = router;
        self
    }

    pub fn with_decorator(mut self, decorator: Box<dyn WindowDecorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    pub fn taskbar_mut(&mut self) -> &mut Taskbar {
        &mut self.taskbar
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn RecordStore {
        self.store.as_mut()
    }

    pub fn surface(&self, key: &str) -> Option<&WindowSurface> {
        self.surfaces.get(key)
    }

    /// Screen rectangle of the constraints container.
    pub fn container(&self) -> Rect {
        self.container
    }

    /// Window currently holding pointer capture for a gesture.
    pub fn captured(&self) -> Option<&WindowKey> {
        self.capture.as_ref()
    }

    /// Split the screen into menu bar, container and taskbar, and hand the
    /// container size to the registry.
    pub fn layout(&mut self, area: Rect) {
        self.container = self.taskbar.split_area(area);
        let bounds = Bounds::new(
            i32::from(self.container.width),
            i32::from(self.container.height),
        );
        if bounds.is_empty() {
            return;
        }
        self.registry.set_bounds(bounds);
        self.sync_surfaces();
    }

    /// Open a window. Untitled requests take the title their route implies.
    pub fn open(&mut self, mut request: OpenRequest) -> OpenOutcome {
        if request.title.is_none()
            && let Ok(content) = self.router.resolve(&request.route)
        {
            request.title = Some(content.default_title());
        }
        let outcome = self.registry.open(request);
        self.sync_surfaces();
        outcome
    }

    pub fn open_search(&mut self, filter: Option<&str>) -> OpenOutcome {
        let outcome = self.registry.open_search(filter);
        self.sync_surfaces();
        outcome
    }

    /// Follow an in-window link.
    pub fn navigate(&mut self, key: &str, route: &str) {
        let Some(surface) = self.surfaces.get_mut(key) else {
            tracing::trace!(key, "navigate ignored for unknown window");
            return;
        };
        surface.navigate(&mut self.registry, route);
    }

    /// Start the close transition for `key`.
    pub fn close(&mut self, key: &str) {
        match self.surfaces.get_mut(key) {
            Some(surface) => surface.request_close(&self.registry),
            None => self.registry.close(key),
        }
        if self.capture.as_ref().is_some_and(|k| k.as_str() == key) {
            self.capture = None;
        }
    }

    pub fn close_all(&mut self) {
        for surface in self.surfaces.values_mut() {
            surface.cancel_gesture();
        }
        self.capture = None;
        self.registry.close_all();
        self.sync_surfaces();
    }

    /// Reconcile surfaces with the registry: mount new windows, drop
    /// surfaces whose window is gone and pick up outside route changes.
    pub fn sync_surfaces(&mut self) {
        let snapshot = self.registry.snapshot();
        let gone: Vec<WindowKey> = self
            .surfaces
            .keys()
            .filter(|key| !snapshot.iter().any(|w| &w.key == *key))
            .cloned()
            .collect();
        for key in gone {
            if let Some(mut surface) = self.surfaces.remove(&key) {
                surface.cancel_gesture();
            }
            self.taskbar.forget(key.as_str());
            if self.capture.as_ref() == Some(&key) {
                self.capture = None;
            }
            tracing::debug!(key = %key, "dropped surface");
        }

        let has_bounds = self.registry.bounds().is_some();
        for window in snapshot.iter() {
            let surface = self
                .surfaces
                .entry(window.key.clone())
                .or_insert_with(|| WindowSurface::new(window));
            surface.sync_route(window);
            if has_bounds && !window.minimized {
                let area = surface.display_geometry(window);
                surface.mount(&mut self.registry, SurfaceHandle { area });
            }
        }
    }

    /// Route a terminal event. Returns true when the desktop consumed it.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        if self.capture.is_none() {
            if let Some(command) = self.taskbar.handle_event(event) {
                self.apply_taskbar(command);
                return true;
            }
            if self.taskbar.contains(mouse.column, mouse.row) {
                return false;
            }
        }
        let pointer = self.to_container(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_down(mouse.column, mouse.row, pointer, now)
            }
            MouseEventKind::Drag(MouseButton::Left) => self.pointer_drag(pointer),
            MouseEventKind::Up(MouseButton::Left) => self.pointer_up(),
            _ => false,
        }
    }

    fn pointer_down(&mut self, column: u16, row: u16, pointer: Point, now: Instant) -> bool {
        // An Up lost outside the terminal leaves the previous gesture open.
        if self.capture.is_some() {
            self.pointer_up();
        }
        let hit = self
            .registry
            .stacking_order()
            .into_iter()
            .rev()
            .filter(|w| !w.minimized)
            .find_map(|w| {
                let surface = self.surfaces.get(w.key.as_str())?;
                let rect = self.to_screen(surface.display_geometry(w));
                rect_contains(rect, column, row).then(|| {
                    let flags = ChromeFlags::for_window(w.fixed_size, w.minimal);
                    (w.key.clone(), rect, flags)
                })
            });
        let Some((key, rect, flags)) = hit else {
            return false;
        };
        let Some(surface) = self.surfaces.get_mut(&key) else {
            return false;
        };
        if surface.is_closing() {
            return true;
        }
        let Some(zone) = self.decorator.hit_test(rect, column, row, flags) else {
            return true;
        };
        self.registry.bring_to_front(key.as_str());
        tracing::trace!(key = %key, ?zone, "pointer down");
        let signal = surface.pointer_down(&mut self.registry, zone, pointer, now);
        if surface.has_gesture() {
            self.capture = Some(key);
        }
        if let Some(signal) = signal {
            self.on_signal(signal);
        }
        self.sync_surfaces();
        true
    }

    fn pointer_drag(&mut self, pointer: Point) -> bool {
        let Some(key) = self.capture.clone() else {
            return false;
        };
        let Some(surface) = self.surfaces.get_mut(&key) else {
            self.capture = None;
            return false;
        };
        if let Some(live) = surface.pointer_drag(&self.registry, pointer) {
            tracing::trace!(
                key = %key,
                x = live.geometry.position.x,
                y = live.geometry.position.y,
                width = live.geometry.size.width,
                height = live.geometry.size.height,
                snap = ?live.snap,
                "live geometry"
            );
        }
        true
    }

    fn pointer_up(&mut self) -> bool {
        let Some(key) = self.capture.take() else {
            return false;
        };
        if let Some(surface) = self.surfaces.get_mut(&key) {
            surface.pointer_up(&mut self.registry);
        }
        self.sync_surfaces();
        true
    }

    fn apply_taskbar(&mut self, command: TaskbarCommand) {
        tracing::debug!(?command, "taskbar command");
        match command {
            TaskbarCommand::Focus(key) => {
                self.registry.bring_to_front(key.as_str());
                self.sync_surfaces();
            }
            TaskbarCommand::Close(key) => self.close(key.as_str()),
            TaskbarCommand::MinimizeFocused => self.minimize_focused(),
            TaskbarCommand::CloseAll => self.close_all(),
        }
    }

    fn on_signal(&mut self, signal: SurfaceSignal) {
        match signal {
            SurfaceSignal::Minimized(key) => self.taskbar.on_window_minimized(&key),
            SurfaceSignal::Closed(key) => {
                self.surfaces.remove(&key);
                self.taskbar.forget(key.as_str());
            }
        }
    }

    fn focused_key(&self) -> Option<WindowKey> {
        self.registry.focused_key().cloned()
    }

    fn minimize_focused(&mut self) {
        let Some(key) = self.focused_key() else {
            return;
        };
        if let Some(surface) = self.surfaces.get_mut(&key) {
            let signal = surface.minimize(&mut self.registry);
            self.on_signal(signal);
        }
    }

    /// Apply a keyboard action. Returns false for actions the desktop does
    /// not handle (quitting is up to the host loop).
    pub fn handle_action(&mut self, action: Action) -> bool {
        if action.targets_focused() {
            let Some(key) = self.focused_key() else {
                return true;
            };
            self.apply_to_window(&key, action);
            self.sync_surfaces();
            return true;
        }
        match action {
            Action::Quit => return false,
            Action::CycleNextWindow => self.cycle_focus(true),
            Action::CyclePrevWindow => self.cycle_focus(false),
            Action::CloseAll => self.close_all(),
            Action::OpenSearch => {
                self.open_search(None);
            }
            Action::OpenPosts => {
                self.open(OpenRequest::new("posts", "/posts").title("Posts"));
            }
            Action::OpenQuestions => {
                self.open(OpenRequest::new("questions", "/questions").title("Questions"));
            }
            Action::OpenAbout => {
                self.open(
                    OpenRequest::new("about", "/about")
                        .title("About")
                        .fixed_size(true),
                );
            }
            _ => {}
        }
        true
    }

    fn apply_to_window(&mut self, key: &WindowKey, action: Action) {
        let Some(window) = self.registry.get(key.as_str()) else {
            return;
        };
        let fixed = window.fixed_size;
        if action == Action::CloseWindow {
            self.close(key.as_str());
            return;
        }
        let Some(surface) = self.surfaces.get_mut(key) else {
            return;
        };
        if surface.is_closing() {
            return;
        }
        match action {
            Action::SnapLeft | Action::SnapRight if !fixed => {
                surface.cancel_gesture();
                let side = if action == Action::SnapLeft {
                    Side::Left
                } else {
                    Side::Right
                };
                self.registry.snap_to_side(key.as_str(), side);
            }
            Action::ToggleMaximize if !fixed => surface.toggle_maximize(&mut self.registry),
            Action::MinimizeWindow => {
                let signal = surface.minimize(&mut self.registry);
                self.on_signal(signal);
            }
            Action::NavigateBack => {
                surface.go_back(&mut self.registry);
            }
            Action::NavigateForward => {
                surface.go_forward(&mut self.registry);
            }
            _ => {}
        }
    }

    // Focus moves through windows in opening order, minimized ones included.
    fn cycle_focus(&mut self, forward: bool) {
        let windows = self.registry.windows();
        if windows.is_empty() {
            return;
        }
        let count = windows.len();
        let next = match self
            .registry
            .focused_key()
            .and_then(|key| windows.iter().position(|w| &w.key == key))
        {
            Some(index) if forward => (index + 1) % count,
            Some(index) => (index + count - 1) % count,
            None if forward => 0,
            None => count - 1,
        };
        let key = windows[next].key.clone();
        self.registry.bring_to_front(key.as_str());
        self.sync_surfaces();
    }

    /// Advance one frame: close transitions, taskbar highlights and store
    /// notifications. Returns true when anything changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        let mut signals = Vec::new();
        for surface in self.surfaces.values_mut() {
            if surface.is_closing() {
                changed = true;
            }
            if let Some(signal) = surface.tick(&mut self.registry) {
                signals.push(signal);
            }
        }
        for signal in signals {
            self.on_signal(signal);
        }
        if self.taskbar.tick() {
            changed = true;
        }
        for rx in &self.changes {
            while let Ok(change) = rx.try_recv() {
                tracing::debug!(
                    table = %change.table,
                    kind = ?change.kind,
                    id = change.id,
                    "store changed"
                );
                changed = true;
            }
        }
        self.sync_surfaces();
        changed
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        self.layout(frame.area());
        frame.fill_rect(self.container, Style::default().bg(theme::desktop_bg()));

        for window in self.registry.stacking_order() {
            if window.minimized {
                continue;
            }
            let Some(surface) = self.surfaces.get(window.key.as_str()) else {
                continue;
            };
            let rect = self.to_screen(surface.display_geometry(window));
            let chrome = ChromeState {
                title: window.title_or_default(),
                focused: self.registry.is_focused(window.key.as_str()),
                maximized: self.registry.is_maximized(window.key.as_str()),
                closing: surface.is_closing(),
                can_go_back: surface.history().can_go_back(),
                can_go_forward: surface.history().can_go_forward(),
                flags: ChromeFlags::for_window(window.fixed_size, window.minimal),
            };
            self.decorator.render_window(frame, rect, &chrome);
            let content = self.decorator.content_rect(rect);
            if content.width == 0 || content.height == 0 {
                continue;
            }
            let lines = self.router.view(&window.route, self.store.as_ref());
            let body = Paragraph::new(lines)
                .style(Style::default().bg(theme::window_bg()).fg(theme::window_fg()))
                .wrap(Wrap { trim: false });
            frame.render_widget(body, content);
        }

        if let Some(rect) = self.snap_preview_rect() {
            frame.tint_rect(rect, theme::snap_preview_bg());
        }

        self.taskbar.render(frame, &self.registry);
    }

    /// Screen rectangle of the half the active drag would snap to.
    pub fn snap_preview_rect(&self) -> Option<Rect> {
        let key = self.capture.as_ref()?;
        let side = self.surfaces.get(key)?.snap_preview()?;
        let bounds = self.registry.bounds()?;
        let half = half_split_rect(side, bounds, self.registry.config().inset);
        Some(self.to_screen(half))
    }

    /// Convert container geometry to a screen rectangle, clipped to what a
    /// terminal can address.
    pub fn to_screen(&self, geometry: Geometry) -> Rect {
        let max = i32::from(u16::MAX);
        let left = i32::from(self.container.x) + geometry.position.x;
        let top = i32::from(self.container.y) + geometry.position.y;
        let x0 = left.clamp(0, max);
        let y0 = top.clamp(0, max);
        let x1 = (left + geometry.size.width).clamp(x0, max);
        let y1 = (top + geometry.size.height).clamp(y0, max);
        Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16)
    }

    pub fn to_container(&self, column: u16, row: u16) -> Point {
        Point::new(
            i32::from(column) - i32::from(self.container.x),
            i32::from(row) - i32::from(self.container.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryStore, fields};
    use crossterm::event::{KeyModifiers, MouseEvent};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn desktop() -> Desktop {
        let mut desktop = Desktop::new(DesktopConfig::terminal(), Box::new(MemoryStore::seeded()));
        desktop.layout(Rect::new(0, 0, 100, 32));
        desktop
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn layout_reserves_menu_and_task_rows() {
        let desktop = desktop();
        assert_eq!(desktop.container(), Rect::new(0, 1, 100, 30));
        assert_eq!(desktop.registry().bounds(), Some(Bounds::new(100, 30)));
    }

    #[test]
    fn opening_mounts_a_surface() {
        let mut desktop = desktop();
        desktop.open(OpenRequest::new("posts", "/posts"));
        let surface = desktop.surface("posts").unwrap();
        assert!(surface.is_mounted());
        assert!(desktop.registry().get("posts").unwrap().surface.is_some());
    }

    #[test]
    fn header_drag_moves_window_on_release() {
        let mut desktop = desktop();
        desktop.open(OpenRequest::new("posts", "/posts").position(Point::new(10, 5)));
        let now = Instant::now();
        // Header row sits one row below the top border; container starts at row 1.
        let (col, row) = (30, 1 + 5 + 1);
        let press = mouse(MouseEventKind::Down(MouseButton::Left), col, row);
        assert!(desktop.handle_event(&press, now));
        assert_eq!(desktop.captured().map(WindowKey::as_str), Some("posts"));
        desktop.handle_event(
            &mouse(MouseEventKind::Drag(MouseButton::Left), col + 6, row + 2),
            now,
        );
        // Live only until release.
        assert_eq!(desktop.registry().get("posts").unwrap().position, Point::new(10, 5));
        desktop.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), col + 6, row + 2), now);
        assert_eq!(desktop.registry().get("posts").unwrap().position, Point::new(16, 7));
        assert!(desktop.captured().is_none());
    }

    #[test]
    fn click_focuses_the_topmost_window_under_pointer() {
        let mut desktop = desktop();
        desktop.open(OpenRequest::new("a", "/posts").position(Point::new(0, 0)));
        desktop.open(OpenRequest::new("b", "/about").position(Point::new(40, 0)));
        assert!(desktop.registry().is_focused("b"));
        let now = Instant::now();
        desktop.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 10), now);
        desktop.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 5, 10), now);
        assert!(desktop.registry().is_focused("a"));
        assert_eq!(desktop.registry().get("a").unwrap().z_index, 2);
    }

    #[test]
    fn close_action_runs_transition() {
        let mut desktop = desktop();
        desktop.open(OpenRequest::new("posts", "/posts"));
        desktop.handle_action(Action::CloseWindow);
        assert!(desktop.surface("posts").unwrap().is_closing());
        for _ in 0..DesktopConfig::terminal().close_transition_frames {
            desktop.tick();
        }
        assert!(desktop.registry().is_empty());
        assert!(desktop.surface("posts").is_none());
    }

    #[test]
    fn minimize_action_highlights_taskbar_entry() {
        let mut desktop = desktop();
        desktop.open(OpenRequest::new("posts", "/posts"));
        desktop.handle_action(Action::MinimizeWindow);
        assert!(desktop.registry().get("posts").unwrap().minimized);
        assert!(desktop.taskbar().is_highlighted("posts"));
        assert!(desktop.registry().focused_key().is_none());
    }

    #[test]
    fn cycling_follows_opening_order() {
        let mut desktop = desktop();
        for key in ["a", "b", "c"] {
            desktop.open(OpenRequest::new(key, "/posts"));
        }
        desktop.handle_action(Action::CycleNextWindow);
        assert!(desktop.registry().is_focused("a"));
        desktop.handle_action(Action::CyclePrevWindow);
        assert!(desktop.registry().is_focused("c"));
    }

    #[test]
    fn fixed_size_windows_ignore_snap_and_maximize_keys() {
        let mut desktop = desktop();
        desktop.handle_action(Action::OpenAbout);
        let before = desktop.registry().get("about").unwrap().geometry();
        desktop.handle_action(Action::SnapLeft);
        desktop.handle_action(Action::ToggleMaximize);
        assert_eq!(desktop.registry().get("about").unwrap().geometry(), before);
    }

    #[test]
    fn store_changes_are_drained_on_tick() {
        let mut desktop = desktop();
        assert!(!desktop.tick());
        desktop
            .store_mut()
            .insert(
                Table::CommunityChannels,
                fields([("slug", "help"), ("name", "Help")]),
            )
            .unwrap();
        assert!(desktop.tick());
        assert!(!desktop.tick());
    }

    #[test]
    fn untitled_windows_take_the_route_title() {
        let mut desktop = desktop();
        desktop.open(OpenRequest::new("q", "/questions"));
        desktop.open(OpenRequest::new("me", "/profile/ada"));
        desktop.open(OpenRequest::new("lost", "/nowhere"));
        desktop.open(OpenRequest::new("named", "/about").title("Hello"));
        let title = |key: &str| desktop.registry().get(key).unwrap().title.clone();
        assert_eq!(title("q").as_deref(), Some("Questions"));
        assert_eq!(title("lost"), None);
        assert_eq!(title("named").as_deref(), Some("Hello"));
        assert_eq!(title("me").as_deref(), Some("@ada"));
    }

    #[test]
    fn render_draws_windows_and_taskbar() {
        let mut desktop = desktop();
        desktop.open(OpenRequest::new("about", "/about").title("About"));
        let backend = TestBackend::new(100, 32);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let mut frame = UiFrame::new(f);
                desktop.render(&mut frame);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let screen: String = (0..32)
            .map(|y| (0..100).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(screen.contains("About"));
        assert!(screen.contains("A content site presented as a desktop."));
        assert!(screen.contains("[x]"));
    }
}
