use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
};

use crate::theme;
use crate::ui::{UiFrame, rect_contains, safe_set_string, truncate_to_width};
use crate::window::{Window, WindowKey, WindowRegistry};

const MINIMIZE_FOCUSED: &str = "[_]";
const CLOSE_ALL: &str = "[x]";

/// What a click on the taskbar asks the desktop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskbarCommand {
    Focus(WindowKey),
    Close(WindowKey),
    MinimizeFocused,
    CloseAll,
}

#[derive(Debug, Clone)]
struct EntryHit {
    key: WindowKey,
    rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Highlight {
    key: WindowKey,
    remaining: u16,
}

/// Top menu bar plus the bottom list of open windows.
#[derive(Debug)]
pub struct Taskbar {
    site_name: String,
    menu_area: Rect,
    bar_area: Rect,
    entry_hits: Vec<EntryHit>,
    minimize_rect: Option<Rect>,
    close_all_rect: Option<Rect>,
    highlights: Vec<Highlight>,
    highlight_frames: u16,
    hostname: Option<String>,
}

impl Taskbar {
    pub fn new(site_name: impl Into<String>, highlight_frames: u16) -> Self {
        Self {
            site_name: site_name.into(),
            menu_area: Rect::default(),
            bar_area: Rect::default(),
            entry_hits: Vec::new(),
            minimize_rect: None,
            close_all_rect: None,
            highlights: Vec::new(),
            highlight_frames,
            hostname: None,
        }
    }

    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        self.hostname = Some(hostname.into());
    }

    pub fn menu_area(&self) -> Rect {
        self.menu_area
    }

    pub fn bar_area(&self) -> Rect {
        self.bar_area
    }

    /// Split `area` into the menu bar (top row), the taskbar (bottom row) and
    /// the managed area in between, which is returned.
    pub fn split_area(&mut self, area: Rect) -> Rect {
        let top_h = 1u16.min(area.height);
        let bottom_h = 1u16.min(area.height.saturating_sub(top_h));
        self.menu_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: top_h,
        };
        self.bar_area = Rect {
            x: area.x,
            y: area.y.saturating_add(area.height).saturating_sub(bottom_h),
            width: area.width,
            height: bottom_h,
        };
        Rect {
            x: area.x,
            y: area.y.saturating_add(top_h),
            width: area.width,
            height: area.height.saturating_sub(top_h).saturating_sub(bottom_h),
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.menu_area, column, row) || rect_contains(self.bar_area, column, row)
    }

    /// Start the attention highlight for a freshly minimized window.
    pub fn on_window_minimized(&mut self, key: &WindowKey) {
        self.highlights.retain(|h| &h.key != key);
        if self.highlight_frames == 0 {
            return;
        }
        self.highlights.push(Highlight {
            key: key.clone(),
            remaining: self.highlight_frames,
        });
    }

    pub fn is_highlighted(&self, key: &str) -> bool {
        self.highlights.iter().any(|h| h.key.as_str() == key)
    }

    /// Advance highlight animations by one frame. Returns true while any are running.
    pub fn tick(&mut self) -> bool {
        for h in &mut self.highlights {
            h.remaining = h.remaining.saturating_sub(1);
        }
        self.highlights.retain(|h| h.remaining > 0);
        !self.highlights.is_empty()
    }

    pub fn forget(&mut self, key: &str) {
        self.highlights.retain(|h| h.key.as_str() != key);
        self.entry_hits.retain(|hit| hit.key.as_str() != key);
    }

    pub fn handle_event(&self, event: &Event) -> Option<TaskbarCommand> {
        let Event::Mouse(mouse) = event else {
            return None;
        };
        let MouseEventKind::Down(button) = mouse.kind else {
            return None;
        };
        let (col, row) = (mouse.column, mouse.row);
        if button == MouseButton::Left {
            if self.minimize_rect.is_some_and(|r| rect_contains(r, col, row)) {
                return Some(TaskbarCommand::MinimizeFocused);
            }
            if self.close_all_rect.is_some_and(|r| rect_contains(r, col, row)) {
                return Some(TaskbarCommand::CloseAll);
            }
        }
        let hit = self
            .entry_hits
            .iter()
            .find(|hit| rect_contains(hit.rect, col, row))?;
        match button {
            MouseButton::Left => Some(TaskbarCommand::Focus(hit.key.clone())),
            MouseButton::Middle => Some(TaskbarCommand::Close(hit.key.clone())),
            MouseButton::Right => None,
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, registry: &WindowRegistry) {
        self.render_menu_bar(frame, registry);
        self.render_bar(frame, registry);
    }

    fn render_menu_bar(&mut self, frame: &mut UiFrame<'_>, registry: &WindowRegistry) {
        let area = self.menu_area;
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let style = Style::default()
            .bg(theme::panel_bg())
            .fg(theme::panel_fg());
        let blank = " ".repeat(bounds.width as usize);
        safe_set_string(buffer, bounds, bounds.x, bounds.y, &blank, style);

        let label = format!("≡ {}", self.site_name);
        safe_set_string(
            buffer,
            bounds,
            bounds.x,
            bounds.y,
            &label,
            style.add_modifier(Modifier::BOLD),
        );
        let mut x = bounds.x.saturating_add(label.chars().count() as u16 + 1);

        let hostname = self.hostname.get_or_insert_with(|| {
            hostname::get()
                .ok()
                .and_then(|s| s.into_string().ok())
                .unwrap_or_else(|| "unknown-host".to_string())
        });
        let host_width = hostname.chars().count() as u16;
        let max_x = bounds.x.saturating_add(bounds.width);
        let host_x = max_x.saturating_sub(host_width);

        if let Some(window) = registry.focused() {
            safe_set_string(buffer, bounds, x, bounds.y, "│ ", style);
            x = x.saturating_add(2);
            let room = host_x.saturating_sub(x).saturating_sub(1) as usize;
            let title = truncate_to_width(window.title_or_default(), room);
            safe_set_string(buffer, bounds, x, bounds.y, &title, style);
            x = x.saturating_add(title.chars().count() as u16);
        }
        if host_x > x {
            safe_set_string(buffer, bounds, host_x, bounds.y, hostname, style);
        }
    }

    fn entry_style(&self, window: &Window, focused: bool) -> Style {
        if self.is_highlighted(window.key.as_str()) {
            return Style::default()
                .bg(theme::accent())
                .fg(theme::panel_active_fg())
                .add_modifier(Modifier::BOLD);
        }
        if focused {
            Style::default()
                .bg(theme::menu_selected_bg())
                .fg(theme::menu_selected_fg())
                .add_modifier(Modifier::BOLD)
        } else if window.minimized {
            Style::default()
                .fg(theme::panel_inactive_fg())
                .add_modifier(Modifier::DIM | Modifier::ITALIC)
        } else {
            Style::default().fg(theme::panel_fg())
        }
    }

    fn render_bar(&mut self, frame: &mut UiFrame<'_>, registry: &WindowRegistry) {
        self.entry_hits.clear();
        self.minimize_rect = None;
        self.close_all_rect = None;
        let area = self.bar_area;
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let bar_style = Style::default()
            .bg(theme::bottom_panel_bg())
            .fg(theme::bottom_panel_fg());
        let blank = " ".repeat(bounds.width as usize);
        safe_set_string(buffer, bounds, bounds.x, bounds.y, &blank, bar_style);

        let y = bounds.y;
        let max_x = bounds.x.saturating_add(bounds.width);
        let controls_width = (MINIMIZE_FOCUSED.len() + CLOSE_ALL.len()) as u16;
        let controls_x = max_x.saturating_sub(controls_width);
        if controls_x >= bounds.x && bounds.width > controls_width {
            safe_set_string(buffer, bounds, controls_x, y, MINIMIZE_FOCUSED, bar_style);
            self.minimize_rect = Some(Rect {
                x: controls_x,
                y,
                width: MINIMIZE_FOCUSED.len() as u16,
                height: 1,
            });
            let close_x = controls_x + MINIMIZE_FOCUSED.len() as u16;
            safe_set_string(buffer, bounds, close_x, y, CLOSE_ALL, bar_style);
            self.close_all_rect = Some(Rect {
                x: close_x,
                y,
                width: CLOSE_ALL.len() as u16,
                height: 1,
            });
        }

        // Entries stay in opening order; stacking is not reflected here.
        let mut x = bounds.x;
        let limit = if self.minimize_rect.is_some() {
            controls_x.saturating_sub(1)
        } else {
            max_x
        };
        for window in registry.windows() {
            let focused = registry.is_focused(window.key.as_str());
            let marker = if window.minimized { "_" } else { "" };
            let max_label = limit.saturating_sub(x).saturating_sub(2) as usize;
            if max_label == 0 {
                break;
            }
            let label = truncate_to_width(
                &format!("{marker}{}", window.title_or_default()),
                max_label,
            );
            let chunk = format!(" {label} ");
            let chunk_width = chunk.chars().count() as u16;
            if x.saturating_add(chunk_width) > limit {
                break;
            }
            let style = self.entry_style(window, focused);
            safe_set_string(buffer, bounds, x, y, &chunk, style);
            self.entry_hits.push(EntryHit {
                key: window.key.clone(),
                rect: Rect {
                    x,
                    y,
                    width: chunk_width,
                    height: 1,
                },
            });
            x = x.saturating_add(chunk_width);
        }
    }
}
