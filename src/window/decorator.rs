use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::gesture::ResizeEdge;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

const MINIMIZE_LABEL: &str = "[_]";
const MAXIMIZE_LABEL: &str = "[+]";
const RESTORE_LABEL: &str = "[=]";
const CLOSE_LABEL: &str = "[x]";
const BUTTON_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Back,
    Forward,
    Minimize,
    Maximize,
    Close,
    Drag,
}

/// Part of a window's chrome under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    Resize(ResizeEdge),
    Header(HeaderAction),
    Content,
    /// Border cell that offers no affordance.
    Frame,
}

/// Which affordances a window's chrome offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeFlags {
    pub resizable: bool,
    pub maximizable: bool,
    pub navigable: bool,
}

impl ChromeFlags {
    pub fn for_window(fixed_size: bool, minimal: bool) -> Self {
        Self {
            resizable: !fixed_size && !minimal,
            maximizable: !fixed_size,
            navigable: !minimal,
        }
    }
}

/// Per-frame state the decorator needs to draw a window.
#[derive(Debug, Clone, Copy)]
pub struct ChromeState<'a> {
    pub title: &'a str,
    pub focused: bool,
    pub maximized: bool,
    pub closing: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub flags: ChromeFlags,
}

pub trait WindowDecorator: std::fmt::Debug {
    /// Rows taken by the chrome above the content area.
    fn header_rows(&self) -> u16 {
        2
    }

    fn content_rect(&self, rect: Rect) -> Rect {
        let top = self.header_rows();
        Rect {
            x: rect.x.saturating_add(1),
            y: rect.y.saturating_add(top),
            width: rect.width.saturating_sub(2),
            height: rect.height.saturating_sub(top + 1),
        }
    }

    fn hit_test(&self, rect: Rect, column: u16, row: u16, flags: ChromeFlags) -> Option<HitZone>;

    fn render_window(&self, frame: &mut UiFrame<'_>, rect: Rect, chrome: &ChromeState<'_>);
}

#[derive(Debug, Default)]
pub struct DefaultDecorator;

struct ControlLayout {
    back: u16,
    forward: u16,
    minimize: u16,
    maximize: Option<u16>,
    close: u16,
}

impl DefaultDecorator {
    // Buttons sit right-aligned inside the header; navigation arrows on the left.
    fn controls(rect: Rect, flags: ChromeFlags) -> ControlLayout {
        let right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let close = right.saturating_sub(BUTTON_WIDTH);
        let (maximize, minimize) = if flags.maximizable {
            let max = close.saturating_sub(BUTTON_WIDTH);
            (Some(max), max.saturating_sub(BUTTON_WIDTH))
        } else {
            (None, close.saturating_sub(BUTTON_WIDTH))
        };
        ControlLayout {
            back: rect.x.saturating_add(2),
            forward: rect.x.saturating_add(4),
            minimize,
            maximize,
            close,
        }
    }

    fn edge_at(rect: Rect, column: u16, row: u16) -> Option<ResizeEdge> {
        let left = column == rect.x;
        let right = column == rect.x + rect.width - 1;
        let top = row == rect.y;
        let bottom = row == rect.y + rect.height - 1;
        match (top, bottom, left, right) {
            (true, _, true, _) => Some(ResizeEdge::TopLeft),
            (true, _, _, true) => Some(ResizeEdge::TopRight),
            (_, true, true, _) => Some(ResizeEdge::BottomLeft),
            (_, true, _, true) => Some(ResizeEdge::BottomRight),
            (true, ..) => Some(ResizeEdge::Top),
            (_, true, ..) => Some(ResizeEdge::Bottom),
            (_, _, true, _) => Some(ResizeEdge::Left),
            (_, _, _, true) => Some(ResizeEdge::Right),
            _ => None,
        }
    }
}

fn within(x: u16, start: u16, width: u16) -> bool {
    x >= start && x < start.saturating_add(width)
}

impl WindowDecorator for DefaultDecorator {
    fn hit_test(&self, rect: Rect, column: u16, row: u16, flags: ChromeFlags) -> Option<HitZone> {
        if rect.width < 2 || rect.height < 2 {
            return None;
        }
        let inside = column >= rect.x
            && column < rect.x + rect.width
            && row >= rect.y
            && row < rect.y + rect.height;
        if !inside {
            return None;
        }
        if let Some(edge) = Self::edge_at(rect, column, row) {
            return Some(if flags.resizable {
                HitZone::Resize(edge)
            } else {
                HitZone::Frame
            });
        }
        let header_y = rect.y + 1;
        if row != header_y {
            return Some(HitZone::Content);
        }
        let controls = Self::controls(rect, flags);
        let action = if within(column, controls.close, BUTTON_WIDTH) {
            HeaderAction::Close
        } else if controls
            .maximize
            .is_some_and(|x| within(column, x, BUTTON_WIDTH))
        {
            HeaderAction::Maximize
        } else if within(column, controls.minimize, BUTTON_WIDTH) {
            HeaderAction::Minimize
        } else if flags.navigable && column == controls.back {
            HeaderAction::Back
        } else if flags.navigable && column == controls.forward {
            HeaderAction::Forward
        } else {
            HeaderAction::Drag
        };
        Some(HitZone::Header(action))
    }

    fn render_window(&self, frame: &mut UiFrame<'_>, rect: Rect, chrome: &ChromeState<'_>) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let clip = frame.area();
        let buffer = frame.buffer_mut();

        let mut header_style = if chrome.focused {
            Style::default()
                .bg(theme::decorator_header_bg())
                .fg(theme::decorator_header_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::decorator_inactive_bg())
                .fg(theme::decorator_header_fg())
        };
        let mut border_style = Style::default().fg(theme::decorator_border());
        if chrome.closing {
            header_style = header_style.add_modifier(Modifier::DIM);
            border_style = border_style.add_modifier(Modifier::DIM);
        }
        let body_style = Style::default()
            .bg(theme::window_bg())
            .fg(theme::window_fg());

        let left = rect.x;
        let right = rect.x + rect.width - 1;
        let top = rect.y;
        let bottom = rect.y + rect.height - 1;
        let header_y = top + 1;

        fill_row(buffer, clip, left, right, top, border_style, |x| {
            if x == left {
                "┌"
            } else if x == right {
                "┐"
            } else {
                "─"
            }
        });
        fill_row(buffer, clip, left, right, bottom, border_style, |x| {
            if x == left {
                "└"
            } else if x == right {
                "┘"
            } else {
                "─"
            }
        });
        for y in (top + 1)..bottom {
            safe_set_string(buffer, clip, left, y, "│", border_style);
            safe_set_string(buffer, clip, right, y, "│", border_style);
            let style = if y == header_y { header_style } else { body_style };
            let blank = " ".repeat(rect.width.saturating_sub(2) as usize);
            safe_set_string(buffer, clip, left + 1, y, &blank, style);
        }

        if header_y >= bottom {
            return;
        }
        let controls = Self::controls(rect, chrome.flags);
        let mut title_start = left + 2;
        if chrome.flags.navigable {
            let dim = header_style.add_modifier(Modifier::DIM);
            let back_style = if chrome.can_go_back { header_style } else { dim };
            let fwd_style = if chrome.can_go_forward { header_style } else { dim };
            safe_set_string(buffer, clip, controls.back, header_y, "<", back_style);
            safe_set_string(buffer, clip, controls.forward, header_y, ">", fwd_style);
            title_start = controls.forward + 2;
        }
        let title_end = controls.minimize.saturating_sub(1);
        if title_end > title_start {
            let title = truncate_to_width(chrome.title, (title_end - title_start) as usize);
            safe_set_string(buffer, clip, title_start, header_y, &title, header_style);
        }
        safe_set_string(buffer, clip, controls.minimize, header_y, MINIMIZE_LABEL, header_style);
        if let Some(x) = controls.maximize {
            let label = if chrome.maximized {
                RESTORE_LABEL
            } else {
                MAXIMIZE_LABEL
            };
            safe_set_string(buffer, clip, x, header_y, label, header_style);
        }
        safe_set_string(buffer, clip, controls.close, header_y, CLOSE_LABEL, header_style);
    }
}

fn fill_row(
    buffer: &mut Buffer,
    clip: Rect,
    left: u16,
    right: u16,
    y: u16,
    style: Style,
    symbol: impl Fn(u16) -> &'static str,
) {
    for x in left..=right {
        safe_set_string(buffer, clip, x, y, symbol(x), style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rect() -> Rect {
        Rect {
            x: 10,
            y: 5,
            width: 30,
            height: 10,
        }
    }

    const FULL: ChromeFlags = ChromeFlags {
        resizable: true,
        maximizable: true,
        navigable: true,
    };

    #[test]
    fn borders_map_to_resize_edges() {
        let d = DefaultDecorator;
        let r = rect();
        assert_eq!(d.hit_test(r, 10, 5, FULL), Some(HitZone::Resize(ResizeEdge::TopLeft)));
        assert_eq!(d.hit_test(r, 39, 5, FULL), Some(HitZone::Resize(ResizeEdge::TopRight)));
        assert_eq!(d.hit_test(r, 20, 5, FULL), Some(HitZone::Resize(ResizeEdge::Top)));
        assert_eq!(d.hit_test(r, 20, 14, FULL), Some(HitZone::Resize(ResizeEdge::Bottom)));
        assert_eq!(d.hit_test(r, 10, 9, FULL), Some(HitZone::Resize(ResizeEdge::Left)));
        assert_eq!(d.hit_test(r, 39, 14, FULL), Some(HitZone::Resize(ResizeEdge::BottomRight)));
        assert_eq!(d.hit_test(r, 20, 9, FULL), Some(HitZone::Content));
        assert_eq!(d.hit_test(r, 9, 9, FULL), None);
    }

    #[test]
    fn header_controls_are_hit_tested() {
        let d = DefaultDecorator;
        let r = rect();
        // Right border at 39; close occupies 36..39.
        assert_eq!(d.hit_test(r, 37, 6, FULL), Some(HitZone::Header(HeaderAction::Close)));
        assert_eq!(d.hit_test(r, 34, 6, FULL), Some(HitZone::Header(HeaderAction::Maximize)));
        assert_eq!(d.hit_test(r, 31, 6, FULL), Some(HitZone::Header(HeaderAction::Minimize)));
        assert_eq!(d.hit_test(r, 12, 6, FULL), Some(HitZone::Header(HeaderAction::Back)));
        assert_eq!(d.hit_test(r, 14, 6, FULL), Some(HitZone::Header(HeaderAction::Forward)));
        assert_eq!(d.hit_test(r, 20, 6, FULL), Some(HitZone::Header(HeaderAction::Drag)));
    }

    #[test]
    fn fixed_windows_offer_no_resize_or_maximize() {
        let d = DefaultDecorator;
        let r = rect();
        let flags = ChromeFlags::for_window(true, false);
        assert_eq!(d.hit_test(r, 20, 5, flags), Some(HitZone::Frame));
        assert_eq!(d.hit_test(r, 34, 6, flags), Some(HitZone::Header(HeaderAction::Minimize)));
        let minimal = ChromeFlags::for_window(false, true);
        assert_eq!(d.hit_test(r, 12, 6, minimal), Some(HitZone::Header(HeaderAction::Drag)));
    }

    #[test]
    fn render_draws_title_and_controls() {
        let backend = TestBackend::new(50, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|f| {
                let mut frame = UiFrame::new(f);
                let chrome = ChromeState {
                    title: "Posts",
                    focused: true,
                    maximized: false,
                    closing: false,
                    can_go_back: false,
                    can_go_forward: false,
                    flags: FULL,
                };
                DefaultDecorator.render_window(&mut frame, rect(), &chrome);
            })
            .expect("draw");
        let buffer = terminal.backend().buffer();
        let header: String = (10..40)
            .map(|x| buffer[(x, 6)].symbol().to_string())
            .collect();
        assert!(header.contains("Posts"));
        assert!(header.ends_with("[_][+][x]│"));
        assert_eq!(buffer[(10, 5)].symbol(), "┌");
        assert_eq!(buffer[(39, 14)].symbol(), "┘");
    }
}
