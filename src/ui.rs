//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area.
//!
//! Window rectangles are computed in container coordinates and may end up
//! partially outside the terminal buffer (for instance while a resize shrinks
//! the terminal). Writing out of bounds into a `Buffer` panics, so every draw
//! call goes through `UiFrame`, which clips to the visible area first.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

/// Wrapper around `ratatui::Frame` that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        let area = area.intersection(buffer.area);
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    /// Paint every visible cell of `rect` blank with `style`.
    pub fn fill_rect(&mut self, rect: Rect, style: Style) {
        let Some(clipped) = self.clip_rect(rect) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_style(style);
                }
            }
        }
    }

    /// Swap the background of every visible cell in `rect`, keeping symbols.
    pub fn tint_rect(&mut self, rect: Rect, color: Color) {
        let Some(clipped) = self.clip_rect(rect) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    let mut style = cell.style();
                    style.bg = Some(color);
                    cell.set_style(style);
                }
            }
        }
    }
}

pub(crate) fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    let bounds = bounds.intersection(buffer.area);
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_to_width_short_and_long() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }

    #[test]
    fn safe_set_string_writes_within_bounds() {
        let bounds = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 2,
        };
        let mut buf = Buffer::empty(bounds);
        safe_set_string(&mut buf, bounds, 1, 0, "hello", Style::default());
        assert_eq!(buf[(1, 0)].symbol(), "h");

        // outside bounds should be ignored (no panic)
        safe_set_string(&mut buf, bounds, 100, 0, "x", Style::default());
        safe_set_string(&mut buf, bounds, 8, 1, "overflow", Style::default());
        assert_eq!(buf[(9, 1)].symbol(), "v");
    }

    #[test]
    fn render_widget_clips_to_frame_area() {
        struct Fill;
        impl Widget for Fill {
            fn render(self, area: Rect, buf: &mut Buffer) {
                for y in area.y..area.y + area.height {
                    for x in area.x..area.x + area.width {
                        buf[(x, y)].set_symbol("#");
                    }
                }
            }
        }

        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 4));
        let mut frame = UiFrame::from_parts(Rect::new(0, 0, 4, 3), &mut buf);
        frame.render_widget(Fill, Rect::new(2, 1, 10, 10));
        assert_eq!(buf[(3, 2)].symbol(), "#");
        assert_eq!(buf[(4, 2)].symbol(), " ");
        assert_eq!(buf[(3, 3)].symbol(), " ");
    }

    #[test]
    fn fill_rect_paints_only_visible_cells() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 4));
        let mut frame = UiFrame::from_parts(Rect::new(0, 0, 4, 4), &mut buf);
        let style = Style::default().bg(Color::Blue);
        frame.fill_rect(Rect::new(2, 2, 8, 8), style);
        assert_eq!(buf[(3, 3)].bg, Color::Blue);
        assert_eq!(buf[(1, 1)].bg, Color::Reset);
    }

    #[test]
    fn tint_rect_keeps_symbols() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        buf.set_string(0, 0, "ab", Style::default());
        let mut frame = UiFrame::from_parts(Rect::new(0, 0, 4, 1), &mut buf);
        frame.tint_rect(Rect::new(0, 0, 2, 1), Color::Cyan);
        assert_eq!(buf[(1, 0)].symbol(), "b");
        assert_eq!(buf[(1, 0)].bg, Color::Cyan);
        assert_eq!(buf[(2, 0)].bg, Color::Reset);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(2, 2, 3, 3);
        assert!(rect_contains(r, 2, 2));
        assert!(rect_contains(r, 4, 4));
        assert!(!rect_contains(r, 5, 4));
    }
}
