use ratatui::style::Color;

// Centralized theme colors.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

// Menu bar
pub fn panel_bg() -> Color {
    Color::DarkGray
}
pub fn panel_fg() -> Color {
    Color::White
}
pub fn panel_inactive_fg() -> Color {
    Color::Gray
}
pub fn panel_active_fg() -> Color {
    Color::Black
}

// Taskbar
pub fn bottom_panel_bg() -> Color {
    Color::Black
}
pub fn bottom_panel_fg() -> Color {
    Color::White
}
pub fn menu_selected_bg() -> Color {
    Color::Gray
}
pub fn menu_selected_fg() -> Color {
    Color::Black
}

// Desktop
pub fn desktop_bg() -> Color {
    Color::Indexed(24)
}
pub fn snap_preview_bg() -> Color {
    Color::Indexed(31)
}

// Decorator
pub fn decorator_header_bg() -> Color {
    Color::Blue
}
pub fn decorator_inactive_bg() -> Color {
    Color::DarkGray
}
pub fn decorator_header_fg() -> Color {
    Color::White
}
pub fn decorator_border() -> Color {
    Color::Gray
}
pub fn window_bg() -> Color {
    Color::Black
}
pub fn window_fg() -> Color {
    Color::White
}
pub fn not_found_fg() -> Color {
    Color::LightRed
}
