use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use site_wm::actions::Action;
use site_wm::backend::MemoryStore;
use site_wm::config::DesktopConfig;
use site_wm::desktop::Desktop;
use site_wm::geometry::{Bounds, Geometry, Point, Side, Size, half_split_rect};
use site_wm::ui::UiFrame;
use site_wm::window::OpenRequest;

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn down(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}

fn drag(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
}

fn up(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Up(MouseButton::Left), column, row)
}

// 1200x800 container between the menu bar and the taskbar.
fn pixel_desktop() -> Desktop {
    let mut desktop = Desktop::new(DesktopConfig::default(), Box::new(MemoryStore::seeded()));
    desktop.layout(Rect::new(0, 0, 1200, 802));
    desktop
}

fn cell_desktop() -> Desktop {
    let mut desktop = Desktop::new(DesktopConfig::terminal(), Box::new(MemoryStore::seeded()));
    desktop.taskbar_mut().set_hostname("box");
    desktop.layout(Rect::new(0, 0, 100, 32));
    desktop
}

fn draw(desktop: &mut Desktop, terminal: &mut Terminal<TestBackend>) -> Vec<String> {
    terminal
        .draw(|f| {
            let mut frame = UiFrame::new(f);
            desktop.render(&mut frame);
        })
        .unwrap();
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    (0..area.height)
        .map(|y| (0..area.width).map(|x| buffer[(x, y)].symbol()).collect())
        .collect()
}

#[test]
fn dragging_past_left_edge_snaps_to_left_half() {
    let mut desktop = pixel_desktop();
    desktop.open(OpenRequest::new("w1", "/posts"));
    assert_eq!(desktop.registry().get("w1").unwrap().position, Point::new(250, 150));
    let now = Instant::now();
    // Header row: container row 151, screen row 152.
    assert!(desktop.handle_event(&down(400, 152), now));
    desktop.handle_event(&drag(70, 152), now);
    assert_eq!(
        desktop.snap_preview_rect(),
        Some(Rect::new(0, 1, 600, 800))
    );
    desktop.handle_event(&up(70, 152), now);
    assert_eq!(
        desktop.registry().get("w1").unwrap().geometry(),
        half_split_rect(Side::Left, Bounds::new(1200, 800), 0)
    );
    assert!(desktop.snap_preview_rect().is_none());
}

#[test]
fn dragging_into_header_area_is_clamped_below_it() {
    let mut desktop = pixel_desktop();
    desktop.open(OpenRequest::new("w1", "/posts"));
    let now = Instant::now();
    desktop.handle_event(&down(400, 152), now);
    desktop.handle_event(&drag(400, 2), now);
    desktop.handle_event(&up(400, 2), now);
    // drag margin 8 below the 38-unit header.
    assert_eq!(desktop.registry().get("w1").unwrap().position, Point::new(250, 46));
}

#[test]
fn east_border_resize_stops_at_minimum_width() {
    let mut desktop = pixel_desktop();
    desktop.open(OpenRequest::new("w1", "/posts"));
    let now = Instant::now();
    // Right border column of the 700-wide window at x=250.
    desktop.handle_event(&down(949, 400), now);
    desktop.handle_event(&drag(549, 400), now);
    desktop.handle_event(&up(549, 400), now);
    let w1 = desktop.registry().get("w1").unwrap();
    assert_eq!(w1.size, Size::new(350, 500));
    assert_eq!(w1.position, Point::new(250, 150));
}

#[test]
fn press_and_release_without_movement_keeps_geometry() {
    let mut desktop = pixel_desktop();
    desktop.open(OpenRequest::new("w1", "/posts"));
    let before = desktop.registry().get("w1").unwrap().geometry();
    let now = Instant::now();
    desktop.handle_event(&down(400, 152), now);
    desktop.handle_event(&up(400, 152), now);
    assert_eq!(desktop.registry().get("w1").unwrap().geometry(), before);
}

#[test]
fn double_click_on_header_maximizes_and_restores() {
    let mut desktop = pixel_desktop();
    desktop.open(OpenRequest::new("w1", "/posts"));
    let before = desktop.registry().get("w1").unwrap().geometry();
    let t0 = Instant::now();
    let t1 = t0 + Duration::from_millis(200);
    desktop.handle_event(&down(400, 152), t0);
    desktop.handle_event(&up(400, 152), t0);
    desktop.handle_event(&down(400, 152), t1);
    desktop.handle_event(&up(400, 152), t1);
    assert!(desktop.registry().is_maximized("w1"));
    assert_eq!(
        desktop.registry().get("w1").unwrap().geometry(),
        Geometry::new(Point::new(0, 0), Size::new(1200, 800))
    );

    // Maximized header now sits on screen row 2.
    let t2 = t1 + Duration::from_secs(2);
    let t3 = t2 + Duration::from_millis(100);
    desktop.handle_event(&down(400, 2), t2);
    desktop.handle_event(&up(400, 2), t2);
    desktop.handle_event(&down(400, 2), t3);
    desktop.handle_event(&up(400, 2), t3);
    assert_eq!(desktop.registry().get("w1").unwrap().geometry(), before);
}

#[test]
fn closing_a_window_mid_gesture_drops_capture() {
    let mut desktop = pixel_desktop();
    desktop.open(OpenRequest::new("w1", "/posts"));
    let now = Instant::now();
    desktop.handle_event(&down(400, 152), now);
    assert!(desktop.captured().is_some());
    desktop.close_all();
    assert!(desktop.captured().is_none());
    assert!(!desktop.handle_event(&drag(300, 100), now));
    assert!(desktop.registry().is_empty());
}

#[test]
fn render_shows_chrome_content_and_taskbar() {
    let mut desktop = cell_desktop();
    desktop.open(OpenRequest::new("about", "/about").title("About"));
    let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
    let rows = draw(&mut desktop, &mut terminal);
    let screen = rows.join("\n");
    assert!(screen.contains("A content site presented as a desktop."));
    assert!(rows[0].contains("About"), "menu bar shows focused title");
    assert!(rows[31].starts_with(" About "));
    assert!(rows[31].ends_with("[_][x]"));
}

#[test]
fn unknown_route_renders_placeholder_inside_window_only() {
    let mut desktop = cell_desktop();
    desktop.open(OpenRequest::new("lost", "/nowhere").title("Lost"));
    let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
    let screen = draw(&mut desktop, &mut terminal).join("\n");
    assert!(screen.contains("not found"));
    assert!(desktop.registry().contains("lost"));
}

#[test]
fn taskbar_entry_click_restores_minimized_window() {
    let mut desktop = cell_desktop();
    desktop.open(OpenRequest::new("posts", "/posts").title("Posts"));
    desktop.open(OpenRequest::new("about", "/about").title("About"));
    desktop.handle_action(Action::MinimizeWindow);
    assert!(desktop.registry().get("about").unwrap().minimized);

    let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
    let rows = draw(&mut desktop, &mut terminal);
    let column = rows[31].find("_About").unwrap() as u16;
    assert!(desktop.handle_event(&down(column, 31), Instant::now()));
    let about = desktop.registry().get("about").unwrap();
    assert!(!about.minimized);
    assert_eq!(about.z_index, 2);
    assert!(desktop.registry().is_focused("about"));
}

#[test]
fn history_buttons_follow_navigation() {
    let mut desktop = cell_desktop();
    desktop.open(OpenRequest::new("posts", "/posts").title("Posts"));
    desktop.navigate("posts", "/posts/hello-world");
    assert_eq!(desktop.registry().get("posts").unwrap().route, "/posts/hello-world");
    desktop.handle_action(Action::NavigateBack);
    assert_eq!(desktop.registry().get("posts").unwrap().route, "/posts");
    assert!(desktop.surface("posts").unwrap().history().can_go_forward());
    desktop.handle_action(Action::NavigateForward);
    assert_eq!(desktop.registry().get("posts").unwrap().route, "/posts/hello-world");
}
