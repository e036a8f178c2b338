use crate::ui::UiFrame;
use ratatui::backend::Backend;
use std::io;

/// Screen the desktop draws into.
///
/// The host loop calls `enter` once before the first frame and `exit` on the
/// way out; every redraw hands the desktop a fresh [`UiFrame`] through `draw`.
/// Repeated `enter` or `exit` calls are no-ops.
pub trait OutputDriver {
    type Backend: Backend;

    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>);
}
