//! Shared crate-wide constants.
//!
//! Values are in pixel units and back the default `DesktopConfig`. The
//! terminal preset in `config.rs` scales them down to cells.

use std::time::Duration;

use crate::geometry::Size;

/// Size given to windows opened without an explicit size.
pub const DEFAULT_SIZE: Size = Size::new(700, 500);

pub const MIN_SIZE: Size = Size::new(350, 250);
pub const MAX_SIZE: Size = Size::new(2000, 2000);

/// Offset between a newly opened window and the topmost existing one.
pub const CASCADE_STEP: i32 = 10;

/// How far past the container edge (negative = outside) the window's left
/// edge must travel during a drag before the snap indicator lights up.
pub const SNAP_THRESHOLD: i32 = -50;

/// Margin the gesture engine keeps between a dragged window and the container.
pub const DRAG_MARGIN: i32 = 8;

/// Height reserved at the top of the container for the global menu bar.
pub const HEADER_HEIGHT: i32 = 38;

/// Animated geometry may land a little off the exact maximized rectangle.
pub const MAXIMIZE_TOLERANCE: i32 = 2;

/// Containers narrower than or equal to this are treated as mobile-sized.
pub const MOBILE_BREAKPOINT: i32 = 768;

/// Two header clicks within this interval count as a double click.
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// Frames an exiting window stays on screen before the close is committed.
pub const CLOSE_TRANSITION_FRAMES: u16 = 14;

/// Frames the taskbar entry stays highlighted after its window is minimized.
pub const MINIMIZE_HIGHLIGHT_FRAMES: u16 = 20;
