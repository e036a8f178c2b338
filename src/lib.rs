//! A desktop of floating windows for browsing a content site.
//!
//! Every page of the site opens in its own window: windows can be moved,
//! resized along any edge, snapped to one half of the container, minimized
//! to the taskbar and maximized. [`window::WindowRegistry`] holds the
//! authoritative window collection; [`desktop::Desktop`] wires it to
//! terminal input and rendering.
pub mod actions;
pub mod backend;
pub mod config;
pub mod constants;
pub mod desktop;
pub mod drivers;
pub mod event_loop;
pub mod geometry;
pub mod gesture;
pub mod keybindings;
pub mod router;
pub mod taskbar;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
