use std::time::Duration;

use thiserror::Error;

use crate::constants::{
    CASCADE_STEP, CLOSE_TRANSITION_FRAMES, DEFAULT_SIZE, DOUBLE_CLICK_INTERVAL, DRAG_MARGIN,
    HEADER_HEIGHT, MAX_SIZE, MAXIMIZE_TOLERANCE, MIN_SIZE, MINIMIZE_HIGHLIGHT_FRAMES,
    MOBILE_BREAKPOINT, SNAP_THRESHOLD,
};
use crate::geometry::{Bounds, Size, SizeConstraints};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("minimum size {min} exceeds maximum size {max}")]
    InvertedConstraints { min: Size, max: Size },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i32 },
    #[error("default size {0} must be positive")]
    EmptyDefaultSize(Size),
    #[error("snap threshold must be zero or negative (got {0})")]
    PositiveSnapThreshold(i32),
}

/// Tunables for the registry and the gesture engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    pub default_size: Size,
    pub size_constraints: SizeConstraints,
    /// Margin used by registry placement, snapping and clamping.
    pub inset: i32,
    /// Margin used by the gesture engine while dragging or resizing.
    pub drag_margin: i32,
    /// Space reserved at the top of the container that drags cannot enter.
    pub header_height: i32,
    pub snap_threshold: i32,
    pub cascade_step: i32,
    pub maximize_tolerance: i32,
    pub mobile_breakpoint: i32,
    pub double_click: Duration,
    pub close_transition_frames: u16,
    pub minimize_highlight_frames: u16,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_SIZE,
            size_constraints: SizeConstraints::new(MIN_SIZE, MAX_SIZE),
            inset: 0,
            drag_margin: DRAG_MARGIN,
            header_height: HEADER_HEIGHT,
            snap_threshold: SNAP_THRESHOLD,
            cascade_step: CASCADE_STEP,
            maximize_tolerance: MAXIMIZE_TOLERANCE,
            mobile_breakpoint: MOBILE_BREAKPOINT,
            double_click: DOUBLE_CLICK_INTERVAL,
            close_transition_frames: CLOSE_TRANSITION_FRAMES,
            minimize_highlight_frames: MINIMIZE_HIGHLIGHT_FRAMES,
        }
    }
}

impl DesktopConfig {
    /// Preset for hosts where one unit is a terminal cell.
    ///
    /// The menu bar and taskbar live outside the container, so no header is
    /// reserved and drags may touch the container edges.
    pub fn terminal() -> Self {
        Self {
            default_size: Size::new(56, 16),
            size_constraints: SizeConstraints::new(Size::new(24, 6), Size::new(400, 200)),
            inset: 0,
            drag_margin: 0,
            header_height: 0,
            snap_threshold: -4,
            cascade_step: 2,
            maximize_tolerance: 0,
            mobile_breakpoint: 60,
            double_click: DOUBLE_CLICK_INTERVAL,
            close_transition_frames: 6,
            minimize_highlight_frames: 12,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = self.size_constraints;
        if !c.min.fits_within(c.max) {
            return Err(ConfigError::InvertedConstraints {
                min: c.min,
                max: c.max,
            });
        }
        for (field, value) in [
            ("inset", self.inset),
            ("drag_margin", self.drag_margin),
            ("header_height", self.header_height),
            ("cascade_step", self.cascade_step),
            ("maximize_tolerance", self.maximize_tolerance),
            ("min width", c.min.width),
            ("min height", c.min.height),
        ] {
            if value < 0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.default_size.width <= 0 || self.default_size.height <= 0 {
            return Err(ConfigError::EmptyDefaultSize(self.default_size));
        }
        if self.snap_threshold > 0 {
            return Err(ConfigError::PositiveSnapThreshold(self.snap_threshold));
        }
        Ok(())
    }

    pub fn is_mobile(&self, bounds: Bounds) -> bool {
        bounds.width <= self.mobile_breakpoint
    }

    /// Narrow `requested` so that its minimum always fits the container.
    ///
    /// On mobile-sized containers the minimum is additionally capped to 85% of
    /// the width and 70% of the height.
    pub fn effective_constraints(
        &self,
        requested: SizeConstraints,
        bounds: Option<Bounds>,
    ) -> SizeConstraints {
        let Some(bounds) = bounds else {
            return requested;
        };
        let available = bounds.available(self.inset);
        let mut min = requested.min.min(available);
        if self.is_mobile(bounds) {
            min = min.min(Size::new(
                (bounds.width as f64 * 0.85) as i32,
                (bounds.height as f64 * 0.7) as i32,
            ));
        }
        let max = Size::new(
            requested.max.width.max(min.width),
            requested.max.height.max(min.height),
        );
        SizeConstraints::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        assert_eq!(DesktopConfig::default().validate(), Ok(()));
        assert_eq!(DesktopConfig::terminal().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_inverted_constraints() {
        let mut cfg = DesktopConfig::default();
        cfg.size_constraints = SizeConstraints::new(Size::new(500, 500), Size::new(400, 600));
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvertedConstraints { .. })
        ));
        cfg = DesktopConfig::default();
        cfg.snap_threshold = 10;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::PositiveSnapThreshold(10))
        );
    }

    #[test]
    fn effective_constraints_shrink_minimum_to_container() {
        let cfg = DesktopConfig::default();
        let requested = cfg.size_constraints;
        let wide = cfg.effective_constraints(requested, Some(Bounds::new(1200, 800)));
        assert_eq!(wide, requested);

        let tiny = cfg.effective_constraints(requested, Some(Bounds::new(300, 200)));
        assert_eq!(tiny.min, Size::new(255, 140));
        assert!(tiny.min.fits_within(tiny.max));
    }

    #[test]
    fn effective_constraints_without_bounds_are_unchanged() {
        let cfg = DesktopConfig::default();
        assert_eq!(
            cfg.effective_constraints(cfg.size_constraints, None),
            cfg.size_constraints
        );
    }
}
