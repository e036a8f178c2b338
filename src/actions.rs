use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Quit,
    // Focus
    CycleNextWindow,
    CyclePrevWindow,
    // Focused window
    SnapLeft,
    SnapRight,
    ToggleMaximize,
    MinimizeWindow,
    CloseWindow,
    NavigateBack,
    NavigateForward,
    // Desktop
    CloseAll,
    OpenSearch,
    OpenPosts,
    OpenQuestions,
    OpenAbout,
}

impl Action {
    /// True for actions that operate on the focused window.
    pub fn targets_focused(self) -> bool {
        matches!(
            self,
            Action::SnapLeft
                | Action::SnapRight
                | Action::ToggleMaximize
                | Action::MinimizeWindow
                | Action::CloseWindow
                | Action::NavigateBack
                | Action::NavigateForward
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::CycleNextWindow => "Cycle next window",
            Action::CyclePrevWindow => "Cycle previous window",
            Action::SnapLeft => "Snap to left half",
            Action::SnapRight => "Snap to right half",
            Action::ToggleMaximize => "Maximize / restore",
            Action::MinimizeWindow => "Minimize",
            Action::CloseWindow => "Close window",
            Action::NavigateBack => "Back",
            Action::NavigateForward => "Forward",
            Action::CloseAll => "Close all windows",
            Action::OpenSearch => "Search",
            Action::OpenPosts => "Open posts",
            Action::OpenQuestions => "Open questions",
            Action::OpenAbout => "Open about",
        };
        write!(f, "{}", s)
    }
}
