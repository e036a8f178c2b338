/// Linear back/forward history of the routes visited inside one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavHistory {
    routes: Vec<String>,
    cursor: usize,
}

impl NavHistory {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            routes: vec![route.into()],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.routes[self.cursor]
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.routes.len()
    }

    /// Drop any forward entries, append `route` and move onto it.
    /// Navigating to the current route is a no-op.
    pub fn navigate(&mut self, route: impl Into<String>) {
        let route = route.into();
        if self.current() == route {
            return;
        }
        self.routes.truncate(self.cursor + 1);
        self.routes.push(route);
        self.cursor = self.routes.len() - 1;
    }

    pub fn go_back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn go_forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    /// Reconcile with the window's route after it changed elsewhere.
    ///
    /// Changes that came from our own back/forward moves are already reflected
    /// by the cursor and are not pushed again.
    pub fn sync(&mut self, route: &str, from_history: bool) {
        if from_history {
            return;
        }
        self.navigate(route);
    }
}
