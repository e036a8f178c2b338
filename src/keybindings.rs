use std::collections::BTreeMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::actions::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Key combos per action. Keys are kept unique across actions.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    map: BTreeMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        kb.add(Quit, KeyCombo::plain('q'));
        kb.add(
            CycleNextWindow,
            KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE),
        );
        // Terminals disagree on whether BackTab carries SHIFT.
        kb.add(
            CyclePrevWindow,
            KeyCombo::new(KeyCode::BackTab, KeyModifiers::NONE),
        );
        kb.add(
            CyclePrevWindow,
            KeyCombo::new(KeyCode::BackTab, KeyModifiers::SHIFT),
        );
        kb.add(SnapLeft, KeyCombo::plain('['));
        kb.add(SnapRight, KeyCombo::plain(']'));
        kb.add(ToggleMaximize, KeyCombo::plain('m'));
        kb.add(MinimizeWindow, KeyCombo::plain('z'));
        kb.add(CloseWindow, KeyCombo::plain('x'));
        kb.add(
            CloseAll,
            KeyCombo::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
        );
        kb.add(NavigateBack, KeyCombo::plain('b'));
        kb.add(
            NavigateBack,
            KeyCombo::new(KeyCode::Left, KeyModifiers::ALT),
        );
        kb.add(NavigateForward, KeyCombo::plain('f'));
        kb.add(
            NavigateForward,
            KeyCombo::new(KeyCode::Right, KeyModifiers::ALT),
        );
        kb.add(OpenSearch, KeyCombo::plain('/'));
        kb.add(OpenPosts, KeyCombo::plain('p'));
        kb.add(OpenQuestions, KeyCombo::plain('c'));
        kb.add(OpenAbout, KeyCombo::plain('a'));
        kb
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.map
            .iter()
            .find(|(_, list)| list.iter().any(|c| c.matches(key)))
            .map(|(act, _)| *act)
    }

    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        self.map
            .iter()
            .map(|(act, list)| (*act, list.iter().map(|c| c.display()).collect()))
            .collect()
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}
