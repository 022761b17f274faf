use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Action menu
    MenuClose,
    MenuUp,
    MenuDown,
    MenuActivate,
    // Chat list
    SelectPrev,
    SelectNext,
    OpenRowMenu,
    // Toasts
    ToastSuccess,
    ToastError,
    ToastWarning,
    ToastInfo,
    DismissAllToasts,
    ToggleDebugLog,
    // Confirm dialog navigation/actions
    ConfirmToggle,
    ConfirmLeft,
    ConfirmRight,
    ConfirmAccept,
    ConfirmCancel,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::MenuClose => "Close menu (Esc)",
            Action::MenuUp => "Menu up",
            Action::MenuDown => "Menu down",
            Action::MenuActivate => "Activate menu item",
            Action::SelectPrev => "Select previous chat",
            Action::SelectNext => "Select next chat",
            Action::OpenRowMenu => "Open chat actions",
            Action::ToastSuccess => "Show success toast",
            Action::ToastError => "Show error toast",
            Action::ToastWarning => "Show warning toast",
            Action::ToastInfo => "Show info toast",
            Action::DismissAllToasts => "Dismiss all toasts",
            Action::ToggleDebugLog => "Toggle debug log",
            Action::ConfirmToggle => "Confirm toggle (Tab)",
            Action::ConfirmLeft => "Confirm left",
            Action::ConfirmRight => "Confirm right",
            Action::ConfirmAccept => "Confirm accept",
            Action::ConfirmCancel => "Confirm cancel",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
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
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
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

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        kb.add(Quit, KeyCombo::plain(KeyCode::Char('q')));
        // Action menu
        kb.add(MenuClose, KeyCombo::plain(KeyCode::Esc));
        kb.add(MenuUp, KeyCombo::plain(KeyCode::Up));
        kb.add(MenuUp, KeyCombo::plain(KeyCode::Char('k')));
        kb.add(MenuDown, KeyCombo::plain(KeyCode::Down));
        kb.add(MenuDown, KeyCombo::plain(KeyCode::Char('j')));
        kb.add(MenuActivate, KeyCombo::plain(KeyCode::Enter));
        kb.add(MenuActivate, KeyCombo::plain(KeyCode::Char(' ')));
        // Chat list
        kb.add(SelectPrev, KeyCombo::plain(KeyCode::Up));
        kb.add(SelectPrev, KeyCombo::plain(KeyCode::Char('k')));
        kb.add(SelectNext, KeyCombo::plain(KeyCode::Down));
        kb.add(SelectNext, KeyCombo::plain(KeyCode::Char('j')));
        kb.add(OpenRowMenu, KeyCombo::plain(KeyCode::Char('m')));
        kb.add(OpenRowMenu, KeyCombo::new(KeyCode::F(10), KeyModifiers::SHIFT));
        // Toasts
        kb.add(ToastSuccess, KeyCombo::plain(KeyCode::Char('s')));
        kb.add(ToastError, KeyCombo::plain(KeyCode::Char('e')));
        kb.add(ToastWarning, KeyCombo::plain(KeyCode::Char('w')));
        kb.add(ToastInfo, KeyCombo::plain(KeyCode::Char('i')));
        kb.add(DismissAllToasts, KeyCombo::plain(KeyCode::Char('d')));
        kb.add(ToggleDebugLog, KeyCombo::plain(KeyCode::F(12)));
        // Confirm overlay
        kb.add(ConfirmToggle, KeyCombo::plain(KeyCode::Tab));
        kb.add(ConfirmToggle, KeyCombo::plain(KeyCode::BackTab));
        kb.add(ConfirmLeft, KeyCombo::plain(KeyCode::Left));
        kb.add(ConfirmRight, KeyCombo::plain(KeyCode::Right));
        kb.add(ConfirmAccept, KeyCombo::plain(KeyCode::Enter));
        kb.add(ConfirmCancel, KeyCombo::plain(KeyCode::Esc));
        kb
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    /// Return the first `KeyCombo` mapped to `action`, if any.
    pub fn first_combo(&self, action: Action) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }
}
