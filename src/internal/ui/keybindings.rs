use crate::config::KeyBindingConfig;
use crate::internal::ui::app::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps key events to actions
#[derive(Debug, Clone, Default)]
pub struct KeyBindingMap {
    bindings: HashMap<KeyEvent, Action>,
}

impl KeyBindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings used when no config overrides them: Right advances, `q`/Esc/Ctrl+C
    /// quit, `?` toggles help.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.add_binding(key_code(KeyCode::Right), Action::Advance);
        map.add_binding(key_code(KeyCode::Char('q')), Action::Quit);
        map.add_binding(key_code(KeyCode::Esc), Action::Quit);
        map.add_binding(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Action::Quit,
        );
        map.add_binding(key_code(KeyCode::Char('?')), Action::ToggleHelp);
        map
    }

    pub fn get_action(&self, key: &KeyEvent) -> Option<Action> {
        // Terminals report some shifted characters with SHIFT set; match both forms.
        self.bindings.get(key).cloned().or_else(|| {
            let plain = KeyEvent::new(key.code, key.modifiers.difference(KeyModifiers::SHIFT));
            self.bindings.get(&plain).cloned()
        })
    }

    pub fn add_binding(&mut self, key: KeyEvent, action: Action) {
        self.bindings.insert(key, action);
    }

    /// Apply bindings from configuration on top of the current ones.
    pub fn merge_config(&mut self, config: &KeyBindingConfig) {
        for (key_str, action) in &config.bindings {
            match parse_key_str(key_str) {
                Some(key_event) => self.add_binding(key_event, action.clone()),
                None => tracing::warn!("Invalid key string in config: {}", key_str),
            }
        }
    }

    /// Keys bound to `action`, formatted for display and sorted.
    pub fn keys_for(&self, action: &Action) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| *a == action)
            .map(|(k, _)| format_key(k))
            .collect();
        keys.sort();
        keys
    }
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

/// Parse a key string into a KeyEvent
/// Supported formats:
/// - Single char: "j", "k", "1"
/// - Special keys: "Enter", "Tab", "Esc", "Up", "Down", "Left", "Right", "Space"
/// - With modifiers: "Ctrl+C", "Shift+Tab"
pub fn parse_key_str(key_str: &str) -> Option<KeyEvent> {
    let (modifier_parts, key_part) = match key_str.rsplit_once('+') {
        // A bare "+" is the plus key itself.
        Some((mods, key)) if !key.is_empty() => (Some(mods), key),
        _ => (None, key_str),
    };

    let mut modifiers = KeyModifiers::empty();
    for modifier in modifier_parts.into_iter().flat_map(|m| m.split('+')) {
        match modifier.to_lowercase().as_str() {
            "ctrl" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let code = match key_part {
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "Esc" => KeyCode::Esc,
        "Space" => KeyCode::Char(' '),
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Backspace" => KeyCode::Backspace,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };

    Some(KeyEvent::new(code, modifiers))
}

/// Inverse of [`parse_key_str`] for the keys it understands.
pub fn format_key(key: &KeyEvent) -> String {
    let mut out = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        out.push_str("Ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        out.push_str("Alt+");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        out.push_str("Shift+");
    }
    match key.code {
        KeyCode::Char(' ') => out.push_str("Space"),
        KeyCode::Char(c) => out.push(c),
        KeyCode::Enter => out.push_str("Enter"),
        KeyCode::Tab => out.push_str("Tab"),
        KeyCode::Esc => out.push_str("Esc"),
        KeyCode::Up => out.push_str("Up"),
        KeyCode::Down => out.push_str("Down"),
        KeyCode::Left => out.push_str("Left"),
        KeyCode::Right => out.push_str("Right"),
        KeyCode::Backspace => out.push_str("Backspace"),
        KeyCode::Home => out.push_str("Home"),
        KeyCode::End => out.push_str("End"),
        KeyCode::PageUp => out.push_str("PageUp"),
        KeyCode::PageDown => out.push_str("PageDown"),
        other => out.push_str(&format!("{other:?}")),
    }
    out
}
