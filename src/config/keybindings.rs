//! Key bindings, one list of key strings per action.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use tracing::warn;

use crate::tui::event::Action;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub page_up: Vec<String>,
    pub page_down: Vec<String>,
    pub jump_top: Vec<String>,
    pub jump_bottom: Vec<String>,
    pub next_pane: Vec<String>,
    pub prev_pane: Vec<String>,
    pub open_in_browser: Vec<String>,
    pub refresh: Vec<String>,
    pub retry: Vec<String>,
    pub search: Vec<String>,
    pub toggle_maximize: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            page_up: keys(&["PageUp"]),
            page_down: keys(&["PageDown"]),
            jump_top: keys(&["g", "Home"]),
            jump_bottom: keys(&["G", "End"]),
            next_pane: keys(&["Tab"]),
            prev_pane: keys(&["BackTab"]),
            open_in_browser: keys(&["o"]),
            refresh: keys(&["R"]),
            retry: keys(&["r"]),
            search: keys(&["/"]),
            toggle_maximize: keys(&["m"]),
        }
    }
}

impl KeybindingConfig {
    /// Resolve every configured string once. Unparseable entries are logged and skipped.
    pub fn keymap(&self) -> Keymap {
        let groups: [(Action, &[String]); 14] = [
            (Action::Quit, self.quit.as_slice()),
            (Action::MoveUp, self.move_up.as_slice()),
            (Action::MoveDown, self.move_down.as_slice()),
            (Action::PageUp, self.page_up.as_slice()),
            (Action::PageDown, self.page_down.as_slice()),
            (Action::JumpTop, self.jump_top.as_slice()),
            (Action::JumpBottom, self.jump_bottom.as_slice()),
            (Action::NextPane, self.next_pane.as_slice()),
            (Action::PrevPane, self.prev_pane.as_slice()),
            (Action::OpenInBrowser, self.open_in_browser.as_slice()),
            (Action::Refresh, self.refresh.as_slice()),
            (Action::Retry, self.retry.as_slice()),
            (Action::Search, self.search.as_slice()),
            (Action::ToggleMaximize, self.toggle_maximize.as_slice()),
        ];

        let mut bindings = Vec::new();
        for (action, strings) in groups {
            for raw in strings {
                match KeyBinding::parse(raw) {
                    Ok(binding) => bindings.push((binding, action)),
                    Err(e) => warn!("Ignoring key binding {:?}: {}", raw, e),
                }
            }
        }
        Keymap { bindings }
    }
}

/// Parsed bindings; the first match wins.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(KeyBinding, Action)>,
}

impl Keymap {
    pub fn action(&self, key: &KeyEvent) -> Action {
        self.bindings
            .iter()
            .find(|(binding, _)| binding.matches(key))
            .map_or(Action::None, |(_, action)| *action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Parse `"x"`, `"Enter"`, `"Ctrl+c"`, `"Alt+Shift+F5"` and similar.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        // "+" alone, or a trailing "+" as in "Ctrl++", names the plus key.
        let (prefix, key) = match raw.strip_suffix("++") {
            Some(prefix) => (Some(prefix), "+"),
            None if raw == "+" => (None, "+"),
            None => match raw.rsplit_once('+') {
                Some((prefix, key)) => (Some(prefix), key),
                None => (None, raw),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.into_iter().flat_map(|p| p.split('+')) {
            modifiers |= match part.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                other => return Err(format!("unknown modifier {:?}", other)),
            };
        }

        Ok(Self {
            code: key_code(key)?,
            modifiers,
        })
    }

    /// Shift is ignored when the binding does not ask for it, so `"G"`
    /// matches the Shift+g event terminals report.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if self.code != key.code {
            return false;
        }
        let pressed = if self.modifiers.contains(KeyModifiers::SHIFT) {
            key.modifiers
        } else {
            key.modifiers.difference(KeyModifiers::SHIFT)
        };
        pressed == self.modifiers
    }
}

fn key_code(key: &str) -> Result<KeyCode, String> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = key.to_ascii_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    Ok(match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        _ => return Err(format!("unknown key {:?}", key)),
    })
}
