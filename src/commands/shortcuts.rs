//! Keyboard commands and shortcut capture

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Command name prefix; the rest of the name is an engine id
pub const COMMAND_PREFIX: &str = "switch-to-";

/// Shortcuts the commands ship with
pub const DEFAULT_SHORTCUTS: &[(&str, &str)] = &[
    ("switch-to-google", "Ctrl+Shift+G"),
    ("switch-to-baidu", "Ctrl+Shift+B"),
    ("switch-to-bing", "Ctrl+Shift+M"),
];

const MODIFIER_KEYS: &[&str] = &["Control", "Alt", "Shift", "Meta"];

/// Command name for switching to an engine
pub fn command_name(engine_id: &str) -> String {
    format!("{}{}", COMMAND_PREFIX, engine_id)
}

/// Engine id targeted by a command, if it is a switch command
pub fn parse_command(command: &str) -> Option<&str> {
    command
        .strip_prefix(COMMAND_PREFIX)
        .filter(|id| !id.is_empty())
}

pub fn default_shortcut(command: &str) -> Option<&'static str> {
    DEFAULT_SHORTCUTS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, shortcut)| *shortcut)
}

/// Shortcuts in effect: defaults overlaid by stored overrides.
///
/// An empty override removes the command's shortcut.
pub fn effective_shortcuts(overrides: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut shortcuts: BTreeMap<String, String> = DEFAULT_SHORTCUTS
        .iter()
        .map(|(name, shortcut)| (name.to_string(), shortcut.to_string()))
        .collect();

    for (command, shortcut) in overrides {
        if shortcut.is_empty() {
            shortcuts.remove(command);
        } else {
            shortcuts.insert(command.clone(), shortcut.clone());
        }
    }

    shortcuts
}

/// A key press while a shortcut field is being recorded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    /// Key name as reported by the browser (`"k"`, `"F5"`, `"Shift"`...)
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// What a key press does to the shortcut being recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutInput {
    /// Stop recording, keep the current value
    Cancel,
    /// Remove the shortcut
    Clear,
    /// Modifier alone, keep waiting
    Ignore,
    /// New shortcut string
    Set(String),
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Parse a shortcut string such as `Ctrl+Shift+K`
    pub fn parse(shortcut: &str) -> Option<Self> {
        let mut press = KeyPress::default();

        for part in shortcut.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => press.ctrl = true,
                "alt" | "option" => press.alt = true,
                "shift" => press.shift = true,
                "command" | "cmd" | "meta" => press.meta = true,
                _ if press.key.is_empty() => press.key = part.to_string(),
                _ => return None,
            }
        }

        if press.key.is_empty() {
            None
        } else {
            Some(press)
        }
    }

    /// Interpret the key press
    pub fn to_input(&self) -> ShortcutInput {
        match self.key.as_str() {
            "Escape" => return ShortcutInput::Cancel,
            "Backspace" | "Delete" => return ShortcutInput::Clear,
            "" => return ShortcutInput::Ignore,
            key if MODIFIER_KEYS.contains(&key) => return ShortcutInput::Ignore,
            _ => {}
        }

        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        if self.meta {
            parts.push("Command".to_string());
        }

        let key = if self.key.chars().count() == 1 {
            self.key.to_uppercase()
        } else {
            self.key.clone()
        };
        parts.push(key);

        ShortcutInput::Set(parts.join("+"))
    }
}

/// Shortcut edits in progress, one entry per command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutDraft {
    entries: BTreeMap<String, String>,
}

impl ShortcutDraft {
    /// Start editing from the shortcuts currently in effect for `commands`
    pub fn new<'a, I>(commands: I, overrides: &BTreeMap<String, String>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let effective = effective_shortcuts(overrides);
        let entries = commands
            .into_iter()
            .map(|command| {
                let shortcut = effective.get(command).cloned().unwrap_or_default();
                (command.to_string(), shortcut)
            })
            .collect();

        Self { entries }
    }

    /// Feed a key press to the field of `command`
    pub fn apply(&mut self, command: &str, press: &KeyPress) -> ShortcutInput {
        let input = press.to_input();
        match &input {
            ShortcutInput::Set(shortcut) => {
                self.entries.insert(command.to_string(), shortcut.clone());
            }
            ShortcutInput::Clear => {
                self.entries.insert(command.to_string(), String::new());
            }
            ShortcutInput::Cancel | ShortcutInput::Ignore => {}
        }
        input
    }

    pub fn clear(&mut self, command: &str) {
        self.entries.insert(command.to_string(), String::new());
    }

    /// Shortcut currently shown for `command`; empty means none
    pub fn get(&self, command: &str) -> Option<&str> {
        self.entries.get(command).map(String::as_str)
    }

    /// Entries differing from the shipped defaults, ready to be stored
    pub fn overrides(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter(|(command, shortcut)| {
                default_shortcut(command).unwrap_or("") != shortcut.as_str()
            })
            .map(|(command, shortcut)| (command.clone(), shortcut.clone()))
            .collect()
    }
}
