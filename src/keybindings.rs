use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::settings::KeybindingsConfig;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum KeyContext {
    Global,
    Timer,
    List,
}

impl KeyContext {
    pub const ALL: [Self; 3] = [Self::Global, Self::Timer, Self::List];
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum KeyAction {
    ToggleHelp,
    Quit,
    ToggleList,
    CycleFocus,
    CycleTheme,
    CycleNotifications,
    Dismiss,
    ToggleTimer,
    SwitchFocus,
    SwitchBreak,
    ResetTimer,
    SelectUp,
    SelectDown,
    ToggleItem,
    DeleteItem,
    FocusInput,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    fn matches(&self, key: KeyEvent) -> bool {
        match (&self.code, key.code) {
            (KeyCode::Char(left), KeyCode::Char(right)) => {
                let left = normalize_char(*left, self.modifiers);
                let right = normalize_char(right, key.modifiers);
                if left != right {
                    return false;
                }
                normalize_modifiers(self.modifiers) == normalize_modifiers(key.modifiers)
            }
            _ => self.code == key.code && self.modifiers == key.modifiers,
        }
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }

        parts.push(match self.code {
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(ch) => ch.to_string(),
            _ => "Unknown".to_string(),
        });

        write!(f, "{}", parts.join("+"))
    }
}

#[derive(Debug, Clone)]
pub struct ActionBinding {
    pub id: &'static str,
    pub action: KeyAction,
    pub description: &'static str,
    pub bindings: Vec<KeyBinding>,
}

#[derive(Debug, Clone)]
pub struct Keybindings {
    global: Vec<ActionBinding>,
    timer: Vec<ActionBinding>,
    list: Vec<ActionBinding>,
}

struct ActionDef {
    id: &'static str,
    action: KeyAction,
    description: &'static str,
    defaults: &'static [&'static str],
}

const GLOBAL_DEFS: &[ActionDef] = &[
    ActionDef {
        id: "toggle_help",
        action: KeyAction::ToggleHelp,
        description: "toggle help",
        defaults: &["?"],
    },
    ActionDef {
        id: "quit",
        action: KeyAction::Quit,
        description: "quit",
        defaults: &["q", "Ctrl+C"],
    },
    ActionDef {
        id: "toggle_list",
        action: KeyAction::ToggleList,
        description: "show/hide the task list",
        defaults: &["e"],
    },
    ActionDef {
        id: "cycle_focus",
        action: KeyAction::CycleFocus,
        description: "cycle focus",
        defaults: &["Tab"],
    },
    ActionDef {
        id: "cycle_theme",
        action: KeyAction::CycleTheme,
        description: "cycle theme",
        defaults: &["t"],
    },
    ActionDef {
        id: "cycle_notifications",
        action: KeyAction::CycleNotifications,
        description: "cycle completion notifications",
        defaults: &["n"],
    },
    ActionDef {
        id: "dismiss",
        action: KeyAction::Dismiss,
        description: "dismiss",
        defaults: &["Esc"],
    },
];

const TIMER_DEFS: &[ActionDef] = &[
    ActionDef {
        id: "toggle_timer",
        action: KeyAction::ToggleTimer,
        description: "start/pause the countdown",
        defaults: &["Space"],
    },
    ActionDef {
        id: "switch_focus",
        action: KeyAction::SwitchFocus,
        description: "switch to focus",
        defaults: &["f"],
    },
    ActionDef {
        id: "switch_break",
        action: KeyAction::SwitchBreak,
        description: "switch to break",
        defaults: &["b"],
    },
    ActionDef {
        id: "reset",
        action: KeyAction::ResetTimer,
        description: "reset to focus",
        defaults: &["r"],
    },
];

const LIST_DEFS: &[ActionDef] = &[
    ActionDef {
        id: "select_up",
        action: KeyAction::SelectUp,
        description: "select previous task",
        defaults: &["k", "Up"],
    },
    ActionDef {
        id: "select_down",
        action: KeyAction::SelectDown,
        description: "select next task",
        defaults: &["j", "Down"],
    },
    ActionDef {
        id: "toggle_item",
        action: KeyAction::ToggleItem,
        description: "complete/reopen task",
        defaults: &["x", "Enter"],
    },
    ActionDef {
        id: "delete_item",
        action: KeyAction::DeleteItem,
        description: "delete task",
        defaults: &["d", "Delete"],
    },
    ActionDef {
        id: "focus_input",
        action: KeyAction::FocusInput,
        description: "type a new task",
        defaults: &["i", "a"],
    },
];

impl Default for Keybindings {
    fn default() -> Self {
        Self::from_config(&KeybindingsConfig::default())
    }
}

impl Keybindings {
    pub fn from_config(config: &KeybindingsConfig) -> Self {
        let mut keybindings = Self {
            global: build_section(KeyContext::Global, GLOBAL_DEFS, &config.global),
            timer: build_section(KeyContext::Timer, TIMER_DEFS, &config.timer),
            list: build_section(KeyContext::List, LIST_DEFS, &config.list),
        };

        keybindings.validate_conflicts();
        keybindings
    }

    pub fn action_for_key(&self, context: KeyContext, key: KeyEvent) -> Option<KeyAction> {
        self.bindings_for(context)
            .iter()
            .find(|binding| {
                binding
                    .bindings
                    .iter()
                    .any(|candidate| candidate.matches(key))
            })
            .map(|binding| binding.action)
    }

    /// Resolves `key` against each context in order; the first hit wins.
    pub fn resolve(&self, contexts: &[KeyContext], key: KeyEvent) -> Option<KeyAction> {
        contexts
            .iter()
            .find_map(|context| self.action_for_key(*context, key))
    }

    pub fn help_lines(&self) -> Vec<String> {
        let mut lines = vec!["Keyboard shortcuts".to_string()];
        for (title, context) in [
            ("Timer", KeyContext::Timer),
            ("Task list", KeyContext::List),
            ("Global", KeyContext::Global),
        ] {
            lines.push(String::new());
            lines.push(title.to_string());
            for binding in self.bindings_for(context) {
                lines.push(format!(
                    "  {}: {}",
                    self.display_for(context, binding.action)
                        .unwrap_or_else(|| "-".to_string()),
                    binding.description
                ));
            }
        }
        lines.push(String::new());
        lines.push("Task input".to_string());
        lines.push("  Enter: add task".to_string());
        lines.push("  Esc: leave input".to_string());
        lines
    }

    pub fn display_for(&self, context: KeyContext, action: KeyAction) -> Option<String> {
        self.bindings_for(context)
            .iter()
            .find(|binding| binding.action == action)
            .map(|binding| {
                binding
                    .bindings
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" / ")
            })
    }

    fn bindings_for(&self, context: KeyContext) -> &[ActionBinding] {
        match context {
            KeyContext::Global => &self.global,
            KeyContext::Timer => &self.timer,
            KeyContext::List => &self.list,
        }
    }

    fn validate_conflicts(&mut self) {
        for context in KeyContext::ALL {
            let mut seen: HashMap<String, &'static str> = HashMap::new();
            for binding in self.bindings_for(context) {
                for key in &binding.bindings {
                    let key_name = key.to_string();
                    if let Some(first_action) = seen.get(&key_name) {
                        warn!(
                            "keybinding conflict in {:?}: '{}' used by '{}' and '{}' (first wins)",
                            context, key_name, first_action, binding.id
                        );
                    } else {
                        seen.insert(key_name, binding.id);
                    }
                }
            }
        }
    }
}

fn build_section(
    context: KeyContext,
    defs: &[ActionDef],
    overrides: &HashMap<String, Vec<String>>,
) -> Vec<ActionBinding> {
    let mut output = Vec::new();
    for def in defs {
        let source = overrides.get(def.id).cloned().unwrap_or_else(|| {
            def.defaults
                .iter()
                .map(|binding| binding.to_string())
                .collect()
        });

        let mut parsed = Vec::new();
        for raw in source {
            match parse_binding(&raw) {
                Some(binding) => parsed.push(binding),
                None => warn!(
                    "invalid keybinding '{}' for action '{}' in {:?}; ignoring",
                    raw, def.id, context
                ),
            }
        }

        if parsed.is_empty() {
            warn!(
                "no valid keybindings for action '{}' in {:?}; falling back to defaults",
                def.id, context
            );
            parsed = def
                .defaults
                .iter()
                .filter_map(|raw| parse_binding(raw))
                .collect();
        }

        output.push(ActionBinding {
            id: def.id,
            action: def.action,
            description: def.description,
            bindings: parsed,
        });
    }

    for id in overrides.keys() {
        if !defs.iter().any(|def| def.id == id) {
            warn!("unknown keybinding action '{}' in {:?}; ignoring", id, context);
        }
    }

    output
}

fn normalize_modifiers(mut modifiers: KeyModifiers) -> KeyModifiers {
    modifiers.remove(KeyModifiers::SHIFT);
    modifiers
}

fn normalize_char(ch: char, modifiers: KeyModifiers) -> char {
    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        ch.to_ascii_lowercase()
    } else {
        ch
    }
}

fn parse_binding(raw: &str) -> Option<KeyBinding> {
    let mut modifiers = KeyModifiers::empty();
    let mut key: Option<&str> = None;

    for part in raw.split('+').map(str::trim).filter(|s| !s.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.insert(KeyModifiers::CONTROL),
            "alt" => modifiers.insert(KeyModifiers::ALT),
            "shift" => modifiers.insert(KeyModifiers::SHIFT),
            _ => {
                if key.is_some() {
                    return None;
                }
                key = Some(part);
            }
        }
    }

    let key = key?;
    let lower = key.to_ascii_lowercase();
    let code = match lower.as_str() {
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "delete" | "del" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        _ if lower.starts_with('f') && lower.len() > 1 && lower.len() <= 3 => {
            let n = lower[1..].parse::<u8>().ok()?;
            KeyCode::F(n)
        }
        _ if key.chars().count() == 1 => {
            let ch = normalize_char(key.chars().next()?, modifiers);
            KeyCode::Char(ch)
        }
        _ => return None,
    };

    Some(KeyBinding { code, modifiers })
}
