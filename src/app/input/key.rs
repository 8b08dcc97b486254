use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Focus, Message};
use crate::keybindings::{KeyAction, KeyContext};

impl App {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }

        if self.show_help {
            match self.keybindings.action_for_key(KeyContext::Global, key) {
                Some(KeyAction::ToggleHelp | KeyAction::Dismiss) => self.show_help = false,
                Some(KeyAction::Quit) => self.update(Message::Quit)?,
                _ => {}
            }
            return Ok(());
        }

        if self.focus == Focus::Input {
            return self.handle_input_key(key);
        }

        let Some(action) = self.keybindings.resolve(self.focus.key_contexts(), key) else {
            return Ok(());
        };

        let message = match action {
            KeyAction::ToggleHelp => Message::ToggleHelp,
            KeyAction::Quit => Message::Quit,
            KeyAction::ToggleList => Message::ToggleTodoList,
            KeyAction::CycleFocus => Message::CycleFocus,
            KeyAction::CycleTheme => Message::CycleTheme,
            KeyAction::CycleNotifications => Message::CycleNotifications,
            KeyAction::Dismiss => Message::Dismiss,
            KeyAction::ToggleTimer => Message::ToggleTimer,
            KeyAction::SwitchFocus => Message::SwitchToFocus,
            KeyAction::SwitchBreak => Message::SwitchToBreak,
            KeyAction::ResetTimer => Message::ResetTimer,
            KeyAction::SelectUp => Message::SelectUp,
            KeyAction::SelectDown => Message::SelectDown,
            KeyAction::FocusInput => Message::FocusInput,
            KeyAction::ToggleItem => match self.selected_todo() {
                Some(id) => Message::ToggleTodo(id),
                None => return Ok(()),
            },
            KeyAction::DeleteItem => match self.selected_todo() {
                Some(id) => Message::DeleteTodo(id),
                None => return Ok(()),
            },
        };

        self.update(message)
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if self.keybindings.action_for_key(KeyContext::Global, key) == Some(KeyAction::Quit) {
                self.update(Message::Quit)?;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Enter => self.update(Message::SubmitTodo)?,
            KeyCode::Esc => self.update(Message::Dismiss)?,
            KeyCode::Tab => self.update(Message::CycleFocus)?,
            KeyCode::Backspace => {
                self.todo_input.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.todo_input.push(ch);
            }
            _ => {}
        }
        Ok(())
    }
}
