use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use super::{App, Focus, Message};

impl App {
    pub fn update(&mut self, message: Message) -> Result<()> {
        match message {
            Message::Key(key) => self.handle_key(key)?,
            Message::Mouse(mouse) => self.handle_mouse(mouse)?,
            Message::Tick => self.tick_at(Instant::now()),
            Message::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                self.interaction_map.clear();
                self.hovered_message = None;
            }
            Message::SwitchToFocus => {
                self.clear_notice();
                self.timer.switch_to_focus();
            }
            Message::SwitchToBreak => {
                self.clear_notice();
                self.timer.switch_to_break();
            }
            Message::ResetTimer => {
                self.clear_notice();
                self.timer.reset();
            }
            Message::ToggleTimer => {
                self.clear_notice();
                self.timer.toggle();
            }
            Message::ToggleTodoList => {
                if self.todos.toggle_visibility() {
                    self.focus = Focus::Input;
                } else {
                    self.focus = Focus::Timer;
                }
            }
            Message::SubmitTodo => {
                let text = self.todo_input.trim();
                if text.is_empty() {
                    debug!("ignoring blank todo submission");
                    return Ok(());
                }
                let text = text.to_string();
                self.todos.add_item(text);
                self.todo_input.clear();
            }
            Message::ToggleTodo(id) => {
                self.todos.toggle_item(id);
            }
            Message::DeleteTodo(id) => {
                self.todos.delete_item(id);
                self.clamp_selection();
            }
            Message::SelectTodo(id) => {
                if let Some(position) = self.todos.position(id) {
                    self.selected_row = position;
                    self.focus = Focus::List;
                }
            }
            Message::SelectUp => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            Message::SelectDown => {
                let max_index = self.todos.len().saturating_sub(1);
                self.selected_row = (self.selected_row + 1).min(max_index);
            }
            Message::FocusInput => {
                if !self.todos.is_open() {
                    self.todos.toggle_visibility();
                }
                self.focus = Focus::Input;
            }
            Message::CycleFocus => {
                let mut next = self.focus.next(self.todos.is_open());
                if next == Focus::List && self.todos.is_empty() {
                    next = next.next(true);
                }
                self.focus = next;
            }
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::CycleTheme => self.cycle_theme(),
            Message::CycleNotifications => self.cycle_notifications(),
            Message::Dismiss => {
                if self.show_help {
                    self.show_help = false;
                } else if self.focus == Focus::Input {
                    self.focus = if self.todos.is_empty() {
                        Focus::Timer
                    } else {
                        Focus::List
                    };
                } else if self.footer_notice.is_some() {
                    self.clear_notice();
                } else if self.focus == Focus::List {
                    self.focus = Focus::Timer;
                }
            }
            Message::Quit => self.should_quit = true,
        }
        Ok(())
    }
}
