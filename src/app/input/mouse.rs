use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, InteractionKind, Message};

impl App {
    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.hovered_message = None;
                let hit = self.interaction_map.resolve_message(
                    mouse.column,
                    mouse.row,
                    InteractionKind::LeftClick,
                );
                if let Some(message) = hit {
                    self.update(message)?;
                }
            }
            MouseEventKind::Moved => {
                self.hovered_message = self.interaction_map.resolve_message(
                    mouse.column,
                    mouse.row,
                    InteractionKind::Hover,
                );
            }
            MouseEventKind::ScrollDown if self.todos.is_open() && !self.show_help => {
                self.update(Message::SelectDown)?;
            }
            MouseEventKind::ScrollUp if self.todos.is_open() && !self.show_help => {
                self.update(Message::SelectUp)?;
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use tuirealm::ratatui::layout::Rect;

    use crate::app::{App, InteractionLayer, Message};
    use crate::timer::Phase;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn left_click_dispatches_registered_message() {
        let mut app = App::default();
        app.interaction_map.register_click(
            InteractionLayer::Base,
            Rect::new(0, 0, 10, 3),
            Message::ToggleTimer,
        );

        app.update(Message::Mouse(mouse(
            MouseEventKind::Down(MouseButton::Left),
            4,
            1,
        )))
        .expect("click");
        assert_eq!(app.timer.phase(), Phase::RunningFocus);
    }

    #[test]
    fn hover_tracks_message_under_cursor() {
        let mut app = App::default();
        app.interaction_map.register_click(
            InteractionLayer::Base,
            Rect::new(5, 5, 4, 1),
            Message::ResetTimer,
        );

        app.update(Message::Mouse(mouse(MouseEventKind::Moved, 6, 5)))
            .expect("hover");
        assert_eq!(app.hovered_message, Some(Message::ResetTimer));

        app.update(Message::Mouse(mouse(MouseEventKind::Moved, 0, 0)))
            .expect("hover");
        assert_eq!(app.hovered_message, None);
    }
}
