use crossterm::event::{KeyEvent, MouseEvent};

use crate::todo::TodoId;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Message {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
    Resize(u16, u16),
    SwitchToFocus,
    SwitchToBreak,
    ResetTimer,
    ToggleTimer,
    ToggleTodoList,
    SubmitTodo,
    ToggleTodo(TodoId),
    DeleteTodo(TodoId),
    SelectTodo(TodoId),
    SelectUp,
    SelectDown,
    FocusInput,
    CycleFocus,
    ToggleHelp,
    CycleTheme,
    CycleNotifications,
    Dismiss,
    Quit,
}
