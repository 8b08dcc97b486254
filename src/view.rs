//! Pure projections from controller state to what the screen shows.

use crate::timer::{Mode, ModeButton, TickSource, TimerController};
use crate::todo::{TodoId, TodoList};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TimerView {
    pub minutes: String,
    pub seconds: String,
    pub mode: Mode,
    pub running: bool,
    pub focus_button: ModeButton,
    pub break_button: ModeButton,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PlanView {
    pub text: String,
    pub has_task: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TodoRowView {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TodoListView {
    pub open: bool,
    pub rows: Vec<TodoRowView>,
}

pub fn timer_view<S: TickSource>(timer: &TimerController<S>) -> TimerView {
    let clock = timer.clock();
    TimerView {
        minutes: clock.minutes_text(),
        seconds: clock.seconds_text(),
        mode: timer.mode(),
        running: timer.is_running(),
        focus_button: timer.button(Mode::Focus),
        break_button: timer.button(Mode::Break),
    }
}

pub fn plan_view(todos: &TodoList) -> PlanView {
    PlanView {
        text: todos.plan_text().to_string(),
        has_task: todos.has_task(),
    }
}

pub fn todo_list_view(todos: &TodoList) -> TodoListView {
    TodoListView {
        open: todos.is_open(),
        rows: todos
            .items()
            .iter()
            .map(|item| TodoRowView {
                id: item.id,
                text: item.text.clone(),
                completed: item.completed,
            })
            .collect(),
    }
}
