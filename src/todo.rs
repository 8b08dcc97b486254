//! Ordered to-do list with a derived "next pending task" projection.

use std::fmt;

use chrono::{DateTime, Local};
use tracing::debug;

pub const PLAN_PLACEHOLDER: &str = "Plans for today?";

/// Identifier allocated by the owning [`TodoList`]. Monotonic, never reused.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TodoId(u64);

impl TodoId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub struct TodoList {
    items: Vec<TodoItem>,
    is_open: bool,
    next_id: u64,
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoList {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            is_open: false,
            next_id: 1,
        }
    }

    /// Appends a pending task. Callers are expected to pass trimmed,
    /// non-empty text.
    pub fn add_item(&mut self, text: impl Into<String>) -> TodoId {
        let id = TodoId(self.next_id);
        self.next_id += 1;
        let text = text.into();
        debug!(%id, text = %text, "todo added");
        self.items.push(TodoItem {
            id,
            text,
            completed: false,
            created_at: Local::now(),
        });
        id
    }

    pub fn toggle_item(&mut self, id: TodoId) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.completed = !item.completed;
                debug!(%id, completed = item.completed, "todo toggled");
                true
            }
            None => false,
        }
    }

    pub fn delete_item(&mut self, id: TodoId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            debug!(%id, "todo deleted");
        }
        removed
    }

    pub fn next_pending(&self) -> Option<&TodoItem> {
        self.items.iter().find(|item| !item.completed)
    }

    pub fn has_task(&self) -> bool {
        self.next_pending().is_some()
    }

    pub fn plan_text(&self) -> &str {
        self.next_pending()
            .map(|item| item.text.as_str())
            .unwrap_or(PLAN_PLACEHOLDER)
    }

    /// Flips list visibility and returns whether the list is now open.
    pub fn toggle_visibility(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
