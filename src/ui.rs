use tuirealm::ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, Focus, InteractionLayer, Message, interaction::InteractionNode};
use crate::keybindings::{KeyAction, KeyContext};
use crate::timer::Mode;
use crate::view::{TimerView, TodoRowView};

const CONTENT_WIDTH: u16 = 52;
const BUTTON_WIDTH: u16 = 11;
const EDIT_LIST_LABEL: &str = "EDIT LIST";
const RESET_LABEL: &str = "RESET";
const CHECKBOX_WIDTH: u16 = 4;
const DELETE_WIDTH: u16 = 3;

pub fn render(frame: &mut Frame<'_>, app: &mut App) {
    app.interaction_map.clear();

    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.base.canvas)),
        area,
    );

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header, app);
    render_body(frame, body, app);
    render_footer(frame, footer, app);

    if app.show_help {
        render_help(frame, area, app);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = &app.theme;
    let mode = app.timer.mode();
    let left = Paragraph::new(Line::from(Span::styled(
        " pomodoro-todo ",
        Style::default()
            .fg(theme.base.header)
            .add_modifier(Modifier::BOLD),
    )));
    let right = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("sessions {} ", app.completed_sessions),
            Style::default().fg(theme.base.text_muted),
        ),
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(theme.mode_accent(mode)),
        ),
    ]))
    .alignment(Alignment::Right);

    frame.render_widget(left, area);
    frame.render_widget(right, area);
}

fn render_body(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let [column] = Layout::horizontal([Constraint::Length(CONTENT_WIDTH.min(area.width))])
        .flex(Flex::Center)
        .areas(area);

    let [_, buttons, clock, plan, _, edit, list] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(column);

    let timer = app.timer_view();
    render_mode_buttons(frame, buttons, app, &timer);
    render_clock(frame, clock, app, &timer);
    render_plan(frame, plan, app);
    render_edit_button(frame, edit, app);

    if app.todos.is_open() {
        render_todo_list(frame, list, app);
    }
}

fn render_mode_buttons(frame: &mut Frame<'_>, area: Rect, app: &mut App, timer: &TimerView) {
    let slots = Layout::horizontal([Constraint::Length(BUTTON_WIDTH); 3])
        .flex(Flex::Center)
        .spacing(1)
        .split(area);

    let buttons = [
        (Mode::Focus, &timer.focus_button, Message::SwitchToFocus),
        (Mode::Break, &timer.break_button, Message::SwitchToBreak),
    ];
    for (slot, (mode, button, message)) in slots.iter().zip(buttons) {
        let colors = app.theme.mode_button(mode, button.active);
        let mut style = Style::default().fg(colors.foreground).bg(colors.background);
        if button.active {
            style = style.add_modifier(Modifier::BOLD);
        }
        render_button(frame, *slot, app, button.label, style, message);
    }

    let reset_style = Style::default().fg(app.theme.base.text);
    render_button(
        frame,
        slots[2],
        app,
        RESET_LABEL,
        reset_style,
        Message::ResetTimer,
    );
}

fn render_button(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &mut App,
    label: &str,
    style: Style,
    message: Message,
) {
    let hovered = app.hovered_message.as_ref() == Some(&message);
    let border_color = if hovered {
        app.theme.interactive.focus
    } else {
        app.theme.interactive.border
    };
    let button = Paragraph::new(Line::from(Span::styled(label.to_string(), style)))
        .alignment(Alignment::Center)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color)),
        );
    frame.render_widget(button, area);
    app.interaction_map
        .register_click(InteractionLayer::Base, area, message);
}

fn render_clock(frame: &mut Frame<'_>, area: Rect, app: &mut App, timer: &TimerView) {
    let theme = &app.theme;
    let accent = theme.mode_accent(timer.mode);
    let toggle_key = app
        .keybindings
        .display_for(KeyContext::Timer, KeyAction::ToggleTimer)
        .unwrap_or_else(|| "click".to_string());
    let status = if timer.running {
        format!("running  ({toggle_key} to pause)")
    } else {
        format!("paused  ({toggle_key} to start)")
    };
    let border_type = if app.hovered_message == Some(Message::ToggleTimer) {
        BorderType::Double
    } else {
        BorderType::Rounded
    };

    let clock = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            format!("{}:{}", timer.minutes, timer.seconds),
            Style::default()
                .fg(theme.clock_color(timer.running))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            status,
            Style::default().fg(theme.base.text_muted),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(accent))
            .title(format!(" {} ", timer.mode.label()))
            .title_alignment(Alignment::Center),
    );

    frame.render_widget(clock, area);
    app.interaction_map
        .register_click(InteractionLayer::Base, area, Message::ToggleTimer);
}

fn render_plan(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let plan = app.plan_view();
    let mut style = Style::default().fg(app.theme.plan_color(plan.has_task));
    style = if plan.has_task {
        style.add_modifier(Modifier::BOLD)
    } else {
        style.add_modifier(Modifier::ITALIC)
    };
    let label = Paragraph::new(Line::from(Span::styled(plan.text, style)))
        .alignment(Alignment::Center);
    frame.render_widget(label, area);
}

fn render_edit_button(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let label = format!("[ {EDIT_LIST_LABEL} ]");
    let [slot] = Layout::horizontal([Constraint::Length(label.chars().count() as u16)])
        .flex(Flex::Center)
        .areas(area);

    let mut style = Style::default().fg(app.theme.base.header);
    if app.todos.is_open() {
        style = style.add_modifier(Modifier::BOLD);
    }
    if app.hovered_message == Some(Message::ToggleTodoList) {
        style = style.add_modifier(Modifier::UNDERLINED);
    }

    frame.render_widget(Paragraph::new(Span::styled(label, style)), slot);
    app.interaction_map
        .register_click(InteractionLayer::Base, slot, Message::ToggleTodoList);
}

fn render_todo_list(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    if area.height < 3 {
        return;
    }

    let list = app.todo_list_view();
    let focused = matches!(app.focus, Focus::Input | Focus::List);
    let border_color = if focused {
        app.theme.interactive.focus
    } else {
        app.theme.interactive.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(format!(" Tasks ({}) ", list.rows.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [input, rows_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
    render_todo_input(frame, input, app);

    if list.rows.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No tasks yet",
            Style::default().fg(app.theme.base.text_muted),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(empty, rows_area);
        return;
    }

    let visible = rows_area.height as usize;
    let offset = if app.selected_row >= visible {
        app.selected_row + 1 - visible
    } else {
        0
    };

    for (index, row) in list.rows.iter().enumerate().skip(offset).take(visible) {
        let row_area = Rect::new(
            rows_area.x,
            rows_area.y + (index - offset) as u16,
            rows_area.width,
            1,
        );
        let selected = app.focus == Focus::List && index == app.selected_row;
        render_todo_row(frame, row_area, app, row, selected);
    }
}

fn render_todo_input(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let editing = app.focus == Focus::Input;
    let mut spans = vec![Span::styled(
        "> ",
        Style::default().fg(if editing {
            theme.interactive.focus
        } else {
            theme.base.text_muted
        }),
    )];

    if app.todo_input.is_empty() && !editing {
        spans.push(Span::styled(
            "add a task",
            Style::default()
                .fg(theme.base.text_muted)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        spans.push(Span::styled(
            app.todo_input.clone(),
            Style::default().fg(theme.base.text),
        ));
    }
    if editing {
        spans.push(Span::styled("▏", Style::default().fg(theme.interactive.focus)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    app.interaction_map
        .register_click(InteractionLayer::Base, area, Message::FocusInput);
}

fn render_todo_row(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &mut App,
    row: &TodoRowView,
    selected: bool,
) {
    let theme = &app.theme;
    let row_style = if selected {
        Style::default().bg(theme.interactive.selected_bg)
    } else {
        Style::default()
    };

    let checkbox = if row.completed { "[x] " } else { "[ ] " };
    let text_style = if row.completed {
        Style::default()
            .fg(theme.list.completed)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.list.pending)
    };
    let delete_style = if app.hovered_message == Some(Message::DeleteTodo(row.id)) {
        Style::default()
            .fg(theme.base.danger)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.list.delete)
    };

    let text_width = area.width.saturating_sub(CHECKBOX_WIDTH + DELETE_WIDTH) as usize;
    let text: String = row.text.chars().take(text_width).collect();
    let padding = text_width.saturating_sub(text.chars().count());

    let line = Line::from(vec![
        Span::styled(checkbox, Style::default().fg(theme.list.checkbox)),
        Span::styled(text, text_style),
        Span::raw(" ".repeat(padding)),
        Span::styled(" ✕ ", delete_style),
    ]);
    frame.render_widget(Paragraph::new(line).style(row_style), area);

    let checkbox_area = Rect::new(area.x, area.y, CHECKBOX_WIDTH.min(area.width), 1);
    let delete_area = Rect::new(
        area.x + area.width.saturating_sub(DELETE_WIDTH),
        area.y,
        DELETE_WIDTH.min(area.width),
        1,
    );
    app.interaction_map
        .register_click(InteractionLayer::Base, area, Message::SelectTodo(row.id));
    app.interaction_map.register_click(
        InteractionLayer::Base,
        checkbox_area,
        Message::ToggleTodo(row.id),
    );
    app.interaction_map.register_click(
        InteractionLayer::Base,
        delete_area,
        Message::DeleteTodo(row.id),
    );
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let text = match app.footer_notice.as_deref() {
        Some(notice) => format!(" {notice} "),
        None => footer_hints(app),
    };
    let footer = Paragraph::new(Span::styled(
        text,
        Style::default().fg(app.theme.base.text_muted),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn footer_hints(app: &App) -> String {
    let keys = &app.keybindings;
    let hint = |context: KeyContext, action: KeyAction, label: &str| {
        keys.display_for(context, action)
            .map(|binding| format!("{binding}: {label}"))
    };

    let hints = if app.focus == Focus::Input {
        vec![
            Some("Enter: add".to_string()),
            Some("Esc: done".to_string()),
            Some("Tab: next".to_string()),
        ]
    } else {
        vec![
            hint(KeyContext::Timer, KeyAction::ToggleTimer, "start/pause"),
            hint(KeyContext::Timer, KeyAction::SwitchFocus, "focus"),
            hint(KeyContext::Timer, KeyAction::SwitchBreak, "break"),
            hint(KeyContext::Timer, KeyAction::ResetTimer, "reset"),
            hint(KeyContext::Global, KeyAction::ToggleList, "list"),
            hint(KeyContext::Global, KeyAction::ToggleHelp, "help"),
        ]
    };

    hints.into_iter().flatten().collect::<Vec<_>>().join("  ")
}

fn render_help(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let lines = app.keybindings.help_lines();
    let height = (lines.len() as u16 + 2).min(area.height);
    let width = 46.min(area.width);
    let [vertical] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(vertical);

    let theme = &app.theme;
    let text: Vec<Line<'_>> = lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(theme.base.text))))
        .collect();
    let help = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(theme.interactive.focus))
            .title(" Help ")
            .style(Style::default().bg(theme.base.canvas)),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(help, popup);
    app.interaction_map
        .register(InteractionNode::backdrop(area, Message::Dismiss));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppOptions, InteractionKind};
    use crate::notification::NotificationBackend;
    use crate::settings::Settings;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use tuirealm::ratatui::{Terminal, backend::TestBackend};

    fn quiet_app() -> App {
        App::new(
            Settings::default(),
            AppOptions {
                notification_backend: Some(NotificationBackend::None),
                ..AppOptions::default()
            },
        )
    }

    fn draw(app: &mut App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(80, 32)).expect("terminal");
        terminal.draw(|frame| render(frame, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    fn screen_contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|line| line.contains(needle))
    }

    fn click(app: &mut App, rect: Rect) {
        app.update(Message::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x,
            row: rect.y,
            modifiers: KeyModifiers::empty(),
        }))
        .expect("click");
    }

    #[test]
    fn initial_screen_shows_idle_focus() {
        let mut app = quiet_app();
        let lines = draw(&mut app);

        assert!(screen_contains(&lines, "FOCUS"));
        assert!(screen_contains(&lines, "BREAK"));
        assert!(screen_contains(&lines, "RESET"));
        assert!(screen_contains(&lines, "25:00"));
        assert!(screen_contains(&lines, "Plans for today?"));
        assert!(screen_contains(&lines, "EDIT LIST"));
        assert!(!screen_contains(&lines, "Tasks ("));
    }

    #[test]
    fn running_focus_shows_pause_label() {
        let mut app = quiet_app();
        app.update(Message::ToggleTimer).expect("toggle");
        let lines = draw(&mut app);

        assert!(screen_contains(&lines, "PAUSE"));
        assert!(screen_contains(&lines, "BREAK"));
        assert!(screen_contains(&lines, "running"));
    }

    #[test]
    fn clicking_clock_and_buttons_dispatches() {
        let mut app = quiet_app();
        draw(&mut app);

        let clock = app
            .interaction_map
            .rect_for(&Message::ToggleTimer)
            .expect("clock region");
        click(&mut app, clock);
        assert!(app.timer.is_running());

        let break_button = app
            .interaction_map
            .rect_for(&Message::SwitchToBreak)
            .expect("break button");
        click(&mut app, break_button);
        assert_eq!(app.timer.mode(), Mode::Break);

        let reset = app
            .interaction_map
            .rect_for(&Message::ResetTimer)
            .expect("reset button");
        click(&mut app, reset);
        assert_eq!(app.timer.mode(), Mode::Focus);
        assert!(!app.timer.is_running());
    }

    #[test]
    fn open_list_renders_rows_and_plan() {
        let mut app = quiet_app();
        app.update(Message::ToggleTodoList).expect("open");
        let a = app.todos.add_item("draft outline");
        app.todos.add_item("review notes");
        app.todos.toggle_item(a);

        let lines = draw(&mut app);
        assert!(screen_contains(&lines, "Tasks (2)"));
        assert!(screen_contains(&lines, "[x] draft outline"));
        assert!(screen_contains(&lines, "[ ] review notes"));
        assert!(screen_contains(&lines, "✕"));
        assert_eq!(
            lines
                .iter()
                .filter(|line| line.contains("review notes"))
                .count(),
            2,
            "plan label and list row"
        );
    }

    #[test]
    fn row_checkbox_and_delete_regions() {
        let mut app = quiet_app();
        app.update(Message::ToggleTodoList).expect("open");
        let id = app.todos.add_item("stretch");
        draw(&mut app);

        let checkbox = app
            .interaction_map
            .rect_for(&Message::ToggleTodo(id))
            .expect("checkbox");
        assert_eq!(
            app.interaction_map.resolve_message(
                checkbox.x,
                checkbox.y,
                InteractionKind::LeftClick
            ),
            Some(Message::ToggleTodo(id))
        );
        click(&mut app, checkbox);
        assert!(app.todos.get(id).expect("item").completed);

        draw(&mut app);
        let delete = app
            .interaction_map
            .rect_for(&Message::DeleteTodo(id))
            .expect("delete");
        click(&mut app, delete);
        assert!(app.todos.is_empty());
    }

    #[test]
    fn help_overlay_renders_and_dismisses_on_click() {
        let mut app = quiet_app();
        app.update(Message::ToggleHelp).expect("help");
        let lines = draw(&mut app);
        assert!(screen_contains(&lines, "Keyboard shortcuts"));

        click(&mut app, Rect::new(0, 0, 1, 1));
        assert!(!app.show_help);
    }

    #[test]
    fn footer_prefers_notice() {
        let mut app = quiet_app();
        let lines = draw(&mut app);
        assert!(screen_contains(&lines, "Space: start/pause"));

        app.footer_notice = Some("Focus session done | break started".to_string());
        let lines = draw(&mut app);
        assert!(screen_contains(&lines, "Focus session done"));
    }
}
