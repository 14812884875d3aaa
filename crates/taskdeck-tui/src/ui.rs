//! Rendering routines for the taskdeck TUI.

use crate::app::{App, Focus};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use taskdeck_core::{Priority, Task};

const PRIMARY: Color = Color::Rgb(97, 175, 239); // #61afef
const TEXT: Color = Color::Rgb(238, 238, 238); // #eeeeee
const TEXT_MUTED: Color = Color::Rgb(128, 128, 128); // #808080
const BORDER: Color = Color::Rgb(60, 60, 60); // #3c3c3c
const BORDER_ACTIVE: Color = Color::Rgb(97, 175, 239); // #61afef
const GREEN: Color = Color::Rgb(120, 220, 140);
const YELLOW: Color = Color::Rgb(229, 192, 123); // #e5c07b
const RED: Color = Color::Rgb(255, 110, 110);

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header bar
            Constraint::Length(3), // new-task input
            Constraint::Length(3), // search + filter
            Constraint::Min(0),    // task list
            Constraint::Length(1), // status bar
        ])
        .split(area);

    draw_header(frame, app, root[0]);
    draw_input(frame, app, root[1]);
    draw_search(frame, app, root[2]);
    draw_task_list(frame, app, root[3]);
    draw_status_bar(frame, app, root[4]);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let label_style = Style::default().fg(TEXT_MUTED);
    let value_style = Style::default().fg(TEXT);

    let line = Line::from(vec![
        Span::styled(
            " taskdeck ",
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("v{VERSION}"), label_style),
        Span::styled("  server ", label_style),
        Span::styled(app.server_url.as_str(), value_style),
        Span::styled("  user ", label_style),
        Span::styled(short_id(&app.user_id), value_style),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_input(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (title, text, priority) = match &app.editing {
        Some(editing) => (
            " Edit task (Enter save, Esc cancel) ",
            editing.title.as_str(),
            editing.priority,
        ),
        None => (" New task ", app.input.as_str(), app.input_priority),
    };

    let focused = app.focus == Focus::Input || app.editing.is_some();
    let border = if focused { BORDER_ACTIVE } else { BORDER };

    let line = Line::from(vec![
        Span::styled(text, Style::default().fg(TEXT)),
        Span::styled(if focused { "█" } else { "" }, Style::default().fg(PRIMARY)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(title, Style::default().fg(TEXT_MUTED)))
        .title_top(
            Line::from(Span::styled(
                format!(" {} ", priority.as_str()),
                Style::default().fg(priority_color(priority)),
            ))
            .right_aligned(),
        );
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_search(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(20)])
        .split(area);

    let focused = app.focus == Focus::Search;
    let border = if focused { BORDER_ACTIVE } else { BORDER };
    let search_line = Line::from(vec![
        Span::styled(app.search.as_str(), Style::default().fg(TEXT)),
        Span::styled(if focused { "█" } else { "" }, Style::default().fg(PRIMARY)),
    ]);
    let search_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(" Search ", Style::default().fg(TEXT_MUTED)));
    frame.render_widget(Paragraph::new(search_line).block(search_block), cols[0]);

    let (filter_text, filter_color) = match app.priority_filter {
        Some(priority) => (priority.as_str(), priority_color(priority)),
        None => ("All Priorities", TEXT_MUTED),
    };
    let filter_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" Filter ", Style::default().fg(TEXT_MUTED)));
    frame.render_widget(
        Paragraph::new(Span::styled(filter_text, Style::default().fg(filter_color)))
            .block(filter_block),
        cols[1],
    );
}

fn draw_task_list(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let visible = app.visible_tasks();
    let focused = app.focus == Focus::List;
    let border = if focused { BORDER_ACTIVE } else { BORDER };

    let items: Vec<ListItem<'_>> = visible.iter().map(|task| task_row(task)).collect();
    let count = items.len();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" Tasks ({count}) "),
            Style::default().fg(TEXT_MUTED),
        ));

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::Rgb(40, 44, 52))
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    if count > 0 {
        state.select(Some(app.selected.min(count - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_row<'a>(task: &'a Task) -> ListItem<'a> {
    let check = if task.completed { "[x] " } else { "[ ] " };
    let mut title_style = Style::default().fg(TEXT);
    if task.completed {
        title_style = Style::default()
            .fg(TEXT_MUTED)
            .add_modifier(Modifier::CROSSED_OUT);
    }

    ListItem::new(Line::from(vec![
        Span::styled(check, Style::default().fg(TEXT_MUTED)),
        Span::styled(task.title.as_str(), title_style),
        Span::styled(
            format!("  {}", task.priority.as_str()),
            Style::default().fg(priority_color(task.priority)),
        ),
        Span::styled(
            format!("  {}", task.created_at.format("%Y-%m-%d %H:%M")),
            Style::default().fg(TEXT_MUTED),
        ),
    ]))
}

fn draw_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " Tab focus  Enter add/save  Space toggle  e edit  d delete  p filter  r refresh  Esc quit ",
            Style::default().fg(TEXT_MUTED),
        ),
        Span::styled(
            format!(" {} ", app.status),
            Style::default().fg(TEXT),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => GREEN,
        Priority::Medium => YELLOW,
        Priority::High => RED,
    }
}

fn short_id(id: &str) -> &str {
    &id[..8.min(id.len())]
}
