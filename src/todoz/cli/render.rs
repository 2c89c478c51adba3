//! Terminal rendering. Every function returns a `String`; callers print it.

use chrono::{DateTime, Utc};
use colored::Colorize;
use todoz::commands::{CmdMessage, CmdResult, DisplayTodo, MessageLevel};
use todoz::model::Filter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const TIME_WIDTH: usize = 16;
const EDIT_MARKER: &str = "✎";

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.dimmed(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
        };
        out.push_str(&format!("{}\n", line));
    }
    out
}

/// Counts header, then one row per visible todo.
pub fn render_list(result: &CmdResult) -> String {
    let mut out = String::new();
    let counts = result.counts.unwrap_or_default();
    let filter = result.filter.unwrap_or_default();

    let mut header = format!("Completed: {}/{}", counts.completed, counts.total);
    if filter != Filter::All {
        header.push_str(&format!("  {}", format!("[{}]", filter).cyan()));
    }
    out.push_str(&header);
    out.push('\n');

    if result.listed_todos.is_empty() {
        let empty = match filter {
            Filter::All => "No todos yet.".to_string(),
            other => format!("No {} todos.", other.as_str().to_lowercase()),
        };
        out.push_str(&format!("{}\n", empty.dimmed()));
        return out;
    }

    let label_width = result
        .listed_todos
        .iter()
        .map(|dt| dt.label.to_string().len())
        .max()
        .unwrap_or(1);

    for dt in &result.listed_todos {
        let draft = result
            .editing
            .as_ref()
            .filter(|session| dt.editing && session.id == dt.todo.id)
            .map(|session| session.draft.as_str());
        out.push_str(&render_row(dt, draft, label_width));
        out.push('\n');
    }
    out
}

fn render_row(dt: &DisplayTodo, draft: Option<&str>, label_width: usize) -> String {
    let label = format!("{:>width$}. ", dt.label, width = label_width);
    let check = if dt.todo.completed { "[x] " } else { "[ ] " };
    let marker = if dt.editing {
        format!("{} ", EDIT_MARKER)
    } else {
        String::new()
    };

    let fixed = label.width() + check.width() + marker.width() + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let text = truncate_to_width(draft.unwrap_or(&dt.todo.text), available);
    let padding = available.saturating_sub(text.width());

    let text_colored = if dt.editing {
        text.yellow()
    } else if dt.todo.completed {
        text.dimmed().strikethrough()
    } else {
        text.normal()
    };
    let check_colored = if dt.todo.completed {
        check.green()
    } else {
        check.normal()
    };

    format!(
        "{}{}{}{}{}{}",
        label.dimmed(),
        check_colored,
        marker.yellow(),
        text_colored,
        " ".repeat(padding),
        format_time_ago(dt.todo.created_at).dimmed()
    )
}

pub fn render_locations(result: &CmdResult) -> String {
    result
        .locations
        .iter()
        .map(|l| format!("{}\n", l))
        .collect()
}

pub fn render_config(result: &CmdResult) -> String {
    let Some(config) = &result.config else {
        return String::new();
    };
    format!(
        "load-delay-ms = {}\nconfirm-clear = {}\n",
        config.load_delay_ms, config.confirm_clear
    )
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoz::commands::{Counts, EditSession};
    use todoz::model::{now_millis, Todo, TodoId};

    fn plain() {
        colored::control::set_override(false);
    }

    fn row(label: u32, text: &str, completed: bool) -> DisplayTodo {
        let mut todo = Todo::new(TodoId(label as i64), text.to_string(), now_millis());
        todo.completed = completed;
        DisplayTodo {
            label,
            todo,
            editing: false,
        }
    }

    fn listing(rows: Vec<DisplayTodo>, filter: Filter) -> CmdResult {
        let completed = rows.iter().filter(|r| r.todo.completed).count();
        let total = rows.len();
        CmdResult::default()
            .with_listed_todos(rows)
            .with_counts(Counts { completed, total })
            .with_filter(filter)
    }

    #[test]
    fn header_shows_completed_over_total() {
        plain();
        let out = render_list(&listing(
            vec![row(1, "Buy milk", true), row(2, "Walk dog", false)],
            Filter::All,
        ));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Completed: 1/2");
        assert!(lines[1].starts_with("1. [x] Buy milk"));
        assert!(lines[2].starts_with("2. [ ] Walk dog"));
    }

    #[test]
    fn rows_fit_the_line() {
        plain();
        let long = "x".repeat(200);
        let out = render_list(&listing(vec![row(1, &long, false)], Filter::All));
        let row_line = out.lines().nth(1).unwrap();
        assert!(row_line.width() <= LINE_WIDTH);
        assert!(row_line.contains('…'));
    }

    #[test]
    fn empty_list_names_the_filter() {
        plain();
        let out = render_list(&listing(vec![], Filter::Completed));
        assert!(out.contains("[Completed]"));
        assert!(out.contains("No completed todos."));
    }

    #[test]
    fn editing_row_shows_the_draft() {
        plain();
        let mut editing = row(1, "Buy milk", false);
        editing.editing = true;
        let mut result = listing(vec![editing], Filter::All);
        result.editing = Some(EditSession {
            id: TodoId(1),
            draft: "Buy oat milk".to_string(),
        });
        let out = render_list(&result);
        assert!(out.contains("✎ Buy oat milk"));
    }

    #[test]
    fn messages_one_per_line() {
        plain();
        let out = render_messages(&[CmdMessage::success("Added: x"), CmdMessage::info("hi")]);
        assert_eq!(out, "Added: x\nhi\n");
    }
}
