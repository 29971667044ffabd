use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::storage::KvStore;

use super::app::{AppState, Focus, HitRegion};
use super::model::{DisplayItem, Interaction};

const CHECKBOX_WIDTH: usize = 4;
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER: Color = Color::Rgb(92, 126, 166);
const COLOR_BORDER_FOCUS: Color = Color::Rgb(180, 156, 92);

pub fn render<S: KvStore>(frame: &mut Frame, app: &mut AppState<S>) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    app.focus_regions = vec![
        (chunks[0], Focus::Input),
        (chunks[1], Focus::Search),
        (chunks[2], Focus::List),
    ];

    render_field(frame, app, chunks[0], Focus::Input);
    render_field(frame, app, chunks[1], Focus::Search);
    render_list(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(COLOR_BORDER_FOCUS)
    } else {
        Style::default().fg(COLOR_BORDER)
    }
}

fn render_field<S: KvStore>(frame: &mut Frame, app: &AppState<S>, area: Rect, field: Focus) {
    let (title, value, placeholder) = match field {
        Focus::Input => ("New task", app.input.as_str(), "What needs doing?"),
        _ => ("Search", app.search.as_str(), "Filter tasks"),
    };
    let focused = app.focus == field;
    let content_width = area.width.saturating_sub(2) as usize;

    let line = if value.is_empty() && !focused {
        Line::from(Span::styled(
            placeholder,
            Style::default().fg(COLOR_MUTED_DARK),
        ))
    } else {
        let mut shown = value.to_string();
        if focused {
            shown.push('_');
        }
        Line::from(Span::styled(
            tail_text(&shown, content_width),
            Style::default().fg(COLOR_TEXT),
        ))
    };

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style(focused)),
    );
    frame.render_widget(widget, area);
}

fn render_list<S: KvStore>(frame: &mut Frame, app: &mut AppState<S>, area: Rect) {
    app.hit_regions.clear();

    let inner = Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    let content_width = inner.width as usize;
    let visible = app.controller.visible_indices();
    let mut lines = Vec::new();

    if visible.is_empty() {
        let message = if app.controller.tasks().is_empty() {
            "No tasks"
        } else {
            "No matches"
        };
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(COLOR_MUTED),
        )));
    } else {
        let selected_pos = app
            .selected
            .and_then(|idx| visible.iter().position(|candidate| *candidate == idx));
        let (start, end) = list_window(visible.len(), selected_pos, inner.height as usize);
        let glyph = app.config.delete_glyph.clone();
        let glyph_width = glyph.width();
        let list_focused = app.focus == Focus::List;

        for (row, idx) in visible[start..end].iter().copied().enumerate() {
            let Some(item) = app.controller.items().get(idx) else {
                continue;
            };
            let selected = list_focused && app.selected == Some(idx);
            let toggle = item.target(Interaction::ToggleComplete).interaction;
            let delete = item.target(Interaction::Delete).interaction;
            let (line, label_width) =
                render_list_row(item, selected, &glyph, glyph_width, content_width);
            lines.push(line);

            let y = inner.y.saturating_add(row as u16);
            let glyph_offset = (content_width > glyph_width).then(|| content_width - glyph_width);
            // The label region must never reach into the delete glyph.
            let label_width = match glyph_offset {
                Some(offset) => label_width.min(offset),
                None => label_width,
            };
            app.hit_regions.push(HitRegion {
                area: Rect::new(inner.x, y, label_width as u16, 1),
                index: idx,
                interaction: toggle,
            });
            if let Some(offset) = glyph_offset {
                app.hit_regions.push(HitRegion {
                    area: Rect::new(inner.x + offset as u16, y, glyph_width as u16, 1),
                    index: idx,
                    interaction: delete,
                });
            }
        }
    }

    let title = if app.is_filtering() {
        format!("Tasks ({} shown)", visible.len())
    } else {
        "Tasks".to_string()
    };
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style(app.focus == Focus::List)),
    );
    frame.render_widget(widget, area);
}

/// Build one row and return it with the width of its clickable label
fn render_list_row(
    item: &DisplayItem,
    selected: bool,
    glyph: &str,
    glyph_width: usize,
    width: usize,
) -> (Line<'static>, usize) {
    let checkbox = if item.completed { "[x] " } else { "[ ] " };
    let label_max = width
        .saturating_sub(CHECKBOX_WIDTH)
        .saturating_sub(glyph_width + 1);
    let label = truncate_text(item.text(), label_max);
    let label_width = label.width();

    let mut text_style = Style::default().fg(COLOR_TEXT);
    let mut box_style = Style::default().fg(COLOR_ACCENT);
    if item.completed {
        text_style = text_style
            .fg(COLOR_MUTED_DARK)
            .add_modifier(Modifier::CROSSED_OUT);
        box_style = box_style.fg(COLOR_SUCCESS);
    }
    if selected {
        text_style = text_style.add_modifier(Modifier::REVERSED);
    }

    let used = CHECKBOX_WIDTH + label_width;
    let padding = width.saturating_sub(used + glyph_width);
    let mut spans = vec![
        Span::styled(checkbox, box_style),
        Span::styled(label, text_style),
    ];
    if width > glyph_width {
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(
            glyph.to_string(),
            Style::default().fg(COLOR_ERROR),
        ));
    }

    (
        Line::from(spans),
        (CHECKBOX_WIDTH + label_width).min(width),
    )
}

fn render_footer<S: KvStore>(frame: &mut Frame, app: &AppState<S>, area: Rect) {
    let hint_span = Span::styled(app.footer_hint(), Style::default().fg(COLOR_INFO));
    let line = if let Some(status) = app.status_message() {
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(
                status.to_string(),
                Style::default()
                    .fg(COLOR_ERROR)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(hint_span)
    };
    let counts_line = Line::from(Span::styled(
        format!("{} pending", app.controller.pending()),
        Style::default().fg(COLOR_ACCENT),
    ));
    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER)),
        );
    frame.render_widget(widget, area);
}

fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Cut `value` to at most `max` terminal columns
fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if value.width() <= max {
        return value.to_string();
    }
    let ellipsis = if max <= 3 { "" } else { "..." };
    let budget = max - ellipsis.len();
    let mut out = String::new();
    let mut used = 0;
    for ch in value.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        out.push(ch);
    }
    out.push_str(ellipsis);
    out
}

/// Keep the end of an input value visible while typing
fn tail_text(value: &str, max: usize) -> String {
    if value.width() <= max {
        return value.to_string();
    }
    let mut kept = Vec::new();
    let mut used = 0;
    for ch in value.chars().rev() {
        let width = ch.width().unwrap_or(0);
        if used + width > max {
            break;
        }
        used += width;
        kept.push(ch);
    }
    kept.into_iter().rev().collect()
}
