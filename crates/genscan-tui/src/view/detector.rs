//! The main detection screen: mode tabs, input, analyze button and result.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Tabs, Wrap};

use genscan_core::{BackendHealth, DetectionMode};

use super::{human_bytes, spinner_char, truncate};
use crate::app::{App, InputMode};
use crate::theme::Theme;

pub fn render_in(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(1), // mode tabs
        Constraint::Length(1), // health advisory
        Constraint::Min(6),    // input
        Constraint::Length(1), // analyze button
        Constraint::Length(5), // result
        Constraint::Length(1), // notification
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, chunks[0], app);
    render_tabs(f, chunks[1], app);
    render_advisory(f, chunks[2], app);
    match app.session.mode() {
        DetectionMode::ImageDetection => render_image_slot(f, chunks[3], app),
        DetectionMode::TextDetection => render_text_editor(f, chunks[3], app),
    }
    render_button(f, chunks[4], app);
    render_result(f, chunks[5], app);
    render_toast(f, chunks[6], app);
    render_footer(f, chunks[7], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let health = app.session.health();
    let health_style = match health.advisory_level() {
        Some(level) => Style::default().fg(theme.advisory_color(level)),
        None if health == BackendHealth::Ready => Style::default().fg(theme.success),
        None => Style::default().fg(theme.dim),
    };
    let health_label = if health.is_resolved() {
        format!("\u{25CF} {}", health.label())
    } else {
        format!("{} {}", spinner_char(app.tick), health.label())
    };

    let line = Line::from(vec![
        Span::styled(" genscan ", theme.header_style()),
        Span::styled(
            format!(" {} ", app.session.backend().name()),
            Style::default().fg(theme.dim),
        ),
        Span::styled(health_label, health_style.add_modifier(Modifier::BOLD)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let modes = DetectionMode::all();
    let selected = modes
        .iter()
        .position(|m| *m == app.session.mode())
        .unwrap_or(0);
    let titles: Vec<String> = modes
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{} {}", i + 1, m.label()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme.dim))
        .highlight_style(
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(" | ");
    f.render_widget(tabs, area);
}

fn render_advisory(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let health = app.session.health();
    let style = match health.advisory_level() {
        Some(level) => Style::default()
            .fg(theme.advisory_color(level))
            .add_modifier(Modifier::BOLD),
        None => Style::default().fg(theme.dim),
    };
    let line = Line::from(Span::styled(format!(" {}", health.advisory()), style));
    f.render_widget(Paragraph::new(line), area);
}

fn render_image_slot(f: &mut Frame, area: Rect, app: &mut App) {
    let width = area.width.saturating_sub(16) as usize;
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Image ");

    let Some(image) = app.session.panel().image().cloned() else {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No image selected.",
                Style::default().fg(theme.dim),
            )),
            Line::from(Span::styled(
                "  Press o to choose a file.",
                Style::default().fg(theme.dim),
            )),
        ];
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    };

    let label = Style::default().fg(theme.dim);
    let value = Style::default().fg(theme.text);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("  File:    ", label),
            Span::styled(
                truncate(image.name(), width),
                value.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Type:    ", label),
            Span::styled(image.mime().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("  Size:    ", label),
            Span::styled(human_bytes(image.len()), value),
        ]),
    ];

    // Terminals can't show the picture; summarise the preview URI instead.
    let dim = theme.dim;
    if let Some(uri) = app.session.panel_mut().preview() {
        lines.push(Line::from(vec![
            Span::styled("  Preview: ", label),
            Span::styled(truncate(uri, width), Style::default().fg(dim)),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_text_editor(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let editing = app.input_mode == InputMode::Editing;
    let text = app.session.panel().text();

    let border = if editing {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    let title = if editing {
        " Text (editing, Esc to stop) "
    } else {
        " Text (i to edit) "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);

    let body = if text.is_empty() && !editing {
        Paragraph::new(Line::from(Span::styled(
            "Enter text to analyze...",
            Style::default().fg(theme.dim),
        )))
    } else {
        Paragraph::new(text.to_string()).style(Style::default().fg(theme.text))
    };
    f.render_widget(body.block(block).wrap(Wrap { trim: false }), area);

    if editing {
        let before = &text[..app.text_cursor.min(text.len())];
        let inner_w = area.width.saturating_sub(2).max(1);
        let inner_h = area.height.saturating_sub(2).max(1);
        let (x, y) = cursor_cell(before, inner_w);
        if y < inner_h {
            f.set_cursor_position((area.x + 1 + x, area.y + 1 + y));
        }
    }
}

/// Column and row of the end of `before` in a box `width` cells wide.
/// Saturates instead of wrapping for very long input.
fn cursor_cell(before: &str, width: u16) -> (u16, u16) {
    let row = u16::try_from(before.matches('\n').count()).unwrap_or(u16::MAX);
    let col = before
        .rsplit('\n')
        .next()
        .map(|l| l.chars().count())
        .unwrap_or(0);
    let col = u16::try_from(col).unwrap_or(u16::MAX);
    (col % width, row.saturating_add(col / width))
}

fn render_button(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let enabled = app.session.can_submit();
    let mut spans = vec![Span::styled(" [ Analyze ] ", theme.button_style(enabled))];
    if app.session.is_submitting() {
        spans.push(Span::styled(
            format!(" {} Analyzing...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    } else if !enabled {
        spans.push(Span::styled(
            " unavailable until the backend is ready",
            Style::default().fg(theme.dim),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Result ");

    let Some(view) = app.session.result_view() else {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " No result yet.",
                Style::default().fg(theme.dim),
            )))
            .block(block),
            area,
        );
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);
    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);

    let color = theme.category_color(view.category);
    let mut tag = vec![Span::styled(
        format!(" {} ", view.verdict),
        Style::default()
            .fg(theme.header_fg)
            .bg(color)
            .add_modifier(Modifier::BOLD),
    )];
    if view.stale {
        tag.push(Span::styled(
            "  (stale: last analysis failed)",
            Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(tag)), rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(view.ratio())
        .label(format!("Confidence {}", view.percent_label()));
    f.render_widget(gauge, rows[1]);
}

fn render_toast(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    if let Some(n) = app.visible_toast() {
        let line = Line::from(Span::styled(
            format!(" {}", n.message),
            Style::default()
                .fg(theme.notification_color(n.kind))
                .add_modifier(Modifier::BOLD),
        ));
        f.render_widget(Paragraph::new(line), area);
    }
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme: &Theme = &app.theme;
    let text = match (app.input_mode.clone(), app.session.mode()) {
        (InputMode::Editing, _) => " Esc:stop editing  Ctrl+s:analyze",
        (InputMode::Normal, DetectionMode::ImageDetection) => {
            " Tab:mode  o:choose image  x:remove  Enter:analyze  t:theme  ?:help  q:quit"
        }
        (InputMode::Normal, DetectionMode::TextDetection) => {
            " Tab:mode  i:edit  Enter:analyze  t:theme  ?:help  q:quit"
        }
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(text, theme.footer_style()))),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::cursor_cell;

    #[test]
    fn cursor_wraps_long_lines() {
        assert_eq!(cursor_cell("", 10), (0, 0));
        assert_eq!(cursor_cell("ab\ncd", 10), (2, 1));
        assert_eq!(cursor_cell("abcdefghijkl", 10), (2, 1));
        assert_eq!(cursor_cell("héllo", 10), (5, 0));
    }

    #[test]
    fn cursor_saturates_on_huge_input() {
        let many_lines = "\n".repeat(70_000);
        assert_eq!(cursor_cell(&many_lines, 10), (0, u16::MAX));

        let long_tail = format!("{}{}", "\n".repeat(65_000), "x".repeat(9_000));
        assert_eq!(cursor_cell(&long_tail, 10).1, u16::MAX);
    }
}
