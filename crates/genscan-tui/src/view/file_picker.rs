//! Directory browser for choosing the image to analyze.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::{human_bytes, truncate};
use crate::app::{App, FileEntry};
use crate::theme::Theme;

pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let [title, list, selected, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(4),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let theme = &app.theme;
    let picker = &app.file_picker;
    let width = area.width as usize;

    let dir = picker.current_dir.display().to_string();
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Choose image ", theme.header_style()),
            Span::styled(
                format!(" {}", truncate(&dir, width.saturating_sub(16))),
                Style::default().fg(theme.dim),
            ),
        ])),
        title,
    );

    let current = app.session.panel().image().map(|i| i.name());
    let images = picker.entries.iter().filter(|e| e.is_image).count();
    let items: Vec<ListItem> = picker
        .entries
        .iter()
        .map(|entry| ListItem::new(entry_line(entry, current, theme)))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(" {} entries, {} images ", picker.entries.len(), images));
    let mut state = ListState::default().with_selected(Some(picker.cursor));
    f.render_stateful_widget(
        List::new(items)
            .block(block)
            .highlight_style(theme.highlight_style())
            .highlight_symbol("> "),
        list,
        &mut state,
    );

    let summary = match app.session.panel().image() {
        Some(image) => Line::from(vec![
            Span::styled(" loaded: ", Style::default().fg(theme.dim)),
            Span::styled(
                image.name().to_string(),
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ({}, {})", image.mime(), human_bytes(image.len())),
                Style::default().fg(theme.dim),
            ),
        ]),
        None => Line::from(Span::styled(
            " nothing loaded yet",
            Style::default().fg(theme.dim),
        )),
    };
    f.render_widget(Paragraph::new(summary), selected);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " j/k move  Enter open/pick  Esc back  ? keys",
            theme.footer_style(),
        ))),
        footer,
    );
}

fn entry_line<'a>(entry: &'a FileEntry, current: Option<&str>, theme: &Theme) -> Line<'a> {
    if entry.is_dir {
        return Line::from(Span::styled(
            format!("{}/", entry.name),
            Style::default().fg(theme.active),
        ));
    }
    if !entry.is_image {
        return Line::from(Span::styled(
            entry.name.as_str(),
            Style::default().fg(theme.disabled),
        ));
    }
    let loaded = current == Some(entry.name.as_str());
    let style = if loaded {
        Style::default()
            .fg(theme.success)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let mut spans = vec![Span::styled(entry.name.as_str(), style)];
    if loaded {
        spans.push(Span::styled("  (loaded)", Style::default().fg(theme.dim)));
    }
    Line::from(spans)
}
