//! Modal popups drawn over the current screen.

use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::app::App;
use crate::theme::Theme;

/// Key bindings shown in the help popup, grouped by section.
const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Detection",
        &[
            ("Tab", "toggle image / text"),
            ("1  2", "image / text mode"),
            ("Enter  s", "analyze"),
            ("o", "choose an image"),
            ("x", "remove the image"),
            ("i  e", "edit text"),
        ],
    ),
    (
        "While editing",
        &[("Esc", "stop editing"), ("Ctrl+s", "analyze")],
    ),
    (
        "File picker",
        &[
            ("j  k", "move"),
            ("Enter", "open folder / pick image"),
            ("Esc", "back"),
        ],
    ),
    (
        "Anywhere",
        &[
            ("t", "next theme"),
            ("?", "this help"),
            ("q  Ctrl+c", "quit"),
        ],
    ),
];

/// Clear `area` and draw `lines` in a bordered box.
fn popup(f: &mut Frame, lines: Vec<Line<'_>>, title: &str, accent: Color, size: (u16, u16)) {
    let area = centered_rect(size.0, size.1, f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

pub fn render_help(f: &mut Frame, theme: &Theme) {
    let mut lines = Vec::new();
    for (section, keys) in BINDINGS {
        lines.push(Line::from(Span::styled(
            format!(" {section}"),
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        )));
        lines.extend(keys.iter().map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("   {key:<11}"), Style::default().fg(theme.text)),
                Span::styled(*what, Style::default().fg(theme.dim)),
            ])
        }));
    }
    lines.push(Line::from(Span::styled(
        " any key closes",
        Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
    )));

    let height = lines.len() as u16 + 2;
    popup(f, lines, "Keys", theme.active, (52, height));
}

/// Ask before leaving. Mentions an analysis that would be abandoned.
pub fn render_quit_confirm(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let mut lines = vec![Line::from(Span::styled(
        " Leave genscan?",
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ))];
    if app.session.is_submitting() {
        lines.push(Line::from(Span::styled(
            " The running analysis will be discarded.",
            Style::default().fg(theme.warning),
        )));
    }
    lines.push(Line::from(vec![
        Span::raw(" "),
        key("q", theme.alert),
        Span::styled(" quit    ", Style::default().fg(theme.dim)),
        key("Esc", theme.active),
        Span::styled(" stay", Style::default().fg(theme.dim)),
    ]));

    let height = lines.len() as u16 + 2;
    popup(f, lines, "Quit", theme.alert, (44, height));
}
