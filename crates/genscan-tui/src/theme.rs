use ratatui::style::{Color, Modifier, Style};

use genscan_core::{AdvisoryLevel, Category, NotificationKind};

/// Palette for every screen. Verdict colors come first since they carry meaning.
pub struct Theme {
    /// AI-generated verdicts, unreachable backend, errors.
    pub alert: Color,
    /// Human verdicts, ready backend, success toasts.
    pub success: Color,
    /// Model still loading.
    pub warning: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub disabled: Color,
    pub highlight_bg: Color,
    /// Focus, selected tab, info toasts.
    pub active: Color,
    pub spinner: Color,
}

impl Theme {
    pub const NAMES: &'static [&'static str] = &["hacker", "modern"];

    /// Green on black.
    pub fn hacker() -> Self {
        let green = Color::Rgb(40, 220, 90);
        Self {
            alert: Color::LightRed,
            success: green,
            warning: Color::LightYellow,

            header_fg: Color::Black,
            header_bg: green,
            footer_fg: Color::Gray,
            footer_bg: Color::Reset,
            border: Color::Rgb(50, 90, 60),
            text: Color::Rgb(210, 240, 215),
            dim: Color::Rgb(100, 130, 105),
            disabled: Color::Rgb(45, 55, 48),
            highlight_bg: Color::Rgb(20, 60, 35),
            active: Color::LightCyan,
            spinner: green,
        }
    }

    /// Slate background accents with a violet highlight.
    pub fn modern() -> Self {
        let violet = Color::Rgb(150, 120, 255);
        Self {
            alert: Color::Rgb(240, 90, 110),
            success: Color::Rgb(70, 200, 160),
            warning: Color::Rgb(245, 180, 60),

            header_fg: Color::Rgb(245, 245, 250),
            header_bg: Color::Rgb(60, 50, 120),
            footer_fg: Color::Rgb(140, 140, 160),
            footer_bg: Color::Reset,
            border: Color::Rgb(80, 80, 105),
            text: Color::Rgb(230, 230, 240),
            dim: Color::Rgb(130, 130, 150),
            disabled: Color::Rgb(60, 60, 75),
            highlight_bg: Color::Rgb(45, 40, 85),
            active: violet,
            spinner: violet,
        }
    }

    /// Look up a theme by name; unknown names fall back to `hacker`.
    pub fn by_name(name: &str) -> Self {
        match name {
            "modern" => Self::modern(),
            _ => Self::hacker(),
        }
    }

    pub fn category_color(&self, category: Category) -> Color {
        match category {
            Category::Alert => self.alert,
            Category::Success => self.success,
        }
    }

    pub fn advisory_color(&self, level: AdvisoryLevel) -> Color {
        match level {
            AdvisoryLevel::Warning => self.warning,
            AdvisoryLevel::Error => self.alert,
        }
    }

    pub fn notification_color(&self, kind: NotificationKind) -> Color {
        match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Info => self.active,
            NotificationKind::Error => self.alert,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }

    /// Style of the analyze button.
    pub fn button_style(&self, enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(self.header_fg)
                .bg(self.active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.dim).bg(self.disabled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_falls_back_to_hacker() {
        assert_eq!(Theme::by_name("solarized").header_bg, Theme::hacker().header_bg);
        assert_eq!(Theme::by_name("modern").active, Theme::modern().active);
    }

    #[test]
    fn verdict_colors_differ() {
        for name in Theme::NAMES {
            let theme = Theme::by_name(name);
            assert_ne!(
                theme.category_color(Category::Alert),
                theme.category_color(Category::Success)
            );
        }
    }
}
