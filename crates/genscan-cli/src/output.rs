use std::io::Write;

use genscan_core::{BackendHealth, Category, DetectionResult, ResultView};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Machine-readable verdict for `--json`.
#[derive(Debug, Serialize)]
pub struct JsonVerdict<'a> {
    pub verdict: &'a str,
    pub confidence: f64,
    pub percent: f64,
    pub category: &'static str,
    pub stale: bool,
}

impl<'a> JsonVerdict<'a> {
    pub fn new(result: &'a DetectionResult, view: &ResultView) -> Self {
        Self {
            verdict: &result.verdict,
            confidence: result.confidence,
            percent: view.percent,
            category: category_name(view.category),
            stale: view.stale,
        }
    }
}

fn category_name(category: Category) -> &'static str {
    match category {
        Category::Alert => "alert",
        Category::Success => "success",
    }
}

/// Print the backend state after a probe.
pub fn print_health(
    w: &mut dyn Write,
    url: &str,
    health: BackendHealth,
    color: ColorMode,
) -> std::io::Result<()> {
    let label = health.label();
    if color.enabled() {
        match health {
            BackendHealth::Ready => writeln!(w, "{} {}", url.dimmed(), label.green())?,
            BackendHealth::ModelLoading => writeln!(w, "{} {}", url.dimmed(), label.yellow())?,
            _ => writeln!(w, "{} {}", url.dimmed(), label.red())?,
        }
    } else {
        writeln!(w, "{} {}", url, label)?;
    }
    if health.advisory_level().is_some() {
        writeln!(w, "{}", health.advisory())?;
    }
    Ok(())
}

/// Print a detection verdict with its confidence.
pub fn print_result(w: &mut dyn Write, view: &ResultView, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        let verdict = match view.category {
            Category::Alert => view.verdict.red().bold().to_string(),
            Category::Success => view.verdict.green().bold().to_string(),
        };
        writeln!(w, "Verdict:    {}", verdict)?;
    } else {
        writeln!(w, "Verdict:    {}", view.verdict)?;
    }
    writeln!(w, "Confidence: {}", view.percent_label())?;
    Ok(())
}

/// Print an error notification.
pub fn print_error(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "error:".red().bold(), message)
    } else {
        writeln!(w, "error: {}", message)
    }
}
