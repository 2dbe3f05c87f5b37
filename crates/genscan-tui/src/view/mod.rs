pub mod detector;
pub mod file_picker;
pub mod overlay;

use ratatui::layout::Rect;

const SPINNER: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Spinner frame for the given tick.
pub fn spinner_char(tick: usize) -> char {
    SPINNER[tick % SPINNER.len()]
}

/// Shorten `s` to at most `max_width` chars, marking the cut with an ellipsis.
pub fn truncate(s: &str, max_width: usize) -> String {
    match s.char_indices().nth(max_width) {
        None => s.to_string(),
        Some(_) if max_width == 0 => String::new(),
        Some(_) => {
            let keep = s
                .char_indices()
                .nth(max_width - 1)
                .map_or(s.len(), |(i, _)| i);
            format!("{}\u{2026}", &s[..keep])
        }
    }
}

pub fn human_bytes(n: usize) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    if n < 1024 {
        return format!("{n} B");
    }
    let mut value = n as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
