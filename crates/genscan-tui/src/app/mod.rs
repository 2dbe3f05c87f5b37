mod backend;
mod picker;
mod update;
mod update_file_picker;

pub use picker::{FileEntry, FilePickerState};

use std::path::Path;

use tokio::sync::mpsc;

use genscan_core::{ImageFile, Notification, Session};

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Ticks a notification stays on screen (about four seconds at 10 fps).
pub const NOTIFICATION_TICKS: usize = 40;

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Main,
    FilePicker,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Keystrokes go into the text editor.
    Editing,
}

/// A notification on screen, with the tick it was raised on.
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub raised_at: usize,
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub session: Session,
    pub theme: Theme,
    pub theme_name: String,
    pub tick: usize,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    /// Byte offset of the editor cursor in the pending text.
    pub text_cursor: usize,
    pub toast: Option<Toast>,
    /// Height of the visible list area (set on resize, used for page up/down).
    pub visible_rows: usize,
    pub file_picker: FilePickerState,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(session: Session, theme_name: &str) -> Self {
        Self {
            screen: Screen::Main,
            input_mode: InputMode::Normal,
            session,
            theme: Theme::by_name(theme_name),
            theme_name: theme_name.to_string(),
            tick: 0,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            text_cursor: 0,
            toast: None,
            visible_rows: 20,
            file_picker: FilePickerState::new(),
            backend_cmd_tx: None,
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.toast = Some(Toast {
            notification,
            raised_at: self.tick,
        });
    }

    /// The toast to display this frame, if it hasn't expired.
    pub fn visible_toast(&self) -> Option<&Notification> {
        self.toast
            .as_ref()
            .filter(|t| self.tick.wrapping_sub(t.raised_at) < NOTIFICATION_TICKS)
            .map(|t| &t.notification)
    }

    /// Load `path` into the image slot, raising a notification either way.
    /// Returns whether the image was loaded.
    pub fn load_image(&mut self, path: &Path) -> bool {
        match ImageFile::open(path) {
            Ok(image) => {
                let name = image.name().to_string();
                self.session.capture_image(Some(image));
                self.notify(Notification::info(format!("Selected {}", name)));
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read image");
                self.notify(Notification::error(format!(
                    "Could not read {}: {}",
                    path.display(),
                    e
                )));
                false
            }
        }
    }

    /// Replace the pending text and move the cursor to its end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.session.capture_text(text);
        self.text_cursor = self.session.panel().text().len();
    }

    fn cycle_theme(&mut self) {
        let idx = Theme::NAMES
            .iter()
            .position(|n| *n == self.theme_name)
            .unwrap_or(0);
        let next = Theme::NAMES[(idx + 1) % Theme::NAMES.len()];
        self.theme_name = next.to_string();
        self.theme = Theme::by_name(next);
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();

        match self.screen {
            Screen::Main => crate::view::detector::render_in(f, self, area),
            Screen::FilePicker => crate::view::file_picker::render_in(f, self, area),
        }

        if self.show_help {
            crate::view::overlay::render_help(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::overlay::render_quit_confirm(f, self);
        }
    }
}

#[cfg(test)]
mod tests;
