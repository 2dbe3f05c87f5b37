use genscan_core::{DetectionMode, Notification};

use super::{App, InputMode, Screen};
use crate::action::Action;
use crate::tui_event::BackendCommand;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                Action::Tick => {
                    self.tick = self.tick.wrapping_add(1);
                }
                _ => {}
            }
            return false;
        }

        // Help overlay: any key closes it
        if self.show_help {
            match action {
                Action::Tick => {
                    self.tick = self.tick.wrapping_add(1);
                }
                Action::Resize(..) | Action::None => {}
                _ => {
                    self.show_help = false;
                }
            }
            return false;
        }

        if self.screen == Screen::FilePicker {
            self.handle_file_picker_action(action);
            return false;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_action(action);
            return false;
        }

        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::NavigateBack => {
                self.toast = None;
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::SwitchMode => {
                let next = self.session.mode().toggled();
                self.set_mode(next);
            }
            Action::SelectMode(mode) => {
                self.set_mode(mode);
            }
            Action::DrillIn | Action::Submit => {
                self.submit();
            }
            Action::OpenFilePicker => {
                self.ensure_mode(DetectionMode::ImageDetection);
                self.file_picker.refresh_entries();
                self.screen = Screen::FilePicker;
            }
            Action::ClearImage => {
                if self.session.panel().image().is_some() {
                    self.session.capture_image(None);
                    self.notify(Notification::info("Image removed."));
                }
            }
            Action::StartEditing => {
                self.ensure_mode(DetectionMode::TextDetection);
                self.input_mode = InputMode::Editing;
                self.text_cursor = self.text_cursor.min(self.session.panel().text().len());
            }
            Action::CycleTheme => {
                self.cycle_theme();
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(8);
            }
            _ => {}
        }
        false
    }

    /// Switch mode. Selecting the current mode still clears the result.
    fn set_mode(&mut self, mode: DetectionMode) {
        if self.session.set_mode(mode) {
            tracing::debug!(mode = mode.label(), "mode switched");
        }
    }

    /// Switch only if `mode` is not already active, keeping the result otherwise.
    fn ensure_mode(&mut self, mode: DetectionMode) {
        if self.session.mode() != mode {
            self.set_mode(mode);
        }
    }

    /// Validate the active input and hand the request to the backend task.
    fn submit(&mut self) {
        if !self.session.can_submit() {
            // Button is greyed; the advisory banner already explains why.
            return;
        }
        match self.session.begin_submit() {
            Ok(prepared) => {
                let Some(tx) = &self.backend_cmd_tx else {
                    tracing::warn!("no backend listener; dropping submission");
                    return;
                };
                if tx.send(BackendCommand::Submit(prepared)).is_err() {
                    tracing::error!("backend listener is gone");
                    self.notify(Notification::error("Backend task stopped."));
                }
            }
            Err(notification) => self.notify(notification),
        }
    }

    fn handle_editing_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::StopEditing | Action::NavigateBack => {
                self.input_mode = InputMode::Normal;
            }
            Action::Submit => {
                self.input_mode = InputMode::Normal;
                self.submit();
            }
            Action::TextInput(ch) => {
                let cur = self.text_cursor;
                self.session.panel_mut().text_mut().insert(cur, ch);
                self.text_cursor += ch.len_utf8();
            }
            Action::Paste(text) => {
                let cur = self.text_cursor;
                self.session.panel_mut().text_mut().insert_str(cur, &text);
                self.text_cursor += text.len();
            }
            Action::Backspace => {
                if self.text_cursor > 0 {
                    let text = self.session.panel_mut().text_mut();
                    let prev = text[..self.text_cursor]
                        .char_indices()
                        .next_back()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    text.drain(prev..self.text_cursor);
                    self.text_cursor = prev;
                }
            }
            Action::DeleteForward => {
                let cur = self.text_cursor;
                let text = self.session.panel_mut().text_mut();
                if cur < text.len() {
                    let next = cur
                        + text[cur..]
                            .chars()
                            .next()
                            .map(|c| c.len_utf8())
                            .unwrap_or(0);
                    text.drain(cur..next);
                }
            }
            Action::CursorLeft => {
                let text = self.session.panel().text();
                self.text_cursor = text[..self.text_cursor]
                    .char_indices()
                    .next_back()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
            }
            Action::CursorRight => {
                let text = self.session.panel().text();
                if self.text_cursor < text.len() {
                    self.text_cursor += text[self.text_cursor..]
                        .chars()
                        .next()
                        .map(|c| c.len_utf8())
                        .unwrap_or(0);
                }
            }
            Action::CursorHome => {
                self.text_cursor = 0;
            }
            Action::CursorEnd => {
                self.text_cursor = self.session.panel().text().len();
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(8);
            }
            _ => {}
        }
    }
}
