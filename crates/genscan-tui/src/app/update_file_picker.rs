use super::{App, Screen};
use crate::action::Action;

impl App {
    /// Actions while browsing for an image.
    pub(super) fn handle_file_picker_action(&mut self, action: Action) {
        let page = self.visible_rows.max(1) as isize;
        match action {
            Action::MoveDown => self.step_picker(1),
            Action::MoveUp => self.step_picker(-1),
            Action::PageDown => self.step_picker(page),
            Action::PageUp => self.step_picker(-page),
            Action::GoTop => self.step_picker(isize::MIN),
            Action::GoBottom => self.step_picker(isize::MAX),
            Action::DrillIn => self.pick_entry(),
            Action::NavigateBack => self.screen = Screen::Main,
            Action::Quit => self.confirm_quit = true,
            Action::ToggleHelp => self.show_help = true,
            Action::Tick => self.tick = self.tick.wrapping_add(1),
            Action::Resize(_, h) => self.visible_rows = (h as usize).saturating_sub(8),
            _ => {}
        }
    }

    /// Move the picker cursor by `delta`, clamped to the list.
    fn step_picker(&mut self, delta: isize) {
        let last = self.file_picker.entries.len().saturating_sub(1);
        let cursor = self.file_picker.cursor;
        self.file_picker.cursor = if delta < 0 {
            cursor.saturating_sub(delta.unsigned_abs())
        } else {
            cursor.saturating_add(delta as usize).min(last)
        };
    }

    /// Open the directory under the cursor, or load it if it is an image.
    fn pick_entry(&mut self) {
        if self.file_picker.enter_directory() {
            return;
        }
        let Some(path) = self
            .file_picker
            .current_entry()
            .filter(|e| e.is_image)
            .map(|e| e.path.clone())
        else {
            return;
        };
        if self.load_image(&path) {
            self.screen = Screen::Main;
        }
    }
}
