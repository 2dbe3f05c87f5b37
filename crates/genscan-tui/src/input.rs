use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use genscan_core::DetectionMode;

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::Editing => map_key_editing(key),
            }
        }
        Event::Paste(text) if *input_mode == InputMode::Editing => Action::Paste(text.clone()),
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Tab | KeyCode::BackTab => Action::SwitchMode,
        KeyCode::Char('1') => Action::SelectMode(DetectionMode::ImageDetection),
        KeyCode::Char('2') => Action::SelectMode(DetectionMode::TextDetection),
        KeyCode::Enter => Action::DrillIn,
        KeyCode::Char('s') => Action::Submit,
        KeyCode::Char('o') => Action::OpenFilePicker,
        KeyCode::Char('x') => Action::ClearImage,
        KeyCode::Char('i') | KeyCode::Char('e') => Action::StartEditing,
        KeyCode::Char('t') => Action::CycleTheme,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

fn map_key_editing(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::StopEditing,
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Submit,
        KeyCode::Enter => Action::TextInput('\n'),
        KeyCode::Tab => Action::TextInput('\t'),
        KeyCode::Char(c) => Action::TextInput(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::DeleteForward,
        KeyCode::Left => Action::CursorLeft,
        KeyCode::Right => Action::CursorRight,
        KeyCode::Home => Action::CursorHome,
        KeyCode::End => Action::CursorEnd,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        assert_eq!(map_event(&ctrl('c'), &InputMode::Normal), Action::Quit);
        assert_eq!(map_event(&ctrl('c'), &InputMode::Editing), Action::Quit);
    }

    #[test]
    fn letters_are_commands_in_normal_mode() {
        assert_eq!(
            map_event(&press(KeyCode::Char('s')), &InputMode::Normal),
            Action::Submit
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('2')), &InputMode::Normal),
            Action::SelectMode(DetectionMode::TextDetection)
        );
        assert_eq!(
            map_event(&press(KeyCode::Tab), &InputMode::Normal),
            Action::SwitchMode
        );
    }

    #[test]
    fn letters_are_text_in_editing_mode() {
        assert_eq!(
            map_event(&press(KeyCode::Char('s')), &InputMode::Editing),
            Action::TextInput('s')
        );
        assert_eq!(
            map_event(&press(KeyCode::Enter), &InputMode::Editing),
            Action::TextInput('\n')
        );
        assert_eq!(map_event(&ctrl('s'), &InputMode::Editing), Action::Submit);
        assert_eq!(
            map_event(&Event::Paste("pasted".into()), &InputMode::Editing),
            Action::Paste("pasted".into())
        );
        assert_eq!(
            map_event(&Event::Paste("pasted".into()), &InputMode::Normal),
            Action::None
        );
        assert_eq!(
            map_event(&press(KeyCode::Esc), &InputMode::Editing),
            Action::StopEditing
        );
    }
}
