use genscan_core::DetectionMode;

/// A user intent, decoupled from the key that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NavigateBack,
    ToggleHelp,
    Tick,
    Resize(u16, u16),

    // Main screen
    SwitchMode,
    SelectMode(DetectionMode),
    /// Enter: submit on the main screen, open/select in the file picker.
    DrillIn,
    Submit,
    OpenFilePicker,
    ClearImage,
    StartEditing,
    CycleTheme,

    // Text editing
    StopEditing,
    TextInput(char),
    Paste(String),
    Backspace,
    DeleteForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,

    // Lists
    MoveDown,
    MoveUp,
    PageDown,
    PageUp,
    GoTop,
    GoBottom,

    None,
}
