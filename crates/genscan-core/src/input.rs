use crate::DetectionMode;
use crate::media::{ImageFile, MediaAcquirer, MediaChange};

/// Mode selection plus the pending content for each mode.
///
/// Leaving image mode drops the pending image. The pending text is kept
/// across switches. Only the content matching the active mode is submitted.
#[derive(Debug, Default)]
pub struct InputPanel {
    mode: DetectionMode,
    media: MediaAcquirer,
    text: String,
}

impl InputPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the mode actually changed.
    pub fn set_mode(&mut self, mode: DetectionMode) -> bool {
        if self.mode == mode {
            return false;
        }
        if self.mode == DetectionMode::ImageDetection {
            self.media.clear();
        }
        self.mode = mode;
        true
    }

    /// Select a new image, or clear the current one with `None`.
    pub fn capture_image(&mut self, file: Option<ImageFile>) -> MediaChange {
        match file {
            Some(file) => self.media.select(file),
            None => self.media.clear(),
        }
    }

    pub fn capture_text(&mut self, value: impl Into<String>) {
        self.text = value.into();
    }

    /// In-place edit access for the TUI text editor.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.media.current()
    }

    pub fn preview(&mut self) -> Option<&str> {
        self.media.preview()
    }
}
