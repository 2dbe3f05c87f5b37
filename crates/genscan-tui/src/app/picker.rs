use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use genscan_core::media::is_image_path;

/// One row of the directory listing.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    /// Only image files can be picked.
    pub is_image: bool,
}

impl FileEntry {
    fn parent_of(dir: &Path) -> Option<Self> {
        dir.parent().map(|parent| Self {
            name: "..".to_string(),
            path: parent.to_path_buf(),
            is_dir: true,
            is_image: false,
        })
    }

    fn from_dir_entry(entry: std::fs::DirEntry) -> Option<Self> {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            return None;
        }
        let path = entry.path();
        let is_dir = path.is_dir();
        Some(Self {
            is_image: !is_dir && is_image_path(&path),
            name,
            path,
            is_dir,
        })
    }
}

/// Browsing state: folders first, then files, each alphabetical.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    pub current_dir: PathBuf,
    pub entries: Vec<FileEntry>,
    pub cursor: usize,
}

impl FilePickerState {
    /// Start in the working directory.
    pub fn new() -> Self {
        Self::at(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    pub fn at(dir: PathBuf) -> Self {
        let mut state = Self {
            current_dir: dir,
            entries: Vec::new(),
            cursor: 0,
        };
        state.refresh_entries();
        state
    }

    /// Re-read the current directory and put the cursor on top.
    /// An unreadable directory shows only the parent link.
    pub fn refresh_entries(&mut self) {
        let mut listed: Vec<FileEntry> = match std::fs::read_dir(&self.current_dir) {
            Ok(rd) => rd
                .flatten()
                .filter_map(FileEntry::from_dir_entry)
                .collect(),
            Err(e) => {
                tracing::warn!(dir = %self.current_dir.display(), error = %e, "cannot list directory");
                Vec::new()
            }
        };
        listed.sort_by_key(|e| (Reverse(e.is_dir), e.name.to_lowercase()));

        self.entries = FileEntry::parent_of(&self.current_dir)
            .into_iter()
            .chain(listed)
            .collect();
        self.cursor = 0;
    }

    /// Descend into the highlighted folder. Returns false for files.
    pub fn enter_directory(&mut self) -> bool {
        let Some(dir) = self
            .current_entry()
            .filter(|e| e.is_dir)
            .map(|e| e.path.clone())
        else {
            return false;
        };
        self.current_dir = dir;
        self.refresh_entries();
        true
    }

    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor)
    }
}
