//! Image selection and preview.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
];

const FALLBACK_MIME: &str = "application/octet-stream";

/// A user-chosen image, read into memory once at selection time.
///
/// Contents are not inspected; a malformed file is sent as-is and left for the
/// service to reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl ImageFile {
    /// Read a file from disk.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(name, bytes))
    }

    /// Build an image from in-memory bytes. The MIME type is guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let mime = mime_for(Path::new(&name)).unwrap_or(FALLBACK_MIME).to_string();
        Self {
            name,
            mime,
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:<mime>;base64,<payload>` for this file.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Whether `path` has an extension the file picker offers for selection.
pub fn is_image_path(path: &Path) -> bool {
    mime_for(path).is_some()
}

/// Notification from the acquirer to the input panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaChange {
    Selected(ImageFile),
    Cleared,
}

/// Holds at most one pending image and its preview.
#[derive(Debug, Default)]
pub struct MediaAcquirer {
    current: Option<ImageFile>,
    preview: Option<String>,
}

impl MediaAcquirer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any held image with `file`.
    pub fn select(&mut self, file: ImageFile) -> MediaChange {
        tracing::debug!(file = file.name(), bytes = file.len(), "image selected");
        self.preview = None;
        self.current = Some(file.clone());
        MediaChange::Selected(file)
    }

    pub fn clear(&mut self) -> MediaChange {
        self.current = None;
        self.preview = None;
        MediaChange::Cleared
    }

    pub fn current(&self) -> Option<&ImageFile> {
        self.current.as_ref()
    }

    /// Data URI of the held image, computed on first request.
    pub fn preview(&mut self) -> Option<&str> {
        let file = self.current.as_ref()?;
        Some(self.preview.get_or_insert_with(|| file.data_uri()).as_str())
    }

    /// Preview if it has already been computed.
    pub fn cached_preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }
}
