use serde::Deserialize;
use std::{fmt, path::PathBuf};

/// Whether an [`Entry`] should become a directory or an empty file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}
impl EntryKind {
    fn as_str(&self) -> &str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}
impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parsed line of a tree: a file or folder to create, relative to the destination.
///
/// Entries are produced in parse order, which always places a folder before
/// anything nested under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The line's content with the decorative prefix removed. A trailing separator
    /// (`src/`) is kept here; it is stripped from `path`.
    pub name: String,
    /// Ancestor folder names joined with this entry's clean name.
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Number of folders open above this entry. `0` means top level.
    pub level: usize,
}
impl Entry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}
