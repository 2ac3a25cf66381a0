use crate::{entry::EntryKind, extensions::ExtensionTable};
use indexmap::IndexMap;

pub(crate) const SEPARATORS: &[char] = &['/', '\\'];

/// Decides once, per name, whether a parsed line is a file or a folder.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    pub extensions: ExtensionTable,
    /// Explicit kinds keyed by clean name, e.g. `Dockerfile = file`.
    pub overrides: IndexMap<String, EntryKind>,
}
impl Classifier {
    pub fn new(extensions: ExtensionTable, overrides: IndexMap<String, EntryKind>) -> Self {
        Self {
            extensions,
            overrides,
        }
    }

    /// Classifies `name` as written on the line, trailing separator included.
    ///
    /// A trailing separator always wins, then an override, then the extension table.
    /// Anything left over is a folder.
    pub fn classify(&self, name: &str) -> EntryKind {
        if name.ends_with(SEPARATORS) {
            return EntryKind::Folder;
        }

        if let Some(kind) = self.overrides.get(clean_name(name)) {
            return *kind;
        }

        if self.extensions.matches(name) {
            EntryKind::File
        } else {
            EntryKind::Folder
        }
    }
}

/// Strips surrounding separators so the name can be joined onto a path.
pub fn clean_name(name: &str) -> &str {
    name.trim_matches(SEPARATORS)
}
