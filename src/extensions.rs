use indexmap::IndexSet;

/// Suffixes that mark a name as a file when no trailing separator says otherwise.
const DEFAULT_EXTENSIONS: &[&str] = &[
    ".js", ".ts", ".jsx", ".tsx", ".vue", ".py", ".java", ".cpp", ".c", ".h", ".html", ".css",
    ".scss", ".sass", ".less", ".json", ".xml", ".yaml", ".yml", ".md", ".txt", ".csv", ".log",
    ".env", ".gitignore", ".dockerignore", ".php", ".rb", ".go", ".rs", ".swift", ".kt", ".dart",
    ".scala", ".sql", ".sh", ".bat", ".ps1", ".dockerfile", ".makefile", ".png", ".jpg", ".jpeg",
    ".gif", ".svg", ".ico", ".pdf", ".zip", ".tar", ".gz", ".rar", ".7z",
];

/// Case-insensitive table of file suffixes used to tell files from folders.
///
/// This is a heuristic: a folder literally named `v1.0` and a file named `notes`
/// cannot be told apart by suffix alone. Callers that know better should use a
/// trailing separator or a classification override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTable {
    suffixes: IndexSet<String>,
}
impl ExtensionTable {
    /// An empty table. Every name without a trailing separator becomes a folder.
    pub fn new() -> Self {
        Self {
            suffixes: IndexSet::new(),
        }
    }

    /// Adds a suffix. `rs`, `.rs` and `.RS` are all stored as `.rs`.
    pub fn insert(&mut self, suffix: &str) -> bool {
        let trimmed = suffix.trim().trim_start_matches('.');
        if trimmed.is_empty() {
            return false;
        }

        self.suffixes.insert(format!(".{}", trimmed.to_lowercase()))
    }

    pub fn extend<I, S>(&mut self, suffixes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for suffix in suffixes {
            self.insert(suffix.as_ref());
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();

        self.suffixes.iter().any(|suffix| lowered.ends_with(suffix))
    }

    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }
}
impl Default for ExtensionTable {
    fn default() -> Self {
        let mut table = Self::new();
        table.extend(DEFAULT_EXTENSIONS);
        table
    }
}
