use crate::entry::EntryKind;
use miette::Diagnostic;
use std::{fmt, io, path::PathBuf};
use thiserror::Error;

/// The filesystem action an [`IoError`] interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    ReadInput,
    ReadConfig,
    ResolveWorkspace,
    CreateFolder,
    CreateFile,
}
impl FileOperation {
    /// The create operation matching an entry's kind.
    pub fn create(kind: EntryKind) -> Self {
        match kind {
            EntryKind::File => Self::CreateFile,
            EntryKind::Folder => Self::CreateFolder,
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::ReadInput => "reading the tree input",
            Self::ReadConfig => "reading the config file",
            Self::ResolveWorkspace => "resolving the working directory",
            Self::CreateFolder => "creating a folder",
            Self::CreateFile => "creating a file",
        }
    }
}
impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("I/O error: {operation} at '{}'", .path.display())]
#[diagnostic(
    code(sprout::io),
    help("Check file permissions, disk space, or that the path is correct.")
)]
pub struct IoError {
    pub operation: FileOperation,
    /// The path the operation touched; for entries, the absolute target.
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}
impl IoError {
    pub fn new(operation: FileOperation, path: PathBuf, error: io::Error) -> Self {
        Self {
            operation,
            path,
            source: error,
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}
