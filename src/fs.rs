use std::{fs, io, path::Path};

/// The storage primitives materialization needs.
///
/// [`StdFs`] talks to the real disk. Tests swap in an in-memory implementation to
/// inject failures.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    /// Creates `path`, and every missing ancestor when `recursive` is set.
    fn create_dir(&self, path: &Path, recursive: bool) -> io::Result<()>;

    /// Creates an empty file. Must fail rather than truncate if `path` already exists.
    fn write_empty_file(&self, path: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by [`std::fs`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl FileSystem for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir(&self, path: &Path, recursive: bool) -> io::Result<()> {
        if recursive {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        }
    }

    fn write_empty_file(&self, path: &Path) -> io::Result<()> {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map(|_| ())
    }
}
