use crate::{
    entry::{Entry, EntryKind},
    errors::{FileOperation, IoError},
    fs::FileSystem,
    utils::normalize_relative,
};
use miette::Diagnostic;
use std::{
    fmt, io,
    path::{Path, PathBuf},
    slice,
};
use thiserror::Error;

/// What happened to a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
    Failed(String),
}
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "create"),
            Self::AlreadyExists => write!(f, "exists"),
            Self::Failed(_) => write!(f, "failed"),
        }
    }
}

/// An entry paired with its [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub entry: Entry,
    pub outcome: Outcome,
}

#[derive(Debug, Error, Diagnostic)]
#[error("failed to create {kind}: {}", .path.display())]
#[diagnostic(
    code(sprout::materialize::filesystem),
    help("Entries created before the failure were left in place.")
)]
pub struct MaterializeError {
    /// The failing entry's relative path.
    pub path: PathBuf,
    pub kind: EntryKind,
    #[source]
    pub source: IoError,
    /// Every step taken, ending with the failed one.
    pub steps: Vec<Step>,
}

/// Applies entries to a [`FileSystem`] one at a time, in input order.
///
/// Each call to [`Iterator::next`] performs exactly one entry's operations, so
/// a caller can stop between entries by dropping the iterator. Whatever was
/// created so far stays on disk. The iterator ends after the first failure;
/// [`Materializer::take_failure`] hands back the error, without its step log.
pub struct Materializer<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    base: &'a Path,
    entries: slice::Iter<'a, Entry>,
    failure: Option<MaterializeError>,
    done: bool,
}
impl<'a, F: FileSystem + ?Sized> Materializer<'a, F> {
    pub fn new(fs: &'a F, base: &'a Path, entries: &'a [Entry]) -> Self {
        Self {
            fs,
            base,
            entries: entries.iter(),
            failure: None,
            done: false,
        }
    }

    pub fn take_failure(&mut self) -> Option<MaterializeError> {
        self.failure.take()
    }

    fn apply(&self, entry: &Entry) -> Result<Outcome, IoError> {
        let target = self.resolve(entry)?;

        match entry.kind {
            EntryKind::Folder => {
                if self.fs.exists(&target) {
                    return Ok(Outcome::AlreadyExists);
                }

                self.mkdir(&target)?;

                Ok(Outcome::Created)
            }
            EntryKind::File => {
                // the parent may be missing when its folder line was dropped or reordered
                if let Some(parent) = target.parent() {
                    if !self.fs.exists(parent) {
                        log::debug!("creating missing parent: {}", parent.display());
                        self.mkdir(parent)?;
                    }
                }

                if self.fs.exists(&target) {
                    return Ok(Outcome::AlreadyExists);
                }

                self.fs
                    .write_empty_file(&target)
                    .map_err(|error| IoError::new(FileOperation::CreateFile, target.clone(), error))?;

                Ok(Outcome::Created)
            }
        }
    }

    fn resolve(&self, entry: &Entry) -> Result<PathBuf, IoError> {
        match normalize_relative(&entry.path) {
            Some(relative) => Ok(self.base.join(relative)),
            None => {
                let error = io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "path is not relative to the destination",
                );

                Err(IoError::new(
                    FileOperation::create(entry.kind),
                    entry.path.clone(),
                    error,
                ))
            }
        }
    }

    fn mkdir(&self, path: &Path) -> Result<(), IoError> {
        self.fs
            .create_dir(path, true)
            .map_err(|error| IoError::new(FileOperation::CreateFolder, path.to_path_buf(), error))
    }
}
impl<F: FileSystem + ?Sized> Iterator for Materializer<'_, F> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.done {
            return None;
        }

        let Some(entry) = self.entries.next() else {
            self.done = true;
            return None;
        };

        let outcome = match self.apply(entry) {
            Ok(outcome) => outcome,
            Err(error) => {
                log::debug!("{} ({})", error, error.source);
                let reason = error.source.to_string();
                self.failure = Some(MaterializeError {
                    path: entry.path.clone(),
                    kind: entry.kind,
                    source: error,
                    steps: Vec::new(),
                });
                self.done = true;
                Outcome::Failed(reason)
            }
        };

        log::debug!("{} {}: {}", outcome, entry.kind, entry.path.display());

        Some(Step {
            entry: entry.clone(),
            outcome,
        })
    }
}

/// Creates every entry under `base`, skipping anything that already exists.
///
/// Stops at the first filesystem error. Nothing is rolled back.
pub fn materialize<F: FileSystem + ?Sized>(
    fs: &F,
    base: &Path,
    entries: &[Entry],
) -> Result<Vec<Step>, MaterializeError> {
    materialize_with(fs, base, entries, |_| {})
}

/// Like [`materialize`], handing each step to `on_step` as soon as it completes.
pub fn materialize_with<F, S>(
    fs: &F,
    base: &Path,
    entries: &[Entry],
    mut on_step: S,
) -> Result<Vec<Step>, MaterializeError>
where
    F: FileSystem + ?Sized,
    S: FnMut(&Step),
{
    let mut materializer = Materializer::new(fs, base, entries);
    let mut steps = Vec::with_capacity(entries.len());

    for step in materializer.by_ref() {
        on_step(&step);
        steps.push(step);
    }

    match materializer.take_failure() {
        None => Ok(steps),
        Some(mut error) => {
            error.steps = steps;
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fs::StdFs, parser::parse};
    use std::{cell::RefCell, collections::BTreeSet};

    /// In-memory filesystem that fails on chosen paths.
    #[derive(Default)]
    struct MemoryFs {
        dirs: RefCell<BTreeSet<PathBuf>>,
        files: RefCell<BTreeSet<PathBuf>>,
        broken: BTreeSet<PathBuf>,
    }
    impl MemoryFs {
        fn breaking(path: &str) -> Self {
            Self {
                broken: BTreeSet::from([PathBuf::from(path)]),
                ..Self::default()
            }
        }

        fn check(&self, path: &Path) -> io::Result<()> {
            if self.broken.contains(path) {
                Err(io::Error::from(io::ErrorKind::PermissionDenied))
            } else {
                Ok(())
            }
        }
    }
    impl FileSystem for MemoryFs {
        fn exists(&self, path: &Path) -> bool {
            self.dirs.borrow().contains(path) || self.files.borrow().contains(path)
        }

        fn create_dir(&self, path: &Path, recursive: bool) -> io::Result<()> {
            self.check(path)?;
            assert!(recursive, "materializer always creates recursively");
            for ancestor in path.ancestors() {
                if !ancestor.as_os_str().is_empty() {
                    self.dirs.borrow_mut().insert(ancestor.to_path_buf());
                }
            }
            Ok(())
        }

        fn write_empty_file(&self, path: &Path) -> io::Result<()> {
            self.check(path)?;
            if !self.files.borrow_mut().insert(path.to_path_buf()) {
                return Err(io::Error::from(io::ErrorKind::AlreadyExists));
            }
            Ok(())
        }
    }

    fn outcomes(steps: &[Step]) -> Vec<Outcome> {
        steps.iter().map(|step| step.outcome.clone()).collect()
    }

    fn file(path: &str, level: usize) -> Entry {
        Entry {
            name: path.to_string(),
            path: PathBuf::from(path),
            kind: EntryKind::File,
            level,
        }
    }

    #[test]
    fn creates_entries_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let entries = parse("src/\n  main.rs\n  bin/\nREADME.md\n");

        let steps = materialize(&StdFs, dir.path(), &entries).unwrap();

        assert!(steps.iter().all(|step| step.outcome == Outcome::Created));
        assert!(dir.path().join("src").is_dir());
        assert!(dir.path().join("src/bin").is_dir());
        assert!(dir.path().join("src/main.rs").is_file());
        assert!(dir.path().join("README.md").is_file());
    }

    #[test]
    fn second_run_only_finds_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let entries = parse("src/\n  main.rs\nREADME.md\n");

        materialize(&StdFs, dir.path(), &entries).unwrap();
        let steps = materialize(&StdFs, dir.path(), &entries).unwrap();

        assert_eq!(outcomes(&steps), vec![Outcome::AlreadyExists; 3]);
    }

    #[test]
    fn existing_file_content_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "hello").unwrap();

        let steps = materialize(&StdFs, dir.path(), &parse("README.md")).unwrap();

        assert_eq!(outcomes(&steps), vec![Outcome::AlreadyExists]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn file_without_declared_parent_gets_one() {
        let fs = MemoryFs::default();
        let base = Path::new("/base");
        let entries = vec![file("a/b/c.txt", 2)];

        let steps = materialize(&fs, base, &entries).unwrap();

        assert_eq!(outcomes(&steps), vec![Outcome::Created]);
        assert!(fs.dirs.borrow().contains(Path::new("/base/a/b")));
        assert!(fs.files.borrow().contains(Path::new("/base/a/b/c.txt")));
    }

    #[test]
    fn stops_at_first_failure() {
        let fs = MemoryFs::breaking("/base/locked");
        let base = Path::new("/base");
        let entries = parse("first/\nlocked/\n  inner.txt\nlast/\n");

        let error = materialize(&fs, base, &entries).unwrap_err();

        assert_eq!(error.path, PathBuf::from("locked"));
        assert_eq!(error.kind, EntryKind::Folder);
        assert_eq!(error.to_string(), "failed to create folder: locked");
        assert_eq!(
            error.source.source.kind(),
            io::ErrorKind::PermissionDenied
        );
        assert_eq!(error.steps.len(), 2);
        assert_eq!(error.steps[0].outcome, Outcome::Created);
        assert!(matches!(error.steps[1].outcome, Outcome::Failed(_)));
        assert!(!fs.exists(Path::new("/base/last")));
        // nothing is rolled back
        assert!(fs.exists(Path::new("/base/first")));
    }

    #[test]
    fn file_write_failure_is_reported_as_file() {
        let fs = MemoryFs::breaking("/base/src/main.rs");
        let entries = parse("src/\n  main.rs\n  lib.rs\n");

        let error = materialize(&fs, Path::new("/base"), &entries).unwrap_err();

        assert_eq!(error.path, PathBuf::from("src/main.rs"));
        assert_eq!(error.kind, EntryKind::File);
        assert_eq!(error.source.operation, FileOperation::CreateFile);
        assert_eq!(error.source.path, PathBuf::from("/base/src/main.rs"));
        assert_eq!(error.to_string(), "failed to create file: src/main.rs");
        assert_eq!(error.steps.len(), 2);
        assert!(!fs.exists(Path::new("/base/src/lib.rs")));
    }

    #[test]
    fn missing_parent_failure_is_reported_as_file() {
        let fs = MemoryFs::breaking("/base/a/b");
        let entries = vec![file("a/b/c.txt", 2)];

        let error = materialize(&fs, Path::new("/base"), &entries).unwrap_err();

        assert_eq!(error.kind, EntryKind::File);
        assert_eq!(error.source.operation, FileOperation::CreateFolder);
        assert_eq!(error.source.path, PathBuf::from("/base/a/b"));
        assert_eq!(error.source.kind(), io::ErrorKind::PermissionDenied);
        assert!(matches!(error.steps[0].outcome, Outcome::Failed(_)));
        assert!(fs.files.borrow().is_empty());
    }

    #[test]
    fn materialize_with_reports_steps_in_order() {
        let fs = MemoryFs::breaking("/base/two");
        let entries = parse("one/\ntwo/\nthree/\n");
        let mut seen = Vec::new();

        let error = materialize_with(&fs, Path::new("/base"), &entries, |step| {
            seen.push((step.entry.path.clone(), step.outcome.to_string()))
        })
        .unwrap_err();

        assert_eq!(
            seen,
            vec![
                (PathBuf::from("one"), "create".to_string()),
                (PathBuf::from("two"), "failed".to_string()),
            ]
        );
        assert_eq!(error.steps.len(), seen.len());
    }

    #[test]
    fn rejects_paths_outside_base() {
        let fs = MemoryFs::default();
        let entries = vec![file("../escape.txt", 0)];

        let error = materialize(&fs, Path::new("/base"), &entries).unwrap_err();

        assert_eq!(error.source.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(error.source.operation, FileOperation::CreateFile);
        assert!(fs.files.borrow().is_empty());
    }

    #[test]
    fn dropping_the_iterator_stops_between_entries() {
        let fs = MemoryFs::default();
        let entries = parse("one/\ntwo/\nthree/\n");

        let taken: Vec<Step> = Materializer::new(&fs, Path::new("/base"), &entries)
            .take(1)
            .collect();

        assert_eq!(taken.len(), 1);
        assert!(fs.exists(Path::new("/base/one")));
        assert!(!fs.exists(Path::new("/base/two")));
    }

    #[test]
    fn iterator_is_fused_after_failure() {
        let fs = MemoryFs::breaking("/base/one");
        let entries = parse("one/\ntwo/\n");
        let mut materializer = Materializer::new(&fs, Path::new("/base"), &entries);

        assert!(matches!(
            materializer.next().map(|step| step.outcome),
            Some(Outcome::Failed(_))
        ));
        assert!(materializer.next().is_none());
        assert!(materializer.take_failure().is_some());
    }
}
