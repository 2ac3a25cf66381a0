use crate::{
    config::{Config, ConfigError},
    entry::{Entry, EntryKind},
    errors::IoError,
    fs::{FileSystem, StdFs},
    materialize::{materialize_with, MaterializeError, Outcome, Step},
    parser::Parser,
    prompt::PromptError,
};
use std::path::{Path, PathBuf};

/// The three ways a run can fail that a host is expected to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    NoDestination,
    EmptyStructure,
    FilesystemError,
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SproutError {
    #[error("No destination directory is available")]
    #[diagnostic(
        code(sprout::no_destination),
        help("Pass --destination, or run inside a git working tree")
    )]
    NoDestination,

    #[error("No valid folder structure found in the input")]
    #[diagnostic(
        code(sprout::empty_structure),
        help("Every line needs a name after its indentation, for example `├── src/`")
    )]
    EmptyStructure,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Filesystem(#[from] MaterializeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),
}
impl SproutError {
    /// `None` for failures outside the parse-and-create core, such as a bad config file.
    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            Self::NoDestination => Some(FailureCategory::NoDestination),
            Self::EmptyStructure => Some(FailureCategory::EmptyStructure),
            Self::Filesystem(_) => Some(FailureCategory::FilesystemError),
            Self::Config(_) | Self::Prompt(_) | Self::Io(_) => None,
        }
    }

    /// The entry that could not be created, for filesystem failures.
    pub fn failed_entry(&self) -> Option<(&Path, EntryKind)> {
        match self {
            Self::Filesystem(error) => Some((error.path.as_path(), error.kind)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Config file to use instead of `sprout.toml` in the destination.
    pub config: Option<PathBuf>,
}

/// Parsed entries bound to the directory they will be created in.
#[derive(Debug, Clone)]
pub struct Plan {
    pub destination: PathBuf,
    pub entries: Vec<Entry>,
}
impl Plan {
    pub fn apply(&self) -> Result<Created, SproutError> {
        self.apply_with(&StdFs, |_| {})
    }

    /// Materializes the plan on `fs`, reporting each step to `on_step` as it completes.
    pub fn apply_with<F, S>(&self, fs: &F, on_step: S) -> Result<Created, SproutError>
    where
        F: FileSystem + ?Sized,
        S: FnMut(&Step),
    {
        let steps = materialize_with(fs, &self.destination, &self.entries, on_step)?;

        let created = steps
            .iter()
            .filter(|step| step.outcome == Outcome::Created)
            .count();

        log::info!(
            "{} created, {} already present in {}",
            created,
            steps.len() - created,
            self.destination.display()
        );

        Ok(Created {
            destination: self.destination.clone(),
            steps,
        })
    }
}

/// A finished run.
#[derive(Debug, Clone)]
pub struct Created {
    pub destination: PathBuf,
    pub steps: Vec<Step>,
}

/// Checks the destination, loads classification settings and parses `text`.
///
/// # Errors
///
/// Returns a [`SproutError`] if:
///
/// - `destination` is `None` (checked before anything else).
/// - The config file cannot be read or parsed.
/// - The text holds no usable lines.
pub fn prepare(
    text: &str,
    destination: Option<&Path>,
    options: &Options,
) -> Result<Plan, SproutError> {
    let destination = destination.ok_or(SproutError::NoDestination)?;

    let config = Config::discover(options.config.as_deref(), Some(destination))?;

    let entries = Parser::new(config.classifier()).parse(text);

    if entries.is_empty() {
        return Err(SproutError::EmptyStructure);
    }

    log::debug!(
        "parsed {} entries for {}",
        entries.len(),
        destination.display()
    );

    Ok(Plan {
        destination: destination.to_path_buf(),
        entries,
    })
}

/// Parses `text` and creates the resulting folders and files under `destination`.
///
/// # Errors
///
/// Returns a [`SproutError`] if:
///
/// - `destination` is `None`.
/// - The config file cannot be read or parsed.
/// - The text holds no usable lines.
/// - A directory or file cannot be created; earlier entries stay on disk.
pub fn create_structure(
    text: &str,
    destination: Option<&Path>,
    options: &Options,
) -> Result<Created, SproutError> {
    prepare(text, destination, options)?.apply()
}

/// Parses `text` without touching the filesystem.
///
/// `directory` is where `sprout.toml` is looked up when no explicit config is
/// given, normally the destination a later `create` would use.
///
/// # Errors
///
/// Returns a [`SproutError`] if the config file cannot be loaded or the text
/// holds no usable lines.
pub fn preview_structure(
    text: &str,
    directory: Option<&Path>,
    options: &Options,
) -> Result<Vec<Entry>, SproutError> {
    let config = Config::discover(options.config.as_deref(), directory)?;

    let entries = Parser::new(config.classifier()).parse(text);

    if entries.is_empty() {
        return Err(SproutError::EmptyStructure);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    const TREE: &str = "\
├── src/
│   ├── components/
│   │   └── Header.jsx
│   └── index.js
└── package.json
";

    #[test]
    fn missing_destination_is_reported_first() {
        let error = create_structure("", None, &Options::default()).unwrap_err();

        assert_eq!(error.category(), Some(FailureCategory::NoDestination));
    }

    #[test]
    fn blank_input_is_empty_structure() {
        let dir = tempfile::tempdir().unwrap();

        let error = create_structure("\n  \n│\n", Some(dir.path()), &Options::default()).unwrap_err();

        assert_eq!(error.category(), Some(FailureCategory::EmptyStructure));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn creates_tree_and_reports_steps() {
        let dir = tempfile::tempdir().unwrap();

        let created = create_structure(TREE, Some(dir.path()), &Options::default()).unwrap();

        assert_eq!(created.destination, dir.path());
        assert_eq!(created.steps.len(), 5);
        assert!(dir.path().join("src/components/Header.jsx").is_file());
        assert!(dir.path().join("src/index.js").is_file());
        assert!(dir.path().join("package.json").is_file());
    }

    #[test]
    fn config_in_destination_is_used() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[overrides]\n\"Makefile\" = \"file\"\n",
        )
        .unwrap();

        create_structure("Makefile\n", Some(dir.path()), &Options::default()).unwrap();

        assert!(dir.path().join("Makefile").is_file());
    }

    #[test]
    fn filesystem_failure_names_entry() {
        let dir = tempfile::tempdir().unwrap();
        // a file where a folder is expected
        std::fs::write(dir.path().join("src"), "").unwrap();

        let error = create_structure("src/\n  lib/\n", Some(dir.path()), &Options::default())
            .unwrap_err();

        assert_eq!(error.category(), Some(FailureCategory::FilesystemError));
        let (path, kind) = error.failed_entry().unwrap();
        assert_eq!(path, Path::new("src/lib"));
        assert_eq!(kind, EntryKind::Folder);
    }

    #[test]
    fn apply_reports_each_step_as_it_happens() {
        let dir = tempfile::tempdir().unwrap();
        let plan = prepare(TREE, Some(dir.path()), &Options::default()).unwrap();
        let mut seen = Vec::new();

        plan.apply_with(&StdFs, |step| seen.push(step.entry.path.clone()))
            .unwrap();

        assert_eq!(seen.len(), plan.entries.len());
        assert_eq!(seen[0], PathBuf::from("src"));
    }

    #[test]
    fn preview_never_touches_disk() {
        let dir = tempfile::tempdir().unwrap();

        let entries = preview_structure(TREE, Some(dir.path()), &Options::default()).unwrap();

        assert_eq!(entries.len(), 5);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(
            preview_structure("", None, &Options::default())
                .unwrap_err()
                .category(),
            Some(FailureCategory::EmptyStructure)
        );
    }

    #[test]
    fn preview_uses_config_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[overrides]\n\"Dockerfile\" = \"file\"\n",
        )
        .unwrap();
        let text = "app/\n  Dockerfile\n";

        let configured = preview_structure(text, Some(dir.path()), &Options::default()).unwrap();
        let defaults = preview_structure(text, None, &Options::default()).unwrap();

        assert_eq!(configured[1].kind, EntryKind::File);
        assert_eq!(defaults[1].kind, EntryKind::Folder);
    }
}
