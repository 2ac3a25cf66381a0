use git2::Repository;
use std::path::{Path, PathBuf};

/// Picks the directory a structure is created in.
///
/// An explicit destination always wins. Otherwise the working tree of the git
/// repository enclosing `cwd` is used, the closest thing a terminal has to an
/// open workspace. Bare repositories and plain directories yield `None`.
pub fn resolve_destination(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    match Repository::discover(cwd) {
        Ok(repository) => {
            let workdir = repository.workdir().map(Path::to_path_buf);
            if let Some(dir) = &workdir {
                log::debug!("using git workspace: {}", dir.display());
            }
            workdir
        }
        Err(error) => {
            log::debug!("no git workspace above {}: {}", cwd.display(), error);
            None
        }
    }
}
