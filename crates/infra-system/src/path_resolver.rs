// Executable lookup on the search path
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use healthcheck_core::port::executable_resolver::ExecutableResolver;

/// Searches a `PATH`-style list of directories for an executable
pub struct PathResolver {
    search_path: Option<OsString>,
}

impl PathResolver {
    /// Use the inherited `PATH`
    pub fn from_env() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Use an explicit search path instead of the process environment
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use nix::unistd::{access, AccessFlags};

    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

impl ExecutableResolver for PathResolver {
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;

        for dir in std::env::split_paths(search_path) {
            // Empty entries mean the current directory
            let dir = if dir.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                dir
            };

            let candidate = dir.join(name);
            if is_executable(&candidate) {
                debug!(name = %name, path = %candidate.display(), "Executable found");
                return Some(candidate);
            }
        }

        debug!(name = %name, "Executable not found on search path");
        None
    }
}
