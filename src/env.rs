use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Evaluation context shared by the shell core and the builtins.
///
/// The environment is passed explicitly to every component that resolves a
/// relative path. It is never mutated during an evaluation, so two
/// interpreters with different environments can run side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    current_dir: PathBuf,
}

impl Environment {
    /// Capture the working directory of the current process.
    ///
    /// Falls back to `.` when the process directory cannot be determined
    /// (e.g. it was removed while we were running).
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { current_dir }
    }

    /// Build an environment rooted at an explicit directory.
    pub fn with_current_dir(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
        }
    }

    /// The directory relative paths are resolved against.
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Resolve a command argument to a filesystem path.
    ///
    /// Absolute arguments are returned as they are; relative ones are joined
    /// onto [`Environment::current_dir`].
    pub fn resolve(&self, arg: impl AsRef<Path>) -> PathBuf {
        let arg = arg.as_ref();
        if arg.is_absolute() {
            arg.to_path_buf()
        } else {
            self.current_dir.join(arg)
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
