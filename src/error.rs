//! Error types for the shell.
//!
//! Failures come in two tiers. [`ShellError`] is raised by the shell core
//! before any application runs (tokenizing, glob expansion, dispatch), while
//! [`ApplicationError`] is raised by a builtin while it is running and may
//! follow partial output. [`EvalError`] carries either tier back to the caller
//! of [`Interpreter::parse_and_evaluate`](crate::Interpreter::parse_and_evaluate).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while splitting a command line into tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexingError {
    /// A closing quote (single or double) was not found.
    #[error("unterminated quote")]
    UnfinishedQuote,
}

/// Errors produced while expanding a wildcard pattern against the filesystem.
#[derive(Error, Debug)]
pub enum GlobError {
    /// A directory on the expansion path could not be listed.
    #[error("cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A path on the expansion path could not be inspected.
    #[error("cannot inspect {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The pattern has more path segments than the expander accepts.
    #[error("pattern has {depth} path segments, more than the supported maximum")]
    TooDeep { depth: usize },
}

/// Shell-level failures: the evaluation stops before any application runs.
#[derive(Error, Debug)]
pub enum ShellError {
    /// No output sink was supplied to the evaluation.
    #[error("output stream not provided")]
    NoOutput,

    #[error("syntax error: {0}")]
    Lexing(#[from] LexingError),

    #[error("glob expansion failed: {0}")]
    Glob(#[from] GlobError),

    /// No registered application has this name.
    #[error("command not found: {0}")]
    CommandNotFound(String),
}

/// Application-level failures raised by a running builtin.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{app}: output stream not provided")]
    NoOutput { app: String },

    #[error("{app}: input stream not provided")]
    NoInput { app: String },

    #[error("{app}: {path}: this is a directory")]
    IsDirectory { app: String, path: String },

    #[error("{app}: {path}: could not read file")]
    Unreadable {
        app: String,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{app}: {message}")]
    InvalidArgs { app: String, message: String },

    /// Reading from stdin or writing to stdout failed.
    #[error("{app}: {source}")]
    Io {
        app: String,
        #[source]
        source: io::Error,
    },

    /// Any other failure reported by an application.
    #[error("{app}: {message}")]
    Failed { app: String, message: String },
}

impl ApplicationError {
    /// Name of the application that failed.
    pub fn app(&self) -> &str {
        match self {
            Self::NoOutput { app }
            | Self::NoInput { app }
            | Self::IsDirectory { app, .. }
            | Self::Unreadable { app, .. }
            | Self::InvalidArgs { app, .. }
            | Self::Io { app, .. }
            | Self::Failed { app, .. } => app,
        }
    }

    pub(crate) fn io(app: &str, source: io::Error) -> Self {
        Self::Io {
            app: app.to_string(),
            source,
        }
    }
}

/// Result of a whole evaluation: either tier of failure.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl EvalError {
    /// Whether the failure happened before any application was started.
    pub fn is_shell_level(&self) -> bool {
        matches!(self, Self::Shell(_))
    }
}
