//! A tiny, embeddable command shell with wildcard expansion.
//!
//! A command line is split into tokens, every argument containing an unquoted
//! `*` is expanded against the filesystem (one path segment at a time, in
//! lexical order), and the command name is dispatched to a registered
//! application together with caller-supplied input and output streams.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`]
//! and [`registry`] let you plug in your own applications, and [`glob`]
//! exposes the expander on its own.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
pub mod glob;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod registry;

pub use builtin::{Cat, Echo, Grep, Pwd, Wc};
pub use error::{ApplicationError, EvalError, ShellError};
pub use interpreter::Interpreter;
