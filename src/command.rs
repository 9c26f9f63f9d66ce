use crate::env::Environment;
use crate::error::ApplicationError;
use argh::{EarlyExit, FromArgs};
use std::io::{Read, Write};
use std::marker::PhantomData;

/// Object-safe capability implemented by every command the shell can run.
///
/// Streams are borrowed from the caller: an application reads and writes
/// them but never closes them. Either stream may be absent, and each
/// application decides what that means for it.
pub trait Application {
    /// Name the application is registered under.
    fn name(&self) -> &str;

    /// Run the application with already expanded arguments.
    fn run(
        &self,
        args: &[String],
        stdin: Option<&mut dyn Read>,
        stdout: Option<&mut dyn Write>,
        env: &Environment,
    ) -> Result<(), ApplicationError>;
}

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// in-process. Wrap one in [`Builtin`] to get an [`Application`].
pub trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cat" or "echo".
    fn name() -> &'static str;

    /// Whether every argument is an operand.
    ///
    /// Commands taking only file operands set this so that expanded paths
    /// such as `-x.txt` or `help` are never read as flags or help requests.
    fn operands_only() -> bool {
        false
    }

    /// Executes the command with parsed arguments.
    ///
    /// The output stream is always present here; [`Builtin`] rejects a
    /// missing one before parsing.
    fn execute(
        self,
        stdin: Option<&mut dyn Read>,
        stdout: &mut dyn Write,
        env: &Environment,
    ) -> Result<(), ApplicationError>;
}

/// Adapter turning a [`BuiltinCommand`] into an [`Application`].
pub struct Builtin<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Builtin<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BuiltinCommand> Application for Builtin<T> {
    fn name(&self) -> &str {
        T::name()
    }

    fn run(
        &self,
        args: &[String],
        stdin: Option<&mut dyn Read>,
        stdout: Option<&mut dyn Write>,
        env: &Environment,
    ) -> Result<(), ApplicationError> {
        let app = T::name();
        let Some(stdout) = stdout else {
            return Err(ApplicationError::NoOutput {
                app: app.to_string(),
            });
        };

        let mut argv: Vec<&str> = Vec::with_capacity(args.len() + 1);
        if T::operands_only() {
            argv.push("--");
        }
        argv.extend(args.iter().map(String::as_str));
        match T::from_args(&[app], &argv) {
            Ok(cmd) => cmd.execute(stdin, stdout, env),
            Err(EarlyExit {
                output,
                status: Ok(()),
            }) => stdout
                .write_all(output.as_bytes())
                .map_err(|e| ApplicationError::io(app, e)),
            Err(EarlyExit { output, .. }) => Err(ApplicationError::InvalidArgs {
                app: app.to_string(),
                message: output.trim_end().to_string(),
            }),
        }
    }
}
