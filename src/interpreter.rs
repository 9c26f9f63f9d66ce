use crate::env::Environment;
use crate::error::{EvalError, ShellError};
use crate::glob::{self, Expansion};
use crate::lexer::{self, Token};
use crate::registry::Registry;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{Read, Write};
use tracing::{debug, warn};

/// Shell core: tokenizes a command line, expands wildcard arguments and
/// dispatches to a registered application.
///
/// Each evaluation runs to completion before returning. The interpreter
/// owns its [`Environment`], so evaluations never depend on process-wide
/// state other than the filesystem.
///
/// Example
/// ```
/// use glob_shell::Interpreter;
/// let sh = Interpreter::default();
/// let mut out = Vec::new();
/// sh.parse_and_evaluate("echo hello world", Some(&mut out)).unwrap();
/// assert_eq!(out, b"hello world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    registry: Registry,
}

impl Interpreter {
    /// Create an interpreter with an explicit environment and command set.
    pub fn new(env: Environment, registry: Registry) -> Self {
        Self { env, registry }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Access the command set, e.g. to register more applications.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Evaluate one command line, reading input from the process stdin.
    pub fn parse_and_evaluate(
        &self,
        line: &str,
        stdout: Option<&mut dyn Write>,
    ) -> Result<(), EvalError> {
        let stdin = std::io::stdin();
        let mut stdin = stdin.lock();
        self.evaluate_with_input(line, Some(&mut stdin), stdout)
    }

    /// Evaluate one command line with caller-supplied streams.
    ///
    /// Shell-level failures (missing output, bad quoting, unreadable
    /// directories during expansion, unknown command) stop the evaluation
    /// before the application starts. A command whose arguments were all
    /// wildcard patterns matching nothing is resolved but not run.
    /// Application failures are returned as they are, with whatever the
    /// application already wrote left in place.
    pub fn evaluate_with_input(
        &self,
        line: &str,
        stdin: Option<&mut dyn Read>,
        stdout: Option<&mut dyn Write>,
    ) -> Result<(), EvalError> {
        let Some(stdout) = stdout else {
            return Err(ShellError::NoOutput.into());
        };
        let Some(command) = lexer::tokenize(line).map_err(ShellError::from)? else {
            return Ok(());
        };

        let args = self.expand_arguments(&command.args)?;
        if args.is_empty() && !command.args.is_empty() {
            // Every argument was a pattern that matched nothing. Running the
            // command bare would make it fall back to reading stdin.
            self.registry.resolve(&command.name)?;
            warn!(name = %command.name, "all arguments vanished, command not run");
            return Ok(());
        }
        self.registry
            .dispatch(&command.name, &args, stdin, Some(stdout), &self.env)
    }

    /// Expand every token in order and flatten the results.
    ///
    /// A wildcard token that matches nothing contributes no argument.
    pub fn expand_arguments(&self, tokens: &[Token]) -> Result<Vec<String>, ShellError> {
        let mut args = Vec::with_capacity(tokens.len());
        for token in tokens {
            match glob::expand_token(token, self.env.current_dir())? {
                Expansion::NoMatch => {
                    warn!(pattern = %token.text(), "no matches found, dropping argument");
                }
                expansion => args.extend(expansion.into_args()),
            }
        }
        debug!(?args, "expanded arguments");
        Ok(args)
    }

    /// Read-Eval-Print Loop over the terminal.
    ///
    /// Errors are printed to stderr and the loop keeps going; `exit`, Ctrl-D
    /// or a terminal error ends it.
    pub fn repl(&self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline("$ ") {
                Ok(line) => {
                    if line.trim() == "exit" {
                        break;
                    }
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    let stdout = std::io::stdout();
                    let mut stdout = stdout.lock();
                    if let Err(err) = self.parse_and_evaluate(&line, Some(&mut stdout)) {
                        eprintln!("{}", err);
                    }
                    let _ = stdout.flush();
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Interpreter rooted at the process working directory with every
    /// builtin registered.
    fn default() -> Self {
        Self::new(Environment::new(), Registry::default())
    }
}
