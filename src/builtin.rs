use crate::command::BuiltinCommand;
use crate::env::Environment;
use crate::error::ApplicationError;
use argh::FromArgs;
use regex::{Regex, RegexBuilder};
use std::fs;
use std::io::{Read, Write};
use tracing::debug;

/// Read a whole file named by a command argument.
///
/// Directories and unreadable paths are reported as application errors
/// naming the argument as the user typed it.
fn read_file(app: &str, arg: &str, env: &Environment) -> Result<Vec<u8>, ApplicationError> {
    let path = env.resolve(arg);
    if path.is_dir() {
        return Err(ApplicationError::IsDirectory {
            app: app.to_string(),
            path: arg.to_string(),
        });
    }
    fs::read(&path).map_err(|source| ApplicationError::Unreadable {
        app: app.to_string(),
        path: arg.to_string(),
        source,
    })
}

fn read_stdin(app: &str, stdin: Option<&mut dyn Read>) -> Result<Vec<u8>, ApplicationError> {
    let Some(stdin) = stdin else {
        return Err(ApplicationError::NoInput {
            app: app.to_string(),
        });
    };
    let mut buf = Vec::new();
    stdin
        .read_to_end(&mut buf)
        .map_err(|e| ApplicationError::io(app, e))?;
    Ok(buf)
}

#[derive(FromArgs)]
/// Concatenate files to standard output, each ending with exactly one newline.
/// Reads standard input when no file is given.
pub struct Cat {
    #[argh(positional, greedy)]
    /// files to print, relative to the current directory.
    pub files: Vec<String>,
}

impl Cat {
    /// Write `content` and terminate it with a newline unless it already
    /// ends with one.
    fn write_terminated(stdout: &mut dyn Write, content: &[u8]) -> Result<(), ApplicationError> {
        let io_err = |e| ApplicationError::io(Self::name(), e);
        stdout.write_all(content).map_err(io_err)?;
        if !content.ends_with(b"\n") {
            stdout.write_all(b"\n").map_err(io_err)?;
        }
        Ok(())
    }
}

impl BuiltinCommand for Cat {
    fn name() -> &'static str {
        "cat"
    }

    fn operands_only() -> bool {
        true
    }

    /// Stops at the first file that cannot be printed; files before it have
    /// already been written.
    fn execute(
        self,
        stdin: Option<&mut dyn Read>,
        stdout: &mut dyn Write,
        env: &Environment,
    ) -> Result<(), ApplicationError> {
        if self.files.is_empty() {
            let buf = read_stdin(Self::name(), stdin)?;
            return Self::write_terminated(stdout, &buf);
        }
        for file in &self.files {
            let content = read_file(Self::name(), file, env)?;
            debug!(file = %file, bytes = content.len(), "cat");
            Self::write_terminated(stdout, &content)?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Write the arguments to standard output, separated by spaces.
/// By default, a trailing newline is printed.
pub struct Echo {
    #[argh(switch, short = 'n')]
    /// do not output the trailing newline.
    pub no_newline: bool,

    #[argh(positional, greedy)]
    /// values to print as-is, separated by spaces.
    pub args: Vec<String>,
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn execute(
        self,
        _stdin: Option<&mut dyn Read>,
        stdout: &mut dyn Write,
        _env: &Environment,
    ) -> Result<(), ApplicationError> {
        let s = self.args.join(" ");
        let res = if self.no_newline {
            write!(stdout, "{}", s)
        } else {
            writeln!(stdout, "{}", s)
        };
        res.map_err(|e| ApplicationError::io(Self::name(), e))
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(
        self,
        _stdin: Option<&mut dyn Read>,
        stdout: &mut dyn Write,
        env: &Environment,
    ) -> Result<(), ApplicationError> {
        writeln!(stdout, "{}", env.current_dir().display())
            .map_err(|e| ApplicationError::io(Self::name(), e))
    }
}

#[derive(FromArgs)]
/// Count lines, words and bytes.
pub struct Wc {
    #[argh(positional, greedy)]
    /// files to count; standard input is used when none are given.
    pub files: Vec<String>,
}

impl Wc {
    fn counts(content: &[u8]) -> (usize, usize, usize) {
        let text = String::from_utf8_lossy(content);
        (
            text.lines().count(),
            text.split_whitespace().count(),
            content.len(),
        )
    }
}

impl BuiltinCommand for Wc {
    fn name() -> &'static str {
        "wc"
    }

    fn operands_only() -> bool {
        true
    }

    fn execute(
        self,
        stdin: Option<&mut dyn Read>,
        stdout: &mut dyn Write,
        env: &Environment,
    ) -> Result<(), ApplicationError> {
        let io_err = |e| ApplicationError::io(Self::name(), e);
        if self.files.is_empty() {
            let (lines, words, bytes) = Self::counts(&read_stdin(Self::name(), stdin)?);
            return writeln!(stdout, "{} {} {}", lines, words, bytes).map_err(io_err);
        }
        for file in &self.files {
            let (lines, words, bytes) = Self::counts(&read_file(Self::name(), file, env)?);
            writeln!(stdout, "{} {} {} {}", lines, words, bytes, file).map_err(io_err)?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Print lines matching a pattern.
pub struct Grep {
    #[argh(positional)]
    /// the pattern to search for (a regular expression).
    pub pattern: String,

    #[argh(positional, greedy)]
    /// files to search. If none provided, reads from stdin.
    pub files: Vec<String>,

    #[argh(switch, short = 'w')]
    /// match only whole words.
    pub word_regexp: bool,

    #[argh(switch, short = 'i')]
    /// ignore case distinctions.
    pub ignore_case: bool,
}

impl Grep {
    fn regex(&self) -> Result<Regex, ApplicationError> {
        let pattern = if self.word_regexp {
            format!(r"\b(?:{})\b", self.pattern)
        } else {
            self.pattern.clone()
        };
        RegexBuilder::new(&pattern)
            .case_insensitive(self.ignore_case)
            .build()
            .map_err(|e| ApplicationError::InvalidArgs {
                app: Self::name().to_string(),
                message: format!("invalid pattern {:?}: {}", self.pattern, e),
            })
    }

    fn print_matches(
        content: &[u8],
        re: &Regex,
        prefix: Option<&str>,
        stdout: &mut dyn Write,
    ) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(content);
        for line in text.lines().filter(|line| re.is_match(line)) {
            match prefix {
                Some(name) => writeln!(stdout, "{}:{}", name, line)?,
                None => writeln!(stdout, "{}", line)?,
            }
        }
        Ok(())
    }
}

impl BuiltinCommand for Grep {
    fn name() -> &'static str {
        "grep"
    }

    fn execute(
        self,
        stdin: Option<&mut dyn Read>,
        stdout: &mut dyn Write,
        env: &Environment,
    ) -> Result<(), ApplicationError> {
        let re = self.regex()?;
        let io_err = |e| ApplicationError::io(Self::name(), e);
        if self.files.is_empty() {
            let content = read_stdin(Self::name(), stdin)?;
            return Self::print_matches(&content, &re, None, stdout).map_err(io_err);
        }
        for file in &self.files {
            let content = read_file(Self::name(), file, env)?;
            Self::print_matches(&content, &re, Some(file), stdout).map_err(io_err)?;
        }
        Ok(())
    }
}
