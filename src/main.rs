use anyhow::{Context, Result};
use argh::FromArgs;
use glob_shell::Interpreter;
use glob_shell::env::Environment;
use glob_shell::registry::Registry;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// A small shell with wildcard expansion and builtin commands.
struct Args {
    #[argh(option, short = 'c')]
    /// evaluate a single command line and exit
    command: Option<String>,

    #[argh(option, short = 'C')]
    /// directory to resolve relative paths against (default: current directory)
    directory: Option<PathBuf>,

    #[argh(switch, short = 'v')]
    /// enable debug logging
    verbose: bool,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let env = match args.directory {
        Some(dir) => {
            let dir = dir
                .canonicalize()
                .with_context(|| format!("cannot use directory {}", dir.display()))?;
            Environment::with_current_dir(dir)
        }
        None => Environment::new(),
    };
    let sh = Interpreter::new(env, Registry::default());

    match args.command {
        Some(line) => {
            let stdout = std::io::stdout();
            let mut stdout = stdout.lock();
            let res = sh.parse_and_evaluate(&line, Some(&mut stdout));
            stdout.flush().context("failed to flush stdout")?;
            res?;
        }
        None => sh.repl().context("interactive session failed")?,
    }
    Ok(())
}
