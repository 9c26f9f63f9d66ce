use crate::builtin::{Cat, Echo, Grep, Pwd, Wc};
use crate::command::{Application, Builtin};
use crate::env::Environment;
use crate::error::{EvalError, ShellError};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use tracing::debug;

/// Name-indexed set of applications the shell can dispatch to.
///
/// Lookup is exact and case-sensitive; there is no prefix matching and no
/// aliasing beyond what is explicitly registered.
pub struct Registry {
    apps: BTreeMap<String, Box<dyn Application>>,
}

impl Registry {
    /// An empty registry. See [`Registry::default`] for the builtins.
    pub fn new() -> Self {
        Self {
            apps: BTreeMap::new(),
        }
    }

    /// Register an application under its own name.
    ///
    /// Returns the application previously registered under that name, if any.
    pub fn register(&mut self, app: Box<dyn Application>) -> Option<Box<dyn Application>> {
        self.apps.insert(app.name().to_string(), app)
    }

    /// Look up the application registered as `name`.
    pub fn resolve(&self, name: &str) -> Result<&dyn Application, ShellError> {
        self.apps
            .get(name)
            .map(|app| app.as_ref())
            .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    /// Resolve `name` and run it. Application failures are passed through.
    pub fn dispatch(
        &self,
        name: &str,
        args: &[String],
        stdin: Option<&mut dyn Read>,
        stdout: Option<&mut dyn Write>,
        env: &Environment,
    ) -> Result<(), EvalError> {
        let app = self.resolve(name)?;
        debug!(name, ?args, "dispatching");
        app.run(args, stdin, stdout, env)?;
        Ok(())
    }
}

impl Default for Registry {
    /// Registry with every builtin: `cat`, `echo`, `grep`, `pwd`, `wc`.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Builtin::<Cat>::default()));
        registry.register(Box::new(Builtin::<Echo>::default()));
        registry.register(Box::new(Builtin::<Grep>::default()));
        registry.register(Box::new(Builtin::<Pwd>::default()));
        registry.register(Box::new(Builtin::<Wc>::default()));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApplicationError;

    struct Upper;

    impl Application for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn run(
            &self,
            args: &[String],
            _stdin: Option<&mut dyn Read>,
            stdout: Option<&mut dyn Write>,
            _env: &Environment,
        ) -> Result<(), ApplicationError> {
            let stdout = stdout.ok_or_else(|| ApplicationError::NoOutput {
                app: "upper".to_string(),
            })?;
            if args.is_empty() {
                return Err(ApplicationError::Failed {
                    app: "upper".to_string(),
                    message: "nothing to shout".to_string(),
                });
            }
            writeln!(stdout, "{}", args.join(" ").to_uppercase())
                .map_err(|e| ApplicationError::io("upper", e))
        }
    }

    #[test]
    fn test_default_registers_builtins() {
        let registry = Registry::default();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            ["cat", "echo", "grep", "pwd", "wc"]
        );
    }

    #[test]
    fn test_resolve_is_exact() {
        let registry = Registry::default();
        assert!(registry.resolve("cat").is_ok());
        assert!(matches!(
            registry.resolve("CAT"),
            Err(ShellError::CommandNotFound(name)) if name == "CAT"
        ));
        assert!(registry.resolve("ca").is_err());
    }

    #[test]
    fn test_register_custom_application() {
        let mut registry = Registry::new();
        assert!(registry.register(Box::new(Upper)).is_none());
        assert!(registry.register(Box::new(Upper)).is_some());

        let mut out = Vec::new();
        registry
            .dispatch(
                "upper",
                &["hi".to_string(), "there".to_string()],
                None,
                Some(&mut out),
                &Environment::new(),
            )
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "HI THERE\n");

        let err = registry
            .dispatch("upper", &[], None, Some(&mut Vec::new()), &Environment::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "upper: nothing to shout");
    }

    #[test]
    fn test_dispatch_passes_application_errors_through() {
        let registry = Registry::default();
        let err = registry
            .dispatch("cat", &[], None, None, &Environment::new())
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::Application(ApplicationError::NoOutput { .. })
        ));
    }
}
