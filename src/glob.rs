//! Wildcard expansion of argument tokens against the filesystem.
//!
//! A token is read as a path whose segments may each contain `*`. A `*`
//! matches any run of characters (including none) inside one segment and
//! never crosses a path separator. Segments are resolved one after the other
//! over a worklist of candidate directories: intermediate segments only keep
//! directories, the final segment keeps files and directories alike.

use crate::error::GlobError;
use crate::lexer::{Token, WordPart};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{self, Path, PathBuf};
use tracing::{debug, warn};

/// Upper bound on the number of path segments in a wildcard pattern.
pub const MAX_PATTERN_SEGMENTS: usize = 64;

/// Outcome of expanding a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// The token has no wildcard and passes through untouched.
    Literal(String),
    /// Paths matched by the pattern, sorted and without duplicates.
    Matches(Vec<String>),
    /// The token has a wildcard but nothing on disk matches it.
    NoMatch,
}

impl Expansion {
    /// Arguments this expansion contributes to a command.
    pub fn into_args(self) -> Vec<String> {
        match self {
            Expansion::Literal(text) => vec![text],
            Expansion::Matches(paths) => paths,
            Expansion::NoMatch => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Atom {
    Any,
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    atoms: Vec<Atom>,
    text: String,
}

impl Segment {
    fn new() -> Self {
        Self {
            atoms: Vec::new(),
            text: String::new(),
        }
    }

    fn push(&mut self, atom: Atom, ch: char) {
        self.atoms.push(atom);
        self.text.push(ch);
    }

    fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    fn has_wildcard(&self) -> bool {
        self.atoms.contains(&Atom::Any)
    }

    /// Match an entry name, backtracking to the most recent `*` on mismatch.
    fn matches(&self, name: &str) -> bool {
        let name: Vec<char> = name.chars().collect();
        let (mut p, mut n) = (0, 0);
        let mut last_star: Option<(usize, usize)> = None;

        while n < name.len() {
            match self.atoms.get(p) {
                Some(Atom::Any) => {
                    last_star = Some((p, n));
                    p += 1;
                }
                Some(Atom::Char(c)) if *c == name[n] => {
                    p += 1;
                    n += 1;
                }
                _ => match last_star {
                    Some((star_p, star_n)) => {
                        p = star_p + 1;
                        n = star_n + 1;
                        last_star = Some((star_p, star_n + 1));
                    }
                    None => return false,
                },
            }
        }

        self.atoms[p..].iter().all(|atom| *atom == Atom::Any)
    }
}

/// A token interpreted as a path whose segments may contain wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    absolute: bool,
    segments: Vec<Segment>,
    dirs_only: bool,
}

/// A path reached so far, in display form and in filesystem form.
struct Candidate {
    display: String,
    path: PathBuf,
}

impl Candidate {
    fn child(&self, name: &str) -> Candidate {
        let display = if self.display.is_empty() {
            name.to_string()
        } else if self.display.ends_with(path::is_separator) {
            format!("{}{}", self.display, name)
        } else {
            format!("{}{}{}", self.display, path::MAIN_SEPARATOR, name)
        };
        Candidate {
            display,
            path: self.path.join(name),
        }
    }
}

impl PathPattern {
    /// Split a token into path segments.
    ///
    /// Only unquoted `*` characters become wildcards. Empty segments are
    /// dropped; a trailing separator restricts matches to directories.
    pub fn parse(token: &Token) -> Self {
        let mut segments = Vec::new();
        let mut current = Segment::new();
        let mut absolute = false;
        let mut at_start = true;
        let mut trailing_separator = false;

        for part in token.parts() {
            let (text, quoted) = match part {
                WordPart::Literal(s) => (s, false),
                WordPart::Quoted(s) => (s, true),
            };
            for ch in text.chars() {
                if path::is_separator(ch) {
                    if at_start {
                        absolute = true;
                    }
                    if !current.is_empty() {
                        segments.push(std::mem::replace(&mut current, Segment::new()));
                    }
                    trailing_separator = true;
                } else {
                    let atom = if ch == '*' && !quoted {
                        Atom::Any
                    } else {
                        Atom::Char(ch)
                    };
                    current.push(atom, ch);
                    trailing_separator = false;
                }
                at_start = false;
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        Self {
            absolute,
            segments,
            dirs_only: trailing_separator,
        }
    }

    /// Whether any segment contains a wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(Segment::has_wildcard)
    }

    /// Resolve the pattern against `current_dir`, returning every matching
    /// path in lexical order.
    pub fn resolve(&self, current_dir: &Path) -> Result<Vec<String>, GlobError> {
        if self.segments.len() > MAX_PATTERN_SEGMENTS {
            return Err(GlobError::TooDeep {
                depth: self.segments.len(),
            });
        }
        if self.segments.is_empty() {
            return Ok(Vec::new());
        }

        let root = if self.absolute {
            Candidate {
                display: path::MAIN_SEPARATOR.to_string(),
                path: PathBuf::from(path::MAIN_SEPARATOR.to_string()),
            }
        } else {
            Candidate {
                display: String::new(),
                path: current_dir.to_path_buf(),
            }
        };

        let last = self.segments.len() - 1;
        let mut candidates = vec![root];
        for (i, segment) in self.segments.iter().enumerate() {
            let require_dir = i < last || self.dirs_only;
            let mut next = Vec::new();
            for candidate in &candidates {
                if segment.has_wildcard() {
                    Self::match_entries(candidate, segment, require_dir, &mut next)?;
                } else {
                    let child = candidate.child(&segment.text);
                    if exists(&child.path, require_dir)? {
                        next.push(child);
                    }
                }
            }
            if next.is_empty() {
                return Ok(Vec::new());
            }
            candidates = next;
        }

        let matches: BTreeSet<String> = candidates
            .into_iter()
            .map(|candidate| candidate.display)
            .collect();
        Ok(matches.into_iter().collect())
    }

    fn match_entries(
        dir: &Candidate,
        segment: &Segment,
        require_dir: bool,
        out: &mut Vec<Candidate>,
    ) -> Result<(), GlobError> {
        let read_dir_error = |source| GlobError::ReadDir {
            path: dir.path.clone(),
            source,
        };

        for entry in fs::read_dir(&dir.path).map_err(read_dir_error)? {
            let entry = entry.map_err(read_dir_error)?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                warn!(dir = %dir.path.display(), name = ?file_name, "skipping non UTF-8 entry");
                continue;
            };
            if !segment.matches(name) {
                continue;
            }
            let child = dir.child(name);
            // Final-segment entries match on their name alone.
            if !require_dir || exists(&child.path, true)? {
                out.push(child);
            }
        }
        Ok(())
    }
}

/// Whether `path` is present, and a directory when `require_dir` is set.
///
/// Directory checks follow symlinks; otherwise a dangling link still counts
/// as an entry. Only "not found" and "not a directory" mean absent, every
/// other failure is reported.
fn exists(path: &Path, require_dir: bool) -> Result<bool, GlobError> {
    let metadata = if require_dir {
        fs::metadata(path)
    } else {
        fs::symlink_metadata(path)
    };
    match metadata {
        Ok(metadata) => Ok(!require_dir || metadata.is_dir()),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(source) => Err(GlobError::Metadata {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Expand one token against `current_dir`.
///
/// Tokens without an unquoted `*` come back as [`Expansion::Literal`]; the
/// filesystem is only consulted for wildcard tokens.
pub fn expand_token(token: &Token, current_dir: &Path) -> Result<Expansion, GlobError> {
    if !token.has_wildcard() {
        return Ok(Expansion::Literal(token.text()));
    }

    let pattern = PathPattern::parse(token);
    let matches = pattern.resolve(current_dir)?;
    debug!(pattern = %token.text(), matches = matches.len(), "expanded glob");
    if matches.is_empty() {
        Ok(Expansion::NoMatch)
    } else {
        Ok(Expansion::Matches(matches))
    }
}

/// Expand a raw, unquoted argument string.
///
/// Returns `[token]` when there is no wildcard, the sorted matches otherwise,
/// and an empty list when a wildcard pattern matches nothing.
pub fn expand(token: &str, current_dir: &Path) -> Result<Vec<String>, GlobError> {
    expand_token(&Token::literal(token), current_dir).map(Expansion::into_args)
}
