use glob_shell::env::Environment;
use glob_shell::error::{ApplicationError, EvalError};
use glob_shell::glob;
use glob_shell::registry::Registry;
use glob_shell::Interpreter;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Tree mirroring the layout the shell is usually exercised against:
///
/// ```text
/// Tests/globFiles/globTestSource1.txt  "hello world"
/// Tests/globFiles/globTestSource2.txt  "hello world 2"
/// dir/globTestFile.txt                 "hello world\n"
/// multi/glob1.txt                      "hello world\n"
/// multi/glob2.txt                      "hello world 2\n"
/// existingDir/
/// ```
fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Tests/globFiles/globTestSource1.txt", "hello world");
    write(dir.path(), "Tests/globFiles/globTestSource2.txt", "hello world 2");
    write(dir.path(), "dir/globTestFile.txt", "hello world\n");
    write(dir.path(), "multi/glob1.txt", "hello world\n");
    write(dir.path(), "multi/glob2.txt", "hello world 2\n");
    fs::create_dir(dir.path().join("existingDir")).unwrap();
    dir
}

fn shell(dir: &TempDir) -> Interpreter {
    Interpreter::new(Environment::with_current_dir(dir.path()), Registry::default())
}

fn eval(sh: &Interpreter, line: &str, input: &str) -> (Result<(), EvalError>, String) {
    let mut stdin = Cursor::new(input.as_bytes().to_vec());
    let mut out = Vec::new();
    let res = sh.evaluate_with_input(line, Some(&mut stdin), Some(&mut out));
    (res, String::from_utf8(out).unwrap())
}

fn cat(sh: &Interpreter, line: &str) -> String {
    let (res, out) = eval(sh, line, "");
    res.unwrap();
    out
}

#[test]
fn cat_pattern_without_match_prints_nothing() {
    let dir = fixture();
    assert_eq!(cat(&shell(&dir), "cat nomatch*.txt"), "");
    assert_eq!(cat(&shell(&dir), "cat asds*d.txt"), "");
}

#[test]
fn cat_pattern_matching_one_file() {
    let dir = fixture();
    assert_eq!(cat(&shell(&dir), "cat dir/glob*File.txt"), "hello world\n");
    assert_eq!(
        cat(&shell(&dir), "cat Tests/globFiles/glob*Source1.txt"),
        "hello world\n"
    );
}

#[test]
fn cat_pattern_matching_several_files_in_lexical_order() {
    let dir = fixture();
    assert_eq!(
        cat(&shell(&dir), "cat multi/glob*.txt"),
        "hello world\nhello world 2\n"
    );
    assert_eq!(
        cat(&shell(&dir), "cat Tests/globFiles/glob*.txt"),
        "hello world\nhello world 2\n"
    );
}

#[test]
fn cat_wildcards_in_directory_segments() {
    let dir = fixture();
    let sh = shell(&dir);
    assert_eq!(cat(&sh, "cat Tests/g*b*/globTestSource1.txt"), "hello world\n");
    assert_eq!(cat(&sh, "cat Tests/g*b*/glob*Sou*e1.txt"), "hello world\n");
    assert_eq!(
        cat(&sh, "cat Tes*s/g*b*/glob*Sou*e1.txt Tes*s/g*b*/glob*e2.txt"),
        "hello world\nhello world 2\n"
    );
}

#[test]
fn cat_without_arguments_echoes_stdin_with_newline() {
    let dir = fixture();
    let (res, out) = eval(&shell(&dir), "cat", "abc");
    res.unwrap();
    assert_eq!(out, "abc\n");
}

#[test]
fn cat_on_directory_fails_at_application_level() {
    let dir = fixture();
    let (res, out) = eval(&shell(&dir), "cat existingDir", "");
    let err = res.unwrap_err();
    assert!(matches!(
        err,
        EvalError::Application(ApplicationError::IsDirectory { .. })
    ));
    assert_eq!(err.to_string(), "cat: existingDir: this is a directory");
    assert_eq!(out, "");
}

#[test]
fn cat_literal_missing_file_is_not_silently_dropped() {
    let dir = fixture();
    let (res, _) = eval(&shell(&dir), "cat missing.txt", "");
    assert!(matches!(
        res,
        Err(EvalError::Application(ApplicationError::Unreadable { .. }))
    ));
}

#[test]
fn evaluation_is_repeatable() {
    let dir = fixture();
    let sh = shell(&dir);
    let first = cat(&sh, "cat */*.txt");
    let second = cat(&sh, "cat */*.txt");
    assert_eq!(first, second);
    assert_eq!(first, "hello world\nhello world\nhello world 2\n");
}

#[test]
fn wildcard_never_crosses_separator() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "axb/y/c.txt", "deep\n");
    assert!(glob::expand("a*b/c.txt", dir.path()).unwrap().is_empty());
    assert_eq!(cat(&shell(&dir), "cat a*b/c.txt"), "");
}

#[test]
fn non_wildcard_tokens_pass_through_unchanged() {
    let dir = fixture();
    for token in ["dir", "missing.txt", "dir/globTestFile.txt", "-n"] {
        assert_eq!(glob::expand(token, dir.path()).unwrap(), [token]);
    }
}

#[test]
fn interpreters_with_different_dirs_do_not_interfere() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    write(a.path(), "file.txt", "from a\n");
    write(b.path(), "file.txt", "from b\n");
    let sh_a = shell(&a);
    let sh_b = shell(&b);
    assert_eq!(cat(&sh_a, "cat f*.txt"), "from a\n");
    assert_eq!(cat(&sh_b, "cat f*.txt"), "from b\n");
}

#[cfg(unix)]
#[test]
fn dangling_symlink_match_reaches_cat() {
    let dir = fixture();
    std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("dangling.txt"))
        .unwrap();
    let sh = shell(&dir);
    assert_eq!(glob::expand("dang*.txt", dir.path()).unwrap(), ["dangling.txt"]);
    let (res, out) = eval(&sh, "cat dang*.txt", "stdin must stay unread");
    assert!(matches!(
        res,
        Err(EvalError::Application(ApplicationError::Unreadable { ref path, .. }))
            if path == "dangling.txt"
    ));
    assert_eq!(out, "");
}
