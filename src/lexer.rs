//! Lexical analysis (tokenization) of a command line.
//!
//! A line is split on runs of whitespace. Single and double quotes group
//! characters (whitespace included) into the current token and mark them as
//! quoted, which keeps a quoted `*` from being treated as a wildcard later on.

use crate::error::LexingError;
use tracing::debug;

/// A piece of a token, either typed bare or written inside quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    /// Unquoted text. A `*` here is a wildcard.
    Literal(String),
    /// Text from inside `'...'` or `"..."`. Always matched literally.
    Quoted(String),
}

/// One whitespace-delimited unit of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    parts: Vec<WordPart>,
}

impl Token {
    pub fn new(parts: Vec<WordPart>) -> Self {
        Self { parts }
    }

    /// A token made of a single unquoted part.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(vec![WordPart::Literal(text.into())])
    }

    pub fn parts(&self) -> &[WordPart] {
        &self.parts
    }

    /// The token text with quotes removed.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                WordPart::Literal(s) | WordPart::Quoted(s) => s.as_str(),
            })
            .collect()
    }

    /// Whether an unquoted `*` appears anywhere in the token.
    pub fn has_wildcard(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, WordPart::Literal(s) if s.contains('*')))
    }
}

/// A tokenized command line: the command name and its argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    pub args: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
    ReadingSingleQuote,
    ReadingDoubleQuote,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    current_word: Vec<WordPart>,
    buffer: String,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Start,
            current_word: Vec::new(),
            buffer: String::new(),
        }
    }

    fn make_tokens(mut self) -> Result<Vec<Token>, LexingError> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            match self.state {
                LexingState::Start | LexingState::ReadingWord => self.handle_word(ch, &mut out),
                LexingState::ReadingSingleQuote => self.handle_quoted(ch, '\''),
                LexingState::ReadingDoubleQuote => self.handle_quoted(ch, '"'),
            }
        }

        if matches!(
            self.state,
            LexingState::ReadingSingleQuote | LexingState::ReadingDoubleQuote
        ) {
            return Err(LexingError::UnfinishedQuote);
        }

        self.finish_word(&mut out);
        Ok(out)
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn handle_word(&mut self, ch: char, out: &mut Vec<Token>) {
        match ch {
            c if c.is_whitespace() => {
                self.finish_word(out);
                self.state = LexingState::Start;
            }
            '\'' => {
                self.flush_literal();
                self.state = LexingState::ReadingSingleQuote;
            }
            '"' => {
                self.flush_literal();
                self.state = LexingState::ReadingDoubleQuote;
            }
            c => {
                self.buffer.push(c);
                self.state = LexingState::ReadingWord;
            }
        }
    }

    fn handle_quoted(&mut self, ch: char, closing: char) {
        if ch == closing {
            // Empty quotes still produce a (possibly empty) argument.
            let text = std::mem::take(&mut self.buffer);
            self.current_word.push(WordPart::Quoted(text));
            self.state = LexingState::ReadingWord;
        } else {
            self.buffer.push(ch);
        }
    }

    fn flush_literal(&mut self) {
        if !self.buffer.is_empty() {
            let text = std::mem::take(&mut self.buffer);
            self.current_word.push(WordPart::Literal(text));
        }
    }

    fn finish_word(&mut self, out: &mut Vec<Token>) {
        self.flush_literal();
        if !self.current_word.is_empty() {
            out.push(Token::new(std::mem::take(&mut self.current_word)));
        }
    }
}

/// Split a raw line into tokens, preserving their order.
pub fn split_into_tokens(line: &str) -> Result<Vec<Token>, LexingError> {
    LexingFSM::new(line).make_tokens()
}

/// Split a line into a command name and its arguments.
///
/// Returns `Ok(None)` for a blank line.
pub fn tokenize(line: &str) -> Result<Option<CommandLine>, LexingError> {
    let mut tokens = split_into_tokens(line)?.into_iter();
    let Some(first) = tokens.next() else {
        return Ok(None);
    };
    let command = CommandLine {
        name: first.text(),
        args: tokens.collect(),
    };
    debug!(name = %command.name, args = command.args.len(), "tokenized command line");
    Ok(Some(command))
}
