use crate::{
    decode::Decoder,
    env::Env,
    errors::ParseError,
    value::{Value, Values},
};

use std::str::CharIndices;

const OPEN_BRACKET: char = '[';
const CLOSE_BRACKET: char = ']';

/// The shortest possible nested key definition, `[k]`.
const NESTED_KEY_MIN: usize = 3;

enum State {
    Malformed,
    Done,
    LexTopKey,
    LexNestedOpen,
    LexNestedKey,
    LexNestedClose,
}

/// Splits a single `top[n1][n2]` key into its top level and nested parts.
struct KeyLexer<'k> {
    key: &'k str,
    chars: CharIndices<'k>,
    start: usize,
    pos: usize,

    top_key: &'k str,
    nested_keys: Vec<String>,
}

impl<'k> KeyLexer<'k> {
    fn new(key: &'k str) -> Self {
        Self {
            key,
            chars: key.char_indices(),
            start: 0,
            pos: 0,
            top_key: "",
            nested_keys: Vec::new(),
        }
    }

    fn run(&mut self) -> bool {
        let mut state = State::LexTopKey;
        loop {
            match state {
                State::Malformed => return false,
                State::Done => return true,
                State::LexTopKey => state = lex_top_key(self),
                State::LexNestedOpen => state = lex_nested_open(self),
                State::LexNestedKey => state = lex_nested_key(self),
                State::LexNestedClose => state = lex_nested_close(self),
            }
        }
    }

    fn value(&self) -> &'k str {
        // start and pos always sit on char boundaries
        &self.key[self.start..self.pos]
    }

    fn next(&mut self) -> Option<char> {
        let (pos, ch) = self.chars.next()?;
        self.pos = pos + ch.len_utf8();
        Some(ch)
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next().map(|(_, ch)| ch)
    }

    fn accept(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.next();
            true
        } else {
            false
        }
    }

    fn accept_run(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let mut accepted = false;
        while self.peek().is_some_and(&pred) {
            self.next();
            accepted = true;
        }
        accepted
    }

    fn ignore(&mut self) {
        self.start = self.pos;
    }
}

fn lex_top_key(l: &mut KeyLexer) -> State {
    if l.peek() == Some(OPEN_BRACKET) {
        return State::Malformed;
    }

    l.accept_run(is_key_char);
    l.top_key = l.value();

    match l.peek() {
        None => State::Done,
        Some(CLOSE_BRACKET) => State::Malformed,
        Some(_) if l.key.len() - l.pos < NESTED_KEY_MIN => State::Malformed,
        Some(_) => State::LexNestedOpen,
    }
}

fn lex_nested_open(l: &mut KeyLexer) -> State {
    if l.accept(OPEN_BRACKET) {
        l.ignore();
        State::LexNestedKey
    } else {
        State::Malformed
    }
}

fn lex_nested_key(l: &mut KeyLexer) -> State {
    if l.accept_run(is_key_char) {
        l.nested_keys.push(l.value().to_owned());
        State::LexNestedClose
    } else {
        // empty nested key, a second '[' or the end of the key
        State::Malformed
    }
}

fn lex_nested_close(l: &mut KeyLexer) -> State {
    if !l.accept(CLOSE_BRACKET) {
        return State::Malformed;
    }
    l.ignore();

    match l.peek() {
        None => State::Done,
        Some(OPEN_BRACKET) => State::LexNestedOpen,
        Some(_) => State::Malformed,
    }
}

fn is_key_char(ch: char) -> bool {
    ch != OPEN_BRACKET && ch != CLOSE_BRACKET
}

/// Split a query key into its top level key and nested keys.
///
/// `"top[n1][n2]"` gives `("top", Some(["n1", "n2"]))`. Any violation of the
/// `key[nested]...` syntax (empty or unclosed brackets, characters between
/// or after brackets, a leading bracket) gives the whole key back with no
/// nested keys.
pub fn extract_keys(key: &str) -> (String, Option<Vec<String>>) {
    let mut lexer = KeyLexer::new(key);

    if !lexer.run() {
        tracing::trace!(key, "malformed nested key syntax, using the key as is");
        return (key.to_owned(), None);
    }

    if lexer.nested_keys.is_empty() {
        (lexer.top_key.to_owned(), None)
    } else {
        (lexer.top_key.to_owned(), Some(lexer.nested_keys))
    }
}

/// Split an already decoded query string into fragments.
///
/// Fragments are separated by any of `env.query_separators`; empty fragments
/// are skipped and a fragment without `=` has an empty value.
pub fn tokenize(query: &str, env: &Env) -> Values {
    query
        .split(|ch| env.is_query_separator(ch))
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            let (key, value) = fragment.split_once('=').unwrap_or((fragment, ""));
            let (top_level_key, nested_keys) = extract_keys(key);
            Value::new(top_level_key, nested_keys, value.to_owned())
        })
        .collect()
}

/// Decode a raw query string, with or without its leading `?`, and
/// [`tokenize`] it.
pub fn lex(query: &str, env: &Env, decoder: &dyn Decoder) -> Result<Values, ParseError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let decoded = decoder.decode_query(query).map_err(|err| {
        tracing::debug!(query, error = %err, "failed to decode query");
        err
    })?;
    Ok(tokenize(&decoded, env))
}
