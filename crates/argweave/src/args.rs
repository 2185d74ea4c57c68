//! Raw argument transport and the tokenizer built on top of it.

use std::collections::VecDeque;

use crate::config::ParserConfig;

/// Raw arguments, as handed to `main`, split into the executable path and
/// everything after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    exe_name: String,
    args: Vec<String>,
}

impl Args {
    pub fn new<I, S>(exe_name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exe_name: exe_name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a full argv where the first element is the executable path.
    pub fn from_argv<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut iter = argv.into_iter().map(Into::into);
        let exe_name = iter.next().unwrap_or_default();
        Self {
            exe_name,
            args: iter.collect(),
        }
    }

    /// Capture the arguments of the current process.
    pub fn from_env() -> Self {
        Self::from_argv(std::env::args())
    }

    pub fn exe_name(&self) -> &str {
        &self.exe_name
    }

    pub fn args(&self) -> &[String] {
        self.args.as_slice()
    }

    pub fn tokens(&self, config: ParserConfig) -> TokenStream<'_> {
        TokenStream::new(&self.args, config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TokenType {
    Option,
    Argument,
}

/// One classified unit of input.
///
/// A single raw string can produce several tokens (`-abc`, `-o:file`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    pub kind: TokenType,
    pub text: String,
}

impl Token {
    pub fn option(text: impl Into<String>) -> Self {
        Self {
            kind: TokenType::Option,
            text: text.into(),
        }
    }

    pub fn argument(text: impl Into<String>) -> Self {
        Self {
            kind: TokenType::Argument,
            text: text.into(),
        }
    }

    pub fn is_option(&self) -> bool {
        self.kind == TokenType::Option
    }
}

/// Cursor over raw arguments yielding [`Token`]s.
///
/// The stream is a cheap value: cloning it captures a checkpoint that can
/// be resumed independently of the original.
#[derive(Debug, Clone)]
pub struct TokenStream<'s> {
    args: &'s [String],
    pos: usize,
    buffer: VecDeque<Token>,
    config: ParserConfig,
}

impl<'s> TokenStream<'s> {
    pub fn new(args: &'s [String], config: ParserConfig) -> Self {
        let mut stream = Self {
            args,
            pos: 0,
            buffer: VecDeque::new(),
            config,
        };
        stream.load_buffer();
        stream
    }

    pub fn has_more(&self) -> bool {
        !self.buffer.is_empty() || self.pos < self.args.len()
    }

    /// The current token, if any.
    pub fn peek(&self) -> Option<&Token> {
        self.buffer.front()
    }

    /// Move past the current token.
    pub fn advance(&mut self) {
        if self.buffer.len() >= 2 {
            self.buffer.pop_front();
        } else {
            if self.pos < self.args.len() {
                self.pos += 1;
            }
            self.load_buffer();
        }
    }

    /// A copy of this stream positioned one token further along.
    pub fn advanced(&self) -> Self {
        let mut next = self.clone();
        next.advance();
        next
    }

    fn load_buffer(&mut self) {
        self.buffer.clear();

        // Stray blank arguments never become tokens.
        while self.args.get(self.pos).is_some_and(|arg| arg.is_empty()) {
            self.pos += 1;
        }

        let Some(next) = self.args.get(self.pos) else {
            return;
        };

        let mut chars = next.chars();
        let starts_with_prefix = chars.next().is_some_and(|c| self.config.is_opt_prefix(c));
        if !starts_with_prefix {
            self.buffer.push_back(Token::argument(next.as_str()));
        } else if let Some(delim) = next.find(|c: char| matches!(c, ' ' | ':' | '=')) {
            self.buffer.push_back(Token::option(&next[..delim]));
            self.buffer.push_back(Token::argument(&next[delim + 1..]));
        } else if chars.clone().next() != Some('-') && next.chars().count() > 2 {
            for c in chars {
                self.buffer.push_back(Token::option(format!("-{c}")));
            }
        } else {
            self.buffer.push_back(Token::option(next.as_str()));
        }

        tracing::trace!(raw = %next, tokens = self.buffer.len(), "loaded token buffer");
    }
}

impl Iterator for TokenStream<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.buffer.front().cloned()?;
        self.advance();
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(raw: &[&str]) -> Vec<Token> {
        tokenize_with(raw, ParserConfig::default())
    }

    fn tokenize_with(raw: &[&str], config: ParserConfig) -> Vec<Token> {
        let raw: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        TokenStream::new(&raw, config).collect()
    }

    #[test]
    fn empty_input_has_no_tokens() {
        let raw: Vec<String> = Vec::new();
        let stream = TokenStream::new(&raw, ParserConfig::default());
        assert!(!stream.has_more());
        assert!(stream.peek().is_none());
    }

    #[test]
    fn combined_short_flags_split_per_character() {
        assert_eq!(
            tokenize(&["-abc"]),
            vec![Token::option("-a"), Token::option("-b"), Token::option("-c")]
        );
    }

    #[test]
    fn attached_values_split_at_first_delimiter() {
        let expected = vec![Token::option("-o"), Token::argument("file")];
        assert_eq!(tokenize(&["-o:file"]), expected);
        assert_eq!(tokenize(&["-o=file"]), expected);
        assert_eq!(tokenize(&["-o file"]), expected);
        assert_eq!(tokenize(&["-o", "file"]), expected);
        assert_eq!(
            tokenize(&["--out=a=b"]),
            vec![Token::option("--out"), Token::argument("a=b")]
        );
    }

    #[test]
    fn long_options_and_bare_prefix_stay_whole() {
        assert_eq!(tokenize(&["--flag"]), vec![Token::option("--flag")]);
        assert_eq!(tokenize(&["-"]), vec![Token::option("-")]);
        assert_eq!(tokenize(&["-f"]), vec![Token::option("-f")]);
    }

    #[test]
    fn blank_arguments_are_skipped() {
        assert_eq!(
            tokenize(&["", "a", "", "", "-b", ""]),
            vec![Token::argument("a"), Token::option("-b")]
        );
    }

    #[test]
    fn positionals_are_single_tokens() {
        assert_eq!(tokenize(&["abc"]), vec![Token::argument("abc")]);
        assert_eq!(tokenize(&["a:b"]), vec![Token::argument("a:b")]);
    }

    #[test]
    fn slash_prefix_is_opt_in() {
        assert_eq!(tokenize(&["/f"]), vec![Token::argument("/f")]);

        let config = ParserConfig::default().with_slash_prefix(true);
        assert_eq!(tokenize_with(&["/f"], config), vec![Token::option("/f")]);
        assert_eq!(
            tokenize_with(&["/a:payload"], config),
            vec![Token::option("/a"), Token::argument("payload")]
        );
    }

    #[test]
    fn cloned_stream_is_an_independent_checkpoint() {
        let raw: Vec<String> = vec!["-ab".into(), "x".into()];
        let mut stream = TokenStream::new(&raw, ParserConfig::default());
        let checkpoint = stream.clone();

        stream.advance();
        assert_eq!(stream.peek(), Some(&Token::option("-b")));
        assert_eq!(checkpoint.peek(), Some(&Token::option("-a")));
        assert_eq!(checkpoint.advanced().advanced().peek(), Some(&Token::argument("x")));
        assert_eq!(checkpoint.count(), 3);
    }

    #[test]
    fn args_from_argv_splits_exe_name() {
        let args = Args::from_argv(["/usr/bin/app", "-n", "x"]);
        assert_eq!(args.exe_name(), "/usr/bin/app");
        assert_eq!(args.args(), ["-n".to_string(), "x".to_string()]);
        assert_eq!(Args::from_argv(Vec::<String>::new()).exe_name(), "");
    }
}
