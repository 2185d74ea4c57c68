//! Composite parsers: composition of primitives, subcommand trees and the
//! token matching loop.

use crate::args::{Args, TokenStream};
use crate::bind::FromArg;
use crate::config::ParserConfig;
use crate::primitive::{Arg, ExeName, Help, Opt, ParseState, Primitive};
use crate::result::{CallbackResult, ParseError, ParseOutcome, ParseResult};

/// Anything that can be composed into a [`Parser`].
#[derive(Debug)]
pub enum Component<'a> {
    ExeName(ExeName<'a>),
    Arg(Arg<'a>),
    Opt(Opt<'a>),
    Parser(Parser<'a>),
}

impl<'a> From<ExeName<'a>> for Component<'a> {
    fn from(exe_name: ExeName<'a>) -> Self {
        Self::ExeName(exe_name)
    }
}

impl<'a> From<Arg<'a>> for Component<'a> {
    fn from(arg: Arg<'a>) -> Self {
        Self::Arg(arg)
    }
}

impl<'a> From<Opt<'a>> for Component<'a> {
    fn from(opt: Opt<'a>) -> Self {
        Self::Opt(opt)
    }
}

impl<'a> From<Help<'a>> for Component<'a> {
    fn from(help: Help<'a>) -> Self {
        Self::Opt(help.into_opt())
    }
}

impl<'a> From<Parser<'a>> for Component<'a> {
    fn from(parser: Parser<'a>) -> Self {
        Self::Parser(parser)
    }
}

impl<'a> Component<'a> {
    fn into_parser(self) -> Parser<'a> {
        match self {
            Self::Parser(parser) => parser,
            other => Parser::new().with(other),
        }
    }
}

/// An ordered set of options, positional arguments and subcommands that is
/// matched against input as a unit.
///
/// Declaration order matters: it breaks ties between primitives that could
/// both consume a token, and it is the order of the help listing.
#[derive(Debug, Default)]
pub struct Parser<'a> {
    pub(crate) exe_name: ExeName<'a>,
    pub(crate) is_subcommand: bool,
    pub(crate) allude_in_usage: bool,
    pub(crate) hidden: bool,
    pub(crate) config: ParserConfig,
    pub(crate) cmds: Vec<Parser<'a>>,
    pub(crate) options: Vec<Opt<'a>>,
    pub(crate) args: Vec<Arg<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A subcommand named `name`; when dispatched, the name is written to
    /// `dest`.
    pub fn command<T: FromArg + 'a>(dest: &'a mut T, name: impl Into<String>) -> Self {
        Self::subcommand(ExeName::bind(dest), name.into())
    }

    /// A subcommand named `name` that reports its name to `callback` when
    /// dispatched.
    pub fn command_with<T, R, F>(callback: F, name: impl Into<String>) -> Self
    where
        F: FnMut(T) -> R + 'a,
        T: FromArg + 'a,
        R: CallbackResult + 'a,
    {
        Self::subcommand(ExeName::with(callback), name.into())
    }

    fn subcommand(mut exe_name: ExeName<'a>, name: String) -> Self {
        // Only the displayed name changes here; the destination is written
        // when the subcommand is actually dispatched.
        let _ = exe_name.set(&name, false);
        Self {
            exe_name,
            is_subcommand: true,
            ..Self::default()
        }
    }

    /// Add a primitive or another parser.
    ///
    /// Primitives and plain parsers are merged flat, preserving order.
    /// Subcommand parsers are nested into this parser's subcommand list.
    pub fn with(mut self, component: impl Into<Component<'a>>) -> Self {
        match component.into() {
            Component::ExeName(exe_name) => self.adopt_exe_name(exe_name),
            Component::Arg(arg) => self.args.push(arg),
            Component::Opt(opt) => self.options.push(opt),
            Component::Parser(parser) if parser.is_subcommand => self.cmds.push(parser),
            Component::Parser(parser) => self.merge(parser),
        }
        self
    }

    /// Fold a plain parser into this one.
    ///
    /// Its options, positionals and subcommands are appended in order and a
    /// customised executable name is adopted. Its `config` is ignored: only
    /// the settings of the parser that `parse` is called on apply.
    fn merge(&mut self, other: Parser<'a>) {
        if !other.exe_name.is_default() {
            self.adopt_exe_name(other.exe_name);
        }
        self.options.extend(other.options);
        self.args.extend(other.args);
        self.cmds.extend(other.cmds);
    }

    /// A subcommand keeps its own name, since that is what dispatch matches
    /// on; only the binding and description of `exe_name` are taken over.
    fn adopt_exe_name(&mut self, exe_name: ExeName<'a>) {
        if self.is_subcommand {
            self.exe_name.absorb(exe_name);
        } else {
            self.exe_name = exe_name;
        }
    }

    pub fn config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Banner for a root parser, or the summary listed for a subcommand.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.exe_name.set_description(description.into());
        self
    }

    /// Leave this subcommand out of the parent's subcommand listing.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Give this subcommand its own usage line in the parent's help.
    pub fn allude_in_usage(mut self) -> Self {
        self.allude_in_usage = true;
        self
    }

    pub fn exe_name(&self) -> &ExeName<'a> {
        &self.exe_name
    }

    pub fn is_subcommand(&self) -> bool {
        self.is_subcommand
    }

    pub fn settings(&self) -> &ParserConfig {
        &self.config
    }

    /// Check the whole definition tree for logic errors.
    pub fn validate(&self) -> ParseResult<()> {
        self.validate_with(&self.config)
    }

    fn validate_with(&self, config: &ParserConfig) -> ParseResult<()> {
        for opt in &self.options {
            opt.validate_settings(config)?;
        }
        for arg in &self.args {
            arg.validate_settings(config)?;
        }
        for cmd in &self.cmds {
            cmd.validate_with(config)?;
        }
        Ok(())
    }

    /// Parse `args`, writing into every bound destination reached.
    ///
    /// Destinations written before a failure keep their new values.
    pub fn parse(&mut self, args: &Args) -> ParseResult<ParseOutcome> {
        let config = self.config;
        self.validate_with(&config)?;

        tracing::debug!(exe = args.exe_name(), count = args.args().len(), "parsing arguments");
        let state = self.parse_tokens(args.exe_name(), args.tokens(config), &config)?;
        tracing::debug!(outcome = ?state.outcome, "parse finished");
        Ok(state.outcome)
    }

    fn primitives_mut(&mut self) -> impl Iterator<Item = &mut dyn Primitive> + '_ {
        let options = self.options.iter_mut().map(|opt| opt as &mut dyn Primitive);
        let args = self.args.iter_mut().map(|arg| arg as &mut dyn Primitive);
        options.chain(args)
    }

    fn primitives(&self) -> impl Iterator<Item = &dyn Primitive> + '_ {
        let options = self.options.iter().map(|opt| opt as &dyn Primitive);
        let args = self.args.iter().map(|arg| arg as &dyn Primitive);
        options.chain(args)
    }

    fn find_cmd(&self, name: &str) -> Option<usize> {
        self.cmds.iter().position(|cmd| cmd.exe_name.name() == name)
    }

    fn parse_tokens<'s>(
        &mut self,
        exe_name: &str,
        tokens: TokenStream<'s>,
        config: &ParserConfig,
    ) -> ParseResult<ParseState<'s>> {
        if !self.is_subcommand {
            self.exe_name.set(exe_name, true)?;
            if let Some(state) = self.dispatch(&tokens, config)? {
                return Ok(state);
            }
            let state = ParseState::new(ParseOutcome::NoMatch, tokens);
            return self.match_primitives(exe_name, state, config);
        }

        // A subcommand owns the token that selected it, then offers the rest
        // to its own children before its own primitives.
        let Some(token) = tokens.peek() else {
            return Err(ParseError::runtime(format!(
                "Missing token: {}",
                self.exe_name.name()
            )));
        };
        if token.text != self.exe_name.name() {
            return Err(ParseError::runtime(format!("Unrecognised token: {}", token.text)));
        }
        let name = token.text.clone();
        self.exe_name.set(&name, true)?;
        let tokens = tokens.advanced();
        if let Some(state) = self.dispatch(&tokens, config)? {
            return Ok(state);
        }
        self.match_primitives(exe_name, ParseState::new(ParseOutcome::Matched, tokens), config)
    }

    fn dispatch<'s>(
        &mut self,
        tokens: &TokenStream<'s>,
        config: &ParserConfig,
    ) -> ParseResult<Option<ParseState<'s>>> {
        let Some(idx) = tokens.peek().and_then(|token| self.find_cmd(&token.text)) else {
            return Ok(None);
        };
        let cmd = &mut self.cmds[idx];
        let name = cmd.exe_name.name().to_string();
        tracing::debug!(subcommand = %name, "dispatching to subcommand");
        cmd.parse_tokens(&name, tokens.clone(), config).map(Some)
    }

    fn match_primitives<'s>(
        &mut self,
        exe_name: &str,
        mut state: ParseState<'s>,
        config: &ParserConfig,
    ) -> ParseResult<ParseState<'s>> {
        // Per-parse match counts, one slot per primitive in scan order.
        let mut counts = vec![0_usize; self.options.len() + self.args.len()];

        while state.remaining.has_more() {
            let mut token_parsed = false;

            for (idx, primitive) in self.primitives_mut().enumerate() {
                if !primitive.can_parse(counts[idx]) {
                    continue;
                }
                let step = primitive.internal_parse(exe_name, &state.remaining, config)?;
                if step.outcome != ParseOutcome::NoMatch {
                    tracing::trace!(primitive = idx, outcome = ?step.outcome, "token matched");
                    counts[idx] += 1;
                    state = step;
                    token_parsed = true;
                    break;
                }
            }

            if state.outcome == ParseOutcome::ShortCircuit {
                tracing::debug!("parse short-circuited");
                return Ok(state);
            }
            if !token_parsed {
                let text = state
                    .remaining
                    .peek()
                    .map(|token| token.text.as_str())
                    .unwrap_or_default();
                return Err(ParseError::runtime(format!("Unrecognised token: {text}")));
            }
        }

        for (idx, primitive) in self.primitives().enumerate() {
            primitive.validate_final(counts[idx])?;
        }
        Ok(state)
    }
}

/// Compose two parts into one parser, preserving their order.
///
/// Two composite parsers where at least one is a subcommand nest the
/// subcommand(s) rather than flattening them; a primitive is always merged
/// flat into the other side.
pub fn combine<'a>(left: impl Into<Component<'a>>, right: impl Into<Component<'a>>) -> Parser<'a> {
    match (left.into(), right.into()) {
        (Component::Parser(left), Component::Parser(right)) => {
            match (left.is_subcommand, right.is_subcommand) {
                (true, true) => Parser::new().with(left).with(right),
                (true, false) => right.with(left),
                _ => left.with(right),
            }
        }
        (left, right) => left.into_parser().with(right),
    }
}
