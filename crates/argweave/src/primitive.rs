//! The leaf parsers: executable name, positional argument, named option
//! and the help option.

use crate::args::{TokenStream, TokenType};
use crate::bind::{BoundRef, BoundValue, FromArg, boxed_value, boxed_value_callback};
use crate::config::ParserConfig;
use crate::result::{CallbackResult, ParseError, ParseOutcome, ParseResult, ParserResult};

const DEFAULT_EXE_NAME: &str = "<executable>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Optionality {
    #[default]
    Optional,
    Required,
}

/// One `(label, description)` row of help output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpColumns {
    pub left: String,
    pub right: String,
}

/// Result of offering a token stream to a parser.
#[derive(Debug, Clone)]
pub(crate) struct ParseState<'s> {
    pub(crate) outcome: ParseOutcome,
    pub(crate) remaining: TokenStream<'s>,
}

impl<'s> ParseState<'s> {
    pub(crate) fn new(outcome: ParseOutcome, remaining: TokenStream<'s>) -> Self {
        Self { outcome, remaining }
    }

    fn no_match(tokens: &TokenStream<'s>) -> Self {
        Self::new(ParseOutcome::NoMatch, tokens.clone())
    }
}

/// Contract shared by the leaf parsers that consume tokens, [`Arg`] and
/// [`Opt`]. [`ExeName`] is resolved by the composite parser itself and
/// [`Help`] composes as a preset [`Opt`].
///
/// Match counts live with the caller (one slot per primitive per parse), so
/// a primitive only ever sees the count it needs to decide eligibility.
pub(crate) trait Primitive {
    fn validate_settings(&self, _config: &ParserConfig) -> ParseResult<()> {
        Ok(())
    }

    /// Maximum number of matches; `0` means unbounded.
    fn cardinality(&self) -> usize {
        1
    }

    fn can_parse(&self, count: usize) -> bool {
        let cardinality = self.cardinality();
        cardinality == 0 || count < cardinality
    }

    fn internal_parse<'s>(
        &mut self,
        exe_name: &str,
        tokens: &TokenStream<'s>,
        config: &ParserConfig,
    ) -> ParseResult<ParseState<'s>>;

    /// Checked once the whole input has been consumed.
    fn validate_final(&self, _count: usize) -> ParseResult<()> {
        Ok(())
    }

    fn help_columns(&self) -> Vec<HelpColumns>;
}

/// Captures the program (or subcommand) name instead of matching tokens.
pub struct ExeName<'a> {
    name: String,
    description: String,
    bound: Option<Box<dyn BoundValue + 'a>>,
}

impl Default for ExeName<'_> {
    fn default() -> Self {
        Self {
            name: DEFAULT_EXE_NAME.to_string(),
            description: String::new(),
            bound: None,
        }
    }
}

impl std::fmt::Debug for ExeName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExeName")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("bound", &self.bound.is_some())
            .finish()
    }
}

impl<'a> ExeName<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the bare executable name into `dest` when parsing.
    pub fn bind<T: FromArg + 'a>(dest: &'a mut T) -> Self {
        Self {
            bound: Some(boxed_value(dest)),
            ..Self::default()
        }
    }

    /// Hand the bare executable name to `callback` when parsing.
    pub fn with<T, R, F>(callback: F) -> Self
    where
        F: FnMut(T) -> R + 'a,
        T: FromArg + 'a,
        R: CallbackResult + 'a,
    {
        Self {
            bound: Some(boxed_value_callback(callback)),
            ..Self::default()
        }
    }

    /// Banner printed at the top of the help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description_text(&self) -> &str {
        &self.description
    }

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    /// Take over whatever `other` customises, keeping this name.
    pub(crate) fn absorb(&mut self, other: ExeName<'a>) {
        if other.bound.is_some() {
            self.bound = other.bound;
        }
        if !other.description.is_empty() {
            self.description = other.description;
        }
    }

    /// True when nothing has been customised since construction.
    pub(crate) fn is_default(&self) -> bool {
        self.bound.is_none() && self.description.is_empty() && self.name == DEFAULT_EXE_NAME
    }

    /// Record `path`, stripped of any directory prefix, optionally
    /// forwarding it to the bound destination.
    pub(crate) fn set(&mut self, path: &str, update_bound: bool) -> ParserResult {
        let filename = match path.rfind(|c: char| c == '/' || c == '\\') {
            Some(idx) => &path[idx + 1..],
            None => path,
        };
        self.name = filename.to_string();
        match &mut self.bound {
            Some(bound) if update_bound => bound.set_value(filename),
            _ => Ok(ParseOutcome::Matched),
        }
    }
}

/// State common to positional arguments and options.
#[derive(Debug)]
struct RefCommon<'a> {
    optionality: Optionality,
    bound: BoundRef<'a>,
    hint: String,
    description: String,
    hidden: bool,
}

impl<'a> RefCommon<'a> {
    fn new(bound: BoundRef<'a>, hint: String) -> Self {
        Self {
            optionality: Optionality::Optional,
            bound,
            hint,
            description: String::new(),
            hidden: false,
        }
    }

    fn cardinality(&self) -> usize {
        if self.bound.is_container() { 0 } else { 1 }
    }
}

macro_rules! ref_builders {
    ($ty:ident) => {
        impl<'a> $ty<'a> {
            /// Description shown in the help text.
            pub fn help(mut self, description: impl Into<String>) -> Self {
                self.common.description = description.into();
                self
            }

            pub fn required(mut self) -> Self {
                self.common.optionality = Optionality::Required;
                self
            }

            pub fn optional(mut self) -> Self {
                self.common.optionality = Optionality::Optional;
                self
            }

            /// Keep this out of the help text.
            pub fn hidden(mut self) -> Self {
                self.common.hidden = true;
                self
            }

            pub fn is_optional(&self) -> bool {
                self.common.optionality == Optionality::Optional
            }

            pub fn is_hidden(&self) -> bool {
                self.common.hidden
            }

            pub fn hint(&self) -> &str {
                &self.common.hint
            }

            pub fn description(&self) -> &str {
                &self.common.description
            }

            /// Maximum number of matches; `0` means unbounded.
            pub fn cardinality(&self) -> usize {
                self.common.cardinality()
            }
        }
    };
}

/// A positional argument.
#[derive(Debug)]
pub struct Arg<'a> {
    common: RefCommon<'a>,
}

ref_builders!(Arg);

impl<'a> Arg<'a> {
    pub fn value<T: FromArg + 'a>(dest: &'a mut T, hint: impl Into<String>) -> Self {
        Self {
            common: RefCommon::new(BoundRef::value(dest), hint.into()),
        }
    }

    /// Collect every occurrence into `dest`.
    pub fn values<T: FromArg + 'a>(dest: &'a mut Vec<T>, hint: impl Into<String>) -> Self {
        Self {
            common: RefCommon::new(BoundRef::container(dest), hint.into()),
        }
    }

    pub fn with<T, R, F>(callback: F, hint: impl Into<String>) -> Self
    where
        F: FnMut(T) -> R + 'a,
        T: FromArg + 'a,
        R: CallbackResult + 'a,
    {
        Self {
            common: RefCommon::new(BoundRef::value_callback(callback), hint.into()),
        }
    }
}

impl Primitive for Arg<'_> {
    fn cardinality(&self) -> usize {
        self.common.cardinality()
    }

    fn internal_parse<'s>(
        &mut self,
        _exe_name: &str,
        tokens: &TokenStream<'s>,
        _config: &ParserConfig,
    ) -> ParseResult<ParseState<'s>> {
        let Some(token) = tokens.peek().filter(|t| t.kind == TokenType::Argument) else {
            return Ok(ParseState::no_match(tokens));
        };
        let BoundRef::Value(bound) = &mut self.common.bound else {
            return Err(ParseError::logic("Positional arguments cannot be bound to flags"));
        };

        let outcome = match bound.set_value(&token.text)? {
            ParseOutcome::ShortCircuit => ParseOutcome::ShortCircuit,
            _ => ParseOutcome::Matched,
        };
        Ok(ParseState::new(outcome, tokens.advanced()))
    }

    fn validate_final(&self, count: usize) -> ParseResult<()> {
        if self.common.optionality == Optionality::Required && count < 1 {
            return Err(ParseError::runtime(format!(
                "Missing token: {}",
                self.common.hint
            )));
        }
        Ok(())
    }

    /// Undocumented positionals are only shown in the usage line.
    fn help_columns(&self) -> Vec<HelpColumns> {
        if self.common.description.is_empty() || self.common.hidden {
            return Vec::new();
        }
        vec![HelpColumns {
            left: format!("<{}>", self.common.hint),
            right: self.common.description.clone(),
        }]
    }
}

/// A named option: either a flag or an option taking a value.
#[derive(Debug)]
pub struct Opt<'a> {
    common: RefCommon<'a>,
    names: Vec<String>,
}

ref_builders!(Opt);

impl<'a> Opt<'a> {
    fn from_bound(bound: BoundRef<'a>, hint: String) -> Self {
        Self {
            common: RefCommon::new(bound, hint),
            names: Vec::new(),
        }
    }

    /// A flag that sets `dest` to `true` when present.
    pub fn flag(dest: &'a mut bool) -> Self {
        Self::from_bound(BoundRef::flag(dest), String::new())
    }

    pub fn flag_with<R, F>(callback: F) -> Self
    where
        F: FnMut(bool) -> R + 'a,
        R: CallbackResult + 'a,
    {
        Self::from_bound(BoundRef::flag_callback(callback), String::new())
    }

    pub fn value<T: FromArg + 'a>(dest: &'a mut T, hint: impl Into<String>) -> Self {
        Self::from_bound(BoundRef::value(dest), hint.into())
    }

    /// Collect every occurrence into `dest`.
    pub fn values<T: FromArg + 'a>(dest: &'a mut Vec<T>, hint: impl Into<String>) -> Self {
        Self::from_bound(BoundRef::container(dest), hint.into())
    }

    pub fn with<T, R, F>(callback: F, hint: impl Into<String>) -> Self
    where
        F: FnMut(T) -> R + 'a,
        T: FromArg + 'a,
        R: CallbackResult + 'a,
    {
        Self::from_bound(BoundRef::value_callback(callback), hint.into())
    }

    /// Add an accepted spelling, e.g. `-o` or `--output`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    pub fn names(&self) -> &[String] {
        self.names.as_slice()
    }

    pub fn is_flag(&self) -> bool {
        self.common.bound.is_flag()
    }

    pub fn is_match(&self, token: &str, config: &ParserConfig) -> bool {
        let token = config.normalise_opt(token);
        self.names
            .iter()
            .any(|name| config.normalise_opt(name) == token)
    }

    /// What "Missing token" reports: the hint, or the spellings for flags.
    fn label(&self) -> String {
        if self.common.hint.is_empty() {
            self.names.join(", ")
        } else {
            self.common.hint.clone()
        }
    }
}

impl Primitive for Opt<'_> {
    fn validate_settings(&self, config: &ParserConfig) -> ParseResult<()> {
        if self.names.is_empty() {
            return Err(ParseError::logic("No options supplied to Opt"));
        }
        for name in &self.names {
            let Some(first) = name.chars().next() else {
                return Err(ParseError::logic("Option name cannot be empty"));
            };
            if !config.is_opt_prefix(first) {
                let msg = if config.slash_prefix {
                    "Option name must begin with '-' or '/'"
                } else {
                    "Option name must begin with '-'"
                };
                return Err(ParseError::logic(msg));
            }
        }
        Ok(())
    }

    fn cardinality(&self) -> usize {
        self.common.cardinality()
    }

    fn internal_parse<'s>(
        &mut self,
        _exe_name: &str,
        tokens: &TokenStream<'s>,
        config: &ParserConfig,
    ) -> ParseResult<ParseState<'s>> {
        let Some(token) = tokens
            .peek()
            .filter(|t| t.kind == TokenType::Option && self.is_match(&t.text, config))
        else {
            return Ok(ParseState::no_match(tokens));
        };

        match &mut self.common.bound {
            BoundRef::Flag(flag) => {
                if flag.set_flag(true)? == ParseOutcome::ShortCircuit {
                    return Ok(ParseState::new(ParseOutcome::ShortCircuit, tokens.clone()));
                }
            }
            BoundRef::Value(value) => {
                let remaining = tokens.advanced();
                let Some(arg) = remaining.peek().filter(|t| t.kind == TokenType::Argument) else {
                    return Err(ParseError::runtime(format!(
                        "Expected argument following {}",
                        token.text
                    )));
                };
                if value.set_value(&arg.text)? == ParseOutcome::ShortCircuit {
                    return Ok(ParseState::new(ParseOutcome::ShortCircuit, remaining));
                }
                return Ok(ParseState::new(ParseOutcome::Matched, remaining.advanced()));
            }
        }
        Ok(ParseState::new(ParseOutcome::Matched, tokens.advanced()))
    }

    fn validate_final(&self, count: usize) -> ParseResult<()> {
        if self.common.optionality == Optionality::Required && count < 1 {
            return Err(ParseError::runtime(format!("Missing token: {}", self.label())));
        }
        Ok(())
    }

    fn help_columns(&self) -> Vec<HelpColumns> {
        if self.common.hidden {
            return Vec::new();
        }
        let mut left = self.names.join(", ");
        if !self.common.hint.is_empty() {
            left.push_str(&format!(" <{}>", self.common.hint));
        }
        vec![HelpColumns {
            left,
            right: self.common.description.clone(),
        }]
    }
}

/// The conventional `-?`, `-h`, `--help` option.
///
/// Matching it sets the bound flag and short-circuits the whole parse, so
/// required arguments need not be present.
#[derive(Debug)]
pub struct Help<'a>(Opt<'a>);

impl<'a> Help<'a> {
    pub fn new(show_help: &'a mut bool) -> Self {
        let opt = Opt::flag_with(move |flag: bool| -> ParserResult {
            *show_help = flag;
            Ok(ParseOutcome::ShortCircuit)
        })
        .name("-?")
        .name("-h")
        .name("--help")
        .help("display usage information")
        .optional();
        Self(opt)
    }

    pub fn into_opt(self) -> Opt<'a> {
        self.0
    }
}

impl<'a> From<Help<'a>> for Opt<'a> {
    fn from(help: Help<'a>) -> Self {
        help.into_opt()
    }
}
