//! Composable command line parsing.
//!
//! Parsers are built by composing small primitives, each bound to a
//! destination it writes into when it matches:
//!
//! - [`ExeName`] captures the executable (or subcommand) name
//! - [`Arg`] matches positional arguments
//! - [`Opt`] matches flags and value options
//! - [`Help`] is the conventional `-?`/`-h`/`--help` flag
//!
//! A [`Parser`] holds them in declaration order, and may nest further
//! parsers as subcommands. Parsing writes straight into the bound variables:
//!
//! ```
//! use argweave::{Arg, Args, Help, Opt, ParseOutcome, Parser};
//!
//! let (mut show_help, mut width, mut name) = (false, 0_u32, String::new());
//! let mut cli = Parser::new()
//!     .with(Help::new(&mut show_help))
//!     .with(Opt::value(&mut width, "width").name("-w").name("--width").help("output width"))
//!     .with(Arg::value(&mut name, "name").required());
//!
//! let outcome = cli.parse(&Args::from_argv(["tool", "--width=40", "report"]))?;
//! assert_eq!(outcome, ParseOutcome::Matched);
//! drop(cli);
//! assert_eq!((width, name.as_str()), (40, "report"));
//! # Ok::<(), argweave::ParseError>(())
//! ```

pub mod args;
pub mod bind;
pub mod config;
mod help;
pub mod parser;
pub mod primitive;
pub mod result;
pub mod textflow;

pub use args::{Args, Token, TokenStream, TokenType};
pub use bind::FromArg;
pub use config::{DEFAULT_CONSOLE_WIDTH, ParserConfig};
pub use parser::{Component, Parser, combine};
pub use primitive::{Arg, ExeName, Help, HelpColumns, Opt, Optionality};
pub use result::{CallbackResult, ErrorKind, ParseError, ParseOutcome, ParseResult, ParserResult};
