use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use argweave::{
    Arg, Args, DEFAULT_CONSOLE_WIDTH, ExeName, Help, Opt, ParseOutcome, Parser, ParserConfig,
};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

/// Exit status for malformed command lines.
const USAGE_ERROR: u8 = 2;

#[derive(Debug, Default)]
struct Cli {
    show_help: bool,
    greet: GreetArgs,
    tokens: TokensArgs,
}

#[derive(Debug)]
struct GreetArgs {
    invoked: Option<String>,
    show_help: bool,
    verbose: bool,
    colour: Option<String>,
    times: u32,
    shout: bool,
    name: String,
}

impl Default for GreetArgs {
    fn default() -> Self {
        Self {
            invoked: None,
            show_help: false,
            verbose: false,
            colour: None,
            times: 1,
            shout: false,
            name: String::new(),
        }
    }
}

#[derive(Debug, Default)]
struct TokensArgs {
    invoked: Option<String>,
    show_help: bool,
    verbose: bool,
    raw: Vec<String>,
}

/// One line of `tokens` output.
#[derive(Serialize)]
struct TokenLine<'a> {
    arg: &'a str,
    #[serde(flatten)]
    token: &'a argweave::Token,
}

fn verbose_flag(verbose: &mut bool) -> Opt<'_> {
    Opt::flag(verbose)
        .name("-v")
        .name("--verbose")
        .help("print the parsed values to stderr")
}

fn cli_parser(cli: &mut Cli) -> Parser<'_> {
    let greet = &mut cli.greet;
    let tokens = &mut cli.tokens;

    let greet_cmd = Parser::command(&mut greet.invoked, "greet")
        .description("Print a greeting")
        .allude_in_usage()
        .with(Help::new(&mut greet.show_help))
        .with(verbose_flag(&mut greet.verbose))
        .with(
            Opt::value(&mut greet.colour, "colour")
                .name("-c")
                .name("--colour")
                .help("describe the greeting with a colour"),
        )
        .with(
            Opt::value(&mut greet.times, "n")
                .name("-n")
                .name("--times")
                .help("how many times to greet (default 1)"),
        )
        .with(Opt::flag(&mut greet.shout).name("--shout").help("print the greeting in upper case"))
        .with(Arg::value(&mut greet.name, "name").required().help("who to greet"));

    let tokens_cmd = Parser::command(&mut tokens.invoked, "tokens")
        .description("Show how raw arguments are split into tokens")
        .allude_in_usage()
        .with(Help::new(&mut tokens.show_help))
        .with(verbose_flag(&mut tokens.verbose))
        .with(
            Opt::values(&mut tokens.raw, "arg")
                .name("-r")
                .name("--raw")
                .required()
                .help("a raw argument to tokenize; use --raw=<arg> for values starting with '-'"),
        );

    Parser::new()
        .with(ExeName::new().description("Composable argument parsing demo."))
        .with(Help::new(&mut cli.show_help))
        .with(greet_cmd)
        .with(tokens_cmd)
}

fn main() -> ExitCode {
    init_tracing();

    match run(&Args::from_env()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = ParserConfig::new().with_console_width(console_width());
    let mut cli = Cli::default();

    let (parsed, help) = {
        let mut parser = cli_parser(&mut cli).config(config);
        let parsed = parser.parse(args);
        (parsed, parser.help_text())
    };

    let outcome = match parsed {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::debug!(kind = ?err.kind(), "parse failed");
            return Ok(usage_error(&err.to_string(), &help));
        }
    };
    tracing::debug!(?outcome, "arguments parsed");

    if outcome == ParseOutcome::ShortCircuit {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{help}").context("failed to write help")?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.greet.invoked.is_some() {
        if cli.greet.verbose {
            eprintln!("{:#?}", cli.greet);
        }
        greet(&cli.greet)?;
    } else if cli.tokens.invoked.is_some() {
        if cli.tokens.verbose {
            eprintln!("{:#?}", cli.tokens);
        }
        print_tokens(&cli.tokens, config)?;
    } else {
        return Ok(usage_error("a subcommand is required", &help));
    }
    Ok(ExitCode::SUCCESS)
}

fn usage_error(message: &str, help: &str) -> ExitCode {
    eprintln!("error: {message}\n");
    eprint!("{help}");
    ExitCode::from(USAGE_ERROR)
}

fn greet(args: &GreetArgs) -> Result<()> {
    let mut line = match &args.colour {
        Some(colour) => format!("Hello, {colour} {}!", args.name),
        None => format!("Hello, {}!", args.name),
    };
    if args.shout {
        line = line.to_uppercase();
    }
    tracing::debug!(times = args.times, "greeting");

    let mut stdout = io::stdout().lock();
    for _ in 0..args.times {
        writeln!(stdout, "{line}").context("failed to write greeting")?;
    }
    Ok(())
}

fn print_tokens(args: &TokensArgs, config: ParserConfig) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for raw in &args.raw {
        let single = Args::new("tokens", [raw.as_str()]);
        for token in single.tokens(config) {
            let line = serde_json::to_string(&TokenLine {
                arg: raw,
                token: &token,
            })
            .context("failed to encode token")?;
            writeln!(stdout, "{line}").context("failed to write token")?;
        }
    }
    Ok(())
}

fn console_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(DEFAULT_CONSOLE_WIDTH)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
