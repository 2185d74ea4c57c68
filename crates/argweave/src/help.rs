//! Usage and help text for composite parsers.

use std::fmt;

use crate::parser::Parser;
use crate::primitive::{HelpColumns, Primitive};
use crate::textflow::Column;

/// Gap between the label column and the description column.
const GUTTER: usize = 4;

impl Parser<'_> {
    /// The full help text, as printed by `{}`.
    pub fn help_text(&self) -> String {
        self.to_string()
    }

    fn arg_rows(&self) -> Vec<HelpColumns> {
        self.args.iter().flat_map(Primitive::help_columns).collect()
    }

    fn option_rows(&self) -> Vec<HelpColumns> {
        self.options.iter().flat_map(Primitive::help_columns).collect()
    }

    fn command_rows(&self) -> Vec<HelpColumns> {
        self.cmds
            .iter()
            .filter(|cmd| !cmd.hidden)
            .map(|cmd| {
                let description = cmd.exe_name.description_text();
                HelpColumns {
                    left: cmd.exe_name.name().to_string(),
                    right: description.lines().next().unwrap_or_default().to_string(),
                }
            })
            .collect()
    }
}

/// `<a> [<b> <c> ... ] <options>`: the first optional positional opens the
/// bracket, which closes after the last one.
fn write_usage_args(f: &mut fmt::Formatter<'_>, parser: &Parser<'_>) -> fmt::Result {
    let mut required = true;
    for arg in &parser.args {
        f.write_str(" ")?;
        if arg.is_optional() && required {
            f.write_str("[")?;
            required = false;
        }
        write!(f, "<{}>", arg.hint())?;
        if arg.cardinality() == 0 {
            f.write_str(" ... ")?;
        }
    }
    if !required {
        f.write_str("]")?;
    }
    if !parser.options.is_empty() {
        f.write_str(" <options>")?;
    }
    Ok(())
}

fn write_rows(
    f: &mut fmt::Formatter<'_>,
    rows: &[HelpColumns],
    header: &str,
    console_width: usize,
) -> fmt::Result {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(f, "{header}")?;

    let widest = rows.iter().map(|row| row.left.chars().count() + 2).max().unwrap_or(0);
    let label_width = widest.min(console_width / 2);
    let text_width = console_width.saturating_sub(label_width + GUTTER + 3);

    for row in rows {
        let columns = Column::new(row.left.as_str()).width(label_width).indent(2)
            + Column::spacer(GUTTER)
            + Column::new(row.right.as_str()).width(text_width);
        writeln!(f, "{columns}")?;
    }
    Ok(())
}

impl fmt::Display for Parser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = self.exe_name.description_text();
        if !description.is_empty() {
            write!(f, "{description}\n\n")?;
        }

        let name = self.exe_name.name();
        if !name.is_empty() {
            write!(f, "Usage:\n  {name}")?;
            write_usage_args(f, self)?;
            if !self.cmds.is_empty() {
                write!(f, "\n  {name} <subcommand>")?;
                for cmd in self.cmds.iter().filter(|cmd| cmd.allude_in_usage) {
                    write!(f, "\n  {name} {}", cmd.exe_name.name())?;
                    write_usage_args(f, cmd)?;
                }
            }
            writeln!(f)?;
        }

        let width = self.config.console_width;
        write_rows(f, &self.arg_rows(), "\nWhere arguments are:", width)?;
        write_rows(f, &self.option_rows(), "\nWhere options are:", width)?;
        write_rows(f, &self.command_rows(), "\nWhere subcommands are:", width)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Arg, ExeName, Help, Opt, Parser};

    #[test]
    fn usage_lists_positionals_and_options() {
        let (mut help, mut output, mut first, mut rest) =
            (false, String::new(), String::new(), Vec::<String>::new());
        let parser = Parser::new()
            .with(ExeName::new().description("Copies files around."))
            .with(Help::new(&mut help))
            .with(
                Opt::value(&mut output, "filename")
                    .name("-o")
                    .name("--output")
                    .help("specifies output file"),
            )
            .with(Arg::value(&mut first, "first").required().help("first input"))
            .with(Arg::values(&mut rest, "rest"));

        let expected = "\
Copies files around.

Usage:
  <executable> <first> [<rest> ... ] <options>

Where arguments are:
  <first>    first input

Where options are:
  -?, -h, --help             display usage information
  -o, --output <filename>    specifies output file
";
        assert_eq!(parser.help_text(), expected);
    }

    #[test]
    fn long_descriptions_wrap_under_their_column() {
        let mut index = 0_u32;
        let parser = Parser::new().with(
            Opt::value(&mut index, "index")
                .name("-i")
                .name("--index")
                .help("An index, which is an integer between 0 and 10, inclusive"),
        );

        let rows: Vec<_> = parser.help_text().lines().skip(4).map(str::to_string).collect();
        assert_eq!(
            rows,
            [
                "  -i, --index <index>    An index, which is an integer between 0 and 10,",
                "                         inclusive",
            ]
        );
    }

    #[test]
    fn leading_newline_keeps_the_description() {
        let mut n = 0_u8;
        let parser = Parser::new().with(
            Opt::value(&mut n, "n")
                .name("-n")
                .help("\nsecond line"),
        );

        let text = parser.help_text();
        let rows: Vec<_> = text.lines().skip(4).collect();
        assert_eq!(rows, ["  -n <n>    ", "            second line"]);
    }

    #[test]
    fn hidden_entries_are_left_out() {
        let (mut secret, mut cmd) = (false, String::new());
        let parser = Parser::new()
            .with(Opt::flag(&mut secret).name("--secret").hidden())
            .with(Parser::command(&mut cmd, "internal").hidden());

        assert_eq!(
            parser.help_text(),
            "Usage:\n  <executable> <options>\n  <executable> <subcommand>\n"
        );
    }

    #[test]
    fn subcommands_are_listed_with_their_summary() {
        let (mut cmd, mut flag, mut target) = (String::new(), false, String::new());
        let parser = Parser::new()
            .with(ExeName::new())
            .with(
                Parser::command(&mut cmd, "build")
                    .description("Compile the project.\nLonger text that is not listed.")
                    .allude_in_usage()
                    .with(Opt::flag(&mut flag).name("-r"))
                    .with(Arg::value(&mut target, "target")),
            );

        let expected = "\
Usage:
  <executable>
  <executable> <subcommand>
  <executable> build [<target>] <options>

Where subcommands are:
  build    Compile the project.
";
        assert_eq!(parser.to_string(), expected);
    }
}
