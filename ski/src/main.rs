use std::io::Write;

use anyhow::Result;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use ski::{
    evaluator::{self, Stderr},
    parser::{self, ParseError},
    prelude::*,
};
use util::repl;

fn describe(e: &ParseError) -> String {
    match e {
        ParseError::Empty => "Nothing to parse".to_string(),
        ParseError::UnknownNotation { found, .. } => format!(
            "{} starts neither SKI, Iota nor Jot",
            found.fg(Color::Red)
        ),
        ParseError::InvalidCharacter {
            notation, found, ..
        } => format!("{} is not {notation}", found.fg(Color::Red)),
        ParseError::MismatchedParentheses { open, close, .. } => format!(
            "{} opened, {} closed",
            open.fg(Color::Yellow),
            close.fg(Color::Yellow)
        ),
        ParseError::UnmatchedParenthesis { paren, .. } => {
            format!("Unmatched {}", paren.fg(Color::Red))
        }
        ParseError::DegenerateGroup { count, .. } => format!(
            "Holds {} subterms, needs at least {}",
            count.fg(Color::Red),
            2usize.fg(Color::Yellow)
        ),
        ParseError::TrailingTerms { .. } => "Expression is already complete".to_string(),
        ParseError::Incomplete { missing, .. } => {
            format!("{} more expected here", missing.fg(Color::Yellow))
        }
    }
}

fn build_report(e: &ParseError) -> Report<Span> {
    let span = e.span();
    // ariadne does not draw empty labels
    let span = span.start..span.end.max(span.start + 1);
    Report::build(ReportKind::Error, (), span.start)
        .with_message(e)
        .with_label(
            Label::new(span)
                .with_message(describe(e))
                .with_color(Color::Red),
        )
        .finish()
}

/// ariadne cannot draw a report over empty source, so blank input gets a
/// plain line instead.
fn write_error(input: &str, e: &ParseError, mut out: impl Write) -> std::io::Result<()> {
    if input.trim().is_empty() {
        writeln!(out, "Error: {e}")
    } else {
        build_report(e).write(Source::from(input), out)
    }
}

type CommandResult<'a> = Result<(), (&'a str, ParseError)>;

#[derive(Default)]
struct Repl {
    trace: bool,
}
impl Repl {
    fn parse(input: &str) -> Result<TermRef, (&str, ParseError)> {
        parser::parse(input).map_err(|e| (input, e))
    }

    fn show_parsed(input: &str) -> CommandResult<'_> {
        let (notation, term) = parser::parse_with_notation(input).map_err(|e| (input, e))?;
        println!("{notation}: {}", term.full());
        Ok(())
    }

    fn show(input: &str) -> CommandResult<'_> {
        let term = Self::parse(input)?;
        println!("{term}");
        Ok(())
    }

    fn simplify<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let term = Self::parse(input)?;
        let mut tracer = self.trace.then_some(Stderr);
        let term = evaluator::simplify_traced(term, &mut tracer);
        println!("{term}");
        Ok(())
    }

    fn reduce<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let term = Self::parse(input)?;
        let mut tracer = self.trace.then_some(Stderr);
        let (term, count) = evaluator::reduce_traced(term, &mut tracer);
        println!("{term} {count}");
        Ok(())
    }

    fn set_trace(&mut self, setting: &str) {
        match setting.trim() {
            "" => {}
            "on" => self.trace = true,
            "off" => self.trace = false,
            other => eprintln!("Unknown trace setting {other}, expected on or off"),
        }
        println!("trace {}", if self.trace { "on" } else { "off" });
    }

    fn show_help() {
        println!(
            "{}",
            r#"
term                -- same as :simplify term
:parse      term    -- show the notation and the fully parenthesized term
:show       term    -- show the parsed term
:simplify   term    -- show the normal form
:reduce     term    -- apply the term to arguments a, b, ... until one of them is the head
:trace  [on|off]    -- print every simplification step
:help               -- show this message

Terms are SKI (I K S B C W and parentheses), Iota (* and i) or Jot (0 and 1).
        "#
            .trim()
        );
    }

    fn handle_repl_input<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let (cmd, input) = if let Some(stripped) = input.strip_prefix(':') {
            stripped
                .trim_start()
                .split_once(' ')
                .unwrap_or((stripped.trim(), ""))
        } else {
            ("", input)
        };
        match cmd {
            "p" | "parse" => {
                Self::show_parsed(input)?;
            }
            "sh" | "show" => {
                Self::show(input)?;
            }
            "" | "s" | "simplify" => {
                self.simplify(input)?;
            }
            "r" | "reduce" => {
                self.reduce(input)?;
            }
            "t" | "trace" => {
                self.set_trace(input);
            }
            "h" | "he" | "hel" | "help" => {
                Self::show_help();
            }
            _ => {
                eprintln!("Unknown command {cmd}");
                Self::show_help();
            }
        }
        Ok(())
    }
}
impl repl::Repl for Repl {
    type Error = anyhow::Error;
    const HISTORY: Option<&'static str> = Some("/tmp/ski.history");
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error> {
        if let Err((input, e)) = self.handle_repl_input(&input) {
            write_error(input, &e, std::io::stderr())?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("Hi, this is a combinatory logic REPL. :h to show help");
    println!();
    repl::start_repl(Repl::default())?;
    Ok(())
}
