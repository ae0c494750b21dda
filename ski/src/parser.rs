use chumsky::Parser as _;
use thiserror::Error;

use crate::{
    lexer::{lexer, Symbol},
    prelude::*,
};

#[derive(PartialEq, Eq, Clone, Copy, derive_more::Display, Debug)]
pub enum Notation {
    #[display(fmt = "SKI")]
    Ski,
    #[display(fmt = "Iota")]
    Iota,
    #[display(fmt = "Jot")]
    Jot,
}

#[derive(PartialEq, Eq, Clone, Debug, Error)]
pub enum ParseError {
    #[error("Invalid input")]
    Empty,
    #[error("Invalid character {found}")]
    UnknownNotation { found: char, span: Span },
    #[error("Invalid {notation} character {found}")]
    InvalidCharacter {
        notation: Notation,
        found: Symbol,
        span: Span,
    },
    #[error("Mismatched parentheses in {text} ({open} vs. {close})")]
    MismatchedParentheses {
        text: String,
        open: usize,
        close: usize,
        span: Span,
    },
    #[error("Unmatched {paren} in {text}")]
    UnmatchedParenthesis {
        paren: Symbol,
        text: String,
        span: Span,
    },
    #[error("{count} {} in {group}", terms(.count))]
    DegenerateGroup {
        count: usize,
        group: String,
        span: Span,
    },
    #[error("Unexpected terms following {prefix}")]
    TrailingTerms { prefix: String, span: Span },
    #[error("Incomplete expression (expected {missing} more {})", terms(.missing))]
    Incomplete { missing: usize, span: Span },
}

impl ParseError {
    /// Where in the input the problem lies.
    pub fn span(&self) -> Span {
        match self {
            ParseError::Empty => 0..0,
            ParseError::UnknownNotation { span, .. }
            | ParseError::InvalidCharacter { span, .. }
            | ParseError::MismatchedParentheses { span, .. }
            | ParseError::UnmatchedParenthesis { span, .. }
            | ParseError::DegenerateGroup { span, .. }
            | ParseError::TrailingTerms { span, .. }
            | ParseError::Incomplete { span, .. } => span.clone(),
        }
    }
}

fn terms(count: &usize) -> &'static str {
    if *count == 1 {
        "term"
    } else {
        "terms"
    }
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

pub(crate) fn invalid_character(notation: Notation, symbol: &Spanned<Symbol>) -> ParseError {
    ParseError::InvalidCharacter {
        notation,
        found: symbol.value,
        span: symbol.span(),
    }
}

pub fn lex(s: &str) -> Vec<Spanned<Symbol>> {
    match lexer().parse(s) {
        Ok(symbols) => symbols,
        Err(es) => unreachable!("Something went wrong: the lexer rejected {s:?}: {es:?}"),
    }
}

/// Picks the notation from the first symbol.
pub fn notation_of(first: &Spanned<Symbol>) -> Result<Notation> {
    match first.value {
        Symbol::LParen | Symbol::RParen | Symbol::Comb(_) => Ok(Notation::Ski),
        Symbol::Star | Symbol::Iota => Ok(Notation::Iota),
        Symbol::Zero | Symbol::One => Ok(Notation::Jot),
        Symbol::Other(found) => Err(ParseError::UnknownNotation {
            found,
            span: first.span(),
        }),
    }
}

/// Parses SKI, Iota or Jot text, ignoring whitespace.
pub fn parse(s: &str) -> Result<TermRef> {
    parse_with_notation(s).map(|(_, term)| term)
}

pub fn parse_with_notation(s: &str) -> Result<(Notation, TermRef)> {
    let symbols = lex(s);
    let first = symbols.first().ok_or(ParseError::Empty)?;
    let notation = notation_of(first)?;
    let term = match notation {
        Notation::Ski => crate::ski::parse(&symbols)?,
        Notation::Iota => crate::iota::parse(&symbols)?,
        Notation::Jot => crate::jot::parse(&symbols)?,
    };
    Ok((notation, term))
}

/// `ιF = (λx.xSK)F = FSK`
pub fn left_iota(term: TermRef) -> TermRef {
    apply(apply(term, Term::comb(Combinator::S)), Term::comb(Combinator::K))
}

/// `Fι = λx.F(ιx)`, which behaves as `S(KF)`.
pub fn right_iota(term: TermRef) -> TermRef {
    apply(
        Term::comb(Combinator::S),
        apply(Term::comb(Combinator::K), term),
    )
}
