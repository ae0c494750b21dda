use crate::{
    lexer::Symbol,
    parser::{invalid_character, left_iota, right_iota, Notation, ParseError, Result},
    prelude::*,
};

/// A stack entry: either a bare `ι` not yet applied to anything, or a term.
enum Pending {
    Iota,
    Term(TermRef),
}

/// An Iota program is well formed iff it ends with the `i` that first makes
/// the number of `i`s exceed the number of `*`s.
fn check(symbols: &[Spanned<Symbol>]) -> Result<()> {
    let (mut stars, mut iotas) = (0usize, 0usize);
    for (i, symbol) in symbols.iter().enumerate() {
        match symbol.value {
            Symbol::Star => stars += 1,
            Symbol::Iota => {
                iotas += 1;
                if iotas == stars + 1 && i + 1 < symbols.len() {
                    return Err(ParseError::TrailingTerms {
                        prefix: compact(&symbols[..=i]),
                        span: span_of(&symbols[i + 1..], 0),
                    });
                }
            }
            _ => return Err(invalid_character(Notation::Iota, symbol)),
        }
    }
    match (stars + 1).checked_sub(iotas) {
        Some(0) => Ok(()),
        Some(missing) => {
            let end = symbols.last().map_or(0, |s| s.span.end);
            Err(ParseError::Incomplete {
                missing,
                span: end..end,
            })
        }
        None => unreachable!("Something went wrong: {iotas} i for {stars} *"),
    }
}

/// Parses Iota text (`i` and `*`). The stack is built right to left, and
/// applications involving a bare `ι` are rewritten on the spot:
/// `ιι = I`, `ιF = FSK`, `Fι = S(KF)`.
pub fn parse(symbols: &[Spanned<Symbol>]) -> Result<TermRef> {
    check(symbols)?;
    let mut stack = vec![];
    for symbol in symbols.iter().rev() {
        match symbol.value {
            Symbol::Iota => stack.push(Pending::Iota),
            Symbol::Star => {
                let (Some(lhs), Some(rhs)) = (stack.pop(), stack.pop()) else {
                    unreachable!("Something went wrong: `*` with fewer than two operands");
                };
                let term = match (lhs, rhs) {
                    (Pending::Iota, Pending::Iota) => Term::comb(Combinator::I),
                    (Pending::Iota, Pending::Term(rhs)) => left_iota(rhs),
                    (Pending::Term(lhs), Pending::Iota) => right_iota(lhs),
                    (Pending::Term(lhs), Pending::Term(rhs)) => apply(lhs, rhs),
                };
                stack.push(Pending::Term(term));
            }
            _ => unreachable!("Something went wrong: {symbol} passed the Iota check"),
        }
    }
    match (stack.pop(), stack.is_empty()) {
        (Some(Pending::Term(term)), true) => Ok(term),
        // `ι` alone is `ISK`, which still waits for its argument.
        (Some(Pending::Iota), true) => Ok(left_iota(Term::comb(Combinator::I))),
        _ => unreachable!("Something went wrong: Iota parse did not end with one term"),
    }
}
