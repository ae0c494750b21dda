use crate::{
    lexer::Symbol,
    parser::{invalid_character, Notation, ParseError, Result},
    prelude::*,
};

/// Number of subterms directly inside the outermost parentheses of `group`.
fn count_subterms(group: &[Spanned<Symbol>]) -> usize {
    let mut count = 0;
    let mut depth = 0;
    for symbol in group {
        match symbol.value {
            Symbol::LParen => {
                if depth == 1 {
                    count += 1;
                }
                depth += 1;
            }
            Symbol::Comb(_) if depth == 1 => count += 1,
            Symbol::RParen => depth -= 1,
            _ => {}
        }
    }
    count
}

fn check(symbols: &[Spanned<Symbol>]) -> Result<()> {
    let (mut open, mut close) = (0, 0);
    for symbol in symbols {
        match symbol.value {
            Symbol::Comb(_) => {}
            Symbol::LParen => open += 1,
            Symbol::RParen => close += 1,
            _ => return Err(invalid_character(Notation::Ski, symbol)),
        }
    }
    if open != close {
        return Err(ParseError::MismatchedParentheses {
            text: compact(symbols),
            open,
            close,
            span: span_of(symbols, 0),
        });
    }

    let mut opened = vec![];
    let mut groups = vec![];
    for (i, symbol) in symbols.iter().enumerate() {
        match symbol.value {
            Symbol::LParen => opened.push(i),
            Symbol::RParen => match opened.pop() {
                Some(start) => groups.push(start..i + 1),
                None => {
                    return Err(ParseError::UnmatchedParenthesis {
                        paren: Symbol::RParen,
                        text: compact(symbols),
                        span: symbol.span(),
                    })
                }
            },
            _ => {}
        }
    }
    // Equal counts with no stray `)` leave every `(` closed.
    assert!(opened.is_empty(), "unclosed parentheses at {opened:?}");

    // Outer groups are reported before the groups nested in them.
    groups.sort_unstable_by_key(|group| group.start);
    for group in groups {
        let group = &symbols[group];
        match count_subterms(group) {
            count @ (0 | 1) => {
                return Err(ParseError::DegenerateGroup {
                    count,
                    group: compact(group),
                    span: span_of(group, 0),
                })
            }
            _ => {}
        }
    }
    Ok(())
}

/// Replaces the top two terms with their application if both belong to the
/// group that starts at stack height `base`.
fn fold(stack: &mut Vec<TermRef>, base: usize) {
    if stack.len() < base + 2 {
        return;
    }
    if let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) {
        stack.push(apply(lhs, rhs));
    }
}

/// Parses combinator text such as `S(KI)K` or `((SK)K)`. Application is left
/// associative and every parenthesized group must hold at least two subterms.
pub fn parse(symbols: &[Spanned<Symbol>]) -> Result<TermRef> {
    check(symbols)?;
    let mut stack: Vec<TermRef> = vec![];
    // Stack height at which each open group started.
    let mut bases: Vec<usize> = vec![];
    for symbol in symbols {
        match symbol.value {
            Symbol::LParen => bases.push(stack.len()),
            Symbol::Comb(c) => {
                stack.push(Term::comb(c));
                fold(&mut stack, bases.last().copied().unwrap_or(0));
            }
            Symbol::RParen => {
                bases.pop();
                fold(&mut stack, bases.last().copied().unwrap_or(0));
            }
            _ => unreachable!("Something went wrong: {symbol} passed the SKI check"),
        }
    }
    match (stack.pop(), stack.is_empty()) {
        (Some(term), true) => Ok(term),
        _ => unreachable!("Something went wrong: SKI parse did not end with one term"),
    }
}
