use chumsky::prelude::*;

use crate::prelude::*;

pub type LexError = chumsky::error::Simple<char, Span>;

#[derive(PartialEq, Eq, Hash, Clone, Copy, derive_more::Display, Debug)]
pub enum Symbol {
    #[display(fmt = "(")]
    LParen,
    #[display(fmt = ")")]
    RParen,
    #[display(fmt = "{_0}")]
    Comb(Combinator),
    /// Iota application.
    #[display(fmt = "*")]
    Star,
    /// The Iota primitive.
    #[display(fmt = "i")]
    Iota,
    #[display(fmt = "0")]
    Zero,
    #[display(fmt = "1")]
    One,
    /// Anything else that is not whitespace; rejected by the front ends.
    #[display(fmt = "{_0}")]
    Other(char),
}

pub fn lexer() -> impl Parser<char, Vec<Spanned<Symbol>>, Error = LexError> {
    let comb = |letter: char, c: Combinator| just(letter).to(Symbol::Comb(c));
    let symbol = choice((
        just('(').to(Symbol::LParen),
        just(')').to(Symbol::RParen),
        just('*').to(Symbol::Star),
        just('i').to(Symbol::Iota),
        just('0').to(Symbol::Zero),
        just('1').to(Symbol::One),
        comb('I', Combinator::I),
        comb('K', Combinator::K),
        comb('S', Combinator::S),
        comb('B', Combinator::B),
        comb('C', Combinator::C),
        comb('W', Combinator::W),
        // Never fails, so neither does the lexer.
        filter(|c: &char| !c.is_whitespace()).map(Symbol::Other),
    ));
    symbol
        .map_with_span(|value, span| Spanned { span, value })
        .padded()
        .repeated()
        .padded()
        .then_ignore(end())
}
