use crate::{
    lexer::Symbol,
    parser::{invalid_character, left_iota, right_iota, Notation, Result},
    prelude::*,
};

/// Parses Jot text by folding each bit onto `I`: `0` applies `ι` to the
/// program so far, `1` applies the program so far to `ι`.
pub fn parse(symbols: &[Spanned<Symbol>]) -> Result<TermRef> {
    symbols
        .iter()
        .try_fold(Term::comb(Combinator::I), |acc, symbol| match symbol.value {
            Symbol::Zero => Ok(left_iota(acc)),
            Symbol::One => Ok(right_iota(acc)),
            _ => Err(invalid_character(Notation::Jot, symbol)),
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        parser::lex,
        term::test::{c, jot_k, jot_s},
    };

    fn run(s: &str) -> Result<TermRef> {
        parse(&lex(s))
    }

    #[test]
    fn test_parse() {
        assert_eq!(run("").unwrap(), c(Combinator::I));
        assert_eq!(run("11100").unwrap(), jot_k());
        assert_eq!(run("11111000").unwrap(), jot_s());
        assert_eq!(run("	1  1 1110	0		0  ").unwrap(), jot_s());
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            run("1102").unwrap_err().to_string(),
            "Invalid Jot character 2"
        );
        assert_eq!(run("10 i").unwrap_err().span(), 3..4);
    }
}
