use std::{fmt, num::NonZeroUsize, rc::Rc};

use thiserror::Error;

pub type TermRef = Rc<Term>;

#[derive(PartialEq, Eq, Hash, Clone, Copy, derive_more::Display, Debug)]
pub enum Combinator {
    /// `Ia = a`
    #[display(fmt = "I")]
    I,
    /// `Kab = a`
    #[display(fmt = "K")]
    K,
    /// `Sabc = ac(bc)`
    #[display(fmt = "S")]
    S,
    /// `Babc = a(bc)`
    #[display(fmt = "B")]
    B,
    /// `Cabc = acb`
    #[display(fmt = "C")]
    C,
    /// `Wab = abb`
    #[display(fmt = "W")]
    W,
}

impl Combinator {
    pub const ALL: [Self; 6] = [Self::I, Self::K, Self::S, Self::B, Self::C, Self::W];
}

#[derive(PartialEq, Eq, Debug, Error)]
#[error("`{0}` is not one of the combinators I, K, S, B, C, W")]
pub struct InvalidCombinator(pub char);

impl TryFrom<char> for Combinator {
    type Error = InvalidCombinator;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        Ok(match c {
            'I' => Self::I,
            'K' => Self::K,
            'S' => Self::S,
            'B' => Self::B,
            'C' => Self::C,
            'W' => Self::W,
            _ => return Err(InvalidCombinator(c)),
        })
    }
}

/// A trailing argument introduced by the reducer, counted from 1.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Argument(NonZeroUsize);

impl Argument {
    pub const FIRST: Self = Self(NonZeroUsize::MIN);

    pub fn index(self) -> usize {
        self.0.get()
    }
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match u8::try_from(self.index()) {
            Ok(k @ 1..=26) => f.write_fmt(format_args!("{}", char::from(b'a' + k - 1))),
            _ => f.write_fmt(format_args!("_{}", self.index())),
        }
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, derive_more::Display, Debug)]
pub enum Leaf {
    #[display(fmt = "{_0}")]
    Comb(Combinator),
    #[display(fmt = "{_0}")]
    Arg(Argument),
}

/// A binary application tree. Subterms are shared, never mutated.
#[derive(Clone, Debug)]
pub enum Term {
    Leaf(Leaf),
    /// `lhs rhs`
    Apply(TermRef, TermRef),
}

pub fn apply(lhs: impl Into<TermRef>, rhs: impl Into<TermRef>) -> TermRef {
    Rc::new(Term::Apply(lhs.into(), rhs.into()))
}

impl Term {
    pub fn comb(c: Combinator) -> TermRef {
        Rc::new(Term::Leaf(Leaf::Comb(c)))
    }

    pub fn arg(a: Argument) -> TermRef {
        Rc::new(Term::Leaf(Leaf::Arg(a)))
    }

    /// The leaf found by following left children from the root.
    pub fn leftmost(&self) -> Leaf {
        let mut term = self;
        loop {
            match term {
                Term::Leaf(leaf) => return *leaf,
                Term::Apply(lhs, _) => term = lhs,
            }
        }
    }

    /// Renders with every application parenthesized, e.g. `((IS)K)`.
    pub fn full(&self) -> Full<'_> {
        Full(self)
    }
}

/// Structural equality, compared with an explicit stack so that deep trees
/// do not exhaust the call stack.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        while let Some(pair) = pairs.pop() {
            match pair {
                (Term::Leaf(a), Term::Leaf(b)) if a == b => {}
                (Term::Apply(f, x), Term::Apply(g, y)) => {
                    for (a, b) in [(f, g), (x, y)] {
                        if !Rc::ptr_eq(a, b) {
                            pairs.push((a.as_ref(), b.as_ref()));
                        }
                    }
                }
                _ => return false,
            }
        }
        true
    }
}
impl Eq for Term {}

thread_local! {
    /// Stands in for children moved out of a term being dropped.
    static HOLE: TermRef = Rc::new(Term::Leaf(Leaf::Comb(Combinator::I)));
}

fn detach_children(term: &mut Term, pending: &mut Vec<TermRef>) {
    let Term::Apply(lhs, rhs) = term else {
        return;
    };
    for child in [lhs, rhs] {
        if Rc::strong_count(child) == 1 && matches!(**child, Term::Apply(_, _)) {
            if let Ok(hole) = HOLE.try_with(Rc::clone) {
                pending.push(std::mem::replace(child, hole));
            }
        }
    }
}

/// Uniquely owned subtrees are dismantled from a heap stack; the derived drop
/// would recurse once per level.
impl Drop for Term {
    fn drop(&mut self) {
        let mut pending = vec![];
        detach_children(self, &mut pending);
        while let Some(child) = pending.pop() {
            if let Ok(mut term) = Rc::try_unwrap(child) {
                detach_children(&mut term, &mut pending);
            }
        }
    }
}

enum Piece<'a> {
    Term(&'a Term),
    Text(&'static str),
}

fn render(term: &Term, full: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut pieces = vec![Piece::Term(term)];
    while let Some(piece) = pieces.pop() {
        match piece {
            Piece::Text(text) => f.write_str(text)?,
            Piece::Term(Term::Leaf(leaf)) => f.write_fmt(format_args!("{leaf}"))?,
            // pushed in reverse
            Piece::Term(Term::Apply(lhs, rhs)) => {
                if full {
                    pieces.push(Piece::Text(")"));
                    pieces.push(Piece::Term(rhs.as_ref()));
                    pieces.push(Piece::Term(lhs.as_ref()));
                    pieces.push(Piece::Text("("));
                } else if let Term::Apply(_, _) = rhs.as_ref() {
                    pieces.push(Piece::Text(")"));
                    pieces.push(Piece::Term(rhs.as_ref()));
                    pieces.push(Piece::Text("("));
                    pieces.push(Piece::Term(lhs.as_ref()));
                } else {
                    pieces.push(Piece::Term(rhs.as_ref()));
                    pieces.push(Piece::Term(lhs.as_ref()));
                }
            }
        }
    }
    Ok(())
}

/// Left-associative rendering: only right operands that are applications get
/// parentheses, e.g. `AB(CD)`.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self, false, f)
    }
}

pub struct Full<'a>(&'a Term);

impl fmt::Display for Full<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.0, true, f)
    }
}

pub fn full_string(term: &Term) -> String {
    term.full().to_string()
}

pub fn short_string(term: &Term) -> String {
    term.to_string()
}

#[cfg(test)]
pub(crate) mod test {
    use super::{Combinator::*, *};

    pub fn c(c: Combinator) -> TermRef {
        Term::comb(c)
    }

    /// `ISKSK`, i.e. `ι(ι(ιι))` with the Iota primitive expanded.
    pub fn iota_k() -> TermRef {
        apply(apply(apply(apply(c(I), c(S)), c(K)), c(S)), c(K))
    }

    pub fn iota_s() -> TermRef {
        apply(apply(iota_k(), c(S)), c(K))
    }

    pub fn nested_ski(depth: usize) -> TermRef {
        (0..depth).fold(c(I), |acc, _| apply(c(S), apply(c(K), acc)))
    }

    pub fn jot_k() -> TermRef {
        apply(apply(apply(apply(nested_ski(3), c(S)), c(K)), c(S)), c(K))
    }

    pub fn jot_s() -> TermRef {
        let t = apply(apply(apply(apply(nested_ski(5), c(S)), c(K)), c(S)), c(K));
        apply(apply(t, c(S)), c(K))
    }

    /// `(full, short, term)` triples shared by the parser and evaluator tests.
    pub fn rendered() -> Vec<(&'static str, &'static str, TermRef)> {
        vec![
            ("I", "I", c(I)),
            ("K", "K", c(K)),
            ("S", "S", c(S)),
            ("B", "B", c(B)),
            ("C", "C", c(C)),
            ("W", "W", c(W)),
            ("((SK)K)", "SKK", apply(apply(c(S), c(K)), c(K))),
            ("(B(CW))", "B(CW)", apply(c(B), apply(c(C), c(W)))),
            ("((((IS)K)S)K)", "ISKSK", iota_k()),
            ("((((((IS)K)S)K)S)K)", "ISKSKSK", iota_s()),
            (
                "(((((S(K(S(K(S(KI))))))S)K)S)K)",
                "S(K(S(K(S(KI)))))SKSK",
                jot_k(),
            ),
            (
                "(((((((S(K(S(K(S(K(S(K(S(KI))))))))))S)K)S)K)S)K)",
                "S(K(S(K(S(K(S(K(S(KI)))))))))SKSKSK",
                jot_s(),
            ),
        ]
    }

    #[test]
    fn test_render() {
        for (full, short, term) in rendered() {
            assert_eq!(full_string(&term), full);
            assert_eq!(short_string(&term), short);
        }
    }

    #[test]
    fn test_combinator_letters() {
        for comb in Combinator::ALL {
            let letter = comb.to_string();
            assert_eq!(letter.len(), 1);
            assert_eq!(full_string(&c(comb)), letter);
            assert_eq!(Combinator::try_from(letter.chars().next().unwrap()), Ok(comb));
        }
        assert_eq!(Combinator::try_from('Z'), Err(InvalidCombinator('Z')));
        assert_eq!(Combinator::try_from('s'), Err(InvalidCombinator('s')));
    }

    #[test]
    fn test_arguments() {
        let a = Argument::FIRST;
        assert_eq!(a.to_string(), "a");
        assert_eq!(a.next().next().to_string(), "c");
        let z = (1..26).fold(a, |a, _| a.next());
        assert_eq!(z.to_string(), "z");
        assert_eq!(z.next().to_string(), "_27");
        assert_ne!(Leaf::Arg(a), Leaf::Comb(I));
    }

    #[test]
    fn test_leftmost() {
        assert_eq!(iota_k().leftmost(), Leaf::Comb(I));
        assert_eq!(jot_s().leftmost(), Leaf::Comb(S));
        let t = apply(apply(Term::arg(Argument::FIRST), c(K)), c(S));
        assert_eq!(t.leftmost(), Leaf::Arg(Argument::FIRST));
    }

    #[test]
    fn test_deep_terms() {
        let n = 20_000;
        let right = nested_ski(n);
        assert_eq!(
            short_string(&right),
            format!("{}S(KI){}", "S(K(".repeat(n - 1), "))".repeat(n - 1))
        );
        assert_eq!(
            full_string(&right),
            format!("{}I{}", "(S(K".repeat(n), "))".repeat(n))
        );
        assert!(*right == *nested_ski(n));
        assert!(*right != *nested_ski(n - 1));

        let left = (0..n).fold(c(I), |acc, _| apply(apply(acc, c(S)), c(K)));
        assert_eq!(left.leftmost(), Leaf::Comb(I));
        assert_eq!(short_string(&left), format!("I{}", "SK".repeat(n)));
        assert_eq!(
            full_string(&left),
            format!("{}I{}", "(".repeat(2 * n), "S)K)".repeat(n))
        );
        drop(right);
        drop(left);
    }

    #[test]
    fn test_drop_keeps_shared_subterms() {
        let shared = nested_ski(3);
        let term = apply(apply(c(W), shared.clone()), shared.clone());
        drop(term);
        assert_eq!(std::rc::Rc::strong_count(&shared), 1);
        assert_eq!(short_string(&shared), "S(K(S(K(S(KI)))))");
    }

    #[test]
    fn test_short_form_keeps_left_chains_flat() {
        let t = apply(apply(c(S), c(K)), apply(c(C), c(B)));
        assert_eq!(short_string(&t), "SK(CB)");
        assert_eq!(full_string(&t), "((SK)(CB))");
    }
}
