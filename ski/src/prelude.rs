pub use crate::term::{apply, Combinator, Leaf, Term, TermRef};

pub type Span = std::ops::Range<usize>;
pub fn merge_span(lhs: &Span, rhs: &Span) -> Span {
    std::ops::Range {
        start: std::cmp::min(lhs.start, rhs.start),
        end: std::cmp::max(lhs.end, rhs.end),
    }
}

#[derive(derive_more::AsRef, Clone, PartialEq, Eq, derive_more::Display, Debug)]
#[display(bound = "T: std::fmt::Display")]
#[display(fmt = "{value}")]
pub struct Spanned<T> {
    pub span: Span,
    #[as_ref]
    pub value: T,
}
impl<T> Spanned<T> {
    pub fn forget_span(self) -> T {
        self.value
    }
    pub fn value(&self) -> &T {
        &self.value
    }
    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Span covering all of `items`, or the empty span at `fallback`.
pub fn span_of<T>(items: &[Spanned<T>], fallback: usize) -> Span {
    match (items.first(), items.last()) {
        (Some(first), Some(last)) => merge_span(&first.span(), &last.span()),
        _ => fallback..fallback,
    }
}

/// Renders symbols back to text with the whitespace dropped.
pub fn compact<T: std::fmt::Display>(items: &[Spanned<T>]) -> String {
    items.iter().map(|s| s.value.to_string()).collect()
}
