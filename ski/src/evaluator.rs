use crate::{prelude::*, term::Argument};

/// Receives every intermediate term of a simplification.
pub trait Tracer {
    fn trace(&mut self, term: &Term);
}

impl Tracer for () {
    fn trace(&mut self, _: &Term) {}
}

/// Prints each step to standard error in short form.
pub struct Stderr;

impl Tracer for Stderr {
    fn trace(&mut self, term: &Term) {
        eprintln!("{term}");
    }
}

/// `None` traces nothing.
impl<T: Tracer> Tracer for Option<T> {
    fn trace(&mut self, term: &Term) {
        if let Some(tracer) = self {
            tracer.trace(term);
        }
    }
}

impl Tracer for Vec<String> {
    fn trace(&mut self, term: &Term) {
        self.push(term.to_string());
    }
}

fn is(term: &Term, c: Combinator) -> bool {
    matches!(term, Term::Leaf(Leaf::Comb(d)) if *d == c)
}

/// Rewrites `term` itself if its left spine holds a combinator with enough
/// arguments. Only the innermost leaf of the spine (at most three deep) is
/// looked at, so `I x y` does not fire here; its `I x` child does.
fn reduce_node(term: &Term) -> Option<TermRef> {
    use Combinator::*;
    let Term::Apply(f, z) = term else {
        return None;
    };
    let Term::Apply(g, y) = f.as_ref() else {
        // I z
        return is(f, I).then(|| z.clone());
    };
    let Term::Apply(h, x) = g.as_ref() else {
        return if is(g, K) {
            // K y z
            Some(y.clone())
        } else if is(g, W) {
            // W y z
            Some(apply(apply(y.clone(), z.clone()), z.clone()))
        } else {
            None
        };
    };
    match h.as_ref() {
        // S x y z
        h if is(h, S) => Some(apply(
            apply(x.clone(), z.clone()),
            apply(y.clone(), z.clone()),
        )),
        // B x y z
        h if is(h, B) => Some(apply(x.clone(), apply(y.clone(), z.clone()))),
        // C x y z
        h if is(h, C) => Some(apply(apply(x.clone(), z.clone()), y.clone())),
        _ => None,
    }
}

enum Task {
    Visit(TermRef),
    /// Rebuild `node` from the last two results once both children are done.
    Rebuild { node: TermRef, changed: bool },
}

/// One pass over the tree: rewrite the root if possible, then the children
/// of whatever the root became. Returns `None` if nothing changed.
///
/// Runs on explicit stacks; a long Jot program is a chain thousands of
/// applications deep.
fn reduce_tree(term: &TermRef) -> Option<TermRef> {
    let mut tasks = vec![Task::Visit(term.clone())];
    let mut results: Vec<(TermRef, bool)> = vec![];
    while let Some(task) = tasks.pop() {
        match task {
            Task::Visit(term) => {
                let (node, changed) = match reduce_node(&term) {
                    Some(next) => (next, true),
                    None => (term, false),
                };
                let children = match node.as_ref() {
                    Term::Apply(lhs, rhs) => Some((lhs.clone(), rhs.clone())),
                    Term::Leaf(_) => None,
                };
                match children {
                    Some((lhs, rhs)) => {
                        tasks.push(Task::Rebuild { node, changed });
                        tasks.push(Task::Visit(rhs));
                        tasks.push(Task::Visit(lhs));
                    }
                    None => results.push((node, changed)),
                }
            }
            Task::Rebuild { node, changed } => {
                let (Some((rhs, r)), Some((lhs, l))) = (results.pop(), results.pop()) else {
                    unreachable!("Something went wrong: missing operands while rebuilding");
                };
                results.push(if l || r {
                    (apply(lhs, rhs), true)
                } else {
                    (node, changed)
                });
            }
        }
    }
    match (results.pop(), results.is_empty()) {
        (Some((term, changed)), true) => changed.then_some(term),
        _ => unreachable!("Something went wrong: tree pass did not end with one term"),
    }
}

/// Rewrites until no rule applies anywhere. Terms without a normal form
/// (e.g. `WWW`) never return.
pub fn simplify(term: TermRef) -> TermRef {
    simplify_traced(term, &mut ())
}

pub fn simplify_traced(mut term: TermRef, tracer: &mut impl Tracer) -> TermRef {
    loop {
        tracer.trace(&term);
        match reduce_tree(&term) {
            Some(next) => term = next,
            None => break term,
        }
    }
}

/// Applies `term` to fresh arguments `a`, `b`, ... until its normal form is
/// headed by one of them. Returns that normal form and the number of
/// arguments used.
pub fn reduce(term: TermRef) -> (TermRef, usize) {
    reduce_traced(term, &mut ())
}

pub fn reduce_traced(mut term: TermRef, tracer: &mut impl Tracer) -> (TermRef, usize) {
    let mut count = 0;
    let mut next = Argument::FIRST;
    while let Leaf::Comb(_) = term.leftmost() {
        term = simplify_traced(apply(term, Term::arg(next)), tracer);
        next = next.next();
        count += 1;
    }
    (term, count)
}

#[cfg(test)]
mod test {
    use super::{Combinator::*, *};
    use crate::{
        parser::parse,
        term::{short_string, test::*},
    };

    fn simplified(s: &str) -> String {
        short_string(&simplify(parse(s).unwrap()))
    }

    #[test]
    fn test_reduce_node() {
        assert_eq!(reduce_node(&apply(c(I), c(C))), Some(c(C)));
        assert_eq!(reduce_node(&c(S)), None);
        assert_eq!(reduce_node(&apply(c(K), c(C))), None);
        // The redex `IS` sits below the root, so the root does not change.
        assert_eq!(reduce_node(&apply(apply(c(I), c(S)), c(K))), None);
        assert_eq!(
            reduce_node(&parse("WBS").unwrap()),
            Some(parse("BSS").unwrap())
        );
        assert_eq!(
            reduce_node(&parse("CKSB").unwrap()),
            Some(parse("KBS").unwrap())
        );
    }

    #[test]
    fn test_sharing() {
        let arg = apply(c(K), c(I));
        let term = apply(apply(c(W), c(B)), arg.clone());
        let Some(next) = reduce_node(&term) else {
            panic!("W did not fire");
        };
        let Term::Apply(lhs, rhs) = next.as_ref() else {
            panic!("expected an application");
        };
        let Term::Apply(_, inner) = lhs.as_ref() else {
            panic!("expected an application");
        };
        assert!(std::rc::Rc::ptr_eq(rhs, &arg));
        assert!(std::rc::Rc::ptr_eq(inner, &arg));
        // the input is left untouched
        assert_eq!(short_string(&term), "WB(KI)");
    }

    #[test]
    fn test_simplify() {
        let expected = ["I", "K", "S", "B", "C", "W", "SKK", "B(CW)", "K", "S", "K", "S"];
        for ((_, _, term), expected) in rendered().into_iter().zip(expected) {
            assert_eq!(short_string(&simplify(term)), expected);
        }
    }

    #[test]
    fn test_simplify_examples() {
        assert_eq!(short_string(&simplify(apply(c(I), c(C)))), "C");
        assert_eq!(
            short_string(&simplify(apply(apply(apply(c(S), c(K)), c(S)), c(K)))),
            "K"
        );
        assert_eq!(simplified("W(BS)C"), "S(CC)");
    }

    #[test]
    fn test_notations_agree() {
        assert_eq!(simplified("*i*i*ii"), "K");
        assert_eq!(simplified("((((IS)K)S)K)"), "K");
        assert_eq!(simplified("11100"), "K");
        assert_eq!(simplified("11111000"), "S");
        assert_eq!(simplified("*i*i*i*ii"), "S");
    }

    #[test]
    fn test_idempotent() {
        for (_, _, term) in rendered() {
            let once = simplify(term);
            assert_eq!(simplify(once.clone()), once);
        }
    }

    #[test]
    fn test_reduce() {
        let expected = [
            ("a", 1),
            ("a", 2),
            ("ac(bc)", 3),
            ("a(bc)", 3),
            ("acb", 3),
            ("abb", 2),
            ("a", 1),
            ("c(ab)(ab)", 3),
            ("a", 2),
            ("ac(bc)", 3),
            ("a", 2),
            ("ac(bc)", 3),
        ];
        for ((_, _, term), (reduced, count)) in rendered().into_iter().zip(expected) {
            let (term, n) = reduce(term);
            assert_eq!((short_string(&term).as_str(), n), (reduced, count));
        }
        for (input, reduced, count) in [(" ( K I ) ", "b", 2), ("CC", "bca", 3)] {
            let (term, n) = reduce(parse(input).unwrap());
            assert_eq!((short_string(&term).as_str(), n), (reduced, count));
        }
    }

    #[test]
    fn test_long_jot_programs() {
        let n = 20_000;
        let term = parse(&"1".repeat(n)).unwrap();
        let normal = simplify(term.clone());
        assert!(*normal == *term);
        assert_eq!(
            short_string(&normal),
            format!("{}S(KI){}", "S(K(".repeat(n - 1), "))".repeat(n - 1))
        );

        // `0^n` is `I` followed by n copies of `SK`; one pass strips the `I`.
        let term = parse(&"0".repeat(n)).unwrap();
        let Some(next) = reduce_tree(&term) else {
            panic!("IS should have been rewritten");
        };
        assert_eq!(next.leftmost(), Leaf::Comb(S));
        drop(term);
        drop(next);
    }

    #[test]
    fn test_trace() {
        let mut steps: Vec<String> = vec![];
        let term = simplify_traced(parse("SKSK").unwrap(), &mut steps);
        assert_eq!(short_string(&term), "K");
        assert_eq!(steps, vec!["SKSK", "KK(SK)", "K"]);

        let mut steps: Vec<String> = vec![];
        let (term, n) = reduce_traced(c(K), &mut steps);
        assert_eq!((short_string(&term).as_str(), n), ("a", 2));
        assert_eq!(steps, vec!["Ka", "Kab", "a"]);

        let mut steps = None::<Vec<String>>;
        simplify_traced(parse("IC").unwrap(), &mut steps);
        assert_eq!(steps, None);
        let mut steps = Some(Vec::<String>::new());
        simplify_traced(parse("IC").unwrap(), &mut steps);
        assert_eq!(steps, Some(vec!["IC".to_string(), "C".to_string()]));
    }
}
