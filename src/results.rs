//! Lazy result sequences and action thunks
//!
//! Results attach to match items but are not computed during matching:
//! concatenation nodes hold their parts unforced, and semantic actions are
//! kept as thunks until someone realizes the sequence. A matched term may
//! produce zero, one, or several values. Realization flattens the tree in
//! production order, evaluates thunks, and drops `None` productions, so an
//! action can contribute nothing while its term still counts as matched.
//!
//! Actions are required to be pure: a sequence may be realized any number
//! of times and must yield the same values each time.

use std::fmt;
use std::rc::Rc;

use crate::bindings::{ActionEnv, ActionFn, BindFrame};
use crate::item::MatchItem;

/// A lazy sequence of semantic result values.
///
/// Cloning is cheap and shares the underlying nodes.
pub struct Results<I, R> {
    node: Rc<Node<I, R>>,
}

enum Node<I, R> {
    /// No values.
    Empty,
    /// Already-known values.
    Values(Vec<R>),
    /// Concatenation of part sequences, left to right; parts stay unforced.
    Concat(Vec<Results<I, R>>),
    /// Deferred semantic action over one match and its binding frame.
    Thunk {
        action: ActionFn<I, R>,
        frame: BindFrame<I, R>,
        item: MatchItem<I, R>,
    },
}

impl<I, R> Results<I, R> {
    fn from_node(node: Node<I, R>) -> Self {
        Results {
            node: Rc::new(node),
        }
    }

    /// A sequence with no values.
    pub fn empty() -> Self {
        Self::from_node(Node::Empty)
    }

    /// A sequence of already-known values.
    pub fn from_values(values: Vec<R>) -> Self {
        if values.is_empty() {
            Self::empty()
        } else {
            Self::from_node(Node::Values(values))
        }
    }

    /// A single already-known value.
    pub fn single(value: R) -> Self {
        Self::from_node(Node::Values(vec![value]))
    }

    /// Lazy concatenation of part sequences. Does not force any part.
    pub fn concat(mut parts: Vec<Results<I, R>>) -> Self {
        match parts.len() {
            0 => Self::empty(),
            1 => parts.remove(0),
            _ => Self::from_node(Node::Concat(parts)),
        }
    }

    /// A deferred action over `item`, reading `frame` at realization time.
    pub fn thunk(action: ActionFn<I, R>, frame: BindFrame<I, R>, item: MatchItem<I, R>) -> Self {
        Self::from_node(Node::Thunk {
            action,
            frame,
            item,
        })
    }
}

impl<I, R: Clone> Results<I, R> {
    /// Realize the sequence: flatten concatenations in production order,
    /// evaluate thunks, drop `None` productions.
    pub fn realize(&self) -> Vec<R> {
        let mut values = Vec::new();
        self.collect_into(&mut values);
        values
    }

    /// First realized value, if any.
    pub fn first(&self) -> Option<R> {
        self.realize().into_iter().next()
    }

    fn collect_into(&self, values: &mut Vec<R>) {
        match &*self.node {
            Node::Empty => {}
            Node::Values(own) => values.extend(own.iter().cloned()),
            Node::Concat(parts) => {
                for part in parts {
                    part.collect_into(values);
                }
            }
            Node::Thunk {
                action,
                frame,
                item,
            } => {
                let env = ActionEnv::new(item.clone(), frame.clone());
                if let Some(value) = action(&env) {
                    values.push(value);
                }
            }
        }
    }
}

impl<I, R> Clone for Results<I, R> {
    fn clone(&self) -> Self {
        Results {
            node: Rc::clone(&self.node),
        }
    }
}

impl<I, R: fmt::Debug> fmt::Debug for Results<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.node {
            Node::Empty => write!(f, "Results::empty"),
            Node::Values(own) => write!(f, "Results::values({:?})", own),
            Node::Concat(parts) => write!(f, "Results::concat[{}]", parts.len()),
            Node::Thunk { item, .. } => {
                write!(f, "Results::thunk({}..{})", item.start(), item.next())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSequence;
    use std::cell::Cell;

    fn item_over(source: &str, start: usize, next: usize) -> MatchItem<char, String> {
        MatchItem::new(
            start,
            next,
            InputSequence::from(source).into_shared(),
            Results::empty(),
        )
    }

    fn counting_thunk(runs: Rc<Cell<usize>>, value: Option<&str>) -> Results<char, String> {
        let value = value.map(|v| v.to_string());
        let action: ActionFn<char, String> = Rc::new(move |_env| {
            runs.set(runs.get() + 1);
            value.clone()
        });
        Results::thunk(action, BindFrame::new(), item_over("x", 0, 1))
    }

    #[test]
    fn test_empty_realizes_to_nothing() {
        let results: Results<char, String> = Results::empty();
        assert!(results.realize().is_empty());
        assert_eq!(results.first(), None);
    }

    #[test]
    fn test_values_in_order() {
        let results: Results<char, i32> = Results::from_values(vec![1, 2, 3]);
        assert_eq!(results.realize(), vec![1, 2, 3]);
        assert_eq!(results.first(), Some(1));
    }

    #[test]
    fn test_concat_preserves_production_order() {
        let results: Results<char, i32> = Results::concat(vec![
            Results::from_values(vec![1]),
            Results::empty(),
            Results::from_values(vec![2, 3]),
        ]);
        assert_eq!(results.realize(), vec![1, 2, 3]);
    }

    #[test]
    fn test_thunk_is_deferred_until_realization() {
        let runs = Rc::new(Cell::new(0));
        let results = counting_thunk(Rc::clone(&runs), Some("v"));

        assert_eq!(runs.get(), 0, "building a thunk must not evaluate it");

        assert_eq!(results.realize(), vec!["v".to_string()]);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_realization_is_repeatable() {
        let runs = Rc::new(Cell::new(0));
        let results = counting_thunk(Rc::clone(&runs), Some("v"));

        assert_eq!(results.realize(), results.realize());
        assert_eq!(runs.get(), 2, "each realization evaluates the thunk afresh");
    }

    #[test]
    fn test_none_productions_are_dropped() {
        let runs = Rc::new(Cell::new(0));
        let silent = counting_thunk(Rc::clone(&runs), None);
        let results = Results::concat(vec![
            Results::from_values(vec!["a".to_string()]),
            silent,
            Results::from_values(vec!["b".to_string()]),
        ]);

        assert_eq!(results.realize(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(runs.get(), 1, "a dropped production still evaluates its thunk");
    }

    #[test]
    fn test_concat_does_not_force_parts() {
        let runs = Rc::new(Cell::new(0));
        let _results = Results::concat(vec![
            counting_thunk(Rc::clone(&runs), Some("a")),
            counting_thunk(Rc::clone(&runs), Some("b")),
        ]);
        assert_eq!(runs.get(), 0, "concatenation must stay lazy");
    }

    #[test]
    fn test_single_collapse() {
        let inner: Results<char, i32> = Results::from_values(vec![7]);
        let wrapped = Results::concat(vec![inner]);
        assert_eq!(wrapped.realize(), vec![7]);
    }
}
