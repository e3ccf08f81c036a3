//! Match items: the record of one successful match
//!
//! A `MatchItem` ties together the consumed span (`start..next`), a shared
//! handle on the input, and the lazy result sequence produced by semantic
//! actions. There is no failure variant and no success flag: a failed match
//! is the absence of an item (`Option::None`), so presence and success can
//! never disagree.

use std::fmt;
use std::rc::Rc;

use crate::input::InputSequence;
use crate::results::Results;

/// One successful match: the consumed span plus its lazy results.
///
/// Invariant: `start <= next <= input.len()`. A zero-width item
/// (`start == next`) is a valid success that consumed nothing.
pub struct MatchItem<I, R> {
    start: usize,
    next: usize,
    input: Rc<InputSequence<I>>,
    results: Results<I, R>,
}

impl<I, R> MatchItem<I, R> {
    /// Create an item spanning `start..next` over the shared input.
    pub fn new(
        start: usize,
        next: usize,
        input: Rc<InputSequence<I>>,
        results: Results<I, R>,
    ) -> Self {
        debug_assert!(start <= next, "match span must not run backwards");
        debug_assert!(next <= input.len(), "match span must stay within the input");
        MatchItem {
            start,
            next,
            input,
            results,
        }
    }

    /// Index of the first consumed element.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the first element after the match; where the caller resumes.
    pub fn next(&self) -> usize {
        self.next
    }

    /// Number of consumed elements.
    pub fn consumed(&self) -> usize {
        self.next - self.start
    }

    /// True when the match consumed no elements.
    pub fn is_zero_width(&self) -> bool {
        self.start == self.next
    }

    /// Shared handle on the input this item was matched against.
    pub fn input(&self) -> &Rc<InputSequence<I>> {
        &self.input
    }

    /// The consumed elements as a slice of the input.
    pub fn matched_elements(&self) -> &[I] {
        self.input.slice(self.start, self.next)
    }

    /// The single consumed element of an exactly-one-element match.
    ///
    /// `None` when the item consumed zero or several elements. This is the
    /// explicit conversion for element-level semantic actions; there is no
    /// implicit item-to-element coercion.
    pub fn lone_element(&self) -> Option<&I> {
        if self.consumed() == 1 {
            self.input.element_at(self.start)
        } else {
            None
        }
    }

    /// The lazy result sequence attached to this item.
    pub fn results(&self) -> &Results<I, R> {
        &self.results
    }
}

impl<I, R: Clone> MatchItem<I, R> {
    /// First realized result value, if the sequence produces any.
    pub fn result(&self) -> Option<R> {
        self.results.first()
    }

    /// All realized result values, in production order.
    pub fn results_vec(&self) -> Vec<R> {
        self.results.realize()
    }
}

impl<R> MatchItem<char, R> {
    /// The consumed span rendered as text; handy for character grammars.
    pub fn matched_text(&self) -> String {
        self.matched_elements().iter().collect()
    }
}

impl<I, R> Clone for MatchItem<I, R> {
    fn clone(&self) -> Self {
        MatchItem {
            start: self.start,
            next: self.next,
            input: Rc::clone(&self.input),
            results: self.results.clone(),
        }
    }
}

impl<I: fmt::Debug, R> fmt::Debug for MatchItem<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchItem")
            .field("start", &self.start)
            .field("next", &self.next)
            .field("matched", &self.matched_elements())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(source: &str) -> Rc<InputSequence<char>> {
        InputSequence::from(source).into_shared()
    }

    #[test]
    fn test_span_accessors() {
        let input = shared("hello");
        let item: MatchItem<char, String> = MatchItem::new(1, 4, input, Results::empty());

        assert_eq!(item.start(), 1);
        assert_eq!(item.next(), 4);
        assert_eq!(item.consumed(), 3);
        assert!(!item.is_zero_width());
        assert_eq!(item.matched_elements(), &['e', 'l', 'l']);
        assert_eq!(item.matched_text(), "ell");
    }

    #[test]
    fn test_zero_width_item() {
        let input = shared("ab");
        let item: MatchItem<char, String> = MatchItem::new(1, 1, input, Results::empty());

        assert!(item.is_zero_width());
        assert_eq!(item.consumed(), 0);
        assert_eq!(item.matched_elements(), &[] as &[char]);
        assert_eq!(item.lone_element(), None);
    }

    #[test]
    fn test_lone_element_requires_exactly_one() {
        let input = shared("xyz");

        let one: MatchItem<char, String> = MatchItem::new(1, 2, Rc::clone(&input), Results::empty());
        assert_eq!(one.lone_element(), Some(&'y'));

        let two: MatchItem<char, String> = MatchItem::new(0, 2, input, Results::empty());
        assert_eq!(two.lone_element(), None);
    }

    #[test]
    fn test_results_realization() {
        let input = shared("7");
        let item: MatchItem<char, String> =
            MatchItem::new(0, 1, input, Results::from_values(vec!["7".to_string()]));

        assert_eq!(item.result(), Some("7".to_string()));
        assert_eq!(item.results_vec(), vec!["7".to_string()]);
    }

    #[test]
    fn test_clone_shares_input() {
        let input = shared("abc");
        let item: MatchItem<char, String> = MatchItem::new(0, 3, input, Results::empty());
        let copy = item.clone();

        assert_eq!(copy.start(), item.start());
        assert_eq!(copy.next(), item.next());
        assert!(Rc::ptr_eq(item.input(), copy.input()));
    }
}
