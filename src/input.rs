//! Input capture for the matching engine
//!
//! A match runs over an `InputSequence`: the source elements, pulled exactly
//! once and stored for random access. Rule bodies probe positions freely
//! while backtracking, so the sequence has to be addressable by index without
//! re-reading a possibly single-pass source. Past-the-end lookups answer with
//! `None` instead of panicking; combinators treat that sentinel as an element
//! that matches nothing.

use std::rc::Rc;

/// An immutable, randomly addressable sequence of input elements.
///
/// Created once per top-level match and shared by reference among all match
/// items produced during that match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSequence<I> {
    elements: Vec<I>,
}

impl<I> InputSequence<I> {
    /// Capture a source into an input sequence, pulling each element exactly once.
    pub fn capture(source: impl IntoIterator<Item = I>) -> Self {
        InputSequence {
            elements: source.into_iter().collect(),
        }
    }

    /// The element at `index`, or `None` past the end of the input.
    ///
    /// Never fails; the `None` sentinel is how combinators observe end of
    /// input without a separate bounds check.
    pub fn element_at(&self, index: usize) -> Option<&I> {
        self.elements.get(index)
    }

    /// Number of captured elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when the input holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The elements in `start..end`, clamped to the captured range.
    pub fn slice(&self, start: usize, end: usize) -> &[I] {
        let end = end.min(self.elements.len());
        let start = start.min(end);
        &self.elements[start..end]
    }

    /// Wrap the sequence for sharing across match items.
    pub fn into_shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}

impl From<&str> for InputSequence<char> {
    fn from(source: &str) -> Self {
        InputSequence::capture(source.chars())
    }
}

impl<I> From<Vec<I>> for InputSequence<I> {
    fn from(elements: Vec<I>) -> Self {
        InputSequence { elements }
    }
}
