//! Binding frames and the action environment
//!
//! Rule bodies bind sub-match outcomes to names; semantic actions and
//! conditions read those names back. One frame exists per rule-body
//! invocation and is shared by reference between the evaluator and every
//! thunk created during that invocation, so a thunk realized later sees the
//! newest write for each name, including writes that happened after the
//! thunk was built. Frames never cross rule-call boundaries: a called rule
//! gets a fresh frame of its own.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::item::MatchItem;

/// Signature of a semantic action: reads the environment, produces at most
/// one result value. Actions must be pure; result sequences are
/// re-realizable, so an action may run more than once for the same match.
pub type ActionFn<I, R> = Rc<dyn Fn(&ActionEnv<I, R>) -> Option<R>>;

/// Signature of a semantic condition: decides whether an already-matched
/// term is accepted. Must be pure for the same reason actions must be.
pub type CondFn<I, R> = Rc<dyn Fn(&ActionEnv<I, R>) -> bool>;

/// Shared name-to-outcome frame for one rule-body invocation.
///
/// A bound name maps to the outcome of the bound term: `Some(item)` for a
/// success, `None` for a recorded failure. Lookup distinguishes "bound to a
/// failure" from "never bound".
pub struct BindFrame<I, R> {
    slots: Rc<RefCell<HashMap<String, Option<MatchItem<I, R>>>>>,
}

impl<I, R> BindFrame<I, R> {
    /// Create an empty frame.
    pub fn new() -> Self {
        BindFrame {
            slots: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Record the outcome of a bound term, replacing any earlier binding of
    /// the same name.
    pub fn set(&self, name: &str, outcome: Option<MatchItem<I, R>>) {
        self.slots.borrow_mut().insert(name.to_string(), outcome);
    }

    /// Look up a binding. Outer `None` means the name was never bound;
    /// inner `None` means it was bound to a failed term.
    pub fn get(&self, name: &str) -> Option<Option<MatchItem<I, R>>> {
        self.slots.borrow().get(name).cloned()
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// True when nothing has been bound yet.
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl<I, R> Clone for BindFrame<I, R> {
    fn clone(&self) -> Self {
        BindFrame {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<I, R> Default for BindFrame<I, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// What a semantic action or condition gets to see: the matched item it
/// wraps and the binding frame of the enclosing rule-body invocation.
pub struct ActionEnv<I, R> {
    item: MatchItem<I, R>,
    frame: BindFrame<I, R>,
}

impl<I, R> ActionEnv<I, R> {
    pub(crate) fn new(item: MatchItem<I, R>, frame: BindFrame<I, R>) -> Self {
        ActionEnv { item, frame }
    }

    /// The item the action wraps (the span of the whole actioned term).
    pub fn matched(&self) -> &MatchItem<I, R> {
        &self.item
    }

    /// The successful item bound under `name`, if any.
    pub fn get(&self, name: &str) -> Option<MatchItem<I, R>> {
        self.frame.get(name).flatten()
    }

    /// True when `name` was bound to a successful term.
    pub fn is_bound(&self, name: &str) -> bool {
        matches!(self.frame.get(name), Some(Some(_)))
    }
}

impl<I: Clone, R> ActionEnv<I, R> {
    /// The single element consumed by the binding `name`.
    ///
    /// `None` unless the bound term consumed exactly one element.
    pub fn element(&self, name: &str) -> Option<I> {
        self.get(name).and_then(|item| item.lone_element().cloned())
    }
}

impl<I, R: Clone> ActionEnv<I, R> {
    /// First realized result of the binding `name`.
    pub fn result(&self, name: &str) -> Option<R> {
        self.get(name).and_then(|item| item.result())
    }

    /// All realized results of the binding `name`; empty when unbound.
    pub fn results(&self, name: &str) -> Vec<R> {
        self.get(name)
            .map(|item| item.results_vec())
            .unwrap_or_default()
    }
}

impl<R> ActionEnv<char, R> {
    /// Text consumed by the wrapped item.
    pub fn matched_text(&self) -> String {
        self.item.matched_text()
    }

    /// Text consumed by the binding `name`; empty when unbound.
    pub fn bound_text(&self, name: &str) -> String {
        self.get(name)
            .map(|item| item.matched_text())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSequence;
    use crate::results::Results;

    fn item_over(source: &str, start: usize, next: usize) -> MatchItem<char, String> {
        MatchItem::new(
            start,
            next,
            InputSequence::from(source).into_shared(),
            Results::empty(),
        )
    }

    #[test]
    fn test_unbound_vs_bound_failure() {
        let frame: BindFrame<char, String> = BindFrame::new();
        assert!(frame.get("a").is_none(), "never-bound name");

        frame.set("a", None);
        assert!(
            matches!(frame.get("a"), Some(None)),
            "bound to a failed term"
        );
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn test_rebinding_replaces() {
        let frame: BindFrame<char, String> = BindFrame::new();
        frame.set("a", Some(item_over("xy", 0, 1)));
        frame.set("a", Some(item_over("xy", 1, 2)));

        let bound = frame.get("a").flatten().unwrap();
        assert_eq!(bound.start(), 1);
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn test_clones_share_one_frame() {
        let frame: BindFrame<char, String> = BindFrame::new();
        let alias = frame.clone();

        alias.set("late", Some(item_over("z", 0, 1)));

        assert!(
            frame.get("late").is_some(),
            "a write through one handle must be visible through the other"
        );
    }

    #[test]
    fn test_env_accessors() {
        let frame: BindFrame<char, String> = BindFrame::new();
        frame.set("c", Some(item_over("7", 0, 1)));
        frame.set("gone", None);

        let env = ActionEnv::new(item_over("7", 0, 1), frame);

        assert!(env.is_bound("c"));
        assert!(!env.is_bound("gone"));
        assert!(!env.is_bound("never"));
        assert_eq!(env.element("c"), Some('7'));
        assert_eq!(env.element("gone"), None);
        assert_eq!(env.bound_text("c"), "7");
        assert_eq!(env.matched_text(), "7");
    }

    #[test]
    fn test_env_results_of_binding() {
        let frame: BindFrame<char, String> = BindFrame::new();
        let item = MatchItem::new(
            0,
            1,
            InputSequence::from("5").into_shared(),
            Results::from_values(vec!["5".to_string()]),
        );
        frame.set("d", Some(item));

        let env = ActionEnv::new(item_over("5", 0, 1), frame);

        assert_eq!(env.result("d"), Some("5".to_string()));
        assert_eq!(env.results("d"), vec!["5".to_string()]);
        assert_eq!(env.result("missing"), None);
        assert!(env.results("missing").is_empty());
    }
}
