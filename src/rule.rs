//! Rule expressions: the compiled form of grammar rule bodies
//!
//! A rule body is an explicit expression tree interpreted by the engine's
//! evaluator. Construction goes through the free functions and chaining
//! methods below; the tree itself stays inert data, which keeps bodies
//! inspectable and lets the grammar check them for defects before any match
//! runs.
//!
//! Sequencing and choice carry the PEG commitments:
//! 1. A sequence is an AND with cut: the first failing term fails the whole
//!    sequence, later terms never run.
//! 2. A choice is ordered: alternatives are tried left to right from the
//!    same start position, and the first success is committed.

use std::fmt;
use std::rc::Rc;

use crate::bindings::{ActionEnv, ActionFn, CondFn};

/// Membership test of an input class.
pub enum ClassMembers<I> {
    /// Explicit member set; must not be empty (checked at build time).
    Set(Vec<I>),
    /// Arbitrary predicate over one element; assumed pure.
    Predicate(Rc<dyn Fn(&I) -> bool>),
}

/// One node of a rule-body expression tree.
pub enum Rule<I, R> {
    /// Match a fixed run of elements in order; all or nothing.
    Literal(Vec<I>),
    /// Match exactly one element accepted by the class.
    Class(ClassMembers<I>),
    /// Match exactly one element, whatever it is; fails only at end of input.
    Any,
    /// AND with cut: every term in order, first failure aborts the rest.
    Seq(Vec<Rule<I, R>>),
    /// Ordered OR: alternatives from the same start, first success wins.
    Choice(Vec<Rule<I, R>>),
    /// Invoke a named rule through the memo.
    Call(String),
    /// Evaluate the inner term, then record its outcome under a name.
    Bind(Box<Rule<I, R>>, String),
    /// On success of the inner term, replace its results with a deferred action.
    Action(Box<Rule<I, R>>, ActionFn<I, R>),
    /// Negative lookahead: zero-width success iff the inner term fails.
    Not(Box<Rule<I, R>>),
    /// Positive lookahead: zero-width success iff the inner term succeeds;
    /// keeps the inner results but consumes nothing.
    Ahead(Box<Rule<I, R>>),
    /// Zero or more inner matches, greedy.
    Star(Box<Rule<I, R>>),
    /// One or more inner matches, greedy.
    Plus(Box<Rule<I, R>>),
    /// Zero or one inner match.
    Opt(Box<Rule<I, R>>),
    /// On success of the inner term, accept only if the condition holds.
    Cond(Box<Rule<I, R>>, CondFn<I, R>),
}

/// Literal over a run of elements.
pub fn lit<I, R>(elements: Vec<I>) -> Rule<I, R> {
    Rule::Literal(elements)
}

/// Literal over a single element.
pub fn lit_one<I, R>(element: I) -> Rule<I, R> {
    Rule::Literal(vec![element])
}

/// Character literal from a string; each char is one input element.
pub fn lit_str<R>(text: &str) -> Rule<char, R> {
    Rule::Literal(text.chars().collect())
}

/// Input class with an explicit member set.
pub fn class<I, R>(members: Vec<I>) -> Rule<I, R> {
    Rule::Class(ClassMembers::Set(members))
}

/// Input class defined by a predicate.
pub fn class_fn<I, R>(accept: impl Fn(&I) -> bool + 'static) -> Rule<I, R> {
    Rule::Class(ClassMembers::Predicate(Rc::new(accept)))
}

/// Character class over an inclusive range, expanded to an explicit set.
///
/// An inverted range expands to the empty set and is rejected at build time.
pub fn char_range<R>(low: char, high: char) -> Rule<char, R> {
    Rule::Class(ClassMembers::Set((low..=high).collect()))
}

/// Match any single element.
pub fn any<I, R>() -> Rule<I, R> {
    Rule::Any
}

/// Sequence of terms (AND with cut). An empty sequence matches zero-width.
pub fn seq<I, R>(terms: Vec<Rule<I, R>>) -> Rule<I, R> {
    Rule::Seq(terms)
}

/// Ordered choice of alternatives. An empty choice always fails.
pub fn choice<I, R>(alternatives: Vec<Rule<I, R>>) -> Rule<I, R> {
    Rule::Choice(alternatives)
}

/// Reference to a named rule.
pub fn call<I, R>(rule_name: &str) -> Rule<I, R> {
    Rule::Call(rule_name.to_string())
}

/// Negative lookahead around a term.
pub fn not<I, R>(inner: Rule<I, R>) -> Rule<I, R> {
    Rule::Not(Box::new(inner))
}

/// Positive lookahead around a term.
pub fn ahead<I, R>(inner: Rule<I, R>) -> Rule<I, R> {
    Rule::Ahead(Box::new(inner))
}

/// Zero or more repetitions of a term.
pub fn star<I, R>(inner: Rule<I, R>) -> Rule<I, R> {
    Rule::Star(Box::new(inner))
}

/// One or more repetitions of a term.
pub fn plus<I, R>(inner: Rule<I, R>) -> Rule<I, R> {
    Rule::Plus(Box::new(inner))
}

/// Zero or one occurrence of a term.
pub fn opt<I, R>(inner: Rule<I, R>) -> Rule<I, R> {
    Rule::Opt(Box::new(inner))
}

/// End of input, expressed in grammar terms: succeeds zero-width only when
/// no element remains. The engine itself never anchors to end of input.
pub fn end_of_input<I, R>() -> Rule<I, R> {
    not(any())
}

impl<I, R> Rule<I, R> {
    /// Record this term's outcome under `name` in the current frame.
    pub fn bind(self, name: &str) -> Self {
        Rule::Bind(Box::new(self), name.to_string())
    }

    /// Attach a semantic action to this term.
    pub fn action(self, produce: impl Fn(&ActionEnv<I, R>) -> Option<R> + 'static) -> Self {
        Rule::Action(Box::new(self), Rc::new(produce))
    }

    /// Attach a semantic condition to this term.
    pub fn cond(self, accept: impl Fn(&ActionEnv<I, R>) -> bool + 'static) -> Self {
        Rule::Cond(Box::new(self), Rc::new(accept))
    }
}

impl<I: Clone> Clone for ClassMembers<I> {
    fn clone(&self) -> Self {
        match self {
            ClassMembers::Set(members) => ClassMembers::Set(members.clone()),
            ClassMembers::Predicate(accept) => ClassMembers::Predicate(Rc::clone(accept)),
        }
    }
}

impl<I: Clone, R> Clone for Rule<I, R> {
    fn clone(&self) -> Self {
        match self {
            Rule::Literal(elements) => Rule::Literal(elements.clone()),
            Rule::Class(members) => Rule::Class(members.clone()),
            Rule::Any => Rule::Any,
            Rule::Seq(terms) => Rule::Seq(terms.clone()),
            Rule::Choice(alternatives) => Rule::Choice(alternatives.clone()),
            Rule::Call(name) => Rule::Call(name.clone()),
            Rule::Bind(inner, name) => Rule::Bind(inner.clone(), name.clone()),
            Rule::Action(inner, action) => Rule::Action(inner.clone(), Rc::clone(action)),
            Rule::Not(inner) => Rule::Not(inner.clone()),
            Rule::Ahead(inner) => Rule::Ahead(inner.clone()),
            Rule::Star(inner) => Rule::Star(inner.clone()),
            Rule::Plus(inner) => Rule::Plus(inner.clone()),
            Rule::Opt(inner) => Rule::Opt(inner.clone()),
            Rule::Cond(inner, accept) => Rule::Cond(inner.clone(), Rc::clone(accept)),
        }
    }
}

impl<I: fmt::Debug> fmt::Debug for ClassMembers<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassMembers::Set(members) => f.debug_tuple("Set").field(members).finish(),
            ClassMembers::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

impl<I: fmt::Debug, R> fmt::Debug for Rule<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Literal(elements) => f.debug_tuple("Literal").field(elements).finish(),
            Rule::Class(members) => f.debug_tuple("Class").field(members).finish(),
            Rule::Any => write!(f, "Any"),
            Rule::Seq(terms) => f.debug_tuple("Seq").field(terms).finish(),
            Rule::Choice(alternatives) => f.debug_tuple("Choice").field(alternatives).finish(),
            Rule::Call(name) => f.debug_tuple("Call").field(name).finish(),
            Rule::Bind(inner, name) => f.debug_tuple("Bind").field(inner).field(name).finish(),
            Rule::Action(inner, _) => f.debug_tuple("Action").field(inner).finish(),
            Rule::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Rule::Ahead(inner) => f.debug_tuple("Ahead").field(inner).finish(),
            Rule::Star(inner) => f.debug_tuple("Star").field(inner).finish(),
            Rule::Plus(inner) => f.debug_tuple("Plus").field(inner).finish(),
            Rule::Opt(inner) => f.debug_tuple("Opt").field(inner).finish(),
            Rule::Cond(inner, _) => f.debug_tuple("Cond").field(inner).finish(),
        }
    }
}
