//! Packrat memo table and rule call stack
//!
//! Every rule invocation is keyed by `(rule, position)`. The table records
//! two kinds of entries:
//!
//! 1. `Done`: the invocation finished; the stored outcome (a match or a
//!    miss) is final and is returned verbatim on every later call.
//! 2. `Growing`: the invocation is still running somewhere below us on the
//!    call stack. Its payload is the current left-recursion seed, `None`
//!    until a first pass has produced one.
//!
//! The call stack mirrors the active invocations so that re-entry on the
//! same key is detectable without unwinding.

use std::collections::HashMap;
use std::fmt;

use crate::grammar::RuleId;
use crate::item::MatchItem;

/// Memo key: one rule applied at one input position.
pub type MemoKey = (RuleId, usize);

/// State of one memoized invocation.
pub enum MemoState<I, R> {
    /// Invocation in progress; payload is the seed grown so far.
    Growing(Option<MatchItem<I, R>>),
    /// Invocation finished with this outcome.
    Done(Option<MatchItem<I, R>>),
}

impl<I, R> fmt::Debug for MemoState<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoState::Growing(None) => write!(f, "Growing(miss)"),
            MemoState::Growing(Some(item)) => {
                write!(f, "Growing({}..{})", item.start(), item.next())
            }
            MemoState::Done(None) => write!(f, "Done(miss)"),
            MemoState::Done(Some(item)) => write!(f, "Done({}..{})", item.start(), item.next()),
        }
    }
}

/// Memo table plus the stack of invocations currently evaluating.
pub struct Memo<I, R> {
    table: HashMap<MemoKey, MemoState<I, R>>,
    call_stack: Vec<MemoKey>,
}

impl<I, R> Memo<I, R> {
    pub fn new() -> Self {
        Memo {
            table: HashMap::new(),
            call_stack: Vec::new(),
        }
    }

    /// Current state for a key, if any invocation has touched it.
    pub fn lookup(&self, key: &MemoKey) -> Option<&MemoState<I, R>> {
        self.table.get(key)
    }

    /// Mark an invocation as in progress with no seed yet.
    pub fn begin_growing(&mut self, key: MemoKey) {
        self.table.insert(key, MemoState::Growing(None));
    }

    /// Current seed of a growing invocation; `None` when there is no seed
    /// or the key is not growing.
    pub fn seed(&self, key: &MemoKey) -> Option<MatchItem<I, R>> {
        match self.table.get(key) {
            Some(MemoState::Growing(seed)) => seed.clone(),
            _ => None,
        }
    }

    /// Replace the seed of a growing invocation with a longer one.
    pub fn advance_seed(&mut self, key: MemoKey, item: MatchItem<I, R>) {
        self.table.insert(key, MemoState::Growing(Some(item)));
    }

    /// Record the final outcome of an invocation.
    pub fn finish(&mut self, key: MemoKey, outcome: Option<MatchItem<I, R>>) {
        self.table.insert(key, MemoState::Done(outcome));
    }

    /// Push an invocation onto the call stack.
    pub fn push_call(&mut self, key: MemoKey) {
        self.call_stack.push(key);
    }

    /// Pop the innermost invocation off the call stack.
    pub fn pop_call(&mut self) {
        self.call_stack.pop();
    }

    /// Whether an invocation with this key is currently evaluating.
    pub fn on_stack(&self, key: &MemoKey) -> bool {
        self.call_stack.contains(key)
    }

    /// Number of keys the table has entries for.
    pub fn entry_count(&self) -> usize {
        self.table.len()
    }

    /// Depth of the invocation stack.
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }
}

impl<I, R> Default for Memo<I, R> {
    fn default() -> Self {
        Memo::new()
    }
}
