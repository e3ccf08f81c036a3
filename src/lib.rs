//! # pegmat
//!
//! A runtime engine for compiled PEG grammars with packrat memoization and
//! left recursion resolved by iterative seed growing.
//!
//! Using the engine takes four steps:
//!
//! 1. Build rule bodies with the constructors in [`rule`].
//! 2. Collect them into a [`Grammar`] with [`GrammarBuilder`]; structural
//!    defects are rejected here, before any input is matched.
//! 3. Wrap the grammar in a [`Matcher`], optionally tuned by a
//!    [`MatcherConfig`].
//! 4. Call [`Matcher::get_match`] with an input and a start rule name.
//!
//! A rule that does not match is not an error: the run returns a
//! [`MatchResult`] holding no item. Errors are reserved for defective
//! grammars and unknown start rules.
//!
//! ## Testing
//!
//! Shared fixtures (small grammars, canonical cases, a counting probe)
//! live in the [`testing`] module; unit and integration tests build on it.

pub mod bindings;
pub mod config;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod input;
pub mod item;
pub mod memo;
pub mod results;
pub mod rule;
pub mod snapshot;
pub mod testing;

pub use bindings::{ActionEnv, ActionFn, BindFrame, CondFn};
pub use config::MatcherConfig;
pub use engine::{MatchResult, Matcher};
pub use error::{GrammarError, GrammarResult};
pub use grammar::{ElementResultFn, Grammar, GrammarBuilder, RuleId};
pub use input::InputSequence;
pub use item::MatchItem;
pub use memo::{Memo, MemoKey, MemoState};
pub use results::Results;
pub use rule::{ClassMembers, Rule};
pub use snapshot::{snapshot_from_item, snapshot_from_result, MatchSnapshot};
