//! Match engine: packrat evaluation with left-recursion seed growing
//!
//! A match run works in five steps:
//!
//! 1. Capture the input once into an [`InputSequence`] and start a fresh
//!    memo; nothing carries over between runs.
//! 2. Enter the start rule through `memo_call`, which consults the memo
//!    before evaluating anything.
//! 3. Detect left recursion through the call stack: a re-entry on a key
//!    that is already evaluating answers with the current seed instead of
//!    recursing further.
//! 4. Grow the seed: evaluate the rule body again and again, each pass
//!    seeing the previous pass's match as the seed, until a pass stops
//!    consuming more input.
//! 5. Evaluate rule bodies with one recursive evaluator over the rule tree.
//!
//! Positions are passed in and handed back through items; the engine keeps
//! no cursor. Failure is the absence of an item, so backtracking is simply
//! returning `None` and letting the caller try its next alternative from
//! its own position.

use std::fmt;
use std::rc::Rc;

use crate::bindings::{ActionEnv, BindFrame};
use crate::config::MatcherConfig;
use crate::error::{GrammarError, GrammarResult};
use crate::grammar::{Grammar, RuleId};
use crate::input::InputSequence;
use crate::item::MatchItem;
use crate::memo::{Memo, MemoKey, MemoState};
use crate::results::Results;
use crate::rule::{ClassMembers, Rule};

/// Outcome of one match run: either an item or a miss.
pub struct MatchResult<I, R> {
    item: Option<MatchItem<I, R>>,
}

impl<I, R> MatchResult<I, R> {
    pub(crate) fn from_item(item: Option<MatchItem<I, R>>) -> Self {
        MatchResult { item }
    }

    /// Whether the start rule matched at position zero.
    pub fn success(&self) -> bool {
        self.item.is_some()
    }

    /// The match item, when the run succeeded.
    pub fn item(&self) -> Option<&MatchItem<I, R>> {
        self.item.as_ref()
    }

    /// Consume the result and keep only the item.
    pub fn into_item(self) -> Option<MatchItem<I, R>> {
        self.item
    }

    /// Position just past the match; input beyond it was left unconsumed.
    pub fn next_index(&self) -> Option<usize> {
        self.item.as_ref().map(MatchItem::next)
    }
}

impl<I, R: Clone> MatchResult<I, R> {
    /// Sole realized result, when there is exactly one.
    pub fn result(&self) -> Option<R> {
        self.item.as_ref().and_then(MatchItem::result)
    }

    /// All realized results, in match order; empty on a miss.
    pub fn results(&self) -> Vec<R> {
        self.item
            .as_ref()
            .map(MatchItem::results_vec)
            .unwrap_or_default()
    }
}

impl<I: fmt::Debug, R> fmt::Debug for MatchResult<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item {
            Some(item) => f.debug_tuple("MatchResult").field(item).finish(),
            None => write!(f, "MatchResult(miss)"),
        }
    }
}

/// Runs a grammar's rules against inputs.
pub struct Matcher<I, R> {
    grammar: Grammar<I, R>,
    config: MatcherConfig,
}

impl<I, R> Matcher<I, R> {
    pub fn new(grammar: Grammar<I, R>) -> Self {
        Matcher {
            grammar,
            config: MatcherConfig::default(),
        }
    }

    pub fn with_config(grammar: Grammar<I, R>, config: MatcherConfig) -> Self {
        Matcher { grammar, config }
    }

    pub fn grammar(&self) -> &Grammar<I, R> {
        &self.grammar
    }

    pub fn config(&self) -> MatcherConfig {
        self.config
    }
}

impl<I: PartialEq, R> Matcher<I, R> {
    /// Match `source` against the named start rule from position zero.
    ///
    /// The source is captured up front; a generator is pulled exactly once.
    /// Only an unknown start rule is an error. A rule that does not match
    /// is an ordinary miss inside the returned [`MatchResult`].
    pub fn get_match(
        &self,
        source: impl IntoIterator<Item = I>,
        start_rule: &str,
    ) -> GrammarResult<MatchResult<I, R>> {
        let start = self
            .grammar
            .rule_id(start_rule)
            .ok_or_else(|| GrammarError::UnknownStartRule {
                name: start_rule.to_string(),
            })?;
        let input = InputSequence::capture(source).into_shared();
        let mut context = MatchContext {
            grammar: &self.grammar,
            input,
            memo: Memo::new(),
            config: self.config,
        };
        let outcome = context.memo_call(start, 0);
        Ok(MatchResult::from_item(outcome))
    }
}

impl<R> Matcher<char, R> {
    /// Match a string; each char is one input element.
    pub fn get_match_str(
        &self,
        source: &str,
        start_rule: &str,
    ) -> GrammarResult<MatchResult<char, R>> {
        self.get_match(source.chars(), start_rule)
    }
}

/// State of one match run: the shared input, the memo, and the grammar.
struct MatchContext<'g, I, R> {
    grammar: &'g Grammar<I, R>,
    input: Rc<InputSequence<I>>,
    memo: Memo<I, R>,
    config: MatcherConfig,
}

impl<'g, I: PartialEq, R> MatchContext<'g, I, R> {
    /// Invoke a rule at a position through the memo.
    fn memo_call(&mut self, id: RuleId, pos: usize) -> Option<MatchItem<I, R>> {
        let key: MemoKey = (id, pos);
        if let Some(MemoState::Done(outcome)) = self.memo.lookup(&key) {
            return outcome.clone();
        }
        if self.memo.on_stack(&key) {
            // Left-recursive re-entry: answer with the seed, or fail
            // outright when growing is disabled.
            if !self.config.left_recursion {
                return None;
            }
            return self.memo.seed(&key);
        }

        self.memo.begin_growing(key);
        self.memo.push_call(key);
        let body = Rc::clone(self.grammar.body(id));
        let outcome = if self.config.left_recursion {
            self.grow(&body, key, pos)
        } else {
            let frame = BindFrame::new();
            self.eval(&body, pos, &frame)
        };
        self.memo.pop_call();
        self.memo.finish(key, outcome.clone());
        outcome
    }

    /// Evaluate a rule body to its fixed point.
    ///
    /// Each pass re-runs the whole body; left-recursive re-entries inside it
    /// answer with the seed stored by the previous pass. A pass that fails
    /// or stops consuming more input ends the loop, and the last stored
    /// seed is the outcome.
    fn grow(&mut self, body: &Rule<I, R>, key: MemoKey, pos: usize) -> Option<MatchItem<I, R>> {
        let mut passes = 0usize;
        loop {
            // Fresh frame per pass: each body evaluation is its own
            // invocation as far as bindings are concerned.
            let frame = BindFrame::new();
            let fresh = self.eval(body, pos, &frame);
            passes += 1;

            let seed = self.memo.seed(&key);
            let grew = match (&fresh, &seed) {
                (Some(new), Some(old)) => new.next() > old.next(),
                (Some(_), None) => true,
                (None, _) => false,
            };
            if !grew {
                return seed;
            }
            if let Some(new) = fresh {
                self.memo.advance_seed(key, new);
            }
            if let Some(limit) = self.config.growth_limit {
                if passes >= limit {
                    return self.memo.seed(&key);
                }
            }
        }
    }

    /// Evaluate one rule term at a position against the current frame.
    fn eval(
        &mut self,
        rule: &Rule<I, R>,
        pos: usize,
        frame: &BindFrame<I, R>,
    ) -> Option<MatchItem<I, R>> {
        match rule {
            Rule::Literal(elements) => self.eval_literal(elements, pos),
            Rule::Class(members) => self.eval_class(members, pos),
            Rule::Any => {
                self.input.element_at(pos)?;
                Some(self.primitive_item(pos, pos + 1))
            }
            Rule::Seq(terms) => self.eval_seq(terms, pos, frame),
            Rule::Choice(alternatives) => {
                for alternative in alternatives {
                    if let Some(item) = self.eval(alternative, pos, frame) {
                        return Some(item);
                    }
                }
                None
            }
            Rule::Call(name) => {
                // Existence is validated at build time.
                let id = self.grammar.rule_id(name)?;
                self.memo_call(id, pos)
            }
            Rule::Bind(inner, name) => {
                let outcome = self.eval(inner, pos, frame);
                frame.set(name, outcome.clone());
                outcome
            }
            Rule::Action(inner, action) => {
                let item = self.eval(inner, pos, frame)?;
                let results = Results::thunk(Rc::clone(action), frame.clone(), item.clone());
                Some(MatchItem::new(
                    item.start(),
                    item.next(),
                    Rc::clone(&self.input),
                    results,
                ))
            }
            Rule::Not(inner) => match self.eval(inner, pos, frame) {
                Some(_) => None,
                None => Some(self.zero_width(pos, Results::empty())),
            },
            Rule::Ahead(inner) => {
                let item = self.eval(inner, pos, frame)?;
                Some(self.zero_width(pos, item.results().clone()))
            }
            Rule::Star(inner) => {
                let (next, results) = self.eval_repeat(inner, pos, frame);
                Some(MatchItem::new(pos, next, Rc::clone(&self.input), results))
            }
            Rule::Plus(inner) => {
                let first = self.eval(inner, pos, frame)?;
                if first.is_zero_width() {
                    return Some(first);
                }
                let (next, tail) = self.eval_repeat(inner, first.next(), frame);
                let results = Results::concat(vec![first.results().clone(), tail]);
                Some(MatchItem::new(pos, next, Rc::clone(&self.input), results))
            }
            Rule::Opt(inner) => match self.eval(inner, pos, frame) {
                Some(item) => Some(item),
                None => Some(self.zero_width(pos, Results::empty())),
            },
            Rule::Cond(inner, accept) => {
                let item = self.eval(inner, pos, frame)?;
                let env = ActionEnv::new(item.clone(), frame.clone());
                if accept(&env) {
                    Some(item)
                } else {
                    None
                }
            }
        }
    }

    fn eval_literal(&self, elements: &[I], pos: usize) -> Option<MatchItem<I, R>> {
        for (offset, element) in elements.iter().enumerate() {
            if self.input.element_at(pos + offset) != Some(element) {
                return None;
            }
        }
        Some(self.primitive_item(pos, pos + elements.len()))
    }

    fn eval_class(&self, members: &ClassMembers<I>, pos: usize) -> Option<MatchItem<I, R>> {
        let element = self.input.element_at(pos)?;
        let accepted = match members {
            ClassMembers::Set(set) => set.iter().any(|member| member == element),
            ClassMembers::Predicate(accept) => accept(element),
        };
        if accepted {
            Some(self.primitive_item(pos, pos + 1))
        } else {
            None
        }
    }

    fn eval_seq(
        &mut self,
        terms: &[Rule<I, R>],
        pos: usize,
        frame: &BindFrame<I, R>,
    ) -> Option<MatchItem<I, R>> {
        let mut at = pos;
        let mut parts = Vec::with_capacity(terms.len());
        for term in terms {
            // Cut: one failing term fails the whole sequence.
            let item = self.eval(term, at, frame)?;
            at = item.next();
            parts.push(item.results().clone());
        }
        Some(MatchItem::new(
            pos,
            at,
            Rc::clone(&self.input),
            Results::concat(parts),
        ))
    }

    /// Greedy repetition from `pos`; returns the end position and the
    /// concatenated results of the accepted repetitions.
    fn eval_repeat(
        &mut self,
        inner: &Rule<I, R>,
        pos: usize,
        frame: &BindFrame<I, R>,
    ) -> (usize, Results<I, R>) {
        let mut at = pos;
        let mut parts = Vec::new();
        while let Some(item) = self.eval(inner, at, frame) {
            // A zero-width success would repeat forever; stop without it.
            if item.is_zero_width() {
                break;
            }
            at = item.next();
            parts.push(item.results().clone());
        }
        (at, Results::concat(parts))
    }

    /// Item for a primitive match of `start..next`, with results derived
    /// from the consumed elements when the grammar installs a hook.
    fn primitive_item(&self, start: usize, next: usize) -> MatchItem<I, R> {
        let results = match self.grammar.element_result() {
            Some(hook) => {
                let values = self
                    .input
                    .slice(start, next)
                    .iter()
                    .filter_map(|element| hook(element))
                    .collect();
                Results::from_values(values)
            }
            None => Results::empty(),
        };
        MatchItem::new(start, next, Rc::clone(&self.input), results)
    }

    fn zero_width(&self, pos: usize, results: Results<I, R>) -> MatchItem<I, R> {
        MatchItem::new(pos, pos, Rc::clone(&self.input), results)
    }
}
