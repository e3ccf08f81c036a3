//! Shared fixtures for exercising the matcher
//!
//! Small grammars, canonical inputs with their expected outputs, and a
//! counting probe for asserting how often a term is evaluated. These live
//! in the library so unit tests and integration tests run against the same
//! fixtures.

use std::cell::Cell;
use std::rc::Rc;

use once_cell::sync::Lazy;

use crate::grammar::Grammar;
use crate::rule::{call, char_range, choice, lit_str, plus, seq, Rule};

/// One canonical input with the output the subtraction grammar produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalcCase {
    pub input: &'static str,
    pub expected: &'static str,
}

/// Inputs for [`calc_grammar`] with their right-associated renderings.
pub static CALC_CASES: Lazy<Vec<CalcCase>> = Lazy::new(|| {
    vec![
        CalcCase {
            input: "7",
            expected: "7",
        },
        CalcCase {
            input: "1-2",
            expected: "(1-2)",
        },
        CalcCase {
            input: "1-2-3",
            expected: "(1-(2-3))",
        },
        CalcCase {
            input: "1-2-3-4",
            expected: "(1-(2-(3-4)))",
        },
        CalcCase {
            input: "9-0-5-2-6",
            expected: "(9-(0-(5-(2-6))))",
        },
    ]
});

fn digit_rule() -> Rule<char, String> {
    char_range('0', '9').bind("c").action(|env| {
        let c = env.element("c")?;
        Some((c as u8 - b'0').to_string())
    })
}

/// Left-recursive subtraction grammar:
///
/// ```text
/// Expression := Expression '-' Expression / Digit
/// Digit      := ['0'..'9']
/// ```
///
/// Seed growing resolves the recursion; because only the left operand
/// grows, repeated subtraction renders right-associated, so `"1-2-3"`
/// produces `"(1-(2-3))"`.
pub fn calc_grammar() -> Grammar<char, String> {
    Grammar::builder()
        .rule(
            "Expression",
            choice(vec![
                seq(vec![
                    call("Expression").bind("a"),
                    lit_str("-"),
                    call("Expression").bind("b"),
                ])
                .action(|env| {
                    let a = env.result("a")?;
                    let b = env.result("b")?;
                    Some(format!("({}-{})", a, b))
                }),
                call("Digit"),
            ]),
        )
        .rule("Digit", digit_rule())
        .build()
        .expect("subtraction grammar is well formed")
}

/// Digit-run grammar: `Number := Digit+`, producing the digits re-joined.
pub fn digits_grammar() -> Grammar<char, String> {
    Grammar::builder()
        .rule(
            "Number",
            plus(call("Digit")).bind("ds").action(|env| {
                let digits = env.results("ds");
                Some(digits.join(""))
            }),
        )
        .rule("Digit", digit_rule())
        .build()
        .expect("digit grammar is well formed")
}

/// Counts how often a probed term is evaluated.
///
/// Clones share one counter, so a probe can move into a rule closure while
/// the test keeps reading it.
#[derive(Clone, Default)]
pub struct ProbeCounter {
    count: Rc<Cell<usize>>,
}

impl ProbeCounter {
    pub fn new() -> Self {
        ProbeCounter::default()
    }

    pub fn bump(&self) {
        self.count.set(self.count.get() + 1);
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}

/// Reference rendering of repeated subtraction over single digits, folded
/// to the right the way the grammar's growth order folds it.
pub fn right_folded(digits: &[char]) -> String {
    match digits {
        [] => String::new(),
        [only] => (*only as u8 - b'0').to_string(),
        [first, rest @ ..] => {
            format!("({}-{})", *first as u8 - b'0', right_folded(rest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Matcher;

    #[test]
    fn test_calc_cases_match_their_expected_output() {
        let matcher = Matcher::new(calc_grammar());
        for case in CALC_CASES.iter() {
            let outcome = matcher.get_match_str(case.input, "Expression").unwrap();
            assert_eq!(
                outcome.result().as_deref(),
                Some(case.expected),
                "input {:?}",
                case.input
            );
        }
    }

    #[test]
    fn test_digits_grammar_joins_digits() {
        let matcher = Matcher::new(digits_grammar());
        let outcome = matcher.get_match_str("007", "Number").unwrap();
        assert_eq!(outcome.result().as_deref(), Some("007"));
    }

    #[test]
    fn test_probe_counter_shares_across_clones() {
        let probe = ProbeCounter::new();
        let spy = probe.clone();
        spy.bump();
        spy.bump();
        assert_eq!(probe.count(), 2);
    }

    #[test]
    fn test_right_folded_agrees_with_calc_cases() {
        for case in CALC_CASES.iter() {
            let digits: Vec<char> = case.input.chars().filter(|c| *c != '-').collect();
            assert_eq!(right_folded(&digits), case.expected);
        }
    }
}
