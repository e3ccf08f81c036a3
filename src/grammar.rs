//! Grammar construction and validation
//!
//! A grammar is a fixed set of named rules plus an optional hook that turns
//! raw elements into results. Construction is staged:
//!
//! 1. A [`GrammarBuilder`] collects `(name, body)` pairs in order.
//! 2. `build()` assigns dense [`RuleId`]s, then walks every body and rejects
//!    structural defects: duplicate names, calls to undefined rules, empty
//!    literals, and empty class sets.
//! 3. The resulting [`Grammar`] is immutable; matching borrows it.
//!
//! Defects surface here as [`GrammarError`]s so that a match run can assume
//! every `Call` resolves and every primitive can consume input.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{GrammarError, GrammarResult};
use crate::rule::{ClassMembers, Rule};

/// Dense index of a rule inside one grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(pub(crate) usize);

impl RuleId {
    /// Position of the rule in definition order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Hook that derives a default result from one consumed element.
///
/// When present, primitives (literals, classes, `Any`) produce one result per
/// element they consume; elements mapped to `None` are dropped. When absent,
/// primitives produce no results and values come only from actions.
pub type ElementResultFn<I, R> = Rc<dyn Fn(&I) -> Option<R>>;

/// An immutable set of named rules ready for matching.
pub struct Grammar<I, R> {
    names: Vec<String>,
    ids: HashMap<String, RuleId>,
    bodies: Vec<Rc<Rule<I, R>>>,
    element_result: Option<ElementResultFn<I, R>>,
}

impl<I, R> Grammar<I, R> {
    /// Start collecting rules for a new grammar.
    pub fn builder() -> GrammarBuilder<I, R> {
        GrammarBuilder::new()
    }

    /// Look up a rule by name.
    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.ids.get(name).copied()
    }

    /// Name of a rule, for reporting.
    pub fn rule_name(&self, id: RuleId) -> &str {
        &self.names[id.0]
    }

    /// Number of rules defined.
    pub fn rule_count(&self) -> usize {
        self.names.len()
    }

    /// Rule names in definition order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub(crate) fn body(&self, id: RuleId) -> &Rc<Rule<I, R>> {
        &self.bodies[id.0]
    }

    pub(crate) fn element_result(&self) -> Option<&ElementResultFn<I, R>> {
        self.element_result.as_ref()
    }
}

impl<I, R> std::fmt::Debug for Grammar<I, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar").field("rules", &self.names).finish()
    }
}

/// Collects rule definitions and validates them into a [`Grammar`].
pub struct GrammarBuilder<I, R> {
    rules: Vec<(String, Rule<I, R>)>,
    element_result: Option<ElementResultFn<I, R>>,
}

impl<I, R> GrammarBuilder<I, R> {
    pub fn new() -> Self {
        GrammarBuilder {
            rules: Vec::new(),
            element_result: None,
        }
    }

    /// Define a rule. Definition order fixes [`RuleId`] assignment.
    pub fn rule(mut self, name: &str, body: Rule<I, R>) -> Self {
        self.rules.push((name.to_string(), body));
        self
    }

    /// Install a hook that derives a result from each consumed element.
    pub fn element_result(mut self, hook: impl Fn(&I) -> Option<R> + 'static) -> Self {
        self.element_result = Some(Rc::new(hook));
        self
    }

    /// Validate the collected rules and freeze them into a grammar.
    pub fn build(self) -> GrammarResult<Grammar<I, R>> {
        let mut names = Vec::with_capacity(self.rules.len());
        let mut ids = HashMap::with_capacity(self.rules.len());
        for (index, (name, _)) in self.rules.iter().enumerate() {
            if ids.insert(name.clone(), RuleId(index)).is_some() {
                return Err(GrammarError::DuplicateRule { name: name.clone() });
            }
            names.push(name.clone());
        }

        for (name, body) in &self.rules {
            validate_body(name, body, &ids)?;
        }

        let bodies = self
            .rules
            .into_iter()
            .map(|(_, body)| Rc::new(body))
            .collect();

        Ok(Grammar {
            names,
            ids,
            bodies,
            element_result: self.element_result,
        })
    }
}

impl<I, R> Default for GrammarBuilder<I, R> {
    fn default() -> Self {
        GrammarBuilder::new()
    }
}

impl<I: Clone> GrammarBuilder<I, I> {
    /// Shorthand hook: every consumed element becomes its own result.
    pub fn elements_as_results(self) -> Self {
        self.element_result(|element: &I| Some(element.clone()))
    }
}

fn validate_body<I, R>(
    rule_name: &str,
    body: &Rule<I, R>,
    ids: &HashMap<String, RuleId>,
) -> GrammarResult<()> {
    match body {
        Rule::Literal(elements) => {
            if elements.is_empty() {
                return Err(GrammarError::EmptyLiteral {
                    rule: rule_name.to_string(),
                });
            }
            Ok(())
        }
        Rule::Class(ClassMembers::Set(members)) => {
            if members.is_empty() {
                return Err(GrammarError::EmptyClass {
                    rule: rule_name.to_string(),
                });
            }
            Ok(())
        }
        Rule::Class(ClassMembers::Predicate(_)) | Rule::Any => Ok(()),
        Rule::Call(name) => {
            if !ids.contains_key(name) {
                return Err(GrammarError::UndefinedRule {
                    name: name.clone(),
                    referenced_from: rule_name.to_string(),
                });
            }
            Ok(())
        }
        Rule::Seq(terms) | Rule::Choice(terms) => {
            for term in terms {
                validate_body(rule_name, term, ids)?;
            }
            Ok(())
        }
        Rule::Bind(inner, _)
        | Rule::Action(inner, _)
        | Rule::Not(inner)
        | Rule::Ahead(inner)
        | Rule::Star(inner)
        | Rule::Plus(inner)
        | Rule::Opt(inner)
        | Rule::Cond(inner, _) => validate_body(rule_name, inner, ids),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{call, char_range, choice, class, lit, lit_str, seq, star};

    fn well_formed() -> GrammarResult<Grammar<char, String>> {
        Grammar::builder()
            .rule(
                "Expression",
                choice(vec![
                    seq(vec![call("Digit"), lit_str("-"), call("Expression")]),
                    call("Digit"),
                ]),
            )
            .rule("Digit", char_range('0', '9'))
            .build()
    }

    #[test]
    fn test_build_accepts_well_formed_grammar() {
        let grammar = well_formed().unwrap();
        assert_eq!(grammar.rule_count(), 2);
        assert_eq!(grammar.rule_id("Expression"), Some(RuleId(0)));
        assert_eq!(grammar.rule_id("Digit"), Some(RuleId(1)));
        assert_eq!(grammar.rule_name(RuleId(1)), "Digit");
        assert_eq!(grammar.rule_id("Missing"), None);
    }

    #[test]
    fn test_rule_names_in_definition_order() {
        let grammar = well_formed().unwrap();
        let names: Vec<&str> = grammar.rule_names().collect();
        assert_eq!(names, vec!["Expression", "Digit"]);
    }

    #[test]
    fn test_build_rejects_duplicate_rule() {
        let result: GrammarResult<Grammar<char, String>> = Grammar::builder()
            .rule("Digit", char_range('0', '9'))
            .rule("Digit", char_range('0', '4'))
            .build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::DuplicateRule {
                name: "Digit".to_string()
            }
        );
    }

    #[test]
    fn test_build_rejects_undefined_call() {
        let result: GrammarResult<Grammar<char, String>> = Grammar::builder()
            .rule("Top", seq(vec![lit_str("x"), call("Missing")]))
            .build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::UndefinedRule {
                name: "Missing".to_string(),
                referenced_from: "Top".to_string(),
            }
        );
    }

    #[test]
    fn test_build_rejects_empty_literal() {
        let result: GrammarResult<Grammar<char, String>> =
            Grammar::builder().rule("Empty", lit(Vec::new())).build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::EmptyLiteral {
                rule: "Empty".to_string()
            }
        );
    }

    #[test]
    fn test_build_rejects_empty_class_set() {
        let result: GrammarResult<Grammar<char, String>> =
            Grammar::builder().rule("Never", class(Vec::new())).build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::EmptyClass {
                rule: "Never".to_string()
            }
        );
    }

    #[test]
    fn test_build_rejects_inverted_char_range() {
        let result: GrammarResult<Grammar<char, String>> =
            Grammar::builder().rule("Backwards", char_range('z', 'a')).build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::EmptyClass {
                rule: "Backwards".to_string()
            }
        );
    }

    #[test]
    fn test_validation_reaches_nested_terms() {
        let result: GrammarResult<Grammar<char, String>> = Grammar::builder()
            .rule(
                "Top",
                star(choice(vec![
                    lit_str("a"),
                    seq(vec![lit_str("b"), call("Gone")]),
                ])),
            )
            .build();
        assert_eq!(
            result.unwrap_err(),
            GrammarError::UndefinedRule {
                name: "Gone".to_string(),
                referenced_from: "Top".to_string(),
            }
        );
    }

    #[test]
    fn test_defect_reported_before_any_match() {
        // The defective rule is unreachable from the start rule, and the
        // grammar is still rejected.
        let result: GrammarResult<Grammar<char, String>> = Grammar::builder()
            .rule("Start", lit_str("ok"))
            .rule("Orphan", class(Vec::new()))
            .build();
        assert!(result.is_err(), "Should reject defects in unreachable rules");
    }
}
