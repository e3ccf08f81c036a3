//! Grammar defect errors
//!
//! A grammar that cannot possibly run correctly is rejected when it is built,
//! before any input is matched. An input that merely fails to match is never
//! an error: the match API reports it as an absent item.

use std::fmt;

/// A structural defect in a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A rule body calls a name no rule defines.
    UndefinedRule {
        name: String,
        referenced_from: String,
    },
    /// Two rules share one name.
    DuplicateRule { name: String },
    /// A literal with no elements; it would match everywhere for free.
    EmptyLiteral { rule: String },
    /// An input class with an empty member set; it could never match.
    EmptyClass { rule: String },
    /// A match was requested from a start rule the grammar does not define.
    UnknownStartRule { name: String },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::UndefinedRule {
                name,
                referenced_from,
            } => {
                write!(
                    f,
                    "Rule '{}' is referenced from '{}' but never defined",
                    name, referenced_from
                )
            }
            GrammarError::DuplicateRule { name } => {
                write!(f, "Rule '{}' is defined more than once", name)
            }
            GrammarError::EmptyLiteral { rule } => {
                write!(f, "Rule '{}' contains a literal with no elements", rule)
            }
            GrammarError::EmptyClass { rule } => {
                write!(
                    f,
                    "Rule '{}' contains an input class with an empty member set",
                    rule
                )
            }
            GrammarError::UnknownStartRule { name } => {
                write!(f, "Start rule '{}' is not defined in the grammar", name)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// Result alias for grammar construction and match entry points.
pub type GrammarResult<T> = Result<T, GrammarError>;
