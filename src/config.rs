//! Matcher configuration
//!
//! Plain data with `with_*` builders. The defaults run every feature: left
//! recursion is resolved by seed growing with no pass limit.

/// Knobs for one matcher instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Resolve left recursion by growing a seed. When off, a left-recursive
    /// re-entry fails like any other miss instead of growing.
    pub left_recursion: bool,
    /// Cap on growth passes per invocation. `None` grows to the fixed point.
    pub growth_limit: Option<usize>,
}

impl MatcherConfig {
    pub fn new() -> Self {
        MatcherConfig {
            left_recursion: true,
            growth_limit: None,
        }
    }

    pub fn with_left_recursion(mut self, enabled: bool) -> Self {
        self.left_recursion = enabled;
        self
    }

    pub fn with_growth_limit(mut self, limit: Option<usize>) -> Self {
        self.growth_limit = limit;
        self
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig::new()
    }
}
