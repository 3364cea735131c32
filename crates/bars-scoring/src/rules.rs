//! Ordered first-match decision tables.
//!
//! Every scoring step is expressed as a [`DecisionTable`]: an ordered list of
//! named rules, each pairing a predicate with the grade it assigns. Evaluation
//! walks the rules in order and stops at the first predicate that holds, so a
//! later rule can never override an earlier match. When no rule matches, the
//! table's fallback applies (undefined for every table in this crate).

use bars_model::ResponseGrade;

/// A single `(predicate, grade)` row of a decision table.
#[derive(Debug, Clone, Copy)]
pub struct Rule<I> {
    /// Stable identifier used in logs and tests.
    pub name: &'static str,
    pub applies: fn(&I) -> bool,
    pub grade: ResponseGrade,
}

/// Result of evaluating a decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub grade: Option<ResponseGrade>,
    /// Name of the rule that fired, or the table's fallback name.
    pub rule: &'static str,
}

/// Ordered rules plus the fallback used when none of them match.
#[derive(Debug, Clone, Copy)]
pub struct DecisionTable<I: 'static> {
    pub name: &'static str,
    pub rules: &'static [Rule<I>],
    pub fallback: Option<ResponseGrade>,
    pub fallback_name: &'static str,
}

impl<I: 'static> DecisionTable<I> {
    pub fn evaluate(&self, input: &I) -> Verdict {
        self.rules
            .iter()
            .find(|rule| (rule.applies)(input))
            .map_or(
                Verdict {
                    grade: self.fallback,
                    rule: self.fallback_name,
                },
                |rule| Verdict {
                    grade: Some(rule.grade),
                    rule: rule.name,
                },
            )
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_positive(value: &i32) -> bool {
        *value > 0
    }

    fn is_large(value: &i32) -> bool {
        *value > 10
    }

    const TABLE: DecisionTable<i32> = DecisionTable {
        name: "sample",
        rules: &[
            Rule {
                name: "positive",
                applies: is_positive,
                grade: ResponseGrade::Partial,
            },
            Rule {
                name: "large",
                applies: is_large,
                grade: ResponseGrade::Good,
            },
        ],
        fallback: None,
        fallback_name: "none",
    };

    #[test]
    fn first_matching_rule_wins() {
        let verdict = TABLE.evaluate(&50);
        assert_eq!(verdict.rule, "positive");
        assert_eq!(verdict.grade, Some(ResponseGrade::Partial));
    }

    #[test]
    fn fallback_applies_without_match() {
        let verdict = TABLE.evaluate(&-1);
        assert_eq!(verdict.rule, "none");
        assert_eq!(verdict.grade, None);
    }

    #[test]
    fn lists_rules_in_order() {
        assert_eq!(TABLE.rule_names(), vec!["positive", "large"]);
    }
}
