//! Pure comparison decisions shared by the synchronous and asynchronous
//! engines: leaf classification and class-token set comparison. Keeping
//! these here guarantees both engines report identical diffs.

use crate::options::DiffOptions;
use crate::types::{AttributeDiff, Value, ValueEq};

/// How two leaf values relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafComparison {
    Equal,
    /// Unequal values with identical textual renderings (a type-only
    /// mismatch, e.g. the number 1 vs the string "1").
    TextEqual,
    Different,
}

pub fn compare_leaves(actual: &Value, expected: &Value, equal: ValueEq<'_>) -> LeafComparison {
    if equal(actual, expected) {
        LeafComparison::Equal
    } else if actual.text() == expected.text() {
        LeafComparison::TextEqual
    } else {
        LeafComparison::Different
    }
}

/// Diff for a present actual attribute against a plain (non-assertion)
/// expected value. Returns the attribute diff to attach, or `None` when the
/// values count as equal; the caller charges `attribute_mismatch` for any
/// `Some`.
///
/// When the attribute is the adapter's class attribute, both sides are
/// strings, and exact class comparison is off, the values are compared as
/// space-separated token sets and only the flag-selected missing/extra
/// subsets are reported.
pub fn changed_attribute_diff(
    attr_name: &str,
    actual: &Value,
    expected: &Value,
    equal: ValueEq<'_>,
    options: &DiffOptions,
    class_attribute: Option<&str>,
) -> Option<AttributeDiff> {
    if !options.diff_exact_classes && class_attribute == Some(attr_name) {
        if let (Some(actual_classes), Some(expected_classes)) = (actual.as_str(), expected.as_str())
        {
            return class_token_diff(actual_classes, expected_classes, options);
        }
    }

    if equal(actual, expected) {
        None
    } else {
        Some(AttributeDiff::Changed {
            expected: expected.clone(),
        })
    }
}

fn class_token_diff(actual: &str, expected: &str, options: &DiffOptions) -> Option<AttributeDiff> {
    let actual_tokens: Vec<&str> = actual.split_whitespace().collect();
    let expected_tokens: Vec<&str> = expected.split_whitespace().collect();

    let missing = if options.diff_missing_classes {
        let tokens: Vec<&str> = expected_tokens
            .iter()
            .filter(|token| !actual_tokens.contains(token))
            .copied()
            .collect();
        (!tokens.is_empty()).then(|| tokens.join(" "))
    } else {
        None
    };

    let extra = if options.diff_extra_classes {
        let tokens: Vec<&str> = actual_tokens
            .iter()
            .filter(|token| !expected_tokens.contains(token))
            .copied()
            .collect();
        (!tokens.is_empty()).then(|| tokens.join(" "))
    } else {
        None
    };

    if missing.is_none() && extra.is_none() {
        return None;
    }
    Some(AttributeDiff::Classes { missing, extra })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::default_equal;

    #[test]
    fn equal_leaves() {
        assert_eq!(
            compare_leaves(&Value::from("a"), &Value::from("a"), &default_equal),
            LeafComparison::Equal
        );
    }

    #[test]
    fn number_vs_string_with_same_text_is_type_only() {
        assert_eq!(
            compare_leaves(&Value::from(1.0), &Value::from("1"), &default_equal),
            LeafComparison::TextEqual
        );
    }

    #[test]
    fn different_text_is_a_content_mismatch() {
        assert_eq!(
            compare_leaves(&Value::from("abc"), &Value::from("def"), &default_equal),
            LeafComparison::Different
        );
    }

    #[test]
    fn class_tokens_report_missing_and_extra_subsets() {
        let options = DiffOptions {
            diff_exact_classes: false,
            ..DiffOptions::default()
        };
        let diff = changed_attribute_diff(
            "class",
            &Value::from("one two"),
            &Value::from("two three"),
            &default_equal,
            &options,
            Some("class"),
        );
        assert_eq!(
            diff,
            Some(AttributeDiff::Classes {
                missing: Some("three".to_string()),
                extra: Some("one".to_string()),
            })
        );
    }

    #[test]
    fn reordered_class_tokens_count_as_equal() {
        let options = DiffOptions {
            diff_exact_classes: false,
            ..DiffOptions::default()
        };
        let diff = changed_attribute_diff(
            "class",
            &Value::from("a b"),
            &Value::from("b a"),
            &default_equal,
            &options,
            Some("class"),
        );
        assert_eq!(diff, None);
    }

    #[test]
    fn exact_class_comparison_uses_plain_equality() {
        let diff = changed_attribute_diff(
            "class",
            &Value::from("a b"),
            &Value::from("b a"),
            &default_equal,
            &DiffOptions::default(),
            Some("class"),
        );
        assert_eq!(
            diff,
            Some(AttributeDiff::Changed {
                expected: Value::from("b a")
            })
        );
    }
}
