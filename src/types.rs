//! Core data types: leaf values, deferred assertions, and the annotated
//! diff-result tree consumed by renderers.

use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::weight::Weight;

/// Equality predicate for leaf and attribute values, supplied by the caller.
pub type ValueEq<'a> = &'a dyn Fn(&Value, &Value) -> bool;

/// Default equality: structural comparison of [`Value`]s.
pub fn default_equal(a: &Value, b: &Value) -> bool {
    a == b
}

/// An opaque comparable leaf or attribute value.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
    /// A deferred assertion standing in for a literal expected value.
    Assertion(Assertion),
}

impl Value {
    /// Textual rendering, following host-language string coercion rules:
    /// whole numbers print without a fraction, so `Number(1.0)` and
    /// `String("1")` render identically. Used to downgrade a value mismatch
    /// to a type-only mismatch when the renderings agree.
    pub fn text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Assertion(a) => a.label().to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Assertion(a), Value::Assertion(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Assertion> for Value {
    fn from(a: Assertion) -> Self {
        Value::Assertion(a)
    }
}

/// What a deferred assertion is invoked against.
#[derive(Debug, Clone, PartialEq)]
pub enum AssertionSubject {
    /// A leaf content value or an attribute value.
    Value(Value),
    /// The rendered actual element, when the assertion stands in for a
    /// whole subtree.
    Element(Box<DiffNode>),
}

/// Failure reported by a deferred assertion. Carried verbatim into the
/// output tree as a `custom` diff tag; never surfaced as a crate error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertionError {
    pub message: String,
}

impl AssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of invoking a deferred assertion.
pub enum AssertionOutcome {
    Pass,
    Fail(AssertionError),
    /// The predicate needs to wait on a pending computation. The synchronous
    /// engine escalates to the asynchronous engine on seeing this; the
    /// asynchronous engine awaits the future.
    Deferred(LocalBoxFuture<'static, std::result::Result<(), AssertionError>>),
}

/// A caller-supplied predicate used in place of a literal expected value.
///
/// Cloning shares the underlying predicate; equality is handle identity.
/// The label is used wherever the assertion must be rendered.
#[derive(Clone)]
pub struct Assertion {
    label: String,
    check: Rc<dyn Fn(&AssertionSubject) -> AssertionOutcome>,
}

impl Assertion {
    pub fn new<F>(label: impl Into<String>, check: F) -> Self
    where
        F: Fn(&AssertionSubject) -> AssertionOutcome + 'static,
    {
        Self {
            label: label.into(),
            check: Rc::new(check),
        }
    }

    /// Convenience constructor for predicates that always settle
    /// synchronously.
    pub fn from_predicate<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&AssertionSubject) -> std::result::Result<(), AssertionError> + 'static,
    {
        Self::new(label, move |subject| match predicate(subject) {
            Ok(()) => AssertionOutcome::Pass,
            Err(error) => AssertionOutcome::Fail(error),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn check(&self, subject: &AssertionSubject) -> AssertionOutcome {
        (self.check)(subject)
    }
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Assertion {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.check, &other.check)
    }
}

impl Serialize for Assertion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

/// A node of the annotated diff tree. Mirrors the input shape, with an
/// optional diff descriptor at each element/content node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DiffNode {
    #[serde(rename = "ELEMENT")]
    Element(ElementNode),
    #[serde(rename = "CONTENT")]
    Content(ContentNode),
    /// An elided pass-through layer, emitted only when wrapper annotation is
    /// suppressed (`diff_wrappers` off). Carries no diff tag itself; its
    /// children may.
    #[serde(rename = "WRAPPERELEMENT")]
    Wrapper(WrapperNode),
}

impl DiffNode {
    /// The diff tag at this node, if any. Wrapper nodes never carry one.
    pub fn diff(&self) -> Option<&DiffTag> {
        match self {
            DiffNode::Element(el) => el.diff.as_ref(),
            DiffNode::Content(content) => content.diff.as_ref(),
            DiffNode::Wrapper(_) => None,
        }
    }

    pub fn children(&self) -> &[DiffNode] {
        match self {
            DiffNode::Element(el) => &el.children,
            DiffNode::Content(_) => &[],
            DiffNode::Wrapper(wrapper) => &wrapper.children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementNode {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<DiffNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentNode {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrapperNode {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<DiffNode>,
}

/// Diff descriptor for an element or content node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DiffTag {
    /// Present in expected, absent from actual.
    Missing,
    /// Present in actual, absent from expected.
    Extra,
    /// Leaf content differs from the expected value.
    Changed {
        #[serde(rename = "expectedValue")]
        expected: Value,
    },
    /// Element names differ.
    #[serde(rename_all = "camelCase")]
    DifferentElement { expected_name: String },
    /// This element is an elidable pass-through layer.
    Wrapper,
    /// Actual is a leaf where expected is an element; carries the full
    /// rendering of the expected side.
    #[serde(rename_all = "camelCase")]
    ContentElementMismatch { expected: Box<DiffNode> },
    /// Actual is an element where expected is a leaf.
    #[serde(rename_all = "camelCase")]
    ElementContentMismatch { expected: Box<DiffNode> },
    /// A deferred assertion rejected the actual value.
    #[serde(rename_all = "camelCase")]
    Custom {
        assertion: Assertion,
        error: AssertionError,
    },
}

/// One attribute of the annotated output. `value` is the actual value, or
/// `None` for an attribute that exists only on the expected side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<AttributeDiff>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AttributeDiff {
    Missing {
        #[serde(rename = "expectedValue")]
        expected: Value,
    },
    Extra,
    Changed {
        #[serde(rename = "expectedValue")]
        expected: Value,
    },
    #[serde(rename_all = "camelCase")]
    Custom {
        assertion: Assertion,
        error: AssertionError,
    },
    /// Class-list comparison: the value is treated as a space-separated
    /// token set, reporting missing/extra token subsets instead of a
    /// whole-value replacement.
    #[serde(rename = "class", rename_all = "camelCase")]
    Classes {
        #[serde(skip_serializing_if = "Option::is_none")]
        missing: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        extra: Option<String>,
    },
}

/// Result of a top-level element diff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffReport {
    pub diff: DiffNode,
    pub weight: Weight,
}

/// Result of a containment search.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainsResult<N> {
    pub found: bool,
    /// The closest candidate when no exact match was found.
    pub best_match: Option<ContainsMatch<N>>,
}

/// The lowest-weight candidate encountered during a containment search.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainsMatch<N> {
    pub diff: DiffNode,
    pub weight: Weight,
    pub node: N,
}

impl<N> Serialize for ContainsResult<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ContainsResult", 2)?;
        state.serialize_field("found", &self.found)?;
        state.serialize_field("bestMatch", &self.best_match.as_ref().map(|m| &m.diff))?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_text_drops_whole_fractions() {
        assert_eq!(Value::Number(1.0).text(), "1");
        assert_eq!(Value::Number(1.5).text(), "1.5");
        assert_eq!(Value::Number(-3.0).text(), "-3");
    }

    #[test]
    fn string_and_number_with_same_text_are_not_equal() {
        assert_ne!(Value::from("1"), Value::from(1.0));
        assert_eq!(Value::from("1").text(), Value::from(1.0).text());
    }

    #[test]
    fn assertions_compare_by_identity() {
        let a = Assertion::from_predicate("is ok", |_| Ok(()));
        let b = a.clone();
        let c = Assertion::from_predicate("is ok", |_| Ok(()));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn assertion_serializes_as_label() {
        let a = Assertion::from_predicate("expect.it(to match /x/)", |_| Ok(()));
        let json = serde_json::to_string(&Value::Assertion(a)).unwrap();
        assert_eq!(json, "\"expect.it(to match /x/)\"");
    }
}
