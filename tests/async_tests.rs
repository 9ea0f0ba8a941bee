//! Escalation from the synchronous engine to the asynchronous one when a
//! deferred assertion needs to await a pending computation.

use futures::executor::block_on;
use futures::FutureExt;
use pretty_assertions::assert_eq;

use treematch::simple::{element, text, SimpleAdapter, SimpleNode};
use treematch::{
    contains, default_equal, diff_elements, Assertion, AssertionError, AssertionOutcome,
    AttributeDiff, DiffNode, DiffOptions, DiffTag, Value, WeightTable,
};

fn deferred_assertion(
    label: &str,
    outcome: std::result::Result<(), AssertionError>,
) -> Assertion {
    Assertion::new(label, move |_| {
        let outcome = outcome.clone();
        AssertionOutcome::Deferred(async move { outcome }.boxed_local())
    })
}

#[test]
fn deferred_passing_assertion_defers_then_matches() {
    let actual = element("div").child(text("foo"));
    let expected = element("div").child(SimpleNode::Text(Value::Assertion(deferred_assertion(
        "is foo",
        Ok(()),
    ))));

    let options = DiffOptions::default();
    let eventual = diff_elements(
        &SimpleAdapter,
        &SimpleAdapter,
        &actual,
        &expected,
        &default_equal,
        &options,
    )
    .expect("options are valid");
    assert!(!eventual.is_ready());

    let report = block_on(eventual.resolve()).expect("deferred diff resolves");
    assert_eq!(report.weight.real(), 0.0);
    assert!(report.diff.diff().is_none());
    for child in report.diff.children() {
        assert!(child.diff().is_none());
    }
}

#[test]
fn deferred_failing_assertion_reports_a_custom_diff() {
    let actual = element("div").child(text("foo"));
    let expected = element("div").child(SimpleNode::Text(Value::Assertion(deferred_assertion(
        "is bar",
        Err(AssertionError::new("expected 'foo' to equal 'bar'")),
    ))));

    let options = DiffOptions::default();
    let eventual = diff_elements(
        &SimpleAdapter,
        &SimpleAdapter,
        &actual,
        &expected,
        &default_equal,
        &options,
    )
    .expect("options are valid");
    let report = block_on(eventual.resolve()).expect("deferred diff resolves");

    let w = WeightTable::default();
    assert_eq!(report.weight.real(), w.string_content_mismatch);

    let DiffNode::Element(el) = &report.diff else {
        panic!("expected an element diff");
    };
    let Some(DiffTag::Custom { error, .. }) = el.children[0].diff() else {
        panic!("expected a custom diff tag, got {:?}", el.children[0].diff());
    };
    assert_eq!(error.message, "expected 'foo' to equal 'bar'");
}

#[test]
fn deferred_attribute_assertion_is_awaited() {
    let actual = element("div").attr("id", "foo");
    let expected = element("div").attr(
        "id",
        deferred_assertion("matches /bar/", Err(AssertionError::new("no match"))),
    );

    let options = DiffOptions::default();
    let eventual = diff_elements(
        &SimpleAdapter,
        &SimpleAdapter,
        &actual,
        &expected,
        &default_equal,
        &options,
    )
    .expect("options are valid");
    assert!(!eventual.is_ready());

    let report = block_on(eventual.resolve()).expect("deferred diff resolves");
    let w = WeightTable::default();
    assert_eq!(report.weight.real(), w.attribute_mismatch);

    let DiffNode::Element(el) = &report.diff else {
        panic!("expected an element diff");
    };
    let Some(AttributeDiff::Custom { error, .. }) = &el.attributes[0].diff else {
        panic!("expected a custom attribute diff");
    };
    assert_eq!(error.message, "no match");
}

#[test]
fn deferred_result_matches_the_synchronous_shape() {
    let actual = element("div").child(text("foo"));
    let sync_expected = element("div").child(SimpleNode::Text(Value::Assertion(
        Assertion::from_predicate("is bar", |_| Err(AssertionError::new("nope"))),
    )));
    let deferred_expected = element("div").child(SimpleNode::Text(Value::Assertion(
        deferred_assertion("is bar", Err(AssertionError::new("nope"))),
    )));

    let sync_report = diff_elements(
        &SimpleAdapter,
        &SimpleAdapter,
        &actual,
        &sync_expected,
        &default_equal,
        &DiffOptions::default(),
    )
    .expect("options are valid")
    .into_ready()
    .expect("synchronous assertion stays synchronous");

    let options = DiffOptions::default();
    let eventual = diff_elements(
        &SimpleAdapter,
        &SimpleAdapter,
        &actual,
        &deferred_expected,
        &default_equal,
        &options,
    )
    .expect("options are valid");
    let deferred_report = block_on(eventual.resolve()).expect("deferred diff resolves");

    assert_eq!(sync_report.weight, deferred_report.weight);
    let sync_tag = sync_report.diff.children()[0].diff().unwrap();
    let deferred_tag = deferred_report.diff.children()[0].diff().unwrap();
    match (sync_tag, deferred_tag) {
        (DiffTag::Custom { error: a, .. }, DiffTag::Custom { error: b, .. }) => {
            assert_eq!(a, b)
        }
        other => panic!("expected custom tags on both sides, got {other:?}"),
    }
}

#[test]
fn containment_search_escalates_as_a_whole() {
    let haystack = element("body")
        .child(element("div").child(text("no")))
        .child(element("div").child(text("yes")));
    let needle = element("div").child(SimpleNode::Text(Value::Assertion(Assertion::new(
        "is yes",
        |subject| {
            let passes = matches!(
                subject,
                treematch::AssertionSubject::Value(Value::String(s)) if s == "yes"
            );
            AssertionOutcome::Deferred(
                async move {
                    if passes {
                        Ok(())
                    } else {
                        Err(AssertionError::new("expected 'yes'"))
                    }
                }
                .boxed_local(),
            )
        },
    ))));

    let options = DiffOptions::default();
    let eventual = contains(
        &SimpleAdapter,
        &SimpleAdapter,
        &haystack,
        &needle,
        &default_equal,
        &options,
    )
    .expect("options are valid");
    assert!(!eventual.is_ready());

    let result = block_on(eventual.resolve()).expect("deferred search resolves");
    assert!(result.found);
    assert!(result.best_match.is_none());
}
