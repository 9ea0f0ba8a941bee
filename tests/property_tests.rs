//! Randomized invariants over generated simple trees.

use proptest::prelude::*;

use treematch::simple::{element, text, SimpleAdapter, SimpleNode};
use treematch::{default_equal, diff_elements, DiffNode, DiffOptions, DiffReport};

fn arb_tree() -> impl Strategy<Value = SimpleNode> {
    let leaf = "[a-d]{0,3}".prop_map(|s| text(s.as_str()));
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            "[a-d]{1,2}",
            // btree_map keeps attribute names unique per element
            proptest::collection::btree_map("[a-c]{1,2}", "[a-d]{0,2}", 0..3),
            proptest::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, attributes, children)| {
                let mut node = element(&name);
                for (attr_name, attr_value) in attributes {
                    node = node.attr(&attr_name, attr_value.as_str());
                }
                node.children(children)
            })
    })
}

fn diff(actual: &SimpleNode, expected: &SimpleNode, options: &DiffOptions) -> DiffReport {
    diff_elements(
        &SimpleAdapter,
        &SimpleAdapter,
        actual,
        expected,
        &default_equal,
        options,
    )
    .expect("options are valid")
    .into_ready()
    .expect("generated trees contain no assertions")
}

fn is_clean(node: &DiffNode) -> bool {
    if node.diff().is_some() {
        return false;
    }
    if let DiffNode::Element(el) = node {
        if el.attributes.iter().any(|a| a.diff.is_some()) {
            return false;
        }
    }
    node.children().iter().all(is_clean)
}

proptest! {
    #[test]
    fn identical_trees_diff_clean(tree in arb_tree()) {
        let report = diff(&tree, &tree, &DiffOptions::default());
        prop_assert_eq!(report.weight.total(), 0.0);
        prop_assert_eq!(report.weight.real(), 0.0);
        prop_assert!(is_clean(&report.diff));
    }

    #[test]
    fn default_weights_keep_real_within_total(actual in arb_tree(), expected in arb_tree()) {
        let report = diff(&actual, &expected, &DiffOptions::default());
        prop_assert!(report.weight.real() <= report.weight.total());
        prop_assert!(report.weight.real() >= 0.0);
    }

    #[test]
    fn flags_never_change_structural_equality(actual in arb_tree(), expected in arb_tree()) {
        let muted = DiffOptions {
            diff_extra_attributes: false,
            diff_removed_attributes: false,
            diff_extra_children: false,
            diff_missing_children: false,
            diff_wrappers: false,
            ..DiffOptions::default()
        };
        let strict = diff(&actual, &expected, &DiffOptions::default());
        let relaxed = diff(&actual, &expected, &muted);
        prop_assert_eq!(strict.weight.total() == 0.0, relaxed.weight.total() == 0.0);
    }

    #[test]
    fn muting_flags_only_lowers_the_real_weight(actual in arb_tree(), expected in arb_tree()) {
        let muted = DiffOptions {
            diff_extra_attributes: false,
            diff_removed_attributes: false,
            ..DiffOptions::default()
        };
        let strict = diff(&actual, &expected, &DiffOptions::default());
        let relaxed = diff(&actual, &expected, &muted);
        prop_assert!(relaxed.weight.real() <= strict.weight.real());
    }
}
