//! The asynchronous comparator family.
//!
//! Mirrors the synchronous engine operation for operation, but every step
//! returns a future and deferred assertion results are awaited instead of
//! escalating. The penalty table, alignment, class-token logic, and
//! rendering are shared with `sync_diff` through `common`, `align`, and
//! `render`, so the assembled diff tree is identical in shape and order to
//! what the synchronous engine would have produced.
//!
//! Recursion is expressed with boxed local futures; the engine is
//! single-threaded and futures are polled in sibling order, keeping the
//! output deterministic.

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::adapter::{NodeKind, TreeAdapter};
use crate::align::{align, AlignOp, PairTable};
use crate::common::{changed_attribute_diff, compare_leaves, LeafComparison};
use crate::error::Result;
use crate::options::DiffOptions;
use crate::render::{element_shell, node_to_diff, set_diff_tag};
use crate::sync_diff::{ChildOutcome, Compared};
use crate::types::{
    Assertion, AssertionOutcome, AssertionSubject, Attribute, AttributeDiff, ContentNode,
    DiffNode, DiffTag, ElementNode, Value, ValueEq, WrapperNode,
};
use crate::weight::Weight;

pub struct AsyncEngine<'a, A: TreeAdapter, E: TreeAdapter> {
    pub actual_adapter: &'a A,
    pub expected_adapter: &'a E,
    pub equal: ValueEq<'a>,
    pub options: &'a DiffOptions,
}

impl<'a, A: TreeAdapter, E: TreeAdapter> AsyncEngine<'a, A, E> {
    pub fn new(
        actual_adapter: &'a A,
        expected_adapter: &'a E,
        equal: ValueEq<'a>,
        options: &'a DiffOptions,
    ) -> Self {
        Self {
            actual_adapter,
            expected_adapter,
            equal,
            options,
        }
    }

    pub fn diff_element_or_wrapper<'s>(
        &'s self,
        actual: &'s A::Node,
        expected: &'s E::Node,
    ) -> LocalBoxFuture<'s, Result<Compared>> {
        async move {
            let direct = self.diff_element(actual, expected).await?;

            if direct.weight.real() == 0.0 {
                return Ok(direct);
            }
            if !matches!(self.actual_adapter.classify(actual), NodeKind::Element) {
                return Ok(direct);
            }
            let actual_children = self.actual_adapter.children(actual);
            if actual_children.len() != 1 {
                return Ok(direct);
            }

            let unwrapped = self
                .diff_element_or_wrapper(&actual_children[0], expected)
                .await?;
            let w = &self.options.weights;
            let wrapper_penalty = if self.options.diff_wrappers {
                w.wrapper_removed
            } else {
                0.0
            };
            if wrapper_penalty + unwrapped.weight.real() >= direct.weight.real() {
                return Ok(direct);
            }

            let mut weight = unwrapped.weight;
            weight.add_total(w.wrapper_removed)?;
            let mut shell = element_shell(self.actual_adapter, actual);
            shell.children = vec![unwrapped.diff];
            let diff = if self.options.diff_wrappers {
                weight.add_real(w.wrapper_removed)?;
                shell.diff = Some(DiffTag::Wrapper);
                DiffNode::Element(shell)
            } else {
                DiffNode::Wrapper(WrapperNode {
                    name: shell.name,
                    attributes: shell.attributes,
                    children: shell.children,
                })
            };
            Ok(Compared { diff, weight })
        }
        .boxed_local()
    }

    fn diff_element<'s>(
        &'s self,
        actual: &'s A::Node,
        expected: &'s E::Node,
    ) -> LocalBoxFuture<'s, Result<Compared>> {
        async move {
            let w = &self.options.weights;
            let actual_kind = self.actual_adapter.classify(actual);
            let expected_kind = self.expected_adapter.classify(expected);

            if let NodeKind::Leaf(Value::Assertion(assertion)) = &expected_kind {
                return self
                    .check_content_assertion(actual, &actual_kind, assertion)
                    .await;
            }

            let mut weight = Weight::new();
            match (&actual_kind, &expected_kind) {
                (NodeKind::Leaf(actual_value), NodeKind::Leaf(expected_value)) => {
                    let mut node = ContentNode {
                        value: actual_value.clone(),
                        diff: None,
                    };
                    match compare_leaves(actual_value, expected_value, self.equal) {
                        LeafComparison::Equal => {}
                        LeafComparison::TextEqual => {
                            weight.add(w.content_type_mismatch)?;
                            node.diff = Some(DiffTag::Changed {
                                expected: expected_value.clone(),
                            });
                        }
                        LeafComparison::Different => {
                            weight.add(w.string_content_mismatch)?;
                            node.diff = Some(DiffTag::Changed {
                                expected: expected_value.clone(),
                            });
                        }
                    }
                    Ok(Compared {
                        diff: DiffNode::Content(node),
                        weight,
                    })
                }

                (NodeKind::Leaf(actual_value), NodeKind::Element) => {
                    weight.add(w.native_nonnative_mismatch)?;
                    Ok(Compared {
                        diff: DiffNode::Content(ContentNode {
                            value: actual_value.clone(),
                            diff: Some(DiffTag::ContentElementMismatch {
                                expected: Box::new(node_to_diff(
                                    self.expected_adapter,
                                    expected,
                                    true,
                                )),
                            }),
                        }),
                        weight,
                    })
                }

                (NodeKind::Element, NodeKind::Leaf(expected_value)) => {
                    weight.add(w.native_nonnative_mismatch)?;
                    let mut node = node_to_diff(self.actual_adapter, actual, true);
                    set_diff_tag(
                        &mut node,
                        DiffTag::ElementContentMismatch {
                            expected: Box::new(DiffNode::Content(ContentNode {
                                value: expected_value.clone(),
                                diff: None,
                            })),
                        },
                    );
                    Ok(Compared { diff: node, weight })
                }

                (NodeKind::Element, NodeKind::Element) => {
                    let actual_name = self.actual_adapter.name(actual);
                    let expected_name = self.expected_adapter.name(expected);
                    let mut diff = None;
                    if actual_name != expected_name {
                        weight.add(w.name_mismatch)?;
                        diff = Some(DiffTag::DifferentElement { expected_name });
                    }

                    let (attributes, attribute_weight) = self
                        .diff_attributes(
                            &self.actual_adapter.attributes(actual),
                            &self.expected_adapter.attributes(expected),
                        )
                        .await?;
                    weight.merge(&attribute_weight);

                    let actual_children = self.actual_adapter.children(actual);
                    let expected_children = self.expected_adapter.children(expected);
                    let (children, content_weight) = self
                        .diff_content(&actual_children, &expected_children)
                        .await?;
                    weight.merge(&content_weight);

                    Ok(Compared {
                        diff: DiffNode::Element(ElementNode {
                            name: actual_name,
                            attributes,
                            children,
                            diff,
                        }),
                        weight,
                    })
                }
            }
        }
        .boxed_local()
    }

    async fn check_content_assertion(
        &self,
        actual: &A::Node,
        actual_kind: &NodeKind,
        assertion: &Assertion,
    ) -> Result<Compared> {
        let subject = match actual_kind {
            NodeKind::Leaf(value) => AssertionSubject::Value(value.clone()),
            NodeKind::Element => AssertionSubject::Element(Box::new(node_to_diff(
                self.actual_adapter,
                actual,
                true,
            ))),
        };
        let outcome = match assertion.check(&subject) {
            AssertionOutcome::Deferred(pending) => pending.await,
            AssertionOutcome::Fail(error) => Err(error),
            AssertionOutcome::Pass => Ok(()),
        };
        let mut weight = Weight::new();
        let mut node = match actual_kind {
            NodeKind::Leaf(value) => DiffNode::Content(ContentNode {
                value: value.clone(),
                diff: None,
            }),
            NodeKind::Element => node_to_diff(self.actual_adapter, actual, true),
        };
        if let Err(error) = outcome {
            weight.add(self.options.weights.string_content_mismatch)?;
            set_diff_tag(
                &mut node,
                DiffTag::Custom {
                    assertion: assertion.clone(),
                    error,
                },
            );
        }
        Ok(Compared { diff: node, weight })
    }

    async fn diff_attributes(
        &self,
        actual_attributes: &[(String, Value)],
        expected_attributes: &[(String, Value)],
    ) -> Result<(Vec<Attribute>, Weight)> {
        let w = &self.options.weights;
        let class_attribute = self.actual_adapter.class_attribute_name();
        let mut weight = Weight::new();
        let mut out = Vec::with_capacity(actual_attributes.len());

        for (name, value) in actual_attributes {
            let mut attribute = Attribute {
                name: name.clone(),
                value: Some(value.clone()),
                diff: None,
            };
            match expected_attributes.iter().find(|(n, _)| n == name) {
                Some((_, Value::Assertion(assertion))) => {
                    let outcome = match assertion.check(&AssertionSubject::Value(value.clone())) {
                        AssertionOutcome::Deferred(pending) => pending.await,
                        AssertionOutcome::Fail(error) => Err(error),
                        AssertionOutcome::Pass => Ok(()),
                    };
                    if let Err(error) = outcome {
                        weight.add(w.attribute_mismatch)?;
                        attribute.diff = Some(AttributeDiff::Custom {
                            assertion: assertion.clone(),
                            error,
                        });
                    }
                }
                Some((_, expected_value)) => {
                    if let Some(diff) = changed_attribute_diff(
                        name,
                        value,
                        expected_value,
                        self.equal,
                        self.options,
                        class_attribute,
                    ) {
                        weight.add(w.attribute_mismatch)?;
                        attribute.diff = Some(diff);
                    }
                }
                None => {
                    if self.options.diff_extra_attributes {
                        weight.add_real(w.attribute_extra)?;
                        attribute.diff = Some(AttributeDiff::Extra);
                    }
                    weight.add_total(w.attribute_extra)?;
                }
            }
            out.push(attribute);
        }

        for (name, expected_value) in expected_attributes {
            if actual_attributes.iter().any(|(n, _)| n == name) {
                continue;
            }
            if self.options.diff_removed_attributes {
                weight.add_real(w.attribute_missing)?;
                out.push(Attribute {
                    name: name.clone(),
                    value: None,
                    diff: Some(AttributeDiff::Missing {
                        expected: expected_value.clone(),
                    }),
                });
            }
            weight.add_total(w.attribute_missing)?;
        }

        Ok((out, weight))
    }

    pub fn diff_content<'s>(
        &'s self,
        actual_children: &'s [A::Node],
        expected_children: &'s [E::Node],
    ) -> LocalBoxFuture<'s, Result<(Vec<DiffNode>, Weight)>> {
        async move {
            let w = &self.options.weights;
            let best = self.diff_children(actual_children, expected_children).await?;
            let mut best_entries = best.entries;
            let mut best_weight = best.weight;

            if best_weight.real() != 0.0
                && actual_children.len() == 1
                && !expected_children.is_empty()
                && matches!(
                    self.actual_adapter.classify(&actual_children[0]),
                    NodeKind::Element
                )
            {
                let inner = self.actual_adapter.children(&actual_children[0]);
                let (unwrapped_entries, mut unwrapped_weight) =
                    self.diff_content(&inner, expected_children).await?;
                let wrapper_penalty = if self.options.diff_wrappers {
                    w.wrapper_removed
                } else {
                    0.0
                };
                if wrapper_penalty + unwrapped_weight.real() < best_weight.real() {
                    unwrapped_weight.add_total(w.wrapper_removed)?;
                    let mut shell = element_shell(self.actual_adapter, &actual_children[0]);
                    shell.children = unwrapped_entries;
                    let node = if self.options.diff_wrappers {
                        unwrapped_weight.add_real(w.wrapper_removed)?;
                        shell.diff = Some(DiffTag::Wrapper);
                        DiffNode::Element(shell)
                    } else {
                        DiffNode::Wrapper(WrapperNode {
                            name: shell.name,
                            attributes: shell.attributes,
                            children: shell.children,
                        })
                    };
                    best_entries = vec![node];
                    best_weight = unwrapped_weight;
                }
            }

            Ok((best_entries, best_weight))
        }
        .boxed_local()
    }

    async fn diff_children(
        &self,
        actual_children: &[A::Node],
        expected_children: &[E::Node],
    ) -> Result<ChildOutcome> {
        let exact = self
            .try_diff_children(actual_children, expected_children, true)
            .await?;
        if exact.weight.real() != 0.0 && exact.inserts > 0 && exact.removes > 0 {
            let relaxed = self
                .try_diff_children(actual_children, expected_children, false)
                .await?;
            if relaxed.weight.real() < exact.weight.real() {
                return Ok(relaxed);
            }
        }
        Ok(exact)
    }

    async fn try_diff_children(
        &self,
        actual_children: &[A::Node],
        expected_children: &[E::Node],
        only_exact: bool,
    ) -> Result<ChildOutcome> {
        let w = &self.options.weights;
        let mut eq = PairTable::new(actual_children.len(), expected_children.len());
        let mut sim = PairTable::new(actual_children.len(), expected_children.len());
        for (i, actual) in actual_children.iter().enumerate() {
            for (j, expected) in expected_children.iter().enumerate() {
                let compared = self.diff_element_or_wrapper(actual, expected).await?;
                if compared.weight.is_zero() {
                    eq.set(i, j);
                }
                if !only_exact && self.children_similar(actual, expected) {
                    sim.set(i, j);
                }
            }
        }

        let mut weight = Weight::new();
        let mut entries = Vec::new();
        let mut inserts = 0;
        let mut removes = 0;

        for op in align(&eq, &sim) {
            match op {
                AlignOp::Insert { expected } => {
                    inserts += 1;
                    weight.add_total(w.child_missing)?;
                    if self.options.diff_missing_children {
                        weight.add_real(w.child_missing)?;
                        let mut node =
                            node_to_diff(self.expected_adapter, &expected_children[expected], true);
                        set_diff_tag(&mut node, DiffTag::Missing);
                        entries.push(node);
                    }
                }
                AlignOp::Remove { actual } => {
                    removes += 1;
                    let mut node =
                        node_to_diff(self.actual_adapter, &actual_children[actual], true);
                    if self.options.diff_extra_children {
                        weight.add_real(w.child_inserted)?;
                        set_diff_tag(&mut node, DiffTag::Extra);
                    }
                    weight.add_total(w.child_inserted)?;
                    entries.push(node);
                }
                AlignOp::Match {
                    actual, expected, ..
                } => {
                    let compared = self
                        .diff_element_or_wrapper(&actual_children[actual], &expected_children[expected])
                        .await?;
                    weight.merge(&compared.weight);
                    entries.push(compared.diff);
                }
            }
        }

        if actual_children.is_empty()
            && !expected_children.is_empty()
            && self.options.diff_missing_children
        {
            weight.add(w.all_children_missing)?;
        }

        Ok(ChildOutcome {
            entries,
            weight,
            inserts,
            removes,
        })
    }

    fn children_similar(&self, actual: &A::Node, expected: &E::Node) -> bool {
        match (
            self.actual_adapter.classify(actual),
            self.expected_adapter.classify(expected),
        ) {
            (NodeKind::Leaf(_), NodeKind::Leaf(_)) => true,
            (NodeKind::Element, NodeKind::Element) => {
                self.actual_adapter.name(actual) == self.expected_adapter.name(expected)
            }
            _ => false,
        }
    }
}
