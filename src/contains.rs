//! Containment search: does some subtree of the actual tree match the
//! expected pattern, and if not, what is the closest candidate.

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::adapter::{NodeKind, TreeAdapter};
use crate::async_diff::AsyncEngine;
use crate::diff::Eventual;
use crate::error::{DiffError, Result};
use crate::options::DiffOptions;
use crate::sync_diff::SyncEngine;
use crate::types::{ContainsMatch, ContainsResult, DiffNode, ValueEq};

/// Searches the actual tree, pre-order, for a subtree matching the expected
/// pattern. An exact match (zero real weight) short-circuits; otherwise the
/// lowest-weight candidate is retained, ties broken by first encounter.
/// When no exact match exists, elided wrapper layers are stripped from the
/// retained best match so callers see the real node, not its packaging.
///
/// Synchronous unless a deferred assertion requires asynchronous
/// evaluation, in which case the whole search is re-run on the
/// asynchronous engine and returned as [`Eventual::Deferred`].
pub fn contains<'a, A, E>(
    actual_adapter: &'a A,
    expected_adapter: &'a E,
    actual: &'a A::Node,
    expected: &'a E::Node,
    equal: ValueEq<'a>,
    options: &'a DiffOptions,
) -> Result<Eventual<'a, ContainsResult<A::Node>>>
where
    A: TreeAdapter,
    E: TreeAdapter,
{
    options.weights.validate()?;
    let engine = SyncEngine::new(actual_adapter, expected_adapter, equal, options);
    match search_sync(&engine, actual, expected) {
        Ok(mut result) => {
            if !result.found {
                strip_wrapper_layers(actual_adapter, &mut result);
            }
            Ok(Eventual::Ready(result))
        }
        Err(DiffError::RequiresAsync) => Ok(Eventual::Deferred(
            async move {
                let engine = AsyncEngine::new(actual_adapter, expected_adapter, equal, options);
                let mut result = search_async(&engine, actual, expected).await?;
                if !result.found {
                    strip_wrapper_layers(actual_adapter, &mut result);
                }
                Ok(result)
            }
            .boxed_local(),
        )),
        Err(e) => Err(e),
    }
}

fn search_sync<A, E>(
    engine: &SyncEngine<'_, A, E>,
    actual: &A::Node,
    expected: &E::Node,
) -> Result<ContainsResult<A::Node>>
where
    A: TreeAdapter,
    E: TreeAdapter,
{
    let compared = engine.diff_element_or_wrapper(actual, expected)?;
    if compared.weight.real() == 0.0 {
        return Ok(ContainsResult {
            found: true,
            best_match: None,
        });
    }

    let mut result = ContainsResult {
        found: false,
        best_match: Some(ContainsMatch {
            diff: compared.diff,
            weight: compared.weight,
            node: actual.clone(),
        }),
    };

    if matches!(engine.actual_adapter.classify(actual), NodeKind::Element) {
        for child in engine.actual_adapter.children(actual) {
            let child_result = search_sync(engine, &child, expected)?;
            if child_result.found {
                return Ok(child_result);
            }
            take_better(&mut result, child_result);
        }
    }

    Ok(result)
}

fn search_async<'s, A, E>(
    engine: &'s AsyncEngine<'_, A, E>,
    actual: &'s A::Node,
    expected: &'s E::Node,
) -> LocalBoxFuture<'s, Result<ContainsResult<A::Node>>>
where
    A: TreeAdapter,
    E: TreeAdapter,
{
    async move {
        let compared = engine.diff_element_or_wrapper(actual, expected).await?;
        if compared.weight.real() == 0.0 {
            return Ok(ContainsResult {
                found: true,
                best_match: None,
            });
        }

        let mut result = ContainsResult {
            found: false,
            best_match: Some(ContainsMatch {
                diff: compared.diff,
                weight: compared.weight,
                node: actual.clone(),
            }),
        };

        if matches!(engine.actual_adapter.classify(actual), NodeKind::Element) {
            for child in engine.actual_adapter.children(actual) {
                let child_result = search_async(engine, &child, expected).await?;
                if child_result.found {
                    return Ok(child_result);
                }
                take_better(&mut result, child_result);
            }
        }

        Ok(result)
    }
    .boxed_local()
}

/// Keeps the candidate with the lower real weight; the incumbent wins ties,
/// which preserves pre-order preference.
fn take_better<N>(result: &mut ContainsResult<N>, candidate: ContainsResult<N>) {
    let Some(candidate_match) = candidate.best_match else {
        return;
    };
    match &result.best_match {
        Some(best) if candidate_match.weight.real() >= best.weight.real() => {}
        _ => result.best_match = Some(candidate_match),
    }
}

/// Unwraps annotation-suppressed wrapper layers at the root of the best
/// match, repeatedly, so the reported node is the one that actually
/// resembles the pattern.
fn strip_wrapper_layers<A: TreeAdapter>(adapter: &A, result: &mut ContainsResult<A::Node>) {
    while let Some(best) = result.best_match.as_mut() {
        let DiffNode::Wrapper(wrapper) = &mut best.diff else {
            break;
        };
        if wrapper.children.len() != 1 {
            break;
        }
        let Some(inner_node) = adapter.children(&best.node).into_iter().next() else {
            break;
        };
        best.diff = wrapper.children.remove(0);
        best.node = inner_node;
    }
}
