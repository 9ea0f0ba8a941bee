//! Top-level diff entry point and the sync-or-deferred result wrapper.

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::adapter::TreeAdapter;
use crate::async_diff::AsyncEngine;
use crate::error::{DiffError, Result};
use crate::options::DiffOptions;
use crate::sync_diff::SyncEngine;
use crate::types::{DiffReport, ValueEq};

/// A result that is either available immediately or needs asynchronous
/// evaluation.
///
/// A diff call is fully synchronous or fully asynchronous: the synchronous
/// engine runs first, and the first deferred assertion it meets discards
/// the partial result and commits the whole computation to the
/// asynchronous engine, whose future is returned here.
pub enum Eventual<'a, T> {
    Ready(T),
    Deferred(LocalBoxFuture<'a, Result<T>>),
}

impl<'a, T> Eventual<'a, T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Eventual::Ready(_))
    }

    /// The ready value, or `None` if the computation was deferred.
    pub fn into_ready(self) -> Option<T> {
        match self {
            Eventual::Ready(value) => Some(value),
            Eventual::Deferred(_) => None,
        }
    }

    /// Awaits the deferred computation if there is one.
    pub async fn resolve(self) -> Result<T> {
        match self {
            Eventual::Ready(value) => Ok(value),
            Eventual::Deferred(pending) => pending.await,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Eventual<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Eventual::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Eventual::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Diffs an actual tree against an expected tree, producing an annotated
/// diff tree and its dissimilarity weight.
///
/// `equal` is the leaf/attribute-value equality predicate
/// ([`crate::default_equal`] for structural equality). The weight table in
/// `options` is validated up front; an invalid override fails fast.
pub fn diff_elements<'a, A, E>(
    actual_adapter: &'a A,
    expected_adapter: &'a E,
    actual: &'a A::Node,
    expected: &'a E::Node,
    equal: ValueEq<'a>,
    options: &'a DiffOptions,
) -> Result<Eventual<'a, DiffReport>>
where
    A: TreeAdapter,
    E: TreeAdapter,
{
    options.weights.validate()?;
    let engine = SyncEngine::new(actual_adapter, expected_adapter, equal, options);
    match engine.diff_element_or_wrapper(actual, expected) {
        Ok(compared) => Ok(Eventual::Ready(DiffReport {
            diff: compared.diff,
            weight: compared.weight,
        })),
        Err(DiffError::RequiresAsync) => Ok(Eventual::Deferred(
            async move {
                let engine = AsyncEngine::new(actual_adapter, expected_adapter, equal, options);
                let compared = engine.diff_element_or_wrapper(actual, expected).await?;
                Ok(DiffReport {
                    diff: compared.diff,
                    weight: compared.weight,
                })
            }
            .boxed_local(),
        )),
        Err(e) => Err(e),
    }
}
