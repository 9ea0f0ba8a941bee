//! Diff options and the penalty table driving the weight heuristics.

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, Result};

/// Penalty constants for each mismatch category.
///
/// Callers override individual entries with struct update syntax against
/// [`WeightTable::default()`]; the default table is immutable data, merged
/// per call, never a mutable singleton.
///
/// One relationship between the defaults is load-bearing:
/// `all_children_missing + child_missing` must be at least `name_mismatch`,
/// so that a renamed-but-present child is never cheaper to report as a
/// removable wrapper around a missing child. An override that breaks the
/// inequality is accepted as configured data and will produce surprising
/// wrapper/rename classifications rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    /// A leaf on one side, an element on the other.
    pub native_nonnative_mismatch: f64,
    /// Element names differ.
    pub name_mismatch: f64,
    /// An attribute value differs (or an attribute assertion failed).
    pub attribute_mismatch: f64,
    /// An expected attribute is absent from actual.
    pub attribute_missing: f64,
    /// Actual carries an attribute that is not expected.
    pub attribute_extra: f64,
    /// Leaf content differs textually.
    pub string_content_mismatch: f64,
    /// Leaf content differs only in type, with identical text renderings.
    pub content_type_mismatch: f64,
    /// An expected child is absent from actual.
    pub child_missing: f64,
    /// Actual carries a child that is not expected.
    pub child_inserted: f64,
    /// A single-child pass-through layer was elided.
    pub wrapper_removed: f64,
    /// Expected has children and actual has none; added on top of the
    /// per-child penalties to keep total absence strictly worse than a
    /// single renamed child.
    pub all_children_missing: f64,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            native_nonnative_mismatch: 15.0,
            name_mismatch: 10.0,
            attribute_mismatch: 2.0,
            attribute_missing: 2.0,
            attribute_extra: 1.0,
            string_content_mismatch: 3.0,
            content_type_mismatch: 1.0,
            child_missing: 2.0,
            child_inserted: 2.0,
            wrapper_removed: 3.0,
            all_children_missing: 8.0,
        }
    }
}

impl WeightTable {
    /// Rejects any negative or non-finite entry. Called once per public
    /// entry point, so the engines can treat table values as trusted.
    pub fn validate(&self) -> Result<()> {
        let entries = [
            self.native_nonnative_mismatch,
            self.name_mismatch,
            self.attribute_mismatch,
            self.attribute_missing,
            self.attribute_extra,
            self.string_content_mismatch,
            self.content_type_mismatch,
            self.child_missing,
            self.child_inserted,
            self.wrapper_removed,
            self.all_children_missing,
        ];
        for value in entries {
            if !value.is_finite() || value < 0.0 {
                return Err(DiffError::InvalidWeight { value });
            }
        }
        Ok(())
    }
}

/// Configuration for a single diff or containment invocation. Every flag
/// defaults to enabled; options are read-only once the call starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Report attributes present in actual but not expected.
    pub diff_extra_attributes: bool,
    /// Report attributes present in expected but not actual.
    pub diff_removed_attributes: bool,
    /// Report children present in actual but not expected.
    pub diff_extra_children: bool,
    /// Report children present in expected but not actual.
    pub diff_missing_children: bool,
    /// Annotate elided pass-through layers (and charge `wrapper_removed` to
    /// the real weight). When off, elided layers are typed as wrapper
    /// elements so a renderer can grey them out without accusing them of
    /// being wrong.
    pub diff_wrappers: bool,
    /// Compare the class attribute as a whole value. When off, it is
    /// compared as a space-separated token set instead.
    pub diff_exact_classes: bool,
    /// Token-set comparison only: report class tokens present in actual but
    /// not expected.
    pub diff_extra_classes: bool,
    /// Token-set comparison only: report class tokens present in expected
    /// but not actual.
    pub diff_missing_classes: bool,
    pub weights: WeightTable,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            diff_extra_attributes: true,
            diff_removed_attributes: true,
            diff_extra_children: true,
            diff_missing_children: true,
            diff_wrappers: true,
            diff_exact_classes: true,
            diff_extra_classes: true,
            diff_missing_classes: true,
            weights: WeightTable::default(),
        }
    }
}
