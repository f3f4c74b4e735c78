//! Options controlling how two asset records are compared.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How attribute values are compared when both records exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EqualityPolicy {
    /// Values must be the same variant and equal.
    ///
    /// `Number(0)` differs from `Text("0")`, and an attribute missing on one
    /// side differs from any present value, `Null` and `""` included.
    /// Numbers compare as `f64`, so only finite values are equal to
    /// themselves (see [`crate::FieldValue`]).
    #[default]
    Strict,
    /// Values are normalized before comparing.
    ///
    /// Text is trimmed, numeric text equals the number it parses to, boolean
    /// text equals the boolean (case-insensitive), and missing, `Null` and
    /// blank text all count as the same empty value.
    Normalized,
}

/// Options for a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Value equality policy.
    pub equality: EqualityPolicy,

    /// Attributes left out of the comparison entirely (for example a
    /// per-source surrogate `id`).
    pub ignored_fields: BTreeSet<String>,
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options using [`EqualityPolicy::Normalized`].
    pub fn normalized() -> Self {
        Self {
            equality: EqualityPolicy::Normalized,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_equality(mut self, equality: EqualityPolicy) -> Self {
        self.equality = equality;
        self
    }

    #[must_use]
    pub fn ignoring(mut self, field: impl Into<String>) -> Self {
        self.ignored_fields.insert(field.into());
        self
    }

    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignored_fields.contains(field)
    }
}
