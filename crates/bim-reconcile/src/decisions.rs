//! Per-item "apply this change" decisions.
//!
//! A decision set is rebuilt whenever the comparison is recomputed; any
//! earlier choices are discarded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bim_model::{AssetKey, ComparisonItem};

use crate::error::{ReconcileError, Result};

/// Decisions keyed by comparison id. Unchanged items have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionSet {
    decisions: BTreeMap<AssetKey, bool>,
}

impl DecisionSet {
    /// Every change starts out accepted.
    pub fn initialize(items: &[ComparisonItem]) -> Self {
        let decisions = items
            .iter()
            .filter(|item| item.is_change())
            .map(|item| (item.id().clone(), true))
            .collect();
        Self { decisions }
    }

    pub fn get(&self, id: &AssetKey) -> Option<bool> {
        self.decisions.get(id).copied()
    }

    pub fn is_accepted(&self, id: &AssetKey) -> bool {
        self.get(id) == Some(true)
    }

    pub fn contains(&self, id: &AssetKey) -> bool {
        self.decisions.contains_key(id)
    }

    /// Flip the decision for `id` and return the new value.
    pub fn toggle(&mut self, id: &AssetKey) -> Result<bool> {
        let decision = self
            .decisions
            .get_mut(id)
            .ok_or_else(|| ReconcileError::UnknownDecision(id.clone()))?;
        *decision = !*decision;
        Ok(*decision)
    }

    pub fn set(&mut self, id: &AssetKey, accept: bool) -> Result<()> {
        let decision = self
            .decisions
            .get_mut(id)
            .ok_or_else(|| ReconcileError::UnknownDecision(id.clone()))?;
        *decision = accept;
        Ok(())
    }

    pub fn accepted_count(&self) -> usize {
        self.decisions.values().filter(|accept| **accept).count()
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetKey, bool)> {
        self.decisions.iter().map(|(id, accept)| (id, *accept))
    }
}

/// Decision set for a fresh comparison: every change mapped to `true`.
pub fn initialize_decisions(items: &[ComparisonItem]) -> DecisionSet {
    DecisionSet::initialize(items)
}

/// Copy of `decisions` with `id` flipped. Unknown ids are an error.
pub fn toggle_decision(decisions: &DecisionSet, id: &AssetKey) -> Result<DecisionSet> {
    let mut next = decisions.clone();
    next.toggle(id)?;
    Ok(next)
}

/// The changes to send: accepted items that are not unchanged.
pub fn apply_decisions(items: &[ComparisonItem], decisions: &DecisionSet) -> Vec<ComparisonItem> {
    items
        .iter()
        .filter(|item| item.is_change() && decisions.is_accepted(item.id()))
        .cloned()
        .collect()
}
