use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::product::Variant;

/// The shopper's chosen value per axis index.
///
/// Axes without an entry are unconstrained. Built up one change at a time and
/// thrown away when the modal closes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<usize, String>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection pinning every axis to `variant`'s values.
    pub fn from_variant(variant: &Variant) -> Self {
        Self(variant.options.iter().cloned().enumerate().collect())
    }

    pub fn with(mut self, axis: usize, value: impl Into<String>) -> Self {
        self.set(axis, value);
        self
    }

    pub fn set(&mut self, axis: usize, value: impl Into<String>) {
        self.0.insert(axis, value.into());
    }

    pub fn clear(&mut self, axis: usize) -> Option<String> {
        self.0.remove(&axis)
    }

    pub fn get(&self, axis: usize) -> Option<&str> {
        self.0.get(&axis).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every axis in `0..axis_count` has a value.
    pub fn covers(&self, axis_count: usize) -> bool {
        (0..axis_count).all(|axis| self.0.contains_key(&axis))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(axis, value)| (*axis, value.as_str()))
    }
}

impl FromIterator<(usize, String)> for Selection {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
