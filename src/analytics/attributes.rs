//! Free-form event attributes and their translation into the protocol's
//! indexed custom dimension/metric slots.
//!
//! Attributes whose name follows the `CustomDimension<N>` / `CustomMetric<N>`
//! convention are lifted into typed slots; everything else is left for the
//! per-hit extraction rules (or ignored). Filtering is silent by design:
//! instrumentation call sites never need to validate what they pass in.

use crate::analytics::constants::{DIMENSION_PREFIX, METRIC_PREFIX};

/// A single name/value pair attached to a recorded event. Transient: built by
/// the caller, consumed by one record call, never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

/// A labeled slot in the protocol's dimension table (`cd<index>`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomDimension {
    pub index: u32,
    pub value: String,
}

/// A labeled slot in the protocol's metric table (`cm<index>`).
#[derive(Clone, Debug, PartialEq)]
pub struct CustomMetric {
    pub index: u32,
    pub value: f64,
}

/// Extracts custom dimensions from an attribute list, preserving input order.
///
/// An attribute qualifies when its name is `CustomDimension<N>` with a
/// non-negative integer suffix and its value is non-empty. Everything else is
/// dropped without error. Duplicate indices are kept; the collecting backend
/// resolves them last-wins.
pub fn dimensions_from_attributes(attributes: &[Attribute]) -> Vec<CustomDimension> {
    attributes
        .iter()
        .filter_map(|attribute| {
            let suffix = attribute.name.strip_prefix(DIMENSION_PREFIX)?;
            let index = suffix.parse::<u32>().ok()?;
            if attribute.value.is_empty() {
                return None;
            }
            Some(CustomDimension {
                index,
                value: attribute.value.clone(),
            })
        })
        .collect()
}

/// Extracts custom metrics from an attribute list, preserving input order.
///
/// Same naming rule as dimensions, with the additional requirement that the
/// value parses as a number.
pub fn metrics_from_attributes(attributes: &[Attribute]) -> Vec<CustomMetric> {
    attributes
        .iter()
        .filter_map(|attribute| {
            let suffix = attribute.name.strip_prefix(METRIC_PREFIX)?;
            let index = suffix.parse::<u32>().ok()?;
            if attribute.value.is_empty() {
                return None;
            }
            let value = attribute.value.parse::<f64>().ok()?;
            Some(CustomMetric { index, value })
        })
        .collect()
}

/// Looks up an attribute by name, ignoring ASCII case. Returns the value only
/// when present and non-empty.
pub(crate) fn attribute_value<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
        .map(|attribute| attribute.value.as_str())
        .filter(|value| !value.is_empty())
}
