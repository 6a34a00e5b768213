//! Feature Vector - engineered columns for one customer, pre-encoding
//!
//! Values are stored by [`Column`] in layout order. Labels borrow from the
//! source record (or are static engineered labels), so building a vector
//! does not allocate.

use std::collections::BTreeMap;

use super::layout::{layout_hash, Column, FEATURE_COUNT, FEATURE_VERSION};

/// A single engineered value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Number(f64),
    Label(&'a str),
    /// No value could be derived (out-of-range value segment)
    Missing,
}

impl<'a> FeatureValue<'a> {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&'a str> {
        match self {
            FeatureValue::Label(s) => Some(*s),
            _ => None,
        }
    }
}

/// Engineered feature vector in layout order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<'a> {
    values: [FeatureValue<'a>; FEATURE_COUNT],
}

impl<'a> FeatureVector<'a> {
    /// A vector with every column missing
    pub fn new() -> Self {
        Self {
            values: [FeatureValue::Missing; FEATURE_COUNT],
        }
    }

    pub fn get(&self, column: Column) -> FeatureValue<'a> {
        self.values[column.index()]
    }

    pub fn set(&mut self, column: Column, value: FeatureValue<'a>) {
        self.values[column.index()] = value;
    }

    pub fn set_number(&mut self, column: Column, value: f64) {
        self.set(column, FeatureValue::Number(value));
    }

    pub fn set_label(&mut self, column: Column, label: &'a str) {
        self.set(column, FeatureValue::Label(label));
    }

    pub fn number(&self, column: Column) -> Option<f64> {
        self.get(column).as_number()
    }

    pub fn label(&self, column: Column) -> Option<&'a str> {
        self.get(column).as_label()
    }

    /// (column, value) pairs in layout order
    pub fn iter(&self) -> impl Iterator<Item = (Column, FeatureValue<'a>)> + '_ {
        Column::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    /// Columns that could not be derived
    pub fn missing_columns(&self) -> Vec<Column> {
        self.iter()
            .filter(|(_, v)| matches!(v, FeatureValue::Missing))
            .map(|(c, _)| c)
            .collect()
    }

    /// JSON form for debug logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        let named: BTreeMap<&str, serde_json::Value> = self
            .iter()
            .map(|(col, value)| {
                let json = match value {
                    FeatureValue::Number(v) => serde_json::json!(v),
                    FeatureValue::Label(s) => serde_json::json!(s),
                    FeatureValue::Missing => serde_json::Value::Null,
                };
                (col.name(), json)
            })
            .collect();

        serde_json::json!({
            "feature_version": FEATURE_VERSION,
            "layout_hash": layout_hash(),
            "values": named,
        })
    }
}

impl Default for FeatureVector<'_> {
    fn default() -> Self {
        Self::new()
    }
}
