//! Gradient-boosted tree classifier
//!
//! Loads the JSON tree dump written by XGBoost
//! (`booster.dump_model(path, dump_format="json")`) wrapped with the
//! objective metadata:
//!
//! ```json
//! {
//!   "model_name": "XGBoost",
//!   "objective": "binary:logistic",
//!   "base_score": 0.5,
//!   "trees": [
//!     { "nodeid": 0, "split": "tenure", "split_condition": -0.5,
//!       "yes": 1, "no": 2, "missing": 1,
//!       "children": [ { "nodeid": 1, "leaf": 0.4 }, { "nodeid": 2, "leaf": -0.2 } ] }
//!   ]
//! }
//! ```
//!
//! Split names are resolved to schema positions at load time. Traversal
//! follows XGBoost: `yes` when `x < split_condition` compared in f32,
//! `missing` when the value is NaN.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::schema::SchemaPlan;

/// Probability above which the positive class is predicted
pub const DECISION_THRESHOLD: f64 = 0.5;

pub const BINARY_LOGISTIC: &str = "binary:logistic";

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary classifier over a schema-width numeric row
pub trait Classifier: Send + Sync {
    /// Positive-class probability
    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> f64;

    /// Predicted class (0 or 1)
    fn predict(&self, row: ArrayView1<'_, f64>) -> u8 {
        u8::from(self.predict_proba(row) > DECISION_THRESHOLD)
    }

    /// Expected row width
    fn n_features(&self) -> usize;

    fn name(&self) -> &str;
}

// ============================================================================
// DUMP FORMAT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpNode {
    pub nodeid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_condition: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DumpNode>,
}

fn default_objective() -> String {
    BINARY_LOGISTIC.to_string()
}

fn default_base_score() -> f64 {
    0.5
}

fn default_model_name() -> String {
    "XGBoost".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default = "default_objective")]
    pub objective: String,
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    pub trees: Vec<DumpNode>,
}

// ============================================================================
// COMPILED ENSEMBLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        yes: usize,
        no: usize,
        missing: usize,
    },
    Leaf(f64),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn leaf_value(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        // every path visits each node at most once
        for _ in 0..self.nodes.len() {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split { feature, threshold, yes, no, missing } => {
                    let x = row[feature];
                    idx = if x.is_nan() {
                        missing
                    } else if (x as f32) < threshold {
                        yes
                    } else {
                        no
                    };
                }
            }
        }
        // compile() rejects cycles, so this is unreachable for loaded trees
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    name: String,
    base_margin: f64,
    n_features: usize,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Compile a dump against the resolved schema
    pub fn compile(file: ModelFile, schema: &SchemaPlan) -> Result<Self, String> {
        if file.objective != BINARY_LOGISTIC {
            return Err(format!(
                "unsupported objective '{}', expected '{}'",
                file.objective, BINARY_LOGISTIC
            ));
        }
        if !(file.base_score > 0.0 && file.base_score < 1.0) {
            return Err(format!("base_score {} must be in (0, 1)", file.base_score));
        }
        if file.trees.is_empty() {
            return Err("model has no trees".to_string());
        }

        let trees = file
            .trees
            .iter()
            .enumerate()
            .map(|(i, root)| compile_tree(root, schema).map_err(|e| format!("tree {}: {}", i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: file.model_name,
            base_margin: logit(file.base_score),
            n_features: schema.width(),
            trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Raw margin (log-odds) before the sigmoid
    pub fn margin(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.base_margin + self.trees.iter().map(|t| t.leaf_value(row)).sum::<f64>()
    }
}

impl Classifier for TreeEnsemble {
    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> f64 {
        sigmoid(self.margin(row))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

// ============================================================================
// COMPILATION
// ============================================================================

fn flatten<'a>(node: &'a DumpNode, out: &mut Vec<&'a DumpNode>) {
    out.push(node);
    for child in &node.children {
        flatten(child, out);
    }
}

/// Resolve "tenure" or "f4" to a schema position
fn resolve_feature(split: &str, schema: &SchemaPlan) -> Option<usize> {
    if let Some(pos) = schema.position(split) {
        return Some(pos);
    }
    split
        .strip_prefix('f')
        .and_then(|idx| idx.parse::<usize>().ok())
        .filter(|&idx| idx < schema.width())
}

fn compile_tree(root: &DumpNode, schema: &SchemaPlan) -> Result<Tree, String> {
    let mut dumped = Vec::new();
    flatten(root, &mut dumped);

    let size = dumped.len();
    let mut slots: Vec<Option<Node>> = vec![None; size];

    for node in dumped {
        let id = node.nodeid as usize;
        if id >= size {
            return Err(format!("node id {} out of range for {} nodes", id, size));
        }
        if slots[id].is_some() {
            return Err(format!("duplicate node id {}", id));
        }

        let compiled = match (node.leaf, &node.split) {
            (Some(value), _) => Node::Leaf(value),
            (None, Some(split)) => {
                let feature = resolve_feature(split, schema)
                    .ok_or_else(|| format!("split on unknown feature '{}'", split))?;
                let threshold = node
                    .split_condition
                    .ok_or_else(|| format!("node {} has no split_condition", id))?;
                let yes = node.yes.ok_or_else(|| format!("node {} has no 'yes' child", id))? as usize;
                let no = node.no.ok_or_else(|| format!("node {} has no 'no' child", id))? as usize;
                let missing = node.missing.map(|m| m as usize).unwrap_or(yes);

                for child in [yes, no, missing] {
                    if child >= size || child <= id {
                        return Err(format!("node {} points to invalid child {}", id, child));
                    }
                }

                Node::Split {
                    feature,
                    threshold: threshold as f32,
                    yes,
                    no,
                    missing,
                }
            }
            (None, None) => return Err(format!("node {} is neither leaf nor split", id)),
        };
        slots[id] = Some(compiled);
    }

    let nodes = slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| "node ids are not contiguous".to_string())?;

    Ok(Tree { nodes })
}
