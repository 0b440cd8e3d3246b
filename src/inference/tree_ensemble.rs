//! Gradient-boosted regression trees.
//!
//! Each tree is a flat node array rooted at index 0. A split sends the sample
//! left when `x[feature] < threshold`. The prediction is `base_score` plus the
//! sum of the reached leaves.

use crate::inference::model::{InferenceError, Regressor, check_dim, finite};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsembleParams {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

#[derive(Debug)]
pub struct TreeEnsembleRegressor {
    params: TreeEnsembleParams,
    input_dim: usize,
}

impl TreeEnsembleRegressor {
    /// Builds the ensemble, checking that every split references a valid
    /// feature and a child further down the node array (so walks terminate).
    pub fn new(params: TreeEnsembleParams, input_dim: usize) -> Result<Self, InferenceError> {
        if params.trees.is_empty() {
            return Err(InferenceError::MalformedModel(
                "tree ensemble has no trees".to_string(),
            ));
        }

        for (t, tree) in params.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(InferenceError::MalformedModel(format!("tree {t} is empty")));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                if let TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } = node
                {
                    if *feature >= input_dim {
                        return Err(InferenceError::MalformedModel(format!(
                            "tree {t} node {n} splits on feature {feature}, model has {input_dim}"
                        )));
                    }
                    let bad_child = |child: usize| child <= n || child >= tree.nodes.len();
                    if bad_child(*left) || bad_child(*right) {
                        return Err(InferenceError::MalformedModel(format!(
                            "tree {t} node {n} has an invalid child index"
                        )));
                    }
                }
            }
        }

        Ok(Self { params, input_dim })
    }

    fn walk(tree: &Tree, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &tree.nodes[index] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl Regressor for TreeEnsembleRegressor {
    fn infer(&self, features: &[f64]) -> Result<f64, InferenceError> {
        check_dim(self.input_dim, features)?;
        if features.iter().any(|x| !x.is_finite()) {
            return Err(InferenceError::NonFinite);
        }

        let sum: f64 = self
            .params
            .trees
            .iter()
            .map(|tree| Self::walk(tree, features))
            .sum();
        finite(self.params.base_score + sum)
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }
}
