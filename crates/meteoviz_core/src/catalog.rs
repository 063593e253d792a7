//! Product catalog: an arena-backed forest of products, categories and variables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of a node inside the catalog arena.
pub type NodeIndex = usize;

/// Tier of a catalog node. The catalog is three levels deep in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Product,
    Category,
    Variable,
}

/// Which family of forecast imagery a node displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageCategory {
    Wind,
    Precipitation,
    Temperature,
    #[default]
    Unclassified,
}

impl ImageCategory {
    /// Derives a category from id text. Priority: wind, then precipitation, then temperature.
    pub fn infer_from_id(node_id: &str) -> Self {
        const PRECIPITATION: &[&str] = &["precipitation", "precip", "rain"];
        const TEMPERATURE: &[&str] = &["temperature", "temp", "imd"];

        if node_id.contains("wind") {
            ImageCategory::Wind
        } else if PRECIPITATION.iter().any(|needle| node_id.contains(needle)) {
            ImageCategory::Precipitation
        } else if TEMPERATURE.iter().any(|needle| node_id.contains(needle)) {
            ImageCategory::Temperature
        } else {
            ImageCategory::Unclassified
        }
    }
}

/// Nested form of a catalog node, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    /// Inferred from `id` when absent.
    #[serde(default)]
    pub category: Option<ImageCategory>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
    #[serde(default)]
    pub expanded: bool,
}

impl TreeNode {
    pub fn product(id: &str, name: &str, children: Vec<TreeNode>) -> Self {
        Self::new(id, name, NodeKind::Product, children)
    }

    pub fn category(id: &str, name: &str, children: Vec<TreeNode>) -> Self {
        Self::new(id, name, NodeKind::Category, children)
    }

    pub fn variable(id: &str, name: &str) -> Self {
        Self::new(id, name, NodeKind::Variable, Vec::new())
    }

    fn new(id: &str, name: &str, kind: NodeKind, children: Vec<TreeNode>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            category: None,
            children,
            expanded: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate node id {0:?}")]
    DuplicateId(String),
    #[error("node {0:?} is a variable but has children")]
    LeafWithChildren(String),
    #[error("node with name {0:?} has an empty id")]
    EmptyId(String),
}

/// One arena slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub category: ImageCategory,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub expanded: bool,
}

impl CatalogEntry {
    /// Variables never expand, whatever their flag says.
    pub fn is_expandable(&self) -> bool {
        !self.children.is_empty() && matches!(self.kind, NodeKind::Product | NodeKind::Category)
    }
}

/// One line of the flattened, depth-first tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    pub index: NodeIndex,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    nodes: Vec<CatalogEntry>,
    roots: Vec<NodeIndex>,
    by_id: HashMap<String, NodeIndex>,
}

impl Catalog {
    pub fn from_forest(forest: Vec<TreeNode>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for root in forest {
            let index = catalog.insert(root, None)?;
            catalog.roots.push(index);
        }
        Ok(catalog)
    }

    fn insert(&mut self, node: TreeNode, parent: Option<NodeIndex>) -> Result<NodeIndex, CatalogError> {
        if node.id.is_empty() {
            return Err(CatalogError::EmptyId(node.name));
        }
        if node.kind == NodeKind::Variable && !node.children.is_empty() {
            return Err(CatalogError::LeafWithChildren(node.id));
        }
        if self.by_id.contains_key(&node.id) {
            return Err(CatalogError::DuplicateId(node.id));
        }

        let index = self.nodes.len();
        let category = node
            .category
            .unwrap_or_else(|| ImageCategory::infer_from_id(&node.id));
        self.by_id.insert(node.id.clone(), index);
        self.nodes.push(CatalogEntry {
            id: node.id,
            name: node.name,
            kind: node.kind,
            category,
            parent,
            children: Vec::with_capacity(node.children.len()),
            expanded: node.expanded,
        });

        for child in node.children {
            let child_index = self.insert(child, Some(index))?;
            self.nodes[index].children.push(child_index);
        }
        Ok(index)
    }

    /// The GFS / WRF / IMD sample catalog.
    pub fn builtin() -> Self {
        match Self::from_forest(builtin_forest()) {
            Ok(catalog) => catalog,
            Err(err) => {
                meteoviz_logging::viz_error!("built-in catalog rejected: {err}");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn entry(&self, index: NodeIndex) -> Option<&CatalogEntry> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, node_id: &str) -> Option<NodeIndex> {
        self.by_id.get(node_id).copied()
    }

    pub fn get(&self, node_id: &str) -> Option<&CatalogEntry> {
        self.index_of(node_id).and_then(|index| self.entry(index))
    }

    /// Flips the expanded flag of `node_id`. Returns `false` (and changes nothing) for unknown ids.
    pub fn toggle_expand(&mut self, node_id: &str) -> bool {
        match self.by_id.get(node_id) {
            Some(&index) => {
                let entry = &mut self.nodes[index];
                entry.expanded = !entry.expanded;
                true
            }
            None => false,
        }
    }

    /// Root-level nodes whose name contains `term`, ignoring case. Descendants are not searched.
    pub fn filter_by_search_term(&self, term: &str) -> Vec<NodeIndex> {
        let needle = term.to_lowercase();
        self.roots
            .iter()
            .copied()
            .filter(|&index| self.nodes[index].name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Depth-first rows for the filtered roots, descending only into expanded nodes.
    pub fn visible_rows(&self, term: &str) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        for root in self.filter_by_search_term(term) {
            self.push_rows(root, 0, &mut rows);
        }
        rows
    }

    fn push_rows(&self, index: NodeIndex, depth: usize, rows: &mut Vec<TreeRow>) {
        rows.push(TreeRow { index, depth });
        let entry = &self.nodes[index];
        if entry.expanded && entry.is_expandable() {
            for &child in &entry.children {
                self.push_rows(child, depth + 1, rows);
            }
        }
    }

    /// Rebuilds the nested form, with categories made explicit.
    pub fn to_forest(&self) -> Vec<TreeNode> {
        self.roots.iter().map(|&index| self.to_tree_node(index)).collect()
    }

    fn to_tree_node(&self, index: NodeIndex) -> TreeNode {
        let entry = &self.nodes[index];
        TreeNode {
            id: entry.id.clone(),
            name: entry.name.clone(),
            kind: entry.kind,
            category: Some(entry.category),
            children: entry
                .children
                .iter()
                .map(|&child| self.to_tree_node(child))
                .collect(),
            expanded: entry.expanded,
        }
    }
}

fn builtin_forest() -> Vec<TreeNode> {
    vec![
        TreeNode::product(
            "gfs",
            "GFS (Global Forecast System)",
            vec![
                TreeNode::category(
                    "gfs-temperature",
                    "Temperature Analysis",
                    vec![
                        TreeNode::variable("gfs-temp-surface", "Surface Temperature"),
                        TreeNode::variable("gfs-temp-2m", "2m Temperature"),
                        TreeNode::variable("gfs-temp-upper", "Upper Level Temperature"),
                    ],
                ),
                TreeNode::category(
                    "gfs-precipitation",
                    "Precipitation Forecast",
                    vec![
                        TreeNode::variable("gfs-precip-total", "Total Precipitation"),
                        TreeNode::variable("gfs-precip-rate", "Precipitation Rate"),
                    ],
                ),
                TreeNode::category(
                    "gfs-wind",
                    "Wind Analysis",
                    vec![
                        TreeNode::variable("gfs-wind-speed", "Wind Speed"),
                        TreeNode::variable("gfs-wind-direction", "Wind Direction"),
                        TreeNode::variable("gfs-wind-gust", "Wind Gust"),
                    ],
                ),
            ],
        ),
        TreeNode::product(
            "wrf",
            "WRF (Weather Research and Forecasting)",
            vec![
                TreeNode::category(
                    "wrf-high-res",
                    "High Resolution Forecast",
                    vec![
                        TreeNode::variable("wrf-temp-detailed", "Detailed Temperature"),
                        TreeNode::variable("wrf-precip-detailed", "Detailed Precipitation"),
                    ],
                ),
                TreeNode::category(
                    "wrf-ensemble",
                    "Ensemble Forecast",
                    vec![
                        TreeNode::variable("wrf-ens-mean", "Ensemble Mean"),
                        TreeNode::variable("wrf-ens-spread", "Ensemble Spread"),
                    ],
                ),
            ],
        ),
        TreeNode::product(
            "imd",
            "IMD (India Meteorological Department)",
            vec![
                TreeNode::category(
                    "imd-monsoon",
                    "Monsoon Analysis",
                    vec![
                        TreeNode::variable("imd-monsoon-onset", "Monsoon Onset"),
                        TreeNode::variable("imd-monsoon-withdraw", "Monsoon Withdrawal"),
                    ],
                ),
                TreeNode::category(
                    "imd-cyclone",
                    "Cyclone Tracking",
                    vec![
                        TreeNode::variable("imd-cyclone-track", "Cyclone Track"),
                        TreeNode::variable("imd-cyclone-intensity", "Cyclone Intensity"),
                    ],
                ),
            ],
        ),
    ]
}
