use ctxnav_core::model::{Context, Link};
use serde::{Deserialize, Serialize};

/// Which optional fields a result carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Projection {
    pub include_content: bool,
    pub include_metadata: bool,
}

impl Projection {
    pub fn new(include_content: bool, include_metadata: bool) -> Self {
        Self {
            include_content,
            include_metadata,
        }
    }

    pub fn full() -> Self {
        Self::new(true, true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeResult {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub relation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Nodes and edges of a navigation result.
///
/// For point-to-point results the nodes are in walk order and `edges[i]`
/// connects `nodes[i]` with `nodes[i + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NavigationPath {
    pub nodes: Vec<NodeResult>,
    pub edges: Vec<EdgeResult>,
}

impl NavigationPath {
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    pub fn edge_ids(&self) -> Vec<&str> {
        self.edges.iter().map(|edge| edge.id.as_str()).collect()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }
}

pub fn build_node(context: &Context, projection: Projection) -> NodeResult {
    NodeResult {
        id: context.id.clone(),
        text: projection.include_content.then(|| context.text.clone()),
        tags: projection
            .include_metadata
            .then(|| context.tags.iter().cloned().collect()),
    }
}

pub fn build_edge(link: &Link, projection: Projection) -> EdgeResult {
    let (strength, confidence) = if projection.include_metadata {
        (link.strength, link.confidence())
    } else {
        (None, None)
    };
    EdgeResult {
        id: link.id.clone(),
        source_id: link.source_id.clone(),
        target_id: link.target_id.clone(),
        relation: link.relation.clone(),
        strength,
        confidence,
    }
}

/// Resolved contexts and links before projection.
#[derive(Debug, Default)]
pub(crate) struct RawSubgraph<'a> {
    pub nodes: Vec<Context>,
    pub edges: Vec<&'a Link>,
}

impl RawSubgraph<'_> {
    pub fn project(&self, projection: Projection) -> NavigationPath {
        NavigationPath {
            nodes: self
                .nodes
                .iter()
                .map(|context| build_node(context, projection))
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|link| build_edge(link, projection))
                .collect(),
        }
    }
}
