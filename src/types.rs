use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Kinds of nodes in the code graph.
///
/// Serialized in lower case. Deserialization goes through
/// [`NodeKind::from_str`], so graph exports that tag nodes as `FUNCTION` or
/// `Function` load too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Module,
    Class,
    Interface,
    Function,
    Method,
    Variable,
}

const NODE_KIND_NAMES: &[&str] = &[
    "file",
    "module",
    "class",
    "interface",
    "function",
    "method",
    "variable",
];

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NodeKind::from_str(&raw).ok_or_else(|| de::Error::unknown_variant(&raw, NODE_KIND_NAMES))
    }
}

#[allow(clippy::should_implement_trait)]
impl NodeKind {
    /// Returns the string representation of this node kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Module => "module",
            NodeKind::Class => "class",
            NodeKind::Interface => "interface",
            NodeKind::Function => "function",
            NodeKind::Method => "method",
            NodeKind::Variable => "variable",
        }
    }

    /// Parses a string into a `NodeKind`, returning `None` for unrecognized values.
    ///
    /// Matching is case-insensitive, so graph-style tags such as `FUNCTION`
    /// are accepted as well.
    pub fn from_str(s: &str) -> Option<NodeKind> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Some(NodeKind::File),
            "module" => Some(NodeKind::Module),
            "class" => Some(NodeKind::Class),
            "interface" => Some(NodeKind::Interface),
            "function" => Some(NodeKind::Function),
            "method" => Some(NodeKind::Method),
            "variable" => Some(NodeKind::Variable),
            _ => None,
        }
    }
}

/// Well-known node properties, with unknown keys kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A node in the code graph representing a code entity.
///
/// Nodes are owned by the graph index; everything else in this crate only
/// borrows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub properties: NodeProperties,
}

impl Node {
    /// Creates a node with only a name set.
    pub fn named(id: &str, kind: NodeKind, name: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            properties: NodeProperties {
                name: Some(name.to_string()),
                ..NodeProperties::default()
            },
        }
    }

    /// Creates a file node whose `path` property is set.
    pub fn file(id: &str, path: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: NodeKind::File,
            properties: NodeProperties {
                path: Some(path.to_string()),
                ..NodeProperties::default()
            },
        }
    }

    /// The `name` property, if any.
    pub fn name(&self) -> Option<&str> {
        self.properties.name.as_deref()
    }

    /// The first present of `path`, `filePath` and `relativePath`.
    pub fn path(&self) -> Option<&str> {
        self.properties
            .path
            .as_deref()
            .or(self.properties.file_path.as_deref())
            .or(self.properties.relative_path.as_deref())
    }
}

/// Metadata attached to a similarity candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A candidate returned by a similarity backend for a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Backend-defined similarity; higher is closer.
    pub similarity: f64,
    #[serde(default)]
    pub metadata: CandidateMetadata,
}

impl ScoredCandidate {
    /// The candidate's path from its metadata, if any.
    pub fn path(&self) -> Option<&str> {
        self.metadata.path.as_deref()
    }
}

/// Which search channel contributed a ranked result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Graph,
    Vector,
}

/// A hybrid search result after merging graph and vector matches by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub id: String,
    pub name: String,
    pub combined_score: f64,
    /// Origins in the order they contributed; repeats are kept.
    pub sources: Vec<MatchSource>,
}

/// Statistics about a loaded graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: u64,
    pub nodes_by_kind: HashMap<String, u64>,
    pub project_id: Option<String>,
    pub vectors_available: bool,
}
