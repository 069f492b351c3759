//! Document tree with source location tracking.

use crate::SourceInfo;
use indexmap::IndexMap;
use yaml_rust2::Yaml;

/// A node of a parsed or merged document.
///
/// Every node carries the location it was read from. Nodes are owned, so a
/// merged tree can hold values coming from many files at once and still
/// report the original file and line of each of them.
///
/// Equality is structural: two nodes are equal when their values are equal,
/// wherever they came from. Mapping equality ignores key order.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub source_info: SourceInfo,
}

/// The value held by a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Atomic values (String, Integer, Real, Boolean, Null).
    Scalar(Yaml),

    /// Ordered list of nodes.
    Sequence(Vec<Node>),

    /// String-keyed mapping in first-insertion order.
    Mapping(IndexMap<String, Node>),
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Node {
    pub fn new_scalar(yaml: Yaml, source_info: SourceInfo) -> Self {
        Self {
            kind: NodeKind::Scalar(yaml),
            source_info,
        }
    }

    pub fn new_sequence(items: Vec<Node>, source_info: SourceInfo) -> Self {
        Self {
            kind: NodeKind::Sequence(items),
            source_info,
        }
    }

    pub fn new_mapping(entries: IndexMap<String, Node>, source_info: SourceInfo) -> Self {
        Self {
            kind: NodeKind::Mapping(entries),
            source_info,
        }
    }

    /// An empty mapping, the starting point of every merge.
    pub fn empty_mapping() -> Self {
        Self::new_mapping(IndexMap::new(), SourceInfo::default())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(Yaml::Null))
    }

    pub fn as_yaml(&self) -> Option<&Yaml> {
        match &self.kind {
            NodeKind::Scalar(yaml) => Some(yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_yaml().and_then(|yaml| yaml.as_str())
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match &self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut IndexMap<String, Node>> {
        match &mut self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Get a mapping value by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|entries| entries.get(key))
    }

    /// Follow a chain of mapping keys.
    pub fn get_path(&self, path: &[&str]) -> Option<&Node> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Number of children (sequence length or mapping entry count).
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Scalar(_) => 0,
            NodeKind::Sequence(items) => items.len(),
            NodeKind::Mapping(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable type name, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Scalar(yaml) => yaml_type_name(yaml),
            NodeKind::Sequence(_) => "array",
            NodeKind::Mapping(_) => "object",
        }
    }

    /// Render a scalar as plain text (`None` for collections).
    pub fn scalar_text(&self) -> Option<String> {
        self.as_yaml().map(scalar_to_string)
    }

    /// Convert into a plain `yaml-rust2` value, dropping source locations.
    pub fn to_yaml(&self) -> Yaml {
        match &self.kind {
            NodeKind::Scalar(yaml) => yaml.clone(),
            NodeKind::Sequence(items) => Yaml::Array(items.iter().map(Node::to_yaml).collect()),
            NodeKind::Mapping(entries) => Yaml::Hash(
                entries
                    .iter()
                    .map(|(key, value)| (Yaml::String(key.clone()), value.to_yaml()))
                    .collect(),
            ),
        }
    }

    /// Build a node from a plain `yaml-rust2` value with default locations.
    pub fn from_yaml(yaml: &Yaml) -> Self {
        let info = SourceInfo::default();
        match yaml {
            Yaml::Array(items) => Node::new_sequence(items.iter().map(Node::from_yaml).collect(), info),
            Yaml::Hash(entries) => Node::new_mapping(
                entries
                    .iter()
                    .map(|(key, value)| (scalar_to_string(key), Node::from_yaml(value)))
                    .collect(),
                info,
            ),
            other => Node::new_scalar(other.clone(), info),
        }
    }
}

/// Get a human-readable type name for a YAML value
pub fn yaml_type_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null | Yaml::BadValue => "null",
        Yaml::Boolean(_) => "boolean",
        Yaml::Integer(_) => "integer",
        Yaml::Real(_) => "float",
        Yaml::String(_) => "string",
        Yaml::Array(_) => "array",
        Yaml::Hash(_) => "object",
        Yaml::Alias(_) => "alias",
    }
}

/// Plain text of a scalar value; also used for mapping keys.
pub fn scalar_to_string(value: &Yaml) -> String {
    match value {
        Yaml::String(s) | Yaml::Real(s) => s.clone(),
        Yaml::Integer(i) => i.to_string(),
        Yaml::Boolean(b) => b.to_string(),
        Yaml::Null | Yaml::BadValue => "null".to_string(),
        Yaml::Alias(id) => format!("*{}", id),
        Yaml::Array(_) | Yaml::Hash(_) => format!("{:?}", value),
    }
}
