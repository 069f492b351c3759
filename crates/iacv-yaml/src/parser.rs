//! YAML parser that builds source-located [`Node`] trees.

use crate::tags::{CustomTag, TagResolver};
use crate::{Error, Node, Result, SourceInfo};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;
use yaml_rust2::Yaml;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Tag prefix that the `!!` handle expands to.
const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// Parse YAML from a string, producing a [`Node`] tree.
///
/// This parses a single YAML document. `!env` tags are resolved from the
/// process environment and `!vault` tags resolve to empty strings; use
/// [`parse_with_resolver`] to plug in decryption.
///
/// # Example
///
/// ```rust
/// use iacv_yaml::parse;
///
/// let node = parse("name: leaf-1").unwrap();
/// assert_eq!(node.get("name").and_then(|n| n.as_str()), Some("leaf-1"));
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid or uses an unknown tag.
pub fn parse(content: &str) -> Result<Node> {
    parse_with_resolver(content, None, &TagResolver::new())
}

/// Parse YAML from a string with an associated filename.
///
/// The filename is recorded in every node's source location and in the
/// location of any returned error.
///
/// ```rust
/// use iacv_yaml::parse_file;
///
/// let node = parse_file("a: 1", "data.yaml").unwrap();
/// assert_eq!(node.source_info.file.as_deref(), Some("data.yaml"));
/// ```
pub fn parse_file(content: &str, filename: &str) -> Result<Node> {
    parse_with_resolver(content, Some(filename), &TagResolver::new())
}

/// Read and parse a file from disk.
pub fn parse_path(path: &Path, resolver: &TagResolver) -> Result<Node> {
    let filename = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| Error::ParseError {
        message: e.to_string(),
        location: None,
    })?;
    parse_with_resolver(&content, Some(&filename), resolver)
}

/// Parse YAML, resolving custom tags with `resolver`.
///
/// An input without any document (empty, or only comments) yields an empty
/// mapping.
pub fn parse_with_resolver(
    content: &str,
    filename: Option<&str>,
    resolver: &TagResolver,
) -> Result<Node> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = NodeBuilder::new(filename, resolver);

    let loaded = parser.load(&mut builder, false).map_err(Error::from);
    let loaded = match filename {
        Some(file) => loaded.map_err(|e| e.with_file(file)),
        None => loaded,
    };
    loaded?;

    builder.result()
}

/// Builder that implements MarkedEventReceiver to construct a [`Node`].
struct NodeBuilder<'r> {
    filename: Option<String>,
    resolver: &'r TagResolver,

    /// Stack of collections being constructed
    stack: Vec<BuildNode>,

    /// Completed anchored nodes, by anchor id
    anchors: HashMap<usize, Node>,

    /// The completed root node
    root: Option<Node>,

    /// First error seen; later events are ignored once set
    error: Option<Error>,
}

/// A node being constructed during parsing.
enum BuildNode {
    Sequence {
        start_marker: Marker,
        anchor_id: usize,
        items: Vec<Node>,
    },
    Mapping {
        start_marker: Marker,
        anchor_id: usize,
        entries: Vec<(Node, Option<Node>)>,
    },
}

impl<'r> NodeBuilder<'r> {
    fn new(filename: Option<&str>, resolver: &'r TagResolver) -> Self {
        Self {
            filename: filename.map(str::to_string),
            resolver,
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<Node> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(self.root.unwrap_or_else(|| {
            let mut node = Node::empty_mapping();
            node.source_info.file = self.filename;
            node
        }))
    }

    fn fail(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn push_complete(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping { entries, .. }) => match entries.last_mut() {
                Some((_, value @ None)) => *value = Some(node),
                _ => entries.push((node, None)),
            },
        }
    }

    fn remember_anchor(&mut self, anchor_id: usize, node: &Node) {
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, node.clone());
        }
    }

    fn make_source_info(&self, marker: &Marker, len: usize) -> SourceInfo {
        let info = SourceInfo::from_marker(marker, len);
        match &self.filename {
            Some(filename) => info.with_file(filename.clone()),
            None => info,
        }
    }

    fn scalar_value(
        &self,
        value: String,
        style: TScalarStyle,
        tag: Option<Tag>,
        source_info: &SourceInfo,
    ) -> Result<Yaml> {
        let Some(tag) = tag else {
            return Ok(match style {
                TScalarStyle::Plain => Yaml::from_str(&value),
                _ => Yaml::String(value),
            });
        };

        if tag.handle == "!" {
            let Some(custom) = CustomTag::from_suffix(&tag.suffix) else {
                return Err(Error::UnknownTag {
                    tag: format!("!{}", tag.suffix),
                    location: source_info.clone(),
                });
            };
            return self
                .resolver
                .resolve(custom, &value)
                .map(Yaml::String)
                .map_err(|source| Error::TagResolution {
                    tag: custom.name().to_string(),
                    source,
                    location: source_info.clone(),
                });
        }

        if tag.handle == "!!" || tag.handle == CORE_TAG_PREFIX {
            return Ok(core_tagged_scalar(&tag.suffix, value));
        }

        Err(Error::UnknownTag {
            tag: format!("{}{}", tag.handle, tag.suffix),
            location: source_info.clone(),
        })
    }

    /// Custom tags only make sense on scalars.
    fn check_collection_tag(&mut self, tag: Option<&Tag>, marker: &Marker) {
        if let Some(tag) = tag
            && tag.handle == "!"
        {
            let location = self.make_source_info(marker, 0);
            let error = match CustomTag::from_suffix(&tag.suffix) {
                Some(custom) => Error::InvalidStructure {
                    message: format!("tag '!{}' can only be applied to scalars", custom.name()),
                    location: Some(location),
                },
                None => Error::UnknownTag {
                    tag: format!("!{}", tag.suffix),
                    location,
                },
            };
            self.fail(error);
        }
    }

    /// Location of a completed mapping.
    ///
    /// yaml-rust2 reports a block mapping as starting after its first key,
    /// so the mapping starts at whichever comes first: the start marker or
    /// the first key.
    fn mapping_source_info(
        &self,
        start_marker: &Marker,
        entries: &[(Node, Option<Node>)],
        end_marker: &Marker,
    ) -> SourceInfo {
        let mut info = self.make_source_info(start_marker, 0);
        if let Some((first_key, _)) = entries.first()
            && first_key.source_info.offset < info.offset
        {
            info.offset = first_key.source_info.offset;
            info.line = first_key.source_info.line;
            info.col = first_key.source_info.col;
        }
        info.len = end_marker.index().saturating_sub(info.offset);
        info
    }

    fn finish_mapping(
        &self,
        entries: Vec<(Node, Option<Node>)>,
        source_info: SourceInfo,
    ) -> Result<Node> {
        let mut map = IndexMap::with_capacity(entries.len());
        for (key, value) in entries {
            let key_text = key.scalar_text().ok_or_else(|| Error::InvalidStructure {
                message: "complex mapping keys are not supported".to_string(),
                location: Some(key.source_info.clone()),
            })?;
            let value = value.unwrap_or_else(|| {
                Node::new_scalar(Yaml::Null, key.source_info.clone())
            });
            map.insert(key_text, value);
        }
        Ok(Node::new_mapping(map, source_info))
    }
}

/// Interpret a scalar carrying a `!!` core schema tag.
fn core_tagged_scalar(suffix: &str, value: String) -> Yaml {
    match suffix {
        "str" => Yaml::String(value),
        "null" => Yaml::Null,
        "int" => match value.trim().parse::<i64>() {
            Ok(i) => Yaml::Integer(i),
            Err(_) => Yaml::String(value),
        },
        "float" => Yaml::Real(value),
        "bool" => match value.trim() {
            "true" | "True" | "TRUE" => Yaml::Boolean(true),
            "false" | "False" | "FALSE" => Yaml::Boolean(false),
            _ => Yaml::String(value),
        },
        _ => Yaml::from_str(&value),
    }
}

impl MarkedEventReceiver for NodeBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}

            Event::Scalar(value, style, anchor_id, tag) => {
                let source_info = self.make_source_info(&marker, value.len());
                match self.scalar_value(value, style, tag, &source_info) {
                    Ok(yaml) => {
                        let node = Node::new_scalar(yaml, source_info);
                        self.remember_anchor(anchor_id, &node);
                        self.push_complete(node);
                    }
                    Err(error) => self.fail(error),
                }
            }

            Event::SequenceStart(anchor_id, tag) => {
                self.check_collection_tag(tag.as_ref(), &marker);
                self.stack.push(BuildNode::Sequence {
                    start_marker: marker,
                    anchor_id,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => {
                let Some(BuildNode::Sequence {
                    start_marker,
                    anchor_id,
                    items,
                }) = self.stack.pop()
                else {
                    self.fail(Error::InvalidStructure {
                        message: "unbalanced sequence end".to_string(),
                        location: Some(self.make_source_info(&marker, 0)),
                    });
                    return;
                };
                let len = marker.index().saturating_sub(start_marker.index());
                let node = Node::new_sequence(items, self.make_source_info(&start_marker, len));
                self.remember_anchor(anchor_id, &node);
                self.push_complete(node);
            }

            Event::MappingStart(anchor_id, tag) => {
                self.check_collection_tag(tag.as_ref(), &marker);
                self.stack.push(BuildNode::Mapping {
                    start_marker: marker,
                    anchor_id,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => {
                let Some(BuildNode::Mapping {
                    start_marker,
                    anchor_id,
                    entries,
                }) = self.stack.pop()
                else {
                    self.fail(Error::InvalidStructure {
                        message: "unbalanced mapping end".to_string(),
                        location: Some(self.make_source_info(&marker, 0)),
                    });
                    return;
                };
                let source_info = self.mapping_source_info(&start_marker, &entries, &marker);
                match self.finish_mapping(entries, source_info) {
                    Ok(node) => {
                        self.remember_anchor(anchor_id, &node);
                        self.push_complete(node);
                    }
                    Err(error) => self.fail(error),
                }
            }

            Event::Alias(anchor_id) => match self.anchors.get(&anchor_id) {
                Some(anchored) => {
                    let node = anchored.clone();
                    self.push_complete(node);
                }
                None => {
                    let location = self.make_source_info(&marker, 0);
                    self.fail(Error::InvalidStructure {
                        message: "alias refers to an unknown anchor".to_string(),
                        location: Some(location),
                    });
                }
            },
        }
    }
}
