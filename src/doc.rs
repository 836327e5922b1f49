//! Document model: nodes, edges, and the in-memory document they live in.
//!
//! This module defines the core data types that describe what is on the
//! board (`Node`, `NodeKind`, `Edge`), typed accessors for the open-ended
//! per-kind `data` JSON bags (`NodeProps`, `EdgeProps`), and the `Document`
//! that owns both collections. Data flows into this layer from the sync
//! service (JSON deserialization of the shared read view) and from the
//! mutation engine; renderers read nodes in insertion order and resolve
//! paint order from `z_index` separately.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{DEFAULT_EDGE_COLOR, DEFAULT_PATH_COLOR, DEFAULT_STROKE_WIDTH};
use crate::router::Side;

/// Unique identifier for a node. Client-generated, collision-resistant.
pub type NodeId = String;

/// Unique identifier for an edge.
pub type EdgeId = String;

/// Mint a fresh node id.
#[must_use]
pub fn new_node_id() -> NodeId {
    format!("node-{}", Uuid::new_v4())
}

/// Mint a fresh edge id.
#[must_use]
pub fn new_edge_id() -> EdgeId {
    format!("edge-{}", Uuid::new_v4())
}

/// The kind of a node. Fixed at creation; never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Free-floating rich text block.
    Text,
    /// Bitmap image referenced by URL or embedded data URI.
    Image,
    /// Sticky note with a color variant.
    Sticky,
    /// Geometric shape (rectangle, circle, triangle, diamond) with a label.
    Shape,
    /// Freehand stroke stored as ordered pressure samples.
    Path,
}

/// A placed element on the board, as stored in the document and on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node.
    pub id: NodeId,
    /// What the node is; determines how `data` is interpreted.
    pub kind: NodeKind,
    /// Top-left corner in document space.
    pub position: Point,
    /// Rendered width; `None` means the renderer measures the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Rendered height; `None` means the renderer measures the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Paint order among overlapping nodes. Unset is treated as 0.
    /// Independent of the node's position in the collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// Whether the local user has this node selected.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    /// Open-ended per-kind payload (rich content, image source, samples...).
    pub data: Value,
}

/// A directed connection between two nodes.
///
/// Edges store node references only; their geometry is recomputed from the
/// endpoints' current bounds on every render (see [`crate::router`]).
/// Endpoints may transiently reference a deleted node under concurrent
/// remote edits; the delete cascade restores the invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge.
    pub id: EdgeId,
    /// Node id the edge starts at.
    pub source: NodeId,
    /// Node id the edge points to.
    pub target: NodeId,
    /// Side of the source node the edge was drawn from, if fixed.
    /// Absent for floating edges, which pick the best side per render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<Side>,
    /// Side of the target node the edge attaches to, if fixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<Side>,
    /// Whether the local user has this edge selected.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    /// Open-ended payload (label, path variant, color).
    pub data: Value,
}

/// One freehand sample: `[x, y, pressure]` in document space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint(pub f64, pub f64, pub f64);

impl PathPoint {
    #[must_use]
    pub fn x(&self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.1
    }

    #[must_use]
    pub fn pressure(&self) -> f64 {
        self.2
    }
}

/// How an edge is rendered between its two anchor points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePathType {
    /// Smooth bezier curve.
    Bezier,
    /// Orthogonal segments with rounded corners.
    #[default]
    Step,
    /// Straight segment.
    Straight,
}

/// Typed access to common fields of a `Node.data` JSON bag.
pub struct NodeProps<'a> {
    value: &'a Value,
}

impl<'a> NodeProps<'a> {
    /// Wrap a reference to a node `data` value for typed access.
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    fn str_or(&self, key: &str, default: &'a str) -> &'a str {
        self.value.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Rich content as HTML. Empty when absent.
    #[must_use]
    pub fn html(&self) -> &str {
        self.str_or("html", "")
    }

    /// Plain-text mirror of the rich content. Empty when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.str_or("text", "")
    }

    /// Sticky note color variant. Defaults to `"yellow"`.
    #[must_use]
    pub fn color_variant(&self) -> &str {
        self.str_or("color", "yellow")
    }

    /// Shape variant tag. Defaults to `"rectangle"`.
    #[must_use]
    pub fn shape(&self) -> &str {
        self.str_or("shape", "rectangle")
    }

    /// Image source: a URL or an embedded data URI. Empty when absent.
    #[must_use]
    pub fn url(&self) -> &str {
        self.str_or("url", "")
    }

    /// Original pixel width of the source image, if known.
    #[must_use]
    pub fn original_width(&self) -> Option<f64> {
        self.value.get("original_width").and_then(Value::as_f64)
    }

    /// Original pixel height of the source image, if known.
    #[must_use]
    pub fn original_height(&self) -> Option<f64> {
        self.value.get("original_height").and_then(Value::as_f64)
    }

    /// Ordered freehand samples. Empty when absent or malformed.
    #[must_use]
    pub fn points(&self) -> Vec<PathPoint> {
        self.value
            .get("points")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|p| serde_json::from_value(p.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Freehand stroke color. Defaults to [`DEFAULT_PATH_COLOR`].
    #[must_use]
    pub fn stroke_color(&self) -> &str {
        self.str_or("color", DEFAULT_PATH_COLOR)
    }

    /// Freehand stroke width. Defaults to [`DEFAULT_STROKE_WIDTH`].
    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.value
            .get("stroke_width")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_STROKE_WIDTH)
    }
}

/// Typed access to common fields of an `Edge.data` JSON bag.
pub struct EdgeProps<'a> {
    value: &'a Value,
}

impl<'a> EdgeProps<'a> {
    /// Wrap a reference to an edge `data` value for typed access.
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// Label text displayed on the edge. Empty when absent.
    #[must_use]
    pub fn label(&self) -> &str {
        self.value.get("label").and_then(Value::as_str).unwrap_or("")
    }

    /// Path rendering variant. Defaults to [`EdgePathType::Step`].
    #[must_use]
    pub fn path_type(&self) -> EdgePathType {
        self.value
            .get("path_type")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Edge color. Defaults to [`DEFAULT_EDGE_COLOR`].
    #[must_use]
    pub fn color(&self) -> &str {
        self.value
            .get("color")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_EDGE_COLOR)
    }
}

/// The full set of nodes and edges for one collaborative session.
///
/// Both collections keep insertion order; paint order comes from `z_index`
/// alone. All lookups are by id — indices are never assumed stable across
/// remote updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// All nodes, in insertion order.
    pub nodes: Vec<Node>,
    /// All edges, in insertion order.
    pub edges: Vec<Edge>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a reference to a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Return a mutable reference to a node by id.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Return a reference to an edge by id.
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Return a mutable reference to an edge by id.
    pub fn edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    /// Whether a node with this id exists.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Ids of all nodes the local user currently has selected.
    #[must_use]
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect()
    }

    /// Replace the node collection with a new snapshot (remote read view).
    pub fn replace_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
    }

    /// Replace the edge collection with a new snapshot (remote read view).
    pub fn replace_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
    }

    /// Largest `z_index` across all nodes, treating unset as 0.
    #[must_use]
    pub fn max_z(&self) -> i64 {
        self.nodes
            .iter()
            .map(|n| n.z_index.unwrap_or(0))
            .max()
            .unwrap_or(0)
            .max(0)
    }

    /// Smallest `z_index` across all nodes, treating unset as 0.
    #[must_use]
    pub fn min_z(&self) -> i64 {
        self.nodes
            .iter()
            .map(|n| n.z_index.unwrap_or(0))
            .min()
            .unwrap_or(0)
            .min(0)
    }

    /// Shallow-merge `incoming` into a node's `data` bag. Keys with null
    /// values are removed. Returns false if the node doesn't exist or
    /// `incoming` is not an object.
    pub fn merge_node_data(&mut self, id: &str, incoming: &Value) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        merge_data(&mut node.data, incoming)
    }

    /// Shallow-merge `incoming` into an edge's `data` bag, as
    /// [`Self::merge_node_data`] does for nodes.
    pub fn merge_edge_data(&mut self, id: &str, incoming: &Value) -> bool {
        let Some(edge) = self.edge_mut(id) else {
            return false;
        };
        merge_data(&mut edge.data, incoming)
    }

    /// Number of nodes currently in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the document contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn merge_data(existing: &mut Value, incoming: &Value) -> bool {
    let Some(incoming) = incoming.as_object() else {
        return false;
    };

    if !existing.is_object() {
        *existing = serde_json::json!({});
    }

    if let Some(fields) = existing.as_object_mut() {
        for (k, v) in incoming {
            if v.is_null() {
                fields.remove(k);
            } else {
                fields.insert(k.clone(), v.clone());
            }
        }
    }
    true
}
