//! Document mutation layer: one operation per structural change.
//!
//! `EngineCore` owns the client's view of the shared document and applies
//! every mutation optimistically. Each operation returns a [`Commit`]
//! naming the collections the host must replace at the sync service — the
//! whole layer composes as "compute new collection value from old
//! collection value" so it merges cleanly under the service's
//! last-write-wins rule, and every operation is safe to deliver more than
//! once.
//!
//! This layer is permission-agnostic: the input layer checks edit rights
//! before calling in (a denied mutation is a no-op at the caller, never an
//! error here).

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use log::debug;
use serde_json::{Value, json};

use crate::camera::Point;
use crate::consts::{
    CONNECT_NODE_HTML, DEFAULT_NODE_HTML, DUPLICATE_OFFSET, IMAGE_MAX_RENDERED_WIDTH,
    IMAGE_MIN_RENDERED_HEIGHT, IMAGE_MIN_RENDERED_WIDTH, IMAGE_UNSIZED_WIDTH, SHAPE_NODE_SIZE,
    TEXT_NODE_WIDTH,
};
use crate::doc::{
    Document, Edge, EdgeId, Node, NodeId, NodeKind, NodeProps, PathPoint, new_edge_id, new_node_id,
};
use crate::router::Side;
use crate::sync::SyncStore;

/// Which shared collections a mutation changed.
///
/// The host relays a commit to the sync service via [`Commit::dispatch`];
/// `Document` is a single atomic replacement of both collections and must
/// never be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Commit {
    /// Nothing changed; nothing to send.
    #[default]
    None,
    /// The node collection changed.
    Nodes,
    /// The edge collection changed.
    Edges,
    /// Both collections changed together and must be replaced atomically.
    Document,
}

impl Commit {
    /// Combine two commits from one logical mutation.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::None, c) | (c, Self::None) => c,
            (Self::Nodes, Self::Nodes) => Self::Nodes,
            (Self::Edges, Self::Edges) => Self::Edges,
            _ => Self::Document,
        }
    }

    /// Send this commit to the sync service, reading the collections to
    /// replace from `doc`.
    pub fn dispatch(self, doc: &Document, sync: &mut dyn SyncStore) {
        match self {
            Self::None => {}
            Self::Nodes => sync.replace_nodes(doc.nodes.clone()),
            Self::Edges => sync.replace_edges(doc.edges.clone()),
            Self::Document => sync.replace_document(doc.nodes.clone(), doc.edges.clone()),
        }
    }
}

/// One delta in a batched node update (drag, marquee-select, removal).
#[derive(Debug, Clone)]
pub enum NodeChange {
    /// Move a node to a new position.
    Position { id: NodeId, position: Point },
    /// Set or clear local selection.
    Select { id: NodeId, selected: bool },
    /// Remove a node (cascades to its edges, as `delete_nodes` does).
    Remove { id: NodeId },
    /// Replace a node wholesale (e.g. measured-dimension updates).
    Replace { node: Node },
}

/// One delta in a batched edge update.
#[derive(Debug, Clone)]
pub enum EdgeChange {
    /// Set or clear local selection.
    Select { id: EdgeId, selected: bool },
    /// Remove an edge.
    Remove { id: EdgeId },
    /// Replace an edge wholesale.
    Replace { edge: Edge },
}

/// A completed connection drag between two attachment points.
#[derive(Debug, Clone)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<Side>,
    pub target_handle: Option<Side>,
}

/// State of a connection drag that ended over empty canvas.
#[derive(Debug, Clone)]
pub struct ConnectDrag {
    /// Node the drag started from.
    pub from_node: NodeId,
    /// Side the drag started from, if it began on a fixed handle.
    pub from_handle: Option<Side>,
    /// Document-space point where the drag was released.
    pub drop_position: Point,
    /// Whether the drag ended on a valid target (in which case
    /// `on_connect` already handled it).
    pub valid_target: bool,
}

/// Direction for a z-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZDirection {
    /// Paint above every other node.
    Front,
    /// Paint below every other node.
    Back,
}

/// The mutation engine: owns the local view of the shared document.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub doc: Document,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Remote ingress ---

    /// Hydrate the document from the sync service's read view.
    pub fn load_snapshot(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.doc.replace_nodes(nodes);
        self.doc.replace_edges(edges);
    }

    /// Apply a remote replacement of the node collection.
    pub fn apply_remote_nodes(&mut self, nodes: Vec<Node>) {
        self.doc.replace_nodes(nodes);
    }

    /// Apply a remote replacement of the edge collection.
    pub fn apply_remote_edges(&mut self, edges: Vec<Edge>) {
        self.doc.replace_edges(edges);
    }

    // --- Batched changes ---

    /// Apply a batch of node deltas as one replacement of the node list.
    /// Removals cascade to dependent edges in the same commit.
    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) -> Commit {
        if changes.is_empty() {
            return Commit::None;
        }

        let mut removed: Vec<NodeId> = Vec::new();
        for change in changes {
            match change {
                NodeChange::Position { id, position } => {
                    if let Some(node) = self.doc.node_mut(id) {
                        node.position = *position;
                    }
                }
                NodeChange::Select { id, selected } => {
                    if let Some(node) = self.doc.node_mut(id) {
                        node.selected = *selected;
                    }
                }
                NodeChange::Remove { id } => removed.push(id.clone()),
                NodeChange::Replace { node } => {
                    if let Some(existing) = self.doc.node_mut(&node.id) {
                        *existing = node.clone();
                    }
                }
            }
        }

        if removed.is_empty() {
            Commit::Nodes
        } else {
            Commit::Nodes.merge(self.remove_nodes_cascading(&removed))
        }
    }

    /// Apply a batch of edge deltas as one replacement of the edge list.
    pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) -> Commit {
        if changes.is_empty() {
            return Commit::None;
        }

        let mut removed: Vec<EdgeId> = Vec::new();
        for change in changes {
            match change {
                EdgeChange::Select { id, selected } => {
                    if let Some(edge) = self.doc.edge_mut(id) {
                        edge.selected = *selected;
                    }
                }
                EdgeChange::Remove { id } => removed.push(id.clone()),
                EdgeChange::Replace { edge } => {
                    if let Some(existing) = self.doc.edge_mut(&edge.id) {
                        *existing = edge.clone();
                    }
                }
            }
        }

        if !removed.is_empty() {
            self.doc.edges.retain(|e| !removed.contains(&e.id));
        }
        Commit::Edges
    }

    // --- Structural operations ---

    /// Create a new node with type-appropriate default data and size,
    /// returning its id so callers can track the just-created element.
    /// `initial_data` fields override the defaults.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        position: Point,
        initial_data: Option<Value>,
    ) -> (NodeId, Commit) {
        let mut data = default_node_data(kind);
        if let Some(ref initial) = initial_data {
            if let (Some(fields), Some(incoming)) = (data.as_object_mut(), initial.as_object()) {
                for (k, v) in incoming {
                    fields.insert(k.clone(), v.clone());
                }
            }
        }

        let (width, height) = default_node_size(kind, &data);
        let id = new_node_id();
        self.doc.nodes.push(Node {
            id: id.clone(),
            kind,
            position,
            width,
            height,
            z_index: None,
            selected: false,
            data,
        });
        (id, Commit::Nodes)
    }

    /// Remove all listed nodes and, atomically, every edge with an
    /// endpoint among them. An edge never survives its endpoint's deletion
    /// in the resulting state — including an edge left dangling by a
    /// remote removal of the node itself.
    pub fn delete_nodes(&mut self, ids: &[NodeId]) -> Commit {
        let any_node = ids.iter().any(|id| self.doc.contains_node(id));
        let any_edge = self
            .doc
            .edges
            .iter()
            .any(|e| ids.contains(&e.source) || ids.contains(&e.target));
        if !any_node && !any_edge {
            return Commit::None;
        }
        self.remove_nodes_cascading(ids)
    }

    /// Remove a single edge directly.
    pub fn delete_edge(&mut self, id: &str) -> Commit {
        let before = self.doc.edges.len();
        self.doc.edges.retain(|e| e.id != id);
        if self.doc.edges.len() == before {
            Commit::None
        } else {
            Commit::Edges
        }
    }

    /// Clone a node's kind and data under a new id, offset so the copy
    /// doesn't exactly overlap the original.
    pub fn duplicate_node(&mut self, id: &str) -> Option<(NodeId, Commit)> {
        let original = self.doc.node(id)?;
        let copy = Node {
            id: new_node_id(),
            position: Point::new(
                original.position.x + DUPLICATE_OFFSET,
                original.position.y + DUPLICATE_OFFSET,
            ),
            selected: false,
            ..original.clone()
        };
        let copy_id = copy.id.clone();
        self.doc.nodes.push(copy);
        Some((copy_id, Commit::Nodes))
    }

    /// Move a node above (or below) every other node's paint order.
    /// Front is one past the observed maximum; back is one under the
    /// observed minimum, unset `z_index` counting as 0 either way.
    pub fn set_node_z_index(&mut self, id: &str, direction: ZDirection) -> Commit {
        let z = match direction {
            ZDirection::Front => self.doc.max_z() + 1,
            ZDirection::Back => self.doc.min_z() - 1,
        };
        let Some(node) = self.doc.node_mut(id) else {
            return Commit::None;
        };
        node.z_index = Some(z);
        Commit::Nodes
    }

    /// Shallow-merge fields into a node's data (null values delete keys).
    pub fn update_node_data(&mut self, id: &str, partial: &Value) -> Commit {
        if self.doc.merge_node_data(id, partial) {
            Commit::Nodes
        } else {
            Commit::None
        }
    }

    /// Shallow-merge fields into an edge's data (null values delete keys).
    pub fn update_edge_data(&mut self, id: &str, partial: &Value) -> Commit {
        if self.doc.merge_edge_data(id, partial) {
            Commit::Edges
        } else {
            Commit::None
        }
    }

    // --- Connections ---

    /// Create a new edge from a completed drag between two existing
    /// attachment points. Re-delivering the same connection is a no-op.
    pub fn on_connect(&mut self, connection: &Connection) -> Commit {
        if !self.doc.contains_node(&connection.source)
            || !self.doc.contains_node(&connection.target)
        {
            debug!(
                "ignoring connection with missing endpoint: {} -> {}",
                connection.source, connection.target
            );
            return Commit::None;
        }

        let duplicate = self.doc.edges.iter().any(|e| {
            e.source == connection.source
                && e.target == connection.target
                && e.source_handle == connection.source_handle
                && e.target_handle == connection.target_handle
        });
        if duplicate {
            return Commit::None;
        }

        self.doc.edges.push(Edge {
            id: new_edge_id(),
            source: connection.source.clone(),
            target: connection.target.clone(),
            source_handle: connection.source_handle,
            target_handle: connection.target_handle,
            selected: false,
            data: json!({}),
        });
        Commit::Edges
    }

    /// Move an existing edge's endpoints to a new connection without
    /// changing its id or data.
    pub fn on_reconnect(&mut self, edge_id: &str, connection: &Connection) -> Commit {
        let Some(edge) = self.doc.edge_mut(edge_id) else {
            return Commit::None;
        };
        edge.source = connection.source.clone();
        edge.target = connection.target.clone();
        edge.source_handle = connection.source_handle;
        edge.target_handle = connection.target_handle;
        Commit::Edges
    }

    /// Handle a connection drag released over empty canvas by creating a
    /// default node at the drop position and an edge from the drag's
    /// origin to it, as one atomic update — the node is never observable
    /// without its edge.
    pub fn on_connect_end(&mut self, drag: &ConnectDrag) -> Option<(NodeId, Commit)> {
        if drag.valid_target {
            return None;
        }
        if !self.doc.contains_node(&drag.from_node) {
            // Origin deleted mid-drag by a remote client; drop the gesture.
            debug!("connect-end from vanished node {}", drag.from_node);
            return None;
        }

        let node_id = new_node_id();
        self.doc.nodes.push(Node {
            id: node_id.clone(),
            kind: NodeKind::Text,
            position: drag.drop_position,
            width: Some(TEXT_NODE_WIDTH),
            height: None,
            z_index: None,
            selected: false,
            data: json!({ "html": CONNECT_NODE_HTML, "text": "" }),
        });
        self.doc.edges.push(Edge {
            id: new_edge_id(),
            source: drag.from_node.clone(),
            target: node_id.clone(),
            source_handle: drag.from_handle,
            target_handle: None,
            selected: false,
            data: json!({}),
        });
        Some((node_id, Commit::Document))
    }

    // --- Freehand fast path ---

    /// Append one pressure sample to a path node's point list without
    /// reconstructing the rest of the node.
    pub fn push_point_to_path(&mut self, id: &str, point: PathPoint) -> Commit {
        let Some(node) = self.doc.node_mut(id) else {
            return Commit::None;
        };
        if node.kind != NodeKind::Path {
            return Commit::None;
        }

        if !node.data.is_object() {
            node.data = json!({});
        }
        if let Some(fields) = node.data.as_object_mut() {
            let points = fields
                .entry("points")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Some(arr) = points.as_array_mut() {
                arr.push(json!([point.x(), point.y(), point.pressure()]));
            }
        }
        Commit::Nodes
    }

    // --- Internals ---

    fn remove_nodes_cascading(&mut self, ids: &[NodeId]) -> Commit {
        self.doc.nodes.retain(|n| !ids.contains(&n.id));
        self.doc
            .edges
            .retain(|e| !ids.contains(&e.source) && !ids.contains(&e.target));
        Commit::Document
    }
}

/// Type-appropriate default data for a freshly created node.
fn default_node_data(kind: NodeKind) -> Value {
    match kind {
        NodeKind::Text | NodeKind::Sticky => json!({ "html": DEFAULT_NODE_HTML, "text": "" }),
        NodeKind::Shape => {
            json!({ "html": DEFAULT_NODE_HTML, "text": "", "shape": "rectangle" })
        }
        NodeKind::Image => json!({ "url": "" }),
        NodeKind::Path => json!({ "points": [] }),
    }
}

/// Default size policy: text gets a fixed width, shapes a fixed square,
/// images size themselves from the source aspect ratio clamped to a
/// maximum rendered width with a floor on both axes; sticky and path
/// nodes are measured by the renderer.
fn default_node_size(kind: NodeKind, data: &Value) -> (Option<f64>, Option<f64>) {
    match kind {
        NodeKind::Text => (Some(TEXT_NODE_WIDTH), None),
        NodeKind::Shape => (Some(SHAPE_NODE_SIZE), Some(SHAPE_NODE_SIZE)),
        NodeKind::Image => {
            let props = NodeProps::new(data);
            match (props.original_width(), props.original_height()) {
                (Some(w), Some(h)) if w > 0.0 && h > 0.0 => {
                    let scale = (IMAGE_MAX_RENDERED_WIDTH / w).min(1.0);
                    (
                        Some((w * scale).round().max(IMAGE_MIN_RENDERED_WIDTH)),
                        Some((h * scale).round().max(IMAGE_MIN_RENDERED_HEIGHT)),
                    )
                }
                _ => (Some(IMAGE_UNSIZED_WIDTH), None),
            }
        }
        NodeKind::Sticky | NodeKind::Path => (None, None),
    }
}
