#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;

fn make_node(kind: NodeKind, z: Option<i64>) -> Node {
    Node {
        id: new_node_id(),
        kind,
        position: Point::new(0.0, 0.0),
        width: Some(100.0),
        height: Some(80.0),
        z_index: z,
        selected: false,
        data: json!({}),
    }
}

fn make_edge(source: &str, target: &str) -> Edge {
    Edge {
        id: new_edge_id(),
        source: source.to_string(),
        target: target.to_string(),
        source_handle: None,
        target_handle: None,
        selected: false,
        data: json!({}),
    }
}

// =============================================================
// Ids
// =============================================================

#[test]
fn node_ids_are_prefixed_and_unique() {
    let a = new_node_id();
    let b = new_node_id();
    assert!(a.starts_with("node-"));
    assert_ne!(a, b);
}

#[test]
fn edge_ids_are_prefixed_and_unique() {
    let a = new_edge_id();
    let b = new_edge_id();
    assert!(a.starts_with("edge-"));
    assert_ne!(a, b);
}

// =============================================================
// NodeKind serde
// =============================================================

#[test]
fn kind_serde_all_variants() {
    let cases = [
        (NodeKind::Text, "\"text\""),
        (NodeKind::Image, "\"image\""),
        (NodeKind::Sticky, "\"sticky\""),
        (NodeKind::Shape, "\"shape\""),
        (NodeKind::Path, "\"path\""),
    ];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
        let back: NodeKind = serde_json::from_str(expected).unwrap();
        assert_eq!(back, kind);
    }
}

#[test]
fn kind_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<NodeKind>("\"hexagon\"").is_err());
}

// =============================================================
// Node / Edge serde
// =============================================================

#[test]
fn node_serde_roundtrip() {
    let node = make_node(NodeKind::Sticky, Some(3));
    let json = serde_json::to_string(&node).unwrap();
    let back: Node = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, node.id);
    assert_eq!(back.kind, NodeKind::Sticky);
    assert_eq!(back.z_index, Some(3));
}

#[test]
fn node_unset_fields_are_omitted() {
    let mut node = make_node(NodeKind::Path, None);
    node.width = None;
    node.height = None;
    let json = serde_json::to_string(&node).unwrap();
    assert!(!json.contains("width"));
    assert!(!json.contains("z_index"));
    assert!(!json.contains("selected"));
}

#[test]
fn node_selected_survives_roundtrip() {
    let mut node = make_node(NodeKind::Text, None);
    node.selected = true;
    let json = serde_json::to_string(&node).unwrap();
    let back: Node = serde_json::from_str(&json).unwrap();
    assert!(back.selected);
}

#[test]
fn edge_serde_roundtrip_with_handles() {
    let mut edge = make_edge("node-a", "node-b");
    edge.source_handle = Some(Side::Right);
    let json = serde_json::to_string(&edge).unwrap();
    assert!(json.contains("\"right\""));
    let back: Edge = serde_json::from_str(&json).unwrap();
    assert_eq!(back.source_handle, Some(Side::Right));
    assert_eq!(back.target_handle, None);
}

#[test]
fn path_point_serializes_as_triple() {
    let p = PathPoint(1.0, 2.0, 0.5);
    assert_eq!(serde_json::to_string(&p).unwrap(), "[1.0,2.0,0.5]");
    let back: PathPoint = serde_json::from_str("[3, 4, 1]").unwrap();
    assert_eq!(back.x(), 3.0);
    assert_eq!(back.y(), 4.0);
    assert_eq!(back.pressure(), 1.0);
}

// =============================================================
// NodeProps
// =============================================================

#[test]
fn node_props_defaults() {
    let data = json!({});
    let props = NodeProps::new(&data);
    assert_eq!(props.html(), "");
    assert_eq!(props.text(), "");
    assert_eq!(props.color_variant(), "yellow");
    assert_eq!(props.shape(), "rectangle");
    assert_eq!(props.url(), "");
    assert_eq!(props.original_width(), None);
    assert_eq!(props.stroke_width(), 4.0);
    assert!(props.points().is_empty());
}

#[test]
fn node_props_reads_values() {
    let data = json!({
        "html": "<p>hi</p>",
        "shape": "diamond",
        "url": "data:image/jpeg;base64,AAAA",
        "original_width": 640.0,
        "original_height": 480.0,
        "points": [[0.0, 0.0, 0.5], [1.0, 2.0, 1.0]],
        "stroke_width": 8.0,
    });
    let props = NodeProps::new(&data);
    assert_eq!(props.html(), "<p>hi</p>");
    assert_eq!(props.shape(), "diamond");
    assert_eq!(props.original_width(), Some(640.0));
    assert_eq!(props.original_height(), Some(480.0));
    assert_eq!(props.stroke_width(), 8.0);
    let points = props.points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1], PathPoint(1.0, 2.0, 1.0));
}

#[test]
fn node_props_skips_malformed_points() {
    let data = json!({ "points": [[0.0, 0.0, 0.5], "junk", [1.0, 1.0, 1.0]] });
    let points = NodeProps::new(&data).points();
    assert_eq!(points.len(), 2);
}

// =============================================================
// EdgeProps
// =============================================================

#[test]
fn edge_props_defaults() {
    let data = json!({});
    let props = EdgeProps::new(&data);
    assert_eq!(props.label(), "");
    assert_eq!(props.path_type(), EdgePathType::Step);
    assert_eq!(props.color(), "#6366f1");
}

#[test]
fn edge_props_reads_values() {
    let data = json!({ "label": "depends on", "path_type": "bezier", "color": "#ff0000" });
    let props = EdgeProps::new(&data);
    assert_eq!(props.label(), "depends on");
    assert_eq!(props.path_type(), EdgePathType::Bezier);
    assert_eq!(props.color(), "#ff0000");
}

#[test]
fn edge_props_unknown_path_type_falls_back_to_step() {
    let data = json!({ "path_type": "zigzag" });
    assert_eq!(EdgeProps::new(&data).path_type(), EdgePathType::Step);
}

// =============================================================
// Document lookups
// =============================================================

#[test]
fn document_starts_empty() {
    let doc = Document::new();
    assert!(doc.is_empty());
    assert_eq!(doc.len(), 0);
}

#[test]
fn node_lookup_by_id() {
    let mut doc = Document::new();
    let node = make_node(NodeKind::Text, None);
    let id = node.id.clone();
    doc.nodes.push(node);

    assert!(doc.contains_node(&id));
    assert_eq!(doc.node(&id).unwrap().kind, NodeKind::Text);
    assert!(doc.node("node-missing").is_none());

    doc.node_mut(&id).unwrap().position = Point::new(9.0, 9.0);
    assert_eq!(doc.node(&id).unwrap().position, Point::new(9.0, 9.0));
}

#[test]
fn edge_lookup_by_id() {
    let mut doc = Document::new();
    let edge = make_edge("a", "b");
    let id = edge.id.clone();
    doc.edges.push(edge);

    assert_eq!(doc.edge(&id).unwrap().source, "a");
    assert!(doc.edge("edge-missing").is_none());
}

#[test]
fn selected_nodes_preserve_insertion_order() {
    let mut doc = Document::new();
    let mut a = make_node(NodeKind::Text, None);
    let b = make_node(NodeKind::Shape, None);
    let mut c = make_node(NodeKind::Sticky, None);
    a.selected = true;
    c.selected = true;
    let (a_id, c_id) = (a.id.clone(), c.id.clone());
    doc.nodes.extend([a, b, c]);

    assert_eq!(doc.selected_nodes(), vec![a_id, c_id]);
}

// =============================================================
// Z-index bounds
// =============================================================

#[test]
fn z_bounds_treat_unset_as_zero() {
    let mut doc = Document::new();
    doc.nodes.push(make_node(NodeKind::Text, None));
    doc.nodes.push(make_node(NodeKind::Text, Some(5)));
    doc.nodes.push(make_node(NodeKind::Text, Some(-3)));

    assert_eq!(doc.max_z(), 5);
    assert_eq!(doc.min_z(), -3);
}

#[test]
fn z_bounds_of_empty_document_are_zero() {
    let doc = Document::new();
    assert_eq!(doc.max_z(), 0);
    assert_eq!(doc.min_z(), 0);
}

#[test]
fn z_bounds_never_tighter_than_zero() {
    let mut doc = Document::new();
    doc.nodes.push(make_node(NodeKind::Text, Some(7)));
    // An unset node elsewhere still counts as 0.
    assert_eq!(doc.min_z(), 0);
    doc.nodes.clear();
    doc.nodes.push(make_node(NodeKind::Text, Some(-7)));
    assert_eq!(doc.max_z(), 0);
}

// =============================================================
// Data merge
// =============================================================

#[test]
fn merge_node_data_shallow_merges() {
    let mut doc = Document::new();
    let mut node = make_node(NodeKind::Sticky, None);
    node.data = json!({ "html": "<p>old</p>", "color": "yellow" });
    let id = node.id.clone();
    doc.nodes.push(node);

    assert!(doc.merge_node_data(&id, &json!({ "html": "<p>new</p>" })));
    let data = &doc.node(&id).unwrap().data;
    assert_eq!(data["html"], "<p>new</p>");
    assert_eq!(data["color"], "yellow");
}

#[test]
fn merge_node_data_null_deletes_key() {
    let mut doc = Document::new();
    let mut node = make_node(NodeKind::Sticky, None);
    node.data = json!({ "html": "<p>x</p>", "color": "pink" });
    let id = node.id.clone();
    doc.nodes.push(node);

    assert!(doc.merge_node_data(&id, &json!({ "color": null })));
    assert!(doc.node(&id).unwrap().data.get("color").is_none());
}

#[test]
fn merge_node_data_rejects_non_object() {
    let mut doc = Document::new();
    let node = make_node(NodeKind::Text, None);
    let id = node.id.clone();
    doc.nodes.push(node);

    assert!(!doc.merge_node_data(&id, &json!([1, 2, 3])));
    assert!(!doc.merge_node_data("node-missing", &json!({ "a": 1 })));
}

#[test]
fn merge_edge_data_merges_label() {
    let mut doc = Document::new();
    let edge = make_edge("a", "b");
    let id = edge.id.clone();
    doc.edges.push(edge);

    assert!(doc.merge_edge_data(&id, &json!({ "label": "yes" })));
    assert_eq!(EdgeProps::new(&doc.edge(&id).unwrap().data).label(), "yes");
}

#[test]
fn merge_into_non_object_data_resets_to_object() {
    let mut doc = Document::new();
    let mut node = make_node(NodeKind::Text, None);
    node.data = json!("bare string");
    let id = node.id.clone();
    doc.nodes.push(node);

    assert!(doc.merge_node_data(&id, &json!({ "text": "t" })));
    assert_eq!(doc.node(&id).unwrap().data["text"], "t");
}

// =============================================================
// Collection replacement
// =============================================================

#[test]
fn replace_collections_swaps_wholesale() {
    let mut doc = Document::new();
    doc.nodes.push(make_node(NodeKind::Text, None));
    doc.edges.push(make_edge("a", "b"));

    doc.replace_nodes(vec![make_node(NodeKind::Shape, None), make_node(NodeKind::Path, None)]);
    doc.replace_edges(Vec::new());

    assert_eq!(doc.len(), 2);
    assert!(doc.edges.is_empty());
}
