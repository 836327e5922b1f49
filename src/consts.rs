//! Shared numeric constants and defaults for the board engine.

// ── Node sizing ─────────────────────────────────────────────────

/// Default width for a freshly placed text node, in world units.
pub const TEXT_NODE_WIDTH: f64 = 220.0;

/// Default side length for a freshly placed shape node.
pub const SHAPE_NODE_SIZE: f64 = 120.0;

/// Widest an image node is allowed to render at creation time.
pub const IMAGE_MAX_RENDERED_WIDTH: f64 = 420.0;

/// Minimum rendered width for an image node, so a tiny or errored image
/// still has a usable hit target.
pub const IMAGE_MIN_RENDERED_WIDTH: f64 = 220.0;

/// Minimum rendered height for an image node.
pub const IMAGE_MIN_RENDERED_HEIGHT: f64 = 180.0;

/// Width assigned to an image node whose pixel dimensions are unknown.
pub const IMAGE_UNSIZED_WIDTH: f64 = 260.0;

// ── Mutations ───────────────────────────────────────────────────

/// Offset applied on both axes when duplicating a node.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Per-file offset when several images are ingested in one gesture.
pub const MULTI_IMAGE_STAGGER: f64 = 24.0;

// ── Geometry router ─────────────────────────────────────────────

/// One center-to-center axis must dominate the other by more than this
/// ratio before an edge snaps to directly facing sides.
pub const DOMINANT_AXIS_RATIO: f64 = 1.4;

// ── Image ingestion ─────────────────────────────────────────────

/// Longest edge of an ingested image after downscaling, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 1800;

/// Lossy re-encode quality in `[0, 1]`.
pub const IMAGE_QUALITY: f32 = 0.85;

/// Placeholder width reported when an image's dimensions cannot be read.
pub const FALLBACK_IMAGE_WIDTH: u32 = 800;

/// Placeholder height reported when an image's dimensions cannot be read.
pub const FALLBACK_IMAGE_HEIGHT: u32 = 600;

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

// ── Styling defaults ────────────────────────────────────────────

/// Default stroke/marker color for edges (indigo).
pub const DEFAULT_EDGE_COLOR: &str = "#6366f1";

/// Default stroke color for freehand paths (slate).
pub const DEFAULT_PATH_COLOR: &str = "#0f172a";

/// Default freehand stroke width in world units.
pub const DEFAULT_STROKE_WIDTH: f64 = 4.0;

/// Initial rich content for text, sticky, and shape nodes.
pub const DEFAULT_NODE_HTML: &str = "<p>Double-click to edit...</p>";

/// Rich content seeded into the node created by a drag-to-create gesture.
pub const CONNECT_NODE_HTML: &str = "<p>New Idea</p>";

// ── Presence ────────────────────────────────────────────────────

/// Palette of cursor colors assigned deterministically per user id.
pub const PRESENCE_COLORS: [&str; 8] = [
    "#DC2626", "#D97706", "#059669", "#7C3AED",
    "#DB2777", "#2563EB", "#EA580C", "#65A30D",
];
