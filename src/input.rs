//! Input model: tools, keyboard shortcuts, and the interaction state
//! machine.
//!
//! `ToolController` translates pointer, keyboard, and toolbar input into
//! calls on the mutation engine, tracking which placement tool is active,
//! freehand-drawing state, and the transient space-bar pan override. Event
//! methods return the list of [`Action`]s the host must process — commits
//! to relay to the sync service plus host requests (history, cursor,
//! presence republish). All mutating paths are gated on `can_edit` here;
//! the engine itself trusts its caller.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde_json::json;

use crate::camera::{Camera, Point};
use crate::consts::MULTI_IMAGE_STAGGER;
use crate::doc::{NodeId, NodeKind, PathPoint};
use crate::engine::{Commit, EngineCore, ZDirection};
use crate::image::{self, IngestOptions};
use crate::presence::{FollowController, Presence};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Place a text node.
    Text,
    /// Place a sticky note.
    Sticky,
    /// Place a shape node.
    Shape,
    /// Freehand drawing; stays active across strokes.
    Pencil,
}

impl Tool {
    /// Whether this tool places a single node on pane click and then
    /// returns to `Select`.
    #[must_use]
    pub fn is_placement(self) -> bool {
        matches!(self, Self::Text | Self::Sticky | Self::Shape)
    }

    /// The node kind a placement tool creates.
    #[must_use]
    fn placed_kind(self) -> Option<NodeKind> {
        match self {
            Self::Text => Some(NodeKind::Text),
            Self::Sticky => Some(NodeKind::Sticky),
            Self::Shape => Some(NodeKind::Shape),
            Self::Select | Self::Pencil => None,
        }
    }
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// The platform shortcut modifier: Ctrl or Command.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key, by host-reported name (e.g. `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Cursor the host should display over the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// Space held: pan on drag.
    Grab,
    /// A placement or drawing tool is active.
    Crosshair,
}

/// Output of an input event, for the host to process in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Relay this commit to the sync service.
    Committed(Commit),
    /// A node was created locally (placement, stroke start, image drop).
    NodeCreated(NodeId),
    /// Delegate an undo to the session history.
    UndoRequested,
    /// Delegate a redo to the session history.
    RedoRequested,
    /// The board cursor changed.
    CursorChanged(CursorHint),
    /// Local presence changed; republish it.
    PresenceChanged,
    /// Follow mode ended; the local camera is the user's own again.
    FollowEnded,
}

/// The interaction state machine.
#[derive(Debug)]
pub struct ToolController {
    tool: Tool,
    /// Whether the local user may mutate the document (editor role).
    pub can_edit: bool,
    /// Host-reported: focus is inside an editable text field, so
    /// shortcuts and paste interception are suspended.
    pub text_editing: bool,
    space_held: bool,
    /// Path node receiving samples while a stroke is in progress.
    drawing: Option<NodeId>,
    /// Last known pointer position in screen space.
    last_pointer: Option<Point>,
    /// The local user's published presence.
    pub presence: Presence,
    /// Follow-mode state.
    pub follow: FollowController,
}

impl ToolController {
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>, can_edit: bool) -> Self {
        Self {
            tool: Tool::Select,
            can_edit,
            text_editing: false,
            space_held: false,
            drawing: None,
            last_pointer: None,
            presence: Presence::new(name, color),
            follow: FollowController::new(),
        }
    }

    /// The currently active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Whether a freehand stroke is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    /// Whether the space-bar pan override is active.
    #[must_use]
    pub fn pan_override(&self) -> bool {
        self.space_held
    }

    /// Cursor the host should display right now.
    #[must_use]
    pub fn cursor_hint(&self) -> CursorHint {
        if self.space_held {
            CursorHint::Grab
        } else if self.tool.is_placement() || self.tool == Tool::Pencil {
            CursorHint::Crosshair
        } else {
            CursorHint::Default
        }
    }

    /// Activate a tool from the toolbar. Selecting the pencil while it is
    /// already active toggles back to select.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.tool = if tool == Tool::Pencil && self.tool == Tool::Pencil {
            Tool::Select
        } else {
            tool
        };
        if self.tool != Tool::Pencil {
            self.drawing = None;
        }
        vec![Action::CursorChanged(self.cursor_hint())]
    }

    // --- Keyboard ---

    /// Handle a key press.
    pub fn key_down(&mut self, engine: &mut EngineCore, key: &Key, mods: Modifiers) -> Vec<Action> {
        if self.text_editing {
            // Normal typing; the rich text surface owns the event.
            return Vec::new();
        }

        let mut actions = Vec::new();
        match key.0.as_str() {
            "Space" => {
                if !self.space_held {
                    self.space_held = true;
                    actions.push(Action::CursorChanged(CursorHint::Grab));
                }
            }
            "Escape" => {
                self.tool = Tool::Select;
                self.drawing = None;
                if self.follow.is_following() {
                    self.follow.stop();
                    actions.push(Action::FollowEnded);
                }
                actions.push(Action::CursorChanged(self.cursor_hint()));
            }
            "z" if mods.command() && self.can_edit => {
                actions.push(if mods.shift {
                    Action::RedoRequested
                } else {
                    Action::UndoRequested
                });
            }
            "y" if mods.command() && self.can_edit => {
                actions.push(Action::RedoRequested);
            }
            "Delete" | "Backspace" if self.can_edit => {
                let selected = engine.doc.selected_nodes();
                if !selected.is_empty() {
                    let commit = engine.delete_nodes(&selected);
                    self.presence.selected_node_id = None;
                    actions.push(Action::Committed(commit));
                    actions.push(Action::PresenceChanged);
                }
            }
            "d" if mods.command() && self.can_edit => {
                if let Some(first) = engine.doc.selected_nodes().first() {
                    if let Some((id, commit)) = engine.duplicate_node(first) {
                        actions.push(Action::NodeCreated(id));
                        actions.push(Action::Committed(commit));
                    }
                }
            }
            "]" if mods.command() && self.can_edit => {
                if let Some(first) = engine.doc.selected_nodes().first() {
                    let commit = engine.set_node_z_index(first, ZDirection::Front);
                    actions.push(Action::Committed(commit));
                }
            }
            "[" if mods.command() && self.can_edit => {
                if let Some(first) = engine.doc.selected_nodes().first() {
                    let commit = engine.set_node_z_index(first, ZDirection::Back);
                    actions.push(Action::Committed(commit));
                }
            }
            _ => {}
        }
        actions
    }

    /// Handle a key release.
    pub fn key_up(&mut self, key: &Key) -> Vec<Action> {
        if key.0 == "Space" && self.space_held {
            self.space_held = false;
            return vec![Action::CursorChanged(self.cursor_hint())];
        }
        Vec::new()
    }

    /// The window lost focus: the pan override must not latch.
    pub fn window_blur(&mut self) -> Vec<Action> {
        if self.space_held {
            self.space_held = false;
            return vec![Action::CursorChanged(self.cursor_hint())];
        }
        Vec::new()
    }

    // --- Pointer ---

    /// A click landed on empty canvas. Placement tools place one node at
    /// the click position and revert to select.
    pub fn pane_click(&mut self, engine: &mut EngineCore, world: Point) -> Vec<Action> {
        if !self.can_edit || self.space_held {
            return Vec::new();
        }
        let Some(kind) = self.tool.placed_kind() else {
            return Vec::new();
        };

        let (id, commit) = engine.add_node(kind, world, None);
        self.tool = Tool::Select;
        vec![
            Action::NodeCreated(id),
            Action::Committed(commit),
            Action::CursorChanged(self.cursor_hint()),
        ]
    }

    /// Pointer pressed. In pencil mode this starts a stroke: a new path
    /// node seeded with one sample, tracked as the current path.
    pub fn pointer_down(
        &mut self,
        engine: &mut EngineCore,
        camera: &Camera,
        screen: Point,
        button: PointerButton,
        pressure: f64,
    ) -> Vec<Action> {
        if self.tool != Tool::Pencil
            || !self.can_edit
            || self.space_held
            || button != PointerButton::Primary
        {
            return Vec::new();
        }

        let world = camera.screen_to_world(screen);
        let (id, commit) = engine.add_node(
            NodeKind::Path,
            world,
            Some(json!({
                "points": [[world.x, world.y, pressure]],
                "color": self.presence.color,
            })),
        );
        self.drawing = Some(id.clone());
        vec![Action::NodeCreated(id), Action::Committed(commit)]
    }

    /// Pointer moved. Tracks the pointer for presence and insert
    /// positions, and appends a sample to the current stroke.
    pub fn pointer_move(
        &mut self,
        engine: &mut EngineCore,
        camera: &Camera,
        screen: Point,
        pressure: f64,
    ) -> Vec<Action> {
        if self.follow.is_following() {
            // The camera isn't ours while following; don't broadcast a
            // cursor against someone else's viewport.
            return Vec::new();
        }

        self.last_pointer = Some(screen);
        self.presence.cursor = Some(screen);
        let mut actions = vec![Action::PresenceChanged];

        if let Some(path_id) = self.drawing.clone() {
            let world = camera.screen_to_world(screen);
            let commit = engine.push_point_to_path(&path_id, PathPoint(world.x, world.y, pressure));
            if commit != Commit::None {
                actions.push(Action::Committed(commit));
            }
        }
        actions
    }

    /// Pointer released or cancelled: ends the current stroke. The pencil
    /// stays active for the next stroke.
    pub fn pointer_up(&mut self) -> Vec<Action> {
        self.drawing = None;
        Vec::new()
    }

    /// Pointer left the board: hide the remote cursor and end any stroke.
    pub fn pointer_leave(&mut self) -> Vec<Action> {
        self.drawing = None;
        self.presence.cursor = None;
        vec![Action::PresenceChanged]
    }

    // --- Presence plumbing ---

    /// The local selection changed (click or marquee, after the engine
    /// applied the change batch): refresh published presence.
    pub fn selection_changed(&mut self, engine: &EngineCore) -> Vec<Action> {
        self.presence.selected_node_id = engine.doc.selected_nodes().into_iter().next();
        vec![Action::PresenceChanged]
    }

    /// The local viewport settled after a pan/zoom: publish it for
    /// followers.
    pub fn viewport_changed(&mut self, camera: Camera) -> Vec<Action> {
        self.presence.viewport = Some(camera);
        vec![Action::PresenceChanged]
    }

    /// Toggle following another participant.
    pub fn toggle_follow(&mut self, connection_id: u64) -> Vec<Action> {
        self.follow.toggle(connection_id);
        if self.follow.is_following() {
            Vec::new()
        } else {
            vec![Action::FollowEnded]
        }
    }

    // --- Image ingestion ---

    /// Clipboard paste carrying image bytes. Skipped while a text field
    /// has focus so normal paste semantics apply.
    pub fn paste_image(
        &mut self,
        engine: &mut EngineCore,
        camera: &Camera,
        viewport: (f64, f64),
        bytes: &[u8],
    ) -> Vec<Action> {
        if self.text_editing {
            return Vec::new();
        }
        self.ingest_images(engine, camera, viewport, &[bytes])
    }

    /// Image files dropped on the board at a screen position.
    pub fn drop_images(
        &mut self,
        engine: &mut EngineCore,
        camera: &Camera,
        viewport: (f64, f64),
        screen: Point,
        blobs: &[&[u8]],
    ) -> Vec<Action> {
        if !blobs.is_empty() {
            self.last_pointer = Some(screen);
        }
        self.ingest_images(engine, camera, viewport, blobs)
    }

    /// Image files chosen from the toolbar's file picker, or any other
    /// source without its own pointer position.
    ///
    /// Each blob runs through the ingestion pipeline and lands at the last
    /// known pointer position (falling back to the viewport center),
    /// staggered so multiple files don't stack exactly.
    pub fn ingest_images(
        &mut self,
        engine: &mut EngineCore,
        camera: &Camera,
        viewport: (f64, f64),
        blobs: &[&[u8]],
    ) -> Vec<Action> {
        if !self.can_edit {
            return Vec::new();
        }

        let base = self
            .last_pointer
            .map_or_else(|| camera.world_center(viewport.0, viewport.1), |screen| {
                camera.screen_to_world(screen)
            });

        let mut actions = Vec::new();
        for (index, bytes) in blobs.iter().enumerate() {
            let ingested = image::ingest(bytes, &IngestOptions::default());
            #[allow(clippy::cast_precision_loss)]
            let offset = MULTI_IMAGE_STAGGER * index as f64;
            let (id, commit) = engine.add_node(
                NodeKind::Image,
                Point::new(base.x + offset, base.y + offset),
                Some(json!({
                    "url": ingested.data_url,
                    "original_width": ingested.width,
                    "original_height": ingested.height,
                })),
            );
            actions.push(Action::NodeCreated(id));
            actions.push(Action::Committed(commit));
        }
        actions
    }
}
