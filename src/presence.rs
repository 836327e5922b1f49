//! Ephemeral per-connection presence and follow mode.
//!
//! Presence is what other participants see about the local user — cursor,
//! display name, color, current selection, and viewport — broadcast over
//! the sync service's presence channel and never persisted. Follow mode
//! drives the local camera to match another participant's published
//! viewport.

#[cfg(test)]
#[path = "presence_test.rs"]
mod presence_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Point};
use crate::consts::PRESENCE_COLORS;
use crate::doc::NodeId;

/// Identifier of one live connection to the session, assigned by the
/// sync service.
pub type ConnectionId = u64;

/// The local user's ephemeral state, as published to other participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presence {
    /// Cursor position in screen space, or `None` when the pointer has
    /// left the board.
    pub cursor: Option<Point>,
    /// Display name shown on the cursor badge.
    pub name: String,
    /// Cursor/selection color, assigned per user id.
    pub color: String,
    /// First node of the user's current selection, for remote highlight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_node_id: Option<NodeId>,
    /// The user's current viewport, for follow mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Camera>,
}

impl Presence {
    /// Fresh presence for a user joining the session.
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            cursor: None,
            name: name.into(),
            color: color.into(),
            selected_node_id: None,
            viewport: None,
        }
    }
}

/// Deterministic presence color for a user id: byte-sum of the id modulo
/// the palette size, so every client computes the same color without
/// coordination.
#[must_use]
pub fn color_for_user(user_id: &str) -> &'static str {
    let sum = user_id
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_add(u32::from(b)));
    PRESENCE_COLORS[sum as usize % PRESENCE_COLORS.len()]
}

/// Remote selection highlight: which node to ring, in whose color.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionHighlight {
    pub node_id: NodeId,
    pub color: String,
}

/// Selection highlights for every remote participant with a selection.
#[must_use]
pub fn selection_highlights(others: &HashMap<ConnectionId, Presence>) -> Vec<SelectionHighlight> {
    let mut highlights: Vec<SelectionHighlight> = others
        .iter()
        .filter_map(|(_, p)| {
            p.selected_node_id.as_ref().map(|id| SelectionHighlight {
                node_id: id.clone(),
                color: p.color.clone(),
            })
        })
        .collect();
    // HashMap iteration order is arbitrary; keep the output stable.
    highlights.sort_by(|a, b| a.node_id.cmp(&b.node_id));
    highlights
}

/// Tracks which participant (if any) the local viewport is following.
#[derive(Debug, Clone, Default)]
pub struct FollowController {
    following: Option<ConnectionId>,
}

impl FollowController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The connection currently being followed, if any.
    #[must_use]
    pub fn target(&self) -> Option<ConnectionId> {
        self.following
    }

    /// Whether follow mode is active.
    #[must_use]
    pub fn is_following(&self) -> bool {
        self.following.is_some()
    }

    /// Toggle following the given connection: following someone else
    /// switches to them, toggling the current target stops.
    pub fn toggle(&mut self, connection_id: ConnectionId) {
        if self.following == Some(connection_id) {
            self.following = None;
        } else {
            self.following = Some(connection_id);
        }
    }

    /// Stop following.
    pub fn stop(&mut self) {
        self.following = None;
    }

    /// The viewport the local camera should adopt this frame, if follow
    /// mode is active and the target has published one. A target with no
    /// published viewport (or one that has left) leaves the camera alone
    /// without ending follow mode.
    #[must_use]
    pub fn viewport_to_apply(
        &self,
        others: &HashMap<ConnectionId, Presence>,
    ) -> Option<Camera> {
        let target = self.following?;
        others.get(&target)?.viewport
    }
}
