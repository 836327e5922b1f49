//! The narrow contract with the external synchronization/storage service.
//!
//! The service owns the shared document (two top-level collections), an
//! ephemeral presence channel, and a session-scoped undo/redo history.
//! Every mutation in this crate reduces to one or more whole-collection
//! replacements dispatched through [`SyncStore`]; conflict resolution
//! (field-level last-write-wins) and fan-out to other clients are the
//! service's problem, not ours.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use crate::doc::{Document, Edge, Node};
use crate::presence::Presence;

/// Host-side handle to the sync service.
pub trait SyncStore {
    /// Replace the shared `nodes` collection.
    fn replace_nodes(&mut self, nodes: Vec<Node>);

    /// Replace the shared `edges` collection.
    fn replace_edges(&mut self, edges: Vec<Edge>);

    /// Replace both collections as one atomic update. Observers must never
    /// see one collection replaced without the other.
    fn replace_document(&mut self, nodes: Vec<Node>, edges: Vec<Edge>);

    /// Publish the local user's ephemeral presence.
    fn publish_presence(&mut self, presence: &Presence);

    /// Step the session history back one entry.
    fn undo(&mut self);

    /// Step the session history forward one entry.
    fn redo(&mut self);
}

/// One call observed by [`MemorySync`], in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCall {
    ReplaceNodes,
    ReplaceEdges,
    ReplaceDocument,
    PublishPresence,
    Undo,
    Redo,
}

/// In-memory [`SyncStore`] for single-client sessions and tests. Applies
/// every replacement to a local document and records the call sequence so
/// tests can assert atomicity.
#[derive(Debug, Default)]
pub struct MemorySync {
    /// The document as last written.
    pub document: Document,
    /// Last published presence, if any.
    pub presence: Option<Presence>,
    /// Every call, in order.
    pub calls: Vec<SyncCall>,
}

impl MemorySync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SyncStore for MemorySync {
    fn replace_nodes(&mut self, nodes: Vec<Node>) {
        self.document.nodes = nodes;
        self.calls.push(SyncCall::ReplaceNodes);
    }

    fn replace_edges(&mut self, edges: Vec<Edge>) {
        self.document.edges = edges;
        self.calls.push(SyncCall::ReplaceEdges);
    }

    fn replace_document(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.document.nodes = nodes;
        self.document.edges = edges;
        self.calls.push(SyncCall::ReplaceDocument);
    }

    fn publish_presence(&mut self, presence: &Presence) {
        self.presence = Some(presence.clone());
        self.calls.push(SyncCall::PublishPresence);
    }

    fn undo(&mut self) {
        self.calls.push(SyncCall::Undo);
    }

    fn redo(&mut self) {
        self.calls.push(SyncCall::Redo);
    }
}
