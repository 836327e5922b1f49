//! Canvas document engine for a realtime collaborative diagram board.
//!
//! This crate owns the board's core: the node/edge data model, the
//! mutation operations that keep a shared document consistent under
//! optimistic concurrent edits, the floating-edge attachment geometry,
//! the tool/interaction state machine, and the image ingestion pipeline.
//! The host wires it to an external sync service (through
//! [`sync::SyncStore`]), an identity provider, and a renderer; none of
//! those live here.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`doc`] | Node/edge data model and the in-memory document |
//! | [`engine`] | Mutation layer: every structural operation, one commit each |
//! | [`router`] | Floating-edge attachment-point geometry |
//! | [`input`] | Tools, shortcuts, and the interaction state machine |
//! | [`image`] | Paste/drop/upload image ingestion |
//! | [`presence`] | Ephemeral per-user state and follow mode |
//! | [`camera`] | Pan/zoom viewport and coordinate conversions |
//! | [`sync`] | Contract with the external sync/storage service |
//! | [`consts`] | Shared numeric constants and defaults |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod image;
pub mod input;
pub mod presence;
pub mod router;
pub mod sync;
