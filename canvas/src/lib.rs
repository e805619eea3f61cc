//! Interaction engine for the sketchboard canvas.
//!
//! The crate owns everything between raw input and the document: translating
//! pointer, wheel, touch and keyboard events into object mutations, keeping
//! the pan/zoom view, hit-testing, undo/redo history, and turning pasted or
//! dropped content into canvas objects. It never draws. The host reads the
//! session state after each batch of [`engine::Action`]s and renders it.
//!
//! The same object model and [`schema`] checks are used by the server when it
//! stores shared canvases and validates generated objects.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EditorSession`], the input reducer and mutation API |
//! | [`doc`] | Object model and the ordered in-memory document store |
//! | [`camera`] | Points and the screen/world view transform |
//! | [`input`] | Tools, input events, the gesture state machine and its geometry |
//! | [`hit`] | Hit-testing against objects and resize handles |
//! | [`history`] | Cursor-based snapshot history |
//! | [`gesture`] | Multi-touch tracking and pinch detection |
//! | [`animation`] | Eased zoom and rotate animations |
//! | [`ingest`] | Clipboard, image and generated-record ingestion |
//! | [`schema`] | Field-level validation of raw JSON objects |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod animation;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod gesture;
pub mod history;
pub mod hit;
pub mod ingest;
pub mod input;
pub mod schema;
