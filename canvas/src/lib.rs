//! Interaction and gesture engine for the org-chart canvas.
//!
//! This crate owns everything between raw pointer/keyboard events and the
//! entities on the canvas: translating input into viewport changes and entity
//! mutations, multi-selection, copy/paste, history capture and present-mode
//! playback, and the backup file format. The host is responsible only for
//! wiring input events to the engine, drawing the [`view::CanvasView`] it is
//! handed, and acting on the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Cards, tracks, templates, and the in-memory store |
//! | [`camera`] | Pan/zoom transform and coordinate conversions |
//! | [`grid`] | Grid snapping |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against entities, track edges and the delete zone |
//! | [`selection`] | Modifier-aware multi-selection |
//! | [`clipboard`] | Copy/paste with chained offsets |
//! | [`history`] | History steps and present-mode playback |
//! | [`capture`] | Pointer capture held for the lifetime of a gesture |
//! | [`view`] | Read-only render projection |
//! | [`backup`] | Backup document and partial restore |
//! | [`consts`] | Shared numeric constants (grid, zoom limits, minimum sizes, etc.) |

pub mod backup;
pub mod camera;
pub mod capture;
pub mod clipboard;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod grid;
pub mod hit;
pub mod history;
pub mod input;
pub mod selection;
pub mod view;
