//! Shared numeric constants for the canvas crate.

// ── Grid ────────────────────────────────────────────────────────

/// Quantization step for positions and sizes, in world units.
pub const GRID_SIZE: f64 = 20.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed viewport scale.
pub const MIN_SCALE: f64 = 0.2;

/// Largest allowed viewport scale.
pub const MAX_SCALE: f64 = 3.0;

/// Multiplier applied to the vertical wheel delta when zooming with Ctrl/Cmd held.
pub const WHEEL_ZOOM_FACTOR: f64 = 0.002;

/// Scale step used by the zoom-in / zoom-out buttons.
pub const BUTTON_ZOOM_STEP: f64 = 0.1;

// ── Tracks ──────────────────────────────────────────────────────

/// A resized track dimension may never shrink below this.
pub const TRACK_MIN_RESIZE: f64 = 100.0;

/// A freshly drawn track smaller than this on either axis is discarded on release.
pub const TRACK_MIN_CREATE: f64 = 50.0;

/// Floor applied to each axis while a track is being drawn, so the outline stays visible.
pub const TRACK_DRAW_FLOOR: f64 = 20.0;

/// Padding between a grouped track and the cards it encloses.
pub const TRACK_PADDING: f64 = 40.0;

/// Name given to tracks created from a selection.
pub const GROUP_TRACK_NAME: &str = "Group";

// ── Cards ───────────────────────────────────────────────────────

/// Footprint of a large card in world units.
pub const CARD_WIDTH_LARGE: f64 = 240.0;
pub const CARD_HEIGHT_LARGE: f64 = 160.0;

/// Footprint of a small card in world units.
pub const CARD_WIDTH_SMALL: f64 = 160.0;
pub const CARD_HEIGHT_SMALL: f64 = 80.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for track resize edges.
pub const HANDLE_RADIUS_PX: f64 = 8.0;
