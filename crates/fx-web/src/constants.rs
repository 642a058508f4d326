// Engine-wide tuning constants.

// Largest per-frame delta fed to the simulation; anything longer (tab
// suspend, debugger pause) is clamped to avoid large-step artifacts.
pub const MAX_FRAME_DT_SEC: f32 = 0.050;

// Resize events are debounced before regenerating layout-heavy effects.
pub const RESIZE_DEBOUNCE_MS: i32 = 120;

// Fallback cap on the effective device pixel ratio when the host supplies
// none.
pub const DEFAULT_MAX_DPR: f64 = 2.5;

// Overlay stacking order; high enough to sit above typical page chrome.
pub const OVERLAY_Z_INDEX: i32 = 2_147_482_000;

// Safety-net teardown fires at durationMs + this buffer even when an
// effect never reaches its own completion condition.
pub const DEFAULT_CLEANUP_BUFFER_MS: f64 = 120.0;

// JS property on an effect's root node holding its disposer.
pub const DISPOSER_PROP: &str = "__fxDispose";
