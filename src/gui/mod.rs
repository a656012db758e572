pub mod app;
pub mod icon;
pub mod theme;
pub mod view;
pub mod window;

pub const ICON_SIZE: i32 = 64;

// Per-phase level rendering: inert parents recede outward and fade, a level
// still entering or on its way out is drawn slightly shrunk.
pub const INERT_LEVEL_SCALE: f64 = 1.3;
pub const INERT_LEVEL_ALPHA: f64 = 0.35;
pub const ENTERING_LEVEL_SCALE: f64 = 0.85;
pub const ENTERING_LEVEL_ALPHA: f64 = 0.7;
pub const EXITING_LEVEL_SCALE: f64 = 0.85;
pub const EXITING_LEVEL_ALPHA: f64 = 0.4;

pub const GLYPH_LINE_WIDTH: f64 = 2.0;
