pub mod event;
pub mod geometry;
pub mod input;
pub mod item;
pub mod nav;
pub mod selection;

pub use event::{EventBus, EventKind, MenuEvent};
pub use geometry::{Point, SectorLayout, polar_to_cartesian, resolve_loop_index};
pub use input::{Intent, PointerTarget};
pub use item::{ExecCommand, IconName, ItemId, MenuItem};
pub use nav::{Level, LevelId, LevelPhase, Menu, MenuPhase};
pub use selection::Selection;

pub const DEFAULT_SIZE: f64 = 300.0;
pub const DEFAULT_RADIUS: f64 = 50.0;
pub const MINIMUM_SECTORS: usize = 6;
pub const INNER_RADIUS_RATIO: f64 = 0.4; // inner ring edge
pub const SECTOR_SPACING_RATIO: f64 = 0.06; // apparent gap between wedges
