use super::geometry::{Point, SectorLayout};
use gtk4::gdk::Key;

/// Normalized navigation intent, whatever the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move(i64),
    Activate,
    Back,
}

/// Keyboard mapping. Handled keys must have their default page behavior
/// suppressed by the caller.
pub fn from_key(key: Key) -> Option<Intent> {
    if key == Key::Right || key == Key::Up {
        Some(Intent::Move(1))
    } else if key == Key::Left || key == Key::Down {
        Some(Intent::Move(-1))
    } else if key == Key::Return || key == Key::KP_Enter {
        Some(Intent::Activate)
    } else if key == Key::Escape || key == Key::BackSpace {
        Some(Intent::Back)
    } else {
        None
    }
}

/// Wheel mapping: scroll down advances the selection, so the sign of the raw
/// vertical delta is inverted.
pub fn from_scroll(dy: f64) -> Option<Intent> {
    if dy < 0.0 {
        Some(Intent::Move(1))
    } else if dy > 0.0 {
        Some(Intent::Move(-1))
    } else {
        None
    }
}

/// What the pointer is over, in the coordinate space of one level's layout
/// (origin at the ring center).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// A wedge; `item` is `None` for dummy wedges.
    Wedge { wedge: usize, item: Option<usize> },
    /// The center disk (close/return).
    Center,
    Outside,
}

pub fn pointer_target(layout: &SectorLayout, p: Point) -> PointerTarget {
    if layout.in_center(p) {
        return PointerTarget::Center;
    }
    match layout.wedge_at(p) {
        Some(wedge) => PointerTarget::Wedge {
            wedge,
            item: layout.item_index(wedge),
        },
        None => PointerTarget::Outside,
    }
}
