use super::event::{EventBus, EventKind, MenuEvent};
use super::geometry::SectorLayout;
use super::item::MenuItem;
use super::selection::Selection;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelId(u64);

/// Per-level lifecycle. A level enters small ("inner"), settles active, is
/// parked inert while a child is on top, and deactivates on its way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    Entering,
    Active,
    Inert,
    Deactivating,
}

/// Materialized state of one depth of the menu: the sibling list on display,
/// its sector layout, and the highlighted index.
pub struct Level {
    id: LevelId,
    items: Vec<Rc<MenuItem>>,
    layout: SectorLayout,
    selection: Selection,
    phase: LevelPhase,
}

impl Level {
    fn new(id: LevelId, items: Vec<Rc<MenuItem>>, radius: f64) -> Self {
        let layout = SectorLayout::new(items.len(), radius);
        Self {
            id,
            items,
            layout,
            selection: Selection::start(),
            phase: LevelPhase::Entering,
        }
    }

    pub fn id(&self) -> LevelId {
        self.id
    }

    pub fn items(&self) -> &[Rc<MenuItem>] {
        &self.items
    }

    pub fn layout(&self) -> &SectorLayout {
        &self.layout
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.index()
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    fn is_interactive(&self) -> bool {
        matches!(self.phase, LevelPhase::Entering | LevelPhase::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPhase {
    Closed,
    Open,
    Transitioning,
}

/// Navigation state machine over a stack of levels, root at the bottom.
///
/// Only the topmost interactive level reacts to intents; parents beneath it
/// are inert visuals kept for the back transition. Animated visual changes
/// are an abstract awaitable: mutating operations return the [`LevelId`]s
/// whose transition the host must complete via [`Menu::complete_transition`]
/// (from an animation timer, or a deferred tick when animations are
/// disabled). Structurally invalid input is silently ignored; the machine
/// stays in its last consistent state.
pub struct Menu {
    root: Vec<Rc<MenuItem>>,
    radius: f64,
    close_on_click: bool,
    stack: Vec<Level>,
    phase: MenuPhase,
    closing: bool,
    next_id: u64,
    bus: EventBus,
}

impl Menu {
    pub fn new(root: Vec<Rc<MenuItem>>, radius: f64, close_on_click: bool) -> Self {
        Self {
            root,
            radius,
            close_on_click,
            stack: Vec::new(),
            phase: MenuPhase::Closed,
            closing: false,
            next_id: 0,
            bus: EventBus::new(),
        }
    }

    pub fn subscribe(&mut self) -> async_channel::Receiver<MenuEvent> {
        self.bus.subscribe()
    }

    pub fn phase(&self) -> MenuPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == MenuPhase::Closed
    }

    pub fn levels(&self) -> &[Level] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The one level that reacts to intents, if any.
    pub fn interactive(&self) -> Option<&Level> {
        self.interactive_index().map(|i| &self.stack[i])
    }

    pub fn interactive_index(&self) -> Option<usize> {
        self.stack.iter().rposition(Level::is_interactive)
    }

    fn alloc_id(&mut self) -> LevelId {
        self.next_id += 1;
        LevelId(self.next_id)
    }

    /// Swaps in a new item tree and layout parameters (config reload). Any
    /// open menu is dropped without transition so the next open shows the
    /// new tree.
    pub fn reconfigure(&mut self, root: Vec<Rc<MenuItem>>, radius: f64, close_on_click: bool) {
        self.root = root;
        self.radius = radius;
        self.close_on_click = close_on_click;
        self.stack.clear();
        self.closing = false;
        self.phase = MenuPhase::Closed;
    }

    /// Opens the menu, optionally drilled to a nested level given as a path
    /// of child indices into the root tree. Path resolution is permissive: a
    /// segment that is out of range or names a leaf stops the walk at the
    /// deepest valid level. No-op unless the menu is closed.
    pub fn open(&mut self, path: Option<&[usize]>) -> Vec<LevelId> {
        if self.phase != MenuPhase::Closed {
            return Vec::new();
        }

        let id = self.alloc_id();
        let mut chain = vec![Level::new(id, self.root.clone(), self.radius)];
        for &step in path.unwrap_or_default() {
            let child_items = match chain.last().and_then(|l| l.items.get(step)) {
                Some(item) if item.has_children() => item.children.clone(),
                _ => break,
            };
            let id = self.alloc_id();
            if let Some(parent) = chain.last_mut() {
                parent.phase = LevelPhase::Inert;
                let count = parent.items.len();
                parent.selection.set(step, count);
            }
            chain.push(Level::new(id, child_items, self.radius));
        }

        let pending = chain.iter().rev().take(1).map(Level::id).collect();
        self.stack = chain;
        self.closing = false;
        self.phase = MenuPhase::Transitioning;
        self.bus.emit(MenuEvent::bare(EventKind::Open));
        pending
    }

    /// Steps the highlighted sector of the interactive level. Returns whether
    /// anything changed (redraw hint).
    pub fn move_selection(&mut self, delta: i64) -> bool {
        let Some(i) = self.interactive_index() else {
            return false;
        };
        let level = &mut self.stack[i];
        let before = level.selection.index();
        let count = level.items.len();
        level.selection.move_by(delta, count);
        level.selection.index() != before
    }

    /// Direct selection from pointer hover/press; ignored out of range.
    pub fn set_selection(&mut self, index: usize) -> bool {
        let Some(i) = self.interactive_index() else {
            return false;
        };
        let level = &mut self.stack[i];
        let before = level.selection.index();
        let count = level.items.len();
        level.selection.set(index, count);
        level.selection.index() != before
    }

    /// Resolves the current selection: items with children drill down,
    /// leaves close the menu when configured to. Always emits item-activated,
    /// with a null item when nothing (or a dummy wedge) was resolved.
    pub fn activate_selection(&mut self) -> Vec<LevelId> {
        let Some(i) = self.interactive_index() else {
            return Vec::new();
        };
        let level = &self.stack[i];
        let index = level.selection.index();
        let item = index.and_then(|s| level.items.get(s).cloned());

        self.bus.emit(MenuEvent::activated(item.clone(), index));

        match item {
            Some(item) if item.has_children() => self.drill_down(item),
            Some(_) if self.close_on_click => self.close(),
            _ => Vec::new(),
        }
    }

    fn drill_down(&mut self, item: Rc<MenuItem>) -> Vec<LevelId> {
        let Some(i) = self.interactive_index() else {
            return Vec::new();
        };
        self.stack[i].phase = LevelPhase::Inert;
        let id = self.alloc_id();
        self.stack.push(Level::new(id, item.children.clone(), self.radius));
        self.phase = MenuPhase::Transitioning;
        vec![id]
    }

    /// Return to the parent level. The parent becomes interactive right away;
    /// the departing level is detached only once its deactivation transition
    /// completes. Falls through to [`Menu::close`] at the root.
    pub fn drill_up(&mut self) -> Vec<LevelId> {
        let Some(i) = self.interactive_index() else {
            return Vec::new();
        };
        if i == 0 {
            return self.close();
        }
        self.stack[i].phase = LevelPhase::Deactivating;
        self.stack[i - 1].phase = LevelPhase::Active;
        self.phase = MenuPhase::Transitioning;
        self.bus.emit(MenuEvent::bare(EventKind::Return));
        vec![self.stack[i].id]
    }

    /// The back intent: drill up when a parent exists, close otherwise.
    pub fn back_or_close(&mut self) -> Vec<LevelId> {
        match self.interactive_index() {
            Some(i) if i > 0 => self.drill_up(),
            Some(_) => self.close(),
            None => Vec::new(),
        }
    }

    /// Closes the menu. Inert parents are discarded immediately; the
    /// interactive level animates out, and the close event fires once its
    /// transition completes. No-op when already closed or closing.
    pub fn close(&mut self) -> Vec<LevelId> {
        if self.phase == MenuPhase::Closed || self.closing {
            return Vec::new();
        }
        let Some(i) = self.interactive_index() else {
            return Vec::new();
        };
        let keep = self.stack[i].id;
        self.stack.retain(|l| l.id == keep);
        if let Some(top) = self.stack.last_mut() {
            top.phase = LevelPhase::Deactivating;
        }
        self.closing = true;
        self.phase = MenuPhase::Transitioning;
        vec![keep]
    }

    /// Host callback: the visual transition of `id` finished. Unknown ids
    /// (already-removed levels, superseded transitions) are a no-op.
    pub fn complete_transition(&mut self, id: LevelId) {
        let Some(pos) = self.stack.iter().position(|l| l.id == id) else {
            return;
        };
        match self.stack[pos].phase {
            LevelPhase::Entering => {
                self.stack[pos].phase = LevelPhase::Active;
                self.settle();
            }
            LevelPhase::Deactivating => {
                self.stack.remove(pos);
                if self.closing && self.stack.is_empty() {
                    self.closing = false;
                    self.phase = MenuPhase::Closed;
                    self.bus.emit(MenuEvent::bare(EventKind::Close));
                } else {
                    self.settle();
                }
            }
            LevelPhase::Active | LevelPhase::Inert => {}
        }
    }

    fn settle(&mut self) {
        if self.closing {
            return;
        }
        let in_flight = self
            .stack
            .iter()
            .any(|l| matches!(l.phase, LevelPhase::Entering | LevelPhase::Deactivating));
        self.phase = if in_flight {
            MenuPhase::Transitioning
        } else if self.stack.is_empty() {
            MenuPhase::Closed
        } else {
            MenuPhase::Open
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::item::MenuItem;

    fn leaves(n: usize) -> Vec<Rc<MenuItem>> {
        (0..n).map(|i| MenuItem::leaf(format!("item{i}"))).collect()
    }

    macro_rules! settle {
        ($menu:expr, $pending:expr) => {
            for id in $pending {
                $menu.complete_transition(id);
            }
        };
    }

    fn events(rx: &async_channel::Receiver<MenuEvent>) -> Vec<EventKind> {
        std::iter::from_fn(|| rx.try_recv().ok().map(|e| e.kind)).collect()
    }

    #[test]
    fn open_selects_root_index_zero() {
        for path in [None, Some(&[][..])] {
            let mut menu = Menu::new(leaves(4), 50.0, true);
            let pending = menu.open(path);
            settle!(menu, pending);
            assert_eq!(menu.phase(), MenuPhase::Open);
            assert_eq!(menu.depth(), 1);
            assert_eq!(menu.interactive().and_then(Level::selected), Some(0));
        }
    }

    #[test]
    fn open_while_open_is_ignored() {
        let mut menu = Menu::new(leaves(4), 50.0, true);
        let rx = menu.subscribe();
        let pending = menu.open(None);
        assert!(menu.open(None).is_empty());
        settle!(menu, pending);
        assert!(menu.open(None).is_empty());
        assert_eq!(events(&rx), vec![EventKind::Open]);
    }

    #[test]
    fn leaf_activation_closes_when_configured() {
        let mut menu = Menu::new(leaves(4), 50.0, true);
        let rx = menu.subscribe();
        settle!(menu, menu.open(None));

        assert!(menu.move_selection(1));
        assert_eq!(menu.interactive().and_then(Level::selected), Some(1));

        let pending = menu.activate_selection();
        assert_eq!(menu.phase(), MenuPhase::Transitioning);
        settle!(menu, pending);

        assert_eq!(menu.phase(), MenuPhase::Closed);
        assert_eq!(menu.depth(), 0);
        let kinds = events(&rx);
        assert_eq!(
            kinds,
            vec![EventKind::Open, EventKind::ItemActivated, EventKind::Close]
        );
    }

    #[test]
    fn item_activated_carries_the_resolved_item() {
        let mut menu = Menu::new(leaves(4), 50.0, true);
        let rx = menu.subscribe();
        settle!(menu, menu.open(None));
        menu.move_selection(1);
        settle!(menu, menu.activate_selection());

        let activated = std::iter::from_fn(|| rx.try_recv().ok())
            .find(|e| e.kind == EventKind::ItemActivated)
            .unwrap();
        assert_eq!(activated.index, Some(1));
        assert_eq!(activated.item.unwrap().id.as_ref(), "item1");
    }

    #[test]
    fn drill_down_and_back_restores_the_parent() {
        let root = vec![
            MenuItem::leaf("a"),
            MenuItem::with_children("b", vec![MenuItem::leaf("c"), MenuItem::leaf("d")]),
        ];
        let mut menu = Menu::new(root, 50.0, false);
        let rx = menu.subscribe();
        settle!(menu, menu.open(None));

        menu.move_selection(1);
        let pending = menu.activate_selection();
        assert_eq!(menu.depth(), 2);
        settle!(menu, pending);
        assert_eq!(menu.phase(), MenuPhase::Open);

        let child = menu.interactive().unwrap();
        assert_eq!(child.items().len(), 2);
        assert_eq!(child.items()[0].id.as_ref(), "c");
        assert_eq!(child.selected(), Some(0));

        let pending = menu.back_or_close();
        // parent interactive again before the child detaches
        assert_eq!(menu.interactive().unwrap().items().len(), 2);
        assert_eq!(menu.depth(), 2);
        settle!(menu, pending);

        assert_eq!(menu.depth(), 1);
        assert_eq!(menu.phase(), MenuPhase::Open);
        let parent = menu.interactive().unwrap();
        assert_eq!(parent.items()[1].id.as_ref(), "b");
        let sel = parent.selected().unwrap();
        assert!(sel < parent.items().len());

        let kinds = events(&rx);
        assert_eq!(
            kinds,
            vec![EventKind::Open, EventKind::ItemActivated, EventKind::Return]
        );
        assert!(!kinds.contains(&EventKind::Close));
    }

    #[test]
    fn leaf_activation_keeps_menu_open_without_close_on_click() {
        let mut menu = Menu::new(leaves(3), 50.0, false);
        settle!(menu, menu.open(None));
        let pending = menu.activate_selection();
        assert!(pending.is_empty());
        assert_eq!(menu.phase(), MenuPhase::Open);
    }

    #[test]
    fn open_path_resolves_permissively() {
        let root = vec![
            MenuItem::leaf("a"),
            MenuItem::with_children(
                "b",
                vec![
                    MenuItem::leaf("c"),
                    MenuItem::with_children("d", vec![MenuItem::leaf("e")]),
                ],
            ),
        ];

        // full path: root -> b -> d
        let mut menu = Menu::new(root.clone(), 50.0, true);
        settle!(menu, menu.open(Some(&[1, 1])));
        assert_eq!(menu.depth(), 3);
        assert_eq!(menu.interactive().unwrap().items()[0].id.as_ref(), "e");

        // stops at "b": index 0 there is a leaf
        let mut menu = Menu::new(root.clone(), 50.0, true);
        settle!(menu, menu.open(Some(&[1, 0, 5])));
        assert_eq!(menu.depth(), 2);

        // first segment out of range: stays at root
        let mut menu = Menu::new(root, 50.0, true);
        settle!(menu, menu.open(Some(&[9])));
        assert_eq!(menu.depth(), 1);
        assert_eq!(menu.interactive().and_then(Level::selected), Some(0));
    }

    #[test]
    fn close_discards_parents_immediately_and_animates_the_top() {
        let root = vec![MenuItem::with_children(
            "b",
            vec![MenuItem::leaf("c"), MenuItem::leaf("d")],
        )];
        let mut menu = Menu::new(root, 50.0, false);
        let rx = menu.subscribe();
        settle!(menu, menu.open(None));
        // drill into "b" (wedge mapping aside, index 0 is the only item)
        settle!(menu, menu.activate_selection());
        assert_eq!(menu.depth(), 2);

        let pending = menu.close();
        assert_eq!(menu.depth(), 1);
        assert_eq!(menu.phase(), MenuPhase::Transitioning);
        // no close event until the transition completes
        assert!(!events(&rx).contains(&EventKind::Close));

        settle!(menu, pending);
        assert_eq!(menu.phase(), MenuPhase::Closed);
        assert_eq!(events(&rx), vec![EventKind::Close]);
    }

    #[test]
    fn double_close_is_a_noop() {
        let mut menu = Menu::new(leaves(2), 50.0, true);
        let rx = menu.subscribe();
        settle!(menu, menu.open(None));
        let pending = menu.close();
        assert!(menu.close().is_empty());
        settle!(menu, pending);
        assert!(menu.close().is_empty());
        assert_eq!(events(&rx), vec![EventKind::Open, EventKind::Close]);
    }

    #[test]
    fn complete_transition_is_idempotent_for_removed_levels() {
        let mut menu = Menu::new(leaves(2), 50.0, true);
        let pending = menu.open(None);
        let id = pending[0];
        settle!(menu, pending);
        // level settled; further completions must change nothing
        menu.complete_transition(id);
        assert_eq!(menu.phase(), MenuPhase::Open);

        let pending = menu.close();
        settle!(menu, pending.clone());
        menu.complete_transition(pending[0]);
        assert_eq!(menu.phase(), MenuPhase::Closed);
    }

    #[test]
    fn intents_are_accepted_while_transitioning() {
        let mut menu = Menu::new(leaves(4), 50.0, true);
        let pending = menu.open(None);
        assert_eq!(menu.phase(), MenuPhase::Transitioning);
        // still-entering level already takes input
        assert!(menu.move_selection(1));
        assert_eq!(menu.interactive().and_then(Level::selected), Some(1));
        settle!(menu, pending);
    }

    #[test]
    fn intents_are_ignored_while_closed() {
        let mut menu = Menu::new(leaves(4), 50.0, true);
        assert!(!menu.move_selection(1));
        assert!(!menu.set_selection(2));
        assert!(menu.activate_selection().is_empty());
        assert!(menu.back_or_close().is_empty());
        assert_eq!(menu.phase(), MenuPhase::Closed);
    }

    #[test]
    fn activation_with_no_selection_emits_null_item() {
        let mut menu = Menu::new(leaves(2), 50.0, true);
        settle!(menu, menu.open(None));
        let rx = menu.subscribe();
        // force the still-rendering-first-frame shape
        if let Some(i) = menu.interactive_index() {
            menu.stack[i].selection = Selection::none();
        }
        let pending = menu.activate_selection();
        assert!(pending.is_empty());
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::ItemActivated);
        assert!(ev.item.is_none());
        assert_eq!(ev.index, None);
        assert_eq!(menu.phase(), MenuPhase::Open);
    }

    #[test]
    fn close_supersedes_a_pending_drill_up() {
        let root = vec![MenuItem::with_children(
            "b",
            vec![MenuItem::leaf("c")],
        )];
        let mut menu = Menu::new(root, 50.0, false);
        settle!(menu, menu.open(None));
        settle!(menu, menu.activate_selection());
        let up = menu.drill_up();
        // close before the drill-up transition finishes
        let pending = menu.close();
        settle!(menu, pending);
        assert_eq!(menu.phase(), MenuPhase::Closed);
        // the abandoned drill-up callback hits a removed level: no-op
        settle!(menu, up);
        assert_eq!(menu.phase(), MenuPhase::Closed);
        assert_eq!(menu.depth(), 0);
    }

    #[test]
    fn reconfigure_drops_an_open_menu() {
        let mut menu = Menu::new(leaves(4), 50.0, true);
        settle!(menu, menu.open(None));
        menu.reconfigure(leaves(2), 50.0, true);
        assert!(menu.is_closed());
        settle!(menu, menu.open(None));
        assert_eq!(menu.interactive().unwrap().items().len(), 2);
    }
}
