use super::item::MenuItem;
use std::rc::Rc;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum EventKind {
    Open,
    Close,
    Return,
    ItemActivated,
}

/// Notification published to external listeners. `item`/`index` are `None`
/// when not applicable (open/close/return, or activation of a dummy wedge).
#[derive(Debug, Clone)]
pub struct MenuEvent {
    pub kind: EventKind,
    pub item: Option<Rc<MenuItem>>,
    pub index: Option<usize>,
}

impl MenuEvent {
    pub fn bare(kind: EventKind) -> Self {
        Self {
            kind,
            item: None,
            index: None,
        }
    }

    pub fn activated(item: Option<Rc<MenuItem>>, index: Option<usize>) -> Self {
        Self {
            kind: EventKind::ItemActivated,
            item,
            index,
        }
    }
}

/// Fan-out to subscribers over unbounded channels. Dropped receivers are
/// pruned on the next emit.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<async_channel::Sender<MenuEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> async_channel::Receiver<MenuEvent> {
        let (tx, rx) = async_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: MenuEvent) {
        self.subscribers
            .retain(|tx| tx.send_blocking(event.clone()).is_ok());
    }
}
