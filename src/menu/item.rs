use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Unique within its sibling list, not globally.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemId(String);

crate::impl_string_newtype!(ItemId);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ExecCommand(String);

crate::impl_string_newtype!(ExecCommand);

/// One entry of the menu tree. An item with no children is a leaf; an item
/// whose `children` list is empty is also treated as a leaf and never becomes
/// a drill-down target.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub id: ItemId,
    pub title: Option<String>,
    pub icon: Option<IconName>,
    pub exec: Option<ExecCommand>,
    pub children: Vec<Rc<MenuItem>>,
}

impl MenuItem {
    pub fn leaf(id: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            id: ItemId::new(id),
            title: None,
            icon: None,
            exec: None,
            children: Vec::new(),
        })
    }

    pub fn with_children(id: impl Into<String>, children: Vec<Rc<MenuItem>>) -> Rc<Self> {
        Rc::new(Self {
            id: ItemId::new(id),
            title: None,
            icon: None,
            exec: None,
            children,
        })
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Display text, falling back to the id when no title was configured.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(self.id.as_ref())
    }
}
