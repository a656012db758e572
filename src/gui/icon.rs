use super::ICON_SIZE;
use crate::menu::IconName;
use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_ref());
    if path.is_absolute() && path.exists() {
        return Some(path.to_path_buf());
    }

    lookup(icon_name.as_ref())
        .with_size(ICON_SIZE as u16)
        .with_scale(1)
        .find()
}

/// Icon lookups and pixbuf loads are cached for the lifetime of the app;
/// failed lookups are cached too so missing icons cost one probe.
#[derive(Default)]
pub struct IconCache {
    cache: HashMap<IconName, Option<Pixbuf>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, name: &IconName) -> Option<Pixbuf> {
        self.cache
            .entry(name.clone())
            .or_insert_with(|| {
                find_icon_path(name)
                    .and_then(|p| Pixbuf::from_file_at_scale(&p, ICON_SIZE, ICON_SIZE, true).ok())
            })
            .clone()
    }
}
