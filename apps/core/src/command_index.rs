use std::collections::{HashMap, HashSet};

use crate::model::{CommandEntry, ScanItem, ScanItemKind};

/// Every executable command found by the most recent scan, keyed by id.
#[derive(Debug, Default, Clone)]
pub struct CommandIndex {
    entries: HashMap<String, CommandEntry>,
}

impl CommandIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_scan(items: Vec<ScanItem>) -> Self {
        let mut index = Self::new();
        index.populate(items);
        index
    }

    /// Replaces the whole index with the leaf actions in `items`.
    ///
    /// Later items overwrite earlier ones with the same id. Option boxes are
    /// merged into the entry they belong to and dropped when that entry has
    /// not been seen yet.
    pub fn populate(&mut self, items: Vec<ScanItem>) -> usize {
        let mut entries: HashMap<String, CommandEntry> = HashMap::new();
        let mut dropped_options = 0_usize;
        let mut overwritten = 0_usize;

        for item in items {
            if item.name.is_empty() {
                continue;
            }

            match item.kind {
                ScanItemKind::Separator | ScanItemKind::SubMenu => {}
                ScanItemKind::OptionBox => {
                    match (entries.get_mut(&item.name), item.action) {
                        (Some(owner), Some(handle)) => owner.secondary_action = Some(handle),
                        _ => dropped_options += 1,
                    }
                }
                ScanItemKind::Action => {
                    let Some(handle) = item.action else {
                        continue;
                    };
                    let mut entry = CommandEntry::from_owned(
                        item.name.clone(),
                        item.label,
                        item.path,
                        handle,
                    );
                    entry.secondary_action = item.option;
                    entry.icon = item.icon;
                    if entries.insert(item.name, entry).is_some() {
                        overwritten += 1;
                    }
                }
            }
        }

        if overwritten > 0 {
            tracing::debug!(overwritten, "duplicate command ids replaced earlier entries");
        }
        if dropped_options > 0 {
            tracing::debug!(dropped_options, "option boxes without an owning command dropped");
        }

        self.entries = entries;
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CommandEntry> {
        self.entries.get(id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.values()
    }

    /// Returns `false` when no command has this id.
    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.set_pinned(pinned);
                true
            }
            None => false,
        }
    }

    pub fn clear_pins(&mut self) {
        for entry in self.entries.values_mut() {
            entry.set_pinned(false);
        }
    }

    /// Pins exactly the entries whose joined hierarchy is listed and unpins
    /// everything else. Returns how many entries ended up pinned.
    pub fn pin_paths<S: AsRef<str>>(&mut self, paths: &[S]) -> usize {
        let wanted: HashSet<&str> = paths.iter().map(|p| p.as_ref()).collect();
        let mut pinned = 0;
        for entry in self.entries.values_mut() {
            let on = wanted.contains(entry.hierarchy());
            entry.set_pinned(on);
            if on {
                pinned += 1;
            }
        }
        pinned
    }

    pub fn pinned_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.is_pinned())
            .map(|entry| entry.hierarchy().to_string())
            .collect();
        paths.sort();
        paths
    }
}
