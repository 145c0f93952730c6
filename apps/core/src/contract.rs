use serde::{Deserialize, Serialize};

use crate::model::CommandEntry;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandRow {
    pub id: String,
    pub name: String,
    pub hierarchy: String,
    pub group: String,
    pub pinned: bool,
    pub has_option: bool,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum ResultRow {
    Group(String),
    Command(CommandRow),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResponse {
    pub query: String,
    pub active_set: Option<String>,
    pub rows: Vec<ResultRow>,
}

impl From<&CommandEntry> for CommandRow {
    fn from(value: &CommandEntry) -> Self {
        Self {
            id: value.id.clone(),
            name: value.display_name.clone(),
            hierarchy: value.hierarchy().to_string(),
            group: value.group_name().to_string(),
            pinned: value.is_pinned(),
            has_option: value.has_option(),
            icon: value.icon.clone(),
        }
    }
}

/// Rows for the result list, with a group header wherever the group of
/// consecutive results changes.
pub fn result_rows(entries: &[&CommandEntry]) -> Vec<ResultRow> {
    let mut rows = Vec::with_capacity(entries.len() + 4);
    let mut previous_group: Option<&str> = None;

    for entry in entries {
        let group = entry.group_name();
        if previous_group != Some(group) {
            rows.push(ResultRow::Group(group.to_string()));
        }
        rows.push(ResultRow::Command(CommandRow::from(*entry)));
        previous_group = Some(group);
    }

    rows
}

pub fn command_count(rows: &[ResultRow]) -> usize {
    rows.iter()
        .filter(|row| matches!(row, ResultRow::Command(_)))
        .count()
}
