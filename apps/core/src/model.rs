use serde::{Deserialize, Serialize};

pub const HIERARCHY_SEPARATOR: &str = " > ";

/// Non-owning key the host resolves back to one of its own menu actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionHandle(String);

impl ActionHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One executable leaf action discovered in the host menu bar.
///
/// The hierarchy path is fixed at construction; the search key, group name
/// and joined hierarchy are derived from it once and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub id: String,
    pub display_name: String,
    pub primary_action: ActionHandle,
    pub secondary_action: Option<ActionHandle>,
    pub icon: Option<String>,
    hierarchy_path: Vec<String>,
    hierarchy: String,
    search_key: String,
    pinned: bool,
}

impl CommandEntry {
    pub fn new(id: &str, display_name: &str, hierarchy_path: &[&str], primary: &str) -> Self {
        Self::from_owned(
            id.to_string(),
            display_name.to_string(),
            hierarchy_path.iter().map(|s| s.to_string()).collect(),
            ActionHandle::new(primary),
        )
    }

    pub fn from_owned(
        id: String,
        display_name: String,
        hierarchy_path: Vec<String>,
        primary_action: ActionHandle,
    ) -> Self {
        let hierarchy = join_hierarchy(&hierarchy_path);
        let search_key = search_key_for(&hierarchy_path);
        Self {
            id,
            display_name,
            primary_action,
            secondary_action: None,
            icon: None,
            hierarchy_path,
            hierarchy,
            search_key,
            pinned: false,
        }
    }

    pub fn with_secondary(mut self, handle: ActionHandle) -> Self {
        self.secondary_action = Some(handle);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn hierarchy_path(&self) -> &[String] {
        &self.hierarchy_path
    }

    /// Human-readable path, e.g. `Edit > Delete`. Pin sets store this form.
    pub fn hierarchy(&self) -> &str {
        &self.hierarchy
    }

    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    pub fn group_name(&self) -> &str {
        self.hierarchy_path
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn has_option(&self) -> bool {
        self.secondary_action.is_some()
    }

    pub(crate) fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanItemKind {
    Action,
    OptionBox,
    Separator,
    SubMenu,
}

/// Raw item as reported by a host scan, before any filtering.
///
/// For `OptionBox` items `name` is the id of the action the option belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanItem {
    pub name: String,
    pub label: String,
    pub path: Vec<String>,
    pub kind: ScanItemKind,
    pub action: Option<ActionHandle>,
    pub option: Option<ActionHandle>,
    pub icon: Option<String>,
}

impl ScanItem {
    pub fn action(name: &str, path: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: path.last().map(|s| s.to_string()).unwrap_or_default(),
            path: path.iter().map(|s| s.to_string()).collect(),
            kind: ScanItemKind::Action,
            action: Some(ActionHandle::new(name)),
            option: None,
            icon: None,
        }
    }

    pub fn option_box(owner: &str, handle: &str) -> Self {
        Self {
            name: owner.to_string(),
            label: String::new(),
            path: Vec::new(),
            kind: ScanItemKind::OptionBox,
            action: Some(ActionHandle::new(handle)),
            option: None,
            icon: None,
        }
    }

    pub fn separator(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: String::new(),
            path: Vec::new(),
            kind: ScanItemKind::Separator,
            action: None,
            option: None,
            icon: None,
        }
    }

    pub fn sub_menu(name: &str, path: &[&str]) -> Self {
        Self {
            kind: ScanItemKind::SubMenu,
            action: None,
            ..Self::action(name, path)
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_option(mut self, handle: &str) -> Self {
        self.option = Some(ActionHandle::new(handle));
        self
    }
}

pub fn join_hierarchy<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<_>>()
        .join(HIERARCHY_SEPARATOR)
}

pub fn search_key_for<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .flat_map(|segment| segment.as_ref().chars())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
