use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::{ActionHandle, ScanItem, ScanItemKind};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read menu dump {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid menu dump: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of the raw menu items a command index is built from.
pub trait MenuScanner {
    fn scanner_name(&self) -> &'static str;
    fn scan(&self) -> Result<Vec<ScanItem>, ScanError>;
}

/// Serialized shape of a host menu bar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuNode {
    Menu {
        #[serde(default)]
        object_name: String,
        title: String,
        #[serde(default)]
        children: Vec<MenuNode>,
    },
    Action {
        #[serde(default)]
        object_name: String,
        text: String,
        #[serde(default)]
        handle: Option<String>,
        #[serde(default)]
        icon: Option<String>,
    },
    OptionBox {
        #[serde(default)]
        object_name: String,
        #[serde(default)]
        handle: Option<String>,
    },
    Separator {
        #[serde(default)]
        object_name: String,
    },
}

impl MenuNode {
    fn object_name(&self) -> &str {
        match self {
            Self::Menu { object_name, .. }
            | Self::Action { object_name, .. }
            | Self::OptionBox { object_name, .. }
            | Self::Separator { object_name } => object_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MenuDump {
    menus: Vec<MenuNode>,
}

/// Flattens a menu tree into scan items, recording each leaf's menu path.
///
/// Unnamed nodes are skipped together with everything below them. An option
/// box belongs to the nearest named sibling before it.
pub fn walk_menu_tree(menus: &[MenuNode]) -> Vec<ScanItem> {
    let mut items = Vec::new();
    walk_level(menus, &[], &mut items);
    items
}

fn walk_level(nodes: &[MenuNode], parents: &[String], out: &mut Vec<ScanItem>) {
    let mut previous: Option<&str> = None;

    for node in nodes {
        let name = node.object_name();
        if name.is_empty() {
            continue;
        }

        match node {
            MenuNode::Menu {
                title, children, ..
            } => {
                let mut path = parents.to_vec();
                path.push(title.clone());
                out.push(ScanItem {
                    name: name.to_string(),
                    label: title.clone(),
                    path: path.clone(),
                    kind: ScanItemKind::SubMenu,
                    action: None,
                    option: None,
                    icon: None,
                });
                walk_level(children, &path, out);
            }
            MenuNode::Action {
                text, handle, icon, ..
            } => {
                let mut path = parents.to_vec();
                path.push(text.clone());
                out.push(ScanItem {
                    name: name.to_string(),
                    label: text.clone(),
                    path,
                    kind: ScanItemKind::Action,
                    action: Some(ActionHandle::new(handle.as_deref().unwrap_or(name))),
                    option: None,
                    icon: icon.clone(),
                });
            }
            MenuNode::OptionBox { handle, .. } => {
                out.push(ScanItem {
                    name: previous.unwrap_or_default().to_string(),
                    label: String::new(),
                    path: parents.to_vec(),
                    kind: ScanItemKind::OptionBox,
                    action: Some(ActionHandle::new(handle.as_deref().unwrap_or(name))),
                    option: None,
                    icon: None,
                });
            }
            MenuNode::Separator { .. } => {
                out.push(ScanItem {
                    name: name.to_string(),
                    label: String::new(),
                    path: parents.to_vec(),
                    kind: ScanItemKind::Separator,
                    action: None,
                    option: None,
                    icon: None,
                });
            }
        }

        previous = Some(name);
    }
}

/// Scanner over a dumped menu tree.
pub struct MenuTreeScanner {
    menus: Vec<MenuNode>,
}

impl MenuTreeScanner {
    pub fn from_menus(menus: Vec<MenuNode>) -> Self {
        Self { menus }
    }

    /// Parses `{"menus": [...]}`.
    pub fn from_json(payload: &str) -> Result<Self, ScanError> {
        let dump: MenuDump = serde_json::from_str(payload)?;
        Ok(Self { menus: dump.menus })
    }

    pub fn from_path(path: &Path) -> Result<Self, ScanError> {
        let payload = std::fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&payload)
    }

    pub fn deterministic_fixture() -> Self {
        Self {
            menus: vec![
                MenuNode::Menu {
                    object_name: "mainEditMenu".into(),
                    title: "Edit".into(),
                    children: vec![
                        action("undoItem", "Undo", Some("undo.png")),
                        action("deleteItem", "Delete", Some("delete.png")),
                        MenuNode::Separator {
                            object_name: "editSeparator1".into(),
                        },
                        action("duplicateItem", "Duplicate", None),
                        MenuNode::OptionBox {
                            object_name: "duplicateItemOption".into(),
                            handle: None,
                        },
                    ],
                },
                MenuNode::Menu {
                    object_name: "mainCreateMenu".into(),
                    title: "Create".into(),
                    children: vec![MenuNode::Menu {
                        object_name: "polygonPrimitivesItem".into(),
                        title: "Polygon Primitives".into(),
                        children: vec![
                            action("polyCubeItem", "Cube", Some("polyCube.png")),
                            MenuNode::OptionBox {
                                object_name: "polyCubeItemOption".into(),
                                handle: None,
                            },
                            action("polySphereItem", "Sphere", Some("polySphere.png")),
                        ],
                    }],
                },
                MenuNode::Menu {
                    object_name: "mainMeshToolsMenu".into(),
                    title: "Mesh Tools".into(),
                    children: vec![action("multiCutItem", "Multi-Cut", None)],
                },
            ],
        }
    }
}

fn action(object_name: &str, text: &str, icon: Option<&str>) -> MenuNode {
    MenuNode::Action {
        object_name: object_name.into(),
        text: text.into(),
        handle: None,
        icon: icon.map(str::to_string),
    }
}

impl MenuScanner for MenuTreeScanner {
    fn scanner_name(&self) -> &'static str {
        "menu_tree"
    }

    fn scan(&self) -> Result<Vec<ScanItem>, ScanError> {
        Ok(walk_menu_tree(&self.menus))
    }
}

/// Scanner over an already flattened list, for hosts that walk their own
/// menus.
pub struct StaticScanner {
    items: Vec<ScanItem>,
}

impl StaticScanner {
    pub fn from_items(items: Vec<ScanItem>) -> Self {
        Self { items }
    }
}

impl MenuScanner for StaticScanner {
    fn scanner_name(&self) -> &'static str {
        "static"
    }

    fn scan(&self) -> Result<Vec<ScanItem>, ScanError> {
        Ok(self.items.clone())
    }
}
