use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::command_index::CommandIndex;

pub const PINS_FILE_NAME: &str = "pins.json";

/// Set name → joined hierarchy paths of the commands pinned by that set.
pub type PinSets = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("invalid pin set name '{0}'")]
    InvalidName(String),
    #[error("no pinned commands to save")]
    NoPinnedEntries,
    #[error("no storage location available for pin sets")]
    PersistenceUnavailable,
    #[error("failed to encode pin sets: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write pin sets to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where pin sets live between sessions.
pub trait PinStorage {
    fn resolve_location(&self) -> Option<PathBuf>;
    /// `Ok(None)` when nothing has been stored at `path` yet.
    fn read_all(&self, path: &Path) -> std::io::Result<Option<Vec<u8>>>;
    fn write_all(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePinStorage {
    location: Option<PathBuf>,
}

impl FilePinStorage {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Some(path.into()),
        }
    }

    pub fn unavailable() -> Self {
        Self { location: None }
    }

    pub fn from_config(cfg: &crate::config::Config) -> Self {
        Self {
            location: cfg.pins_location(),
        }
    }
}

impl PinStorage for FilePinStorage {
    fn resolve_location(&self) -> Option<PathBuf> {
        self.location.clone()
    }

    fn read_all(&self, path: &Path) -> std::io::Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write_all(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, bytes)
    }
}

/// Set entries in the order they appear in the file.
struct StoredSets(Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for StoredSets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StoredSetsVisitor;

        impl<'de> Visitor<'de> for StoredSetsVisitor {
            type Value = StoredSets;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of set names to command paths")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                    entries.push(entry);
                }
                Ok(StoredSets(entries))
            }
        }

        deserializer.deserialize_map(StoredSetsVisitor)
    }
}

/// Decodes a stored pin file. Anything unreadable decodes to no sets.
///
/// Names are normalized on the way in; when two keys normalize to the same
/// name the later one wins. Keys that normalize to nothing are skipped.
pub fn decode_pin_sets(bytes: &[u8]) -> PinSets {
    let Ok(text) = std::str::from_utf8(bytes) else {
        tracing::warn!("pin file is not valid utf-8; ignoring it");
        return PinSets::new();
    };
    if text.trim().is_empty() {
        return PinSets::new();
    }

    let stored = match json5::from_str::<StoredSets>(text) {
        Ok(stored) => stored,
        Err(error) => {
            tracing::warn!(%error, "pin file is malformed; ignoring it");
            return PinSets::new();
        }
    };

    let mut sets = PinSets::new();
    for (raw_name, paths) in stored.0 {
        let name = normalize_set_name(&raw_name);
        if name.is_empty() {
            tracing::debug!("skipping pin set with a blank name");
            continue;
        }
        sets.insert(name, paths);
    }
    sets
}

pub fn encode_pin_sets(sets: &PinSets) -> Result<Vec<u8>, PinError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    sets.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

pub fn normalize_set_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Named pin sets plus the name of the set currently applied to the index.
pub struct PinStore {
    storage: Box<dyn PinStorage>,
    sets: PinSets,
    active: Option<String>,
    loaded: bool,
}

impl PinStore {
    pub fn new(storage: Box<dyn PinStorage>) -> Self {
        Self {
            storage,
            sets: PinSets::new(),
            active: None,
            loaded: false,
        }
    }

    /// Re-reads the stored sets, replacing whatever is held in memory.
    pub fn load(&mut self) -> &PinSets {
        self.sets = self.read_stored();
        self.loaded = true;
        &self.sets
    }

    /// Stored sets, read from storage only on first use.
    pub fn sets(&mut self) -> &PinSets {
        self.ensure_loaded();
        &self.sets
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Pins exactly the commands listed under `name`; an unknown name unpins
    /// everything.
    pub fn activate_set(&mut self, name: &str, index: &mut CommandIndex) -> usize {
        let name = normalize_set_name(name);
        let paths = self.sets().get(&name).cloned();
        let pinned = index.pin_paths(paths.as_deref().unwrap_or_default());
        self.active = paths.map(|_| name.clone());
        tracing::info!(set = %name, pinned, "activated pin set");
        pinned
    }

    /// Stores the currently pinned commands under `name` and makes it the
    /// active set. Returns the number of stored paths.
    pub fn save_current_as_set(
        &mut self,
        name: &str,
        index: &CommandIndex,
    ) -> Result<usize, PinError> {
        let name = normalize_set_name(name);
        if name.is_empty() {
            return Err(PinError::InvalidName(name));
        }

        let pinned = index.pinned_paths();
        if pinned.is_empty() {
            return Err(PinError::NoPinnedEntries);
        }

        let location = self
            .storage
            .resolve_location()
            .ok_or(PinError::PersistenceUnavailable)?;

        let count = pinned.len();
        self.ensure_loaded();
        let mut updated = self.sets.clone();
        updated.insert(name.clone(), pinned);
        self.write(&location, &updated)?;

        self.sets = updated;
        self.active = Some(name.clone());
        tracing::info!(set = %name, count, "saved pin set");
        Ok(count)
    }

    pub fn delete_set(&mut self, name: &str, index: &mut CommandIndex) -> Result<(), PinError> {
        let name = normalize_set_name(name);
        if !self.sets().contains_key(&name) {
            return Err(PinError::InvalidName(name));
        }

        let location = self
            .storage
            .resolve_location()
            .ok_or(PinError::PersistenceUnavailable)?;

        let mut updated = self.sets.clone();
        updated.remove(&name);
        self.write(&location, &updated)?;

        self.sets = updated;
        self.clear_active(index);
        tracing::info!(set = %name, "deleted pin set");
        Ok(())
    }

    pub fn clear_active(&mut self, index: &mut CommandIndex) {
        index.clear_pins();
        self.active = None;
    }

    fn ensure_loaded(&mut self) {
        if !self.loaded {
            self.load();
        }
    }

    fn read_stored(&self) -> PinSets {
        let Some(location) = self.storage.resolve_location() else {
            tracing::debug!("no pin storage location; starting without pin sets");
            return PinSets::new();
        };

        match self.storage.read_all(&location) {
            Ok(Some(bytes)) => {
                let sets = decode_pin_sets(&bytes);
                tracing::debug!(path = %location.display(), sets = sets.len(), "read pin sets");
                sets
            }
            Ok(None) => PinSets::new(),
            Err(error) => {
                tracing::warn!(path = %location.display(), %error, "failed to read pin sets");
                PinSets::new()
            }
        }
    }

    fn write(&self, location: &Path, sets: &PinSets) -> Result<(), PinError> {
        let bytes = encode_pin_sets(sets)?;
        self.storage
            .write_all(location, &bytes)
            .map_err(|source| PinError::Io {
                path: location.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %location.display(), "pin sets stored");
        Ok(())
    }
}
