use crate::action_executor::{self, ActionExecutor, ActionVariant, ExecuteError};
use crate::command_index::CommandIndex;
use crate::config::{validate, Config};
use crate::discovery::MenuScanner;
use crate::hotkey::{FocusBinding, HotkeyError};
use crate::model::CommandEntry;
use crate::pins::{PinError, PinSets, PinStorage, PinStore};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("command search is not installed")]
    NotInstalled,
    #[error("command search is already installed")]
    AlreadyInstalled,
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Pin(#[from] PinError),
    #[error("command not found: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
    #[error(transparent)]
    Hotkey(#[from] HotkeyError),
}

/// One running command search session: the scanned commands and the pin
/// sets layered over them.
pub struct CommandSearch {
    config: Config,
    scanner: Box<dyn MenuScanner>,
    index: CommandIndex,
    pins: PinStore,
}

impl CommandSearch {
    pub fn new(
        config: Config,
        scanner: Box<dyn MenuScanner>,
        storage: Box<dyn PinStorage>,
    ) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        Ok(Self {
            config,
            scanner,
            index: CommandIndex::new(),
            pins: PinStore::new(storage),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &CommandIndex {
        &self.index
    }

    /// Binding for the configured focus hotkey.
    pub fn focus_binding(&self) -> Result<FocusBinding, ServiceError> {
        Ok(FocusBinding::new(self.config.focus_chord()?))
    }

    /// Rescans the host and rebuilds the index. Pins are cleared; a failed
    /// scan leaves an empty index.
    pub fn refresh(&mut self) -> usize {
        let items = match self.scanner.scan() {
            Ok(items) => items,
            Err(error) => {
                tracing::warn!(scanner = self.scanner.scanner_name(), %error, "menu scan failed");
                Vec::new()
            }
        };
        let count = self.index.populate(items);
        self.pins.clear_active(&mut self.index);
        tracing::info!(scanner = self.scanner.scanner_name(), count, "commands registered");
        count
    }

    pub fn search(&self, query: &str) -> Vec<&CommandEntry> {
        crate::search::filter(&self.index, query)
    }

    /// Search for text still being typed: short input shows pins only.
    pub fn search_as_typed(&self, text: &str) -> Vec<&CommandEntry> {
        if text.chars().count() < self.config.live_query_min_chars {
            return self.search("");
        }
        self.search(text)
    }

    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> Result<(), ServiceError> {
        if self.index.set_pinned(id, pinned) {
            Ok(())
        } else {
            Err(ServiceError::UnknownCommand(id.to_string()))
        }
    }

    /// Re-reads stored sets; the file may have been edited since last use.
    pub fn pin_sets(&mut self) -> &PinSets {
        self.pins.load()
    }

    pub fn set_names(&mut self) -> Vec<String> {
        self.pins.sets().keys().cloned().collect()
    }

    pub fn active_set(&self) -> Option<&str> {
        self.pins.active()
    }

    pub fn activate_set(&mut self, name: &str) -> usize {
        self.pins.activate_set(name, &mut self.index)
    }

    pub fn save_set(&mut self, name: &str) -> Result<usize, ServiceError> {
        Ok(self.pins.save_current_as_set(name, &self.index)?)
    }

    pub fn delete_set(&mut self, name: &str) -> Result<(), ServiceError> {
        Ok(self.pins.delete_set(name, &mut self.index)?)
    }

    pub fn clear_pins(&mut self) {
        self.pins.clear_active(&mut self.index);
    }

    pub fn execute(
        &self,
        id: &str,
        variant: ActionVariant,
        executor: &mut dyn ActionExecutor,
    ) -> Result<(), ServiceError> {
        let entry = self
            .index
            .get(id)
            .ok_or_else(|| ServiceError::UnknownCommand(id.to_string()))?;
        action_executor::execute(entry, variant, executor)?;
        Ok(())
    }
}
