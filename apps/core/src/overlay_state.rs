use crate::contract::{result_rows, ResultRow};
use crate::core_service::{CommandSearch, ServiceError};
use crate::hotkey::FOCUS_COMMAND_NAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusAction {
    /// Search box or result list already had focus; nothing changed.
    AlreadyFocused,
    FocusSearch { show_results: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    query: String,
    results_visible: bool,
}

impl OverlayState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn on_results(&mut self, count: usize) {
        self.results_visible = count > 0;
    }

    pub fn on_escape(&mut self) -> bool {
        if self.results_visible {
            self.results_visible = false;
            return true;
        }
        false
    }
}

/// Install slot for the search overlay. At most one session is installed;
/// everything that needs it goes through this slot.
#[derive(Default)]
pub struct Overlay {
    session: Option<CommandSearch>,
    state: OverlayState,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `session`, scanning the host first if it has not been yet.
    /// A second install fails and leaves the installed session untouched.
    pub fn install(&mut self, mut session: CommandSearch) -> Result<&mut CommandSearch, ServiceError> {
        if self.session.is_some() {
            return Err(ServiceError::AlreadyInstalled);
        }
        if session.index().is_empty() {
            session.refresh();
        }
        self.state = OverlayState::default();
        tracing::info!(commands = session.index().len(), "command search installed");
        Ok(self.session.insert(session))
    }

    pub fn teardown(&mut self) -> Option<CommandSearch> {
        self.state = OverlayState::default();
        self.session.take()
    }

    pub fn is_installed(&self) -> bool {
        self.session.is_some()
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn session(&self) -> Result<&CommandSearch, ServiceError> {
        self.session.as_ref().ok_or(ServiceError::NotInstalled)
    }

    pub fn session_mut(&mut self) -> Result<&mut CommandSearch, ServiceError> {
        self.session.as_mut().ok_or(ServiceError::NotInstalled)
    }

    pub fn on_query_changed(&mut self, text: &str) -> Result<Vec<ResultRow>, ServiceError> {
        let session = self.session.as_ref().ok_or(ServiceError::NotInstalled)?;
        let matches = session.search_as_typed(text);
        self.state.set_query(text);
        self.state.on_results(matches.len());
        Ok(result_rows(&matches))
    }

    pub fn on_submit(&mut self) -> Result<Vec<ResultRow>, ServiceError> {
        let session = self.session.as_ref().ok_or(ServiceError::NotInstalled)?;
        let matches = session.search(self.state.query());
        self.state.on_results(matches.len());
        Ok(result_rows(&matches))
    }

    /// Brings the search box into focus and runs the current query in full.
    pub fn focus(&mut self, has_focus: bool) -> Result<FocusAction, ServiceError> {
        if self.session.is_none() {
            return Err(ServiceError::NotInstalled);
        }
        if has_focus {
            return Ok(FocusAction::AlreadyFocused);
        }

        let rows = self.on_submit()?;
        Ok(FocusAction::FocusSearch {
            show_results: !rows.is_empty(),
        })
    }

    /// Entry point for host commands bound through a
    /// [`FocusBinding`](crate::hotkey::FocusBinding).
    pub fn on_hotkey(&mut self, command: &str, has_focus: bool) -> Result<FocusAction, ServiceError> {
        if command != FOCUS_COMMAND_NAME {
            return Err(ServiceError::UnknownCommand(command.to_string()));
        }
        self.focus(has_focus)
    }

    pub fn on_escape(&mut self) -> bool {
        self.state.on_escape()
    }
}
