use crate::model::{ActionHandle, CommandEntry};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("host rejected action {handle}: {message}")]
    Host {
        handle: ActionHandle,
        message: String,
    },
    #[error("command '{0}' has no option action")]
    NoOptionAction(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionVariant {
    #[default]
    Primary,
    Option,
}

/// Host side of command execution: resolves a handle and fires it.
pub trait ActionExecutor {
    fn trigger(&mut self, handle: &ActionHandle) -> Result<(), ExecuteError>;
}

pub fn execute(
    entry: &CommandEntry,
    variant: ActionVariant,
    executor: &mut dyn ActionExecutor,
) -> Result<(), ExecuteError> {
    let handle = match variant {
        ActionVariant::Primary => &entry.primary_action,
        ActionVariant::Option => entry
            .secondary_action
            .as_ref()
            .ok_or_else(|| ExecuteError::NoOptionAction(entry.id.clone()))?,
    };

    tracing::info!(command = %entry.id, %handle, ?variant, "triggering command");
    executor.trigger(handle)
}

/// Executor for runs without a live host; records what would have fired.
#[derive(Debug, Default)]
pub struct LoggingExecutor {
    pub triggered: Vec<ActionHandle>,
}

impl ActionExecutor for LoggingExecutor {
    fn trigger(&mut self, handle: &ActionHandle) -> Result<(), ExecuteError> {
        tracing::info!(%handle, "no host attached; action recorded only");
        self.triggered.push(handle.clone());
        Ok(())
    }
}
