use crate::error::AppError;
use parking_lot::RwLock;
use std::sync::Arc;

/// Process lifecycle. `Recovering` covers transient remote-call outages
/// the session survives without restarting.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Initializing,
    Running,
    Recovering { from_error: String },
    Stopping,
    Stopped,
}

#[derive(Clone, Default)]
pub struct StateManager {
    state: Arc<RwLock<Option<AppState>>>,
}

impl StateManager {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(None)),
        }
    }

    pub fn transition(&self, new_state: AppState) -> Result<(), AppError> {
        let mut current = self.state.write();
        let from = current.clone().unwrap_or(AppState::Initializing);

        let valid = matches!(
            (&from, &new_state),
            (AppState::Initializing, AppState::Running)
                | (AppState::Running, AppState::Recovering { .. })
                | (AppState::Running, AppState::Stopping)
                | (AppState::Recovering { .. }, AppState::Running)
                | (AppState::Recovering { .. }, AppState::Stopping)
                | (AppState::Stopping, AppState::Stopped)
        );
        if !valid {
            return Err(AppError::Fatal(format!(
                "Invalid state transition: {:?} -> {:?}",
                from, new_state
            )));
        }

        tracing::info!("State transition: {:?} -> {:?}", from, new_state);
        *current = Some(new_state);
        Ok(())
    }

    pub fn current(&self) -> AppState {
        self.state
            .read()
            .clone()
            .unwrap_or(AppState::Initializing)
    }

    pub fn is_running(&self) -> bool {
        self.current() == AppState::Running
    }
}
