//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use polyvoice_config::Settings;
use polyvoice_pipeline::Narrator;

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Settings>,
    /// Segmentation and synthesis
    pub narrator: Narrator,
}

impl AppState {
    /// Create state with the production detector and speech engines
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        let narrator = Narrator::from_settings(&config)
            .map_err(|e| ServerError::Internal(format!("failed to build narrator: {}", e)))?;
        Ok(Self::with_narrator(config, narrator))
    }

    pub fn with_narrator(config: Settings, narrator: Narrator) -> Self {
        Self {
            config: Arc::new(config),
            narrator,
        }
    }
}
