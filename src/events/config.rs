// ============================================================================
// Emitter Configuration
// ============================================================================

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How `AsyncEmitter` runs the listeners of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DispatchMode {
    /// One listener at a time, in registration order
    #[default]
    Sequential,
    /// All listeners started in registration order, then awaited together
    Concurrent,
}

/// Emitter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EmitterConfig {
    /// Label attached to log records
    pub name: String,
    pub dispatch: DispatchMode,
}

impl EmitterConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dispatch: DispatchMode::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self::new("emitter")
    }
}
