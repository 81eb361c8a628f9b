//! Recovery strategies for malformed line format input.
//!
//! The line parser normally stops at the first malformed line. In lenient
//! mode it skips the offending field instead, logs a warning and keeps a
//! message in a [`RecoveryContext`] so callers can report what was dropped.

use crate::error::{MarcError, Result};
use serde::{Deserialize, Serialize};

/// Strategy for handling malformed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecoveryMode {
    /// Strict mode: return an error for any malformed line (default)
    #[default]
    Strict,
    /// Lenient mode: skip malformed fields and keep the rest
    Lenient,
}

/// Recovery context collecting what was skipped during a parse.
#[derive(Debug, Default)]
pub struct RecoveryContext {
    /// Current recovery mode
    pub mode: RecoveryMode,
    /// Whether any recovery was needed
    pub has_errors: bool,
    /// List of recovery messages
    pub recovery_messages: Vec<String>,
}

impl RecoveryContext {
    /// Create a new recovery context with the given mode
    #[must_use]
    pub fn new(mode: RecoveryMode) -> Self {
        RecoveryContext {
            mode,
            has_errors: false,
            recovery_messages: Vec::new(),
        }
    }

    fn add_message(&mut self, message: String) {
        self.has_errors = true;
        self.recovery_messages.push(message);
    }

    /// Try to recover from an error based on the recovery mode.
    ///
    /// # Errors
    ///
    /// Returns the error unchanged in strict mode; otherwise logs and records it.
    pub fn recover(&mut self, error: MarcError) -> Result<()> {
        match self.mode {
            RecoveryMode::Strict => Err(error),
            RecoveryMode::Lenient => {
                tracing::warn!(%error, "skipping malformed line");
                self.add_message(error.to_string());
                Ok(())
            },
        }
    }
}
