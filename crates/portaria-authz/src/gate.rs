//! Element-level gating.
//!
//! A gate wraps an arbitrary UI subtree and decides, per render,
//! whether the subtree is shown, hidden, or disabled. It keeps no
//! state and caches nothing: the host's re-render cycle (driven by the
//! store's change notifications) is what picks up grant changes.

use portaria_core::DenyReason;
use portaria_store::Storage;

use crate::engine::AuthzEngine;

/// What to do with the subtree when the check fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateMode {
    /// Render nothing.
    #[default]
    Hide,
    /// Render the subtree with its disabled state forced.
    Disable,
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Render the subtree unchanged.
    Render,
    /// Render nothing.
    Hidden,
    /// Render the subtree but force its disabled state. A host whose
    /// child exposes no disableable contract falls back to rendering
    /// unchanged.
    Disabled,
}

/// Gate for one UI subtree.
pub struct ElementGate<S: Storage> {
    engine: AuthzEngine<S>,
    code: String,
    screen_id: Option<i64>,
    mode: GateMode,
}

impl<S: Storage> ElementGate<S> {
    /// Create a gate in the default [`GateMode::Hide`] mode.
    pub fn new(engine: AuthzEngine<S>, code: impl Into<String>, screen_id: Option<i64>) -> Self {
        Self {
            engine,
            code: code.into(),
            screen_id,
            mode: GateMode::default(),
        }
    }

    /// Switch the gate's denial mode.
    pub fn with_mode(mut self, mode: GateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Evaluate the gate against the current grant set.
    pub fn evaluate(&self) -> GateOutcome {
        if self.engine.has(&self.code, self.screen_id) {
            return GateOutcome::Render;
        }

        match self.mode {
            GateMode::Hide => {
                tracing::debug!(
                    reason = DenyReason::Permission.as_str(),
                    code = %self.code,
                    screen_id = self.screen_id,
                    "element hidden"
                );
                GateOutcome::Hidden
            }
            GateMode::Disable => GateOutcome::Disabled,
        }
    }
}
