//! Modal configuration.

use std::time::Duration;

use crate::request::ModalOptions;

/// Delay before initial focus is applied to a newly active modal.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Configuration shared by the stack handle and the focus trap.
#[derive(Debug, Clone)]
pub struct ModalConfig {
    /// How long the focus trap waits after the active modal changes before
    /// moving focus, giving the render surface time to materialize it.
    pub settle_delay: Duration,

    /// Options used when `open_modal` is called without options.
    pub default_options: ModalOptions,

    /// Suppress background scrolling while any modal is open.
    pub lock_background_scroll: bool,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            default_options: ModalOptions::default(),
            lock_background_scroll: true,
        }
    }
}

impl ModalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the settling delay (zero focuses on the next settle call).
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn default_options(mut self, options: ModalOptions) -> Self {
        self.default_options = options;
        self
    }

    /// Leave background scrolling alone while modals are open.
    pub fn allow_background_scroll(mut self) -> Self {
        self.lock_background_scroll = false;
        self
    }
}
