//! Jump input debouncing
//!
//! Keyboard, mouse and touch all collapse to one "jump requested" flag that the
//! frame driver drains once per tick.

/// Minimum time between accepted jumps (ms)
pub const DEFAULT_DEBOUNCE_MS: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct JumpDebouncer {
    last_input_ms: Option<f64>,
    debounce_ms: f64,
    pending: bool,
}

impl Default for JumpDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl JumpDebouncer {
    pub fn new(debounce_ms: f64) -> Self {
        Self {
            last_input_ms: None,
            debounce_ms,
            pending: false,
        }
    }

    /// Register a raw input event; returns false if it was swallowed
    pub fn accept(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_input_ms
            && now_ms - last < self.debounce_ms
        {
            return false;
        }
        self.last_input_ms = Some(now_ms);
        self.pending = true;
        true
    }

    /// Consume the pending jump for this tick
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
