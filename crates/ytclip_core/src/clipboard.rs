use std::time::Duration;

/// How long the "copied" confirmation stays visible.
pub const COPIED_RESET_DELAY: Duration = Duration::from_secs(2);

/// Transient confirmation shown after a link was copied.
///
/// Each successful copy bumps the generation; a reset only clears the flag
/// when it carries the latest generation, so re-copying restarts the delay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CopiedFlag {
    copied: bool,
    generation: u64,
}

/// A deferred reset the host must deliver after `after` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReset {
    pub generation: u64,
    pub after: Duration,
}

impl CopiedFlag {
    pub fn is_copied(&self) -> bool {
        self.copied
    }

    pub fn arm(&mut self) -> PendingReset {
        self.generation += 1;
        self.copied = true;
        PendingReset {
            generation: self.generation,
            after: COPIED_RESET_DELAY,
        }
    }

    /// Returns true when the flag was actually cleared.
    pub fn expire(&mut self, generation: u64) -> bool {
        if !self.copied || generation != self.generation {
            return false;
        }
        self.copied = false;
        true
    }

    /// Drops the flag and invalidates any reset still in flight.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.copied = false;
    }
}
