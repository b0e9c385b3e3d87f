use std::time::Instant;

use log::Level;

/// Logs how long a scope took when dropped. Inactive unless debug logging is on.
pub struct ScopedTimer {
    label: Option<String>,
    start: Instant,
}

impl ScopedTimer {
    pub fn debug_lazy<F>(label_gen: F) -> Self
    where
        F: FnOnce() -> String,
    {
        let label = log::log_enabled!(Level::Debug).then(label_gen);
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(label) = &self.label {
            log::debug!("{} took {} ms", label, self.start.elapsed().as_millis());
        }
    }
}
