//! Initialize-once storage for process-wide handles and symbol pointers.

use std::sync::OnceLock;

use parking_lot::{const_mutex, Mutex};

/// A value that is set at most once and then read for the rest of the process.
///
/// Unlike `OnceLock::get_or_init`, initialization may fail. A failed attempt
/// leaves the slot empty, so the next caller runs the initializer again.
/// Concurrent first callers are serialized: one runs the initializer while
/// the others block, then all of them observe the same value.
pub struct OnceSlot<T> {
    value: OnceLock<T>,
    init: Mutex<()>,
}

impl<T> OnceSlot<T> {
    pub const fn new() -> Self {
        Self {
            value: OnceLock::new(),
            init: const_mutex(()),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn is_set(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns the stored value, running `init` first if the slot is empty.
    pub fn get_or_try_init<E, F>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let _guard = self.init.lock();
        // Another thread may have finished while we waited for the lock.
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let value = init()?;
        Ok(self.value.get_or_init(|| value))
    }
}

impl<T> Default for OnceSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for OnceSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OnceSlot").field(&self.value.get()).finish()
    }
}
