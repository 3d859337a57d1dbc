pub mod alert;
pub mod config;
pub mod reading;
pub mod source;

#[cfg(feature = "vision")]
pub mod vision;

/// Single-slot hand-off for passing the most recent value from a background
/// thread to the UI event loop. Writers overwrite the slot (last message
/// wins); the consumer drains it with [`ValueStore::take`].
pub struct ValueStore<T>(std::sync::Arc<std::sync::Mutex<Option<T>>>);

impl<T> Clone for ValueStore<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for ValueStore<T> {
    fn default() -> Self {
        Self(std::sync::Arc::default())
    }
}

impl<T: Clone> ValueStore<T> {
    /// Replaces the slot with `value`.
    ///
    /// # Panics
    ///
    /// If locking the internally used mutex fails.
    pub fn set(&self, value: T) {
        let mut slot = self.0.lock().unwrap();
        let _ = slot.insert(value);
    }

    /// Removes and returns the stored value, leaving the slot empty.
    ///
    /// # Panics
    ///
    /// If locking the internally used mutex fails.
    pub fn take(&self) -> Option<T> {
        let mut slot = self.0.lock().unwrap();
        slot.take()
    }

    /// Returns a copy of the stored value without clearing the slot.
    ///
    /// # Panics
    ///
    /// If locking the internally used mutex fails.
    pub fn peek(&self) -> Option<T> {
        let slot = self.0.lock().unwrap();
        slot.clone()
    }
}
